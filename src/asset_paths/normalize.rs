/// Produce the manifest lookup key for a logical asset path.
///
/// Only leading slashes are removed. Case, backslashes and trailing slashes are preserved, so a
/// key must match the manifest entry exactly.
pub fn lookup_key(logical_path: &str) -> &str {
    logical_path.trim_start_matches('/')
}

/// Join a base path or base URL with a package-relative path using a single forward slash.
pub fn join_prefix(prefix: &str, relative: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let relative = relative.trim_start_matches('/');
    format!("{prefix}/{relative}")
}

/// Canonical form of a configured base path: leading slash, no trailing slash.
///
/// An empty or `/` base path means "site root" and is returned as the empty string.
pub fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
