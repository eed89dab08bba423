use regex::Regex;

fn absolute_url_patterns() -> &'static [Regex] {
    use std::sync::OnceLock;

    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            vec![
                Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("invalid scheme regex"),
                Regex::new(r"^//").expect("invalid protocol-relative regex"),
            ]
        })
        .as_slice()
}

/// Determine whether an asset reference is already a complete URL.
///
/// Scheme-qualified values (`https://`, `data:`, `mailto:`) and protocol-relative `//host`
/// references point outside the local asset tree and are never versioned or prefixed.
pub fn is_absolute_url(value: &str) -> bool {
    absolute_url_patterns()
        .iter()
        .any(|pattern| pattern.is_match(value))
}

/// Determine whether a configured base URL names a host (`scheme://host` or `//host`).
pub fn is_base_url(value: &str) -> bool {
    if value.starts_with("//") {
        return true;
    }
    value.split_once("://").is_some_and(|(scheme, host)| {
        !host.is_empty() && is_absolute_url(&format!("{scheme}:"))
    })
}
