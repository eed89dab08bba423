//! Resolution of logical asset paths into public, versioned URLs.

use std::sync::Arc;

use crate::asset_paths::{BasePrefix, is_absolute_url, lookup_key};
use crate::error::Result;
use crate::models::VersionToken;
use crate::strategy::{NullStrategy, VersionStrategy};

/// Maps logical asset paths to public URLs through a version strategy and an optional prefix.
///
/// Resolution steps:
///
/// 1. absolute URLs (`https://…`, `data:…`, `//host/…`) and the empty path pass through;
/// 2. leading slashes are stripped to form the manifest lookup key;
/// 3. the strategy versions the key, or leaves it untouched when no token is known;
/// 4. the base path or one of the base URLs is prepended. Without a prefix, a leading slash on
///    the input is restored so site-rooted paths stay site-rooted.
///
/// The resolver holds no state beyond its configuration; the manifest cache lives in the
/// strategy's store.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    strategy: Arc<dyn VersionStrategy>,
    prefix: BasePrefix,
}

impl AssetResolver {
    /// Create a resolver with no prefix.
    pub fn new(strategy: Arc<dyn VersionStrategy>) -> Self {
        Self {
            strategy,
            prefix: BasePrefix::None,
        }
    }

    /// Resolver that never versions or prefixes anything.
    pub fn passthrough() -> Self {
        Self::new(Arc::new(NullStrategy))
    }

    /// Serve assets below a local base path such as `/static`.
    pub fn with_base_path(mut self, base_path: &str) -> Self {
        self.prefix = BasePrefix::path(base_path);
        self
    }

    /// Serve assets from CDN hosts; each path is pinned to one host.
    pub fn with_base_urls<I, S>(mut self, base_urls: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.prefix = BasePrefix::urls(base_urls)?;
        Ok(self)
    }

    /// Replace the prefix outright.
    pub fn with_prefix(mut self, prefix: BasePrefix) -> Self {
        self.prefix = prefix;
        self
    }

    /// Resolve `logical_path` to its public URL.
    ///
    /// Unknown assets resolve to their unversioned URL. An error is only returned when the
    /// strategy's manifest cannot be loaded.
    pub fn resolve(&self, logical_path: &str) -> Result<String> {
        if logical_path.is_empty() || is_absolute_url(logical_path) {
            tracing::debug!(path = logical_path, "leaving absolute or empty reference untouched");
            return Ok(logical_path.to_string());
        }

        let key = lookup_key(logical_path);
        let versioned = self.strategy.apply_version(key)?;

        Ok(match &self.prefix {
            BasePrefix::None if logical_path.starts_with('/') => format!("/{versioned}"),
            prefix => prefix.apply(&versioned),
        })
    }

    /// Version token the strategy assigns to `logical_path`.
    ///
    /// Absolute URLs and the empty path carry no version and never touch the manifest.
    pub fn version(&self, logical_path: &str) -> Result<VersionToken> {
        if logical_path.is_empty() || is_absolute_url(logical_path) {
            return Ok(VersionToken::empty());
        }
        self.strategy.version(lookup_key(logical_path))
    }

    /// Force the strategy's lazy state to load, surfacing manifest errors at startup.
    pub fn warm(&self) -> Result<()> {
        self.strategy.warm()
    }

    /// Drop cached manifest data so the next resolution re-reads the source.
    pub fn invalidate(&self) {
        self.strategy.invalidate();
    }

    /// Strategy in use.
    pub fn strategy(&self) -> &Arc<dyn VersionStrategy> {
        &self.strategy
    }

    /// Prefix in use.
    pub fn prefix(&self) -> &BasePrefix {
        &self.prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssetError;
    use crate::format::FormatPattern;
    use crate::manifest::{FnSource, InlineSource, ManifestSource, ManifestStore};
    use crate::strategy::{ManifestStrategy, StaticSuffixStrategy};
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Barrier, Mutex};
    use std::thread;
    use std::time::Duration;

    const STYLE_HASH: &str = "91cd067f79a5839536b46c494c4272d8";

    fn manifest_resolver(source: impl ManifestSource + 'static, pattern: &str) -> AssetResolver {
        let store = Arc::new(ManifestStore::new(source));
        let pattern = FormatPattern::parse(pattern).expect("valid pattern");
        AssetResolver::new(Arc::new(ManifestStrategy::new(store, pattern)))
    }

    fn style_resolver() -> AssetResolver {
        manifest_resolver(
            InlineSource::new("style", format!(r#"{{"css/style.css":"{STYLE_HASH}"}}"#)),
            "%s?version=%s",
        )
    }

    #[test]
    fn resolves_listed_assets_with_their_version() {
        let resolver = style_resolver();
        assert_eq!(
            resolver.resolve("css/style.css").expect("resolve"),
            format!("css/style.css?version={STYLE_HASH}")
        );
    }

    #[test]
    fn unlisted_assets_resolve_to_themselves() {
        let resolver = style_resolver();
        assert_eq!(
            resolver.resolve("css/missing.css").expect("resolve"),
            "css/missing.css"
        );
    }

    #[test]
    fn resolution_is_idempotent_between_invalidations() {
        let resolver = style_resolver();
        let first = resolver.resolve("css/style.css").expect("resolve");
        let second = resolver.resolve("css/style.css").expect("resolve");
        assert_eq!(first, second);
    }

    #[test]
    fn rooted_paths_stay_rooted_without_prefix() {
        let resolver = style_resolver();
        assert_eq!(
            resolver.resolve("/css/style.css").expect("resolve"),
            format!("/css/style.css?version={STYLE_HASH}")
        );
        assert_eq!(resolver.resolve("/css/other.css").expect("resolve"), "/css/other.css");
    }

    #[test]
    fn base_path_is_prepended_to_package_relative_paths() {
        let resolver = style_resolver().with_base_path("/static/");
        assert_eq!(
            resolver.resolve("/css/style.css").expect("resolve"),
            format!("/static/css/style.css?version={STYLE_HASH}")
        );
        assert_eq!(
            resolver.resolve("css/missing.css").expect("resolve"),
            "/static/css/missing.css"
        );
    }

    #[test]
    fn base_url_is_prepended() {
        let resolver = style_resolver()
            .with_base_urls(["https://cdn.example.com/"])
            .expect("valid base url");
        assert_eq!(
            resolver.resolve("css/style.css").expect("resolve"),
            format!("https://cdn.example.com/css/style.css?version={STYLE_HASH}")
        );
    }

    #[test]
    fn absolute_references_pass_through() {
        let resolver = style_resolver().with_base_path("/static");
        for reference in [
            "https://example.com/app.js",
            "//cdn.example.com/app.js",
            "data:image/png;base64,AAAA",
            "",
        ] {
            assert_eq!(resolver.resolve(reference).expect("resolve"), reference);
        }
    }

    #[test]
    fn lookups_do_not_fold_case() {
        let resolver = style_resolver();
        assert_eq!(resolver.resolve("CSS/Style.css").expect("resolve"), "CSS/Style.css");
    }

    #[test]
    fn exposes_version_tokens() {
        let resolver = style_resolver();
        assert_eq!(resolver.version("/css/style.css").expect("version").as_str(), STYLE_HASH);
        assert!(resolver.version("nope.js").expect("version").is_empty());
    }

    #[test]
    fn absolute_references_have_no_version() {
        let reads = Arc::new(AtomicUsize::new(0));
        let source = {
            let reads = Arc::clone(&reads);
            FnSource::new("counted", move || {
                reads.fetch_add(1, Ordering::SeqCst);
                Ok(r#"{"cdn.example.com/app.js":"abc","":"def"}"#.to_string())
            })
        };
        let resolver = manifest_resolver(source, "{path}?{version}");

        for reference in ["//cdn.example.com/app.js", "https://cdn.example.com/app.js", ""] {
            assert!(resolver.version(reference).expect("version").is_empty());
        }
        assert_eq!(reads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn manifest_failures_propagate() {
        let resolver = manifest_resolver(
            FnSource::new("offline cdn", || Err(io::Error::other("connection refused"))),
            "{path}?{version}",
        );

        let err = resolver.resolve("a.js").expect_err("unreadable manifest");
        assert!(matches!(err, AssetError::ManifestUnreadable { .. }));
        assert!(resolver.warm().is_err());
    }

    #[test]
    fn parallel_first_calls_read_the_manifest_once() {
        let reads = Arc::new(AtomicUsize::new(0));
        let source = {
            let reads = Arc::clone(&reads);
            FnSource::new("slow", move || {
                reads.fetch_add(1, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(20));
                Ok(format!(r#"{{"css/style.css":"{STYLE_HASH}"}}"#))
            })
        };
        let resolver = manifest_resolver(source, "%s?version=%s");
        let workers = 12;
        let barrier = Barrier::new(workers);

        thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| {
                    barrier.wait();
                    let url = resolver.resolve("css/style.css").expect("resolve");
                    assert_eq!(url, format!("css/style.css?version={STYLE_HASH}"));
                });
            }
        });

        assert_eq!(reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn invalidate_picks_up_new_manifest_content() {
        let reads = Arc::new(AtomicUsize::new(0));
        let content = Arc::new(Mutex::new(r#"{"a.js":"old"}"#.to_string()));
        let source = {
            let reads = Arc::clone(&reads);
            let content = Arc::clone(&content);
            FnSource::new("mutable", move || {
                reads.fetch_add(1, Ordering::SeqCst);
                Ok(content.lock().expect("content lock").clone())
            })
        };
        let resolver = manifest_resolver(source, "{path}?{version}");

        assert_eq!(resolver.resolve("a.js").expect("resolve"), "a.js?old");
        *content.lock().expect("content lock") = r#"{"a.js":"new"}"#.to_string();
        assert_eq!(resolver.resolve("a.js").expect("resolve"), "a.js?old");

        resolver.invalidate();
        assert_eq!(resolver.resolve("a.js").expect("resolve"), "a.js?new");
        assert_eq!(resolver.resolve("a.js").expect("resolve"), "a.js?new");
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn static_suffix_with_prefix() {
        let pattern = FormatPattern::parse("v{version}/{path}").expect("pattern");
        let strategy = StaticSuffixStrategy::new("5", pattern);
        let resolver = AssetResolver::new(Arc::new(strategy)).with_base_path("assets");
        assert_eq!(resolver.resolve("app.js").expect("resolve"), "/assets/v5/app.js");
    }

    #[test]
    fn passthrough_resolver_only_normalizes_prefix() {
        let resolver = AssetResolver::passthrough();
        assert_eq!(resolver.resolve("js/app.js").expect("resolve"), "js/app.js");
        assert_eq!(resolver.resolve("/js/app.js").expect("resolve"), "/js/app.js");
    }
}
