//! Version strategies deciding which token, if any, an asset path receives.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::format::{FormatPattern, default_pattern};
use crate::manifest::ManifestStore;
use crate::models::VersionToken;

/// Trait implemented by every versioning policy, built-in or host supplied.
///
/// Lookups never fail for unknown paths: they yield an empty token and the path is served
/// unversioned. The only error a strategy may return is a manifest that could not be loaded.
pub trait VersionStrategy: Send + Sync + fmt::Debug {
    /// Version token for `path`; empty when no version is known.
    fn version(&self, path: &str) -> Result<VersionToken>;

    /// Template used to combine a path with a non-empty token.
    fn pattern(&self) -> &FormatPattern {
        default_pattern()
    }

    /// Versioned form of `path`, or `path` itself when the token is empty.
    fn apply_version(&self, path: &str) -> Result<String> {
        let version = self.version(path)?;
        if version.is_empty() {
            return Ok(path.to_string());
        }
        Ok(self.pattern().apply(path, &version))
    }

    /// Drop cached state so the next lookup observes fresh data.
    fn invalidate(&self) {}

    /// Load any lazily cached state now, surfacing configuration errors early.
    fn warm(&self) -> Result<()> {
        Ok(())
    }

    /// Short description for diagnostics.
    fn describe(&self) -> String {
        format!("{self:?}")
    }
}

/// Looks tokens up in a content-addressed manifest loaded on first use.
#[derive(Debug, Clone)]
pub struct ManifestStrategy {
    store: Arc<ManifestStore>,
    pattern: FormatPattern,
}

impl ManifestStrategy {
    /// Create a strategy reading tokens from `store` and formatting them with `pattern`.
    pub fn new(store: Arc<ManifestStore>, pattern: FormatPattern) -> Self {
        Self { store, pattern }
    }

    /// Shared manifest store backing this strategy.
    pub fn store(&self) -> &Arc<ManifestStore> {
        &self.store
    }
}

impl VersionStrategy for ManifestStrategy {
    fn version(&self, path: &str) -> Result<VersionToken> {
        let manifest = self.store.load()?;
        let version = manifest.version_of(path);
        if version.is_empty() {
            tracing::debug!(path, "asset not listed in manifest, serving unversioned");
        }
        Ok(version)
    }

    fn pattern(&self) -> &FormatPattern {
        &self.pattern
    }

    fn invalidate(&self) {
        self.store.invalidate();
    }

    fn warm(&self) -> Result<()> {
        self.store.load().map(|_| ())
    }

    /// Reports the entry count only when the manifest is already loaded; never reads the source.
    fn describe(&self) -> String {
        let source = self.store.source_description();
        match self.store.snapshot() {
            Some(manifest) => format!("manifest {source} ({} entries)", manifest.len()),
            None => format!("manifest {source} (not loaded)"),
        }
    }
}

/// Applies one fixed token to every path, e.g. a release number.
#[derive(Debug, Clone)]
pub struct StaticSuffixStrategy {
    version: VersionToken,
    pattern: FormatPattern,
}

impl StaticSuffixStrategy {
    /// Create a strategy stamping every path with `version`.
    pub fn new(version: impl Into<String>, pattern: FormatPattern) -> Self {
        Self {
            version: VersionToken::new(version),
            pattern,
        }
    }
}

impl VersionStrategy for StaticSuffixStrategy {
    fn version(&self, _path: &str) -> Result<VersionToken> {
        Ok(self.version.clone())
    }

    fn pattern(&self) -> &FormatPattern {
        &self.pattern
    }

    fn describe(&self) -> String {
        format!("static suffix {:?}", self.version.as_str())
    }
}

/// Never versions anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStrategy;

impl VersionStrategy for NullStrategy {
    fn version(&self, _path: &str) -> Result<VersionToken> {
        Ok(VersionToken::empty())
    }

    fn apply_version(&self, path: &str) -> Result<String> {
        Ok(path.to_string())
    }

    fn describe(&self) -> String {
        "unversioned".to_string()
    }
}
