//! Error taxonomy shared by every part of the resolver.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors raised while configuring a resolver or loading its manifest.
///
/// A path missing from the manifest is not an error: lookups fall back to the unversioned path.
/// Variants are `Clone` so a memoized manifest failure can be returned to every caller.
#[derive(Debug, Clone, Error)]
pub enum AssetError {
    /// The manifest source could not be read (missing file, failed fetch).
    #[error("manifest unreadable at {location}: {source}")]
    ManifestUnreadable {
        /// Human readable description of the manifest source.
        location: String,
        /// Underlying I/O failure.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The manifest content is not a flat object of string keys to string values.
    #[error("manifest malformed at {location}: {reason}")]
    ManifestMalformed {
        /// Human readable description of the manifest source.
        location: String,
        /// Parser message describing the problem.
        reason: String,
    },

    /// The URL format pattern does not hold exactly one path and one version placeholder.
    #[error("invalid format pattern {pattern:?}: {reason}")]
    InvalidFormatPattern {
        /// Pattern as configured.
        pattern: String,
        /// Why the pattern was rejected.
        reason: String,
    },

    /// A configured base URL is not absolute.
    #[error("invalid base url {url:?}: expected scheme://host or //host")]
    InvalidBaseUrl {
        /// Base URL as configured.
        url: String,
    },

    /// No package is registered under the requested name.
    #[error("unknown asset package {name:?}")]
    UnknownPackage {
        /// Requested package name.
        name: String,
    },

    /// A manifest-backed strategy was selected without a manifest location.
    #[error("package {package:?} uses the manifest strategy but no manifest_path is set")]
    MissingManifestSource {
        /// Package that lacks a manifest location.
        package: String,
    },

    /// The configuration file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    ConfigUnreadable {
        /// Configuration file path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The configuration file is not valid JSON for the expected layout.
    #[error("failed to parse {}: {source}", .path.display())]
    ConfigMalformed {
        /// Configuration file path.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: Arc<serde_json::Error>,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AssetError>;

impl AssetError {
    pub(crate) fn invalid_pattern(pattern: &str, reason: impl Into<String>) -> Self {
        Self::InvalidFormatPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for failures that come from loading the manifest source.
    pub fn is_manifest_error(&self) -> bool {
        matches!(
            self,
            Self::ManifestUnreadable { .. } | Self::ManifestMalformed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_manifest_reports_location_and_cause() {
        let err = AssetError::ManifestUnreadable {
            location: "file public/manifest.json".into(),
            source: Arc::new(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no such file",
            )),
        };

        let message = err.to_string();
        assert!(message.contains("public/manifest.json"));
        assert!(message.contains("no such file"));
        assert!(err.is_manifest_error());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn pattern_errors_are_not_manifest_errors() {
        let err = AssetError::invalid_pattern("%s", "missing version placeholder");
        assert!(!err.is_manifest_error());
        assert_eq!(
            err.to_string(),
            "invalid format pattern \"%s\": missing version placeholder"
        );
    }

    #[test]
    fn clones_share_the_underlying_cause() {
        let err = AssetError::ManifestUnreadable {
            location: "inline".into(),
            source: Arc::new(std::io::Error::other("boom")),
        };
        let copy = err.clone();
        assert_eq!(err.to_string(), copy.to_string());
    }
}
