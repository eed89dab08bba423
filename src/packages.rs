//! Registry of named asset packages sharing one resolution entry point.

use std::collections::BTreeMap;

use crate::error::{AssetError, Result};
use crate::resolver::AssetResolver;

/// Name reported when the default package is requested but not configured.
pub const DEFAULT_PACKAGE: &str = "default";

/// A default resolver plus any number of named resolvers.
///
/// Named packages let one application serve, for instance, first-party bundles from a manifest
/// and vendor files from a CDN with a static release suffix.
#[derive(Debug, Clone, Default)]
pub struct Packages {
    default: Option<AssetResolver>,
    named: BTreeMap<String, AssetResolver>,
}

impl Packages {
    /// Create a registry with `default` as the unnamed package.
    pub fn new(default: AssetResolver) -> Self {
        Self {
            default: Some(default),
            named: BTreeMap::new(),
        }
    }

    /// Replace the default package.
    pub fn set_default(&mut self, resolver: AssetResolver) {
        self.default = Some(resolver);
    }

    /// Register (or replace) a named package.
    pub fn insert(&mut self, name: impl Into<String>, resolver: AssetResolver) {
        self.named.insert(name.into(), resolver);
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with_package(mut self, name: impl Into<String>, resolver: AssetResolver) -> Self {
        self.insert(name, resolver);
        self
    }

    /// The default package, if one is configured.
    pub fn default_package(&self) -> Result<&AssetResolver> {
        self.default.as_ref().ok_or_else(|| AssetError::UnknownPackage {
            name: DEFAULT_PACKAGE.to_string(),
        })
    }

    /// Look up a package by name; `None` selects the default package.
    pub fn package(&self, name: Option<&str>) -> Result<&AssetResolver> {
        match name {
            None => self.default_package(),
            Some(name) => self.named.get(name).ok_or_else(|| AssetError::UnknownPackage {
                name: name.to_string(),
            }),
        }
    }

    /// Resolve `path` through the selected package.
    pub fn url(&self, path: &str, package: Option<&str>) -> Result<String> {
        self.package(package)?.resolve(path)
    }

    /// Names of the registered named packages, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.named.keys().map(String::as_str)
    }

    /// Every package with its display name, default first.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AssetResolver)> {
        self
            .default
            .iter()
            .map(|resolver| (DEFAULT_PACKAGE, resolver))
            .chain(self.named.iter().map(|(name, resolver)| (name.as_str(), resolver)))
    }

    /// Invalidate the manifest cache of every package.
    pub fn invalidate_all(&self) {
        for (_, resolver) in self.iter() {
            resolver.invalidate();
        }
    }

    /// Load every package's manifest now, stopping at the first failure.
    pub fn warm_all(&self) -> Result<()> {
        for (name, resolver) in self.iter() {
            resolver.warm()?;
            tracing::debug!(package = name, "asset package warmed");
        }
        Ok(())
    }
}
