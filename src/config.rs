//! Configuration loader describing packages, manifests and URL formats.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use crate::asset_paths::BasePrefix;
use crate::error::{AssetError, Result};
use crate::format::{DEFAULT_FORMAT, FormatPattern};
use crate::manifest::{FileSource, ManifestStore};
use crate::packages::{DEFAULT_PACKAGE, Packages};
use crate::resolver::AssetResolver;
use crate::strategy::{ManifestStrategy, NullStrategy, StaticSuffixStrategy, VersionStrategy};

/// File name searched for by [`AssetsConfig::discover`].
pub const DEFAULT_CONFIG_FILE: &str = "assets.config.json";

/// Strategy selection as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// Look tokens up in the package's manifest.
    Manifest,
    /// Append the same token to every path.
    StaticSuffix {
        /// Token applied to every asset.
        version: String,
    },
    /// Never version paths.
    Null,
}

/// Settings for one package. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackageConfig {
    /// Location of the JSON manifest, relative to the configuration file.
    pub manifest_path: Option<PathBuf>,
    /// URL format pattern; defaults to [`DEFAULT_FORMAT`].
    pub format: Option<String>,
    /// Strategy; inferred from `manifest_path` when omitted.
    pub strategy: Option<StrategyConfig>,
    /// Local base path such as `/static`.
    pub base_path: Option<String>,
    /// CDN base URLs; one is chosen per asset.
    pub base_urls: Vec<String>,
}

/// Discoverable configuration: a default package plus named packages.
///
/// Named packages inherit `manifest_path`, `format` and `strategy` from the top level when they
/// leave them unset. Prefixes are never inherited.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Settings of the default package.
    #[serde(flatten)]
    pub default: PackageConfig,
    /// Named packages.
    pub packages: BTreeMap<String, PackageConfig>,
    /// Directory relative manifest paths resolve against.
    #[serde(skip)]
    pub root: PathBuf,
}

impl AssetsConfig {
    /// Load the configuration from `dir`, falling back to defaults when the file does not exist.
    ///
    /// A file that exists but cannot be read or parsed is still an error.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        match Self::from_path(&candidate) {
            Err(AssetError::ConfigUnreadable { source, .. })
                if source.kind() == ErrorKind::NotFound =>
            {
                tracing::debug!(
                    path = %candidate.display(),
                    "no asset config found, using defaults"
                );
                Ok(Self {
                    root: dir.to_path_buf(),
                    ..Self::default()
                })
            }
            other => other,
        }
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| AssetError::ConfigUnreadable {
            path: path.to_path_buf(),
            source: Arc::new(err),
        })?;
        let mut config: Self =
            serde_json::from_str(&content).map_err(|err| AssetError::ConfigMalformed {
                path: path.to_path_buf(),
                source: Arc::new(err),
            })?;
        config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(config)
    }

    /// Validate every package and build the resolver registry.
    ///
    /// Patterns and base URLs are checked here so that request-time resolution cannot hit a
    /// configuration error. Manifests are not read yet; packages pointing at the same manifest
    /// file share one store.
    pub fn build(&self) -> Result<Packages> {
        let mut stores: BTreeMap<PathBuf, Arc<ManifestStore>> = BTreeMap::new();

        let default = self.build_package(DEFAULT_PACKAGE, &self.default, &mut stores)?;
        let mut packages = Packages::new(default);
        for (name, package) in &self.packages {
            let effective = PackageConfig {
                manifest_path: package
                    .manifest_path
                    .clone()
                    .or_else(|| self.default.manifest_path.clone()),
                format: package.format.clone().or_else(|| self.default.format.clone()),
                strategy: package.strategy.clone().or_else(|| self.default.strategy.clone()),
                base_path: package.base_path.clone(),
                base_urls: package.base_urls.clone(),
            };
            packages.insert(name.clone(), self.build_package(name, &effective, &mut stores)?);
        }

        Ok(packages)
    }

    fn build_package(
        &self,
        name: &str,
        package: &PackageConfig,
        stores: &mut BTreeMap<PathBuf, Arc<ManifestStore>>,
    ) -> Result<AssetResolver> {
        let pattern = FormatPattern::parse(package.format.as_deref().unwrap_or(DEFAULT_FORMAT))?;

        let strategy: Arc<dyn VersionStrategy> = match package.effective_strategy() {
            StrategyConfig::Manifest => {
                let relative = package
                    .manifest_path
                    .as_ref()
                    .ok_or_else(|| AssetError::MissingManifestSource {
                        package: name.to_string(),
                    })?;
                let path = self.root.join(relative);
                let store = stores
                    .entry(path.clone())
                    .or_insert_with(|| Arc::new(ManifestStore::new(FileSource::new(path))));
                Arc::new(ManifestStrategy::new(Arc::clone(store), pattern))
            }
            StrategyConfig::StaticSuffix { version } => {
                Arc::new(StaticSuffixStrategy::new(version, pattern))
            }
            StrategyConfig::Null => Arc::new(NullStrategy),
        };

        let prefix = if !package.base_urls.is_empty() {
            BasePrefix::urls(&package.base_urls)?
        } else if let Some(base_path) = &package.base_path {
            BasePrefix::path(base_path)
        } else {
            BasePrefix::None
        };

        Ok(AssetResolver::new(strategy).with_prefix(prefix))
    }
}

impl PackageConfig {
    /// Strategy to use, inferring `manifest` when a manifest path is configured.
    pub fn effective_strategy(&self) -> StrategyConfig {
        match (&self.strategy, &self.manifest_path) {
            (Some(strategy), _) => strategy.clone(),
            (None, Some(_)) => StrategyConfig::Manifest,
            (None, None) => StrategyConfig::Null,
        }
    }
}
