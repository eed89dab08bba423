#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod manifest;
pub mod models;
pub mod packages;
pub mod resolver;
pub mod strategy;

pub use config::{AssetsConfig, PackageConfig, StrategyConfig};
pub use error::{AssetError, Result};
pub use format::FormatPattern;
pub use manifest::{FileSource, FnSource, InlineSource, ManifestSource, ManifestStore};
pub use models::{Manifest, VersionToken};
pub use packages::Packages;
pub use resolver::AssetResolver;
pub use strategy::{ManifestStrategy, NullStrategy, StaticSuffixStrategy, VersionStrategy};
