use crate::error::{AssetError, Result};

use super::filters::is_base_url;
use super::normalize::{join_prefix, normalize_base_path};

/// Prefix applied to versioned paths after the strategy has run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BasePrefix {
    /// Paths are returned as produced by the strategy.
    #[default]
    None,
    /// Paths are served below a local base path such as `/static`.
    Path(String),
    /// Paths are served from one of several CDN hosts.
    Urls(Vec<String>),
}

impl BasePrefix {
    /// Build a base-path prefix; empty or `/` collapses to the site root.
    pub fn path(base_path: &str) -> Self {
        Self::Path(normalize_base_path(base_path))
    }

    /// Build a base-URL prefix, validating that every entry names a host.
    ///
    /// An empty list yields [`BasePrefix::None`].
    pub fn urls<I, S>(base_urls: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut urls = Vec::new();
        for url in base_urls {
            let url = url.as_ref().trim();
            if !is_base_url(url) {
                return Err(AssetError::InvalidBaseUrl {
                    url: url.to_string(),
                });
            }
            urls.push(url.trim_end_matches('/').to_string());
        }

        Ok(if urls.is_empty() {
            Self::None
        } else {
            Self::Urls(urls)
        })
    }

    /// Returns `true` when paths are package-relative and receive a prefix.
    pub fn is_some(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Prefix `versioned`, which must already be package-relative.
    pub fn apply(&self, versioned: &str) -> String {
        match self {
            Self::None => versioned.to_string(),
            Self::Path(base) => join_prefix(base, versioned),
            Self::Urls(urls) => join_prefix(choose_base_url(urls, versioned), versioned),
        }
    }
}

/// Pick the base URL for `path` so that one asset always maps to the same host.
fn choose_base_url<'a>(urls: &'a [String], path: &str) -> &'a str {
    if urls.len() == 1 {
        return &urls[0];
    }
    let index = crc32fast::hash(path.as_bytes()) as usize % urls.len();
    &urls[index]
}
