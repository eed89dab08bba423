//! Data structures shared by the manifest store, strategies and resolvers.

use std::collections::HashMap;
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;

/// Opaque identifier distinguishing asset revisions, usually a content digest.
///
/// The empty token means "no version available"; strategies return it for unknown paths and
/// resolvers then leave the path unversioned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct VersionToken(String);

impl VersionToken {
    /// Wrap a raw token value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The token signalling that no version is known for a path.
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Returns `true` when no version is available.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the raw token value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Option<&str>> for VersionToken {
    fn from(value: Option<&str>) -> Self {
        value.map(Self::new).unwrap_or_default()
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable mapping from asset path to version token.
///
/// Keys are relative, forward-slash separated paths matched exactly (case-sensitive). A manifest
/// is never mutated after it is built; reloading produces a fresh instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: HashMap<String, String>,
}

impl Manifest {
    /// Parse a flat JSON object of string keys to string values.
    ///
    /// Nested values, non-string values and duplicate keys are rejected.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Look up the raw token stored for `path`.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    /// Version token for `path`, empty when the path is not listed.
    pub fn version_of(&self, path: &str) -> VersionToken {
        VersionToken::from(self.get(path))
    }

    /// Returns `true` when `path` has an entry.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Number of entries in the manifest.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the manifest has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the asset paths listed in the manifest, in no particular order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for Manifest
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl<'de> Deserialize<'de> for Manifest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ManifestVisitor)
    }
}

struct ManifestVisitor;

impl<'de> Visitor<'de> for ManifestVisitor {
    type Value = Manifest;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a flat object mapping asset paths to version strings")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = HashMap::with_capacity(access.size_hint().unwrap_or(0));

        while let Some((path, version)) = access.next_entry::<String, String>()? {
            if entries.contains_key(&path) {
                return Err(de::Error::custom(format_args!(
                    "duplicate asset path {path:?}"
                )));
            }
            entries.insert(path, version);
        }

        Ok(Manifest { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_objects() {
        let manifest =
            Manifest::from_json(r#"{ "js/script.js": "f9c7afd05729f10f55b689f36bb20172" }"#)
                .expect("flat manifest should parse");

        assert_eq!(manifest.len(), 1);
        assert_eq!(
            manifest.get("js/script.js"),
            Some("f9c7afd05729f10f55b689f36bb20172")
        );
    }

    #[test]
    fn lookups_are_exact_and_case_sensitive() {
        let manifest: Manifest = [("css/Style.css", "abc")].into_iter().collect();

        assert!(manifest.contains("css/Style.css"));
        assert!(!manifest.contains("css/style.css"));
        assert!(!manifest.contains("/css/Style.css"));
        assert!(manifest.version_of("css/style.css").is_empty());
    }

    #[test]
    fn rejects_duplicate_keys() {
        let err = Manifest::from_json(r#"{ "a.js": "1", "a.js": "2" }"#)
            .expect_err("duplicate keys must be rejected");
        assert!(err.to_string().contains("duplicate asset path"));
    }

    #[test]
    fn rejects_non_string_values() {
        assert!(Manifest::from_json(r#"{ "a.js": 1 }"#).is_err());
        assert!(Manifest::from_json(r#"{ "a.js": { "hash": "1" } }"#).is_err());
    }

    #[test]
    fn rejects_non_object_documents() {
        assert!(Manifest::from_json(r#"["a.js"]"#).is_err());
        assert!(Manifest::from_json("not json").is_err());
    }

    #[test]
    fn empty_object_is_an_empty_manifest() {
        let manifest = Manifest::from_json("{}").expect("empty object is valid");
        assert!(manifest.is_empty());
    }

    #[test]
    fn missing_token_is_empty() {
        assert!(VersionToken::from(None).is_empty());
        assert_eq!(VersionToken::from(Some("v1")).as_str(), "v1");
        assert_eq!(VersionToken::new("v2").to_string(), "v2");
    }
}
