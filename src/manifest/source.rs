use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Where a manifest's raw text comes from.
///
/// The store calls [`ManifestSource::read`] at most once per load cycle, so implementations may
/// perform blocking I/O (file reads, HTTP fetches) without affecting the lookup hot path.
pub trait ManifestSource: Send + Sync {
    /// Read the full manifest text.
    fn read(&self) -> io::Result<String>;

    /// Human readable location used in errors and log lines.
    fn describe(&self) -> String;
}

/// Manifest stored on the local file system.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path the manifest is read from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ManifestSource for FileSource {
    fn read(&self) -> io::Result<String> {
        fs::read_to_string(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Manifest text held in memory, e.g. embedded with `include_str!`.
#[derive(Debug, Clone)]
pub struct InlineSource {
    label: String,
    content: String,
}

impl InlineSource {
    /// Create an in-memory source; `label` only appears in diagnostics.
    pub fn new(label: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            content: content.into(),
        }
    }
}

impl ManifestSource for InlineSource {
    fn read(&self) -> io::Result<String> {
        Ok(self.content.clone())
    }

    fn describe(&self) -> String {
        format!("inline:{}", self.label)
    }
}

/// Adapter turning a host closure (remote fetch, asset bundle lookup) into a source.
pub struct FnSource<F> {
    label: String,
    read: F,
}

impl<F> FnSource<F>
where
    F: Fn() -> io::Result<String> + Send + Sync,
{
    /// Wrap `read`; `label` only appears in diagnostics.
    pub fn new(label: impl Into<String>, read: F) -> Self {
        Self {
            label: label.into(),
            read,
        }
    }
}

impl<F> ManifestSource for FnSource<F>
where
    F: Fn() -> io::Result<String> + Send + Sync,
{
    fn read(&self) -> io::Result<String> {
        (self.read)()
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

impl<F> fmt::Debug for FnSource<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSource")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
