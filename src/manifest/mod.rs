//! Manifest sources and the lazily populated manifest cache.

mod source;
mod store;

pub use source::{FileSource, FnSource, InlineSource, ManifestSource};
pub use store::ManifestStore;
