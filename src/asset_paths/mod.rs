//! Helpers for normalising logical asset paths and building their public prefixes.
//!
//! Filtering of absolute references, lookup-key normalisation and base prefix selection live in
//! focused submodules so each rule can be tested on its own.

mod base;
mod filters;
mod normalize;

pub use base::BasePrefix;
pub use filters::{is_absolute_url, is_base_url};
pub use normalize::{join_prefix, lookup_key, normalize_base_path};
