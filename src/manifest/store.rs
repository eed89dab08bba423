use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use super::source::ManifestSource;
use crate::error::{AssetError, Result};
use crate::models::Manifest;

/// Cached state of a [`ManifestStore`].
#[derive(Debug, Clone)]
enum StoreState {
    Unloaded,
    Loaded(Arc<Manifest>),
    Failed(AssetError),
}

/// Lazily loads a manifest from its source and memoizes the outcome.
///
/// The first [`load`](Self::load) reads and parses the source; later calls hand out the same
/// `Arc<Manifest>` snapshot (or the same error) until [`invalidate`](Self::invalidate) is called.
/// Concurrent cold callers are serialized on a load gate so the source is read once per cycle.
/// An invalidation that lands while a read is in flight discards that read's result.
pub struct ManifestStore {
    source: Box<dyn ManifestSource>,
    state: RwLock<StoreState>,
    load_gate: Mutex<()>,
    /// Bumped by every invalidation, under the state write lock.
    generation: AtomicU64,
    reads: AtomicUsize,
}

impl ManifestStore {
    /// Create an unloaded store backed by `source`. Nothing is read until first use.
    pub fn new(source: impl ManifestSource + 'static) -> Self {
        Self::from_boxed(Box::new(source))
    }

    /// Create an unloaded store from an already boxed source.
    pub fn from_boxed(source: Box<dyn ManifestSource>) -> Self {
        Self {
            source,
            state: RwLock::new(StoreState::Unloaded),
            load_gate: Mutex::new(()),
            generation: AtomicU64::new(0),
            reads: AtomicUsize::new(0),
        }
    }

    /// Return the cached manifest, loading it on first use.
    pub fn load(&self) -> Result<Arc<Manifest>> {
        if let Some(outcome) = self.cached() {
            return outcome;
        }

        let _gate = self.load_gate.lock().unwrap_or_else(PoisonError::into_inner);

        loop {
            // Another caller may have finished loading while we waited on the gate.
            if let Some(outcome) = self.cached() {
                return outcome;
            }

            let generation = self.generation.load(Ordering::Acquire);
            let outcome = self.read_source();

            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            if self.generation.load(Ordering::Acquire) == generation {
                *state = match &outcome {
                    Ok(manifest) => StoreState::Loaded(Arc::clone(manifest)),
                    Err(err) => StoreState::Failed(err.clone()),
                };
                return outcome;
            }
            drop(state);

            tracing::debug!(
                source = %self.source.describe(),
                "manifest invalidated while loading, reading it again"
            );
        }
    }

    /// The loaded manifest, if any, without triggering a load.
    pub fn snapshot(&self) -> Option<Arc<Manifest>> {
        match &*self.state.read().unwrap_or_else(PoisonError::into_inner) {
            StoreState::Loaded(manifest) => Some(Arc::clone(manifest)),
            StoreState::Unloaded | StoreState::Failed(_) => None,
        }
    }

    /// Drop the cached manifest (or cached failure) so the next load reads the source again.
    pub fn invalidate(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if !matches!(*state, StoreState::Unloaded) {
            tracing::debug!(source = %self.source.describe(), "manifest cache invalidated");
        }
        self.generation.fetch_add(1, Ordering::AcqRel);
        *state = StoreState::Unloaded;
    }

    /// Invalidate and immediately load a fresh manifest.
    pub fn reload(&self) -> Result<Arc<Manifest>> {
        self.invalidate();
        self.load()
    }

    /// Returns `true` once a manifest has been loaded successfully and not invalidated since.
    pub fn is_loaded(&self) -> bool {
        matches!(
            *self.state.read().unwrap_or_else(PoisonError::into_inner),
            StoreState::Loaded(_)
        )
    }

    /// Number of times the underlying source has been read.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    /// Description of the backing source.
    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    fn cached(&self) -> Option<Result<Arc<Manifest>>> {
        match &*self.state.read().unwrap_or_else(PoisonError::into_inner) {
            StoreState::Unloaded => None,
            StoreState::Loaded(manifest) => Some(Ok(Arc::clone(manifest))),
            StoreState::Failed(err) => Some(Err(err.clone())),
        }
    }

    fn read_source(&self) -> Result<Arc<Manifest>> {
        let location = self.source.describe();
        self.reads.fetch_add(1, Ordering::Relaxed);

        let content = self.source.read().map_err(|err| {
            tracing::warn!(source = %location, error = %err, "failed to read asset manifest");
            AssetError::ManifestUnreadable {
                location: location.clone(),
                source: Arc::new(err),
            }
        })?;

        let manifest = Manifest::from_json(&content).map_err(|err| {
            tracing::warn!(source = %location, error = %err, "failed to parse asset manifest");
            AssetError::ManifestMalformed {
                location: location.clone(),
                reason: err.to_string(),
            }
        })?;

        let rooted = manifest.paths().filter(|path| path.starts_with('/')).count();
        if rooted > 0 {
            tracing::warn!(
                source = %location,
                rooted,
                "manifest keys with a leading slash never match normalized lookups"
            );
        }

        tracing::info!(source = %location, entries = manifest.len(), "asset manifest loaded");
        Ok(Arc::new(manifest))
    }
}

impl fmt::Debug for ManifestStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManifestStore")
            .field("source", &self.source.describe())
            .field("loaded", &self.is_loaded())
            .field("reads", &self.reads())
            .finish()
    }
}
