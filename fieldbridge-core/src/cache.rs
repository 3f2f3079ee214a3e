//! Process-wide single-flight cache keyed by [`PlanKey`].

use crate::error::ConvertResult;
use crate::plan::{ConversionPlan, PlanKey};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

type Slot<T> = Arc<OnceLock<ConvertResult<Arc<T>>>>;

/// Lifecycle of one key in a [`ConversionCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanState {
    Unresolved,
    /// A build is in flight; other callers wait for it.
    Resolving,
    Ready,
    /// The build failed. The failure is returned to every later caller.
    Failed,
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub entries: usize,
    /// Number of build closures that actually ran.
    pub builds: usize,
}

/// Append-only map from [`PlanKey`] to a built value.
///
/// Each key owns a `OnceLock` cell. The first caller to miss runs the
/// build while concurrent callers for the same key block on the cell, then
/// every caller gets the same `Arc`. Entries are never evicted.
pub struct ConversionCache<T> {
    slots: RwLock<HashMap<PlanKey, Slot<T>>>,
    builds: AtomicUsize,
}

impl<T> ConversionCache<T> {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            builds: AtomicUsize::new(0),
        }
    }

    /// Returns the value for `key`, running `build` only if no caller has
    /// built it yet. A failed build is cached like a successful one.
    pub fn get_or_build<F>(&self, key: PlanKey, build: F) -> ConvertResult<Arc<T>>
    where
        F: FnOnce() -> ConvertResult<T>,
    {
        let slot = self.slot(key);
        slot.get_or_init(|| {
            self.builds.fetch_add(1, Ordering::SeqCst);
            build().map(Arc::new)
        })
        .clone()
    }

    /// Returns the finished value for `key` without building.
    pub fn get(&self, key: PlanKey) -> Option<ConvertResult<Arc<T>>> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.get(&key).and_then(|slot| slot.get().cloned())
    }

    pub fn state(&self, key: PlanKey) -> PlanState {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        match slots.get(&key).map(|slot| slot.get()) {
            None => PlanState::Unresolved,
            Some(None) => PlanState::Resolving,
            Some(Some(Ok(_))) => PlanState::Ready,
            Some(Some(Err(_))) => PlanState::Failed,
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            builds: self.builds.load(Ordering::SeqCst),
        }
    }

    pub fn len(&self) -> usize {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, key: PlanKey) -> Slot<T> {
        if let Some(slot) = self
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Arc::clone(slot);
        }
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(key).or_default())
    }
}

impl ConversionCache<ConversionPlan> {
    /// Process-wide plan cache, created on first use and kept for the
    /// lifetime of the process.
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<ConversionCache<ConversionPlan>>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::new())))
    }
}

impl<T> Default for ConversionCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ConversionCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats();
        f.debug_struct("ConversionCache")
            .field("entries", &stats.entries)
            .field("builds", &stats.builds)
            .finish()
    }
}
