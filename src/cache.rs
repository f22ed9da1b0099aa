//! # Analysis Cache
//! Single-slot holder for the most recent [`AnalysisResult`].
//!
//! The slot is either empty or holds one complete result. Writers build the
//! result first and swap the `Arc` in; readers clone the `Arc` out. Neither
//! side holds the lock across an `.await`.

use std::sync::{Arc, PoisonError, RwLock};

use crate::model::AnalysisResult;

#[derive(Debug, Default)]
pub struct AnalysisCache {
    slot: RwLock<Option<Arc<AnalysisResult>>>,
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached result (overwrite, never merge). Returns the stored handle.
    pub fn store(&self, result: AnalysisResult) -> Arc<AnalysisResult> {
        let fresh = Arc::new(result);
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Arc::clone(&fresh));
        fresh
    }

    /// Current result, if an analysis has completed.
    pub fn snapshot(&self) -> Option<Arc<AnalysisResult>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_none()
    }
}
