use crate::verify::Verdict;
use std::sync::{Arc, Mutex, MutexGuard};

/// Last completed verification outcome, shared between the verification
/// tasks that write it and the renderer that reads it. The lock is held
/// only for the assignment or the clone, never across a verification call.
/// Overlapping writers are serialized but not ordered by submission time;
/// the last one to take the lock wins.
#[derive(Clone, Default)]
pub struct MatchState {
    inner: Arc<Mutex<Verdict>>,
}

impl MatchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, verdict: Verdict) {
        *self.lock() = verdict;
    }

    pub fn get(&self) -> Verdict {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Verdict> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
