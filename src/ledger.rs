use rustc_hash::FxHashSet;

use crate::model::Configuration;

/// Result of offering a configuration to the ledger.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mark {
    New,
    Seen,
    /// The state cap was reached before this unseen configuration could be recorded.
    Full,
}

/// Configurations already reached during one search call.
#[derive(Debug, Default)]
pub struct VisitedLedger {
    seen: FxHashSet<Configuration>,
    limit: Option<usize>,
}

impl VisitedLedger {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            seen: FxHashSet::default(),
            limit,
        }
    }

    pub fn contains(&self, state: &Configuration) -> bool {
        self.seen.contains(state)
    }

    /// Records `state` if it has not been reached before.
    pub fn mark(&mut self, state: &Configuration) -> Mark {
        if self.seen.contains(state) {
            return Mark::Seen;
        }
        if self.limit.is_some_and(|limit| self.seen.len() >= limit) {
            return Mark::Full;
        }
        self.seen.insert(state.clone());
        Mark::New
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
