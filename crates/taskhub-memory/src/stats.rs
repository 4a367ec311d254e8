//! Per-operation call counters.

use std::collections::HashMap;

use taskhub_core::RemoteOp;

/// Snapshot of how many times each remote operation was called.
///
/// Failed calls count too.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallStats {
    calls: HashMap<RemoteOp, usize>,
}

impl CallStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, op: RemoteOp) {
        *self.calls.entry(op).or_default() += 1;
    }

    /// Number of calls of `op`.
    #[must_use]
    pub fn get(&self, op: RemoteOp) -> usize {
        self.calls.get(&op).copied().unwrap_or(0)
    }

    /// Number of calls that mutate remote state.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.calls
            .iter()
            .filter(|(op, _)| op.is_write())
            .map(|(_, n)| n)
            .sum()
    }

    /// Total number of calls.
    #[must_use]
    pub fn total(&self) -> usize {
        self.calls.values().sum()
    }
}
