//! Memoization of settlement passes.
//!
//! The engine is a pure function of its inputs, so a caller redrawing the
//! same snapshot can skip the computation. The cache keeps exactly one
//! snapshot and its result; any difference in participants, expenses or mode
//! triggers a recomputation.

use crate::{Expense, Participant, Settlement, SettlementMode, settle};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Snapshot {
    participants: Vec<Participant>,
    expenses: Vec<Expense>,
    mode: SettlementMode,
}

impl Snapshot {
    fn matches(
        &self,
        participants: &[Participant],
        expenses: &[Expense],
        mode: SettlementMode,
    ) -> bool {
        self.mode == mode && self.participants == participants && self.expenses == expenses
    }
}

#[derive(Debug, Default)]
pub struct SettlementCache {
    entry: Option<(Snapshot, Settlement)>,
    hits: u64,
    misses: u64,
}

impl SettlementCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the settlement for the snapshot, computing it only if it differs
    /// from the cached one.
    pub fn get_or_compute(
        &mut self,
        participants: &[Participant],
        expenses: &[Expense],
        mode: SettlementMode,
    ) -> &Settlement {
        let entry = match self.entry.take() {
            Some(entry) if entry.0.matches(participants, expenses, mode) => {
                self.hits += 1;
                tracing::trace!(hits = self.hits, "settlement cache hit");
                entry
            }
            _ => {
                self.misses += 1;
                tracing::debug!(misses = self.misses, "settlement cache miss");
                let snapshot = Snapshot {
                    participants: participants.to_vec(),
                    expenses: expenses.to_vec(),
                    mode,
                };
                (snapshot, settle(participants, expenses, mode))
            }
        };

        &self.entry.insert(entry).1
    }

    /// Forgets the cached snapshot.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
