//! Even split of each expense across the participants sharing it.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{Expense, Money, Participant};

/// Per-participant share of a single expense.
pub type ExpenseShares = HashMap<Uuid, Money>;

/// Shares of every expense that contributes something, keyed by expense id.
///
/// Expenses with a non-positive cost or without included participants have
/// no entry at all: a missing entry means "contributes nothing".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Allocations {
    by_expense: HashMap<Uuid, ExpenseShares>,
}

impl Allocations {
    pub fn expense(&self, expense_id: Uuid) -> Option<&ExpenseShares> {
        self.by_expense.get(&expense_id)
    }

    /// Share of `participant` in `expense_id`, or zero when there is none.
    pub fn share(&self, expense_id: Uuid, participant: Uuid) -> Money {
        self.expense(expense_id)
            .and_then(|shares| shares.get(&participant))
            .copied()
            .unwrap_or(Money::ZERO)
    }

    pub fn len(&self) -> usize {
        self.by_expense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_expense.is_empty()
    }
}

/// Splits each expense evenly across its included participants.
///
/// Only ids present in `participants` count towards the split. Costs above
/// [`Money::max`] are skipped like non-positive ones. Division is exact;
/// rounding to currency units happens later, in the ledger.
pub fn allocate(expenses: &[Expense], participants: &[Participant]) -> Allocations {
    let mut by_expense = HashMap::with_capacity(expenses.len());

    for expense in expenses {
        if !expense.cost.is_positive() {
            tracing::trace!(expense = %expense.id, cost = %expense.cost, "skipping non-positive cost");
            continue;
        }
        if !expense.cost.is_within_limit() {
            tracing::warn!(expense = %expense.id, "skipping cost above the accepted limit");
            continue;
        }

        let included: Vec<Uuid> = expense.included(participants).map(|p| p.id).collect();
        let Some(share) = expense.cost.split(included.len()) else {
            tracing::trace!(expense = %expense.id, "skipping expense without participants");
            continue;
        };

        let shares: ExpenseShares = included.into_iter().map(|id| (id, share)).collect();
        by_expense.insert(expense.id, shares);
    }

    Allocations { by_expense }
}
