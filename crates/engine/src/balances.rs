//! Per-participant totals: what each one consumed, paid, and their net
//! position.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Allocations, Expense, Money, Participant};

/// Totals of a single participant.
///
/// `balance = total_paid - total_share`: positive means the participant is
/// owed money, negative means they owe money, zero means settled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub total_share: Money,
    pub total_paid: Money,
    pub balance: Money,
}

/// Aggregates shares and payments for every participant.
///
/// An expense whose payer is unset or unknown still charges its sharers but
/// credits nobody.
pub fn compute_balances(
    expenses: &[Expense],
    allocations: &Allocations,
    participants: &[Participant],
) -> HashMap<Uuid, Balance> {
    participants
        .iter()
        .map(|participant| {
            let total_share: Money = expenses
                .iter()
                .map(|expense| allocations.share(expense.id, participant.id))
                .sum();
            let total_paid: Money = expenses
                .iter()
                .filter(|expense| expense.is_paid_by(participant.id))
                .map(|expense| paid_amount(expense, allocations))
                .sum();

            let balance = Balance {
                total_share,
                total_paid,
                balance: total_paid - total_share,
            };
            (participant.id, balance)
        })
        .collect()
}

/// Amount credited to the payer of `expense`.
///
/// Only expenses that were actually allocated credit their payer; this keeps
/// paid and shared totals drawn from the same pool of costs.
fn paid_amount(expense: &Expense, allocations: &Allocations) -> Money {
    if allocations.expense(expense.id).is_some() {
        expense.cost
    } else {
        Money::ZERO
    }
}
