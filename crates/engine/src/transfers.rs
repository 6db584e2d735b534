//! Flat list of settlement instructions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Ledger, Money};

/// Pay `amount` from `from` to `to`. Always `from != to` and `amount > 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: Uuid,
    pub to: Uuid,
    pub amount: Money,
}

/// Flattens the ledger into transfers, one per give.
///
/// Order is participant order, then give order. Takes are not read: every
/// net obligation already appears once as a give.
pub fn flatten(ledger: &Ledger) -> Vec<Transfer> {
    ledger
        .iter()
        .flat_map(|account| {
            account.gives.iter().map(move |give| Transfer {
                from: account.participant,
                to: give.to,
                amount: give.amount,
            })
        })
        .filter(|transfer| {
            let keep = transfer.from != transfer.to && transfer.amount.is_positive();
            if !keep {
                tracing::debug!(from = %transfer.from, amount = %transfer.amount, "dropping degenerate transfer");
            }
            keep
        })
        .collect()
}
