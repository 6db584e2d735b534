//! One full settlement pass over a snapshot of participants and expenses.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Expense, Money, Participant, Transfer, allocate, build_ledger, compute_balances, flatten,
};

/// How transfers are derived from the snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum SettlementMode {
    /// Net each pair of participants directly through the pairwise ledger.
    #[default]
    Pairwise,
    /// Settle net balances greedily, largest debtor paying largest creditor.
    /// Usually needs fewer transfers than [`SettlementMode::Pairwise`].
    Minimal,
}

impl TryFrom<&str> for SettlementMode {
    type Error = crate::EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pairwise" => Ok(Self::Pairwise),
            "minimal" => Ok(Self::Minimal),
            other => Err(crate::EngineError::InvalidSetting(format!(
                "unknown settlement mode: {other}"
            ))),
        }
    }
}

impl TryFrom<String> for SettlementMode {
    type Error = crate::EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SettlementMode::try_from(value.as_str())
    }
}

/// Totals of one participant, in participant order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub participant: Uuid,
    pub name: String,
    pub total_share: Money,
    pub total_paid: Money,
    pub balance: Money,
}

/// Result of a settlement pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub mode: SettlementMode,
    pub summaries: Vec<ParticipantSummary>,
    pub transfers: Vec<Transfer>,
}

impl Settlement {
    /// Fair share of every participant.
    pub fn shares(&self) -> HashMap<Uuid, Money> {
        self.summaries
            .iter()
            .map(|s| (s.participant, s.total_share))
            .collect()
    }

    /// Net balance of every participant.
    pub fn balances(&self) -> HashMap<Uuid, Money> {
        self.summaries
            .iter()
            .map(|s| (s.participant, s.balance))
            .collect()
    }

    pub fn summary(&self, participant: Uuid) -> Option<&ParticipantSummary> {
        self.summaries.iter().find(|s| s.participant == participant)
    }

    pub fn share_of(&self, participant: Uuid) -> Money {
        self.summary(participant)
            .map(|s| s.total_share)
            .unwrap_or(Money::ZERO)
    }

    pub fn balance_of(&self, participant: Uuid) -> Money {
        self.summary(participant)
            .map(|s| s.balance)
            .unwrap_or(Money::ZERO)
    }

    /// Sum of all balances. Zero unless some shared cost has no known payer.
    pub fn total_imbalance(&self) -> Money {
        self.summaries.iter().map(|s| s.balance).sum()
    }
}

/// Computes shares, balances and transfers.
///
/// Never fails: degenerate input (zero or unparseable costs, expenses nobody
/// shares, unknown payers) contributes nothing instead of raising an error.
pub fn settle(
    participants: &[Participant],
    expenses: &[Expense],
    mode: SettlementMode,
) -> Settlement {
    let _span = tracing::debug_span!(
        "settle",
        participants = participants.len(),
        expenses = expenses.len(),
        ?mode
    )
    .entered();

    let allocations = allocate(expenses, participants);
    let balances = compute_balances(expenses, &allocations, participants);

    let summaries: Vec<ParticipantSummary> = participants
        .iter()
        .map(|p| {
            let balance = balances.get(&p.id).copied().unwrap_or_default();
            ParticipantSummary {
                participant: p.id,
                name: p.label().to_string(),
                total_share: balance.total_share,
                total_paid: balance.total_paid,
                balance: balance.balance,
            }
        })
        .collect();

    let transfers = match mode {
        SettlementMode::Pairwise => {
            let ledger = build_ledger(expenses, &allocations, participants);
            flatten(&ledger)
        }
        SettlementMode::Minimal => minimal_transfers(&summaries),
    };

    tracing::debug!(
        allocated = allocations.len(),
        transfers = transfers.len(),
        "settlement computed"
    );

    Settlement {
        mode,
        summaries,
        transfers,
    }
}

/// Greedy net-flow settlement over exact balances.
///
/// Repeatedly matches the largest debtor with the largest creditor; ties go
/// to the participant listed first. Amounts are rounded to whole units at the
/// end and zero transfers are dropped.
fn minimal_transfers(summaries: &[ParticipantSummary]) -> Vec<Transfer> {
    let mut debtors: Vec<(Uuid, Money)> = summaries
        .iter()
        .filter(|s| s.balance.is_negative())
        .map(|s| (s.participant, -s.balance))
        .collect();
    let mut creditors: Vec<(Uuid, Money)> = summaries
        .iter()
        .filter(|s| s.balance.is_positive())
        .map(|s| (s.participant, s.balance))
        .collect();

    let mut transfers = Vec::new();
    while let (Some(d), Some(c)) = (largest(&debtors), largest(&creditors)) {
        let (debtor, owed) = debtors[d];
        let (creditor, due) = creditors[c];
        let amount = owed.min(due);

        debtors[d].1 -= amount;
        creditors[c].1 -= amount;
        debtors.retain(|(_, left)| left.is_positive());
        creditors.retain(|(_, left)| left.is_positive());

        let amount = amount.round_units();
        if amount.is_positive() && debtor != creditor {
            transfers.push(Transfer {
                from: debtor,
                to: creditor,
                amount,
            });
        }
    }
    transfers
}

/// Index of the largest amount, first one on ties.
fn largest(entries: &[(Uuid, Money)]) -> Option<usize> {
    entries
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, Money)>, (i, (_, amount))| {
            match best {
                Some((_, top)) if top >= *amount => best,
                _ => Some((i, *amount)),
            }
        })
        .map(|(i, _)| i)
}
