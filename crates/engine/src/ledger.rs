//! Pairwise ledger.
//!
//! For every participant the ledger lists who they must pay (`gives`) and who
//! must pay them (`takes`). It is built in three passes:
//!
//! 1. each participant's shares in expenses paid by somebody else are summed
//!    per payer and rounded to whole units (round half up), giving one *give*
//!    per payer;
//! 2. each payer records a *take* from every other sharer of their expenses;
//! 3. opposing obligations between two participants are netted, so that every
//!    pair ends up with at most one give on the debtor side and the matching
//!    take on the creditor side.
//!
//! Netting is direct only: if A owes B and B owes C, A still pays B.
//!
//! Rounding happens per payer, so the sum of a participant's gives can drift
//! from their exact balance by up to half a unit per counterparty. This is
//! accepted and not reconciled.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Allocations, Expense, Money, Participant};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Give {
    pub to: Uuid,
    pub amount: Money,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Take {
    pub from: Uuid,
    pub amount: Money,
}

/// Obligations of a single participant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerAccount {
    pub participant: Uuid,
    pub gives: Vec<Give>,
    pub takes: Vec<Take>,
}

impl LedgerAccount {
    fn new(participant: Uuid) -> Self {
        Self {
            participant,
            gives: Vec::new(),
            takes: Vec::new(),
        }
    }

    /// Total this participant gives to `to`.
    pub fn gives_to(&self, to: Uuid) -> Money {
        self.gives
            .iter()
            .filter(|give| give.to == to)
            .map(|give| give.amount)
            .sum()
    }

    /// Total this participant takes from `from`.
    pub fn takes_from(&self, from: Uuid) -> Money {
        self.takes
            .iter()
            .filter(|take| take.from == from)
            .map(|take| take.amount)
            .sum()
    }

    /// Replaces every give to `to` with a single one, kept at the position of
    /// the first replaced entry.
    fn set_give(&mut self, to: Uuid, amount: Money) {
        let position = self.gives.iter().position(|give| give.to == to);
        self.gives.retain(|give| give.to != to);
        if amount.is_positive() {
            let index = position.unwrap_or(self.gives.len()).min(self.gives.len());
            self.gives.insert(index, Give { to, amount });
        }
    }

    fn set_take(&mut self, from: Uuid, amount: Money) {
        let position = self.takes.iter().position(|take| take.from == from);
        self.takes.retain(|take| take.from != from);
        if amount.is_positive() {
            let index = position.unwrap_or(self.takes.len()).min(self.takes.len());
            self.takes.insert(index, Take { from, amount });
        }
    }
}

/// Netted obligations of every participant, in participant order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    accounts: Vec<LedgerAccount>,
}

impl Ledger {
    pub fn accounts(&self) -> &[LedgerAccount] {
        &self.accounts
    }

    pub fn account(&self, participant: Uuid) -> Option<&LedgerAccount> {
        self.accounts
            .iter()
            .find(|account| account.participant == participant)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LedgerAccount> {
        self.accounts.iter()
    }
}

/// Builds the netted pairwise ledger.
///
/// Payers that are not in `participants` never match anybody: their
/// expenses produce neither gives nor takes.
pub fn build_ledger(
    expenses: &[Expense],
    allocations: &Allocations,
    participants: &[Participant],
) -> Ledger {
    let index: HashMap<Uuid, usize> = participants
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id, i))
        .collect();
    let mut accounts: Vec<LedgerAccount> = participants
        .iter()
        .map(|p| LedgerAccount::new(p.id))
        .collect();

    record_gives(&mut accounts, expenses, allocations, participants, &index);
    record_takes(&mut accounts, expenses, allocations, participants, &index);
    net_pairs(&mut accounts);
    drop_self_transfers(&mut accounts);

    Ledger { accounts }
}

fn record_gives(
    accounts: &mut [LedgerAccount],
    expenses: &[Expense],
    allocations: &Allocations,
    participants: &[Participant],
    index: &HashMap<Uuid, usize>,
) {
    for (account, participant) in accounts.iter_mut().zip(participants) {
        // Payers in order of first appearance.
        let mut owed_to_payer: Vec<(Uuid, Money)> = Vec::new();

        for expense in expenses {
            let Some(payer) = expense.payer else {
                continue;
            };
            if payer == participant.id || !index.contains_key(&payer) {
                continue;
            }
            let Some(share) = allocations
                .expense(expense.id)
                .and_then(|shares| shares.get(&participant.id))
            else {
                continue;
            };

            match owed_to_payer.iter_mut().find(|(id, _)| *id == payer) {
                Some((_, total)) => *total += *share,
                None => owed_to_payer.push((payer, *share)),
            }
        }

        for (payer, total) in owed_to_payer {
            let amount = total.round_units();
            if amount.is_positive() {
                account.gives.push(Give { to: payer, amount });
            }
        }
    }
}

fn record_takes(
    accounts: &mut [LedgerAccount],
    expenses: &[Expense],
    allocations: &Allocations,
    participants: &[Participant],
    index: &HashMap<Uuid, usize>,
) {
    for expense in expenses {
        let Some(payer) = expense.payer else {
            continue;
        };
        let Some(&payer_index) = index.get(&payer) else {
            tracing::debug!(expense = %expense.id, payer = %payer, "payer is not a participant");
            continue;
        };
        let Some(shares) = allocations.expense(expense.id) else {
            continue;
        };
        if shares.len() < 2 {
            continue;
        }

        for sharer in participants.iter().filter(|p| p.id != payer) {
            let Some(share) = shares.get(&sharer.id) else {
                continue;
            };
            let amount = share.round_units();
            if amount.is_positive() {
                accounts[payer_index].takes.push(Take {
                    from: sharer.id,
                    amount,
                });
            }
        }
    }
}

/// Collapses the obligations between every unordered pair into one net give
/// (and its matching take), or nothing when they cancel out.
fn net_pairs(accounts: &mut [LedgerAccount]) {
    for a in 0..accounts.len() {
        for b in (a + 1)..accounts.len() {
            let a_id = accounts[a].participant;
            let b_id = accounts[b].participant;
            if a_id == b_id {
                continue;
            }

            let a_to_b = accounts[a].gives_to(b_id);
            let b_to_a = accounts[b].gives_to(a_id);
            if a_to_b.is_positive() && b_to_a.is_positive() {
                tracing::trace!(
                    a = %a_id,
                    b = %b_id,
                    a_to_b = %a_to_b,
                    b_to_a = %b_to_a,
                    "netting opposing obligations"
                );
            }

            let net = a_to_b - b_to_a;
            let (a_gives, b_gives) = if net.is_positive() {
                (net, Money::ZERO)
            } else {
                (Money::ZERO, -net)
            };

            accounts[a].set_give(b_id, a_gives);
            accounts[b].set_take(a_id, a_gives);
            accounts[b].set_give(a_id, b_gives);
            accounts[a].set_take(b_id, b_gives);
        }
    }
}

fn drop_self_transfers(accounts: &mut [LedgerAccount]) {
    for account in accounts {
        let owner = account.participant;
        account.gives.retain(|give| give.to != owner);
        account.takes.retain(|take| take.from != owner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocate;

    fn ledger_for(expenses: &[Expense], participants: &[Participant]) -> Ledger {
        let allocations = allocate(expenses, participants);
        build_ledger(expenses, &allocations, participants)
    }

    #[test]
    fn dinner_paid_by_one_yields_gives_and_takes() {
        let alice = Participant::new("Alice");
        let bob = Participant::new("Bob");
        let carol = Participant::new("Carol");
        let participants = vec![alice.clone(), bob.clone(), carol.clone()];
        let expenses = vec![
            Expense::new("Dinner", Money::from_units(300))
                .paid_by(Some(alice.id))
                .including([alice.id, bob.id, carol.id]),
        ];

        let ledger = ledger_for(&expenses, &participants);

        let alice_account = ledger.account(alice.id).unwrap();
        assert!(alice_account.gives.is_empty());
        assert_eq!(
            alice_account.takes,
            vec![
                Take {
                    from: bob.id,
                    amount: Money::from_units(100)
                },
                Take {
                    from: carol.id,
                    amount: Money::from_units(100)
                },
            ]
        );
        assert_eq!(
            ledger.account(bob.id).unwrap().gives,
            vec![Give {
                to: alice.id,
                amount: Money::from_units(100)
            }]
        );
        assert!(ledger.account(bob.id).unwrap().takes.is_empty());
    }

    #[test]
    fn opposing_obligations_are_netted() {
        let a = Participant::new("A");
        let b = Participant::new("B");
        let participants = vec![a.clone(), b.clone()];
        let expenses = vec![
            Expense::new("Hotel", Money::from_units(300))
                .paid_by(Some(b.id))
                .including([a.id]),
            Expense::new("Train", Money::from_units(120))
                .paid_by(Some(a.id))
                .including([b.id]),
        ];

        let ledger = ledger_for(&expenses, &participants);

        let a_account = ledger.account(a.id).unwrap();
        let b_account = ledger.account(b.id).unwrap();
        assert_eq!(
            a_account.gives,
            vec![Give {
                to: b.id,
                amount: Money::from_units(180)
            }]
        );
        assert!(a_account.takes.is_empty());
        assert!(b_account.gives.is_empty());
        assert_eq!(
            b_account.takes,
            vec![Take {
                from: a.id,
                amount: Money::from_units(180)
            }]
        );
    }

    #[test]
    fn equal_obligations_cancel_out() {
        let a = Participant::new("A");
        let b = Participant::new("B");
        let participants = vec![a.clone(), b.clone()];
        let expenses = vec![
            Expense::new("Coffee", Money::from_units(10))
                .paid_by(Some(a.id))
                .including([a.id, b.id]),
            Expense::new("Bagel", Money::from_units(10))
                .paid_by(Some(b.id))
                .including([a.id, b.id]),
        ];

        let ledger = ledger_for(&expenses, &participants);

        for account in ledger.iter() {
            assert!(account.gives.is_empty());
            assert!(account.takes.is_empty());
        }
    }

    #[test]
    fn shares_to_the_same_payer_are_summed_before_rounding() {
        let a = Participant::new("A");
        let b = Participant::new("B");
        let c = Participant::new("C");
        let participants = vec![a.clone(), b.clone(), c.clone()];
        // 10 / 3 = 3.33.. twice: 6.66.. rounds to 7.
        let expenses = vec![
            Expense::new("Chips", Money::from_units(10))
                .paid_by(Some(a.id))
                .including([a.id, b.id, c.id]),
            Expense::new("Soda", Money::from_units(10))
                .paid_by(Some(a.id))
                .including([a.id, b.id, c.id]),
        ];

        let ledger = ledger_for(&expenses, &participants);

        assert_eq!(ledger.account(b.id).unwrap().gives_to(a.id), Money::from_units(7));
        assert_eq!(ledger.account(a.id).unwrap().takes_from(b.id), Money::from_units(7));
    }

    #[test]
    fn rounding_to_zero_drops_the_obligation() {
        let a = Participant::new("A");
        let b = Participant::new("B");
        let participants = vec![a.clone(), b.clone()];
        let expenses = vec![
            Expense::new("Mint", "0.8".parse().unwrap())
                .paid_by(Some(a.id))
                .including([a.id, b.id]),
        ];

        let ledger = ledger_for(&expenses, &participants);

        assert!(ledger.account(b.id).unwrap().gives.is_empty());
        assert!(ledger.account(a.id).unwrap().takes.is_empty());
    }

    #[test]
    fn unknown_payer_is_ignored() {
        let a = Participant::new("A");
        let b = Participant::new("B");
        let participants = vec![a.clone(), b.clone()];
        let expenses = vec![
            Expense::new("Ghost", Money::from_units(50))
                .paid_by(Some(Uuid::new_v4()))
                .including([a.id, b.id]),
        ];

        let ledger = ledger_for(&expenses, &participants);

        for account in ledger.iter() {
            assert!(account.gives.is_empty());
            assert!(account.takes.is_empty());
        }
    }

    #[test]
    fn payer_charged_alone_never_owes_themselves() {
        let a = Participant::new("A");
        let participants = vec![a.clone()];
        let expenses = vec![
            Expense::new("Solo", Money::from_units(40))
                .paid_by(Some(a.id))
                .including([a.id]),
        ];

        let ledger = ledger_for(&expenses, &participants);

        let account = ledger.account(a.id).unwrap();
        assert!(account.gives.is_empty());
        assert!(account.takes.is_empty());
    }

    #[test]
    fn participant_without_expenses_has_empty_account() {
        let a = Participant::new("A");
        let b = Participant::new("B");
        let idle = Participant::new("Idle");
        let participants = vec![a.clone(), b.clone(), idle.clone()];
        let expenses = vec![
            Expense::new("Bus", Money::from_units(4))
                .paid_by(Some(a.id))
                .including([a.id, b.id]),
        ];

        let ledger = ledger_for(&expenses, &participants);

        assert_eq!(ledger.account(idle.id), Some(&LedgerAccount::new(idle.id)));
    }

    #[test]
    fn set_give_keeps_position_of_replaced_entry() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let mut account = LedgerAccount::new(Uuid::new_v4());
        account.gives = vec![
            Give {
                to: first,
                amount: Money::from_units(1),
            },
            Give {
                to: second,
                amount: Money::from_units(2),
            },
        ];

        account.set_give(first, Money::from_units(5));

        assert_eq!(account.gives[0].to, first);
        assert_eq!(account.gives[0].amount, Money::from_units(5));
        assert_eq!(account.gives.len(), 2);
    }
}
