//! A bill-splitting session: the participants and expenses being edited.
//!
//! Sessions are values. Every edit returns a new `Session` and leaves the
//! receiver untouched, so a snapshot handed to [`settle`](crate::settle) or to
//! a [`SettlementCache`](crate::SettlementCache) can never change while it is
//! being read.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, Expense, Inclusion, Money, Participant, ResultEngine, Settlement,
    SettlementMode, settle,
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn participant(&self, id: Uuid) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn expense(&self, id: Uuid) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    /// Adds a participant with a fresh id.
    #[must_use]
    pub fn with_participant(&self, name: impl Into<String>) -> (Session, Uuid) {
        let participant = Participant::new(name);
        let id = participant.id;
        let mut next = self.clone();
        next.participants.push(participant);
        (next, id)
    }

    /// Adds an existing participant value, rejecting duplicate ids.
    pub fn insert_participant(&self, participant: Participant) -> ResultEngine<Session> {
        if self.participant(participant.id).is_some() {
            return Err(EngineError::ExistingKey(participant.id.to_string()));
        }
        let mut next = self.clone();
        next.participants.push(participant);
        Ok(next)
    }

    pub fn rename_participant(&self, id: Uuid, name: impl Into<String>) -> ResultEngine<Session> {
        let name = name.into();
        self.map_participant(id, |p| p.renamed(name))
    }

    /// Adds an expense. `raw_cost` is user input: unparseable text counts as 0.
    #[must_use]
    pub fn with_expense(&self, description: impl Into<String>, raw_cost: &str) -> (Session, Uuid) {
        let expense = Expense::new(description, Money::parse_lenient(raw_cost));
        let id = expense.id;
        let mut next = self.clone();
        next.expenses.push(expense);
        (next, id)
    }

    pub fn insert_expense(&self, expense: Expense) -> ResultEngine<Session> {
        if self.expense(expense.id).is_some() {
            return Err(EngineError::ExistingKey(expense.id.to_string()));
        }
        let mut next = self.clone();
        next.expenses.push(expense);
        Ok(next)
    }

    pub fn set_cost(&self, expense_id: Uuid, raw_cost: &str) -> ResultEngine<Session> {
        let cost = Money::parse_lenient(raw_cost);
        self.map_expense(expense_id, |e| e.with_cost(cost))
    }

    pub fn describe(&self, expense_id: Uuid, description: impl Into<String>) -> ResultEngine<Session> {
        let description = description.into();
        self.map_expense(expense_id, |e| e.described(description))
    }

    /// Sets or clears the payer. A payer must be a participant of the session.
    pub fn set_payer(&self, expense_id: Uuid, payer: Option<Uuid>) -> ResultEngine<Session> {
        if let Some(payer) = payer {
            self.require_participant(payer)?;
        }
        self.map_expense(expense_id, |e| e.paid_by(payer))
    }

    pub fn set_inclusion(
        &self,
        expense_id: Uuid,
        participant_id: Uuid,
        inclusion: Inclusion,
    ) -> ResultEngine<Session> {
        self.require_participant(participant_id)?;
        self.map_expense(expense_id, |e| e.with_inclusion(participant_id, inclusion))
    }

    /// Runs a settlement pass over this snapshot.
    pub fn settle(&self, mode: SettlementMode) -> Settlement {
        settle(&self.participants, &self.expenses, mode)
    }

    fn require_participant(&self, id: Uuid) -> ResultEngine<&Participant> {
        self.participant(id)
            .ok_or_else(|| EngineError::KeyNotFound(format!("participant {id}")))
    }

    fn map_participant(
        &self,
        id: Uuid,
        update: impl FnOnce(&Participant) -> Participant,
    ) -> ResultEngine<Session> {
        let index = self
            .participants
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| EngineError::KeyNotFound(format!("participant {id}")))?;
        let mut next = self.clone();
        next.participants[index] = update(&self.participants[index]);
        Ok(next)
    }

    fn map_expense(
        &self,
        id: Uuid,
        update: impl FnOnce(Expense) -> Expense,
    ) -> ResultEngine<Session> {
        let index = self
            .expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| EngineError::KeyNotFound(format!("expense {id}")))?;
        let mut next = self.clone();
        next.expenses[index] = update(self.expenses[index].clone());
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_leave_the_original_snapshot_untouched() {
        let (session, alice) = Session::new().with_participant("Alice");
        let (session, tea) = session.with_expense("Tea", "12");

        let renamed = session.rename_participant(alice, "Alicia").unwrap();
        let repriced = session.set_cost(tea, "30").unwrap();

        assert_eq!(session.participant(alice).unwrap().name, "Alice");
        assert_eq!(renamed.participant(alice).unwrap().name, "Alicia");
        assert_eq!(session.expense(tea).unwrap().cost, Money::from_units(12));
        assert_eq!(repriced.expense(tea).unwrap().cost, Money::from_units(30));
    }

    #[test]
    fn unparseable_cost_is_zero() {
        let (session, tea) = Session::new().with_expense("Tea", "twelve");
        assert_eq!(session.expense(tea).unwrap().cost, Money::ZERO);

        let session = session.set_cost(tea, "").unwrap();
        assert_eq!(session.expense(tea).unwrap().cost, Money::ZERO);
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let (session, alice) = Session::new().with_participant("Alice");
        let (session, tea) = session.with_expense("Tea", "10");
        let ghost = Uuid::new_v4();

        assert_eq!(
            session.rename_participant(ghost, "x"),
            Err(EngineError::KeyNotFound(format!("participant {ghost}")))
        );
        assert_eq!(
            session.set_cost(ghost, "1"),
            Err(EngineError::KeyNotFound(format!("expense {ghost}")))
        );
        assert!(session.set_payer(tea, Some(ghost)).is_err());
        assert!(session.set_inclusion(tea, ghost, Inclusion::Included).is_err());
        assert!(session.set_payer(tea, Some(alice)).is_ok());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let alice = Participant::new("Alice");
        let session = Session::new().insert_participant(alice.clone()).unwrap();
        assert_eq!(
            session.insert_participant(alice.clone()),
            Err(EngineError::ExistingKey(alice.id.to_string()))
        );
    }

    #[test]
    fn settles_the_current_snapshot() {
        let (session, alice) = Session::new().with_participant("Alice");
        let (session, bob) = session.with_participant("Bob");
        let (session, cab) = session.with_expense("Cab", "40");
        let session = session
            .set_payer(cab, Some(alice))
            .and_then(|s| s.set_inclusion(cab, alice, Inclusion::Included))
            .and_then(|s| s.set_inclusion(cab, bob, Inclusion::Included))
            .unwrap();

        let settlement = session.settle(SettlementMode::Pairwise);

        assert_eq!(settlement.balance_of(alice), Money::from_units(20));
        assert_eq!(settlement.balance_of(bob), Money::from_units(-20));
        assert_eq!(settlement.transfers.len(), 1);
    }
}
