//! Itemized expenses and who takes part in each of them.
//!
//! Participation is explicit: every participant id maps to an [`Inclusion`].
//! An id missing from the map is [`Inclusion::Excluded`], so "not decided yet"
//! and "explicitly excluded" both mean the participant does not share the
//! cost.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Money, Participant};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Inclusion {
    Included,
    #[default]
    Excluded,
}

impl From<bool> for Inclusion {
    fn from(value: bool) -> Self {
        if value {
            Self::Included
        } else {
            Self::Excluded
        }
    }
}

/// A single cost paid by (at most) one participant and shared by a subset of
/// participants.
///
/// Every builder method consumes `self` and returns the updated value, so an
/// expense held by a snapshot is never changed behind its back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cost: Money,
    #[serde(default)]
    pub payer: Option<Uuid>,
    #[serde(default)]
    pub participation: BTreeMap<Uuid, Inclusion>,
}

impl Expense {
    /// Creates an expense with a fresh id, no payer and nobody included.
    pub fn new(description: impl Into<String>, cost: Money) -> Self {
        Self::with_id(Uuid::new_v4(), description, cost)
    }

    pub fn with_id(id: Uuid, description: impl Into<String>, cost: Money) -> Self {
        Self {
            id,
            description: description.into(),
            cost,
            payer: None,
            participation: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn paid_by(mut self, payer: Option<Uuid>) -> Self {
        self.payer = payer;
        self
    }

    #[must_use]
    pub fn with_cost(mut self, cost: Money) -> Self {
        self.cost = cost;
        self
    }

    #[must_use]
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_inclusion(mut self, participant: Uuid, inclusion: Inclusion) -> Self {
        self.participation.insert(participant, inclusion);
        self
    }

    #[must_use]
    pub fn including<I>(self, participants: I) -> Self
    where
        I: IntoIterator<Item = Uuid>,
    {
        participants.into_iter().fold(self, |expense, id| {
            expense.with_inclusion(id, Inclusion::Included)
        })
    }

    #[must_use]
    pub fn excluding<I>(self, participants: I) -> Self
    where
        I: IntoIterator<Item = Uuid>,
    {
        participants.into_iter().fold(self, |expense, id| {
            expense.with_inclusion(id, Inclusion::Excluded)
        })
    }

    pub fn inclusion(&self, participant: Uuid) -> Inclusion {
        self.participation
            .get(&participant)
            .copied()
            .unwrap_or_default()
    }

    pub fn includes(&self, participant: Uuid) -> bool {
        self.inclusion(participant) == Inclusion::Included
    }

    /// Participants from `participants` that share this expense, in the order
    /// they are given.
    pub fn included<'a>(
        &'a self,
        participants: &'a [Participant],
    ) -> impl Iterator<Item = &'a Participant> + 'a {
        participants.iter().filter(|p| self.includes(p.id))
    }

    /// `true` when the expense is paid by `participant`.
    pub fn is_paid_by(&self, participant: Uuid) -> bool {
        self.payer == Some(participant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_participants_are_excluded() {
        let expense = Expense::new("Tea", Money::from_units(30));
        assert_eq!(expense.inclusion(Uuid::new_v4()), Inclusion::Excluded);
    }

    #[test]
    fn explicit_exclusion_overrides_inclusion() {
        let bob = Uuid::new_v4();
        let expense = Expense::new("Tea", Money::from_units(30))
            .including([bob])
            .excluding([bob]);

        assert!(!expense.includes(bob));
        assert_eq!(expense.participation.get(&bob), Some(&Inclusion::Excluded));
    }

    #[test]
    fn included_follows_participant_order_and_skips_strangers() {
        let alice = Participant::new("Alice");
        let bob = Participant::new("Bob");
        let carol = Participant::new("Carol");
        let stranger = Uuid::new_v4();
        let participants = vec![alice.clone(), bob.clone(), carol.clone()];

        let expense = Expense::new("Pizza", Money::from_units(90))
            .including([carol.id, stranger, alice.id]);

        let names: Vec<&str> = expense
            .included(&participants)
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Alice", "Carol"]);
    }

    #[test]
    fn deserializes_sparse_json() {
        let id = Uuid::new_v4();
        let alice = Uuid::new_v4();
        let json = format!(
            r#"{{"id":"{id}","cost":"abc","participation":{{"{alice}":"included"}}}}"#
        );

        let expense: Expense = serde_json::from_str(&json).unwrap();
        assert_eq!(expense.cost, Money::ZERO);
        assert_eq!(expense.payer, None);
        assert!(expense.includes(alice));
        assert!(expense.description.is_empty());
    }

    #[test]
    fn bool_converts_to_inclusion() {
        assert_eq!(Inclusion::from(true), Inclusion::Included);
        assert_eq!(Inclusion::from(false), Inclusion::Excluded);
    }
}
