//! People taking part in a bill.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Label shown for participants whose name is still blank.
pub const UNNAMED_LABEL: &str = "Unnamed";

/// A person sharing expenses.
///
/// Ids are stable for the lifetime of a session and never reused. The only
/// mutation a participant supports is a rename, and even that produces a new
/// value (see [`Participant::renamed`]).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
}

impl Participant {
    /// Creates a participant with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    pub fn with_id(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            id: self.id,
            name: name.into(),
        }
    }

    /// Display name, falling back to [`UNNAMED_LABEL`] for blank names.
    pub fn label(&self) -> &str {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            UNNAMED_LABEL
        } else {
            trimmed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_keeps_id_and_leaves_original_untouched() {
        let alice = Participant::new("Alice");
        let renamed = alice.renamed("Alicia");

        assert_eq!(renamed.id, alice.id);
        assert_eq!(renamed.name, "Alicia");
        assert_eq!(alice.name, "Alice");
    }

    #[test]
    fn blank_names_are_labelled_unnamed() {
        assert_eq!(Participant::new("   ").label(), UNNAMED_LABEL);
        assert_eq!(Participant::new(" Bob ").label(), "Bob");
    }

    #[test]
    fn fresh_ids_are_unique() {
        assert_ne!(Participant::new("a").id, Participant::new("a").id);
    }
}
