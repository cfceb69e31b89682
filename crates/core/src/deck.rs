//! The four-slot active deck.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Number of slots in a deck.
pub const DECK_SIZE: usize = 4;

/// Ordered deck slots; `None` marks an empty slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Deck {
    pub slots: [Option<DbId>; DECK_SIZE],
}

impl Deck {
    /// Build a deck from an ordered list of idol ids.
    ///
    /// The list may be shorter than [`DECK_SIZE`]; remaining slots stay empty.
    /// Duplicate ids and oversized lists are rejected.
    pub fn from_ids(ids: &[DbId]) -> Result<Self, CoreError> {
        if ids.len() > DECK_SIZE {
            return Err(CoreError::Validation(format!(
                "A deck holds at most {DECK_SIZE} idols, got {}",
                ids.len()
            )));
        }
        let mut seen = HashSet::with_capacity(ids.len());
        for id in ids {
            if !seen.insert(*id) {
                return Err(CoreError::Validation(format!(
                    "Idol {id} appears more than once in the deck"
                )));
            }
        }
        let mut slots = [None; DECK_SIZE];
        for (slot, id) in slots.iter_mut().zip(ids) {
            *slot = Some(*id);
        }
        Ok(Self { slots })
    }

    pub fn from_slots(slots: [Option<DbId>; DECK_SIZE]) -> Self {
        Self { slots }
    }

    /// Occupied slots in order.
    pub fn members(&self) -> Vec<DbId> {
        self.slots.iter().flatten().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slot values as strings, null-padded, for the client deck view.
    pub fn as_client_slots(&self) -> [Option<String>; DECK_SIZE] {
        self.slots.map(|s| s.map(|id| id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn short_lists_are_null_padded() {
        let deck = Deck::from_ids(&[7, 3]).unwrap();
        assert_eq!(deck.slots, [Some(7), Some(3), None, None]);
        assert_eq!(
            deck.as_client_slots(),
            [Some("7".to_string()), Some("3".to_string()), None, None]
        );
    }

    #[test]
    fn duplicates_and_oversized_lists_are_rejected() {
        assert_matches!(Deck::from_ids(&[1, 1]), Err(CoreError::Validation(_)));
        assert_matches!(Deck::from_ids(&[1, 2, 3, 4, 5]), Err(CoreError::Validation(_)));
    }

    #[test]
    fn members_skip_empty_slots() {
        let deck = Deck::from_slots([Some(1), None, Some(3), None]);
        assert_eq!(deck.members(), vec![1, 3]);
        assert_eq!(deck.len(), 2);
        assert!(!deck.is_empty());
        assert!(Deck::default().is_empty());
    }
}
