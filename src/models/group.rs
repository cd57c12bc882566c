//! Groups of the group stage.

use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a group.
pub type GroupId = Uuid;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    /// Display name, "Group A", "Group B", ...
    pub name: String,
    /// Members in the order they were dealt.
    pub players: Vec<PlayerId>,
}

impl Group {
    /// Create an empty group named after its 0-based index.
    pub fn new(index: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: format!("Group {}", letter_label(index)),
            players: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// Letter label for a 0-based index: A..Z, then AA, AB, ...
pub fn letter_label(index: usize) -> String {
    let letter = |i: usize| char::from(b'A' + (i % 26) as u8);
    if index < 26 {
        letter(index).to_string()
    } else {
        format!("{}{}", letter(index / 26 - 1), letter(index))
    }
}
