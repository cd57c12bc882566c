//! Player and Opponent data structures.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in matches, standings and lookups).
pub type PlayerId = Uuid;

/// A participant in the tournament roster.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Seeded players are kept apart in the early rounds of a seeded bracket.
    #[serde(default)]
    pub seeded: bool,
}

impl Player {
    /// Create a new unseeded player with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            seeded: false,
        }
    }

    /// Create a new player and mark it as seeded.
    pub fn seeded(name: impl Into<String>) -> Self {
        Self {
            seeded: true,
            ..Self::new(name)
        }
    }
}

/// Occupant of a bracket slot.
///
/// A `Bye` is an automatic walkover and can never be picked as a winner.
/// `Unresolved` means the predecessor match has not produced anyone yet.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "player_id", rename_all = "snake_case")]
pub enum Opponent {
    Real(PlayerId),
    Bye,
    #[default]
    Unresolved,
}

impl Opponent {
    /// The player in this slot, if it holds a real one.
    pub fn player(self) -> Option<PlayerId> {
        match self {
            Opponent::Real(id) => Some(id),
            Opponent::Bye | Opponent::Unresolved => None,
        }
    }

    pub fn is_bye(self) -> bool {
        self == Opponent::Bye
    }

    pub fn is_unresolved(self) -> bool {
        self == Opponent::Unresolved
    }
}

impl From<Option<PlayerId>> for Opponent {
    /// `None` is a bye slot (used while padding a field to a power of two).
    fn from(slot: Option<PlayerId>) -> Self {
        slot.map_or(Opponent::Bye, Opponent::Real)
    }
}
