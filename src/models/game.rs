//! Elimination matches and scored round-robin matches.

use crate::models::group::GroupId;
use crate::models::player::{Opponent, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Which slot of a match a player occupies.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    One,
    Two,
}

impl Side {
    /// Slot a winner fills in the successor match: odd match numbers feed slot one.
    pub fn for_match_number(match_number: u32) -> Self {
        if match_number % 2 == 1 {
            Side::One
        } else {
            Side::Two
        }
    }
}

/// A single-elimination match. Linked to its successor by id, not by reference.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketMatch {
    pub id: MatchId,
    /// 1-based round number.
    pub round: u32,
    /// 1-based position within the round.
    pub match_number: u32,
    pub slot_1: Opponent,
    pub slot_2: Opponent,
    /// None until decided by selection or walkover.
    pub winner: Option<PlayerId>,
    /// Match the winner feeds into. None only for the final.
    pub next_match_id: Option<MatchId>,
}

impl BracketMatch {
    pub fn new(round: u32, match_number: u32, slot_1: Opponent, slot_2: Opponent) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            match_number,
            slot_1,
            slot_2,
            winner: None,
            next_match_id: None,
        }
    }

    pub fn slot(&self, side: Side) -> Opponent {
        match side {
            Side::One => self.slot_1,
            Side::Two => self.slot_2,
        }
    }

    pub fn slot_mut(&mut self, side: Side) -> &mut Opponent {
        match side {
            Side::One => &mut self.slot_1,
            Side::Two => &mut self.slot_2,
        }
    }

    pub fn is_final(&self) -> bool {
        self.next_match_id.is_none()
    }

    /// Both slots hold real players and nobody has won yet.
    pub fn is_playable(&self) -> bool {
        self.winner.is_none()
            && self.slot_1.player().is_some()
            && self.slot_2.player().is_some()
    }

    /// Whether `player` occupies one of the two slots.
    pub fn has_player(&self, player: PlayerId) -> bool {
        self.slot_1 == Opponent::Real(player) || self.slot_2 == Opponent::Real(player)
    }

    /// Who this match sends forward, if anyone yet. A match between two byes sends a bye.
    pub fn advancing(&self) -> Option<Opponent> {
        match (self.winner, self.slot_1, self.slot_2) {
            (Some(w), _, _) => Some(Opponent::Real(w)),
            (None, Opponent::Bye, Opponent::Bye) => Some(Opponent::Bye),
            _ => None,
        }
    }

    /// The real player who wins by walkover when the other slot is a bye.
    pub fn walkover(&self) -> Option<PlayerId> {
        if self.winner.is_some() {
            return None;
        }
        match (self.slot_1, self.slot_2) {
            (Opponent::Real(p), Opponent::Bye) | (Opponent::Bye, Opponent::Real(p)) => Some(p),
            _ => None,
        }
    }
}

/// A scored match inside a round-robin pool. Group matches carry their group id.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundRobinMatch {
    pub id: MatchId,
    /// Set for group-stage matches, None for a whole-roster round robin.
    pub group_id: Option<GroupId>,
    pub player_1: PlayerId,
    pub player_2: PlayerId,
    /// 1-based round number from the circle schedule.
    pub round: u32,
    pub player_1_score: Option<u32>,
    pub player_2_score: Option<u32>,
    /// Some exactly when both scores are set.
    pub winner: Option<PlayerId>,
    pub reported_at: Option<DateTime<Utc>>,
}

impl RoundRobinMatch {
    pub fn new(player_1: PlayerId, player_2: PlayerId, round: u32, group_id: Option<GroupId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_id,
            player_1,
            player_2,
            round,
            player_1_score: None,
            player_2_score: None,
            winner: None,
            reported_at: None,
        }
    }

    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }

    pub fn involves(&self, player: PlayerId) -> bool {
        self.player_1 == player || self.player_2 == player
    }

    /// The recorded (winner, loser) pair, if the match has been decided.
    pub fn result(&self) -> Option<(PlayerId, PlayerId)> {
        self.winner.map(|w| {
            if w == self.player_1 {
                (self.player_1, self.player_2)
            } else {
                (self.player_2, self.player_1)
            }
        })
    }
}
