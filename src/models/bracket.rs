//! Bracket: an arena of elimination matches linked by successor id.

use crate::models::game::{BracketMatch, MatchId};
use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    /// Matches ordered by round, then by match number.
    pub matches: Vec<BracketMatch>,
}

impl Bracket {
    pub fn new(matches: Vec<BracketMatch>) -> Self {
        Self { matches }
    }

    /// True for the empty bracket produced from fewer than two players.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn get(&self, id: MatchId) -> Option<&BracketMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub(crate) fn position(&self, id: MatchId) -> Option<usize> {
        self.matches.iter().position(|m| m.id == id)
    }

    /// Number of rounds (0 for an empty bracket).
    pub fn rounds(&self) -> u32 {
        self.matches.iter().map(|m| m.round).max().unwrap_or(0)
    }

    /// Matches of one round, in match-number order.
    pub fn round(&self, round: u32) -> impl Iterator<Item = &BracketMatch> {
        self.matches.iter().filter(move |m| m.round == round)
    }

    /// The match with no successor.
    pub fn final_match(&self) -> Option<&BracketMatch> {
        self.matches.iter().find(|m| m.is_final())
    }

    /// Winner of the final, once decided.
    pub fn champion(&self) -> Option<PlayerId> {
        self.final_match().and_then(|m| m.winner)
    }

    pub fn is_complete(&self) -> bool {
        self.champion().is_some()
    }

    /// Matches waiting for a winner to be selected.
    pub fn playable(&self) -> impl Iterator<Item = &BracketMatch> {
        self.matches.iter().filter(|m| m.is_playable())
    }
}
