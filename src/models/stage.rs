//! Per-format tournament state: round-robin pool, group stage and knockout brackets.

use crate::models::bracket::Bracket;
use crate::models::game::{MatchId, RoundRobinMatch};
use crate::models::group::{Group, GroupId};
use crate::models::player::PlayerId;
use crate::models::standing::StandingsLedger;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A complete round-robin schedule and its standings.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundRobinPool {
    pub matches: Vec<RoundRobinMatch>,
    pub standings: StandingsLedger,
}

impl RoundRobinPool {
    pub fn get(&self, id: MatchId) -> Option<&RoundRobinMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    /// Number of circle-method rounds in the schedule.
    pub fn rounds(&self) -> u32 {
        self.matches.iter().map(|m| m.round).max().unwrap_or(0)
    }

    /// Every scheduled match has a winner (false for an empty schedule).
    pub fn is_complete(&self) -> bool {
        !self.matches.is_empty() && self.matches.iter().all(RoundRobinMatch::is_decided)
    }
}

/// Result of a score report in a round-robin pool.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub winner: PlayerId,
    /// True when this report was an edit of an already decided match.
    pub edited: bool,
    /// Every match of the pool is now decided.
    pub completed: bool,
    /// Top of the final ranking, set once completed.
    pub champion: Option<PlayerId>,
}

/// Groups, their internal round-robin matches and per-group standings.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct GroupStage {
    pub groups: Vec<Group>,
    /// Matches of all groups, tagged with `group_id`.
    pub matches: Vec<RoundRobinMatch>,
    pub standings: HashMap<GroupId, StandingsLedger>,
}

impl GroupStage {
    pub fn get(&self, id: MatchId) -> Option<&RoundRobinMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Matches of one group.
    pub fn group_matches(&self, id: GroupId) -> impl Iterator<Item = &RoundRobinMatch> {
        self.matches.iter().filter(move |m| m.group_id == Some(id))
    }

    /// Every group match across every group has a winner.
    pub fn is_complete(&self) -> bool {
        !self.matches.is_empty() && self.matches.iter().all(RoundRobinMatch::is_decided)
    }
}

/// Result of a score report in the group stage.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GroupScoreReport {
    pub group_id: GroupId,
    pub winner: PlayerId,
    pub edited: bool,
    /// Every match of every group is now decided.
    pub stage_complete: bool,
}

/// Players leaving the group stage, split by how they finished.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Qualifiers {
    /// Rank-1 players, in group order.
    pub winners: Vec<PlayerId>,
    /// Rank-2 players, shuffled.
    pub runners_up: Vec<PlayerId>,
    /// Everyone else, in roster order.
    pub others: Vec<PlayerId>,
}

impl Qualifiers {
    pub fn count(&self) -> usize {
        self.winners.len() + self.runners_up.len()
    }
}

/// Brackets built from the group stage.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Knockout {
    /// None when fewer than two players qualified.
    pub main: Option<Bracket>,
    /// None when fewer than two players did not qualify.
    pub consolation: Option<Bracket>,
    pub main_champion: Option<PlayerId>,
    pub consolation_champion: Option<PlayerId>,
}
