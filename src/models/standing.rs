//! Standing and StandingsLedger data structures.

use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};

/// Aggregate record for one player within one pool (whole roster or one group).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub player_id: PlayerId,
    pub wins: u32,
    pub losses: u32,
    pub games_played: u32,
    pub points_for: i64,
    pub points_against: i64,
    /// Always `points_for - points_against`, recomputed on every report.
    pub point_difference: i64,
}

impl Standing {
    /// A zeroed standing for a player who has not played yet.
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            ..Self::default()
        }
    }

    pub(crate) fn recompute_difference(&mut self) {
        self.point_difference = self.points_for - self.points_against;
    }
}

/// Standings of one pool, kept in roster order so ranking ties stay in encounter order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StandingsLedger {
    pub(crate) entries: Vec<Standing>,
}

impl StandingsLedger {
    /// Zeroed standings for every given player.
    pub fn new(players: &[PlayerId]) -> Self {
        Self {
            entries: players.iter().copied().map(Standing::new).collect(),
        }
    }

    pub fn get(&self, player: PlayerId) -> Option<&Standing> {
        self.entries.iter().find(|s| s.player_id == player)
    }

    pub(crate) fn get_mut(&mut self, player: PlayerId) -> Option<&mut Standing> {
        self.entries.iter_mut().find(|s| s.player_id == player)
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.get(player).is_some()
    }

    /// Entries in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &Standing> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
