//! Standings ledger: score recording with exact correction, and ranking.

use crate::models::{PlayerId, RoundRobinMatch, Standing, StandingsLedger, TournamentError};
use chrono::Utc;
use std::cmp::Ordering;

/// Parse a score typed by a user. Surrounding whitespace is ignored.
pub fn parse_score(raw: &str) -> Result<u32, TournamentError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| TournamentError::InvalidScore(raw.to_string()))
}

impl StandingsLedger {
    /// Write a score into `m` and update both players' standings. Returns the winner.
    ///
    /// A first report counts the game for both players. An edit first takes the previous
    /// result back out (wins, losses, points) without touching `games_played`, then applies
    /// the new one the same way a first report does. Equal scores or players missing from
    /// this ledger are rejected before anything changes.
    pub fn record_score(
        &mut self,
        m: &mut RoundRobinMatch,
        player_1_score: u32,
        player_2_score: u32,
    ) -> Result<PlayerId, TournamentError> {
        if player_1_score == player_2_score {
            return Err(TournamentError::EqualScores);
        }
        for player in [m.player_1, m.player_2] {
            if !self.contains(player) {
                return Err(TournamentError::PlayerNotFound(player));
            }
        }

        let previous = match (m.result(), m.player_1_score, m.player_2_score) {
            (Some((winner, loser)), Some(s1), Some(s2)) => Some((winner, loser, s1, s2)),
            _ => None,
        };
        if let Some((old_winner, old_loser, s1, s2)) = previous {
            self.standing(old_winner)?.wins -= 1;
            self.standing(old_loser)?.losses -= 1;
            self.remove_points(m.player_1, s1, s2)?;
            self.remove_points(m.player_2, s2, s1)?;
        } else {
            self.standing(m.player_1)?.games_played += 1;
            self.standing(m.player_2)?.games_played += 1;
        }

        let (winner, loser) = if player_1_score > player_2_score {
            (m.player_1, m.player_2)
        } else {
            (m.player_2, m.player_1)
        };
        self.standing(winner)?.wins += 1;
        self.standing(loser)?.losses += 1;
        self.add_points(m.player_1, player_1_score, player_2_score)?;
        self.add_points(m.player_2, player_2_score, player_1_score)?;

        m.player_1_score = Some(player_1_score);
        m.player_2_score = Some(player_2_score);
        m.winner = Some(winner);
        m.reported_at = Some(Utc::now());
        Ok(winner)
    }

    /// Ranking used for group qualification: wins, then point difference, both descending.
    /// Full ties keep roster order.
    pub fn ranked(&self) -> Vec<&Standing> {
        let mut rows: Vec<&Standing> = self.entries.iter().collect();
        rows.sort_by(|a, b| by_wins_then_difference(a, b));
        rows
    }

    /// Ranking for the final table: as [`ranked`](Self::ranked), then points scored.
    pub fn final_ranked(&self) -> Vec<&Standing> {
        let mut rows: Vec<&Standing> = self.entries.iter().collect();
        rows.sort_by(|a, b| by_wins_then_difference(a, b).then(b.points_for.cmp(&a.points_for)));
        rows
    }

    fn standing(&mut self, player: PlayerId) -> Result<&mut Standing, TournamentError> {
        self.get_mut(player)
            .ok_or(TournamentError::PlayerNotFound(player))
    }

    fn add_points(&mut self, player: PlayerId, scored: u32, conceded: u32) -> Result<(), TournamentError> {
        let s = self.standing(player)?;
        s.points_for += i64::from(scored);
        s.points_against += i64::from(conceded);
        s.recompute_difference();
        Ok(())
    }

    fn remove_points(&mut self, player: PlayerId, scored: u32, conceded: u32) -> Result<(), TournamentError> {
        let s = self.standing(player)?;
        s.points_for -= i64::from(scored);
        s.points_against -= i64::from(conceded);
        s.recompute_difference();
        Ok(())
    }
}

fn by_wins_then_difference(a: &Standing, b: &Standing) -> Ordering {
    b.wins
        .cmp(&a.wins)
        .then(b.point_difference.cmp(&a.point_difference))
}
