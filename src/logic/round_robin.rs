//! Round-robin scheduling with the circle method, and the whole-roster pool.

use crate::models::{
    GroupId, MatchId, PlayerId, RoundRobinMatch, RoundRobinPool, ScoreReport, StandingsLedger,
    TournamentError,
};

/// Schedule every pairing of `players` once, round by round.
///
/// An odd field gets a bye (`None`), giving `n` even. There are `n - 1` rounds; in each,
/// position `i` plays position `n - 1 - i`, pairings with the bye are skipped. Between
/// rounds the last entry moves to index 1 while index 0 stays fixed.
pub fn schedule_round_robin(players: &[PlayerId], group_id: Option<GroupId>) -> Vec<RoundRobinMatch> {
    if players.len() < 2 {
        return Vec::new();
    }
    let mut circle: Vec<Option<PlayerId>> = players.iter().copied().map(Some).collect();
    if circle.len() % 2 != 0 {
        circle.push(None);
    }
    let n = circle.len();
    let mut schedule = Vec::with_capacity(players.len() * (players.len() - 1) / 2);
    for round in 0..n - 1 {
        for i in 0..n / 2 {
            if let (Some(p1), Some(p2)) = (circle[i], circle[n - 1 - i]) {
                schedule.push(RoundRobinMatch::new(p1, p2, round as u32 + 1, group_id));
            }
        }
        if let Some(last) = circle.pop() {
            circle.insert(1, last);
        }
    }
    schedule
}

/// Schedule a round robin over the whole roster with zeroed standings.
pub fn build_round_robin(players: &[PlayerId]) -> RoundRobinPool {
    RoundRobinPool {
        matches: schedule_round_robin(players, None),
        standings: StandingsLedger::new(players),
    }
}

impl RoundRobinPool {
    /// Record or correct the score of one match and report whether the pool is finished.
    pub fn record_score(
        &mut self,
        match_id: MatchId,
        player_1_score: u32,
        player_2_score: u32,
    ) -> Result<ScoreReport, TournamentError> {
        let m = self
            .matches
            .iter_mut()
            .find(|m| m.id == match_id)
            .ok_or(TournamentError::MatchNotFound(match_id))?;
        let edited = m.is_decided();
        let winner = self.standings.record_score(m, player_1_score, player_2_score)?;
        let completed = self.is_complete();
        let champion = if completed { self.champion() } else { None };
        Ok(ScoreReport {
            winner,
            edited,
            completed,
            champion,
        })
    }

    /// Top of the final ranking, once every match is decided.
    pub fn champion(&self) -> Option<PlayerId> {
        if !self.is_complete() {
            return None;
        }
        self.standings.final_ranked().first().map(|s| s.player_id)
    }
}

/// Record a score in a pool, returning the updated pool and its report.
pub fn record_score(
    mut pool: RoundRobinPool,
    match_id: MatchId,
    player_1_score: u32,
    player_2_score: u32,
) -> Result<(RoundRobinPool, ScoreReport), TournamentError> {
    let report = pool.record_score(match_id, player_1_score, player_2_score)?;
    Ok((pool, report))
}
