//! Bracket progression: winner selection and fixed-point propagation.

use crate::models::{Bracket, MatchId, Opponent, PlayerId, Side, TournamentError};

impl Bracket {
    /// Record the winner of a playable match, then propagate.
    ///
    /// The match must exist, have no winner yet and have two real opponents, and
    /// `winner` must be one of them. Decided matches are never overwritten here.
    /// Returns the champion if this completed the bracket.
    pub fn select_winner(
        &mut self,
        match_id: MatchId,
        winner: PlayerId,
    ) -> Result<Option<PlayerId>, TournamentError> {
        let idx = self
            .position(match_id)
            .ok_or(TournamentError::MatchNotFound(match_id))?;
        let m = &mut self.matches[idx];
        if m.winner.is_some() {
            return Err(TournamentError::MatchAlreadyDecided(match_id));
        }
        if !m.is_playable() {
            return Err(TournamentError::MatchNotReady(match_id));
        }
        if !m.has_player(winner) {
            return Err(TournamentError::InvalidWinner(winner));
        }
        m.winner = Some(winner);
        log::debug!("Round {} match {} won by {}", m.round, m.match_number, winner);
        Ok(self.propagate())
    }

    /// Push every decided result forward until nothing changes.
    ///
    /// A decided match fills its successor's slot (odd match number: slot 1, even: slot 2)
    /// when that slot is still unresolved. A match between two byes forwards a bye, and an
    /// undecided match of one real player against a bye is a walkover. Safe to call at any
    /// time; it only fills empty slots and undecided walkovers.
    /// Returns the champion once the final has a winner.
    pub fn propagate(&mut self) -> Option<PlayerId> {
        let mut changed = true;
        while changed {
            changed = false;
            for i in 0..self.matches.len() {
                if let Some(p) = self.matches[i].walkover() {
                    self.matches[i].winner = Some(p);
                    changed = true;
                }
                let m = &self.matches[i];
                let (Some(advancing), Some(next_id)) = (m.advancing(), m.next_match_id) else {
                    continue;
                };
                let side = Side::for_match_number(m.match_number);
                let Some(j) = self.position(next_id) else {
                    continue;
                };
                let slot = self.matches[j].slot_mut(side);
                if *slot == Opponent::Unresolved {
                    *slot = advancing;
                    changed = true;
                }
            }
        }
        let champion = self.champion();
        if let Some(p) = champion {
            log::info!("Bracket complete, champion {}", p);
        }
        champion
    }
}

/// Apply a winner to one match and return the updated bracket with its champion, if any.
pub fn advance_winner(
    mut bracket: Bracket,
    match_id: MatchId,
    winner: PlayerId,
) -> Result<(Bracket, Option<PlayerId>), TournamentError> {
    let champion = bracket.select_winner(match_id, winner)?;
    Ok((bracket, champion))
}
