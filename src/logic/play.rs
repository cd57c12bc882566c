//! In-progress phase: score reports and winner selections, with the phase changes they cause.

use crate::logic::groups::derive_knockout;
use crate::logic::standings::parse_score;
use crate::models::{
    Bracket, GroupPhase, MatchId, PlayerId, Tournament, TournamentError, TournamentFormat,
    TournamentState,
};

/// Which knockout bracket a selection targets.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnockoutBracket {
    Main,
    Consolation,
}

fn require(tournament: &Tournament, format: TournamentFormat) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::InProgress || tournament.format != Some(format) {
        return Err(TournamentError::InvalidState);
    }
    Ok(())
}

fn finish(tournament: &mut Tournament, champion: PlayerId) {
    tournament.champion = Some(champion);
    tournament.state = TournamentState::Finished;
    log::info!(
        "Tournament {} finished, champion {}",
        tournament.id,
        tournament.player_name(champion).unwrap_or("?")
    );
}

/// Select the winner of a single-elimination match. Finishes the tournament on the final.
pub fn select_winner(
    tournament: &mut Tournament,
    match_id: MatchId,
    winner: PlayerId,
) -> Result<Option<PlayerId>, TournamentError> {
    require(tournament, TournamentFormat::SingleElimination)?;
    let bracket = tournament.bracket.as_mut().ok_or(TournamentError::InvalidState)?;
    let champion = bracket.select_winner(match_id, winner)?;
    if let Some(p) = champion {
        finish(tournament, p);
    }
    Ok(champion)
}

/// Report (or correct) a score in a round robin or in the group stage.
///
/// Completing a round robin finishes the tournament. Completing the group stage builds
/// the knockout brackets in the same call; a main bracket decided by walkovers alone
/// finishes the tournament immediately.
pub fn report_score(
    tournament: &mut Tournament,
    match_id: MatchId,
    player_1_score: u32,
    player_2_score: u32,
) -> Result<PlayerId, TournamentError> {
    if tournament.state != TournamentState::InProgress {
        return Err(TournamentError::InvalidState);
    }
    match tournament.format {
        Some(TournamentFormat::RoundRobin) => {
            let pool = tournament
                .round_robin
                .as_mut()
                .ok_or(TournamentError::InvalidState)?;
            let report = pool.record_score(match_id, player_1_score, player_2_score)?;
            if let Some(p) = report.champion {
                finish(tournament, p);
            }
            Ok(report.winner)
        }
        Some(TournamentFormat::GroupKnockout) if tournament.group_phase == GroupPhase::Groups => {
            let stage = tournament
                .group_stage
                .as_mut()
                .ok_or(TournamentError::InvalidState)?;
            let report = stage.record_score(match_id, player_1_score, player_2_score)?;
            if report.stage_complete {
                start_knockout(tournament)?;
            }
            Ok(report.winner)
        }
        _ => Err(TournamentError::InvalidState),
    }
}

/// [`report_score`] for raw user input; non-numeric scores are rejected before anything changes.
pub fn report_score_input(
    tournament: &mut Tournament,
    match_id: MatchId,
    player_1_score: &str,
    player_2_score: &str,
) -> Result<PlayerId, TournamentError> {
    let s1 = parse_score(player_1_score)?;
    let s2 = parse_score(player_2_score)?;
    report_score(tournament, match_id, s1, s2)
}

fn start_knockout(tournament: &mut Tournament) -> Result<(), TournamentError> {
    let stage = tournament
        .group_stage
        .as_ref()
        .ok_or(TournamentError::InvalidState)?;
    let knockout = derive_knockout(
        &stage.groups,
        &stage.standings,
        &tournament.player_ids(),
        &mut rand::thread_rng(),
    );
    let immediate = knockout.main_champion;
    tournament.knockout = Some(knockout);
    tournament.group_phase = GroupPhase::Knockout;
    log::debug!("Tournament {} group stage complete", tournament.id);
    if let Some(p) = immediate {
        finish(tournament, p);
    }
    Ok(())
}

/// Select a winner in the main or consolation knockout bracket.
/// Only the main final finishes the tournament.
pub fn select_knockout_winner(
    tournament: &mut Tournament,
    which: KnockoutBracket,
    match_id: MatchId,
    winner: PlayerId,
) -> Result<Option<PlayerId>, TournamentError> {
    // The consolation bracket may still be played out after the main final.
    match which {
        KnockoutBracket::Main => require(tournament, TournamentFormat::GroupKnockout)?,
        KnockoutBracket::Consolation => {
            if tournament.format != Some(TournamentFormat::GroupKnockout) {
                return Err(TournamentError::InvalidState);
            }
        }
    }
    if tournament.group_phase != GroupPhase::Knockout {
        return Err(TournamentError::InvalidState);
    }
    let knockout = tournament.knockout.as_mut().ok_or(TournamentError::InvalidState)?;
    let bracket: &mut Bracket = match which {
        KnockoutBracket::Main => knockout.main.as_mut(),
        KnockoutBracket::Consolation => knockout.consolation.as_mut(),
    }
    .ok_or(TournamentError::MatchNotFound(match_id))?;
    let champion = bracket.select_winner(match_id, winner)?;
    match which {
        KnockoutBracket::Main => {
            knockout.main_champion = champion;
            if let Some(p) = champion {
                finish(tournament, p);
            }
        }
        KnockoutBracket::Consolation => knockout.consolation_champion = champion,
    }
    Ok(champion)
}
