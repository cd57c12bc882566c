//! Setup phase: start the tournament in the chosen format and configure groups.

use crate::logic::bracket::{build_bracket, build_seeded_bracket};
use crate::logic::groups::form_groups;
use crate::logic::round_robin::build_round_robin;
use crate::models::{
    GroupPhase, PlayerId, Tournament, TournamentError, TournamentFormat, TournamentState,
    MIN_PLAYERS,
};

/// Start the tournament (Setup only, at least 2 players).
///
/// Single elimination is built straight away, seeded when seeding is enabled and more
/// than one player is seeded. Round robin schedules the whole roster. Group knockout
/// moves to GroupConfig and waits for [`configure_groups`].
pub fn start_tournament(
    tournament: &mut Tournament,
    format: TournamentFormat,
) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::Setup {
        return Err(TournamentError::InvalidState);
    }
    if tournament.players.len() < MIN_PLAYERS {
        return Err(TournamentError::PlayerCountOutOfRange {
            count: tournament.players.len(),
        });
    }

    let mut rng = rand::thread_rng();
    match format {
        TournamentFormat::SingleElimination => {
            let use_seeding = tournament.seeding_enabled && tournament.seeded_count() > 1;
            let bracket = if use_seeding {
                let (seeded, others): (Vec<_>, Vec<_>) =
                    tournament.players.iter().partition(|p| p.seeded);
                let seeded: Vec<PlayerId> = seeded.iter().map(|p| p.id).collect();
                let others: Vec<PlayerId> = others.iter().map(|p| p.id).collect();
                build_seeded_bracket(&seeded, &others, &mut rng)?
            } else {
                build_bracket(&tournament.player_ids(), true, &mut rng)
            };
            tournament.champion = bracket.champion();
            tournament.bracket = Some(bracket);
            tournament.state = if tournament.champion.is_some() {
                TournamentState::Finished
            } else {
                TournamentState::InProgress
            };
        }
        TournamentFormat::RoundRobin => {
            tournament.round_robin = Some(build_round_robin(&tournament.player_ids()));
            tournament.state = TournamentState::InProgress;
        }
        TournamentFormat::GroupKnockout => {
            tournament.state = TournamentState::GroupConfig;
        }
    }
    tournament.format = Some(format);
    log::debug!(
        "Tournament {} started as {:?} with {} players",
        tournament.id,
        format,
        tournament.players.len()
    );
    Ok(())
}

/// Split the roster into `num_groups` groups and start the group stage (GroupConfig only).
pub fn configure_groups(tournament: &mut Tournament, num_groups: usize) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::GroupConfig {
        return Err(TournamentError::InvalidState);
    }
    let stage = form_groups(&tournament.player_ids(), num_groups, &mut rand::thread_rng())?;
    tournament.group_stage = Some(stage);
    tournament.group_phase = GroupPhase::Groups;
    tournament.state = TournamentState::InProgress;
    Ok(())
}
