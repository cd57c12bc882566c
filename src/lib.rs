//! Tournament engine: single elimination, round robin and group knockout scheduling and progression.

pub mod logic;
pub mod models;

pub use logic::{
    advance_winner, build_bracket, build_round_robin, build_seeded_bracket, configure_groups,
    derive_knockout, form_groups, group_distribution, max_groups, parse_score, record_score,
    report_score, report_score_input, schedule_round_robin, seed_order, select_knockout_winner,
    select_winner, start_tournament, KnockoutBracket,
};
pub use models::{
    Bracket, BracketMatch, Group, GroupId, GroupPhase, GroupScoreReport, GroupStage, Knockout,
    MatchId, Opponent, Player, PlayerId, Qualifiers, RoundRobinMatch, RoundRobinPool,
    ScoreReport, Side, Standing, StandingsLedger, Tournament, TournamentError, TournamentFormat,
    TournamentId, TournamentState, MAX_PLAYERS, MAX_SEEDS, MIN_PLAYERS,
};
