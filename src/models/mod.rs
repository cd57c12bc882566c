//! Data structures for the tournament engine: players, matches, standings, groups, tournament state.

mod bracket;
mod game;
mod group;
mod player;
mod stage;
mod standing;
mod tournament;

pub use bracket::Bracket;
pub use game::{BracketMatch, MatchId, RoundRobinMatch, Side};
pub use group::{letter_label, Group, GroupId};
pub use player::{Opponent, Player, PlayerId};
pub use stage::{GroupScoreReport, GroupStage, Knockout, Qualifiers, RoundRobinPool, ScoreReport};
pub use standing::{Standing, StandingsLedger};
pub use tournament::{
    GroupPhase, Tournament, TournamentError, TournamentFormat, TournamentId, TournamentState,
    MAX_PLAYERS, MAX_SEEDS, MIN_PLAYERS,
};
