//! Tournament business logic: bracket building and progression, round robin, standings, groups.

mod bracket;
mod groups;
mod play;
mod progression;
mod round_robin;
mod setup;
mod standings;

pub use bracket::{build_bracket, build_seeded_bracket, seed_order};
pub use groups::{derive_knockout, form_groups, group_distribution, max_groups};
pub use play::{
    report_score, report_score_input, select_knockout_winner, select_winner, KnockoutBracket,
};
pub use progression::advance_winner;
pub use round_robin::{build_round_robin, record_score, schedule_round_robin};
pub use setup::{configure_groups, start_tournament};
pub use standings::parse_score;
