//! Tournament, TournamentState and TournamentError.

use crate::models::bracket::Bracket;
use crate::models::group::letter_label;
use crate::models::player::{Player, PlayerId};
use crate::models::stage::{GroupStage, Knockout, RoundRobinPool};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Read;
use uuid::Uuid;

/// Smallest roster that can start any format.
pub const MIN_PLAYERS: usize = 2;
/// Largest roster accepted.
pub const MAX_PLAYERS: usize = 28;
/// Most players that may be seeded at once.
pub const MAX_SEEDS: usize = 8;

/// Errors that can occur during tournament operations. None of them leave state half-mutated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Both scores of a match are equal; ties are not supported.
    EqualScores,
    /// A score was not a non-negative integer.
    InvalidScore(String),
    /// Roster size outside [2, 28] for the requested action.
    PlayerCountOutOfRange { count: usize },
    /// More than 8 players seeded.
    TooManySeeds { count: usize },
    /// Group count outside [2, players / 2].
    GroupCountOutOfRange { requested: usize, max: usize },
    /// A player with this name already exists (names are unique, case-insensitive).
    DuplicatePlayerName,
    /// Player names must not be blank.
    EmptyPlayerName,
    /// A roster file could not be read.
    InvalidRoster(String),
    /// Tournament is not in a state that allows this action.
    InvalidState,
    /// Player not found in the roster or in the match.
    PlayerNotFound(PlayerId),
    /// No match with this id in the targeted schedule or bracket.
    MatchNotFound(Uuid),
    /// A bracket match still waits for an opponent, or faces a bye.
    MatchNotReady(Uuid),
    /// A bracket match already has a winner; elimination results can't be edited.
    MatchAlreadyDecided(Uuid),
    /// The selected winner does not play in that match.
    InvalidWinner(PlayerId),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::EqualScores => write!(f, "Scores cannot be equal"),
            TournamentError::InvalidScore(raw) => write!(f, "Score must be a number (got {:?})", raw),
            TournamentError::PlayerCountOutOfRange { count } => write!(
                f,
                "Need between {} and {} players (have {})",
                MIN_PLAYERS, MAX_PLAYERS, count
            ),
            TournamentError::TooManySeeds { count } => {
                write!(f, "At most {} players can be seeded (got {})", MAX_SEEDS, count)
            }
            TournamentError::GroupCountOutOfRange { requested, max } => {
                write!(f, "Number of groups must be between 2 and {} (got {})", max, requested)
            }
            TournamentError::DuplicatePlayerName => write!(f, "A player with this name already exists"),
            TournamentError::EmptyPlayerName => write!(f, "Player name cannot be empty"),
            TournamentError::InvalidRoster(msg) => write!(f, "Invalid roster: {}", msg),
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::PlayerNotFound(_) => write!(f, "Player not found"),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::MatchNotReady(_) => write!(f, "Match is not ready to be decided"),
            TournamentError::MatchAlreadyDecided(_) => write!(f, "Match already has a winner"),
            TournamentError::InvalidWinner(_) => write!(f, "Selected winner does not play in this match"),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Scheduling format chosen when the tournament starts.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    SingleElimination,
    RoundRobin,
    GroupKnockout,
}

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentState {
    /// Editing the roster; not started.
    #[default]
    Setup,
    /// Group knockout chosen; waiting for the number of groups.
    GroupConfig,
    /// Matches are being played.
    InProgress,
    /// A champion has been decided.
    Finished,
}

/// Stage of a group knockout tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupPhase {
    #[default]
    Groups,
    Knockout,
}

/// Full tournament state: roster, chosen format and the state of that format.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub created_at: DateTime<Utc>,
    pub players: Vec<Player>,
    /// Use the seeded bracket when more than one player is seeded.
    pub seeding_enabled: bool,
    pub format: Option<TournamentFormat>,
    pub state: TournamentState,
    pub group_phase: GroupPhase,
    /// Single elimination bracket.
    pub bracket: Option<Bracket>,
    pub round_robin: Option<RoundRobinPool>,
    pub group_stage: Option<GroupStage>,
    pub knockout: Option<Knockout>,
    pub champion: Option<PlayerId>,
}

impl Default for Tournament {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct RosterRow {
    name: String,
    #[serde(default)]
    seeded: bool,
}

impl Tournament {
    /// Create a new tournament in Setup state with no players.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            players: Vec::new(),
            seeding_enabled: false,
            format: None,
            state: TournamentState::Setup,
            group_phase: GroupPhase::Groups,
            bracket: None,
            round_robin: None,
            group_stage: None,
            knockout: None,
            champion: None,
        }
    }

    /// Create a tournament with initial players. Still in Setup until started.
    pub fn with_players(players: Vec<Player>) -> Self {
        Self {
            players,
            ..Self::new()
        }
    }

    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Display name for a player id, if it is on the roster.
    pub fn player_name(&self, id: PlayerId) -> Option<&str> {
        self.get_player(id).map(|p| p.name.as_str())
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    pub fn seeded_count(&self) -> usize {
        self.players.iter().filter(|p| p.seeded).count()
    }

    /// Add a player (Setup only). Names are trimmed and unique (case-insensitive).
    pub fn add_player(&mut self, name: impl Into<String>) -> Result<PlayerId, TournamentError> {
        if self.state != TournamentState::Setup {
            return Err(TournamentError::InvalidState);
        }
        let player = validate_new_player(&self.players, name.into(), false)?;
        let id = player.id;
        self.players.push(player);
        Ok(id)
    }

    /// Remove a player by id (Setup only).
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<(), TournamentError> {
        if self.state != TournamentState::Setup {
            return Err(TournamentError::InvalidState);
        }
        let idx = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(TournamentError::PlayerNotFound(player_id))?;
        self.players.remove(idx);
        Ok(())
    }

    /// Flip a player's seeded flag (Setup only). Seeding a ninth player is rejected.
    pub fn toggle_seed(&mut self, player_id: PlayerId) -> Result<bool, TournamentError> {
        if self.state != TournamentState::Setup {
            return Err(TournamentError::InvalidState);
        }
        let seeded_count = self.seeded_count();
        let p = self
            .players
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or(TournamentError::PlayerNotFound(player_id))?;
        if !p.seeded && seeded_count >= MAX_SEEDS {
            return Err(TournamentError::TooManySeeds {
                count: seeded_count + 1,
            });
        }
        p.seeded = !p.seeded;
        Ok(p.seeded)
    }

    /// Turn seeded bracket placement on or off (Setup only).
    pub fn set_seeding_enabled(&mut self, enabled: bool) -> Result<(), TournamentError> {
        if self.state != TournamentState::Setup {
            return Err(TournamentError::InvalidState);
        }
        self.seeding_enabled = enabled;
        Ok(())
    }

    /// Replace the roster with `count` players named A, B, ..., Z, AA, AB (Setup only).
    pub fn quick_add(&mut self, count: usize) -> Result<(), TournamentError> {
        if self.state != TournamentState::Setup {
            return Err(TournamentError::InvalidState);
        }
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(TournamentError::PlayerCountOutOfRange { count });
        }
        self.players = (0..count).map(|i| Player::new(letter_label(i))).collect();
        Ok(())
    }

    /// Append players from CSV with a `name` column and an optional `seeded` column (Setup only).
    /// Either every row is added or none is.
    pub fn import_roster_csv<R: Read>(&mut self, reader: R) -> Result<usize, TournamentError> {
        if self.state != TournamentState::Setup {
            return Err(TournamentError::InvalidState);
        }
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut roster = self.players.clone();
        let mut added = 0;
        for row in rdr.deserialize::<RosterRow>() {
            let row = row.map_err(|e| TournamentError::InvalidRoster(e.to_string()))?;
            roster.push(validate_new_player(&roster, row.name, row.seeded)?);
            added += 1;
        }
        let seeded = roster.iter().filter(|p| p.seeded).count();
        if seeded > MAX_SEEDS {
            return Err(TournamentError::TooManySeeds { count: seeded });
        }
        self.players = roster;
        Ok(added)
    }

    /// Discard all phase state and return to Setup, keeping the roster and seeding choice.
    pub fn back_to_setup(&mut self) {
        *self = Self {
            id: self.id,
            created_at: self.created_at,
            players: std::mem::take(&mut self.players),
            seeding_enabled: self.seeding_enabled,
            ..Self::new()
        };
    }

    /// Start over from an empty roster. The tournament id is kept.
    pub fn reset(&mut self) {
        *self = Self {
            id: self.id,
            ..Self::new()
        };
    }
}

fn validate_new_player(
    roster: &[Player],
    name: String,
    seeded: bool,
) -> Result<Player, TournamentError> {
    if roster.len() >= MAX_PLAYERS {
        return Err(TournamentError::PlayerCountOutOfRange {
            count: roster.len() + 1,
        });
    }
    let name = name.trim();
    if name.is_empty() {
        return Err(TournamentError::EmptyPlayerName);
    }
    if roster.iter().any(|p| p.name.eq_ignore_ascii_case(name)) {
        return Err(TournamentError::DuplicatePlayerName);
    }
    let mut player = Player::new(name);
    player.seeded = seeded;
    Ok(player)
}
