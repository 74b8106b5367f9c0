//! Scheduling and aggregation logic: stats, selection, pairing, rounds, leaderboard.

mod leaderboard;
mod pairing;
mod rounds;
mod selection;
mod stats;

pub use leaderboard::{leaderboard, LeaderboardEntry};
pub use pairing::{best_split, PenaltyWeights, SplitOutcome, TeamCombination};
pub use rounds::{
    generate_next_match, generate_next_round, generate_round, CourtTrace, GeneratedRound,
};
pub use selection::{select_four, Selection};
pub use stats::{compute_player_stats, PlayerStats};

/// Errors from the match scheduler. All are fatal to the current call and
/// leave the caller's state untouched; nothing is retried internally.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SchedulerError {
    /// The roster is too small for the requested court count.
    InsufficientRoster { required: usize, available: usize },
    /// Fewer than 4 players were left for the next court.
    InsufficientAvailablePlayers { available: usize },
    /// The team split was not given exactly 4 distinct, known players.
    InvalidSelectionSize { expected: usize, actual: usize },
}

impl std::fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulerError::InsufficientRoster {
                required,
                available,
            } => write!(
                f,
                "Need at least {} players to generate this round (have {})",
                required, available
            ),
            SchedulerError::InsufficientAvailablePlayers { available } => write!(
                f,
                "Only {} players left for the next court (need 4)",
                available
            ),
            SchedulerError::InvalidSelectionSize { expected, actual } => write!(
                f,
                "Team split requires exactly {} distinct players (got {})",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for SchedulerError {}
