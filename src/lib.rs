//! Padel Americano web app: library with models and scheduling logic.

pub mod logic;
pub mod models;

pub use logic::{
    best_split, compute_player_stats, generate_next_match, generate_next_round, generate_round,
    leaderboard, select_four, CourtTrace, GeneratedRound, LeaderboardEntry, PenaltyWeights,
    PlayerStats, SchedulerError, Selection, SplitOutcome, TeamCombination,
};
pub use models::{Match, MatchId, MatchScore, Player, Session, SessionError, SessionId, Side};
