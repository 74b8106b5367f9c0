//! Session and SessionError.

use crate::logic::SchedulerError;
use crate::models::game::{Match, MatchId, MatchScore};
use crate::models::player::Player;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a session.
pub type SessionId = Uuid;

/// Errors that can occur during session operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SessionError {
    /// A player with this name already exists (names are unique, case-insensitive).
    DuplicatePlayerName,
    /// Player name is empty after trimming.
    EmptyPlayerName,
    /// No match with this id in the session.
    MatchNotFound(MatchId),
    /// Session was created with zero courts; nothing to schedule.
    NoCourtsConfigured,
    /// Scheduling failed; the session is unchanged.
    Scheduler(SchedulerError),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::DuplicatePlayerName => write!(f, "A player with this name already exists"),
            SessionError::EmptyPlayerName => write!(f, "Player name must not be empty"),
            SessionError::MatchNotFound(_) => write!(f, "Match not found"),
            SessionError::NoCourtsConfigured => write!(f, "Session has no courts configured"),
            SessionError::Scheduler(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<SchedulerError> for SessionError {
    fn from(e: SchedulerError) -> Self {
        SessionError::Scheduler(e)
    }
}

/// One Americano tournament instance: roster, settings, and match history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub name: String,
    /// Courts filled per generated round.
    pub number_of_courts: u32,
    /// Points played per game (display/score-entry setting; the scheduler
    /// does not use it).
    pub points_per_game: u32,
    pub players: Vec<Player>,
    /// Full match history, oldest first. Append-only; only scores change.
    pub matches: Vec<Match>,
    /// Highest round number generated so far (0 before the first round).
    pub current_round: u32,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session with an empty roster and no matches.
    pub fn new(name: impl Into<String>, number_of_courts: u32, points_per_game: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            number_of_courts,
            points_per_game,
            players: Vec::new(),
            matches: Vec::new(),
            current_round: 0,
            created_at: Utc::now(),
        }
    }

    /// Add a player. Names are trimmed and must be unique (case-insensitive).
    pub fn add_player(&mut self, name: impl Into<String>) -> Result<(), SessionError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(SessionError::EmptyPlayerName);
        }
        let is_duplicate = self
            .players
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(trimmed));
        if is_duplicate {
            return Err(SessionError::DuplicatePlayerName);
        }
        self.players.push(Player::new(trimmed));
        Ok(())
    }

    /// Look up a match by id.
    pub fn get_match(&self, match_id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == match_id)
    }

    /// Set (or overwrite) the score of a match. Other matches are untouched.
    pub fn set_match_score(
        &mut self,
        match_id: MatchId,
        score: MatchScore,
    ) -> Result<(), SessionError> {
        let m = self
            .matches
            .iter_mut()
            .find(|m| m.id == match_id)
            .ok_or(SessionError::MatchNotFound(match_id))?;
        m.match_score = Some(score);
        Ok(())
    }

    /// Append freshly generated matches and re-derive per-player game counts.
    pub(crate) fn apply_round(&mut self, new_matches: Vec<Match>) {
        for m in &new_matches {
            self.current_round = self.current_round.max(m.round_number);
        }
        self.matches.extend(new_matches);
        self.sync_games_played();
    }

    /// Recompute every player's `games_played` from the match list so the
    /// stored counter cannot drift from the history.
    fn sync_games_played(&mut self) {
        let matches = &self.matches;
        for p in &mut self.players {
            p.games_played = matches
                .iter()
                .filter(|m| m.side_of(&p.name).is_some())
                .count() as u32;
        }
    }
}
