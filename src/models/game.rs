//! Match data structures for 2v2 Americano games.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Final score of a match: (first team points, second team points).
pub type MatchScore = (u32, u32);

/// Which side of a match a player is on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    First,
    Second,
}

/// A single 2v2 match on one court. Teams are fixed at creation; only the
/// score changes afterwards (absent until entered, re-entry overwrites).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// Round this match belongs to (1-based; all matches generated together
    /// share it).
    pub round_number: u32,
    pub first_team: [String; 2],
    pub second_team: [String; 2],
    /// None until a score has been entered.
    pub match_score: Option<MatchScore>,
}

impl Match {
    pub fn new(round_number: u32, first_team: [String; 2], second_team: [String; 2]) -> Self {
        Self {
            id: Uuid::new_v4(),
            round_number,
            first_team,
            second_team,
            match_score: None,
        }
    }

    /// Which side the player is on, if they are in this match at all.
    pub fn side_of(&self, name: &str) -> Option<Side> {
        if self.first_team.iter().any(|n| n == name) {
            Some(Side::First)
        } else if self.second_team.iter().any(|n| n == name) {
            Some(Side::Second)
        } else {
            None
        }
    }

    /// The player's own team and the opposing team, if they are in this match.
    pub fn teams_for(&self, name: &str) -> Option<(&[String; 2], &[String; 2])> {
        match self.side_of(name)? {
            Side::First => Some((&self.first_team, &self.second_team)),
            Side::Second => Some((&self.second_team, &self.first_team)),
        }
    }

    /// All four player names in this match.
    pub fn players(&self) -> impl Iterator<Item = &String> {
        self.first_team.iter().chain(self.second_team.iter())
    }
}
