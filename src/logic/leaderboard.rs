//! Leaderboard aggregation over scored matches.

use crate::models::{Match, Player, Side};
use serde::Serialize;

/// One leaderboard row. Derived entirely from the match list.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub name: String,
    /// Completed games only: a match without a score, or with a 0-0 score,
    /// has not been played yet and is not counted here.
    pub games_played: u32,
    pub total_points: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

/// Aggregate points and win/loss/tie records, one entry per roster player in
/// roster order. Unscored matches are ignored throughout; a 0-0 score counts
/// toward points and W/L/T but not toward completed games.
pub fn leaderboard(players: &[Player], matches: &[Match]) -> Vec<LeaderboardEntry> {
    players
        .iter()
        .map(|player| {
            let mut entry = LeaderboardEntry {
                name: player.name.clone(),
                games_played: 0,
                total_points: 0,
                wins: 0,
                losses: 0,
                ties: 0,
            };
            for m in matches {
                let (first_score, second_score) = match m.match_score {
                    Some(score) => score,
                    None => continue,
                };
                let side = match m.side_of(&player.name) {
                    Some(side) => side,
                    None => continue,
                };
                let (own, other) = match side {
                    Side::First => (first_score, second_score),
                    Side::Second => (second_score, first_score),
                };
                entry.total_points += own;
                if own == other {
                    entry.ties += 1;
                } else if own > other {
                    entry.wins += 1;
                } else {
                    entry.losses += 1;
                }
                if !(first_score == 0 && second_score == 0) {
                    entry.games_played += 1;
                }
            }
            entry
        })
        .collect()
}
