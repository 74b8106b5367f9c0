//! Participation stats: who has played how much, with whom, against whom.

use crate::models::{Match, Player};
use std::collections::{HashMap, HashSet};

/// Per-player participation derived from a match list. Recomputed on every
/// scheduling call, never stored.
#[derive(Clone, Debug, Default)]
pub struct PlayerStats {
    pub name: String,
    pub games_played: u32,
    /// How many times this player has been teamed with each partner.
    pub teammate_count: HashMap<String, u32>,
    /// How many times this player has faced each opponent.
    pub opponent_count: HashMap<String, u32>,
    /// Distinct partners this player has been teamed with at least once.
    pub partners_played_with: HashSet<String>,
}

impl PlayerStats {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Times this player has already partnered with `other`.
    pub fn times_partnered_with(&self, other: &str) -> u32 {
        self.teammate_count.get(other).copied().unwrap_or(0)
    }

    /// Times this player has already faced `other`.
    pub fn times_faced(&self, other: &str) -> u32 {
        self.opponent_count.get(other).copied().unwrap_or(0)
    }
}

/// Fold the match list into per-player stats, one entry per roster player, in
/// roster order. A player absent from a match is untouched by it.
pub fn compute_player_stats(roster: &[Player], matches: &[Match]) -> Vec<PlayerStats> {
    roster
        .iter()
        .map(|player| {
            let mut stats = PlayerStats::new(&player.name);
            for m in matches {
                let (own_side, other_side) = match m.teams_for(&player.name) {
                    Some(sides) => sides,
                    None => continue,
                };
                stats.games_played += 1;
                for teammate in own_side {
                    if teammate != &player.name {
                        *stats.teammate_count.entry(teammate.clone()).or_insert(0) += 1;
                        stats.partners_played_with.insert(teammate.clone());
                    }
                }
                for opponent in other_side {
                    *stats.opponent_count.entry(opponent.clone()).or_insert(0) += 1;
                }
            }
            stats
        })
        .collect()
}
