//! Team split optimization: how to divide 4 selected players into two pairs.

use crate::logic::stats::PlayerStats;
use crate::logic::SchedulerError;
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// Penalty weights for the split score. Tuning knobs, not derived values;
/// the defaults are the tuned production weights.
#[derive(Clone, Copy, Debug)]
pub struct PenaltyWeights {
    /// Per repeat partnership while both players could still meet a new partner.
    pub partner_open: i64,
    /// Per repeat partnership once partner coverage is exhausted for the pair.
    pub partner_exhausted: i64,
    /// Per previous meeting between two opposing players.
    pub opponent: i64,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            partner_open: 20,
            partner_exhausted: 2,
            opponent: 1,
        }
    }
}

/// One of the three ways to split 4 players into two teams, with its score
/// (higher is better; scores are negative penalty sums).
#[derive(Clone, Debug)]
pub struct TeamCombination {
    pub first_team: [String; 2],
    pub second_team: [String; 2],
    pub score: i64,
}

/// Outcome of the split search for one court, kept for the decision trace.
#[derive(Clone, Debug)]
pub struct SplitOutcome {
    pub chosen: TeamCombination,
    /// Splits rejected by the repeat-partnership rule (0..=3; when all 3 are
    /// rejected the search falls back to the unfiltered set).
    pub filtered_out: usize,
    /// Scores of the splits that were actually ranked.
    pub candidate_scores: Vec<i64>,
}

// The three pairings of positions 0..4 into two unordered pairs.
const SPLITS: [[usize; 4]; 3] = [[0, 1, 2, 3], [0, 2, 1, 3], [0, 3, 1, 2]];

/// Find the best way to split `players` (exactly 4 distinct names, all present
/// in `stats`) into two teams of 2.
///
/// A split is excluded outright when either of its sides repeats a partnership
/// that both members could still avoid (their partner coverage is below
/// `stats.len() - 1`). If that excludes all three splits, coverage is globally
/// exhausted and all three are ranked anyway. Ties on the score are broken
/// uniformly at random.
pub fn best_split<R: Rng>(
    players: &[String],
    stats: &[PlayerStats],
    weights: &PenaltyWeights,
    rng: &mut R,
) -> Result<SplitOutcome, SchedulerError> {
    let by_name: HashMap<&str, &PlayerStats> =
        stats.iter().map(|s| (s.name.as_str(), s)).collect();

    let distinct: HashSet<&str> = players.iter().map(|n| n.as_str()).collect();
    let selected: Vec<&PlayerStats> = players
        .iter()
        .filter_map(|n| by_name.get(n.as_str()).copied())
        .collect();
    if players.len() != 4 || distinct.len() != 4 || selected.len() != 4 {
        return Err(SchedulerError::InvalidSelectionSize {
            expected: 4,
            actual: distinct.len().min(selected.len()),
        });
    }

    let max_partners = stats.len().saturating_sub(1);

    let allowed: Vec<&[usize; 4]> = SPLITS
        .iter()
        .filter(|positions| {
            let first = (selected[positions[0]], selected[positions[1]]);
            let second = (selected[positions[2]], selected[positions[3]]);
            !side_is_avoidable_repeat(first, max_partners)
                && !side_is_avoidable_repeat(second, max_partners)
        })
        .collect();
    let filtered_out = SPLITS.len() - allowed.len();

    // All three excluded means no fresh pairing is reachable for this group;
    // fall back to ranking every split.
    let candidates: Vec<&[usize; 4]> = if allowed.is_empty() {
        SPLITS.iter().collect()
    } else {
        allowed
    };

    let scored: Vec<(&[usize; 4], i64)> = candidates
        .into_iter()
        .map(|positions| (positions, score_split(&selected, positions, max_partners, weights)))
        .collect();
    let candidate_scores: Vec<i64> = scored.iter().map(|(_, s)| *s).collect();

    let best_score = scored.iter().map(|(_, s)| *s).max().unwrap_or(0);
    let best: Vec<&[usize; 4]> = scored
        .iter()
        .filter(|(_, s)| *s == best_score)
        .map(|(p, _)| *p)
        .collect();
    let positions = best[rng.gen_range(0..best.len())];

    let chosen = TeamCombination {
        first_team: [
            selected[positions[0]].name.clone(),
            selected[positions[1]].name.clone(),
        ],
        second_team: [
            selected[positions[2]].name.clone(),
            selected[positions[3]].name.clone(),
        ],
        score: best_score,
    };

    Ok(SplitOutcome {
        chosen,
        filtered_out,
        candidate_scores,
    })
}

/// True when the pair has played together before AND both still have unplayed
/// partners left, i.e. the repeat is avoidable for them.
fn side_is_avoidable_repeat(side: (&PlayerStats, &PlayerStats), max_partners: usize) -> bool {
    let (a, b) = side;
    let repeats = a.times_partnered_with(&b.name) > 0;
    repeats && coverage_open(a, b, max_partners)
}

/// Both members of the pair can still meet a partner they have not played with.
fn coverage_open(a: &PlayerStats, b: &PlayerStats, max_partners: usize) -> bool {
    a.partners_played_with.len() < max_partners && b.partners_played_with.len() < max_partners
}

/// Score a split: participation equality dominates, partnership freshness is
/// second (weighted heavily while coverage is incomplete), opponent repetition
/// is the weakest signal.
fn score_split(
    selected: &[&PlayerStats],
    positions: &[usize; 4],
    max_partners: usize,
    weights: &PenaltyWeights,
) -> i64 {
    let first = (selected[positions[0]], selected[positions[1]]);
    let second = (selected[positions[2]], selected[positions[3]]);

    let mut score: i64 = -selected.iter().map(|s| s.games_played as i64).sum::<i64>();

    score -= pair_penalty(first, max_partners, weights);
    score -= pair_penalty(second, max_partners, weights);

    for f in [first.0, first.1] {
        for s in [second.0, second.1] {
            score -= weights.opponent * f.times_faced(&s.name) as i64;
        }
    }

    score
}

fn pair_penalty(
    side: (&PlayerStats, &PlayerStats),
    max_partners: usize,
    weights: &PenaltyWeights,
) -> i64 {
    let (a, b) = side;
    let repeats = a.times_partnered_with(&b.name) as i64;
    let weight = if coverage_open(a, b, max_partners) {
        weights.partner_open
    } else {
        weights.partner_exhausted
    };
    repeats * weight
}
