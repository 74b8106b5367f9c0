//! Candidate selection: which 4 players take the next court.

use crate::logic::stats::PlayerStats;
use crate::logic::SchedulerError;
use rand::seq::SliceRandom;
use rand::Rng;

/// The four players picked for one court, plus how they were chosen.
#[derive(Clone, Debug)]
pub struct Selection {
    /// Anchor first, then the other three in shuffled order.
    pub players: [String; 4],
    /// Least-played available player, picked first.
    pub anchor: String,
    /// Partner the anchor has not teamed with yet, forced into the match.
    /// None when the anchor has already partnered with everyone available.
    pub forced_partner: Option<String>,
}

/// Pick 4 players from the available pool: the least-played player as anchor,
/// then (if one exists) the least-played player the anchor has not partnered
/// with yet, then the least-played of the rest. The three non-anchor picks are
/// shuffled so team assignment does not inherit the sort order.
///
/// Games-played ties break randomly: the pool is shuffled before the stable
/// sort, so equal counts keep a random relative order.
pub fn select_four<R: Rng>(
    available: &[PlayerStats],
    rng: &mut R,
) -> Result<Selection, SchedulerError> {
    if available.len() < 4 {
        return Err(SchedulerError::InsufficientAvailablePlayers {
            available: available.len(),
        });
    }

    let mut pool: Vec<&PlayerStats> = available.iter().collect();
    pool.shuffle(rng);
    pool.sort_by_key(|s| s.games_played);

    let anchor = pool[0];

    // pool[1..] is sorted ascending, so the first unplayed partner is the
    // least-played one.
    let forced_partner = pool[1..]
        .iter()
        .find(|s| !anchor.partners_played_with.contains(&s.name))
        .map(|s| s.name.clone());

    let mut others: Vec<String> = Vec::with_capacity(3);
    if let Some(partner) = &forced_partner {
        others.push(partner.clone());
    }
    for s in &pool[1..] {
        if others.len() == 3 {
            break;
        }
        if forced_partner.as_deref() != Some(s.name.as_str()) {
            others.push(s.name.clone());
        }
    }
    others.shuffle(rng);

    let mut others = others.into_iter();
    let players = [
        anchor.name.clone(),
        others.next().unwrap_or_default(),
        others.next().unwrap_or_default(),
        others.next().unwrap_or_default(),
    ];

    Ok(Selection {
        players,
        anchor: anchor.name.clone(),
        forced_partner,
    })
}
