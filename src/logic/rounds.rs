//! Round generation: fill every court of a round, then apply it to a session.

use crate::logic::pairing::{best_split, PenaltyWeights};
use crate::logic::selection::select_four;
use crate::logic::stats::compute_player_stats;
use crate::logic::SchedulerError;
use crate::models::{Match, Player, Session, SessionError};
use rand::Rng;
use std::collections::HashSet;

/// Scheduling decisions for one court, returned for optional logging.
#[derive(Clone, Debug)]
pub struct CourtTrace {
    /// Court index within the round (0-based).
    pub court: usize,
    pub anchor: String,
    pub forced_partner: Option<String>,
    /// Splits rejected by the repeat-partnership rule.
    pub filtered_out: usize,
    pub candidate_scores: Vec<i64>,
    pub chosen_score: i64,
}

/// A freshly generated round: the new matches plus per-court decision traces.
#[derive(Clone, Debug)]
pub struct GeneratedRound {
    pub matches: Vec<Match>,
    pub trace: Vec<CourtTrace>,
}

/// Generate one full round: exactly `number_of_courts` matches, all sharing
/// the next round number, with no player on more than one court.
///
/// Courts are filled sequentially; each court recomputes participation stats
/// over the history plus the matches already placed this round, so later
/// courts account for earlier ones. Inputs are never mutated; the caller
/// applies the returned matches. Returns a complete round or an error, never
/// a partial round.
pub fn generate_round<R: Rng>(
    roster: &[Player],
    history: &[Match],
    number_of_courts: usize,
    weights: &PenaltyWeights,
    rng: &mut R,
) -> Result<GeneratedRound, SchedulerError> {
    let required = number_of_courts * 4;
    if roster.len() < required {
        return Err(SchedulerError::InsufficientRoster {
            required,
            available: roster.len(),
        });
    }

    let round_number = history.iter().map(|m| m.round_number).max().unwrap_or(0) + 1;

    let mut visible: Vec<Match> = history.to_vec();
    let mut matches: Vec<Match> = Vec::with_capacity(number_of_courts);
    let mut trace: Vec<CourtTrace> = Vec::with_capacity(number_of_courts);
    let mut used_this_round: HashSet<String> = HashSet::new();

    for court in 0..number_of_courts {
        let stats = compute_player_stats(roster, &visible);

        let available: Vec<_> = stats
            .iter()
            .filter(|s| !used_this_round.contains(&s.name))
            .cloned()
            .collect();
        // The roster precondition already guarantees this, but a short court
        // must abort the whole round rather than return a partial one.
        if available.len() < 4 {
            return Err(SchedulerError::InsufficientAvailablePlayers {
                available: available.len(),
            });
        }

        let selection = select_four(&available, rng)?;
        // Coverage bounds come from the whole roster, not just who is left.
        let outcome = best_split(&selection.players, &stats, weights, rng)?;

        for name in &selection.players {
            used_this_round.insert(name.clone());
        }

        let m = Match::new(
            round_number,
            outcome.chosen.first_team.clone(),
            outcome.chosen.second_team.clone(),
        );
        visible.push(m.clone());
        matches.push(m);
        trace.push(CourtTrace {
            court,
            anchor: selection.anchor,
            forced_partner: selection.forced_partner,
            filtered_out: outcome.filtered_out,
            candidate_scores: outcome.candidate_scores,
            chosen_score: outcome.chosen.score,
        });
    }

    Ok(GeneratedRound { matches, trace })
}

/// Generate the next round for a session and append it. On error the session
/// is left untouched. Returns the decision trace for the caller to log.
pub fn generate_next_round<R: Rng>(
    session: &mut Session,
    rng: &mut R,
) -> Result<Vec<CourtTrace>, SessionError> {
    if session.number_of_courts == 0 {
        return Err(SessionError::NoCourtsConfigured);
    }
    let round = generate_round(
        &session.players,
        &session.matches,
        session.number_of_courts as usize,
        &PenaltyWeights::default(),
        rng,
    )?;
    session.apply_round(round.matches);
    Ok(round.trace)
}

/// Generate a single match using the same scheduler with one court.
pub fn generate_next_match<R: Rng>(
    session: &mut Session,
    rng: &mut R,
) -> Result<Vec<CourtTrace>, SessionError> {
    let round = generate_round(
        &session.players,
        &session.matches,
        1,
        &PenaltyWeights::default(),
        rng,
    )?;
    session.apply_round(round.matches);
    Ok(round.trace)
}
