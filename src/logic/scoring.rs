//! Seed-weighted scoring: correct upset calls are worth more than correct favorite calls.
//!
//! Base stake for a pairing in round `r` is `2^(r - 1)`. When the favorite (strictly lower
//! seed) wins the stake is scored as-is; when the underdog wins it is multiplied by
//! `underdog.seed / favorite.seed`. On equal seeds team2 counts as the favorite.

use crate::models::{Pairing, Team};
use serde::{Deserialize, Serialize};

/// Score reported by [`ScoringMode::Outcome`] for a pairing without a result.
pub const UNDECIDED_SCORE: f64 = -1.0;

/// How a pairing is scored. The two modes are not interchangeable.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Plain outcome scoring: [`UNDECIDED_SCORE`] until decided, then the seed-weighted score.
    #[default]
    Outcome,
    /// Prediction scoring: 0 unless decided and the pick matches the winner.
    Prediction,
}

/// Score one pairing under `mode`.
pub fn score_pairing(pairing: &Pairing, mode: ScoringMode) -> f64 {
    let Some(winner) = pairing.winner() else {
        return match mode {
            ScoringMode::Outcome => UNDECIDED_SCORE,
            ScoringMode::Prediction => 0.0,
        };
    };
    if mode == ScoringMode::Prediction && pairing.pick() != Some(winner) {
        return 0.0;
    }
    seed_weighted_score(pairing.team1(), pairing.team2(), winner, pairing.round())
}

/// `(favorite, underdog)` of a matchup. Ties go to team2 as favorite.
pub fn favorite_and_underdog<'a>(team1: &'a Team, team2: &'a Team) -> (&'a Team, &'a Team) {
    if team1.seed() < team2.seed() {
        (team1, team2)
    } else {
        (team2, team1)
    }
}

/// Seed-weighted score for `winner` beating the other team in `round`.
pub fn seed_weighted_score(team1: &Team, team2: &Team, winner: &Team, round: u32) -> f64 {
    let exponent = i32::try_from(round.saturating_sub(1)).unwrap_or(i32::MAX);
    let base = 2f64.powi(exponent);
    let (favorite, underdog) = favorite_and_underdog(team1, team2);
    if winner == favorite {
        base
    } else {
        f64::from(underdog.seed()) / f64::from(favorite.seed()) * base
    }
}
