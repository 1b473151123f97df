//! Integration tests for team/pairing construction and seed-weighted scoring.

use std::collections::HashSet;
use upset_bracket::{
    favorite_and_underdog, seed_weighted_score, BracketError, Pairing, ScoringMode, Team,
    UNDECIDED_SCORE,
};

const EPS: f64 = 1e-9;

fn team(name: &str, seed: i64) -> Team {
    Team::new(name, seed).unwrap()
}

fn creighton_louisville() -> (Team, Team, Pairing) {
    let creighton = team("Creighton", 8);
    let louisville = team("Louisville", 9);
    let p = Pairing::new(creighton.clone(), louisville.clone(), 4).unwrap();
    (creighton, louisville, p)
}

#[test]
fn valid_seeds_construct_and_non_positive_seeds_fail() {
    for seed in 1..=64 {
        assert_eq!(Team::new("T", seed).unwrap().seed() as i64, seed);
    }
    for seed in [0, -1, -16] {
        assert_eq!(Team::new("T", seed), Err(BracketError::InvalidSeed(seed)));
    }
    assert_eq!(
        Team::new("T", i64::from(u32::MAX) + 1),
        Err(BracketError::InvalidSeed(i64::from(u32::MAX) + 1))
    );
}

#[test]
fn blank_team_name_fails() {
    assert_eq!(Team::new("   ", 3), Err(BracketError::InvalidTeamName));
}

#[test]
fn team_equality_and_hash_cover_name_and_seed() {
    assert_eq!(team("Duke", 1), team("Duke", 1));
    assert_ne!(team("Duke", 1), team("Duke", 2));
    assert_ne!(team("Duke", 1), team("UNC", 1));
    let set: HashSet<Team> = [team("Duke", 1), team("Duke", 1), team("UNC", 1)].into_iter().collect();
    assert_eq!(set.len(), 2);
    assert_eq!(team("Creighton", 8).to_string(), "Creighton(8)");
}

#[test]
fn pairing_rejects_round_zero_and_identical_teams() {
    assert_eq!(
        Pairing::new(team("A", 1), team("B", 2), 0),
        Err(BracketError::InvalidRound(0))
    );
    assert_eq!(
        Pairing::new(team("A", 1), team("A", 1), 1),
        Err(BracketError::IdenticalTeams(team("A", 1)))
    );
}

#[test]
fn set_result_with_outside_team_fails() {
    let (_, _, mut p) = creighton_louisville();
    let outsider = team("Gonzaga", 1);
    assert_eq!(p.set_result(&outsider), Err(BracketError::InvalidWinner(outsider)));
    assert!(!p.finished());
    assert_eq!(p.winner(), None);
    assert_eq!(p.loser(), None);
}

#[test]
fn set_result_partitions_teams() {
    let (creighton, louisville, mut p) = creighton_louisville();
    p.set_result(&louisville).unwrap();
    assert!(p.finished());
    assert_eq!(p.winner(), Some(&louisville));
    assert_eq!(p.loser(), Some(&creighton));

    let (creighton, louisville, mut p) = creighton_louisville();
    p.set_result(&creighton).unwrap();
    assert_eq!(p.winner(), Some(&creighton));
    assert_eq!(p.loser(), Some(&louisville));
}

#[test]
fn pairing_equality_is_state_sensitive_but_key_is_not() {
    let (_, louisville, undecided) = creighton_louisville();
    let decided = undecided.clone().decided(&louisville).unwrap();
    assert_ne!(undecided, decided);
    assert_eq!(undecided.key(), decided.key());

    let (creighton, _, p) = creighton_louisville();
    let picked = Pairing::with_pick(p.team1().clone(), p.team2().clone(), 4, Some(creighton)).unwrap();
    assert_eq!(p, picked);
}

#[test]
fn upset_scores_seed_ratio_times_round_stake() {
    let (_, louisville, p) = creighton_louisville();
    let p = p.decided(&louisville).unwrap();
    assert!((p.calculate_score(ScoringMode::Outcome) - 9.0).abs() < EPS);
}

#[test]
fn favorite_win_scores_round_stake() {
    let (creighton, _, p) = creighton_louisville();
    let p = p.decided(&creighton).unwrap();
    assert!((p.calculate_score(ScoringMode::Outcome) - 8.0).abs() < EPS);
}

#[test]
fn equal_seeds_make_team2_the_favorite() {
    let a = team("A", 8);
    let b = team("B", 8);
    let (favorite, underdog) = favorite_and_underdog(&a, &b);
    assert_eq!(favorite, &b);
    assert_eq!(underdog, &a);

    let p = Pairing::new(a.clone(), b.clone(), 4).unwrap().decided(&a).unwrap();
    assert!((p.calculate_score(ScoringMode::Outcome) - 8.0).abs() < EPS);
    assert!((seed_weighted_score(&a, &b, &b, 4) - seed_weighted_score(&a, &b, &a, 4)).abs() < EPS);
}

#[test]
fn first_round_upset_uses_fractional_ratio() {
    let five = team("Five", 5);
    let twelve = team("Twelve", 12);
    let p = Pairing::new(five, twelve.clone(), 1).unwrap().decided(&twelve).unwrap();
    assert!((p.calculate_score(ScoringMode::Outcome) - 2.4).abs() < EPS);
}

#[test]
fn undecided_pairing_scores_per_mode() {
    let (_, _, p) = creighton_louisville();
    assert_eq!(p.calculate_score(ScoringMode::Outcome), UNDECIDED_SCORE);
    assert_eq!(p.calculate_score(ScoringMode::Prediction), 0.0);
}

#[test]
fn prediction_mode_scores_only_correct_picks() {
    let creighton = team("Creighton", 8);
    let louisville = team("Louisville", 9);
    let new = |pick: Option<Team>| {
        Pairing::with_pick(creighton.clone(), louisville.clone(), 4, pick)
            .unwrap()
            .decided(&louisville)
            .unwrap()
    };

    let correct = new(Some(louisville.clone()));
    assert!((correct.calculate_score(ScoringMode::Prediction) - 9.0).abs() < EPS);
    assert_eq!(new(Some(creighton.clone())).calculate_score(ScoringMode::Prediction), 0.0);
    assert_eq!(new(None).calculate_score(ScoringMode::Prediction), 0.0);
    // Outcome mode ignores the pick.
    assert!((new(None).calculate_score(ScoringMode::Outcome) - 9.0).abs() < EPS);
}

#[test]
fn pairing_display_shows_teams_and_winner() {
    let (creighton, louisville, p) = creighton_louisville();
    let text = p.to_string();
    assert!(text.starts_with("round 4\nCreighton(8)\n"));
    assert!(text.contains("Louisville(9)"));
    let decided = p.decided(&louisville).unwrap().to_string();
    assert!(decided.contains("-- Louisville(9)"));
    assert!(!decided.contains(&format!("-- {}", creighton)));
}

#[test]
fn very_late_round_stake_saturates_instead_of_wrapping() {
    let (creighton, louisville, _) = creighton_louisville();
    let p = Pairing::new(creighton.clone(), louisville, 3_000_000_000)
        .unwrap()
        .decided(&creighton)
        .unwrap();
    let score = p.calculate_score(ScoringMode::Outcome);
    assert!(score.is_infinite() && score > 0.0);
}
