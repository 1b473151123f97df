//! Integration tests for strict next-round submission.

use upset_bracket::{
    advance, submit_next_round, Bracket, BracketError, Pairing, PairingKey, ScoringMode, Team,
};

fn team(name: &str, seed: i64) -> Team {
    Team::new(name, seed).unwrap()
}

fn four_team_bracket() -> (Vec<Team>, Vec<PairingKey>, Bracket) {
    let t: Vec<Team> = (1..=4).map(|s| team(&format!("S{s}"), s)).collect();
    let pairings = vec![
        Pairing::new(t[0].clone(), t[3].clone(), 1).unwrap(),
        Pairing::new(t[1].clone(), t[2].clone(), 1).unwrap(),
    ];
    let keys = pairings.iter().map(Pairing::key).collect();
    let b = Bracket::new("alice", "small", 4, pairings, ScoringMode::Outcome).unwrap();
    (t, keys, b)
}

fn decide(b: &mut Bracket, key: &PairingKey, winner: &Team) {
    let p = Pairing::new(key.team1.clone(), key.team2.clone(), key.round)
        .unwrap()
        .decided(winner)
        .unwrap();
    b.update(p).unwrap();
}

#[test]
fn advance_builds_next_round_from_feeder_winners() {
    let (t, keys, mut b) = four_team_bracket();
    decide(&mut b, &keys[0], &t[0]);
    decide(&mut b, &keys[1], &t[2]);

    let key = advance(&mut b, &keys[0], &keys[1], Some(t[2].clone())).unwrap();
    assert_eq!(key.team1, t[0]);
    assert_eq!(key.team2, t[2]);
    assert_eq!(key.round, 2);
    let stored = b.get(&key).unwrap();
    assert!(!stored.finished());
    assert_eq!(stored.pick(), Some(&t[2]));
}

#[test]
fn advance_requires_decided_known_feeders() {
    let (t, keys, mut b) = four_team_bracket();
    decide(&mut b, &keys[0], &t[0]);
    assert_eq!(
        advance(&mut b, &keys[0], &keys[1], None),
        Err(BracketError::UnfinishedFeeder(keys[1].clone()))
    );

    let unknown = PairingKey {
        team1: t[0].clone(),
        team2: t[1].clone(),
        round: 1,
    };
    assert_eq!(
        advance(&mut b, &keys[0], &unknown, None),
        Err(BracketError::PairingNotFound(unknown.clone()))
    );
    assert_eq!(b.len(), 2);
}

#[test]
fn submit_next_round_checks_both_teams_won() {
    let (t, keys, mut b) = four_team_bracket();
    decide(&mut b, &keys[0], &t[3]);

    let early = Pairing::new(t[3].clone(), t[1].clone(), 2).unwrap();
    assert_eq!(
        submit_next_round(&mut b, early),
        Err(BracketError::FeederMismatch(t[1].clone()))
    );

    decide(&mut b, &keys[1], &t[1]);
    let ready = Pairing::new(t[3].clone(), t[1].clone(), 2).unwrap();
    submit_next_round(&mut b, ready.clone()).unwrap();
    assert_eq!(b.get(&ready.key()), Some(&ready));

    let first_round = Pairing::new(t[0].clone(), t[1].clone(), 1).unwrap();
    assert!(matches!(
        submit_next_round(&mut b, first_round),
        Err(BracketError::InvalidPairing(_))
    ));
}

#[test]
fn strict_path_rejects_final_with_eliminated_team() {
    let (t, keys, mut b) = four_team_bracket();
    decide(&mut b, &keys[0], &t[0]);
    decide(&mut b, &keys[1], &t[1]);
    let semi = advance(&mut b, &keys[0], &keys[1], None).unwrap();
    decide(&mut b, &semi, &t[1]);
    // t[2] lost in round 1, so it cannot reach the final through the strict path.
    let bogus = Pairing::new(t[1].clone(), t[2].clone(), 3).unwrap();
    assert_eq!(
        submit_next_round(&mut b, bogus),
        Err(BracketError::FeederMismatch(t[2].clone()))
    );
    assert_eq!(b.winner(), None);
}
