//! Strict advancement: next-round pairings built from, or checked against, decided feeders.
//!
//! `Bracket::update` accepts any round in any order. These helpers are the opt-in stricter
//! path: a round-R pairing is only accepted when both of its teams won a decided round R-1
//! pairing.

use crate::models::{Bracket, BracketError, Pairing, PairingKey, Team};

/// Submit a later-round pairing after checking that both teams won their feeders.
pub fn submit_next_round(bracket: &mut Bracket, pairing: Pairing) -> Result<(), BracketError> {
    if pairing.round() < 2 {
        return Err(BracketError::InvalidPairing(format!(
            "round {} has no feeder round",
            pairing.round()
        )));
    }
    let feeder_round = pairing.round() - 1;
    for team in [pairing.team1(), pairing.team2()] {
        if !won_round(bracket, team, feeder_round) {
            log::warn!("{} has no decided win in round {}", team, feeder_round);
            return Err(BracketError::FeederMismatch(team.clone()));
        }
    }
    bracket.update(pairing)
}

/// Create the next-round pairing between the winners of two decided feeders and store it.
///
/// The winner of `first` becomes team1. Both feeders must be in the same round.
pub fn advance(
    bracket: &mut Bracket,
    first: &PairingKey,
    second: &PairingKey,
    pick: Option<Team>,
) -> Result<PairingKey, BracketError> {
    if first.round != second.round {
        return Err(BracketError::InvalidPairing(format!(
            "feeders are in rounds {} and {}",
            first.round, second.round
        )));
    }
    let team1 = feeder_winner(bracket, first)?;
    let team2 = feeder_winner(bracket, second)?;
    let pairing = Pairing::with_pick(team1, team2, first.round + 1, pick)?;
    let key = pairing.key();
    bracket.update(pairing)?;
    Ok(key)
}

fn feeder_winner(bracket: &Bracket, key: &PairingKey) -> Result<Team, BracketError> {
    let feeder = bracket
        .get(key)
        .ok_or_else(|| BracketError::PairingNotFound(key.clone()))?;
    feeder
        .winner()
        .cloned()
        .ok_or_else(|| BracketError::UnfinishedFeeder(key.clone()))
}

fn won_round(bracket: &Bracket, team: &Team, round: u32) -> bool {
    bracket
        .pairings_in_round(round)
        .any(|p| p.winner() == Some(team))
}
