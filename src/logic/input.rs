//! Input decoding: pairings from a JSON list of records or from CSV.

use crate::models::{BracketError, Pairing, PairingRecord, Team};
use serde::Deserialize;
use std::io::Read;

/// Decode a JSON array of `{team1: [name, seed], team2: [name, seed], round, pick?, winner?}`.
pub fn parse_pairings_json(payload: &str) -> Result<Vec<Pairing>, BracketError> {
    let records: Vec<PairingRecord> =
        serde_json::from_str(payload).map_err(|e| BracketError::MalformedInput(e.to_string()))?;
    records.into_iter().map(PairingRecord::into_pairing).collect()
}

/// One CSV row. `pick` and `winner` name one of the two teams, or are left empty.
#[derive(Debug, Deserialize)]
struct CsvRow {
    team1: String,
    seed1: i64,
    team2: String,
    seed2: i64,
    round: i64,
    pick: Option<String>,
    winner: Option<String>,
}

/// Decode CSV with header `team1,seed1,team2,seed2,round,pick,winner`.
pub fn parse_pairings_csv<R: Read>(reader: R) -> Result<Vec<Pairing>, BracketError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut pairings = Vec::new();
    for (line, row) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = row.map_err(|e| BracketError::MalformedInput(e.to_string()))?;
        let team1 = Team::new(row.team1, row.seed1)?;
        let team2 = Team::new(row.team2, row.seed2)?;
        let pick = match row.pick.as_deref() {
            Some(name) => Some(team_by_name(name, &team1, &team2, line)?),
            None => None,
        };
        let winner = match row.winner.as_deref() {
            Some(name) => Some(team_by_name(name, &team1, &team2, line)?),
            None => None,
        };
        let record = PairingRecord {
            team1: team1.into(),
            team2: team2.into(),
            round: row.round,
            pick: pick.map(Into::into),
            winner: winner.map(Into::into),
        };
        pairings.push(record.into_pairing()?);
    }
    Ok(pairings)
}

fn team_by_name(name: &str, team1: &Team, team2: &Team, line: usize) -> Result<Team, BracketError> {
    [team1, team2]
        .into_iter()
        .find(|t| t.name().eq_ignore_ascii_case(name))
        .cloned()
        .ok_or_else(|| {
            BracketError::MalformedInput(format!(
                "row {}: {} is neither {} nor {}",
                line + 1,
                name,
                team1,
                team2
            ))
        })
}
