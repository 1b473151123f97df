//! Bracket, BracketState and BracketError.

use crate::logic::scoring::ScoringMode;
use crate::models::pairing::{Pairing, PairingKey};
use crate::models::team::Team;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};

/// Errors that can occur while building or updating a bracket.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketError {
    /// Team seed below 1 (or too large to store).
    InvalidSeed(i64),
    /// Team name is empty.
    InvalidTeamName,
    /// Pairing round below 1.
    InvalidRound(i64),
    /// Both sides of a pairing are the same team.
    IdenticalTeams(Team),
    /// Proposed winner is neither team of the pairing.
    InvalidWinner(Team),
    /// Bracket size is not a power of two.
    InvalidBracketSize(usize),
    /// A pairing does not fit the bracket (round out of range, duplicate, too many teams).
    InvalidPairing(String),
    /// No pairing with this key is stored in the bracket.
    PairingNotFound(PairingKey),
    /// A feeder pairing has no result yet.
    UnfinishedFeeder(PairingKey),
    /// Team is not the winner of any decided pairing in the previous round.
    FeederMismatch(Team),
    /// Input payload could not be decoded.
    MalformedInput(String),
    /// Saving or loading a bracket failed.
    Persistence(String),
}

impl std::fmt::Display for BracketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BracketError::InvalidSeed(seed) => write!(f, "Seed {} is not greater than 0", seed),
            BracketError::InvalidTeamName => write!(f, "Team name must not be empty"),
            BracketError::InvalidRound(round) => write!(f, "Round {} must be greater than 0", round),
            BracketError::IdenticalTeams(team) => write!(f, "{} cannot play against itself", team),
            BracketError::InvalidWinner(team) => {
                write!(f, "Winning team {} must be one of the two teams in the pairing", team)
            }
            BracketError::InvalidBracketSize(size) => {
                write!(f, "Bracket size {} is not a power of two", size)
            }
            BracketError::InvalidPairing(reason) => write!(f, "Invalid pairing: {}", reason),
            BracketError::PairingNotFound(key) => write!(f, "No pairing {}", key),
            BracketError::UnfinishedFeeder(key) => write!(f, "Pairing {} has no result yet", key),
            BracketError::FeederMismatch(team) => {
                write!(f, "{} did not win a pairing in the previous round", team)
            }
            BracketError::MalformedInput(msg) => write!(f, "Malformed input: {}", msg),
            BracketError::Persistence(msg) => write!(f, "Persistence error: {}", msg),
        }
    }
}

impl std::error::Error for BracketError {}

/// Progress of a bracket. Construction either yields `InProgress` or fails.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketState {
    #[default]
    InProgress,
    /// The championship pairing is decided and the winner is set.
    Complete,
}

/// All pairings of one tournament instance plus its eventual winner.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "BracketSnapshot", into = "BracketSnapshot")]
pub struct Bracket {
    owner: String,
    name: String,
    total_teams: usize,
    total_rounds: u32,
    scoring: ScoringMode,
    created_at: DateTime<Utc>,
    pairings: BTreeMap<PairingKey, Pairing>,
    winner: Option<Team>,
}

impl Bracket {
    /// Build a bracket from its initial pairings. All-or-nothing: any invalid pairing fails
    /// the whole construction.
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        total_teams: usize,
        initial_pairings: Vec<Pairing>,
        scoring: ScoringMode,
    ) -> Result<Self, BracketError> {
        if !total_teams.is_power_of_two() {
            return Err(BracketError::InvalidBracketSize(total_teams));
        }
        let total_rounds = total_teams.trailing_zeros() + 1;

        let mut teams: HashSet<&Team> = HashSet::new();
        let mut pairings = BTreeMap::new();
        for pairing in &initial_pairings {
            if pairing.round() > total_rounds {
                return Err(BracketError::InvalidPairing(format!(
                    "round {} is beyond the last round {}",
                    pairing.round(),
                    total_rounds
                )));
            }
            teams.insert(pairing.team1());
            teams.insert(pairing.team2());
            if teams.len() > total_teams {
                return Err(BracketError::InvalidPairing(format!(
                    "more than {} distinct teams",
                    total_teams
                )));
            }
            if pairings.insert(pairing.key(), pairing.clone()).is_some() {
                return Err(BracketError::InvalidPairing(format!(
                    "duplicate pairing {}",
                    pairing.key()
                )));
            }
        }

        Ok(Self {
            owner: owner.into(),
            name: name.into(),
            total_teams,
            total_rounds,
            scoring,
            created_at: Utc::now(),
            pairings,
            winner: None,
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_teams(&self) -> usize {
        self.total_teams
    }

    /// `log2(total_teams) + 1`; the last round is the championship.
    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    pub fn scoring(&self) -> ScoringMode {
        self.scoring
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn winner(&self) -> Option<&Team> {
        self.winner.as_ref()
    }

    pub fn state(&self) -> BracketState {
        if self.winner.is_some() {
            BracketState::Complete
        } else {
            BracketState::InProgress
        }
    }

    pub fn get(&self, key: &PairingKey) -> Option<&Pairing> {
        self.pairings.get(key)
    }

    /// Stored pairings, ordered by key.
    pub fn pairings(&self) -> impl Iterator<Item = &Pairing> {
        self.pairings.values()
    }

    /// Stored pairings of one round, ordered by key.
    pub fn pairings_in_round(&self, round: u32) -> impl Iterator<Item = &Pairing> {
        self.pairings.values().filter(move |p| p.round() == round)
    }

    pub fn len(&self) -> usize {
        self.pairings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairings.is_empty()
    }

    /// Record a result or a newly discovered matchup.
    ///
    /// Unknown key: the pairing is inserted. Known key: only its winner/loser is merged into
    /// the stored pairing. A decided pairing in the last round sets the bracket winner.
    pub fn update(&mut self, pairing: Pairing) -> Result<(), BracketError> {
        if pairing.round() > self.total_rounds {
            log::warn!("Rejected update for round {} in {}", pairing.round(), self.storage_label());
            return Err(BracketError::InvalidPairing(format!(
                "round {} is beyond the last round {}",
                pairing.round(),
                self.total_rounds
            )));
        }
        if !self.pairings.contains_key(&pairing.key()) {
            let mut teams = self.distinct_teams();
            teams.insert(pairing.team1());
            teams.insert(pairing.team2());
            if teams.len() > self.total_teams {
                log::warn!("Rejected pairing {} in {}", pairing.key(), self.storage_label());
                return Err(BracketError::InvalidPairing(format!(
                    "more than {} distinct teams",
                    self.total_teams
                )));
            }
        }
        let champion = if pairing.round() == self.total_rounds {
            pairing.winner().cloned()
        } else {
            None
        };

        match self.pairings.entry(pairing.key()) {
            Entry::Vacant(slot) => {
                log::debug!("Inserting pairing {}", slot.key());
                slot.insert(pairing);
            }
            Entry::Occupied(mut slot) => {
                log::debug!("Merging result into pairing {}", slot.key());
                slot.get_mut().merge_result(&pairing);
            }
        }

        if let Some(champion) = champion {
            log::info!("Bracket {} complete, winner {}", self.storage_label(), champion);
            self.winner = Some(champion);
        }
        Ok(())
    }

    /// Sum of every stored pairing's score under the bracket's scoring mode.
    pub fn current_score(&self) -> f64 {
        self.score_with(self.scoring)
    }

    /// Sum of every stored pairing's score under an explicit mode.
    pub fn score_with(&self, mode: ScoringMode) -> f64 {
        self.pairings.values().map(|p| p.calculate_score(mode)).sum()
    }

    fn distinct_teams(&self) -> HashSet<&Team> {
        self.pairings
            .keys()
            .flat_map(|k| [&k.team1, &k.team2])
            .collect()
    }

    fn storage_label(&self) -> String {
        format!("{}-{}", self.owner, self.name)
    }
}

/// Serialized form of a bracket. Loading goes back through [`Bracket::new`].
#[derive(Clone, Debug, Serialize, Deserialize)]
struct BracketSnapshot {
    owner: String,
    name: String,
    total_teams: usize,
    #[serde(default)]
    scoring: ScoringMode,
    created_at: DateTime<Utc>,
    pairings: Vec<Pairing>,
    #[serde(default)]
    winner: Option<Team>,
}

impl TryFrom<BracketSnapshot> for Bracket {
    type Error = BracketError;

    fn try_from(snapshot: BracketSnapshot) -> Result<Self, Self::Error> {
        let mut bracket = Bracket::new(
            snapshot.owner,
            snapshot.name,
            snapshot.total_teams,
            snapshot.pairings,
            snapshot.scoring,
        )?;
        bracket.created_at = snapshot.created_at;
        if let Some(winner) = snapshot.winner {
            let last = bracket.total_rounds;
            let decided = bracket
                .pairings_in_round(last)
                .any(|p| p.winner() == Some(&winner));
            if !decided {
                return Err(BracketError::InvalidPairing(format!(
                    "winner {} did not win a round {} pairing",
                    winner, last
                )));
            }
            bracket.winner = Some(winner);
        }
        Ok(bracket)
    }
}

impl From<Bracket> for BracketSnapshot {
    fn from(bracket: Bracket) -> Self {
        BracketSnapshot {
            owner: bracket.owner,
            name: bracket.name,
            total_teams: bracket.total_teams,
            scoring: bracket.scoring,
            created_at: bracket.created_at,
            pairings: bracket.pairings.into_values().collect(),
            winner: bracket.winner,
        }
    }
}
