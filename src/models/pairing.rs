//! Pairing (one matchup in one round) and its lookup key.

use crate::logic::scoring::{score_pairing, ScoringMode};
use crate::models::bracket::BracketError;
use crate::models::team::Team;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of the bracket stub drawn by `Display for Pairing`.
const STUB_WIDTH: usize = 15;

/// Lookup identity of a pairing: the two teams and the round.
///
/// Stable for the whole life of a matchup; it does not change when the result is set.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct PairingKey {
    pub team1: Team,
    pub team2: Team,
    pub round: u32,
}

impl fmt::Display for PairingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {} (round {})", self.team1, self.team2, self.round)
    }
}

/// A single matchup between two teams in a given round.
///
/// Equality is state-sensitive (teams, round, winner and loser); use [`Pairing::key`] for
/// state-insensitive lookup. The pick does not take part in either.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "PairingRecord", into = "PairingRecord")]
pub struct Pairing {
    team1: Team,
    team2: Team,
    round: u32,
    pick: Option<Team>,
    /// `(winner, loser)`, set together exactly once.
    result: Option<(Team, Team)>,
}

impl Pairing {
    /// Create an undecided pairing without a pick.
    pub fn new(team1: Team, team2: Team, round: u32) -> Result<Self, BracketError> {
        if round < 1 {
            return Err(BracketError::InvalidRound(i64::from(round)));
        }
        if team1 == team2 {
            return Err(BracketError::IdenticalTeams(team1));
        }
        Ok(Self {
            team1,
            team2,
            round,
            pick: None,
            result: None,
        })
    }

    /// Create an undecided pairing carrying a prediction. The pick is not required to be
    /// one of the two teams; a pick that is neither simply never scores.
    pub fn with_pick(team1: Team, team2: Team, round: u32, pick: Option<Team>) -> Result<Self, BracketError> {
        Ok(Self {
            pick,
            ..Self::new(team1, team2, round)?
        })
    }

    pub fn team1(&self) -> &Team {
        &self.team1
    }

    pub fn team2(&self) -> &Team {
        &self.team2
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn pick(&self) -> Option<&Team> {
        self.pick.as_ref()
    }

    pub fn winner(&self) -> Option<&Team> {
        self.result.as_ref().map(|(w, _)| w)
    }

    pub fn loser(&self) -> Option<&Team> {
        self.result.as_ref().map(|(_, l)| l)
    }

    pub fn key(&self) -> PairingKey {
        PairingKey {
            team1: self.team1.clone(),
            team2: self.team2.clone(),
            round: self.round,
        }
    }

    /// True once a winner and loser have been set.
    pub fn finished(&self) -> bool {
        self.result.is_some()
    }

    /// Record the result. Fails with `InvalidWinner` if `winning_team` is not in this pairing.
    pub fn set_result(&mut self, winning_team: &Team) -> Result<(), BracketError> {
        let result = if *winning_team == self.team1 {
            (self.team1.clone(), self.team2.clone())
        } else if *winning_team == self.team2 {
            (self.team2.clone(), self.team1.clone())
        } else {
            return Err(BracketError::InvalidWinner(winning_team.clone()));
        };
        self.result = Some(result);
        Ok(())
    }

    /// Builder form of [`Pairing::set_result`].
    pub fn decided(mut self, winning_team: &Team) -> Result<Self, BracketError> {
        self.set_result(winning_team)?;
        Ok(self)
    }

    /// Score of this pairing under the given mode.
    pub fn calculate_score(&self, mode: ScoringMode) -> f64 {
        score_pairing(self, mode)
    }

    /// Copy the result (winner/loser) of `other` into this pairing. Identity and pick stay.
    pub(crate) fn merge_result(&mut self, other: &Pairing) {
        if let Some(result) = &other.result {
            self.result = Some(result.clone());
        }
    }
}

impl PartialEq for Pairing {
    fn eq(&self, other: &Self) -> bool {
        self.team1 == other.team1
            && self.team2 == other.team2
            && self.round == other.round
            && self.result == other.result
    }
}

impl Eq for Pairing {}

impl fmt::Display for Pairing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let top = self.team1.to_string();
        let bottom = self.team2.to_string();
        let rule = "-".repeat(STUB_WIDTH);
        writeln!(f, "round {}", self.round)?;
        writeln!(f, "{top}")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "{:>w$}", "|", w = STUB_WIDTH + 1)?;
        match self.winner() {
            Some(winner) => writeln!(f, "{:>w$}-- {winner}", "|", w = STUB_WIDTH + 1)?,
            None => writeln!(f, "{:>w$}--", "|", w = STUB_WIDTH + 1)?,
        }
        writeln!(f, "{:>w$}", "|", w = STUB_WIDTH + 1)?;
        writeln!(f, "{bottom:<w$}|", w = STUB_WIDTH)?;
        write!(f, "{rule}")
    }
}

/// Wire shape of a pairing: `{team1: [name, seed], team2: [name, seed], round, pick?, winner?}`.
///
/// Fields are raw so that validation reports the precise error kind.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PairingRecord {
    pub team1: (String, i64),
    pub team2: (String, i64),
    pub round: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pick: Option<(String, i64)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<(String, i64)>,
}

impl PairingRecord {
    /// Validate into a `Pairing`, applying a pre-known winner if present.
    pub fn into_pairing(self) -> Result<Pairing, BracketError> {
        let team1 = Team::try_from(self.team1)?;
        let team2 = Team::try_from(self.team2)?;
        let round = u32::try_from(self.round)
            .ok()
            .filter(|r| *r >= 1)
            .ok_or(BracketError::InvalidRound(self.round))?;
        let pick = self.pick.map(Team::try_from).transpose()?;
        let pairing = Pairing::with_pick(team1, team2, round, pick)?;
        match self.winner {
            Some(winner) => pairing.decided(&Team::try_from(winner)?),
            None => Ok(pairing),
        }
    }
}

impl TryFrom<PairingRecord> for Pairing {
    type Error = BracketError;

    fn try_from(record: PairingRecord) -> Result<Self, Self::Error> {
        record.into_pairing()
    }
}

impl From<Pairing> for PairingRecord {
    fn from(pairing: Pairing) -> Self {
        PairingRecord {
            round: i64::from(pairing.round),
            pick: pairing.pick.map(Into::into),
            winner: pairing.result.map(|(winner, _)| winner.into()),
            team1: pairing.team1.into(),
            team2: pairing.team2.into(),
        }
    }
}
