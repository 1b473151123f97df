//! Team: a name plus a competitive seed.

use crate::models::bracket::BracketError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A team in the bracket. Lower seed = stronger team.
///
/// Equality and hashing cover both name and seed. Comparing a `Team` against any other type
/// is rejected at compile time:
///
/// ```compile_fail
/// use upset_bracket::{Pairing, Team};
/// let a = Team::new("Creighton", 8).unwrap();
/// let b = Team::new("Louisville", 9).unwrap();
/// let p = Pairing::new(a.clone(), b, 1).unwrap();
/// let _ = a == p;
/// ```
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "(String, i64)", into = "(String, i64)")]
pub struct Team {
    name: String,
    seed: u32,
}

impl Team {
    /// Create a team. Fails with `InvalidSeed` for seeds below 1 and `InvalidTeamName` for a blank name.
    pub fn new(name: impl Into<String>, seed: i64) -> Result<Self, BracketError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(BracketError::InvalidTeamName);
        }
        if seed < 1 {
            return Err(BracketError::InvalidSeed(seed));
        }
        let seed = u32::try_from(seed).map_err(|_| BracketError::InvalidSeed(seed))?;
        Ok(Self {
            name: name.to_string(),
            seed,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl TryFrom<(String, i64)> for Team {
    type Error = BracketError;

    fn try_from((name, seed): (String, i64)) -> Result<Self, Self::Error> {
        Team::new(name, seed)
    }
}

impl From<Team> for (String, i64) {
    fn from(team: Team) -> Self {
        (team.name, i64::from(team.seed))
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.seed)
    }
}
