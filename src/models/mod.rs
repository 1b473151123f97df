//! Data structures for the bracket: teams, pairings, the bracket itself.

mod bracket;
mod pairing;
mod team;

pub use bracket::{Bracket, BracketError, BracketState};
pub use pairing::{Pairing, PairingKey, PairingRecord};
pub use team::Team;
