//! Bracket business logic: scoring, strict round progression, input decoding, persistence.

mod input;
mod progression;
pub(crate) mod scoring;
mod store;

pub use input::{parse_pairings_csv, parse_pairings_json};
pub use progression::{advance, submit_next_round};
pub use scoring::{
    favorite_and_underdog, score_pairing, seed_weighted_score, ScoringMode, UNDECIDED_SCORE,
};
pub use store::{bracket_path, load_bracket, save_bracket, storage_key};
