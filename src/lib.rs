//! Single-elimination bracket tracker: library with models and business logic.

pub mod logic;
pub mod models;

pub use logic::{
    advance, bracket_path, favorite_and_underdog, load_bracket, parse_pairings_csv,
    parse_pairings_json, save_bracket, score_pairing, seed_weighted_score, storage_key,
    submit_next_round, ScoringMode, UNDECIDED_SCORE,
};
pub use models::{Bracket, BracketError, BracketState, Pairing, PairingKey, PairingRecord, Team};
