//! Persistence: one pretty-printed JSON file per bracket, keyed by `owner-name`.

use crate::models::{Bracket, BracketError};
use std::fs;
use std::path::{Path, PathBuf};

/// Storage key of a bracket.
pub fn storage_key(owner: &str, name: &str) -> String {
    format!("{}-{}", owner, name)
}

/// File a bracket with this owner and name is stored in under `dir`.
pub fn bracket_path(dir: &Path, owner: &str, name: &str) -> PathBuf {
    dir.join(format!("{}.json", storage_key(owner, name)))
}

/// Write the bracket to `dir`, creating the directory if needed. Returns the file path.
pub fn save_bracket(dir: &Path, bracket: &Bracket) -> Result<PathBuf, BracketError> {
    fs::create_dir_all(dir).map_err(|e| BracketError::Persistence(e.to_string()))?;
    let path = bracket_path(dir, bracket.owner(), bracket.name());
    let json = serde_json::to_string_pretty(bracket)
        .map_err(|e| BracketError::Persistence(e.to_string()))?;
    fs::write(&path, json).map_err(|e| BracketError::Persistence(e.to_string()))?;
    log::debug!("Saved bracket to {}", path.display());
    Ok(path)
}

/// Read a bracket back. The loaded bracket is validated exactly like a new one.
pub fn load_bracket(dir: &Path, owner: &str, name: &str) -> Result<Bracket, BracketError> {
    let path = bracket_path(dir, owner, name);
    let json = fs::read_to_string(&path)
        .map_err(|e| BracketError::Persistence(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&json).map_err(|e| BracketError::Persistence(e.to_string()))
}
