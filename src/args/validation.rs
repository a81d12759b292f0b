use serde_json::Value;
use std::{fs, path::PathBuf};

use super::types::Args;
use crate::controller::seed::RosterSeed;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Args {
    /// # Errors
    ///
    /// Will return `Err` if a setting is out of range
    pub fn validate(&self) -> Result<(), String> {
        if self.db_name.trim().is_empty() {
            return Err("Database name is required".to_string());
        }
        if self.round_minutes < 1 {
            return Err(format!(
                "round-minutes must be positive, got {}",
                self.round_minutes
            ));
        }
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(format!(
                "log-level '{}' is not one of {LOG_LEVELS:?}",
                self.log_level
            ));
        }
        Ok(())
    }
}

/// # Errors
///
/// Will return `Err` if the file is not readable
pub fn check_readable_file(file: &str) -> Result<String, String> {
    // split by semi-colon
    for file in file.split(';').map(str::trim).filter(|f| !f.is_empty()) {
        let path = PathBuf::from(file);
        if !path.is_file() || fs::metadata(&path).is_err() {
            return Err(format!("The sql startup script '{file}' is not readable."));
        }
    }
    Ok(file.to_string())
}

/// # Errors
///
/// Will return `Err` if the file is not readable, is not valid json, or does
/// not describe a roster
pub fn check_readable_file_and_json(file: &str) -> Result<Value, String> {
    let path = PathBuf::from(file);
    if !path.is_file() {
        return Err(format!("The json file '{file}' is not readable."));
    }
    let contents =
        fs::read_to_string(&path).map_err(|e| format!("The json file '{file}' is not readable: {e}"))?;
    let json: Value = serde_json::from_str(&contents)
        .map_err(|e| format!("The json file '{file}' is not valid json: {e}"))?;
    validate_json_format(&json)?;
    Ok(json)
}

/// Expects `{ "members": [...], "caddies": [...] }`, see [`RosterSeed`].
///
/// # Errors
///
/// Will return `Err` if the json is not in the correct format
pub fn validate_json_format(json: &Value) -> Result<(), String> {
    if !json.is_object() {
        return Err("The json file is not in the correct format. Expected an object.".to_string());
    }
    RosterSeed::from_json(json)
        .map(|_| ())
        .map_err(|e| format!("The json file is not in the correct format. {e}"))
}
