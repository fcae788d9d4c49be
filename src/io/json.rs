//! JSON files: rate tables and model files.
//!
//! - rate tables (`pricing::RateTable`) replace the built-in brackets
//! - model files (`models::ModelFile`) carry externally trained coefficients

use std::fs::File;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::models::ModelFile;
use crate::pricing::RateTable;

/// Read and validate a rate table.
pub fn read_rate_table(path: &Path) -> Result<RateTable, AppError> {
    let table: RateTable = read_json(path, "rate table")?;
    table.validate()?;
    Ok(table)
}

/// Write a rate table (e.g. the built-in one, as a starting point for edits).
pub fn write_rate_table(path: &Path, table: &RateTable) -> Result<(), AppError> {
    write_json(path, "rate table", table)
}

pub fn read_model_file(path: &Path) -> Result<ModelFile, AppError> {
    read_json(path, "model")
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open {what} JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid {what} JSON: {e}")))
}

fn write_json<T: Serialize>(path: &Path, what: &str, value: &T) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create {what} JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, value)
        .map_err(|e| AppError::new(2, format!("Failed to write {what} JSON: {e}")))
}
