use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the eventscout library
#[derive(Error, Debug)]
pub enum Error {
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Failed to read dataset: {0}")]
  Csv(#[from] csv::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("Dataset {path} is missing required column '{column}'")]
  MissingColumn { path: PathBuf, column: String },

  #[error("Dataset {path} has an unreadable value in column '{column}' on row {row}: '{value}'")]
  InvalidValue { path: PathBuf, column: String, row: usize, value: String },

  #[error("Event '{0}' not found in catalog")]
  UnknownEvent(String),

  #[error("Invalid configuration: {0}")]
  Config(String),

  #[error("Model artifact {path} is unusable: {reason}")]
  Model { path: PathBuf, reason: String },

  #[error("Failed to build map link: {0}")]
  Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;
