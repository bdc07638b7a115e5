//! Error types for sequin

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequinError {
    #[error("Unknown run mode: {0}")]
    UnknownRunMode(String),
    #[error("Unknown curve shape: {0}")]
    UnknownCurveShape(String),
    #[error("Curve shape index out of range: {0}")]
    CurveShapeIndex(usize),
    #[error("Unknown generator: {0}")]
    UnknownGenerator(String),
}

pub type Result<T> = std::result::Result<T, SequinError>;

/// Normalize a user-typed name for lookup: lowercase, drop spaces and separators.
pub(crate) fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}
