use thiserror::Error;

/// Error type that captures common tracker failures.
///
/// The computation core (activity predicate and breakdown) is total and never
/// returns these; they surface from persistence, configuration, and data entry.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid input: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
