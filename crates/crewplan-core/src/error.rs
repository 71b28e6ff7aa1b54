//! Error types for crewplan

use thiserror::Error;

/// Main error type for crewplan operations.
///
/// Structural infeasibility and budget exhaustion are *not* errors: they
/// are reported as solve statuses. Errors cover broken input, broken IO
/// and internal consistency failures only.
#[derive(Debug, Error)]
pub enum RosterError {
    /// Instance data violates an invariant (duplicate ids, out-of-range
    /// days, off-request referencing unknown crew, ...). Fatal, never
    /// retried.
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    /// Error reading instance files or writing reports
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON in an instance file
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The MILP backend rejected an operation
    #[error("solver error: {0}")]
    Solver(String),

    /// Recomputed KPIs disagree with the solver's reported objective
    #[error("inconsistent solution: {0}")]
    Inconsistent(String),
}

/// Result type alias for crewplan operations
pub type Result<T> = std::result::Result<T, RosterError>;
