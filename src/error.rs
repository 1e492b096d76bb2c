//! Error taxonomy for the engine: configuration, algorithm, numerical, and I/O
//! failures, matching the fatal-at-setup / fatal-in-step split described in
//! the design notes.

use thiserror::Error;

/// Catch-all error type returned by every fallible entry point in this crate.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed or inconsistent configuration. Raised during setup; always fatal.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A requested combination of features has no valid algorithm behind it
    /// (e.g. P3M requested for a potential family without a long-range kernel).
    #[error("algorithm error: {0}")]
    Algorithm(String),

    /// Ewald solver failed to meet its accuracy target, or NaN/Inf was
    /// detected in forces or positions during a step.
    #[error("numerical error: {0}")]
    Numerical(String),

    /// Checkpoint read/write failure or missing particle input file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Checkpoint (de)serialization failure.
    #[error("checkpoint (de)serialization error: {0}")]
    Serialization(#[from] Box<bincode::ErrorKind>),
}

pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn algorithm<S: Into<String>>(msg: S) -> Self {
        Self::Algorithm(msg.into())
    }

    pub fn numerical<S: Into<String>>(msg: S) -> Self {
        Self::Numerical(msg.into())
    }
}
