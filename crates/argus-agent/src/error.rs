//! Error types for the investigation agent

use crate::config::ConfigError;
use argus_store::StoreError;
use thiserror::Error;

/// Errors that can occur while driving an investigation
///
/// Collaborator failures are not here: primitives absorb them into their
/// [`ExpansionOutcome`](crate::ExpansionOutcome).
#[derive(Error, Debug)]
pub enum AgentError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Worker error (tokio runtime issues)
    #[error("Worker error: {0}")]
    Worker(String),
}
