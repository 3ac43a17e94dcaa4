//! Error types for the domain layer

use thiserror::Error;

/// Validation errors raised while constructing domain values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Confidence outside `[0, 1]` (or NaN)
    #[error("Confidence out of range [0, 1]: {0}")]
    ConfidenceOutOfRange(f64),

    /// An identifier string could not be parsed
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    /// A tag string did not name a known variant
    #[error("Unknown {kind} tag: {tag}")]
    UnknownTag {
        /// Which tag family was being parsed
        kind: &'static str,
        /// The offending tag
        tag: String,
    },
}

/// Failures reported by external collaborators
///
/// Primitives capture these as failure reasons instead of propagating them,
/// so one misbehaving service never halts the investigation loop.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollaboratorError {
    /// The collaborator did not answer in time
    #[error("{service} timed out after {after_ms}ms")]
    Timeout {
        /// Collaborator name
        service: String,
        /// Elapsed budget in milliseconds
        after_ms: u64,
    },

    /// The collaborator answered with an error
    #[error("{service} failed: {message}")]
    Service {
        /// Collaborator name
        service: String,
        /// Error detail
        message: String,
    },

    /// The collaborator answered with something unusable
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl CollaboratorError {
    /// Shorthand for a service failure
    pub fn service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Service {
            service: service.into(),
            message: message.into(),
        }
    }
}
