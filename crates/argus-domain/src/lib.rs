//! Argus Domain Layer
//!
//! Core data model for the investigation graph. Every other crate in the
//! workspace builds on the types defined here.
//!
//! ## Key Concepts
//!
//! - **Node**: a typed investigative artifact with provenance and confidence
//! - **Edge**: a directed, confidence-weighted relationship between two nodes
//! - **InferenceRecord**: an audit entry explaining why an expansion happened
//! - **Primitive**: a named investigative action applicable to a node
//! - **Confidence Model**: deterministic trust scoring for edges and nodes
//!
//! ## Architecture
//!
//! - Pure data and arithmetic, no I/O
//! - External collaborators (vision models, DNS, platform probes) are
//!   described as traits in [`traits`]; implementations live with the host
//! - Node confidence only ever grows (see [`Node::update_confidence`])

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod confidence;
pub mod edge;
pub mod error;
pub mod ids;
pub mod inference;
pub mod kinds;
pub mod node;
pub mod traits;

// Re-exports for convenience
pub use confidence::{calculate_confidence, ConfidenceModel};
pub use edge::Edge;
pub use error::{CollaboratorError, DomainError};
pub use ids::{EdgeId, InferenceId, NodeId};
pub use inference::{InferenceRecord, InferenceStatus};
pub use kinds::{NodeType, Primitive, Relation};
pub use node::Node;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time in milliseconds since the Unix epoch
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Validate that a confidence value lies in `[0, 1]`
///
/// NaN is rejected along with out-of-range values.
pub fn validate_confidence(value: f64) -> Result<f64, DomainError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(DomainError::ConfidenceOutOfRange(value))
    }
}
