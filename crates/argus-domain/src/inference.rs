//! Inference records - the audit trail of agent expansions

use crate::{now_millis, validate_confidence, DomainError, EdgeId, InferenceId, NodeId};
use serde::{Deserialize, Serialize};

/// Review status of an inference
///
/// Expansions resolve to `Accepted` unless they failed without adding any
/// node, in which case they are `Rejected`. `Pending` is reserved for a
/// review workflow that sits outside the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceStatus {
    /// Awaiting review
    Pending,
    /// Expansion considered worthwhile
    #[default]
    Accepted,
    /// Expansion failed and produced nothing
    Rejected,
}

/// Why the agent performed an expansion, and what it touched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceRecord {
    /// Unique identifier
    pub id: InferenceId,

    /// What the expansion set out to establish
    pub hypothesis: String,

    /// Nodes read or created by the expansion
    pub nodes_involved: Vec<NodeId>,

    /// Edges created by the expansion
    pub edges_created: Vec<EdgeId>,

    /// Free-text reasoning
    pub agent_reasoning: String,

    /// Belief that the expansion was worthwhile (not an edge/node confidence)
    pub confidence: f64,

    /// Review status
    pub status: InferenceStatus,

    /// When the record was written (ms since epoch)
    pub timestamp: u64,
}

impl InferenceRecord {
    /// Create a new record with status `Accepted`
    ///
    /// Fails if `confidence` is outside `[0, 1]`.
    pub fn new(
        hypothesis: impl Into<String>,
        nodes_involved: Vec<NodeId>,
        edges_created: Vec<EdgeId>,
        agent_reasoning: impl Into<String>,
        confidence: f64,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id: InferenceId::new(),
            hypothesis: hypothesis.into(),
            nodes_involved,
            edges_created,
            agent_reasoning: agent_reasoning.into(),
            confidence: validate_confidence(confidence)?,
            status: InferenceStatus::default(),
            timestamp: now_millis(),
        })
    }

    /// Override the status
    pub fn with_status(mut self, status: InferenceStatus) -> Self {
        self.status = status;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_accepted() {
        let record = InferenceRecord::new("h", vec![], vec![], "r", 0.7).unwrap();
        assert_eq!(record.status, InferenceStatus::Accepted);
    }

    #[test]
    fn test_with_status() {
        let record = InferenceRecord::new("h", vec![], vec![], "r", 0.7)
            .unwrap()
            .with_status(InferenceStatus::Rejected);
        assert_eq!(record.status, InferenceStatus::Rejected);
    }

    #[test]
    fn test_rejects_invalid_confidence() {
        assert!(InferenceRecord::new("h", vec![], vec![], "r", 7.0).is_err());
    }
}
