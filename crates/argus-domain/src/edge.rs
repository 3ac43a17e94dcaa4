//! Edge module - directed, confidence-weighted relationships

use crate::{now_millis, validate_confidence, DomainError, EdgeId, NodeId, Relation};
use serde::{Deserialize, Serialize};

/// A directed relationship between two nodes
///
/// Parallel edges (same endpoints and relation) are kept apart: each one is an
/// independent piece of corroborating evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier
    pub id: EdgeId,

    /// Source node
    pub from_node: NodeId,

    /// Target node
    pub to_node: NodeId,

    /// Relationship kind
    pub relation: Relation,

    /// Trust in this relationship [0.0, 1.0], independent of the endpoints
    pub confidence: f64,

    /// Human-readable justification
    pub explanation: String,

    /// Detection method that produced the edge (keys method reliability)
    pub method: String,

    /// Supporting observations
    #[serde(default)]
    pub evidence: Vec<String>,

    /// When the edge was established (ms since epoch)
    pub timestamp: u64,
}

impl Edge {
    /// Create a new edge
    ///
    /// Fails if `confidence` is outside `[0, 1]`.
    pub fn new(
        from_node: NodeId,
        to_node: NodeId,
        relation: Relation,
        confidence: f64,
        explanation: impl Into<String>,
        method: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id: EdgeId::new(),
            from_node,
            to_node,
            relation,
            confidence: validate_confidence(confidence)?,
            explanation: explanation.into(),
            method: method.into(),
            evidence: Vec::new(),
            timestamp: now_millis(),
        })
    }

    /// Attach an evidence entry
    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence.push(evidence.into());
        self
    }

    /// Whether the edge touches `node` at either end
    pub fn touches(&self, node: NodeId) -> bool {
        self.from_node == node || self.to_node == node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_creation() {
        let a = NodeId::new();
        let b = NodeId::new();
        let edge = Edge::new(a, b, Relation::HostedOn, 0.4, "DNS resolution", "dns_lookup").unwrap();

        assert_eq!(edge.from_node, a);
        assert_eq!(edge.to_node, b);
        assert_eq!(edge.relation, Relation::HostedOn);
        assert!(edge.touches(a) && edge.touches(b));
        assert!(!edge.touches(NodeId::new()));
    }

    #[test]
    fn test_edge_rejects_invalid_confidence() {
        let result = Edge::new(NodeId::new(), NodeId::new(), Relation::HostedOn, 1.01, "", "dns_lookup");
        assert_eq!(result.unwrap_err(), DomainError::ConfidenceOutOfRange(1.01));
    }
}
