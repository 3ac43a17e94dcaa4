//! Node module - typed investigative artifacts

use crate::{now_millis, validate_confidence, DomainError, NodeId, NodeType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A typed investigative artifact
///
/// Confidence never decreases over the lifetime of a node: every update keeps
/// the maximum of the current and the proposed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier, assigned at creation
    pub id: NodeId,

    /// Artifact category
    pub node_type: NodeType,

    /// Artifact payload (path, identifier, vector reference)
    pub value: String,

    /// Provenance tag (e.g. "user_upload", "model_output", a service name)
    pub source: String,

    confidence: f64,

    /// Open-ended auxiliary attributes
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,

    /// Supporting observations
    #[serde(default)]
    pub evidence: Vec<String>,

    /// Creation time (ms since epoch)
    pub first_seen: u64,

    /// Last confidence update (ms since epoch)
    pub last_updated: u64,
}

impl Node {
    /// Create a new node
    ///
    /// Fails if `confidence` is outside `[0, 1]`.
    pub fn new(
        node_type: NodeType,
        value: impl Into<String>,
        source: impl Into<String>,
        confidence: f64,
    ) -> Result<Self, DomainError> {
        let confidence = validate_confidence(confidence)?;
        let now = now_millis();
        Ok(Self {
            id: NodeId::new(),
            node_type,
            value: value.into(),
            source: source.into(),
            confidence,
            metadata: BTreeMap::new(),
            evidence: Vec::new(),
            first_seen: now,
            last_updated: now,
        })
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Attach an evidence entry
    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence.push(evidence.into());
        self
    }

    /// Current confidence in `[0, 1]`
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Raise confidence to `proposed` if it is higher
    ///
    /// A lower proposal leaves the value untouched; `last_updated` advances
    /// either way. Out-of-range proposals are rejected.
    pub fn update_confidence(&mut self, proposed: f64) -> Result<(), DomainError> {
        let proposed = validate_confidence(proposed)?;
        self.confidence = self.confidence.max(proposed);
        self.last_updated = now_millis().max(self.last_updated);
        Ok(())
    }

    /// Natural key used to recognise the same artifact across expansions
    pub fn natural_key(&self) -> (NodeType, &str) {
        (self.node_type, self.value.as_str())
    }
}
