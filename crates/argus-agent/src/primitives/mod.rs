//! Expansion primitives
//!
//! Each primitive turns one node into new artifacts by calling external
//! collaborators, links what it found back to the node, and writes one
//! inference record describing the expansion.
//!
//! | Primitive | Applies to | Collaborators |
//! |---|---|---|
//! | [`ArtifactExpansion`] | `image` | fingerprinter, biometric extractor |
//! | [`IdentityExpansion`] | `username` | variant generator, platform prober |
//! | [`InfrastructureExpansion`] | `domain`, `ip` | infrastructure resolver |
//!
//! Discovered nodes are upserted by natural key and take the confidence of
//! the edge that introduced them.

mod artifact;
mod identity;
mod infrastructure;

pub use artifact::ArtifactExpansion;
pub use identity::IdentityExpansion;
pub use infrastructure::InfrastructureExpansion;

use crate::ExpansionOutcome;
use argus_domain::{Edge, EdgeId, Node, NodeId, NodeType, Relation};
use argus_store::{KnowledgeGraph, StoreError, Upserted};

/// How a discovery is attached to the node it came from
struct Link<'a> {
    relation: Relation,
    confidence: f64,
    source: &'a str,
    explanation: &'a str,
    method: &'a str,
}

/// Upsert `(node_type, value)` and link `from` to it
///
/// Failures are recorded on the outcome; the caller carries on.
fn discover(
    graph: &mut KnowledgeGraph,
    outcome: &mut ExpansionOutcome,
    from: NodeId,
    (node_type, value): (NodeType, &str),
    link: &Link<'_>,
) -> Option<NodeId> {
    let result = Node::new(node_type, value, link.source, link.confidence)
        .map_err(StoreError::from)
        .and_then(|node| graph.upsert_node(node));

    match result {
        Ok(Upserted { id, created }) => {
            outcome.record_node(id, created);
            connect(graph, outcome, from, id, link).map(|_| id)
        }
        Err(e) => {
            outcome.record_failure(node_type.as_str(), e);
            None
        }
    }
}

/// Add an edge between two stored nodes
fn connect(
    graph: &mut KnowledgeGraph,
    outcome: &mut ExpansionOutcome,
    from: NodeId,
    to: NodeId,
    link: &Link<'_>,
) -> Option<EdgeId> {
    let result = Edge::new(from, to, link.relation, link.confidence, link.explanation, link.method)
        .map_err(StoreError::from)
        .and_then(|edge| graph.add_edge(edge));

    match result {
        Ok(id) => {
            outcome.created_edges.push(id);
            Some(id)
        }
        Err(e) => {
            outcome.record_failure(link.relation.as_str(), e);
            None
        }
    }
}
