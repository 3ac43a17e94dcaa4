//! Argus Storage Layer
//!
//! In-memory graph store for an investigation, plus the biometric entity
//! resolver.
//!
//! # Architecture
//!
//! - [`KnowledgeGraph`] owns nodes, edges and inference records, keyed by id
//!   and kept in insertion order so scans are reproducible
//! - Nodes are also indexed by their natural key `(type, value)` so repeated
//!   discoveries of the same artifact land on the same node
//! - [`EntityResolver`] matches signature vectors by cosine similarity
//! - [`GraphSnapshot`] is the JSON export/import format; import is an
//!   idempotent upsert by id
//!
//! Scans are linear in the number of edges. That is fine at investigation
//! scale (hundreds to low thousands of nodes) and not meant for more.
//!
//! # Examples
//!
//! ```
//! use argus_domain::{Edge, Node, NodeType, Relation};
//! use argus_store::KnowledgeGraph;
//!
//! let mut graph = KnowledgeGraph::new();
//! let domain = graph.add_node(Node::new(NodeType::Domain, "example.com", "spiderfoot", 0.9)?)?;
//! let ip = graph.add_node(Node::new(NodeType::Ip, "203.0.113.7", "heuristic", 0.5)?)?;
//! graph.add_edge(Edge::new(domain, ip, Relation::HostedOn, 0.4, "DNS resolution", "dns_lookup")?)?;
//!
//! assert_eq!(graph.find_related(domain).len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]

mod graph;
pub mod resolver;
mod snapshot;

pub use graph::{KnowledgeGraph, Related, Upserted};
pub use resolver::{EntityResolver, ResolvedMatch, ResolverError};
pub use snapshot::{GraphSnapshot, GraphStatistics, ImportReport};

use argus_domain::{DomainError, NodeId};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// A record with this id is already stored
    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    /// An edge references a node that is not in the store
    #[error("Node not found: {0}")]
    MissingNode(NodeId),

    /// Lookup by id failed
    #[error("Not found: {0}")]
    NotFound(String),

    /// A stored value failed domain validation
    #[error("Invalid data: {0}")]
    Domain(#[from] DomainError),

    /// Snapshot file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot (de)serialization failed
    #[error("Snapshot format error: {0}")]
    Json(#[from] serde_json::Error),
}
