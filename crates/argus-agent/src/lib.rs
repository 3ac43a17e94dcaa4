//! Argus Investigation Agent
//!
//! The autonomous part of an investigation: pick the most promising artifact,
//! expand it through an external collaborator, learn from the result, repeat.
//!
//! # Architecture
//!
//! - [`Investigator`] is the decision loop. It owns the graph, a
//!   [`PipelineRunner`], an [`ExpansionMemory`] and the visited set.
//! - [`PipelineRunner`] maps each [`Primitive`](argus_domain::Primitive) to an
//!   [`Expansion`] routine. The stock routines live in [`primitives`].
//! - [`InvestigationMemory`] scores node types and primitives by their past
//!   success ratio.
//! - [`InvestigationWorker`] runs the loop on tokio, one cycle per blocking
//!   task, and stops cleanly between cycles.
//!
//! # Examples
//!
//! ```
//! use argus_agent::primitives::InfrastructureExpansion;
//! use argus_agent::{InvestigationConfig, Investigator, PipelineRunner};
//! use argus_domain::traits::{InfrastructureRecord, InfrastructureResolver};
//! use argus_domain::{CollaboratorError, Node, NodeType};
//! use argus_store::KnowledgeGraph;
//! use std::sync::Arc;
//!
//! struct StaticDns;
//!
//! impl InfrastructureResolver for StaticDns {
//!     fn resolve(&self, _domain: &str) -> Result<InfrastructureRecord, CollaboratorError> {
//!         Ok(InfrastructureRecord {
//!             ip: "203.0.113.7".into(),
//!             asn: "AS64500".into(),
//!             hosting_provider: "ExampleHost".into(),
//!         })
//!     }
//!
//!     fn co_hosted_domains(&self, _ip: &str) -> Result<Vec<String>, CollaboratorError> {
//!         Ok(Vec::new())
//!     }
//! }
//!
//! let config = InvestigationConfig::default();
//! let runner = PipelineRunner::new()
//!     .with_routine(InfrastructureExpansion::new(Arc::new(StaticDns), &config));
//! let mut investigator = Investigator::new(KnowledgeGraph::new(), runner, &config);
//! investigator.seed(Node::new(NodeType::Domain, "example.com", "user_upload", 0.9)?)?;
//!
//! investigator.run_to_budget();
//! assert_eq!(investigator.graph().node_count(), 4);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]

mod agent;
pub mod config;
mod error;
pub mod memory;
mod metrics;
pub mod primitives;
mod runner;
mod worker;

pub use agent::{CycleOutcome, InvestigationSummary, Investigator, StopReason};
pub use config::{AgentSettings, ConfigError, ExpansionSettings, InvestigationConfig};
pub use error::AgentError;
pub use memory::{ExpansionMemory, InvestigationMemory};
pub use metrics::InvestigationMetrics;
pub use runner::{Expansion, ExpansionOutcome, PipelineRunner};
pub use worker::InvestigationWorker;
