//! Argus Graph Intelligence
//!
//! Batch analytics over a finished (or paused) investigation graph.
//!
//! The analytics provide:
//! - **Corroboration reinforcement**: parallel edges asserting the same
//!   relationship boost each other, with a saturating cap
//! - **Merge candidates**: strong `likely_same_as` edges, listed for manual
//!   reconciliation (nothing is merged automatically)
//! - **Degree centrality**: in + out edge count per node
//! - **Risk scoring**: trust + connectedness + category sensitivity
//!
//! Everything except reinforcement is a pure read of the graph.
//!
//! # Examples
//!
//! ```
//! use argus_intel::{Analyst, IntelConfig};
//! use argus_store::KnowledgeGraph;
//!
//! let mut graph = KnowledgeGraph::new();
//! let analyst = Analyst::new(IntelConfig::default());
//! let report = analyst.analyze(&mut graph)?;
//! assert!(report.merge_candidates.is_empty());
//! # Ok::<(), argus_intel::IntelError>(())
//! ```

#![warn(missing_docs)]

mod analysis;
mod analyst;
mod config;

pub use analysis::{
    compute_centrality, compute_risk_scores, detect_entity_merges, reinforce_confidence,
    MergeCandidate, Reinforcement,
};
pub use analyst::{Analyst, IntelReport};
pub use config::IntelConfig;

use thiserror::Error;

/// Errors that can occur during graph analytics
#[derive(Error, Debug)]
pub enum IntelError {
    /// Storage layer error
    #[error("Store error: {0}")]
    Store(#[from] argus_store::StoreError),
}
