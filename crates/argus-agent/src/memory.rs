//! Investigation memory - what has paid off so far
//!
//! The decision loop only talks to the [`ExpansionMemory`] trait, so the
//! success-ratio heuristic below can be swapped for another strategy without
//! touching target selection.

use argus_domain::{NodeType, Primitive};
use std::collections::HashMap;

/// Score given to anything never observed
pub const NEUTRAL_PRIOR: f64 = 0.5;

/// Learned weighting fed back into target selection
pub trait ExpansionMemory: Send {
    /// How productive expansions of this node type have been, in `[0, 1]`
    fn node_type_score(&self, node_type: NodeType) -> f64;

    /// How productive this primitive has been, in `[0, 1]`
    fn primitive_score(&self, primitive: Primitive) -> f64;

    /// Record whether an expansion added nodes
    fn record_result(&mut self, node_type: NodeType, primitive: Primitive, success: bool);
}

/// Success/failure counters per primitive and per node type
///
/// Counts never decay and are never capped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvestigationMemory {
    successful_primitives: HashMap<Primitive, u64>,
    failed_primitives: HashMap<Primitive, u64>,
    node_type_success: HashMap<NodeType, u64>,
    node_type_fail: HashMap<NodeType, u64>,
}

impl InvestigationMemory {
    /// Create an empty memory
    pub fn new() -> Self {
        Self::default()
    }

    /// Total outcomes recorded
    pub fn observations(&self) -> u64 {
        self.successful_primitives.values().sum::<u64>() + self.failed_primitives.values().sum::<u64>()
    }
}

fn ratio(successes: u64, failures: u64) -> f64 {
    match successes + failures {
        0 => NEUTRAL_PRIOR,
        total => successes as f64 / total as f64,
    }
}

fn count<K: std::hash::Hash + Eq>(counts: &HashMap<K, u64>, key: &K) -> u64 {
    counts.get(key).copied().unwrap_or(0)
}

impl ExpansionMemory for InvestigationMemory {
    fn node_type_score(&self, node_type: NodeType) -> f64 {
        ratio(
            count(&self.node_type_success, &node_type),
            count(&self.node_type_fail, &node_type),
        )
    }

    fn primitive_score(&self, primitive: Primitive) -> f64 {
        ratio(
            count(&self.successful_primitives, &primitive),
            count(&self.failed_primitives, &primitive),
        )
    }

    fn record_result(&mut self, node_type: NodeType, primitive: Primitive, success: bool) {
        let (primitives, node_types) = if success {
            (&mut self.successful_primitives, &mut self.node_type_success)
        } else {
            (&mut self.failed_primitives, &mut self.node_type_fail)
        };
        *primitives.entry(primitive).or_insert(0) += 1;
        *node_types.entry(node_type).or_insert(0) += 1;
    }
}
