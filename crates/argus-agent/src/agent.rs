//! The decision loop
//!
//! One cycle picks the most promising unvisited node, dispatches the primitive
//! for its type, and feeds the result back into memory. The loop ends when no
//! unvisited node scores above zero.

use crate::config::{AgentSettings, InvestigationConfig};
use crate::memory::{ExpansionMemory, InvestigationMemory};
use crate::metrics::InvestigationMetrics;
use crate::runner::{ExpansionOutcome, PipelineRunner};
use crate::AgentError;
use argus_domain::{Node, NodeId, Primitive};
use argus_store::KnowledgeGraph;
use std::collections::HashSet;

/// What one call to [`Investigator::run_cycle`] did
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// A primitive ran against a node
    Expanded {
        /// Primitive dispatched
        primitive: Primitive,
        /// Node expanded
        node_id: NodeId,
        /// Routine result; `None` when no routine is registered
        outcome: Option<ExpansionOutcome>,
        /// Whether the graph gained nodes
        success: bool,
    },
    /// The target had no applicable primitive; it is now visited
    Skipped {
        /// Node passed over
        node_id: NodeId,
    },
    /// No unvisited node scores above zero
    Exhausted,
}

/// Why a bulk run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Nothing left worth expanding
    Exhausted,
    /// The cycle budget ran out
    CycleLimit,
    /// Shutdown was requested between cycles
    Cancelled,
}

/// Result of a bulk run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvestigationSummary {
    /// Cycles that selected a target
    pub cycles: usize,
    /// Why the run stopped
    pub stop_reason: StopReason,
}

/// Drives an investigation over a graph it owns
///
/// # Examples
///
/// ```
/// use argus_agent::{InvestigationConfig, Investigator, PipelineRunner, StopReason};
/// use argus_domain::{Node, NodeType};
/// use argus_store::KnowledgeGraph;
///
/// let config = InvestigationConfig::default();
/// let mut investigator = Investigator::new(KnowledgeGraph::new(), PipelineRunner::new(), &config);
/// investigator.seed(Node::new(NodeType::Asn, "AS64500", "user_upload", 1.0)?)?;
///
/// // ASNs have no primitive: one skipped cycle, then nothing is left
/// let summary = investigator.run(10);
/// assert_eq!(summary.cycles, 1);
/// assert_eq!(summary.stop_reason, StopReason::Exhausted);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Investigator<M = InvestigationMemory> {
    graph: KnowledgeGraph,
    runner: PipelineRunner,
    memory: M,
    visited: HashSet<NodeId>,
    settings: AgentSettings,
    metrics: InvestigationMetrics,
}

impl Investigator<InvestigationMemory> {
    /// Create an investigator with a fresh success-ratio memory
    pub fn new(graph: KnowledgeGraph, runner: PipelineRunner, config: &InvestigationConfig) -> Self {
        Self::with_memory(graph, runner, InvestigationMemory::new(), config)
    }
}

impl<M: ExpansionMemory> Investigator<M> {
    /// Create an investigator with a custom memory strategy
    pub fn with_memory(
        graph: KnowledgeGraph,
        runner: PipelineRunner,
        memory: M,
        config: &InvestigationConfig,
    ) -> Self {
        Self {
            graph,
            runner,
            memory,
            visited: HashSet::new(),
            settings: config.agent.clone(),
            metrics: InvestigationMetrics::new(),
        }
    }

    /// Add a starting artifact, reusing an existing node with the same natural key
    pub fn seed(&mut self, node: Node) -> Result<NodeId, AgentError> {
        let upserted = self.graph.upsert_node(node)?;
        tracing::info!(node = %upserted.id, created = upserted.created, "seeded investigation");
        Ok(upserted.id)
    }

    /// Score of a node as an expansion target
    ///
    /// `type_priority × confidence × node_type_score`
    pub fn target_score(&self, node: &Node) -> f64 {
        self.settings.type_priority(node.node_type)
            * node.confidence()
            * self.memory.node_type_score(node.node_type)
    }

    /// Pick the best unvisited node
    ///
    /// Ties go to the node inserted first. Returns `None` when no unvisited
    /// node scores above zero.
    pub fn choose_next_target(&self) -> Option<NodeId> {
        let mut best: Option<(NodeId, f64)> = None;

        for node in self.graph.nodes().filter(|n| !self.visited.contains(&n.id)) {
            let score = self.target_score(node);
            if score > best.map_or(0.0, |(_, s)| s) {
                best = Some((node.id, score));
            }
        }

        best.map(|(id, _)| id)
    }

    /// Primitive applicable to a node, if any
    pub fn decide_primitive(&self, node: &Node) -> Option<Primitive> {
        Primitive::for_node_type(node.node_type)
    }

    /// Run one step of the investigation
    pub fn run_cycle(&mut self) -> CycleOutcome {
        let Some(node) = self
            .choose_next_target()
            .and_then(|id| self.graph.get_node(id))
            .cloned()
        else {
            tracing::info!(visited = self.visited.len(), "investigation exhausted");
            return CycleOutcome::Exhausted;
        };

        // Visited before dispatch, so a failing node is never retried
        self.visited.insert(node.id);
        self.metrics.record_cycle();

        let Some(primitive) = self.decide_primitive(&node) else {
            tracing::debug!(node = %node.id, node_type = %node.node_type, "no primitive applies");
            self.metrics.record_skip();
            return CycleOutcome::Skipped { node_id: node.id };
        };

        let nodes_before = self.graph.node_count();
        let edges_before = self.graph.edge_count();
        let outcome = self.runner.execute(primitive, &node, &mut self.graph);
        let nodes_added = self.graph.node_count() - nodes_before;
        let edges_added = self.graph.edge_count() - edges_before;

        let success = nodes_added > 0;
        self.memory.record_result(node.node_type, primitive, success);
        self.metrics.record_expansion(
            primitive,
            nodes_added,
            edges_added,
            outcome.as_ref().map_or(0, |o| o.failures.len()),
        );

        tracing::info!(
            primitive = %primitive,
            node = %node.id,
            value = %node.value,
            nodes_added,
            edges_added,
            "cycle complete"
        );

        CycleOutcome::Expanded {
            primitive,
            node_id: node.id,
            outcome,
            success,
        }
    }

    /// Run cycles until exhausted or `max_cycles` targets have been processed
    pub fn run(&mut self, max_cycles: usize) -> InvestigationSummary {
        let mut cycles = 0;

        while cycles < max_cycles {
            if matches!(self.run_cycle(), CycleOutcome::Exhausted) {
                return InvestigationSummary {
                    cycles,
                    stop_reason: StopReason::Exhausted,
                };
            }
            cycles += 1;
        }

        tracing::info!(cycles, "cycle limit reached");
        InvestigationSummary {
            cycles,
            stop_reason: StopReason::CycleLimit,
        }
    }

    /// Run with the configured cycle budget
    pub fn run_to_budget(&mut self) -> InvestigationSummary {
        self.run(self.settings.max_cycles)
    }

    /// Whether a node has been expanded (or passed over)
    pub fn is_visited(&self, id: NodeId) -> bool {
        self.visited.contains(&id)
    }

    /// Number of nodes visited so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// The investigation graph
    pub fn graph(&self) -> &KnowledgeGraph {
        &self.graph
    }

    /// Give the graph back, ending the investigation
    pub fn into_graph(self) -> KnowledgeGraph {
        self.graph
    }

    /// Learned weighting
    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Run metrics
    pub fn metrics(&self) -> &InvestigationMetrics {
        &self.metrics
    }

    /// Decision loop settings
    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }
}
