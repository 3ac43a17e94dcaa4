//! Pipeline runner - dispatches primitives to expansion routines

use argus_domain::{
    EdgeId, InferenceId, InferenceRecord, InferenceStatus, Node, NodeId, Primitive,
};
use argus_store::KnowledgeGraph;
use std::collections::HashMap;
use std::fmt;

/// What an expansion did to the graph
///
/// Expansions report failures here instead of returning `Err`, so the
/// decision loop always gets something to learn from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpansionOutcome {
    /// Nodes inserted by this expansion
    pub created_nodes: Vec<NodeId>,
    /// Pre-existing nodes the expansion read or linked to
    pub touched_nodes: Vec<NodeId>,
    /// Edges inserted by this expansion
    pub created_edges: Vec<EdgeId>,
    /// Inference record written for this expansion
    pub inference: Option<InferenceId>,
    /// Why parts of the expansion failed
    pub failures: Vec<String>,
}

impl ExpansionOutcome {
    /// Start an outcome for an expansion of `target`
    pub fn new(target: NodeId) -> Self {
        Self {
            touched_nodes: vec![target],
            ..Default::default()
        }
    }

    /// Whether any new node was added
    pub fn is_productive(&self) -> bool {
        !self.created_nodes.is_empty()
    }

    /// Status of the inference describing this outcome
    ///
    /// An expansion that hit failures and added nothing is rejected; any other
    /// outcome is accepted.
    pub fn status(&self) -> InferenceStatus {
        if !self.failures.is_empty() && self.created_nodes.is_empty() {
            InferenceStatus::Rejected
        } else {
            InferenceStatus::Accepted
        }
    }

    /// Note a node the expansion ended up at
    pub fn record_node(&mut self, id: NodeId, created: bool) {
        if self.created_nodes.contains(&id) || self.touched_nodes.contains(&id) {
            return;
        }
        if created {
            self.created_nodes.push(id);
        } else {
            self.touched_nodes.push(id);
        }
    }

    /// Note a failed step and keep going
    pub fn record_failure(&mut self, step: &str, error: impl fmt::Display) {
        tracing::warn!(step, error = %error, "expansion step failed");
        self.failures.push(format!("{step}: {error}"));
    }

    /// Write the inference record describing this outcome
    ///
    /// The record lists every node touched or created and every edge created.
    pub fn conclude(
        &mut self,
        graph: &mut KnowledgeGraph,
        hypothesis: impl Into<String>,
        reasoning: impl Into<String>,
        confidence: f64,
    ) {
        let mut involved = self.touched_nodes.clone();
        involved.extend_from_slice(&self.created_nodes);

        let record = InferenceRecord::new(
            hypothesis,
            involved,
            self.created_edges.clone(),
            reasoning,
            confidence,
        )
        .map(|record| record.with_status(self.status()));

        match record.map_err(argus_store::StoreError::from).and_then(|r| graph.add_inference(r)) {
            Ok(id) => self.inference = Some(id),
            Err(e) => self.record_failure("inference", e),
        }
    }
}

/// An expansion routine bound to one primitive
///
/// Routines never remove or overwrite existing records; they only add nodes,
/// edges and an inference, and raise node confidence monotonically.
pub trait Expansion: Send {
    /// Primitive this routine implements
    fn primitive(&self) -> Primitive;

    /// Expand `node`, which must already be in `graph`
    fn expand(&mut self, node: &Node, graph: &mut KnowledgeGraph) -> ExpansionOutcome;
}

/// Dispatch table from primitive to routine
#[derive(Default)]
pub struct PipelineRunner {
    routines: HashMap<Primitive, Box<dyn Expansion>>,
}

impl fmt::Debug for PipelineRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut registered: Vec<_> = self.routines.keys().collect();
        registered.sort();
        f.debug_struct("PipelineRunner")
            .field("routines", &registered)
            .finish()
    }
}

impl PipelineRunner {
    /// Create a runner with no routines
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a routine, replacing any previous one for its primitive
    pub fn register(&mut self, routine: Box<dyn Expansion>) -> Option<Box<dyn Expansion>> {
        self.routines.insert(routine.primitive(), routine)
    }

    /// Builder form of [`register`](Self::register)
    pub fn with_routine(mut self, routine: impl Expansion + 'static) -> Self {
        self.register(Box::new(routine));
        self
    }

    /// Whether a routine is registered for `primitive`
    pub fn has_routine(&self, primitive: Primitive) -> bool {
        self.routines.contains_key(&primitive)
    }

    /// Run the routine for `primitive` against `node`
    ///
    /// A primitive without a routine is a no-op and returns `None`.
    pub fn execute(
        &mut self,
        primitive: Primitive,
        node: &Node,
        graph: &mut KnowledgeGraph,
    ) -> Option<ExpansionOutcome> {
        let Some(routine) = self.routines.get_mut(&primitive) else {
            tracing::warn!(primitive = %primitive, node = %node.id, "no routine registered, skipping");
            return None;
        };

        tracing::debug!(primitive = %primitive, node = %node.id, value = %node.value, "dispatching");
        Some(routine.expand(node, graph))
    }

    /// Run a primitive named by its string tag
    ///
    /// Unknown tags are a no-op, logged at warning level.
    pub fn execute_tag(
        &mut self,
        tag: &str,
        node: &Node,
        graph: &mut KnowledgeGraph,
    ) -> Option<ExpansionOutcome> {
        match tag.parse::<Primitive>() {
            Ok(primitive) => self.execute(primitive, node, graph),
            Err(e) => {
                tracing::warn!(tag, error = %e, "unknown primitive, skipping");
                None
            }
        }
    }
}
