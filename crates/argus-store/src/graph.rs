//! The investigation graph store

use crate::StoreError;
use argus_domain::{
    validate_confidence, Edge, EdgeId, InferenceId, InferenceRecord, Node, NodeId, NodeType,
    Relation,
};
use std::collections::HashMap;

/// Outgoing relationship as seen from a node
#[derive(Debug, Clone, PartialEq)]
pub struct Related {
    /// Relationship kind
    pub relation: Relation,
    /// Target node id
    pub node_id: NodeId,
    /// Target node value
    pub value: String,
    /// Edge confidence
    pub confidence: f64,
}

/// Result of [`KnowledgeGraph::upsert_node`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Upserted {
    /// Id of the stored node (new or pre-existing)
    pub id: NodeId,
    /// Whether a new node was inserted
    pub created: bool,
}

/// Typed, confidence-weighted graph of investigation artifacts
///
/// Owns three id-keyed collections (nodes, edges, inference records). Records
/// are never removed; iteration follows insertion order.
///
/// # Thread Safety
///
/// The store has no internal locking. Concurrent hosts must funnel every
/// mutation through a single owner (see the agent crate's worker).
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) node_index: HashMap<NodeId, usize>,
    natural_keys: HashMap<(NodeType, String), NodeId>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) edge_index: HashMap<EdgeId, usize>,
    pub(crate) inferences: Vec<InferenceRecord>,
    pub(crate) inference_index: HashMap<InferenceId, usize>,
}

impl KnowledgeGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    // ---------- nodes ----------

    /// Insert a node
    ///
    /// The first node stored under a natural key becomes the canonical one for
    /// [`find_by_key`](Self::find_by_key) lookups.
    pub fn add_node(&mut self, node: Node) -> Result<NodeId, StoreError> {
        if self.node_index.contains_key(&node.id) {
            return Err(StoreError::DuplicateId(node.id.to_string()));
        }

        let id = node.id;
        self.natural_keys
            .entry((node.node_type, node.value.clone()))
            .or_insert(id);
        tracing::debug!(node = %id, node_type = %node.node_type, value = %node.value, "node added");

        self.node_index.insert(id, self.nodes.len());
        self.nodes.push(node);
        Ok(id)
    }

    /// Insert a node unless its natural key is already present
    ///
    /// On a hit the existing node keeps its id and payload; its confidence is
    /// raised to the candidate's if that is higher.
    pub fn upsert_node(&mut self, node: Node) -> Result<Upserted, StoreError> {
        let existing = self
            .natural_keys
            .get(&(node.node_type, node.value.clone()))
            .copied();

        match existing {
            Some(id) => {
                self.update_node_confidence(id, node.confidence())?;
                Ok(Upserted { id, created: false })
            }
            None => Ok(Upserted {
                id: self.add_node(node)?,
                created: true,
            }),
        }
    }

    /// Look up a node by id
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.node_index.get(&id).map(|&i| &self.nodes[i])
    }

    /// Whether a node with this id is stored
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node_index.contains_key(&id)
    }

    /// Look up a node by natural key
    pub fn find_by_key(&self, node_type: NodeType, value: &str) -> Option<&Node> {
        self.natural_keys
            .get(&(node_type, value.to_string()))
            .and_then(|id| self.get_node(*id))
    }

    /// Monotonically raise a node's confidence
    pub fn update_node_confidence(&mut self, id: NodeId, proposed: f64) -> Result<(), StoreError> {
        let index = *self
            .node_index
            .get(&id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.nodes[index].update_confidence(proposed)?;
        Ok(())
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ---------- edges ----------

    /// Insert an edge
    ///
    /// Both endpoints must already be stored; the store never creates nodes on
    /// an edge's behalf.
    pub fn add_edge(&mut self, edge: Edge) -> Result<EdgeId, StoreError> {
        if self.edge_index.contains_key(&edge.id) {
            return Err(StoreError::DuplicateId(edge.id.to_string()));
        }
        for endpoint in [edge.from_node, edge.to_node] {
            if !self.contains_node(endpoint) {
                return Err(StoreError::MissingNode(endpoint));
            }
        }

        let id = edge.id;
        tracing::debug!(
            edge = %id,
            from = %edge.from_node,
            to = %edge.to_node,
            relation = %edge.relation,
            confidence = edge.confidence,
            "edge added"
        );

        self.edge_index.insert(id, self.edges.len());
        self.edges.push(edge);
        Ok(id)
    }

    /// Look up an edge by id
    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edge_index.get(&id).map(|&i| &self.edges[i])
    }

    /// Overwrite an edge's confidence
    ///
    /// Used by batch analytics; the value must be a probability.
    pub fn set_edge_confidence(&mut self, id: EdgeId, confidence: f64) -> Result<(), StoreError> {
        let confidence = validate_confidence(confidence)?;
        let index = *self
            .edge_index
            .get(&id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.edges[index].confidence = confidence;
        Ok(())
    }

    /// All edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges leaving `node`
    pub fn edges_from(&self, node: NodeId) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.from_node == node).collect()
    }

    /// Edges arriving at `node`
    pub fn edges_to(&self, node: NodeId) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.to_node == node).collect()
    }

    /// Outgoing relationships of `node`, with target values resolved
    pub fn find_related(&self, node: NodeId) -> Vec<Related> {
        self.edges_from(node)
            .into_iter()
            .filter_map(|edge| {
                self.get_node(edge.to_node).map(|target| Related {
                    relation: edge.relation,
                    node_id: target.id,
                    value: target.value.clone(),
                    confidence: edge.confidence,
                })
            })
            .collect()
    }

    // ---------- inferences ----------

    /// Record an inference
    pub fn add_inference(&mut self, record: InferenceRecord) -> Result<InferenceId, StoreError> {
        if self.inference_index.contains_key(&record.id) {
            return Err(StoreError::DuplicateId(record.id.to_string()));
        }

        let id = record.id;
        tracing::debug!(inference = %id, status = ?record.status, hypothesis = %record.hypothesis, "inference recorded");

        self.inference_index.insert(id, self.inferences.len());
        self.inferences.push(record);
        Ok(id)
    }

    /// Look up an inference by id
    pub fn get_inference(&self, id: InferenceId) -> Option<&InferenceRecord> {
        self.inference_index.get(&id).map(|&i| &self.inferences[i])
    }

    /// All inference records in insertion order
    pub fn inferences(&self) -> impl Iterator<Item = &InferenceRecord> {
        self.inferences.iter()
    }

    /// Number of inference records
    pub fn inference_count(&self) -> usize {
        self.inferences.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(node_type: NodeType, value: &str, confidence: f64) -> Node {
        Node::new(node_type, value, "heuristic", confidence).unwrap()
    }

    #[test]
    fn test_add_and_get_node() {
        let mut graph = KnowledgeGraph::new();
        let n = node(NodeType::Domain, "example.com", 0.7);
        let id = graph.add_node(n.clone()).unwrap();

        assert_eq!(graph.get_node(id), Some(&n));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_duplicate_node_id_rejected() {
        let mut graph = KnowledgeGraph::new();
        let n = node(NodeType::Domain, "example.com", 0.7);
        graph.add_node(n.clone()).unwrap();

        assert!(matches!(graph.add_node(n), Err(StoreError::DuplicateId(_))));
    }

    #[test]
    fn test_upsert_reuses_natural_key() {
        let mut graph = KnowledgeGraph::new();
        let first = graph.upsert_node(node(NodeType::Ip, "203.0.113.7", 0.3)).unwrap();
        let second = graph.upsert_node(node(NodeType::Ip, "203.0.113.7", 0.6)).unwrap();
        let lower = graph.upsert_node(node(NodeType::Ip, "203.0.113.7", 0.1)).unwrap();

        assert!(first.created);
        assert!(!second.created && !lower.created);
        assert_eq!(first.id, second.id);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.get_node(first.id).unwrap().confidence(), 0.6);
    }

    #[test]
    fn test_natural_key_includes_type() {
        let mut graph = KnowledgeGraph::new();
        graph.upsert_node(node(NodeType::Username, "acme", 0.5)).unwrap();
        graph.upsert_node(node(NodeType::Domain, "acme", 0.5)).unwrap();

        assert_eq!(graph.node_count(), 2);
        assert!(graph.find_by_key(NodeType::Domain, "acme").is_some());
        assert!(graph.find_by_key(NodeType::Ip, "acme").is_none());
    }

    #[test]
    fn test_edge_requires_existing_endpoints() {
        let mut graph = KnowledgeGraph::new();
        let a = graph.add_node(node(NodeType::Domain, "example.com", 0.7)).unwrap();
        let ghost = NodeId::new();

        let edge = Edge::new(a, ghost, Relation::HostedOn, 0.4, "DNS", "dns_lookup").unwrap();
        match graph.add_edge(edge) {
            Err(StoreError::MissingNode(id)) => assert_eq!(id, ghost),
            other => panic!("expected MissingNode, got {:?}", other),
        }
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_parallel_edges_are_kept() {
        let mut graph = KnowledgeGraph::new();
        let a = graph.add_node(node(NodeType::Domain, "example.com", 0.7)).unwrap();
        let b = graph.add_node(node(NodeType::Ip, "203.0.113.7", 0.7)).unwrap();

        for method in ["dns_lookup", "passive_dns"] {
            graph
                .add_edge(Edge::new(a, b, Relation::HostedOn, 0.4, "resolution", method).unwrap())
                .unwrap();
        }

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edges_from(a).len(), 2);
        assert_eq!(graph.edges_to(b).len(), 2);
        assert!(graph.edges_to(a).is_empty());
    }

    #[test]
    fn test_find_related() {
        let mut graph = KnowledgeGraph::new();
        let a = graph.add_node(node(NodeType::Domain, "example.com", 0.7)).unwrap();
        let b = graph.add_node(node(NodeType::Ip, "203.0.113.7", 0.7)).unwrap();
        graph
            .add_edge(Edge::new(a, b, Relation::HostedOn, 0.4, "DNS", "dns_lookup").unwrap())
            .unwrap();

        let related = graph.find_related(a);
        assert_eq!(
            related,
            vec![Related {
                relation: Relation::HostedOn,
                node_id: b,
                value: "203.0.113.7".to_string(),
                confidence: 0.4,
            }]
        );
        assert!(graph.find_related(b).is_empty());
    }

    #[test]
    fn test_set_edge_confidence_validates() {
        let mut graph = KnowledgeGraph::new();
        let a = graph.add_node(node(NodeType::Domain, "example.com", 0.7)).unwrap();
        let b = graph.add_node(node(NodeType::Ip, "203.0.113.7", 0.7)).unwrap();
        let e = graph
            .add_edge(Edge::new(a, b, Relation::HostedOn, 0.4, "DNS", "dns_lookup").unwrap())
            .unwrap();

        graph.set_edge_confidence(e, 0.55).unwrap();
        assert_eq!(graph.get_edge(e).unwrap().confidence, 0.55);
        assert!(matches!(graph.set_edge_confidence(e, 1.5), Err(StoreError::Domain(_))));
        assert!(matches!(
            graph.set_edge_confidence(EdgeId::new(), 0.5),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_iteration_follows_insertion_order() {
        let mut graph = KnowledgeGraph::new();
        let values = ["c.example", "a.example", "b.example"];
        for v in values {
            graph.add_node(node(NodeType::Domain, v, 0.5)).unwrap();
        }

        let seen: Vec<&str> = graph.nodes().map(|n| n.value.as_str()).collect();
        assert_eq!(seen, values);
    }

    #[test]
    fn test_inferences() {
        let mut graph = KnowledgeGraph::new();
        let record = InferenceRecord::new("h", vec![], vec![], "r", 0.7).unwrap();
        let id = graph.add_inference(record.clone()).unwrap();

        assert_eq!(graph.get_inference(id), Some(&record));
        assert_eq!(graph.inference_count(), 1);
        assert!(graph.add_inference(record).is_err());
    }
}
