//! Snapshot export/import and graph statistics

use crate::{KnowledgeGraph, StoreError};
use argus_domain::{validate_confidence, Edge, InferenceRecord, Node, NodeId, NodeType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

/// Serializable copy of a whole graph
///
/// This is the interchange format for export, visualization and durable
/// storage. Records appear in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// All nodes
    pub nodes: Vec<Node>,
    /// All edges
    pub edges: Vec<Edge>,
    /// All inference records
    #[serde(default)]
    pub inferences: Vec<InferenceRecord>,
}

/// What an import changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Nodes inserted
    pub nodes_added: usize,
    /// Nodes already present (confidence merged)
    pub nodes_updated: usize,
    /// Nodes folded into a local node with the same natural key
    pub nodes_merged: usize,
    /// Edges inserted
    pub edges_added: usize,
    /// Edges already present (confidence merged)
    pub edges_updated: usize,
    /// Inference records inserted
    pub inferences_added: usize,
}

/// Summary counts of a graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStatistics {
    /// Number of nodes
    pub node_count: usize,
    /// Number of edges
    pub edge_count: usize,
    /// Number of inference records
    pub inference_count: usize,
    /// Nodes per type
    pub nodes_by_type: BTreeMap<NodeType, usize>,
    /// Directed density `E / (N·(N−1))`, 0 below two nodes
    pub density: f64,
}

impl KnowledgeGraph {
    /// Copy the graph into a snapshot
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            inferences: self.inferences.clone(),
        }
    }

    /// Build a graph from a snapshot
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Result<Self, StoreError> {
        let mut graph = Self::new();
        graph.import(snapshot)?;
        Ok(graph)
    }

    /// Upsert a snapshot into this graph, by id
    ///
    /// Importing the same snapshot twice changes nothing the second time.
    /// Existing nodes and edges keep the higher of the two confidences. An
    /// incoming node whose id is unknown but whose natural key is already
    /// stored is folded into the stored node, and the snapshot's edges and
    /// inferences are rewritten to point at it. The snapshot is validated
    /// before anything is applied, so a rejected import leaves the graph
    /// untouched.
    pub fn import(&mut self, snapshot: GraphSnapshot) -> Result<ImportReport, StoreError> {
        self.validate_snapshot(&snapshot)?;

        let mut report = ImportReport::default();
        let mut remap: HashMap<NodeId, NodeId> = HashMap::new();

        for node in snapshot.nodes {
            let target = if self.contains_node(node.id) {
                report.nodes_updated += 1;
                node.id
            } else if let Some(local) = self.find_by_key(node.node_type, &node.value).map(|n| n.id) {
                tracing::debug!(incoming = %node.id, local = %local, "node folded by natural key");
                remap.insert(node.id, local);
                report.nodes_merged += 1;
                local
            } else {
                self.add_node(node)?;
                report.nodes_added += 1;
                continue;
            };

            let current = self.get_node(target).map_or(0.0, Node::confidence);
            if node.confidence() > current {
                self.update_node_confidence(target, node.confidence())?;
            }
        }

        let resolve = |id: NodeId| remap.get(&id).copied().unwrap_or(id);

        for mut edge in snapshot.edges {
            match self.edge_index.get(&edge.id).copied() {
                Some(index) => {
                    let stored = &mut self.edges[index];
                    stored.confidence = stored.confidence.max(edge.confidence);
                    report.edges_updated += 1;
                }
                None => {
                    edge.from_node = resolve(edge.from_node);
                    edge.to_node = resolve(edge.to_node);
                    self.add_edge(edge)?;
                    report.edges_added += 1;
                }
            }
        }

        for mut record in snapshot.inferences {
            if !self.inference_index.contains_key(&record.id) {
                for id in record.nodes_involved.iter_mut() {
                    *id = resolve(*id);
                }
                self.add_inference(record)?;
                report.inferences_added += 1;
            }
        }

        tracing::info!(?report, "snapshot imported");
        Ok(report)
    }

    fn validate_snapshot(&self, snapshot: &GraphSnapshot) -> Result<(), StoreError> {
        let incoming: HashSet<NodeId> = snapshot.nodes.iter().map(|n| n.id).collect();

        for node in &snapshot.nodes {
            validate_confidence(node.confidence())?;
        }
        for edge in &snapshot.edges {
            validate_confidence(edge.confidence)?;
            for endpoint in [edge.from_node, edge.to_node] {
                if !incoming.contains(&endpoint) && !self.contains_node(endpoint) {
                    return Err(StoreError::MissingNode(endpoint));
                }
            }
        }
        for record in &snapshot.inferences {
            validate_confidence(record.confidence)?;
        }
        Ok(())
    }

    /// Serialize the graph as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    /// Build a graph from JSON produced by [`to_json`](Self::to_json)
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Self::from_snapshot(serde_json::from_str(json)?)
    }

    /// Write the graph to a JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), StoreError> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        tracing::debug!(path = %path.as_ref().display(), "graph saved");
        Ok(())
    }

    /// Read a graph from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Summary counts
    pub fn statistics(&self) -> GraphStatistics {
        let mut nodes_by_type = BTreeMap::new();
        for node in &self.nodes {
            *nodes_by_type.entry(node.node_type).or_insert(0) += 1;
        }

        let n = self.nodes.len();
        let density = if n < 2 {
            0.0
        } else {
            self.edges.len() as f64 / (n * (n - 1)) as f64
        };

        GraphStatistics {
            node_count: n,
            edge_count: self.edges.len(),
            inference_count: self.inferences.len(),
            nodes_by_type,
            density,
        }
    }
}
