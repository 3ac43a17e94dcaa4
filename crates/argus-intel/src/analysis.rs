//! The four batch operations

use crate::IntelConfig;
use argus_domain::{EdgeId, NodeId, Relation};
use argus_store::{KnowledgeGraph, StoreError};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Outcome of a reinforcement pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Reinforcement {
    /// Relationship groups with two or more parallel edges
    pub groups: usize,
    /// Edges whose confidence was raised
    pub edges_boosted: usize,
}

/// A pair of nodes that probably denote the same entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MergeCandidate {
    /// Source node of the `likely_same_as` edge
    pub from: NodeId,
    /// Target node of the `likely_same_as` edge
    pub to: NodeId,
    /// The edge supporting the merge
    pub edge_id: EdgeId,
    /// Its confidence
    pub confidence: f64,
}

/// Boost parallel edges that corroborate the same relationship
///
/// Edges are grouped by `(from, to, relation)`. In a group of `k >= 2` edges
/// each one gains `min(boost_cap, boost_step × k)`, capped at 1.0.
pub fn reinforce_confidence(
    graph: &mut KnowledgeGraph,
    config: &IntelConfig,
) -> Result<Reinforcement, StoreError> {
    let mut groups: HashMap<(NodeId, NodeId, Relation), Vec<(EdgeId, f64)>> = HashMap::new();
    for edge in graph.edges() {
        groups
            .entry((edge.from_node, edge.to_node, edge.relation))
            .or_default()
            .push((edge.id, edge.confidence));
    }

    let mut result = Reinforcement::default();
    for members in groups.values().filter(|m| m.len() >= 2) {
        let boost = config.boost_cap.min(config.boost_step * members.len() as f64);
        result.groups += 1;

        for (edge_id, confidence) in members {
            let boosted = (confidence + boost).min(1.0);
            if boosted > *confidence {
                result.edges_boosted += 1;
            }
            graph.set_edge_confidence(*edge_id, boosted)?;
        }
    }

    tracing::debug!(groups = result.groups, boosted = result.edges_boosted, "reinforcement pass");
    Ok(result)
}

/// List `likely_same_as` edges whose confidence exceeds the merge threshold
///
/// The comparison is strict: an edge exactly at the threshold is not a
/// candidate.
pub fn detect_entity_merges(graph: &KnowledgeGraph, config: &IntelConfig) -> Vec<MergeCandidate> {
    graph
        .edges()
        .filter(|e| e.relation == Relation::LikelySameAs && e.confidence > config.merge_threshold)
        .map(|e| MergeCandidate {
            from: e.from_node,
            to: e.to_node,
            edge_id: e.id,
            confidence: e.confidence,
        })
        .collect()
}

/// Degree centrality: number of edges touching each node
///
/// Every node appears in the result, isolated ones with 0. A self-loop counts
/// once.
pub fn compute_centrality(graph: &KnowledgeGraph) -> BTreeMap<NodeId, usize> {
    let mut centrality: BTreeMap<NodeId, usize> = graph.nodes().map(|n| (n.id, 0)).collect();

    for edge in graph.edges() {
        *centrality.entry(edge.from_node).or_insert(0) += 1;
        if edge.to_node != edge.from_node {
            *centrality.entry(edge.to_node).or_insert(0) += 1;
        }
    }
    centrality
}

/// Risk per node: `min(1, confidence + centrality × weight + type bonus)`
pub fn compute_risk_scores(graph: &KnowledgeGraph, config: &IntelConfig) -> BTreeMap<NodeId, f64> {
    let centrality = compute_centrality(graph);

    graph
        .nodes()
        .map(|node| {
            let degree = centrality.get(&node.id).copied().unwrap_or(0);
            let risk = node.confidence()
                + degree as f64 * config.centrality_weight
                + config.type_bonus(node.node_type);
            (node.id, risk.min(1.0))
        })
        .collect()
}
