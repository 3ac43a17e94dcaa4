//! One-shot analytics pass over a graph

use crate::analysis::{
    compute_centrality, compute_risk_scores, detect_entity_merges, reinforce_confidence,
    MergeCandidate, Reinforcement,
};
use crate::{IntelConfig, IntelError};
use argus_domain::NodeId;
use argus_store::KnowledgeGraph;
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything one analytics pass found
#[derive(Debug, Clone, Default, Serialize)]
pub struct IntelReport {
    /// Reinforcement outcome
    pub reinforcement: Reinforcement,
    /// Merge candidates for manual review
    pub merge_candidates: Vec<MergeCandidate>,
    /// Degree centrality per node
    pub centrality: BTreeMap<NodeId, usize>,
    /// Risk score per node
    pub risk_scores: BTreeMap<NodeId, f64>,
    /// Highest-risk nodes, descending
    pub top_risks: Vec<(NodeId, f64)>,
}

impl IntelReport {
    /// Human-readable summary
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Graph Intelligence Summary".to_string(),
            "==========================".to_string(),
            format!(
                "Reinforced: {} edges in {} groups",
                self.reinforcement.edges_boosted, self.reinforcement.groups
            ),
            format!("Merge candidates: {}", self.merge_candidates.len()),
            format!("Scored nodes: {}", self.risk_scores.len()),
        ];

        if !self.top_risks.is_empty() {
            lines.push(String::new());
            lines.push("Top risks:".to_string());
            for (node, risk) in &self.top_risks {
                lines.push(format!("  {}: {:.2}", node, risk));
            }
        }

        lines.join("\n")
    }
}

/// Runs all graph analytics in order
///
/// Reinforcement runs first, so merge detection and risk scoring see the
/// corroborated confidences.
#[derive(Debug, Clone, Default)]
pub struct Analyst {
    config: IntelConfig,
}

impl Analyst {
    /// Create an analyst with the given configuration
    pub fn new(config: IntelConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &IntelConfig {
        &self.config
    }

    /// Reinforce, then read everything else off the graph
    pub fn analyze(&self, graph: &mut KnowledgeGraph) -> Result<IntelReport, IntelError> {
        let reinforcement = reinforce_confidence(graph, &self.config)?;
        let merge_candidates = detect_entity_merges(graph, &self.config);
        let centrality = compute_centrality(graph);
        let risk_scores = compute_risk_scores(graph, &self.config);

        let mut top_risks: Vec<(NodeId, f64)> =
            risk_scores.iter().map(|(id, risk)| (*id, *risk)).collect();
        top_risks.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        top_risks.truncate(self.config.top_risks);

        tracing::info!(
            boosted = reinforcement.edges_boosted,
            merges = merge_candidates.len(),
            nodes = risk_scores.len(),
            "analysis complete"
        );

        Ok(IntelReport {
            reinforcement,
            merge_candidates,
            centrality,
            risk_scores,
            top_risks,
        })
    }
}
