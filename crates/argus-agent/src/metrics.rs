//! Metrics collection for investigation runs

use argus_domain::Primitive;
use std::collections::BTreeMap;

/// Counters collected while the decision loop runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvestigationMetrics {
    /// Cycles that selected a target
    pub cycles: usize,

    /// Expansions dispatched per primitive
    pub expansions: BTreeMap<Primitive, usize>,

    /// Expansions that added at least one node
    pub productive: usize,

    /// Expansions that added nothing
    pub unproductive: usize,

    /// Targets with no applicable primitive
    pub skipped: usize,

    /// Nodes added by expansions
    pub nodes_discovered: usize,

    /// Edges added by expansions
    pub edges_discovered: usize,

    /// Failed collaborator or store steps reported by expansions
    pub collaborator_failures: usize,
}

impl InvestigationMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cycle that selected a target
    pub fn record_cycle(&mut self) {
        self.cycles += 1;
    }

    /// Record a target without an applicable primitive
    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    /// Record one dispatched expansion
    pub fn record_expansion(
        &mut self,
        primitive: Primitive,
        nodes_added: usize,
        edges_added: usize,
        failures: usize,
    ) {
        *self.expansions.entry(primitive).or_insert(0) += 1;
        if nodes_added > 0 {
            self.productive += 1;
        } else {
            self.unproductive += 1;
        }
        self.nodes_discovered += nodes_added;
        self.edges_discovered += edges_added;
        self.collaborator_failures += failures;
    }

    /// Total expansions across all primitives
    pub fn total_expansions(&self) -> usize {
        self.expansions.values().sum()
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Investigation Metrics Summary".to_string(),
            "=============================".to_string(),
            format!("Cycles: {}", self.cycles),
            format!(
                "Expansions: {} ({} productive, {} unproductive)",
                self.total_expansions(),
                self.productive,
                self.unproductive
            ),
            format!("Skipped targets: {}", self.skipped),
            format!("Discovered: {} nodes, {} edges", self.nodes_discovered, self.edges_discovered),
            format!("Collaborator failures: {}", self.collaborator_failures),
        ];

        if !self.expansions.is_empty() {
            lines.push(String::new());
            lines.push("Expansions by primitive:".to_string());
            for (primitive, count) in &self.expansions {
                lines.push(format!("  {}: {}", primitive, count));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_expansion() {
        let mut metrics = InvestigationMetrics::new();
        metrics.record_expansion(Primitive::InfrastructureOsint, 3, 3, 0);
        metrics.record_expansion(Primitive::InfrastructureOsint, 0, 0, 1);
        metrics.record_expansion(Primitive::IdentityOsint, 2, 2, 0);

        assert_eq!(metrics.total_expansions(), 3);
        assert_eq!(metrics.productive, 2);
        assert_eq!(metrics.unproductive, 1);
        assert_eq!(metrics.nodes_discovered, 5);
        assert_eq!(metrics.collaborator_failures, 1);
    }

    #[test]
    fn test_summary() {
        let mut metrics = InvestigationMetrics::new();
        metrics.record_cycle();
        metrics.record_expansion(Primitive::IdentityOsint, 2, 4, 0);

        let summary = metrics.summary();
        assert!(summary.contains("Cycles: 1"));
        assert!(summary.contains("identity_osint: 1"));
    }

    #[test]
    fn test_reset() {
        let mut metrics = InvestigationMetrics::new();
        metrics.record_cycle();
        metrics.record_skip();
        metrics.reset();
        assert_eq!(metrics, InvestigationMetrics::default());
    }
}
