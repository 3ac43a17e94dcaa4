//! Username expansion across platforms

use super::{discover, Link};
use crate::{Expansion, ExpansionOutcome, InvestigationConfig};
use argus_domain::confidence::tags;
use argus_domain::traits::{PlatformProber, VariantGenerator};
use argus_domain::{ConfidenceModel, Node, NodeType, Primitive, Relation};
use argus_store::KnowledgeGraph;
use std::sync::Arc;

const SIGNAL: f64 = 0.75;
const INFERENCE_CONFIDENCE: f64 = 0.65;
const SOURCE: &str = "identity_osint";

/// Probes platforms for a username and its variants
pub struct IdentityExpansion {
    generator: Arc<dyn VariantGenerator>,
    prober: Arc<dyn PlatformProber>,
    max_variants: usize,
    model: ConfidenceModel,
}

impl IdentityExpansion {
    /// Create the routine with the configured variant budget
    pub fn new(
        generator: Arc<dyn VariantGenerator>,
        prober: Arc<dyn PlatformProber>,
        config: &InvestigationConfig,
    ) -> Self {
        Self {
            generator,
            prober,
            max_variants: config.expansion.max_username_variants,
            model: config.confidence.clone(),
        }
    }
}

impl Expansion for IdentityExpansion {
    fn primitive(&self) -> Primitive {
        Primitive::IdentityOsint
    }

    fn expand(&mut self, node: &Node, graph: &mut KnowledgeGraph) -> ExpansionOutcome {
        let mut outcome = ExpansionOutcome::new(node.id);
        let hypothesis = format!("Username {} expanded into platform identities", node.value);
        let reasoning = "Agent executed identity OSINT primitive";

        let variants = match self.generator.variants(&node.value) {
            Ok(variants) => variants,
            Err(e) => {
                outcome.record_failure("variants", e);
                outcome.conclude(graph, hypothesis, reasoning, INFERENCE_CONFIDENCE);
                return outcome;
            }
        };

        let confidence = self
            .model
            .calculate(tags::HEURISTIC, tags::USERNAME_SIMILARITY, SIGNAL, 1);
        let profile_link = Link {
            relation: Relation::CoOccursWith,
            confidence,
            source: SOURCE,
            explanation: "Username linked to profile",
            method: "username_probe",
        };
        let platform_link = Link {
            relation: Relation::IndexedBy,
            confidence,
            source: SOURCE,
            explanation: "Profile hosted on platform",
            method: "platform_link",
        };

        for variant in variants.iter().take(self.max_variants) {
            let hits = match self.prober.probe(variant) {
                Ok(hits) => hits,
                Err(e) => {
                    outcome.record_failure(&format!("probe {variant}"), e);
                    continue;
                }
            };

            for hit in hits {
                let profile = discover(
                    graph,
                    &mut outcome,
                    node.id,
                    (NodeType::ProfileUrl, &hit.profile_url),
                    &profile_link,
                );
                if let Some(profile) = profile {
                    discover(
                        graph,
                        &mut outcome,
                        profile,
                        (NodeType::Platform, &hit.platform),
                        &platform_link,
                    );
                }
            }
        }

        tracing::debug!(
            username = %node.value,
            variants = variants.len().min(self.max_variants),
            created = outcome.created_nodes.len(),
            "identity expansion finished"
        );
        outcome.conclude(graph, hypothesis, reasoning, INFERENCE_CONFIDENCE);
        outcome
    }
}
