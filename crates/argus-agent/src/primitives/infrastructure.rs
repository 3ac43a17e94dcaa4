//! Domain and IP infrastructure expansion

use super::{discover, Link};
use crate::{Expansion, ExpansionOutcome, InvestigationConfig};
use argus_domain::confidence::tags;
use argus_domain::traits::InfrastructureResolver;
use argus_domain::{ConfidenceModel, Node, NodeType, Primitive, Relation};
use argus_store::KnowledgeGraph;
use std::sync::Arc;

const DNS_SIGNAL: f64 = 0.85;
const REUSE_SIGNAL: f64 = 0.75;
const INFERENCE_CONFIDENCE: f64 = 0.7;
const SOURCE: &str = "infra_osint";

/// Resolves domains to hosting and IPs to co-hosted domains
///
/// The two directions feed each other (`domain → ip → domain`); the loop is
/// closed by natural-key node reuse and the agent's visited set.
pub struct InfrastructureExpansion {
    resolver: Arc<dyn InfrastructureResolver>,
    max_cohosted: usize,
    model: ConfidenceModel,
}

impl InfrastructureExpansion {
    /// Create the routine with the configured co-hosting budget
    pub fn new(resolver: Arc<dyn InfrastructureResolver>, config: &InvestigationConfig) -> Self {
        Self {
            resolver,
            max_cohosted: config.expansion.max_cohosted_domains,
            model: config.confidence.clone(),
        }
    }

    fn expand_domain(&self, node: &Node, graph: &mut KnowledgeGraph, outcome: &mut ExpansionOutcome) {
        let record = match self.resolver.resolve(&node.value) {
            Ok(record) => record,
            Err(e) => return outcome.record_failure("resolve", e),
        };

        let confidence = self.model.calculate(tags::HEURISTIC, tags::DNS_LOOKUP, DNS_SIGNAL, 1);
        let link = |relation: Relation, explanation: &'static str, method: &'static str| Link {
            relation,
            confidence,
            source: SOURCE,
            explanation,
            method,
        };

        let ip = discover(
            graph,
            outcome,
            node.id,
            (NodeType::Ip, &record.ip),
            &link(Relation::HostedOn, "DNS resolution", tags::DNS_LOOKUP),
        );
        let Some(ip) = ip else { return };

        discover(
            graph,
            outcome,
            ip,
            (NodeType::Asn, &record.asn),
            &link(Relation::CoOccursWith, "IP belongs to ASN", "asn_mapping"),
        );
        discover(
            graph,
            outcome,
            ip,
            (NodeType::HostingProvider, &record.hosting_provider),
            &link(Relation::HostedOn, "Hosting provider inference", "hosting_inference"),
        );
    }

    fn expand_ip(&self, node: &Node, graph: &mut KnowledgeGraph, outcome: &mut ExpansionOutcome) {
        let domains = match self.resolver.co_hosted_domains(&node.value) {
            Ok(domains) => domains,
            Err(e) => return outcome.record_failure("co-hosted domains", e),
        };

        let link = Link {
            relation: Relation::CoOccursWith,
            confidence: self.model.calculate(tags::HEURISTIC, tags::INFRA_REUSE, REUSE_SIGNAL, 1),
            source: SOURCE,
            explanation: "Shared infrastructure reuse",
            method: tags::INFRA_REUSE,
        };
        for domain in domains.iter().take(self.max_cohosted) {
            discover(graph, outcome, node.id, (NodeType::Domain, domain), &link);
        }
    }
}

impl Expansion for InfrastructureExpansion {
    fn primitive(&self) -> Primitive {
        Primitive::InfrastructureOsint
    }

    fn expand(&mut self, node: &Node, graph: &mut KnowledgeGraph) -> ExpansionOutcome {
        let mut outcome = ExpansionOutcome::new(node.id);

        match node.node_type {
            NodeType::Domain => self.expand_domain(node, graph, &mut outcome),
            NodeType::Ip => self.expand_ip(node, graph, &mut outcome),
            other => outcome.record_failure("dispatch", format!("{other} has no infrastructure")),
        }

        outcome.conclude(
            graph,
            format!("Infrastructure expansion for {}", node.value),
            "Agent executed infrastructure OSINT primitive",
            INFERENCE_CONFIDENCE,
        );
        outcome
    }
}
