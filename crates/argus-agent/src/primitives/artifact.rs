//! Artifact fingerprinting and face matching

use super::{connect, discover, Link};
use crate::{ExpansionOutcome, Expansion, InvestigationConfig};
use argus_domain::confidence::tags;
use argus_domain::traits::{BiometricExtractor, Fingerprinter};
use argus_domain::{ConfidenceModel, Node, NodeType, Primitive, Relation};
use argus_store::{EntityResolver, KnowledgeGraph};
use std::sync::Arc;

const HASH_SIGNAL: f64 = 0.9;
const FACE_SIGNAL: f64 = 0.92;
const INFERENCE_CONFIDENCE: f64 = 0.7;

/// Fingerprints an image and matches the faces found in it
///
/// Owns the [`EntityResolver`]: every extracted face signature is registered
/// after matching, so later artifacts can match against it.
pub struct ArtifactExpansion {
    fingerprinter: Arc<dyn Fingerprinter>,
    extractor: Arc<dyn BiometricExtractor>,
    resolver: EntityResolver,
    model: ConfidenceModel,
}

impl ArtifactExpansion {
    /// Create the routine with the configured match threshold and reliability tables
    pub fn new(
        fingerprinter: Arc<dyn Fingerprinter>,
        extractor: Arc<dyn BiometricExtractor>,
        config: &InvestigationConfig,
    ) -> Self {
        Self {
            fingerprinter,
            extractor,
            resolver: EntityResolver::new(config.expansion.match_threshold),
            model: config.confidence.clone(),
        }
    }

    /// Start from an existing registry of known faces
    pub fn with_resolver(mut self, resolver: EntityResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Registry of known faces
    pub fn resolver(&self) -> &EntityResolver {
        &self.resolver
    }

    /// Mutable registry, for registering faces known before the investigation
    pub fn resolver_mut(&mut self) -> &mut EntityResolver {
        &mut self.resolver
    }
}

impl Expansion for ArtifactExpansion {
    fn primitive(&self) -> Primitive {
        Primitive::ImageFingerprint
    }

    fn expand(&mut self, node: &Node, graph: &mut KnowledgeGraph) -> ExpansionOutcome {
        let mut outcome = ExpansionOutcome::new(node.id);

        match self.fingerprinter.fingerprint(&node.value) {
            Ok(hash) => {
                let link = Link {
                    relation: Relation::DerivedFrom,
                    confidence: self.model.calculate(tags::MODEL_OUTPUT, tags::PERCEPTUAL_HASH, HASH_SIGNAL, 1),
                    source: tags::MODEL_OUTPUT,
                    explanation: "Perceptual hash generated",
                    method: tags::PERCEPTUAL_HASH,
                };
                discover(graph, &mut outcome, node.id, (NodeType::ImageHash, &hash), &link);
            }
            Err(e) => outcome.record_failure("fingerprint", e),
        }

        // Faces are independent of the hash; a failed fingerprint still gets them
        let signatures = match self.extractor.extract(&node.value) {
            Ok(signatures) => signatures,
            Err(e) => {
                outcome.record_failure("biometrics", e);
                Vec::new()
            }
        };

        let face_link = Link {
            relation: Relation::DerivedFrom,
            confidence: self.model.calculate(tags::MODEL_OUTPUT, tags::FACE_EMBEDDING, FACE_SIGNAL, 1),
            source: tags::MODEL_OUTPUT,
            explanation: "Face embedding extracted",
            method: tags::FACE_EMBEDDING,
        };

        for (index, signature) in signatures.into_iter().enumerate() {
            let value = format!("{}#face{}", node.value, index);
            let Some(face) = discover(graph, &mut outcome, node.id, (NodeType::FaceEmbedding, &value), &face_link)
            else {
                continue;
            };

            match self.resolver.find_match(&signature) {
                Ok(Some(found)) if found.node_id != face => {
                    let explanation = format!("Face similarity match {:.2}", found.similarity);
                    let link = Link {
                        relation: Relation::LikelySameAs,
                        confidence: self.model.calculate(
                            tags::MODEL_OUTPUT,
                            tags::FACE_EMBEDDING,
                            found.similarity,
                            2,
                        ),
                        source: tags::MODEL_OUTPUT,
                        explanation: &explanation,
                        method: tags::FACE_EMBEDDING,
                    };
                    if connect(graph, &mut outcome, face, found.node_id, &link).is_some() {
                        outcome.record_node(found.node_id, false);
                    }
                }
                Ok(_) => {}
                Err(e) => outcome.record_failure("face match", e),
            }

            if let Err(e) = self.resolver.register(face, signature) {
                outcome.record_failure("face registration", e);
            }
        }

        outcome.conclude(
            graph,
            format!("Artifact {} expanded into visual artifacts", node.value),
            "Agent executed image fingerprint primitive",
            INFERENCE_CONFIDENCE,
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argus_domain::{CollaboratorError, InferenceStatus};

    struct FixedHash(Result<String, CollaboratorError>);

    impl Fingerprinter for FixedHash {
        fn fingerprint(&self, _artifact_ref: &str) -> Result<String, CollaboratorError> {
            self.0.clone()
        }
    }

    struct FixedFaces(Vec<Vec<f32>>);

    impl BiometricExtractor for FixedFaces {
        fn extract(&self, _artifact_ref: &str) -> Result<Vec<Vec<f32>>, CollaboratorError> {
            Ok(self.0.clone())
        }
    }

    fn image(graph: &mut KnowledgeGraph, path: &str) -> Node {
        let node = Node::new(NodeType::Image, path, tags::USER_UPLOAD, 0.9).unwrap();
        graph.add_node(node.clone()).unwrap();
        node
    }

    #[test]
    fn test_faces_survive_fingerprint_failure() {
        let mut graph = KnowledgeGraph::new();
        let node = image(&mut graph, "/evidence/a.jpg");
        let mut routine = ArtifactExpansion::new(
            Arc::new(FixedHash(Err(CollaboratorError::service("phash", "decoder crashed")))),
            Arc::new(FixedFaces(vec![vec![1.0, 0.0]])),
            &InvestigationConfig::default(),
        );

        let outcome = routine.expand(&node, &mut graph);

        assert_eq!(outcome.created_nodes.len(), 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.status(), InferenceStatus::Accepted);
        assert!(graph.find_by_key(NodeType::FaceEmbedding, "/evidence/a.jpg#face0").is_some());
        assert_eq!(routine.resolver().len(), 1);
    }

    #[test]
    fn test_same_hash_lands_on_one_node() {
        let mut graph = KnowledgeGraph::new();
        let first = image(&mut graph, "/evidence/a.jpg");
        let second = image(&mut graph, "/evidence/a-copy.jpg");
        let mut routine = ArtifactExpansion::new(
            Arc::new(FixedHash(Ok("f0e1d2c3b4a59687".to_string()))),
            Arc::new(FixedFaces(Vec::new())),
            &InvestigationConfig::default(),
        );

        let a = routine.expand(&first, &mut graph);
        let b = routine.expand(&second, &mut graph);

        assert_eq!(a.created_nodes.len(), 1);
        assert!(b.created_nodes.is_empty());
        assert_eq!(b.touched_nodes.len(), 2);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edges_to(a.created_nodes[0]).len(), 2);
    }

    #[test]
    fn test_faces_in_one_image_match_each_other() {
        let mut graph = KnowledgeGraph::new();
        let node = image(&mut graph, "/evidence/twins.jpg");
        let mut routine = ArtifactExpansion::new(
            Arc::new(FixedHash(Ok("00ff00ff00ff00ff".to_string()))),
            Arc::new(FixedFaces(vec![vec![1.0, 0.0], vec![1.0, 0.0]])),
            &InvestigationConfig::default(),
        );

        let outcome = routine.expand(&node, &mut graph);

        let matches: Vec<_> = graph
            .edges()
            .filter(|e| e.relation == Relation::LikelySameAs)
            .collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].from_node, outcome.created_nodes[2]);
        assert_eq!(matches[0].to_node, outcome.created_nodes[1]);
    }
}
