//! Biometric entity resolver
//!
//! Matches a new signature vector (e.g. a face embedding) against every
//! signature seen so far in the investigation, by cosine similarity.
//!
//! # Complexity and retention
//!
//! - Exact nearest neighbour, O(N) per query
//! - No eviction: the registry grows with every registered signature, which
//!   is fine for a bounded investigation but must be revisited before the
//!   resolver lives inside an always-on service

use argus_domain::NodeId;
use std::collections::BTreeMap;
use thiserror::Error;

/// Default similarity a match must exceed
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.6;

/// Errors that can occur during resolver operations
#[derive(Error, Debug, PartialEq)]
pub enum ResolverError {
    /// Vector length differs from the registry's
    #[error("Invalid signature dimension: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension of registered vectors
        expected: usize,
        /// Dimension provided
        actual: usize,
    },

    /// Zero-length vector
    #[error("Signature vector is empty")]
    EmptyVector,
}

/// Best match returned by [`EntityResolver::find_match`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedMatch {
    /// Node owning the matched signature
    pub node_id: NodeId,
    /// Cosine similarity with the query
    pub similarity: f64,
}

/// Registry of signature vectors keyed by node id
///
/// The first registered vector fixes the dimension of the registry.
///
/// # Examples
///
/// ```
/// use argus_domain::NodeId;
/// use argus_store::EntityResolver;
///
/// let mut resolver = EntityResolver::default();
/// let known = NodeId::new();
/// resolver.register(known, vec![1.0, 0.0, 0.0])?;
///
/// let hit = resolver.find_match(&[0.9, 0.1, 0.0])?.unwrap();
/// assert_eq!(hit.node_id, known);
/// # Ok::<(), argus_store::ResolverError>(())
/// ```
#[derive(Debug, Clone)]
pub struct EntityResolver {
    threshold: f64,
    dimension: Option<usize>,
    signatures: BTreeMap<NodeId, Vec<f32>>,
}

impl Default for EntityResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MATCH_THRESHOLD)
    }
}

impl EntityResolver {
    /// Create an empty resolver with the given match threshold
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            dimension: None,
            signatures: BTreeMap::new(),
        }
    }

    /// Similarity a match must strictly exceed
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Register (or replace) the signature of a node
    pub fn register(&mut self, node_id: NodeId, signature: Vec<f32>) -> Result<(), ResolverError> {
        self.check_dimension(&signature)?;
        self.dimension = Some(signature.len());
        self.signatures.insert(node_id, signature);
        Ok(())
    }

    /// Best match above the resolver's threshold
    pub fn find_match(&self, signature: &[f32]) -> Result<Option<ResolvedMatch>, ResolverError> {
        self.find_match_above(signature, self.threshold)
    }

    /// Best match whose similarity is strictly greater than `threshold`
    ///
    /// An empty registry is not an error; it simply has no match.
    pub fn find_match_above(
        &self,
        signature: &[f32],
        threshold: f64,
    ) -> Result<Option<ResolvedMatch>, ResolverError> {
        if self.signatures.is_empty() {
            return Ok(None);
        }
        self.check_dimension(signature)?;

        let mut best: Option<ResolvedMatch> = None;
        for (node_id, known) in &self.signatures {
            let similarity = cosine_similarity(signature, known);
            if best.map_or(true, |b| similarity > b.similarity) {
                best = Some(ResolvedMatch {
                    node_id: *node_id,
                    similarity,
                });
            }
        }

        Ok(best.filter(|b| b.similarity > threshold))
    }

    /// Whether a node has a registered signature
    pub fn contains(&self, node_id: NodeId) -> bool {
        self.signatures.contains_key(&node_id)
    }

    /// Number of registered signatures
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    /// Whether no signature is registered
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    fn check_dimension(&self, signature: &[f32]) -> Result<(), ResolverError> {
        if signature.is_empty() {
            return Err(ResolverError::EmptyVector);
        }
        match self.dimension {
            Some(expected) if expected != signature.len() => Err(ResolverError::DimensionMismatch {
                expected,
                actual: signature.len(),
            }),
            _ => Ok(()),
        }
    }
}

/// Cosine similarity of two equal-length vectors
///
/// Returns 0 when either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry_has_no_match() {
        let resolver = EntityResolver::default();
        assert_eq!(resolver.find_match(&[1.0, 0.0]), Ok(None));
    }

    #[test]
    fn test_best_match_wins() {
        let mut resolver = EntityResolver::default();
        let near = NodeId::new();
        let far = NodeId::new();
        resolver.register(far, vec![0.0, 1.0]).unwrap();
        resolver.register(near, vec![1.0, 0.1]).unwrap();

        let hit = resolver.find_match(&[1.0, 0.0]).unwrap().unwrap();
        assert_eq!(hit.node_id, near);
        assert!(hit.similarity > 0.99);
    }

    #[test]
    fn test_below_threshold_is_no_match() {
        let mut resolver = EntityResolver::default();
        resolver.register(NodeId::new(), vec![0.0, 1.0]).unwrap();
        assert_eq!(resolver.find_match(&[1.0, 0.0]), Ok(None));
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut resolver = EntityResolver::new(1.0);
        resolver.register(NodeId::new(), vec![1.0, 0.0]).unwrap();
        // Identical vectors have similarity exactly 1.0, which does not exceed 1.0
        assert_eq!(resolver.find_match(&[1.0, 0.0]), Ok(None));

        let query = [0.6, 0.8];
        let similarity = cosine_similarity(&query, &[1.0, 0.0]);
        assert_eq!(resolver.find_match_above(&query, similarity), Ok(None));
        assert!(resolver.find_match_above(&query, similarity - 1e-9).unwrap().is_some());
    }

    #[test]
    fn test_register_upserts() {
        let mut resolver = EntityResolver::default();
        let id = NodeId::new();
        resolver.register(id, vec![1.0, 0.0]).unwrap();
        resolver.register(id, vec![0.0, 1.0]).unwrap();

        assert_eq!(resolver.len(), 1);
        assert!(resolver.contains(id));
        assert_eq!(resolver.find_match(&[1.0, 0.0]), Ok(None));
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut resolver = EntityResolver::default();
        resolver.register(NodeId::new(), vec![1.0, 0.0, 0.0]).unwrap();

        assert_eq!(
            resolver.register(NodeId::new(), vec![1.0]),
            Err(ResolverError::DimensionMismatch { expected: 3, actual: 1 })
        );
        assert!(resolver.find_match(&[1.0, 0.0]).is_err());
        assert_eq!(resolver.register(NodeId::new(), vec![]), Err(ResolverError::EmptyVector));
    }

    #[test]
    fn test_zero_vector_similarity() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}
