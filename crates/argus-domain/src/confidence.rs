//! Confidence model
//!
//! Prices edges and nodes with a deterministic formula:
//!
//! ```text
//! source_reliability[source] × method_reliability[method]
//!     × signal_strength × min(1, supporting_edges × 0.15)
//! ```
//!
//! rounded to three decimal places. Unknown sources and methods fall back to
//! [`UNKNOWN_RELIABILITY`]. The computation is pure; it never touches a graph.

use crate::{validate_confidence, DomainError};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Reliability assumed for sources and methods missing from the tables
pub const UNKNOWN_RELIABILITY: f64 = 0.5;

/// Correlation support contributed by each supporting edge
pub const CORRELATION_STEP: f64 = 0.15;

/// Well-known source and method tags
pub mod tags {
    /// Artifact supplied by the analyst
    pub const USER_UPLOAD: &str = "user_upload";
    /// Output of an ML model
    pub const MODEL_OUTPUT: &str = "model_output";
    /// Rule of thumb or lookup heuristic
    pub const HEURISTIC: &str = "heuristic";
    /// Found by a discovery module
    pub const DISCOVERY_MODULE: &str = "discovery_module";
    /// SpiderFoot scan result
    pub const SPIDERFOOT: &str = "spiderfoot";
    /// Generic third-party API
    pub const EXTERNAL_API: &str = "external_api";

    /// Face embedding comparison
    pub const FACE_EMBEDDING: &str = "face_embedding";
    /// Perceptual image hash
    pub const PERCEPTUAL_HASH: &str = "perceptual_hash";
    /// Username similarity heuristic
    pub const USERNAME_SIMILARITY: &str = "username_similarity";
    /// Temporal co-occurrence
    pub const TIME_CORRELATION: &str = "time_correlation";
    /// DNS resolution
    pub const DNS_LOOKUP: &str = "dns_lookup";
    /// Shared hosting discovery
    pub const INFRA_REUSE: &str = "infra_reuse";
}

/// Reliability tables for the confidence formula
///
/// Deserializes from the `[confidence]` section of an investigation config.
/// Entries given there are laid over the default tables below; tags that are
/// not mentioned keep their default reliability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceModel {
    /// Trust in each provenance source
    #[serde(deserialize_with = "source_overrides")]
    pub source_reliability: HashMap<String, f64>,

    /// Trust in each detection method
    #[serde(deserialize_with = "method_overrides")]
    pub method_reliability: HashMap<String, f64>,
}

fn default_source_reliability() -> HashMap<String, f64> {
    table(&[
        (tags::MODEL_OUTPUT, 0.8),
        (tags::SPIDERFOOT, 0.6),
        (tags::EXTERNAL_API, 0.7),
        (tags::HEURISTIC, 0.5),
    ])
}

fn default_method_reliability() -> HashMap<String, f64> {
    table(&[
        (tags::FACE_EMBEDDING, 0.85),
        (tags::PERCEPTUAL_HASH, 0.75),
        (tags::USERNAME_SIMILARITY, 0.6),
        (tags::TIME_CORRELATION, 0.55),
    ])
}

fn table(entries: &[(&str, f64)]) -> HashMap<String, f64> {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// Lay deserialized entries over a default table
pub fn merge_over<'de, D>(
    defaults: HashMap<String, f64>,
    deserializer: D,
) -> Result<HashMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut merged = defaults;
    merged.extend(HashMap::<String, f64>::deserialize(deserializer)?);
    Ok(merged)
}

fn source_overrides<'de, D: Deserializer<'de>>(d: D) -> Result<HashMap<String, f64>, D::Error> {
    merge_over(default_source_reliability(), d)
}

fn method_overrides<'de, D: Deserializer<'de>>(d: D) -> Result<HashMap<String, f64>, D::Error> {
    merge_over(default_method_reliability(), d)
}

impl Default for ConfidenceModel {
    fn default() -> Self {
        Self {
            source_reliability: default_source_reliability(),
            method_reliability: default_method_reliability(),
        }
    }
}

impl ConfidenceModel {
    /// Reliability of a source tag
    pub fn source_reliability(&self, source: &str) -> f64 {
        self.source_reliability
            .get(source)
            .copied()
            .unwrap_or(UNKNOWN_RELIABILITY)
    }

    /// Reliability of a method tag
    pub fn method_reliability(&self, method: &str) -> f64 {
        self.method_reliability
            .get(method)
            .copied()
            .unwrap_or(UNKNOWN_RELIABILITY)
    }

    /// Compute a confidence score
    ///
    /// `supporting_edges` counts independent pieces of evidence for the same
    /// relationship; cross-referenced matches pass 2.
    ///
    /// # Examples
    ///
    /// ```
    /// use argus_domain::ConfidenceModel;
    ///
    /// let model = ConfidenceModel::default();
    /// let score = model.calculate("model_output", "face_embedding", 0.92, 2);
    /// assert_eq!(score, 0.188);
    /// ```
    pub fn calculate(
        &self,
        source: &str,
        method: &str,
        signal_strength: f64,
        supporting_edges: u32,
    ) -> f64 {
        let correlation_support = (supporting_edges as f64 * CORRELATION_STEP).min(1.0);
        let raw = self.source_reliability(source)
            * self.method_reliability(method)
            * signal_strength
            * correlation_support;
        round3(raw)
    }

    /// Check every table entry is a probability
    pub fn validate(&self) -> Result<(), DomainError> {
        for value in self
            .source_reliability
            .values()
            .chain(self.method_reliability.values())
        {
            validate_confidence(*value)?;
        }
        Ok(())
    }
}

/// [`ConfidenceModel::calculate`] against the default tables
pub fn calculate_confidence(
    source: &str,
    method: &str,
    signal_strength: f64,
    supporting_edges: u32,
) -> f64 {
    static DEFAULT_MODEL: OnceLock<ConfidenceModel> = OnceLock::new();
    DEFAULT_MODEL
        .get_or_init(ConfidenceModel::default)
        .calculate(source, method, signal_strength, supporting_edges)
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: probabilities in, probability out
        #[test]
        fn test_result_in_unit_interval(signal in 0.0f64..=1.0, support in 0u32..50) {
            let score = calculate_confidence("model_output", "face_embedding", signal, support);
            prop_assert!((0.0..=1.0).contains(&score));
        }

        /// Property: more supporting edges never lowers the score
        #[test]
        fn test_support_is_monotonic(signal in 0.0f64..=1.0, support in 0u32..50) {
            let fewer = calculate_confidence("heuristic", "dns_lookup", signal, support);
            let more = calculate_confidence("heuristic", "dns_lookup", signal, support + 1);
            prop_assert!(more >= fewer);
        }
    }
}
