//! Configuration for investigations
//!
//! Loads from TOML with three sections:
//!
//! ```toml
//! [agent]
//! max_cycles = 50
//! cycle_interval_ms = 0
//! default_type_priority = 0.5
//!
//! [agent.type_priority]
//! image = 0.9
//! username = 0.85
//!
//! [expansion]
//! max_username_variants = 8
//! max_cohosted_domains = 2
//! match_threshold = 0.6
//!
//! [confidence.source_reliability]
//! model_output = 0.8
//! ```
//!
//! Every field has a default, so an empty file is a valid configuration.

use argus_domain::confidence::merge_over;
use argus_domain::{validate_confidence, ConfidenceModel, NodeType};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration loading error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value is out of range or names something unknown
    #[error("Invalid configuration value: {0}")]
    Invalid(String),
}

/// Top-level investigation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestigationConfig {
    /// Decision loop settings
    pub agent: AgentSettings,
    /// Expansion primitive settings
    pub expansion: ExpansionSettings,
    /// Confidence model reliability tables
    pub confidence: ConfidenceModel,
}

/// Decision loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Cycle budget for a bulk run
    pub max_cycles: usize,

    /// Pause between worker cycles in milliseconds (0 = back to back)
    pub cycle_interval_ms: u64,

    /// Priority for node types missing from `type_priority`
    pub default_type_priority: f64,

    /// Investigative value of each node type, keyed by type tag
    ///
    /// Entries from a config file are laid over the defaults.
    #[serde(deserialize_with = "type_priority_overrides")]
    pub type_priority: HashMap<String, f64>,
}

fn default_type_priority() -> HashMap<String, f64> {
    [
        (NodeType::Image, 0.9),
        (NodeType::FaceEmbedding, 0.95),
        (NodeType::Username, 0.85),
        (NodeType::Domain, 0.8),
        (NodeType::Ip, 0.75),
        (NodeType::AudioSignature, 0.7),
        (NodeType::VideoFrameCluster, 0.7),
    ]
    .into_iter()
    .map(|(t, p)| (t.as_str().to_string(), p))
    .collect()
}

fn type_priority_overrides<'de, D: Deserializer<'de>>(d: D) -> Result<HashMap<String, f64>, D::Error> {
    merge_over(default_type_priority(), d)
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_cycles: 50,
            cycle_interval_ms: 0,
            default_type_priority: 0.5,
            type_priority: default_type_priority(),
        }
    }
}

impl AgentSettings {
    /// Priority of a node type, falling back to the default
    pub fn type_priority(&self, node_type: NodeType) -> f64 {
        self.type_priority
            .get(node_type.as_str())
            .copied()
            .unwrap_or(self.default_type_priority)
    }

    /// Pause between worker cycles
    pub fn cycle_interval(&self) -> Duration {
        Duration::from_millis(self.cycle_interval_ms)
    }
}

/// Expansion primitive settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionSettings {
    /// Username variants probed per identity expansion
    pub max_username_variants: usize,

    /// Co-hosted domains followed per IP expansion
    pub max_cohosted_domains: usize,

    /// Cosine similarity a face match must exceed
    pub match_threshold: f64,
}

impl Default for ExpansionSettings {
    fn default() -> Self {
        Self {
            max_username_variants: 8,
            max_cohosted_domains: 2,
            match_threshold: 0.6,
        }
    }
}

impl InvestigationConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: InvestigationConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let agent = &self.agent;
        probability("agent.default_type_priority", agent.default_type_priority)?;
        for (tag, priority) in &agent.type_priority {
            tag.parse::<NodeType>()
                .map_err(|e| ConfigError::Invalid(format!("agent.type_priority: {e}")))?;
            probability(&format!("agent.type_priority.{tag}"), *priority)?;
        }

        let expansion = &self.expansion;
        if !(0.0..1.0).contains(&expansion.match_threshold) {
            return Err(ConfigError::Invalid(format!(
                "expansion.match_threshold must be in [0, 1), got {}",
                expansion.match_threshold
            )));
        }
        if expansion.max_username_variants == 0 {
            return Err(ConfigError::Invalid(
                "expansion.max_username_variants must be positive".to_string(),
            ));
        }
        if expansion.max_cohosted_domains == 0 {
            return Err(ConfigError::Invalid(
                "expansion.max_cohosted_domains must be positive".to_string(),
            ));
        }

        self.confidence
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("confidence: {e}")))
    }

    /// Deep investigation: long budget, wide identity and infrastructure fan-out
    pub fn thorough() -> Self {
        Self {
            agent: AgentSettings {
                max_cycles: 200,
                ..Default::default()
            },
            expansion: ExpansionSettings {
                max_username_variants: 16,
                max_cohosted_domains: 5,
                ..Default::default()
            },
            confidence: ConfidenceModel::default(),
        }
    }

    /// Triage: a handful of cycles with narrow fan-out
    pub fn quick() -> Self {
        Self {
            agent: AgentSettings {
                max_cycles: 10,
                ..Default::default()
            },
            expansion: ExpansionSettings {
                max_username_variants: 3,
                max_cohosted_domains: 1,
                ..Default::default()
            },
            confidence: ConfidenceModel::default(),
        }
    }
}

fn probability(field: &str, value: f64) -> Result<(), ConfigError> {
    validate_confidence(value)
        .map(|_| ())
        .map_err(|_| ConfigError::Invalid(format!("{field} must be in [0, 1], got {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InvestigationConfig::default();
        assert_eq!(config.agent.max_cycles, 50);
        assert_eq!(config.agent.type_priority(NodeType::FaceEmbedding), 0.95);
        assert_eq!(config.agent.type_priority(NodeType::Asn), 0.5);
        assert_eq!(config.expansion.max_cohosted_domains, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        let thorough = InvestigationConfig::thorough();
        let quick = InvestigationConfig::quick();
        assert!(thorough.validate().is_ok());
        assert!(quick.validate().is_ok());
        assert!(thorough.agent.max_cycles > quick.agent.max_cycles);
        assert!(thorough.expansion.max_username_variants > quick.expansion.max_username_variants);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = InvestigationConfig::from_toml_str("").unwrap();
        assert_eq!(config, InvestigationConfig::default());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            [agent]
            max_cycles = 12
            cycle_interval_ms = 250

            [agent.type_priority]
            asn = 0.4

            [expansion]
            match_threshold = 0.75

            [confidence.source_reliability]
            spiderfoot = 0.65
        "#;

        let config = InvestigationConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.agent.max_cycles, 12);
        assert_eq!(config.agent.cycle_interval(), Duration::from_millis(250));
        assert_eq!(config.agent.type_priority(NodeType::Asn), 0.4);
        // Entries not named in the file keep their defaults
        assert_eq!(config.agent.type_priority(NodeType::Image), 0.9);
        assert_eq!(config.agent.type_priority(NodeType::FaceEmbedding), 0.95);
        assert_eq!(config.expansion.match_threshold, 0.75);
        assert_eq!(config.expansion.max_username_variants, 8);
        assert_eq!(config.confidence.source_reliability("spiderfoot"), 0.65);
        assert_eq!(config.confidence.source_reliability("model_output"), 0.8);
        assert_eq!(config.confidence.calculate("model_output", "face_embedding", 0.92, 2), 0.188);
    }

    #[test]
    fn test_single_override_keeps_other_entries() {
        let config = InvestigationConfig::from_toml_str("[agent.type_priority]\nasn = 0.4").unwrap();
        let defaults = AgentSettings::default();

        assert_eq!(config.agent.type_priority(NodeType::Asn), 0.4);
        for node_type in NodeType::ALL {
            if node_type != NodeType::Asn {
                assert_eq!(config.agent.type_priority(node_type), defaults.type_priority(node_type));
            }
        }
        assert_eq!(config.confidence, ConfidenceModel::default());
    }

    #[test]
    fn test_rejects_unknown_node_type() {
        let toml = r#"
            [agent.type_priority]
            fax_number = 0.9
        "#;
        assert!(matches!(
            InvestigationConfig::from_toml_str(toml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let cases = [
            "[agent]\ndefault_type_priority = 1.5",
            "[expansion]\nmatch_threshold = 1.0",
            "[expansion]\nmax_cohosted_domains = 0",
            "[confidence.method_reliability]\nface_embedding = -0.1",
        ];
        for toml in cases {
            assert!(
                matches!(InvestigationConfig::from_toml_str(toml), Err(ConfigError::Invalid(_))),
                "accepted: {toml}"
            );
        }
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            InvestigationConfig::from_toml_str("[agent\nmax_cycles = "),
            Err(ConfigError::TomlParse(_))
        ));
    }
}
