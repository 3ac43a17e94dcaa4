//! Graph intelligence configuration

use argus_domain::NodeType;

/// Constants for the batch analytics
#[derive(Debug, Clone, PartialEq)]
pub struct IntelConfig {
    /// Boost per parallel edge when corroborating
    pub boost_step: f64,

    /// Maximum total boost an edge receives per reinforcement pass
    pub boost_cap: f64,

    /// `likely_same_as` confidence a merge candidate must exceed
    pub merge_threshold: f64,

    /// Risk contributed per incident edge
    pub centrality_weight: f64,

    /// Risk bonus for identity artifacts (usernames, faces)
    pub identity_bonus: f64,

    /// Risk bonus for infrastructure artifacts (domains, IPs)
    pub infrastructure_bonus: f64,

    /// Number of nodes listed in a report's top-risk ranking
    pub top_risks: usize,
}

impl Default for IntelConfig {
    fn default() -> Self {
        Self {
            boost_step: 0.05,
            boost_cap: 0.2,
            merge_threshold: 0.7,
            centrality_weight: 0.1,
            identity_bonus: 0.3,
            infrastructure_bonus: 0.2,
            top_risks: 10,
        }
    }
}

impl IntelConfig {
    /// Stricter merging, gentler reinforcement
    pub fn conservative() -> Self {
        Self {
            boost_step: 0.025,
            boost_cap: 0.1,
            merge_threshold: 0.85,
            ..Self::default()
        }
    }

    /// Category bonus added to a node's risk
    pub fn type_bonus(&self, node_type: NodeType) -> f64 {
        match node_type {
            NodeType::Username | NodeType::FaceEmbedding => self.identity_bonus,
            NodeType::Ip | NodeType::Domain => self.infrastructure_bonus,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IntelConfig::default();
        assert_eq!(config.boost_cap, 0.2);
        assert_eq!(config.merge_threshold, 0.7);
    }

    #[test]
    fn test_conservative_config() {
        let config = IntelConfig::conservative();
        assert!(config.merge_threshold > IntelConfig::default().merge_threshold);
        assert_eq!(config.centrality_weight, 0.1);
    }

    #[test]
    fn test_type_bonus() {
        let config = IntelConfig::default();
        assert_eq!(config.type_bonus(NodeType::Username), 0.3);
        assert_eq!(config.type_bonus(NodeType::FaceEmbedding), 0.3);
        assert_eq!(config.type_bonus(NodeType::Ip), 0.2);
        assert_eq!(config.type_bonus(NodeType::Domain), 0.2);
        assert_eq!(config.type_bonus(NodeType::Platform), 0.0);
    }
}
