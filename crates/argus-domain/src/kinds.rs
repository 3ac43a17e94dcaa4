//! Closed tag sets: node types, relations and primitives

use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of an investigative artifact
///
/// New artifact kinds are added as variants; primitive selection matches
/// exhaustively, so the compiler points at every place that must learn
/// about them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// Uploaded or discovered image (value is a path or URL)
    Image,
    /// Content fingerprint of an image
    ImageHash,
    /// Biometric face signature (value references the vector)
    FaceEmbedding,
    /// Account handle
    Username,
    /// DNS domain
    Domain,
    /// IP address
    Ip,
    /// Autonomous system number
    Asn,
    /// Hosting company
    HostingProvider,
    /// Online platform (e.g. a social network)
    Platform,
    /// Profile page on a platform
    ProfileUrl,
    /// Audio fingerprint
    AudioSignature,
    /// Group of related video frames
    VideoFrameCluster,
}

impl NodeType {
    /// Every node type, in declaration order
    pub const ALL: [NodeType; 12] = [
        NodeType::Image,
        NodeType::ImageHash,
        NodeType::FaceEmbedding,
        NodeType::Username,
        NodeType::Domain,
        NodeType::Ip,
        NodeType::Asn,
        NodeType::HostingProvider,
        NodeType::Platform,
        NodeType::ProfileUrl,
        NodeType::AudioSignature,
        NodeType::VideoFrameCluster,
    ];

    /// Tag string
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Image => "image",
            NodeType::ImageHash => "image_hash",
            NodeType::FaceEmbedding => "face_embedding",
            NodeType::Username => "username",
            NodeType::Domain => "domain",
            NodeType::Ip => "ip",
            NodeType::Asn => "asn",
            NodeType::HostingProvider => "hosting_provider",
            NodeType::Platform => "platform",
            NodeType::ProfileUrl => "profile_url",
            NodeType::AudioSignature => "audio_signature",
            NodeType::VideoFrameCluster => "video_frame_cluster",
        }
    }
}

/// Kind of relationship carried by an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// Target was extracted or computed from the source
    DerivedFrom,
    /// Source and target probably denote the same entity
    LikelySameAs,
    /// Source and target were observed together
    CoOccursWith,
    /// Source is served from the target
    HostedOn,
    /// Source is listed by the target
    IndexedBy,
    /// Source makes use of target infrastructure
    UsesInfrastructure,
}

impl Relation {
    /// Tag string
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::DerivedFrom => "derived_from",
            Relation::LikelySameAs => "likely_same_as",
            Relation::CoOccursWith => "co_occurs_with",
            Relation::HostedOn => "hosted_on",
            Relation::IndexedBy => "indexed_by",
            Relation::UsesInfrastructure => "uses_infrastructure",
        }
    }
}

/// Investigative action that can be dispatched against a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    /// Fingerprint an artifact and extract biometric signatures
    ImageFingerprint,
    /// Analyse a single face signature
    FaceAnalysis,
    /// Expand a username into platform identities
    IdentityOsint,
    /// Resolve domains and IPs into hosting infrastructure
    InfrastructureOsint,
}

impl Primitive {
    /// Tag string
    pub fn as_str(&self) -> &'static str {
        match self {
            Primitive::ImageFingerprint => "image_fingerprint",
            Primitive::FaceAnalysis => "face_analysis",
            Primitive::IdentityOsint => "identity_osint",
            Primitive::InfrastructureOsint => "infrastructure_osint",
        }
    }

    /// Primitive suited to a node type, if any
    pub fn for_node_type(node_type: NodeType) -> Option<Self> {
        match node_type {
            NodeType::Image => Some(Primitive::ImageFingerprint),
            NodeType::FaceEmbedding => Some(Primitive::FaceAnalysis),
            NodeType::Username => Some(Primitive::IdentityOsint),
            NodeType::Domain | NodeType::Ip => Some(Primitive::InfrastructureOsint),
            NodeType::ImageHash
            | NodeType::Asn
            | NodeType::HostingProvider
            | NodeType::Platform
            | NodeType::ProfileUrl
            | NodeType::AudioSignature
            | NodeType::VideoFrameCluster => None,
        }
    }
}

macro_rules! impl_tag_traits {
    ($ty:ident, $kind:literal, [$($variant:ident),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s == $ty::$variant.as_str() {
                        return Ok($ty::$variant);
                    }
                )+
                Err(DomainError::UnknownTag {
                    kind: $kind,
                    tag: s.to_string(),
                })
            }
        }
    };
}

impl_tag_traits!(NodeType, "node type", [
    Image, ImageHash, FaceEmbedding, Username, Domain, Ip, Asn,
    HostingProvider, Platform, ProfileUrl, AudioSignature, VideoFrameCluster,
]);
impl_tag_traits!(Relation, "relation", [
    DerivedFrom, LikelySameAs, CoOccursWith, HostedOn, IndexedBy, UsesInfrastructure,
]);
impl_tag_traits!(Primitive, "primitive", [
    ImageFingerprint, FaceAnalysis, IdentityOsint, InfrastructureOsint,
]);
