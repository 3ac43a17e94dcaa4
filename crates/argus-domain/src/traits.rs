//! Trait definitions for external collaborators
//!
//! These traits define the boundary between the investigation core and the
//! services that actually look things up (vision models, platform probes,
//! DNS/ASN resolution). Implementations live with the host; transport,
//! retries and timeouts are their concern. Collaborator calls are the only
//! suspension points of an expansion, so implementations should enforce their
//! own timeouts and report them as [`CollaboratorError::Timeout`].

use crate::CollaboratorError;
use serde::{Deserialize, Serialize};

/// A profile found on a platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformHit {
    /// Platform name (e.g. "github")
    pub platform: String,
    /// Profile URL on that platform
    pub profile_url: String,
}

/// Hosting facts for a domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfrastructureRecord {
    /// Resolved IP address
    pub ip: String,
    /// Autonomous system of the IP
    pub asn: String,
    /// Hosting company
    pub hosting_provider: String,
}

/// Generates plausible variants of a username
pub trait VariantGenerator: Send + Sync {
    /// Variants of `username`, possibly including `username` itself
    fn variants(&self, username: &str) -> Result<Vec<String>, CollaboratorError>;
}

/// Probes a fixed list of platforms for a username
pub trait PlatformProber: Send + Sync {
    /// Profiles found for `variant`
    fn probe(&self, variant: &str) -> Result<Vec<PlatformHit>, CollaboratorError>;
}

/// Resolves infrastructure for domains and IPs
pub trait InfrastructureResolver: Send + Sync {
    /// Hosting facts for a domain
    fn resolve(&self, domain: &str) -> Result<InfrastructureRecord, CollaboratorError>;

    /// Other domains served from the same IP
    fn co_hosted_domains(&self, ip: &str) -> Result<Vec<String>, CollaboratorError>;
}

/// Computes content fingerprints of artifacts
pub trait Fingerprinter: Send + Sync {
    /// Fingerprint string for the artifact at `artifact_ref`
    fn fingerprint(&self, artifact_ref: &str) -> Result<String, CollaboratorError>;
}

/// Extracts biometric signatures (e.g. face embeddings) from artifacts
pub trait BiometricExtractor: Send + Sync {
    /// One fixed-length vector per detected subject
    fn extract(&self, artifact_ref: &str) -> Result<Vec<Vec<f32>>, CollaboratorError>;
}
