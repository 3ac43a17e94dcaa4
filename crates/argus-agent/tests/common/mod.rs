//! Scripted collaborators for deterministic investigations

#![allow(dead_code)]

use argus_domain::traits::{
    BiometricExtractor, Fingerprinter, InfrastructureRecord, InfrastructureResolver,
    PlatformHit, PlatformProber, VariantGenerator,
};
use argus_domain::CollaboratorError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Install a test-writer subscriber once; `RUST_LOG` controls verbosity
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
pub struct ScriptedFingerprinter {
    pub hashes: HashMap<String, String>,
}

impl ScriptedFingerprinter {
    pub fn with(mut self, artifact: &str, hash: &str) -> Self {
        self.hashes.insert(artifact.to_string(), hash.to_string());
        self
    }
}

impl Fingerprinter for ScriptedFingerprinter {
    fn fingerprint(&self, artifact_ref: &str) -> Result<String, CollaboratorError> {
        self.hashes
            .get(artifact_ref)
            .cloned()
            .ok_or_else(|| CollaboratorError::InvalidResponse(format!("unreadable image {artifact_ref}")))
    }
}

#[derive(Default)]
pub struct ScriptedBiometrics {
    pub faces: HashMap<String, Vec<Vec<f32>>>,
}

impl ScriptedBiometrics {
    pub fn with(mut self, artifact: &str, faces: Vec<Vec<f32>>) -> Self {
        self.faces.insert(artifact.to_string(), faces);
        self
    }
}

impl BiometricExtractor for ScriptedBiometrics {
    fn extract(&self, artifact_ref: &str) -> Result<Vec<Vec<f32>>, CollaboratorError> {
        Ok(self.faces.get(artifact_ref).cloned().unwrap_or_default())
    }
}

/// `name`, `name_`, `name_osint`
pub struct SuffixVariants;

impl VariantGenerator for SuffixVariants {
    fn variants(&self, username: &str) -> Result<Vec<String>, CollaboratorError> {
        Ok(vec![
            username.to_string(),
            format!("{username}_"),
            format!("{username}_osint"),
        ])
    }
}

/// Answers from a fixed table; variants in `down` time out
#[derive(Default)]
pub struct ScriptedProber {
    pub hits: HashMap<String, Vec<PlatformHit>>,
    pub down: Vec<String>,
    pub calls: AtomicUsize,
}

impl ScriptedProber {
    pub fn hit(mut self, variant: &str, platform: &str, profile_url: &str) -> Self {
        self.hits.entry(variant.to_string()).or_default().push(PlatformHit {
            platform: platform.to_string(),
            profile_url: profile_url.to_string(),
        });
        self
    }

    pub fn down(mut self, variant: &str) -> Self {
        self.down.push(variant.to_string());
        self
    }
}

impl PlatformProber for ScriptedProber {
    fn probe(&self, variant: &str) -> Result<Vec<PlatformHit>, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.down.iter().any(|v| v == variant) {
            return Err(CollaboratorError::Timeout {
                service: "platform-probe".to_string(),
                after_ms: 5000,
            });
        }
        Ok(self.hits.get(variant).cloned().unwrap_or_default())
    }
}

/// Fixed DNS and reverse-hosting tables; unknown domains fail
#[derive(Default)]
pub struct ScriptedDns {
    pub records: HashMap<String, InfrastructureRecord>,
    pub cohosted: HashMap<String, Vec<String>>,
}

impl ScriptedDns {
    pub fn resolves(mut self, domain: &str, ip: &str, asn: &str, host: &str) -> Self {
        self.records.insert(
            domain.to_string(),
            InfrastructureRecord {
                ip: ip.to_string(),
                asn: asn.to_string(),
                hosting_provider: host.to_string(),
            },
        );
        self
    }

    pub fn hosts(mut self, ip: &str, domains: &[&str]) -> Self {
        self.cohosted
            .insert(ip.to_string(), domains.iter().map(|d| d.to_string()).collect());
        self
    }
}

impl InfrastructureResolver for ScriptedDns {
    fn resolve(&self, domain: &str) -> Result<InfrastructureRecord, CollaboratorError> {
        self.records
            .get(domain)
            .cloned()
            .ok_or_else(|| CollaboratorError::service("dns", format!("NXDOMAIN {domain}")))
    }

    fn co_hosted_domains(&self, ip: &str) -> Result<Vec<String>, CollaboratorError> {
        Ok(self.cohosted.get(ip).cloned().unwrap_or_default())
    }
}
