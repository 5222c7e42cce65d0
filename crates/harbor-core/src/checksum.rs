//! Configuration fingerprints for rollout detection
//!
//! The reconciler stores a fingerprint on the Core workload and restarts it
//! when the freshly computed value differs. By default only the fields that
//! Core needs a restart for are tracked: the public URL and whether Clair is
//! deployed. Other differences in the spec leave the fingerprint unchanged.
//!
//! [`FingerprintScope::Artifact`] hashes the whole generated config instead,
//! so any change in the served configuration triggers a restart.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use aws_lc_rs::digest::{digest, SHA256};
use harbor_common::crd::HarborSpec;

use crate::config::CoreConfig;

/// Separator between tracked fields
const FIELD_SEPARATOR: &str = "\n";

/// Opaque SHA-256 fingerprint, rendered as 64 lowercase hex characters
///
/// Only meaningful for equality comparison.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConfigFingerprint(String);

impl ConfigFingerprint {
    fn of(input: &[u8]) -> Self {
        let hash = digest(&SHA256, input);
        Self(hash.as_ref().iter().fold(
            String::with_capacity(64),
            |mut s, b| {
                let _ = write!(s, "{:02x}", b);
                s
            },
        ))
    }

    /// Hex representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which inputs a fingerprint covers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FingerprintScope {
    /// Public URL and Clair presence only
    #[default]
    TrackedFields,
    /// Every generated key, value and template byte
    Artifact,
}

impl FromStr for FingerprintScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tracked" | "tracked-fields" => Ok(Self::TrackedFields),
            "artifact" => Ok(Self::Artifact),
            other => Err(format!(
                "unknown fingerprint scope: {other} (expected tracked or artifact)"
            )),
        }
    }
}

/// Computes configuration fingerprints
pub struct ConfigFingerprinter;

impl ConfigFingerprinter {
    /// Fingerprint of the fields tracked for drift detection
    pub fn compute(spec: &HarborSpec) -> ConfigFingerprint {
        let tracked = [
            spec.public_url.as_str(),
            if spec.components.clair.is_some() {
                "true"
            } else {
                "false"
            },
        ]
        .join(FIELD_SEPARATOR);

        ConfigFingerprint::of(tracked.as_bytes())
    }

    /// Fingerprint of a complete generated configuration
    pub fn compute_artifact(config: &CoreConfig) -> ConfigFingerprint {
        let mut input = Vec::new();

        for (key, value) in config.data() {
            input.extend_from_slice(key.as_bytes());
            input.push(b'=');
            input.extend_from_slice(value.as_bytes());
            input.push(b'\n');
        }

        for (key, value) in config.binary_data() {
            input.extend_from_slice(b"binary:");
            input.extend_from_slice(key.as_bytes());
            input.push(b'=');
            input.extend_from_slice(&value.0);
            input.push(b'\n');
        }

        ConfigFingerprint::of(&input)
    }
}
