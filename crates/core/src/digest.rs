//! Digest (hash) abstraction with algorithm agility and SRI-style encoding.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256, Sha512};

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum DigestAlgorithm {
    Sha256 = 1,
    Sha512 = 2,
}

impl DigestAlgorithm {
    /// Returns the algorithm name in lowercase (for SRI strings).
    pub fn name(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Sha512 => "sha512",
        }
    }

    /// Parse algorithm from name string.
    pub fn from_name(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(DigestAlgorithm::Sha256),
            "sha512" | "sha-512" => Ok(DigestAlgorithm::Sha512),
            _ => Err(Error::UnsupportedAlgorithm(format!(
                "unknown digest algorithm: {}",
                s
            ))),
        }
    }

    /// Output length in bytes for this algorithm.
    pub fn output_len(&self) -> usize {
        match self {
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha512 => 64,
        }
    }
}

impl TryFrom<u8> for DigestAlgorithm {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(DigestAlgorithm::Sha256),
            2 => Ok(DigestAlgorithm::Sha512),
            _ => Err(Error::UnsupportedAlgorithm(format!(
                "unknown digest algorithm tag: {}",
                value
            ))),
        }
    }
}

/// Compute digest of the given data using the specified algorithm.
#[tracing::instrument(skip(data), fields(data_len = data.len(), alg = ?algorithm))]
pub fn compute_digest(algorithm: DigestAlgorithm, data: &[u8]) -> Vec<u8> {
    match algorithm {
        DigestAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            hasher.update(data);
            hasher.finalize().to_vec()
        }
        DigestAlgorithm::Sha512 => {
            let mut hasher = Sha512::new();
            hasher.update(data);
            hasher.finalize().to_vec()
        }
    }
}

/// Encode digest as SRI string (e.g., `sha512-<base64>`).
pub fn encode_sri(algorithm: DigestAlgorithm, digest: &[u8]) -> String {
    use base64::Engine;
    format!(
        "{}-{}",
        algorithm.name(),
        base64::engine::general_purpose::STANDARD.encode(digest)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_output_len() {
        let digest = compute_digest(DigestAlgorithm::Sha256, b"hello");
        assert_eq!(digest.len(), 32);
    }

    #[test]
    fn sha512_output_len() {
        let digest = compute_digest(DigestAlgorithm::Sha512, b"hello");
        assert_eq!(digest.len(), 64);
    }

    #[test]
    fn digest_is_deterministic() {
        let a = compute_digest(DigestAlgorithm::Sha512, b"same input");
        let b = compute_digest(DigestAlgorithm::Sha512, b"same input");
        assert_eq!(a, b);
    }

    #[test]
    fn sri_has_algorithm_prefix() {
        let sri = encode_sri(DigestAlgorithm::Sha512, &[0u8; 64]);
        assert!(sri.starts_with("sha512-"));
    }

    #[test]
    fn from_name_accepts_dashed_form() {
        assert_eq!(
            DigestAlgorithm::from_name("SHA-256").unwrap(),
            DigestAlgorithm::Sha256
        );
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = DigestAlgorithm::from_name("md5").unwrap_err();
        assert!(matches!(err, Error::UnsupportedAlgorithm(_)));
    }

    #[test]
    fn tag_round_trip() {
        for alg in [DigestAlgorithm::Sha256, DigestAlgorithm::Sha512] {
            assert_eq!(DigestAlgorithm::try_from(alg as u8).unwrap(), alg);
        }
        assert!(DigestAlgorithm::try_from(0).is_err());
    }
}
