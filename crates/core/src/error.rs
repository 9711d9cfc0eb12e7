//! Typed error taxonomy shared across the img-sign crates.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the container codec, envelope builder, and signature
/// engine. Cryptographic mismatch is deliberately not here: a bad signature
/// surfaces as `verify` returning `false`, not as an error.
#[derive(Debug, Error)]
pub enum Error {
    /// Key bytes malformed, wrong password, or missing password.
    #[error("failed to load key material: {0}")]
    KeyLoad(String),

    /// Key, digest, or signature algorithm not supported.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("malformed container: {0}")]
    MalformedContainer(String),

    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// The signing primitive itself failed (key/digest size mismatch).
    #[error("signing failed: {0}")]
    Signing(String),

    /// Verification failed during a fail-closed extract.
    #[error("signature verification failed")]
    SignatureMismatch,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
