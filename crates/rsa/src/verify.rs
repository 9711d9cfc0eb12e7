//! Envelope verification against RSA public keys.

use crate::keys::PublicKeyMaterial;
use crate::sign::pkcs1v15_scheme;
use img_sign_core::{
    DigestAlgorithm, Envelope, Error, Result, SignatureAlgorithm, compute_digest,
};

/// Check the envelope's embedded signature against a public key.
///
/// Recomputes the digest over the container span (the document with the
/// signature block excluded) and verifies the signature over it. Any
/// cryptographic mismatch returns `Ok(false)`; errors are reserved for
/// structural problems and unknown algorithms.
#[tracing::instrument(skip_all, fields(container_len = envelope.container().as_bytes().len()))]
pub fn verify_envelope(envelope: &Envelope, key: &PublicKeyMaterial) -> Result<bool> {
    let block = envelope.signature();

    let digest_alg = DigestAlgorithm::try_from(block.digest_alg)?;
    let SignatureAlgorithm::RsaPkcs1v15 = SignatureAlgorithm::try_from(block.signature_alg)?;

    if !block.reference.is_empty() {
        return Err(Error::MalformedEnvelope(format!(
            "unsupported signature reference: {:?}",
            block.reference
        )));
    }

    let digest = compute_digest(digest_alg, envelope.container().as_bytes());
    if digest != block.digest {
        tracing::debug!("digest mismatch, container was altered after signing");
        return Ok(false);
    }

    let scheme = pkcs1v15_scheme(digest_alg);
    let valid = key.key().verify(scheme, &digest, &block.signature).is_ok();
    if !valid {
        tracing::debug!("signature does not match the supplied public key");
    }
    Ok(valid)
}
