//! Container signing with RSA private keys.

use crate::keys::PrivateKeyMaterial;
use img_sign_core::{
    Container, DigestAlgorithm, Error, Result, SIGNATURE_BLOCK_VERSION, SignatureAlgorithm,
    SignatureBlock, compute_digest,
};
use rsa::Pkcs1v15Sign;
use sha2::{Sha256, Sha512};

/// Options for signing a container.
#[derive(Debug, Clone)]
pub struct SignOptions {
    pub digest_algorithm: DigestAlgorithm,
    /// Embed the signer's public key (SPKI DER) in the signature block.
    pub embed_public_key: bool,
}

impl Default for SignOptions {
    fn default() -> Self {
        SignOptions {
            digest_algorithm: DigestAlgorithm::Sha512,
            embed_public_key: true,
        }
    }
}

/// Compute a digest over the container's exact canonical bytes and sign it.
///
/// The resulting block references the whole document (empty reference): the
/// verifier recomputes the digest over the container span with the signature
/// block excluded, which is exactly what is being signed here since the block
/// does not exist yet.
#[tracing::instrument(skip(container, key), fields(container_len = container.as_bytes().len(), alg = ?options.digest_algorithm))]
pub fn sign_container(
    container: &Container,
    key: &PrivateKeyMaterial,
    options: &SignOptions,
) -> Result<SignatureBlock> {
    let digest = compute_digest(options.digest_algorithm, container.as_bytes());

    let scheme = pkcs1v15_scheme(options.digest_algorithm);
    let signature = key
        .key()
        .sign(scheme, &digest)
        .map_err(|e| Error::Signing(e.to_string()))?;

    let public_key = if options.embed_public_key {
        key.public_key_der()?
    } else {
        Vec::new()
    };

    tracing::debug!(sig_len = signature.len(), "container signed");

    Ok(SignatureBlock {
        version: SIGNATURE_BLOCK_VERSION,
        reference: String::new(),
        digest_alg: options.digest_algorithm as u8,
        digest,
        signature_alg: SignatureAlgorithm::RsaPkcs1v15 as u8,
        signature,
        public_key,
    })
}

pub(crate) fn pkcs1v15_scheme(algorithm: DigestAlgorithm) -> Pkcs1v15Sign {
    match algorithm {
        DigestAlgorithm::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
        DigestAlgorithm::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
    }
}
