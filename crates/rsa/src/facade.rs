//! High-level sign / verify / extract operations over envelope files.
//!
//! Thin pass-throughs: every lower-layer error propagates unchanged, and no
//! state is kept between calls.

use crate::keys::{PrivateKeyMaterial, PublicKeyMaterial};
use crate::sign::{SignOptions, sign_container};
use crate::verify::verify_envelope;
use img_sign_core::{Envelope, Error, Result, SignatureBlock, decode_container, encode_container};
use std::path::Path;

/// Sign `payload` and write the resulting envelope to `output`.
///
/// Returns the signature block that was embedded, for display purposes.
#[tracing::instrument(skip_all, fields(payload_len = payload.len(), output = %output.as_ref().display()))]
pub fn sign_image<P: AsRef<Path>>(
    payload: &[u8],
    private_key: &[u8],
    password: Option<&str>,
    output: P,
    options: &SignOptions,
) -> Result<SignatureBlock> {
    let key = PrivateKeyMaterial::load(private_key, password)?;
    let container = encode_container(payload);
    let block = sign_container(&container, &key, options)?;
    let envelope = Envelope::new(container, block.clone());
    envelope.persist(output)?;
    Ok(block)
}

/// Verify the envelope at `input` against a public key.
///
/// `Ok(false)` means the document parsed but its signature does not check
/// out; the payload is never decoded.
#[tracing::instrument(skip_all, fields(input = %input.as_ref().display()))]
pub fn verify_image<P: AsRef<Path>>(input: P, public_key: &[u8]) -> Result<bool> {
    let key = PublicKeyMaterial::load(public_key)?;
    let envelope = Envelope::load(input)?;
    verify_envelope(&envelope, &key)
}

/// Extract the payload from the envelope at `input` without checking its
/// signature.
///
/// This only proves the document is structurally parseable, not that it is
/// trustworthy. Use [`verify_and_extract`] unless skipping verification is
/// an explicit, deliberate choice.
#[tracing::instrument(skip_all, fields(input = %input.as_ref().display()))]
pub fn get_image<P: AsRef<Path>>(input: P) -> Result<Vec<u8>> {
    let envelope = Envelope::load(input)?;
    let container = envelope.detach();
    decode_container(&container)
}

/// Verify the envelope at `input` and extract its payload, failing closed.
///
/// Returns `Error::SignatureMismatch` when the signature does not check out;
/// the payload is not returned in that case.
#[tracing::instrument(skip_all, fields(input = %input.as_ref().display()))]
pub fn verify_and_extract<P: AsRef<Path>>(input: P, public_key: &[u8]) -> Result<Vec<u8>> {
    let key = PublicKeyMaterial::load(public_key)?;
    let envelope = Envelope::load(input)?;
    if !verify_envelope(&envelope, &key)? {
        return Err(Error::SignatureMismatch);
    }
    decode_container(&envelope.detach())
}
