//! Signature block encoding and parsing (armored bilrost message).

use crate::error::{Error, Result};
use bilrost::{Message, OwnedMessage};

pub const SIGNATURE_BEGIN: &[u8] = b"-----BEGIN IMG-SIGN SIGNATURE-----";
pub const SIGNATURE_END: &[u8] = b"-----END IMG-SIGN SIGNATURE-----";

/// Current signature block format version.
pub const SIGNATURE_BLOCK_VERSION: u32 = 1;

/// Supported signature algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum SignatureAlgorithm {
    RsaPkcs1v15 = 1,
}

impl SignatureAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            SignatureAlgorithm::RsaPkcs1v15 => "rsa-pkcs1v15",
        }
    }
}

impl TryFrom<u8> for SignatureAlgorithm {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(SignatureAlgorithm::RsaPkcs1v15),
            _ => Err(Error::UnsupportedAlgorithm(format!(
                "unknown signature algorithm tag: {}",
                value
            ))),
        }
    }
}

/// An enveloped signature over a payload container.
///
/// `reference` identifies the signed content. The empty string means "the
/// whole document with the signature block excluded", which is the only
/// reference this implementation produces or accepts.
#[derive(Debug, Clone, PartialEq, Eq, Message, serde::Serialize, serde::Deserialize)]
pub struct SignatureBlock {
    #[bilrost(encoding(varint), tag(1))]
    pub version: u32,
    #[bilrost(tag(2))]
    pub reference: String,
    #[bilrost(encoding(varint), tag(3))]
    pub digest_alg: u8,
    #[bilrost(encoding(plainbytes), tag(4))]
    pub digest: Vec<u8>,
    #[bilrost(encoding(varint), tag(5))]
    pub signature_alg: u8,
    #[bilrost(encoding(plainbytes), tag(6))]
    pub signature: Vec<u8>,
    /// SPKI DER of the signer's public key, embedded for convenience.
    /// Empty when the signer chose not to embed it. Verification never
    /// trusts this field; it always uses the caller-supplied key.
    #[bilrost(encoding(plainbytes), tag(7))]
    pub public_key: Vec<u8>,
}

/// Encode a signature block into its armored byte form.
#[tracing::instrument(skip(block), fields(sig_len = block.signature.len()))]
pub fn encode_signature_block(block: &SignatureBlock) -> Vec<u8> {
    use base64::Engine;
    let encoded = block.encode_to_vec();
    let b64 = base64::engine::general_purpose::STANDARD.encode(&encoded);

    let mut out = Vec::new();
    out.extend_from_slice(SIGNATURE_BEGIN);
    out.push(b'\n');
    // Wrap base64 at 76 columns
    for chunk in b64.as_bytes().chunks(76) {
        out.extend_from_slice(chunk);
        out.push(b'\n');
    }
    out.extend_from_slice(SIGNATURE_END);
    out.push(b'\n');
    out
}

/// Decode the armored body of a signature block (the bytes between the begin
/// and end markers).
pub(crate) fn decode_signature_body(body: &[u8]) -> Result<SignatureBlock> {
    let body_str = std::str::from_utf8(body)
        .map_err(|_| Error::MalformedEnvelope("signature block body is not valid UTF-8".into()))?;
    let body_cleaned: String = body_str.chars().filter(|c| !c.is_whitespace()).collect();

    use base64::Engine;
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(&body_cleaned)
        .map_err(|e| {
            Error::MalformedEnvelope(format!("invalid base64 in signature block: {}", e))
        })?;

    SignatureBlock::decode(&decoded[..])
        .map_err(|e| Error::MalformedEnvelope(format!("invalid signature block payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block() -> SignatureBlock {
        SignatureBlock {
            version: SIGNATURE_BLOCK_VERSION,
            reference: String::new(),
            digest_alg: 2,
            digest: vec![0x5A; 64],
            signature_alg: 1,
            signature: vec![0xA5; 256],
            public_key: Vec::new(),
        }
    }

    #[test]
    fn armored_round_trip() {
        let block = sample_block();
        let encoded = encode_signature_block(&block);
        assert!(encoded.starts_with(SIGNATURE_BEGIN));
        assert!(encoded.ends_with(b"-----END IMG-SIGN SIGNATURE-----\n"));

        let body_start = SIGNATURE_BEGIN.len();
        let body_end = encoded.len() - SIGNATURE_END.len() - 1;
        let parsed = decode_signature_body(&encoded[body_start..body_end]).unwrap();
        assert_eq!(parsed, block);
    }

    #[test]
    fn corrupt_body_is_rejected() {
        let err = decode_signature_body(b"\n@@@@\n").unwrap_err();
        assert!(matches!(err, Error::MalformedEnvelope(_)));
    }

    #[test]
    fn unknown_signature_algorithm_tag_is_rejected() {
        let err = SignatureAlgorithm::try_from(99).unwrap_err();
        assert!(matches!(err, Error::UnsupportedAlgorithm(_)));
    }
}
