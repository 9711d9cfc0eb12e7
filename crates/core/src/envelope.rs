//! Envelope assembly: attaching, detaching, and persisting signed containers.
//!
//! An envelope is a single self-contained document: the container's exact
//! canonical bytes followed by one armored signature block. The signature
//! digest covers the container span only, so parsing captures that span
//! verbatim rather than re-serializing it.

use crate::block::{
    SIGNATURE_BEGIN, SIGNATURE_END, SignatureBlock, decode_signature_body, encode_signature_block,
};
use crate::container::{Container, PAYLOAD_BEGIN, PAYLOAD_END};
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// A parsed envelope: the payload container plus its embedded signature.
///
/// Immutable once constructed. At most one signature block is recognized;
/// documents carrying more than one are rejected at parse time.
#[derive(Debug, Clone)]
pub struct Envelope {
    container: Container,
    signature: SignatureBlock,
}

impl Envelope {
    /// Attach a signature block to a container.
    pub fn new(container: Container, signature: SignatureBlock) -> Self {
        Envelope {
            container,
            signature,
        }
    }

    /// The container span the signature digest was computed over.
    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn signature(&self) -> &SignatureBlock {
        &self.signature
    }

    /// Serialize the envelope: container bytes followed by the armored
    /// signature block. This is the exact byte form `parse` accepts.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.container.as_bytes().to_vec();
        out.extend_from_slice(&encode_signature_block(&self.signature));
        out
    }

    /// Parse a persisted envelope.
    ///
    /// Strict by design: the payload block must start at offset zero, the
    /// document must contain exactly one payload block and exactly one
    /// signature block, and nothing but whitespace may appear between or
    /// after them. Truncated or duplicated blocks fail with
    /// `MalformedEnvelope`.
    #[tracing::instrument(skip(data), fields(data_len = data.len()))]
    pub fn parse(data: &[u8]) -> Result<Self> {
        if !data.starts_with(PAYLOAD_BEGIN) {
            return Err(Error::MalformedEnvelope(
                "document does not start with a payload block".into(),
            ));
        }

        let end = find_subslice(data, PAYLOAD_END, 0).ok_or_else(|| {
            Error::MalformedEnvelope("payload block is missing its end marker".into())
        })?;
        let container_end = consume_newline(data, end + PAYLOAD_END.len());

        if find_subslice(data, PAYLOAD_BEGIN, container_end).is_some() {
            return Err(Error::MalformedEnvelope(
                "multiple payload blocks found".into(),
            ));
        }

        let container = Container::from_raw(data[..container_end].to_vec());

        let sig_begin = find_subslice(data, SIGNATURE_BEGIN, container_end)
            .ok_or_else(|| Error::MalformedEnvelope("no signature block found".into()))?;
        if !is_blank(&data[container_end..sig_begin]) {
            return Err(Error::MalformedEnvelope(
                "unexpected data between payload and signature blocks".into(),
            ));
        }

        let sig_end = find_subslice(data, SIGNATURE_END, sig_begin).ok_or_else(|| {
            Error::MalformedEnvelope("signature block is missing its end marker".into())
        })?;
        let body = &data[sig_begin + SIGNATURE_BEGIN.len()..sig_end];
        let after_sig = consume_newline(data, sig_end + SIGNATURE_END.len());

        if find_subslice(data, SIGNATURE_BEGIN, after_sig).is_some() {
            return Err(Error::MalformedEnvelope(
                "multiple signature blocks found".into(),
            ));
        }
        if !is_blank(&data[after_sig..]) {
            return Err(Error::MalformedEnvelope(
                "unexpected data after signature block".into(),
            ));
        }

        let signature = decode_signature_body(body)?;

        Ok(Envelope {
            container,
            signature,
        })
    }

    /// Remove the signature block, restoring the pre-signing container.
    pub fn detach(self) -> Container {
        self.container
    }

    /// Write the envelope to a file.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn persist<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_bytes())?;
        Ok(())
    }

    /// Read and parse an envelope file.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        Envelope::parse(&data)
    }
}

/// Advance past at most one `\r\n` or `\n` at `pos`.
fn consume_newline(data: &[u8], mut pos: usize) -> usize {
    if pos < data.len() && data[pos] == b'\r' {
        pos += 1;
    }
    if pos < data.len() && data[pos] == b'\n' {
        pos += 1;
    }
    pos
}

fn is_blank(data: &[u8]) -> bool {
    data.iter().all(|b| b.is_ascii_whitespace())
}

fn find_subslice(haystack: &[u8], needle: &[u8], start: usize) -> Option<usize> {
    if needle.is_empty() || start >= haystack.len() {
        return None;
    }
    haystack[start..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|pos| start + pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{SIGNATURE_BLOCK_VERSION, encode_signature_block};
    use crate::container::{decode_container, encode_container};

    fn sample_block() -> SignatureBlock {
        SignatureBlock {
            version: SIGNATURE_BLOCK_VERSION,
            reference: String::new(),
            digest_alg: 2,
            digest: vec![0x11; 64],
            signature_alg: 1,
            signature: vec![0x22; 256],
            public_key: Vec::new(),
        }
    }

    fn sample_envelope() -> Envelope {
        Envelope::new(encode_container(b"image bytes"), sample_block())
    }

    #[test]
    fn parse_round_trip() {
        let envelope = sample_envelope();
        let bytes = envelope.to_bytes();
        let parsed = Envelope::parse(&bytes).unwrap();
        assert_eq!(parsed.container(), envelope.container());
        assert_eq!(parsed.signature(), envelope.signature());
    }

    #[test]
    fn detach_restores_container() {
        let container = encode_container(b"image bytes");
        let envelope = Envelope::new(container.clone(), sample_block());
        let bytes = envelope.to_bytes();
        let detached = Envelope::parse(&bytes).unwrap().detach();
        assert_eq!(detached, container);
        assert_eq!(decode_container(&detached).unwrap(), b"image bytes");
    }

    #[test]
    fn missing_signature_is_rejected() {
        let container = encode_container(b"image bytes");
        let err = Envelope::parse(container.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MalformedEnvelope(_)));
    }

    #[test]
    fn multiple_signature_blocks_are_rejected() {
        let mut bytes = sample_envelope().to_bytes();
        bytes.extend_from_slice(&encode_signature_block(&sample_block()));
        let err = Envelope::parse(&bytes).unwrap_err();
        assert!(matches!(err, Error::MalformedEnvelope(_)));
        assert!(err.to_string().contains("multiple signature blocks"));
    }

    #[test]
    fn multiple_payload_blocks_are_rejected() {
        let mut bytes = encode_container(b"first").into_bytes();
        bytes.extend_from_slice(encode_container(b"second").as_bytes());
        bytes.extend_from_slice(&encode_signature_block(&sample_block()));
        let err = Envelope::parse(&bytes).unwrap_err();
        assert!(matches!(err, Error::MalformedEnvelope(_)));
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let mut bytes = sample_envelope().to_bytes();
        bytes.extend_from_slice(b"injected trailer\n");
        let err = Envelope::parse(&bytes).unwrap_err();
        assert!(matches!(err, Error::MalformedEnvelope(_)));
    }

    #[test]
    fn trailing_whitespace_is_tolerated() {
        let mut bytes = sample_envelope().to_bytes();
        bytes.extend_from_slice(b"\n\n");
        assert!(Envelope::parse(&bytes).is_ok());
    }

    #[test]
    fn truncated_file_is_rejected() {
        let bytes = sample_envelope().to_bytes();
        let err = Envelope::parse(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, Error::MalformedEnvelope(_)));
    }

    #[test]
    fn leading_garbage_is_rejected() {
        let mut bytes = b"prefix\n".to_vec();
        bytes.extend_from_slice(&sample_envelope().to_bytes());
        let err = Envelope::parse(&bytes).unwrap_err();
        assert!(matches!(err, Error::MalformedEnvelope(_)));
    }

    #[test]
    fn persist_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signed.envelope");

        let envelope = sample_envelope();
        envelope.persist(&path).unwrap();
        let loaded = Envelope::load(&path).unwrap();
        assert_eq!(loaded.container(), envelope.container());
        assert_eq!(loaded.signature(), envelope.signature());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = Envelope::load("/nonexistent/signed.envelope").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
