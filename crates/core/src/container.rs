//! Payload container encoding and decoding.
//!
//! A container is the canonical byte form of exactly one payload: a begin
//! marker line, the payload base64-encoded and wrapped at 76 columns, and an
//! end marker line, every line `\n`-terminated. Signatures are computed over
//! these exact bytes, so encoding the same payload twice must reproduce them
//! byte for byte.

use crate::error::{Error, Result};

pub const PAYLOAD_BEGIN: &[u8] = b"-----BEGIN IMG-SIGN PAYLOAD-----";
pub const PAYLOAD_END: &[u8] = b"-----END IMG-SIGN PAYLOAD-----";

/// Canonical serialized form of a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container(Vec<u8>);

impl Container {
    /// The exact bytes the signature digest is computed over.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Wrap an already-serialized byte span. Callers are responsible for the
    /// span matching the container layout; `decode_container` will reject it
    /// otherwise.
    pub(crate) fn from_raw(bytes: Vec<u8>) -> Self {
        Container(bytes)
    }
}

/// Serialize a payload into its canonical container form.
///
/// Deterministic and total: the empty payload produces a container with no
/// body lines between the markers.
#[tracing::instrument(skip(payload), fields(payload_len = payload.len()))]
pub fn encode_container(payload: &[u8]) -> Container {
    use base64::Engine;
    let b64 = base64::engine::general_purpose::STANDARD.encode(payload);

    let mut out = Vec::with_capacity(b64.len() + b64.len() / 76 + 64);
    out.extend_from_slice(PAYLOAD_BEGIN);
    out.push(b'\n');
    for chunk in b64.as_bytes().chunks(76) {
        out.extend_from_slice(chunk);
        out.push(b'\n');
    }
    out.extend_from_slice(PAYLOAD_END);
    out.push(b'\n');
    Container(out)
}

/// Recover the payload bytes from a container.
///
/// Inverse of [`encode_container`]. Fails with `MalformedContainer` if the
/// markers are missing or out of order, if anything but base64 body lines
/// sits between them, or if the base64 does not decode.
#[tracing::instrument(skip(container), fields(container_len = container.as_bytes().len()))]
pub fn decode_container(container: &Container) -> Result<Vec<u8>> {
    let mut lines = container.as_bytes().split(|&b| b == b'\n');

    match lines.next() {
        Some(line) if trim_cr(line) == PAYLOAD_BEGIN => {}
        _ => {
            return Err(Error::MalformedContainer(
                "missing payload begin marker".into(),
            ));
        }
    }

    let mut body = Vec::new();
    let mut saw_end = false;
    for line in lines {
        let line = trim_cr(line);
        if saw_end {
            if !line.is_empty() {
                return Err(Error::MalformedContainer(
                    "data after payload end marker".into(),
                ));
            }
            continue;
        }
        if line == PAYLOAD_END {
            saw_end = true;
            continue;
        }
        body.extend_from_slice(line);
    }
    if !saw_end {
        return Err(Error::MalformedContainer(
            "missing payload end marker".into(),
        ));
    }

    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(&body)
        .or_else(|_| base64::engine::general_purpose::STANDARD_NO_PAD.decode(&body))
        .map_err(|e| Error::MalformedContainer(format!("invalid base64 in payload body: {}", e)))
}

fn trim_cr(line: &[u8]) -> &[u8] {
    match line.last() {
        Some(b'\r') => &line[..line.len() - 1],
        _ => line,
    }
}
