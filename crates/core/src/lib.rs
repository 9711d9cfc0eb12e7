//! Core envelope primitives: payload container codec, digest abstraction, and
//! enveloped signature block parsing/encoding.
//!
//! This crate provides the foundational building blocks for img-sign, with no
//! key handling or CLI dependencies.

pub mod block;
pub mod container;
pub mod digest;
pub mod envelope;
pub mod error;

pub use block::{SIGNATURE_BLOCK_VERSION, SignatureAlgorithm, SignatureBlock};
pub use container::{Container, decode_container, encode_container};
pub use digest::{DigestAlgorithm, compute_digest, encode_sri};
pub use envelope::Envelope;
pub use error::{Error, Result};
