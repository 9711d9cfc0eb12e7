//! RSA signing and verification backend for img-sign envelopes.

pub mod facade;
pub mod keys;
pub mod sign;
pub mod verify;

pub use facade::{get_image, sign_image, verify_and_extract, verify_image};
pub use keys::{PrivateKeyMaterial, PublicKeyMaterial};
pub use sign::{SignOptions, sign_container};
pub use verify::verify_envelope;
