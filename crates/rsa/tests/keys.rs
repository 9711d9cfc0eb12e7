//! Key material loading tests against committed PEM/DER fixtures.
//!
//! Fixtures were generated with openssl; the encrypted private key uses
//! PBES2 (PBKDF2-SHA256 + AES-256-CBC) with password `1234`.

use img_sign_core::Error;
use img_sign_rsa::{PrivateKeyMaterial, PublicKeyMaterial};

const SIGNER_PEM: &[u8] = include_bytes!("fixtures/signer.pem");
const SIGNER_PKCS1_PEM: &[u8] = include_bytes!("fixtures/signer.pkcs1.pem");
const SIGNER_DER: &[u8] = include_bytes!("fixtures/signer.der");
const SIGNER_ENCRYPTED_PEM: &[u8] = include_bytes!("fixtures/signer.encrypted.pem");
const SIGNER_PUB_PEM: &[u8] = include_bytes!("fixtures/signer.pub.pem");
const SIGNER_PUB_DER: &[u8] = include_bytes!("fixtures/signer.pub.der");
const EC_PEM: &[u8] = include_bytes!("fixtures/ec.pem");

#[test]
fn loads_pkcs8_pem_private_key() {
    assert!(PrivateKeyMaterial::load(SIGNER_PEM, None).is_ok());
}

#[test]
fn loads_pkcs1_pem_private_key() {
    assert!(PrivateKeyMaterial::load(SIGNER_PKCS1_PEM, None).is_ok());
}

#[test]
fn loads_pkcs8_der_private_key() {
    assert!(PrivateKeyMaterial::load(SIGNER_DER, None).is_ok());
}

#[test]
fn decrypts_private_key_with_correct_password() {
    assert!(PrivateKeyMaterial::load(SIGNER_ENCRYPTED_PEM, Some("1234")).is_ok());
}

#[test]
fn wrong_password_fails_with_key_load() {
    let err = PrivateKeyMaterial::load(SIGNER_ENCRYPTED_PEM, Some("4321")).unwrap_err();
    assert!(matches!(err, Error::KeyLoad(_)), "got: {err}");
}

#[test]
fn encrypted_key_without_password_names_the_problem() {
    let err = PrivateKeyMaterial::load(SIGNER_ENCRYPTED_PEM, None).unwrap_err();
    match err {
        Error::KeyLoad(msg) => assert!(msg.contains("password"), "unexpected message: {msg}"),
        other => panic!("expected KeyLoad, got: {other}"),
    }
}

#[test]
fn ec_private_key_is_unsupported() {
    let err = PrivateKeyMaterial::load(EC_PEM, None).unwrap_err();
    assert!(matches!(err, Error::UnsupportedAlgorithm(_)), "got: {err}");
}

#[test]
fn garbage_private_key_fails_with_key_load() {
    let err = PrivateKeyMaterial::load(b"not a key at all", None).unwrap_err();
    assert!(matches!(err, Error::KeyLoad(_)));
}

#[test]
fn loads_spki_pem_public_key() {
    assert!(PublicKeyMaterial::load(SIGNER_PUB_PEM).is_ok());
}

#[test]
fn loads_spki_der_public_key() {
    assert!(PublicKeyMaterial::load(SIGNER_PUB_DER).is_ok());
}

#[test]
fn private_pem_is_not_a_public_key() {
    let err = PublicKeyMaterial::load(SIGNER_PEM).unwrap_err();
    assert!(matches!(err, Error::KeyLoad(_)));
}

#[test]
fn garbage_public_key_fails_with_key_load() {
    let err = PublicKeyMaterial::load(&[0xFF, 0x00, 0x12]).unwrap_err();
    assert!(matches!(err, Error::KeyLoad(_)));
}

#[test]
fn embedded_public_key_der_round_trips() {
    let key = PrivateKeyMaterial::load(SIGNER_PEM, None).unwrap();
    let der = key.public_key_der().unwrap();
    assert!(PublicKeyMaterial::load(&der).is_ok());
}
