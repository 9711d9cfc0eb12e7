//! RSA key material loading (PKCS#8 / PKCS#1 / SPKI, PEM or DER).
//!
//! Keys are opaque, caller-supplied byte blobs. Nothing here generates or
//! persists key material.

use img_sign_core::{Error, Result};
use pkcs8::der::Document;
use pkcs8::spki::{ObjectIdentifier, SubjectPublicKeyInfoRef};
use pkcs8::{
    DecodePrivateKey, DecodePublicKey, EncodePublicKey, EncryptedPrivateKeyInfo, PrivateKeyInfo,
};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};

/// rsaEncryption OID (RFC 8017).
const RSA_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

/// Private signing credential.
///
/// Immutable once loaded; safe to share across threads read-only.
#[derive(Clone, Debug)]
pub struct PrivateKeyMaterial {
    key: RsaPrivateKey,
}

impl PrivateKeyMaterial {
    /// Load a private key from PEM or DER bytes.
    ///
    /// With a password, the bytes must be an encrypted PKCS#8 document; a
    /// wrong password fails with `KeyLoad`, never silently. Without one,
    /// plain PKCS#8 and PKCS#1 encodings are accepted, and an encrypted key
    /// is reported as requiring a password. Non-RSA keys fail with
    /// `UnsupportedAlgorithm`.
    #[tracing::instrument(skip_all, fields(len = bytes.len(), has_password = password.is_some()))]
    pub fn load(bytes: &[u8], password: Option<&str>) -> Result<Self> {
        let key = match password {
            Some(pw) => load_encrypted_private(bytes, pw)?,
            None => load_unencrypted_private(bytes)?,
        };
        Ok(PrivateKeyMaterial { key })
    }

    pub(crate) fn key(&self) -> &RsaPrivateKey {
        &self.key
    }

    /// SPKI DER encoding of the corresponding public key.
    pub fn public_key_der(&self) -> Result<Vec<u8>> {
        RsaPublicKey::from(&self.key)
            .to_public_key_der()
            .map(|doc| doc.into_vec())
            .map_err(|e| Error::KeyLoad(format!("cannot encode public key: {}", e)))
    }
}

/// Public verification credential.
#[derive(Clone, Debug)]
pub struct PublicKeyMaterial {
    key: RsaPublicKey,
}

impl PublicKeyMaterial {
    /// Load a public key from SPKI or PKCS#1 bytes, PEM or DER.
    #[tracing::instrument(skip_all, fields(len = bytes.len()))]
    pub fn load(bytes: &[u8]) -> Result<Self> {
        let key = if looks_like_pem(bytes) {
            let pem = pem_str(bytes)?;
            let (label, doc) =
                Document::from_pem(pem).map_err(|e| Error::KeyLoad(format!("invalid PEM: {}", e)))?;
            match label {
                "PUBLIC KEY" => rsa_from_spki_der(doc.as_bytes())?,
                "RSA PUBLIC KEY" => RsaPublicKey::from_pkcs1_der(doc.as_bytes())
                    .map_err(|e| Error::KeyLoad(format!("invalid RSA public key: {}", e)))?,
                other => {
                    return Err(Error::KeyLoad(format!(
                        "unexpected PEM label for a public key: {}",
                        other
                    )));
                }
            }
        } else if SubjectPublicKeyInfoRef::try_from(bytes).is_ok() {
            rsa_from_spki_der(bytes)?
        } else {
            RsaPublicKey::from_pkcs1_der(bytes).map_err(|e| {
                Error::KeyLoad(format!("unrecognized public key encoding: {}", e))
            })?
        };
        Ok(PublicKeyMaterial { key })
    }

    pub(crate) fn key(&self) -> &RsaPublicKey {
        &self.key
    }
}

fn load_encrypted_private(bytes: &[u8], password: &str) -> Result<RsaPrivateKey> {
    let result = if looks_like_pem(bytes) {
        let pem = pem_str(bytes)?;
        RsaPrivateKey::from_pkcs8_encrypted_pem(pem, password.as_bytes())
    } else {
        RsaPrivateKey::from_pkcs8_encrypted_der(bytes, password.as_bytes())
    };
    result.map_err(|e| {
        Error::KeyLoad(format!(
            "cannot decrypt private key (wrong password or unsupported encryption): {}",
            e
        ))
    })
}

fn load_unencrypted_private(bytes: &[u8]) -> Result<RsaPrivateKey> {
    if looks_like_pem(bytes) {
        let pem = pem_str(bytes)?;
        let (label, doc) =
            Document::from_pem(pem).map_err(|e| Error::KeyLoad(format!("invalid PEM: {}", e)))?;
        match label {
            "PRIVATE KEY" => rsa_from_pkcs8_der(doc.as_bytes()),
            "RSA PRIVATE KEY" => RsaPrivateKey::from_pkcs1_der(doc.as_bytes())
                .map_err(|e| Error::KeyLoad(format!("invalid RSA private key: {}", e))),
            "ENCRYPTED PRIVATE KEY" => Err(Error::KeyLoad(
                "private key is encrypted and requires a password".into(),
            )),
            other => Err(Error::KeyLoad(format!(
                "unexpected PEM label for a private key: {}",
                other
            ))),
        }
    } else {
        if PrivateKeyInfo::try_from(bytes).is_ok() {
            return rsa_from_pkcs8_der(bytes);
        }
        if EncryptedPrivateKeyInfo::try_from(bytes).is_ok() {
            return Err(Error::KeyLoad(
                "private key is encrypted and requires a password".into(),
            ));
        }
        RsaPrivateKey::from_pkcs1_der(bytes)
            .map_err(|e| Error::KeyLoad(format!("unrecognized private key encoding: {}", e)))
    }
}

fn rsa_from_pkcs8_der(der: &[u8]) -> Result<RsaPrivateKey> {
    let info = PrivateKeyInfo::try_from(der)
        .map_err(|e| Error::KeyLoad(format!("invalid PKCS#8 structure: {}", e)))?;
    if info.algorithm.oid != RSA_OID {
        return Err(Error::UnsupportedAlgorithm(format!(
            "key algorithm OID {} (only RSA is supported)",
            info.algorithm.oid
        )));
    }
    RsaPrivateKey::from_pkcs8_der(der)
        .map_err(|e| Error::KeyLoad(format!("invalid RSA private key: {}", e)))
}

fn rsa_from_spki_der(der: &[u8]) -> Result<RsaPublicKey> {
    let info = SubjectPublicKeyInfoRef::try_from(der)
        .map_err(|e| Error::KeyLoad(format!("invalid SPKI structure: {}", e)))?;
    if info.algorithm.oid != RSA_OID {
        return Err(Error::UnsupportedAlgorithm(format!(
            "key algorithm OID {} (only RSA is supported)",
            info.algorithm.oid
        )));
    }
    RsaPublicKey::from_public_key_der(der)
        .map_err(|e| Error::KeyLoad(format!("invalid RSA public key: {}", e)))
}

fn looks_like_pem(bytes: &[u8]) -> bool {
    bytes.starts_with(b"-----BEGIN")
}

fn pem_str(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|_| Error::KeyLoad("PEM data is not valid UTF-8".into()))
}
