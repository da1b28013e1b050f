//! Key material shared by the RSA cipher, the DSA signer and the key store
//!
//! Every key the crate handles is one of four variants. The variant tag is
//! what the key store asks for when loading and what the cipher/signer check
//! before using a key, so handing an RSA key to the signer (or a public key
//! to `decrypt`) is reported as a mismatch instead of failing deep inside
//! the primitive.
//!
//! Serialized form:
//! - private keys: PKCS#8 `PrivateKeyInfo`, DER
//! - public keys: X.509 `SubjectPublicKeyInfo`, DER

use std::fmt;

use pkcs8::spki::{DecodePublicKey, EncodePublicKey};
use pkcs8::{DecodePrivateKey, EncodePrivateKey};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};

use super::SecureBytes;
use crate::error::{CryptoError, Result};

/// The closed set of key variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    RsaPublic,
    RsaPrivate,
    DsaPublic,
    DsaPrivate,
}

impl KeyKind {
    pub const ALL: [KeyKind; 4] = [
        KeyKind::RsaPublic,
        KeyKind::RsaPrivate,
        KeyKind::DsaPublic,
        KeyKind::DsaPrivate,
    ];

    pub fn is_private(self) -> bool {
        matches!(self, KeyKind::RsaPrivate | KeyKind::DsaPrivate)
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyKind::RsaPublic => "RSA public key",
            KeyKind::RsaPrivate => "RSA private key",
            KeyKind::DsaPublic => "DSA public key",
            KeyKind::DsaPrivate => "DSA private key",
        };
        f.write_str(name)
    }
}

/// A single RSA or DSA key, public or private
///
/// Private variants zeroize their numbers on drop (both `RsaPrivateKey` and
/// `dsa::SigningKey` implement `ZeroizeOnDrop`).
pub enum KeyMaterial {
    RsaPublic(RsaPublicKey),
    RsaPrivate(RsaPrivateKey),
    DsaPublic(dsa::VerifyingKey),
    DsaPrivate(dsa::SigningKey),
}

impl KeyMaterial {
    pub fn kind(&self) -> KeyKind {
        match self {
            KeyMaterial::RsaPublic(_) => KeyKind::RsaPublic,
            KeyMaterial::RsaPrivate(_) => KeyKind::RsaPrivate,
            KeyMaterial::DsaPublic(_) => KeyKind::DsaPublic,
            KeyMaterial::DsaPrivate(_) => KeyKind::DsaPrivate,
        }
    }

    /// Size of the RSA modulus or the DSA prime `p`, in bits
    pub fn bits(&self) -> usize {
        match self {
            KeyMaterial::RsaPublic(key) => key.n().bits(),
            KeyMaterial::RsaPrivate(key) => key.n().bits(),
            KeyMaterial::DsaPublic(key) => key.components().p().bits(),
            KeyMaterial::DsaPrivate(key) => key.verifying_key().components().p().bits(),
        }
    }

    /// Serialize to DER
    pub fn to_der(&self) -> Result<SecureBytes> {
        let der = match self {
            KeyMaterial::RsaPublic(key) => public_der(key.to_public_key_der())?,
            KeyMaterial::RsaPrivate(key) => private_der(key.to_pkcs8_der())?,
            KeyMaterial::DsaPublic(key) => public_der(key.to_public_key_der())?,
            KeyMaterial::DsaPrivate(key) => private_der(key.to_pkcs8_der())?,
        };
        Ok(der)
    }

    /// Parse DER bytes as the requested kind
    ///
    /// Returns `None` when the bytes are not a valid encoding of that kind,
    /// including a valid key of some other kind. The caller decides how to
    /// report it; the parser error itself is not surfaced.
    pub fn from_der(kind: KeyKind, der: &[u8]) -> Option<Self> {
        match kind {
            KeyKind::RsaPublic => RsaPublicKey::from_public_key_der(der)
                .ok()
                .map(KeyMaterial::RsaPublic),
            KeyKind::RsaPrivate => RsaPrivateKey::from_pkcs8_der(der)
                .ok()
                .map(KeyMaterial::RsaPrivate),
            KeyKind::DsaPublic => dsa::VerifyingKey::from_public_key_der(der)
                .ok()
                .map(KeyMaterial::DsaPublic),
            KeyKind::DsaPrivate => dsa::SigningKey::from_pkcs8_der(der)
                .ok()
                .map(KeyMaterial::DsaPrivate),
        }
    }

    pub(crate) fn mismatch(&self, expected: KeyKind) -> CryptoError {
        CryptoError::KeyMismatch {
            expected,
            actual: self.kind(),
        }
    }
}

fn public_der(encoded: pkcs8::spki::Result<pkcs8::Document>) -> Result<SecureBytes> {
    encoded
        .map(|doc| SecureBytes::new(doc.as_bytes().to_vec()))
        .map_err(|_| CryptoError::CryptoOperation)
}

fn private_der(encoded: pkcs8::Result<pkcs8::SecretDocument>) -> Result<SecureBytes> {
    encoded
        .map(|doc| SecureBytes::new(doc.as_bytes().to_vec()))
        .map_err(|_| CryptoError::CryptoOperation)
}

// Never print key numbers
impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("kind", &self.kind())
            .field("bits", &self.bits())
            .finish()
    }
}

/// A matched public/private key pair produced by key generation
///
/// The public half is always derived from the private half, never generated
/// independently.
#[derive(Debug)]
pub struct KeyPair {
    public: KeyMaterial,
    private: KeyMaterial,
}

impl KeyPair {
    /// Build the pair from an RSA private key
    pub fn from_rsa(private_key: RsaPrivateKey) -> Self {
        let public_key = private_key.to_public_key();
        Self {
            public: KeyMaterial::RsaPublic(public_key),
            private: KeyMaterial::RsaPrivate(private_key),
        }
    }

    /// Build the pair from a DSA private key
    pub fn from_dsa(signing_key: dsa::SigningKey) -> Self {
        let verifying_key = signing_key.verifying_key().clone();
        Self {
            public: KeyMaterial::DsaPublic(verifying_key),
            private: KeyMaterial::DsaPrivate(signing_key),
        }
    }

    pub fn public_key(&self) -> &KeyMaterial {
        &self.public
    }

    pub fn private_key(&self) -> &KeyMaterial {
        &self.private
    }
}
