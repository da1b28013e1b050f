//! DSA signatures over SHA-256
//!
//! Each key pair gets its own freshly generated domain parameters (p, q, g).
//! Signing draws a new random per-signature secret from the OS RNG every
//! time, so signing the same file twice gives two different signatures that
//! both verify.
//!
//! Signature encoding is DER: `SEQUENCE { r INTEGER, s INTEGER }`.

use std::io::{self, Read};

use dsa::{Components, KeySize, SigningKey};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use signature::{DigestVerifier, RandomizedDigestSigner, SignatureEncoding};

use super::{KeyKind, KeyMaterial, KeyPair};
use crate::error::{CryptoError, Result};

/// Prime sizes accepted for new keys, in bits
pub const SUPPORTED_KEY_BITS: [usize; 2] = [2048, 3072];

fn key_size(bits: usize) -> Result<KeySize> {
    match bits {
        2048 => Ok(KeySize::DSA_2048_256),
        3072 => Ok(KeySize::DSA_3072_256),
        _ => Err(CryptoError::Parameter(format!(
            "DSA key size must be one of {:?} bits, got {}",
            SUPPORTED_KEY_BITS, bits
        ))),
    }
}

/// Generate domain parameters and a key pair with a `bits`-bit prime modulus
pub fn generate_keypair(bits: usize) -> Result<KeyPair> {
    let size = key_size(bits)?;

    let components = Components::generate(&mut OsRng, size);
    let signing_key = SigningKey::generate(&mut OsRng, components);

    Ok(KeyPair::from_dsa(signing_key))
}

/// Read the whole message into a SHA-256 state
fn hash_message(message: &mut impl Read) -> io::Result<Sha256> {
    let mut hasher = Sha256::new();
    io::copy(message, &mut hasher)?;
    Ok(hasher)
}

/// Sign everything readable from `message`
///
/// Returns the DER-encoded signature.
///
/// # Errors
/// - `KeyMismatch` if `key` is anything but a DSA private key
/// - `Io` if `message` fails before end of stream
pub fn sign<R: Read>(key: &KeyMaterial, mut message: R) -> Result<Vec<u8>> {
    let signing_key = match key {
        KeyMaterial::DsaPrivate(signing_key) => signing_key,
        other => return Err(other.mismatch(KeyKind::DsaPrivate)),
    };

    let digest = hash_message(&mut message)?;

    let signature: dsa::Signature = signing_key
        .try_sign_digest_with_rng(&mut OsRng, digest)
        .map_err(|_| CryptoError::CryptoOperation)?;

    Ok(signature.to_vec())
}

/// Check a DER-encoded signature over everything readable from `message`
///
/// A signature that parses but does not match the message or the key is a
/// normal `Ok(false)`.
///
/// # Errors
/// - `KeyMismatch` if `key` is anything but a DSA public key
/// - `MalformedSignature` if `signature` is not a DER `(r, s)` pair
/// - `Io` if `message` fails before end of stream
pub fn verify<R: Read>(key: &KeyMaterial, mut message: R, signature: &[u8]) -> Result<bool> {
    let verifying_key = match key {
        KeyMaterial::DsaPublic(verifying_key) => verifying_key,
        other => return Err(other.mismatch(KeyKind::DsaPublic)),
    };

    let signature =
        dsa::Signature::try_from(signature).map_err(|_| CryptoError::MalformedSignature)?;

    let digest = hash_message(&mut message)?;

    Ok(verifying_key.verify_digest(digest, &signature).is_ok())
}

#[cfg(test)]
pub(crate) fn test_keypair() -> &'static KeyPair {
    use std::sync::OnceLock;

    static KEYPAIR: OnceLock<KeyPair> = OnceLock::new();
    KEYPAIR.get_or_init(|| generate_keypair(2048).unwrap())
}
