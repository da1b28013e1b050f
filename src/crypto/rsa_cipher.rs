//! RSA-OAEP encryption
//!
//! OAEP with SHA-256 for both the label hash and the MGF1 mask. A single
//! OAEP block holds at most `k - 2*32 - 2` bytes of plaintext (190 bytes for
//! a 2048-bit key), so longer inputs are split into chunks and each chunk is
//! encrypted into one full `k`-byte block:
//!
//! [k bytes: block 1][k bytes: block 2]...[k bytes: block N]
//!
//! Empty plaintext still produces one block, so every valid ciphertext is a
//! non-zero multiple of `k` bytes.

use rand::rngs::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey};
use sha2::Sha256;
use zeroize::Zeroizing;

use super::{KeyKind, KeyMaterial, KeyPair, SecureBytes};
use crate::error::{CryptoError, Result};

/// Smallest modulus accepted for new keys
pub const MIN_KEY_BITS: usize = 2048;

/// Largest modulus the public key loader accepts
pub const MAX_KEY_BITS: usize = 4096;

/// SHA-256 output length
const HASH_LEN: usize = 32;

/// Plaintext bytes carried by one OAEP block for a modulus of `block_len` bytes
pub fn max_chunk_len(block_len: usize) -> usize {
    block_len.saturating_sub(2 * HASH_LEN + 2)
}

fn padding() -> Oaep {
    Oaep::new::<Sha256>()
}

/// Generate a new RSA key pair with a modulus of `bits` bits
pub fn generate_keypair(bits: usize) -> Result<KeyPair> {
    if !(MIN_KEY_BITS..=MAX_KEY_BITS).contains(&bits) {
        return Err(CryptoError::Parameter(format!(
            "RSA key size must be between {} and {} bits, got {}",
            MIN_KEY_BITS, MAX_KEY_BITS, bits
        )));
    }

    let private_key = RsaPrivateKey::new(&mut OsRng, bits)
        .map_err(|e| CryptoError::Parameter(e.to_string()))?;

    Ok(KeyPair::from_rsa(private_key))
}

/// Encrypt `plaintext` with an RSA public key
///
/// # Errors
/// - `KeyMismatch` if `key` is anything but an RSA public key
/// - `CryptoOperation` if a block fails to encrypt
pub fn encrypt(key: &KeyMaterial, plaintext: &[u8]) -> Result<Vec<u8>> {
    let public_key = match key {
        KeyMaterial::RsaPublic(public_key) => public_key,
        other => return Err(other.mismatch(KeyKind::RsaPublic)),
    };

    let block_len = public_key.size();
    let chunk_len = max_chunk_len(block_len);
    if chunk_len == 0 {
        return Err(CryptoError::CryptoOperation);
    }

    let blocks = plaintext.len().div_ceil(chunk_len).max(1);
    let mut ciphertext = Vec::with_capacity(blocks * block_len);

    for index in 0..blocks {
        let start = index * chunk_len;
        let end = usize::min(start + chunk_len, plaintext.len());

        let block = public_key
            .encrypt(&mut OsRng, padding(), &plaintext[start..end])
            .map_err(|_| CryptoError::CryptoOperation)?;
        debug_assert_eq!(block.len(), block_len);

        ciphertext.extend_from_slice(&block);
    }

    tracing::debug!(
        plaintext_len = plaintext.len(),
        blocks,
        "RSA-OAEP encryption done"
    );

    Ok(ciphertext)
}

/// Decrypt `ciphertext` with an RSA private key
///
/// Every way the ciphertext can be wrong (bad length, a value outside the
/// modulus, broken padding, a different key) produces the same
/// `CryptoOperation` error, and all blocks are processed before it is
/// returned.
///
/// # Errors
/// - `KeyMismatch` if `key` is anything but an RSA private key
/// - `CryptoOperation` for any problem with the ciphertext itself
pub fn decrypt(key: &KeyMaterial, ciphertext: &[u8]) -> Result<SecureBytes> {
    let private_key = match key {
        KeyMaterial::RsaPrivate(private_key) => private_key,
        other => return Err(other.mismatch(KeyKind::RsaPrivate)),
    };

    let block_len = private_key.size();
    if ciphertext.is_empty() || ciphertext.len() % block_len != 0 {
        return Err(CryptoError::CryptoOperation);
    }

    let blocks = ciphertext.len() / block_len;
    let mut plaintext = SecureBytes::with_capacity(blocks * max_chunk_len(block_len));
    let mut failed = false;

    for block in ciphertext.chunks(block_len) {
        match private_key.decrypt_blinded(&mut OsRng, padding(), block) {
            Ok(chunk) => plaintext.extend_from_slice(&Zeroizing::new(chunk)),
            Err(_) => failed = true,
        }
    }

    if failed {
        return Err(CryptoError::CryptoOperation);
    }

    Ok(plaintext)
}

#[cfg(test)]
pub(crate) fn test_keypair() -> &'static KeyPair {
    use std::sync::OnceLock;

    static KEYPAIR: OnceLock<KeyPair> = OnceLock::new();
    KEYPAIR.get_or_init(|| generate_keypair(MIN_KEY_BITS).unwrap())
}
