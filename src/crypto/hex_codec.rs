//! Hex text form of signatures
//!
//! Signatures are written as uppercase hex, matching existing `.sig` files.
//! Decoding accepts either case but nothing else: no whitespace, no
//! separators, no `0x` prefix.

use crate::error::{CryptoError, Result};

/// Encode bytes as uppercase hex
pub fn encode(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// Decode hex text
///
/// # Errors
/// `InvalidEncoding` on odd length or any character outside `[0-9a-fA-F]`.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    hex::decode(text).map_err(|e| CryptoError::InvalidEncoding(e.to_string()))
}
