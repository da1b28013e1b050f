//! Cryptographic primitives for crypto-manager
//!
//! This module provides:
//! - RSA-OAEP (SHA-256) for file encryption
//! - DSA over SHA-256 for file signatures
//! - Hex text form of signatures
//! - Secure memory handling with automatic zeroing

pub mod dsa_signer;
pub mod hex_codec;
mod keys;
pub mod rsa_cipher;
mod secure_bytes;

pub use keys::{KeyKind, KeyMaterial, KeyPair};
pub use secure_bytes::SecureBytes;
