//! Crypto Manager - RSA file encryption and DSA file signatures
//!
//! This crate provides:
//! - RSA-OAEP (SHA-256) encryption and decryption of whole files
//! - DSA signing of files with hex-encoded signatures
//! - Key pairs stored as DER files, reloaded on every operation
//! - A facade whose operations report plain success/failure and never panic
//!   or return errors to the caller

pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod manager;

pub use error::{CryptoError, Result};
pub use manager::CryptoManager;
