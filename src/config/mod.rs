//! Configuration and on-disk storage for crypto-manager
//!
//! Handles:
//! - The settings file (key sizes, key directory)
//! - Reading and writing the four key files

mod settings;
mod storage;

pub use settings::{AlgorithmSettings, Settings, DEFAULT_CONFIG_FILE, DEFAULT_KEY_SIZE};
pub use storage::{
    load_key, save_key, save_keypair, write_file, KeyPaths, DSA_PRIVATE_KEY_FILE,
    DSA_PUBLIC_KEY_FILE, RSA_PRIVATE_KEY_FILE, RSA_PUBLIC_KEY_FILE,
};
