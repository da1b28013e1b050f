//! Settings file
//!
//! ```json
//! {
//!   "rsa": { "key_size": 2048 },
//!   "dsa": { "key_size": 2048 },
//!   "key_dir": "."
//! }
//! ```
//!
//! Every field is optional. A missing file means all defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::KeyPaths;
use crate::error::Result;

pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Key size used when the settings file does not name one
pub const DEFAULT_KEY_SIZE: usize = 2048;

/// Per-algorithm settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgorithmSettings {
    /// RSA modulus or DSA prime size in bits
    pub key_size: usize,
}

impl Default for AlgorithmSettings {
    fn default() -> Self {
        Self {
            key_size: DEFAULT_KEY_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub rsa: AlgorithmSettings,
    pub dsa: AlgorithmSettings,
    /// Directory holding the four key files
    pub key_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rsa: AlgorithmSettings::default(),
            dsa: AlgorithmSettings::default(),
            key_dir: PathBuf::from("."),
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;

        tracing::debug!(
            path = %path.display(),
            rsa_key_size = settings.rsa.key_size,
            dsa_key_size = settings.dsa.key_size,
            "settings loaded"
        );
        Ok(settings)
    }

    /// Key file locations inside `key_dir`
    pub fn key_paths(&self) -> KeyPaths {
        KeyPaths::in_dir(&self.key_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CryptoError;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join(DEFAULT_CONFIG_FILE)).unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.rsa.key_size, 2048);
        assert_eq!(settings.dsa.key_size, 2048);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, r#"{ "rsa": { "key_size": 3072 } }"#).unwrap();

        let settings = Settings::load(&path).unwrap();

        assert_eq!(settings.rsa.key_size, 3072);
        assert_eq!(settings.dsa.key_size, DEFAULT_KEY_SIZE);
        assert_eq!(settings.key_dir, PathBuf::from("."));
    }

    #[test]
    fn test_full_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(
            &path,
            r#"{ "rsa": { "key_size": 4096 }, "dsa": { "key_size": 3072 }, "key_dir": "/srv/keys" }"#,
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();

        assert_eq!(settings.rsa.key_size, 4096);
        assert_eq!(settings.dsa.key_size, 3072);
        assert_eq!(
            settings.key_paths().dsa_public,
            PathBuf::from("/srv/keys/dsa_public.key")
        );
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);

        for content in ["{ not json", r#"{ "rsa": { "key_size": -1 } }"#] {
            fs::write(&path, content).unwrap();
            assert!(matches!(Settings::load(&path), Err(CryptoError::Json(_))));
        }
    }
}
