//! The six file operations offered to callers
//!
//! `CryptoManager` holds key sizes and key file locations, nothing else.
//! Every call loads the keys it needs from disk, does its work in memory and
//! writes its output only once everything has succeeded. Errors never leave
//! this module: each operation logs the failure and returns `false`.

use std::fs::{self, File};
use std::path::Path;

use crate::config::{self, KeyPaths, Settings};
use crate::crypto::{dsa_signer, hex_codec, rsa_cipher, KeyKind, SecureBytes};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct CryptoManager {
    rsa_key_size: usize,
    dsa_key_size: usize,
    key_paths: KeyPaths,
}

impl CryptoManager {
    /// Create a manager using the default key file names in the working directory
    pub fn new(rsa_key_size: usize, dsa_key_size: usize) -> Self {
        Self {
            rsa_key_size,
            dsa_key_size,
            key_paths: KeyPaths::default(),
        }
    }

    /// Create a manager from a loaded settings file
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            rsa_key_size: settings.rsa.key_size,
            dsa_key_size: settings.dsa.key_size,
            key_paths: settings.key_paths(),
        }
    }

    /// Use explicit key file locations
    pub fn with_key_paths(mut self, key_paths: KeyPaths) -> Self {
        self.key_paths = key_paths;
        self
    }

    pub fn key_paths(&self) -> &KeyPaths {
        &self.key_paths
    }

    /// Generate and store a new RSA key pair, replacing any existing one
    pub fn generate_rsa_keys(&self) -> bool {
        report("RSA key generation", self.try_generate_rsa_keys())
    }

    /// Encrypt `input` with the stored RSA public key into `output`
    pub fn encrypt_rsa(&self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> bool {
        report(
            "RSA encryption",
            self.try_encrypt_rsa(input.as_ref(), output.as_ref()),
        )
    }

    /// Decrypt `input` with the stored RSA private key into `output`
    pub fn decrypt_rsa(&self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> bool {
        report(
            "RSA decryption",
            self.try_decrypt_rsa(input.as_ref(), output.as_ref()),
        )
    }

    /// Generate and store a new DSA key pair with fresh domain parameters
    pub fn generate_dsa_keys(&self) -> bool {
        report("DSA key generation", self.try_generate_dsa_keys())
    }

    /// Sign `input` with the stored DSA private key
    ///
    /// Returns `(true, hex_signature)` on success and `(false, "")` otherwise.
    pub fn sign_dsa(&self, input: impl AsRef<Path>) -> (bool, String) {
        match self.try_sign_dsa(input.as_ref()) {
            Ok(signature_hex) => (true, signature_hex),
            Err(e) => {
                tracing::error!(operation = "DSA signing", error = %e, "operation failed");
                (false, String::new())
            }
        }
    }

    /// Check a hex signature over `input` with the stored DSA public key
    ///
    /// `false` covers both "the signature does not match" and "could not
    /// check"; the log tells them apart.
    pub fn verify_dsa(&self, input: impl AsRef<Path>, signature_hex: &str) -> bool {
        match self.try_verify_dsa(input.as_ref(), signature_hex) {
            Ok(true) => true,
            Ok(false) => {
                tracing::info!(input = %input.as_ref().display(), "signature does not match");
                false
            }
            Err(e) => {
                tracing::error!(operation = "DSA verification", error = %e, "operation failed");
                false
            }
        }
    }

    fn try_generate_rsa_keys(&self) -> Result<()> {
        let pair = rsa_cipher::generate_keypair(self.rsa_key_size)?;
        config::save_keypair(&pair, &self.key_paths.rsa_public, &self.key_paths.rsa_private)?;

        tracing::info!(
            bits = self.rsa_key_size,
            public = %self.key_paths.rsa_public.display(),
            private = %self.key_paths.rsa_private.display(),
            "RSA key pair generated"
        );
        Ok(())
    }

    fn try_encrypt_rsa(&self, input: &Path, output: &Path) -> Result<()> {
        let public_key = config::load_key(KeyKind::RsaPublic, &self.key_paths.rsa_public)?;

        let plaintext = SecureBytes::new(fs::read(input)?);
        let ciphertext = rsa_cipher::encrypt(&public_key, &plaintext)?;
        config::write_file(output, &ciphertext, false)?;

        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            "file encrypted"
        );
        Ok(())
    }

    fn try_decrypt_rsa(&self, input: &Path, output: &Path) -> Result<()> {
        let private_key = config::load_key(KeyKind::RsaPrivate, &self.key_paths.rsa_private)?;

        let ciphertext = fs::read(input)?;
        let plaintext = rsa_cipher::decrypt(&private_key, &ciphertext)?;
        config::write_file(output, &plaintext, false)?;

        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            "file decrypted"
        );
        Ok(())
    }

    fn try_generate_dsa_keys(&self) -> Result<()> {
        let pair = dsa_signer::generate_keypair(self.dsa_key_size)?;
        config::save_keypair(&pair, &self.key_paths.dsa_public, &self.key_paths.dsa_private)?;

        tracing::info!(
            bits = self.dsa_key_size,
            public = %self.key_paths.dsa_public.display(),
            private = %self.key_paths.dsa_private.display(),
            "DSA key pair generated"
        );
        Ok(())
    }

    fn try_sign_dsa(&self, input: &Path) -> Result<String> {
        let private_key = config::load_key(KeyKind::DsaPrivate, &self.key_paths.dsa_private)?;

        let file = File::open(input)?;
        let signature = dsa_signer::sign(&private_key, file)?;

        tracing::info!(input = %input.display(), "file signed");
        Ok(hex_codec::encode(&signature))
    }

    fn try_verify_dsa(&self, input: &Path, signature_hex: &str) -> Result<bool> {
        let public_key = config::load_key(KeyKind::DsaPublic, &self.key_paths.dsa_public)?;

        let signature = hex_codec::decode(signature_hex)?;
        let file = File::open(input)?;
        dsa_signer::verify(&public_key, file, &signature)
    }
}

impl Default for CryptoManager {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Collapse an operation result into the boolean handed to callers
fn report(operation: &str, result: Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(operation, error = %e, "operation failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CryptoError;
    use std::fs::OpenOptions;
    use std::io::Write;
    use tempfile::TempDir;

    fn manager_in(dir: &TempDir) -> CryptoManager {
        CryptoManager::new(2048, 2048).with_key_paths(KeyPaths::in_dir(dir.path().join("keys")))
    }

    #[test]
    fn test_rsa_generate_encrypt_decrypt() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_in(&dir);

        assert!(manager.generate_rsa_keys());
        assert!(manager.key_paths().rsa_public.exists());
        assert!(manager.key_paths().rsa_private.exists());

        let hello = dir.path().join("hello.txt");
        let encrypted = dir.path().join("hello.enc");
        let decrypted = dir.path().join("hello.out");
        fs::write(&hello, b"Hello, World!\n").unwrap();

        assert!(manager.encrypt_rsa(&hello, &encrypted));
        assert!(manager.decrypt_rsa(&encrypted, &decrypted));
        assert_eq!(fs::read(&decrypted).unwrap(), fs::read(&hello).unwrap());
    }

    #[test]
    fn test_rsa_large_and_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_in(&dir);
        assert!(manager.generate_rsa_keys());

        let large: Vec<u8> = (0..5000u32).map(|i| (i * 7 % 256) as u8).collect();
        for (name, content) in [("large.bin", large), ("empty.bin", Vec::new())] {
            let input = dir.path().join(name);
            let encrypted = dir.path().join(format!("{name}.enc"));
            let decrypted = dir.path().join(format!("{name}.out"));
            fs::write(&input, &content).unwrap();

            assert!(manager.encrypt_rsa(&input, &encrypted));
            assert!(manager.decrypt_rsa(&encrypted, &decrypted));
            assert_eq!(fs::read(&decrypted).unwrap(), content);
        }
    }

    #[test]
    fn test_decrypt_before_keys_exist() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_in(&dir);

        let input = dir.path().join("hello.enc");
        let output = dir.path().join("hello.out");
        fs::write(&input, vec![0u8; 256]).unwrap();

        assert!(!manager.decrypt_rsa(&input, &output));
        assert!(matches!(
            manager.try_decrypt_rsa(&input, &output),
            Err(CryptoError::KeyNotFound(p)) if p == manager.key_paths().rsa_private
        ));
        assert!(!manager.encrypt_rsa(&input, &output));
        assert!(!output.exists());
    }

    #[test]
    fn test_decrypt_after_regeneration_fails() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_in(&dir);
        assert!(manager.generate_rsa_keys());

        let input = dir.path().join("secret.txt");
        let encrypted = dir.path().join("secret.enc");
        let output = dir.path().join("secret.out");
        fs::write(&input, b"attack at dawn").unwrap();
        assert!(manager.encrypt_rsa(&input, &encrypted));

        // Keys are reloaded on every call, so the new pair is used right away
        assert!(manager.generate_rsa_keys());
        assert!(!manager.decrypt_rsa(&encrypted, &output));
        assert!(!output.exists());
    }

    #[test]
    fn test_failed_regeneration_keeps_old_keys() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_in(&dir);
        assert!(manager.generate_rsa_keys());

        let paths = manager.key_paths();
        let old_private = fs::read(&paths.rsa_private).unwrap();
        fs::remove_file(&paths.rsa_public).unwrap();
        fs::create_dir(&paths.rsa_public).unwrap();

        assert!(!manager.generate_rsa_keys());
        assert_eq!(fs::read(&paths.rsa_private).unwrap(), old_private);
    }

    #[test]
    fn test_decrypt_garbage_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_in(&dir);
        assert!(manager.generate_rsa_keys());

        let output = dir.path().join("garbage.out");
        for (name, content) in [("short.enc", vec![1u8; 17]), ("block.enc", vec![1u8; 256])] {
            let input = dir.path().join(name);
            fs::write(&input, content).unwrap();

            assert!(!manager.decrypt_rsa(&input, &output));
            assert!(!output.exists());
        }
    }

    #[test]
    fn test_missing_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_in(&dir);
        assert!(manager.generate_rsa_keys());

        let missing = dir.path().join("missing.txt");
        let output = dir.path().join("out.bin");

        assert!(!manager.encrypt_rsa(&missing, &output));
        assert!(!output.exists());
    }

    #[test]
    fn test_invalid_key_sizes_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let manager = CryptoManager::new(1024, 1024)
            .with_key_paths(KeyPaths::in_dir(dir.path()));

        assert!(!manager.generate_rsa_keys());
        assert!(!manager.generate_dsa_keys());

        for kind in KeyKind::ALL {
            assert!(!manager.key_paths().get(kind).exists());
        }
    }

    #[test]
    fn test_dsa_sign_verify() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_in(&dir);

        assert!(manager.generate_dsa_keys());
        assert!(manager.key_paths().dsa_public.exists());
        assert!(manager.key_paths().dsa_private.exists());

        let doc = dir.path().join("doc.txt");
        fs::write(&doc, b"Contract text, version 1").unwrap();

        let (signed, signature_hex) = manager.sign_dsa(&doc);
        assert!(signed);
        assert!(signature_hex.starts_with("30"));
        assert!(manager.verify_dsa(&doc, &signature_hex));

        // Lowercase hex is accepted too
        assert!(manager.verify_dsa(&doc, &signature_hex.to_lowercase()));

        // Append one byte
        let mut file = OpenOptions::new().append(true).open(&doc).unwrap();
        file.write_all(b"!").unwrap();
        drop(file);

        assert!(!manager.verify_dsa(&doc, &signature_hex));
    }

    #[test]
    fn test_dsa_bad_signature_text() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_in(&dir);
        assert!(manager.generate_dsa_keys());

        let doc = dir.path().join("doc.txt");
        fs::write(&doc, b"Some document").unwrap();
        let (_, signature_hex) = manager.sign_dsa(&doc);

        let odd = &signature_hex[..signature_hex.len() - 1];
        let not_hex = format!("{}ZZ", &signature_hex[..signature_hex.len() - 2]);
        let truncated = &signature_hex[..signature_hex.len() - 2];

        for bad in [odd, not_hex.as_str(), truncated, ""] {
            assert!(!manager.verify_dsa(&doc, bad));
        }
    }

    #[test]
    fn test_sign_without_keys() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_in(&dir);

        let doc = dir.path().join("doc.txt");
        fs::write(&doc, b"Some document").unwrap();

        assert_eq!(manager.sign_dsa(&doc), (false, String::new()));
        assert!(!manager.verify_dsa(&doc, "3006020101020101"));
    }

    #[test]
    fn test_sign_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_in(&dir);
        assert!(manager.generate_dsa_keys());

        let (signed, signature_hex) = manager.sign_dsa(dir.path().join("missing.txt"));
        assert!(!signed);
        assert!(signature_hex.is_empty());
    }

    #[test]
    fn test_wrong_algorithm_in_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_in(&dir);
        assert!(manager.generate_rsa_keys());

        // RSA keys where the DSA keys should be
        let paths = manager.key_paths();
        fs::copy(&paths.rsa_private, &paths.dsa_private).unwrap();
        fs::copy(&paths.rsa_public, &paths.dsa_public).unwrap();

        let doc = dir.path().join("doc.txt");
        fs::write(&doc, b"Some document").unwrap();

        assert!(!manager.sign_dsa(&doc).0);
        assert!(!manager.verify_dsa(&doc, "3006020101020101"));
    }

    #[test]
    fn test_from_settings() {
        let mut settings = Settings::default();
        settings.rsa.key_size = 3072;
        settings.key_dir = "/srv/keys".into();

        let manager = CryptoManager::from_settings(&settings);

        assert_eq!(manager.rsa_key_size, 3072);
        assert_eq!(manager.dsa_key_size, 2048);
        assert_eq!(manager.key_paths(), &KeyPaths::in_dir("/srv/keys"));
    }
}
