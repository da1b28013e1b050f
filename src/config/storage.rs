//! Хранилище ключей на диске
//!
//! Один файл на ключ, DER без дополнительных заголовков:
//! - приватные ключи: PKCS#8 `PrivateKeyInfo`
//! - публичные ключи: X.509 `SubjectPublicKeyInfo`
//!
//! Ключи никогда не кэшируются: каждая операция читает файл заново.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::crypto::{KeyKind, KeyMaterial, KeyPair, SecureBytes};
use crate::error::{CryptoError, Result};

pub const RSA_PUBLIC_KEY_FILE: &str = "rsa_public.key";
pub const RSA_PRIVATE_KEY_FILE: &str = "rsa_private.key";
pub const DSA_PUBLIC_KEY_FILE: &str = "dsa_public.key";
pub const DSA_PRIVATE_KEY_FILE: &str = "dsa_private.key";

/// Where each of the four keys lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPaths {
    pub rsa_public: PathBuf,
    pub rsa_private: PathBuf,
    pub dsa_public: PathBuf,
    pub dsa_private: PathBuf,
}

impl KeyPaths {
    /// The default file names inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            rsa_public: dir.join(RSA_PUBLIC_KEY_FILE),
            rsa_private: dir.join(RSA_PRIVATE_KEY_FILE),
            dsa_public: dir.join(DSA_PUBLIC_KEY_FILE),
            dsa_private: dir.join(DSA_PRIVATE_KEY_FILE),
        }
    }

    /// Path of the file holding `kind`
    pub fn get(&self, kind: KeyKind) -> &Path {
        match kind {
            KeyKind::RsaPublic => &self.rsa_public,
            KeyKind::RsaPrivate => &self.rsa_private,
            KeyKind::DsaPublic => &self.dsa_public,
            KeyKind::DsaPrivate => &self.dsa_private,
        }
    }
}

impl Default for KeyPaths {
    /// Default file names in the working directory
    fn default() -> Self {
        Self::in_dir("")
    }
}

/// Write `data` to `path`, replacing whatever was there
///
/// The data goes to a temporary file next to `path` first and is renamed
/// into place, so a failed write leaves the old content (or nothing) behind.
/// Missing parent directories are created. With `restricted` set the file
/// is readable by the owner only (Unix).
pub fn write_file(path: &Path, data: &[u8], restricted: bool) -> Result<()> {
    let staged = stage(path, data, restricted)?;
    commit(&staged, path)
}

/// Hidden sibling of `path`: `dir/name` becomes `dir/.name<suffix>`
fn sibling(path: &Path, suffix: &str) -> io::Result<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(ErrorKind::InvalidInput, "path has no file name"))?;
    let mut name = OsString::from(".");
    name.push(file_name);
    name.push(suffix);
    Ok(path.with_file_name(name))
}

/// Write `data` to a synced temporary file next to `path` and return its path
fn stage(path: &Path, data: &[u8], restricted: bool) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = sibling(path, ".tmp")?;
    if let Err(e) = write_new(&tmp_path, data, restricted) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(tmp_path)
}

/// Rename a staged file over `path`, dropping the staged file on failure
fn commit(staged: &Path, path: &Path) -> Result<()> {
    if let Err(e) = fs::rename(staged, path) {
        let _ = fs::remove_file(staged);
        return Err(e.into());
    }
    Ok(())
}

fn write_new(path: &Path, data: &[u8], restricted: bool) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        if restricted {
            options.mode(0o600);
        }
    }

    let mut file: File = options.open(path)?;

    // mode() only applies to newly created files
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if restricted {
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }
    }

    file.write_all(data)?;
    file.sync_all()?;
    Ok(())
}

/// Serialize `key` and write it to `path`
pub fn save_key(key: &KeyMaterial, path: &Path) -> Result<()> {
    let der = key.to_der()?;
    write_file(path, &der, key.kind().is_private())?;

    tracing::debug!(kind = %key.kind(), path = %path.display(), "key saved");
    Ok(())
}

/// Save both halves of a freshly generated pair
///
/// Either both files end up holding the new pair or both keep their old
/// content. Both halves are written and synced to temporary files before
/// anything is replaced; the old private key is set aside until the public
/// key is in place and is put back if that fails.
pub fn save_keypair(pair: &KeyPair, public_path: &Path, private_path: &Path) -> Result<()> {
    let public_der = pair.public_key().to_der()?;
    let private_der = pair.private_key().to_der()?;

    let private_staged = stage(private_path, &private_der, true)?;
    let public_staged = match stage(public_path, &public_der, false) {
        Ok(staged) => staged,
        Err(e) => {
            let _ = fs::remove_file(&private_staged);
            return Err(e);
        }
    };

    let backup = sibling(private_path, ".bak")?;
    let had_private = match fs::rename(private_path, &backup) {
        Ok(()) => true,
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(e) => {
            let _ = fs::remove_file(&private_staged);
            let _ = fs::remove_file(&public_staged);
            return Err(e.into());
        }
    };

    let result = commit(&private_staged, private_path).and_then(|()| {
        commit(&public_staged, public_path).map_err(|e| {
            let _ = fs::remove_file(private_path);
            e
        })
    });

    match result {
        Ok(()) => {
            if had_private {
                let _ = fs::remove_file(&backup);
            }
        }
        Err(e) => {
            let _ = fs::remove_file(&private_staged);
            let _ = fs::remove_file(&public_staged);
            if had_private {
                let _ = fs::rename(&backup, private_path);
            }
            tracing::warn!(
                public = %public_path.display(),
                private = %private_path.display(),
                "key pair not saved, previous keys kept"
            );
            return Err(e);
        }
    }

    tracing::debug!(
        public = %public_path.display(),
        private = %private_path.display(),
        "key pair saved"
    );
    Ok(())
}

/// Read the key of the given kind from `path`
///
/// # Errors
/// - `KeyNotFound` if there is no file at `path`
/// - `KeyCorrupt` if the file is not a valid encoding of `kind`
/// - `Io` for any other read failure
pub fn load_key(kind: KeyKind, path: &Path) -> Result<KeyMaterial> {
    let der = match fs::read(path) {
        Ok(data) => SecureBytes::new(data),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(CryptoError::KeyNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(CryptoError::Io(e)),
    };

    let key = KeyMaterial::from_der(kind, &der)
        .ok_or_else(|| CryptoError::KeyCorrupt(path.to_path_buf()))?;

    tracing::debug!(kind = %kind, bits = key.bits(), path = %path.display(), "key loaded");
    Ok(key)
}
