//! Secure byte container with automatic zeroing on drop
//!
//! Holds file plaintext, decrypted output and serialized private keys. The
//! wrapper ensures that the bytes are:
//! 1. Zeroed when dropped, including after growing
//! 2. Not accidentally printed
//! 3. Locked in memory where possible (prevents swapping)

use std::ops::{Deref, DerefMut};
use zeroize::Zeroize;

/// A secure container for sensitive bytes that automatically zeroes on drop
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct SecureBytes(Vec<u8>);

impl SecureBytes {
    /// Create a new SecureBytes from a vector
    /// The original vector is consumed and its memory is now managed securely
    pub fn new(data: Vec<u8>) -> Self {
        let secure = Self(data);
        secure.lock_memory();
        secure
    }

    /// Create an empty SecureBytes with room for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(Vec::with_capacity(capacity))
    }

    /// Lock the whole allocation to prevent swapping (best effort, may fail without privileges)
    #[cfg(unix)]
    fn lock_memory(&self) {
        if self.0.capacity() == 0 {
            return;
        }
        unsafe {
            // mlock prevents the memory from being swapped to disk
            libc::mlock(self.0.as_ptr() as *const libc::c_void, self.0.capacity());
        }
    }

    #[cfg(not(unix))]
    fn lock_memory(&self) {
        // On non-Unix platforms, we rely on the OS not to swap
    }

    /// Append bytes
    ///
    /// Never lets `Vec` reallocate on its own: when the buffer is full the
    /// contents are moved into a larger locked allocation and the old one is
    /// zeroed.
    pub fn extend_from_slice(&mut self, data: &[u8]) {
        let needed = self.0.len() + data.len();
        if needed > self.0.capacity() {
            let mut grown = Vec::with_capacity(needed.max(self.0.capacity() * 2));
            grown.extend_from_slice(&self.0);
            let mut old = std::mem::replace(&mut self.0, grown);
            old.zeroize();
            self.lock_memory();
        }
        self.0.extend_from_slice(data);
    }

    /// Get the length of the secure bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Deref for SecureBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for SecureBytes {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

// Prevent accidental debug printing of secrets
impl std::fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureBytes")
            .field("len", &self.0.len())
            .field("data", &"[REDACTED]")
            .finish()
    }
}
