//! AES-256-GCM encryption with a trailing nonce.

use std::fmt;
use std::sync::Arc;

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};

use warden_core::error::AppError;

use crate::secrets::SecretStore;

/// Length in bytes of the per-message nonce appended to ciphertexts.
pub const NONCE_LEN: usize = 12;

/// Reversible encryption keyed by the configured cipher key.
///
/// Output layout is `ciphertext || tag || nonce`; a fresh random nonce is
/// drawn for every call.
#[derive(Clone)]
pub struct SymmetricCipher {
    cipher: Aes256Gcm,
}

impl SymmetricCipher {
    /// Creates a cipher from the shared key material.
    pub fn new(secrets: &Arc<SecretStore>) -> Result<Self, AppError> {
        let cipher = Aes256Gcm::new_from_slice(secrets.cipher_key())
            .map_err(|e| AppError::crypto(format!("Failed to create cipher: {e}")))?;
        Ok(Self { cipher })
    }

    /// Encrypts `plain`, appending the nonce.
    pub fn encrypt(&self, plain: &[u8]) -> Result<Vec<u8>, AppError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let mut buf = self
            .cipher
            .encrypt(&nonce, plain)
            .map_err(|e| AppError::crypto(format!("Encryption failed: {e}")))?;
        buf.extend_from_slice(nonce.as_slice());
        Ok(buf)
    }

    /// Splits the trailing nonce off `buf` and decrypts the rest.
    pub fn decrypt(&self, buf: &[u8]) -> Result<Vec<u8>, AppError> {
        if buf.len() < NONCE_LEN {
            return Err(AppError::crypto("Ciphertext too short"));
        }
        let (ciphertext, nonce) = buf.split_at(buf.len() - NONCE_LEN);
        self.cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|e| AppError::crypto(format!("Decryption failed: {e}")))
    }
}

impl fmt::Debug for SymmetricCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricCipher").finish_non_exhaustive()
    }
}
