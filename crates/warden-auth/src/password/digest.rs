//! HMAC-SHA512 password digests.

use std::sync::Arc;

use hmac::{Hmac, Mac};
use sha2::Sha512;

use warden_core::error::AppError;

use crate::secrets::SecretStore;

type HmacSha512 = Hmac<Sha512>;

/// Length in bytes of a password digest.
pub const DIGEST_LEN: usize = 64;

/// One-way keyed digest for password storage.
///
/// The digest is deterministic for a given key; comparison is constant time.
#[derive(Debug, Clone)]
pub struct PasswordDigest {
    secrets: Arc<SecretStore>,
}

impl PasswordDigest {
    /// Creates a digest keyed by the configured hash key.
    pub fn new(secrets: Arc<SecretStore>) -> Self {
        Self { secrets }
    }

    /// Computes the digest of `plain`.
    pub fn sum(&self, plain: &[u8]) -> Result<Vec<u8>, AppError> {
        let mut mac = self.mac()?;
        mac.update(plain);
        Ok(mac.finalize().into_bytes().to_vec())
    }

    /// Returns whether `digest` is the digest of `plain`.
    pub fn verify(&self, plain: &[u8], digest: &[u8]) -> bool {
        match self.mac() {
            Ok(mut mac) => {
                mac.update(plain);
                mac.verify_slice(digest).is_ok()
            }
            Err(_) => false,
        }
    }

    fn mac(&self) -> Result<HmacSha512, AppError> {
        HmacSha512::new_from_slice(self.secrets.hash_key())
            .map_err(|e| AppError::crypto(format!("Invalid password hash key: {e}")))
    }
}
