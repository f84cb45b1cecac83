//! Process-wide key material.
//!
//! Keys are decoded from base64 configuration exactly once, validated, and
//! shared immutably (`Arc<SecretStore>`). They are zeroized on drop and
//! never printed.

use std::fmt;

use aes_gcm::aead::OsRng;
use aes_gcm::aead::rand_core::RngCore;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use zeroize::Zeroizing;

use warden_core::config::SecretsConfig;
use warden_core::error::AppError;

/// Exact length of the symmetric cipher key.
pub const CIPHER_KEY_LEN: usize = 32;

/// Minimum length of the signing and hashing keys.
pub const MIN_KEY_LEN: usize = 32;

/// Length of keys produced by [`generate_config`] for signing and hashing.
const GENERATED_KEY_LEN: usize = 64;

/// Immutable key material: token-signing, cipher and password-hashing keys.
pub struct SecretStore {
    jwt: Zeroizing<Vec<u8>>,
    aes: Zeroizing<[u8; CIPHER_KEY_LEN]>,
    hmac: Zeroizing<Vec<u8>>,
}

impl SecretStore {
    /// Decodes and validates the configured keys.
    pub fn from_config(config: &SecretsConfig) -> Result<Self, AppError> {
        let jwt = decode_key("jwt", &config.jwt)?;
        let hmac = decode_key("hmac", &config.hmac)?;
        let aes = decode_key("aes", &config.aes)?;

        for (name, key) in [("jwt", &jwt), ("hmac", &hmac)] {
            if key.len() < MIN_KEY_LEN {
                return Err(AppError::configuration(format!(
                    "secrets.{name} must decode to at least {MIN_KEY_LEN} bytes, got {}",
                    key.len()
                )));
            }
        }

        let aes: [u8; CIPHER_KEY_LEN] = aes.as_slice().try_into().map_err(|_| {
            AppError::configuration(format!(
                "secrets.aes must decode to exactly {CIPHER_KEY_LEN} bytes, got {}",
                aes.len()
            ))
        })?;

        Ok(Self {
            jwt,
            aes: Zeroizing::new(aes),
            hmac,
        })
    }

    /// Token-signing key.
    pub fn jwt_key(&self) -> &[u8] {
        &self.jwt
    }

    /// Symmetric cipher key.
    pub fn cipher_key(&self) -> &[u8; CIPHER_KEY_LEN] {
        &self.aes
    }

    /// Password-hashing key.
    pub fn hash_key(&self) -> &[u8] {
        &self.hmac
    }
}

impl fmt::Debug for SecretStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretStore")
            .field("jwt", &"<redacted>")
            .field("aes", &"<redacted>")
            .field("hmac", &"<redacted>")
            .finish()
    }
}

/// Produces a fresh random [`SecretsConfig`] from the operating system RNG.
pub fn generate_config() -> SecretsConfig {
    SecretsConfig {
        jwt: random_key(GENERATED_KEY_LEN),
        aes: random_key(CIPHER_KEY_LEN),
        hmac: random_key(GENERATED_KEY_LEN),
    }
}

fn random_key(len: usize) -> String {
    let mut key = Zeroizing::new(vec![0u8; len]);
    OsRng.fill_bytes(&mut key);
    STANDARD.encode(key.as_slice())
}

fn decode_key(name: &str, encoded: &str) -> Result<Zeroizing<Vec<u8>>, AppError> {
    if encoded.trim().is_empty() {
        return Err(AppError::configuration(format!("secrets.{name} is not set")));
    }
    STANDARD
        .decode(encoded.trim())
        .map(Zeroizing::new)
        .map_err(|e| AppError::configuration(format!("secrets.{name} is not valid base64: {e}")))
}
