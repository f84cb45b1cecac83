//! Key material configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Base64-encoded keys. Decoded and validated once at startup; the process
/// refuses to start when any of them is missing or malformed.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SecretsConfig {
    /// Token-signing key (HS512), at least 32 bytes.
    #[serde(default)]
    pub jwt: String,
    /// Settings encryption key (AES-256), exactly 32 bytes.
    #[serde(default)]
    pub aes: String,
    /// Password hashing key (HMAC-SHA512), at least 32 bytes.
    #[serde(default)]
    pub hmac: String,
}

impl fmt::Debug for SecretsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretsConfig")
            .field("jwt", &"<redacted>")
            .field("aes", &"<redacted>")
            .field("hmac", &"<redacted>")
            .finish()
    }
}
