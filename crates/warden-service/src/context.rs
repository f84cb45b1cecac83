//! Request context carrying the caller's language, address and public origin.

use serde::{Deserialize, Serialize};

/// Address recorded when the caller's IP is unknown.
pub const UNKNOWN_IP: &str = "0.0.0.0";

/// Context for the current request.
///
/// Built by the embedding transport layer and passed into service methods so
/// that every operation knows which language to answer in, where the call
/// came from, and which origin to put into e-mailed links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Language tag used for messages and errors, e.g. `"en-US"`.
    pub lang: String,
    /// IP address of the request origin.
    pub ip: String,
    /// Public origin of the site, e.g. `"https://example.com"`.
    pub home: String,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(lang: impl Into<String>, ip: impl Into<String>, home: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            ip: ip.into(),
            home: home.into(),
        }
    }

    /// A context for operator commands run outside any request.
    pub fn system(lang: impl Into<String>) -> Self {
        Self::new(lang, UNKNOWN_IP, String::new())
    }
}
