//! Translation configuration.

use serde::{Deserialize, Serialize};

/// Where locale files live and which language to fall back to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleConfig {
    /// Directory holding `<lang>.toml` message files.
    #[serde(default = "default_directory")]
    pub directory: String,
    /// Language used when a request's language is not available.
    #[serde(default = "default_lang")]
    pub default_lang: String,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            default_lang: default_lang(),
        }
    }
}

fn default_directory() -> String {
    "locales".to_string()
}

fn default_lang() -> String {
    "en-US".to_string()
}
