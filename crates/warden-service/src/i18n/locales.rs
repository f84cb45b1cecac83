//! TOML-backed message catalogue implementing [`Translator`].

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info, warn};

use warden_core::config::LocaleConfig;
use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;
use warden_core::traits::Translator;

/// File extension of locale files.
const LOCALE_EXT: &str = "toml";

/// Messages per language, keyed by dotted code.
///
/// A file `locales/en-US.toml` containing
///
/// ```toml
/// [auth.errors.user]
/// is-lock = "Your account is locked."
/// ```
///
/// yields the code `auth.errors.user.is-lock` for language `en-US`.
#[derive(Debug, Clone)]
pub struct Locales {
    messages: HashMap<String, HashMap<String, String>>,
    default_lang: String,
}

impl Locales {
    /// An empty catalogue falling back to `default_lang`.
    pub fn new(default_lang: impl Into<String>) -> Self {
        Self {
            messages: HashMap::new(),
            default_lang: default_lang.into(),
        }
    }

    /// Loads every `<lang>.toml` file in the configured directory.
    pub fn load(config: &LocaleConfig) -> AppResult<Self> {
        let mut locales = Self::new(config.default_lang.clone());
        let dir = Path::new(&config.directory);

        let entries = std::fs::read_dir(dir).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Failed to read locale directory '{}'", dir.display()),
                e,
            )
        })?;

        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(LOCALE_EXT) {
                continue;
            }
            let Some(lang) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            debug!(path = %path.display(), "Loading locale file");
            let count = locales.load_file(lang, &path)?;
            info!(lang = %lang, messages = count, "Locale loaded");
        }

        if !locales.messages.contains_key(&locales.default_lang) {
            warn!(
                default_lang = %locales.default_lang,
                languages = ?locales.languages(),
                "Default locale has no messages"
            );
        }

        Ok(locales)
    }

    fn load_file(&mut self, lang: &str, path: &Path) -> AppResult<usize> {
        let tree: serde_json::Value = config::Config::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        let mut flat = Vec::new();
        flatten("", &tree, &mut flat);
        let count = flat.len();
        for (code, message) in flat {
            self.insert(lang, code, message);
        }
        Ok(count)
    }

    /// Adds or replaces one message.
    pub fn insert(&mut self, lang: &str, code: impl Into<String>, message: impl Into<String>) {
        self.messages
            .entry(lang.to_string())
            .or_default()
            .insert(code.into(), message.into());
    }

    /// Languages with at least one message, sorted.
    pub fn languages(&self) -> Vec<&str> {
        let mut langs: Vec<&str> = self.messages.keys().map(String::as_str).collect();
        langs.sort_unstable();
        langs
    }

    /// Picks the catalogue for `lang`: exact tag, then same primary
    /// subtag (`en-GB` → `en-US`), then the default language.
    fn catalogue(&self, lang: &str) -> Option<&HashMap<String, String>> {
        if let Some(found) = self.messages.get(lang) {
            return Some(found);
        }

        let primary = primary_subtag(lang);
        let mut candidates: Vec<&String> = self
            .messages
            .keys()
            .filter(|tag| primary_subtag(tag).eq_ignore_ascii_case(primary))
            .collect();
        candidates.sort_unstable();
        if let Some(tag) = candidates.first() {
            return self.messages.get(*tag);
        }

        self.messages.get(&self.default_lang)
    }
}

impl Translator for Locales {
    fn translate(&self, lang: &str, code: &str, args: &[(&str, &str)]) -> String {
        let template = self
            .catalogue(lang)
            .and_then(|c| c.get(code))
            .or_else(|| self.messages.get(&self.default_lang)?.get(code));
        let Some(template) = template else {
            return code.to_string();
        };
        args.iter().fold(template.clone(), |msg, (name, value)| {
            msg.replace(&format!("{{{name}}}"), value)
        })
    }
}

fn primary_subtag(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or(tag)
}

fn flatten(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, child) in map {
                let code = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&code, child, out);
            }
        }
        serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
        serde_json::Value::Null => {}
        other => out.push((prefix.to_string(), other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Locales {
        let mut locales = Locales::new("en-US");
        locales.insert("en-US", "auth.errors.user.is-lock", "Your account is locked.");
        locales.insert("en-US", "auth.emails.confirm.subject", "Welcome to {home}");
        locales.insert("zh-Hans", "auth.errors.user.is-lock", "账户已锁定");
        locales
    }

    #[test]
    fn test_translate_exact_language() {
        let locales = sample();
        assert_eq!(
            locales.translate("zh-Hans", "auth.errors.user.is-lock", &[]),
            "账户已锁定"
        );
    }

    #[test]
    fn test_missing_code_falls_back_to_code() {
        let locales = sample();
        assert_eq!(locales.translate("en-US", "no.such.code", &[]), "no.such.code");
    }

    #[test]
    fn test_code_missing_in_language_falls_back_to_default() {
        let mut locales = sample();
        locales.insert("en-US", "auth.logs.user.sign-out", "Signed out.");
        assert_eq!(
            locales.translate("zh-Hans", "auth.logs.user.sign-out", &[]),
            "Signed out."
        );
        assert_eq!(locales.languages(), ["en-US", "zh-Hans"]);
    }

    #[test]
    fn test_unknown_language_uses_primary_subtag_then_default() {
        let locales = sample();
        assert_eq!(
            locales.translate("en-GB", "auth.errors.user.is-lock", &[]),
            "Your account is locked."
        );
        assert_eq!(
            locales.translate("fr-FR", "auth.errors.user.is-lock", &[]),
            "Your account is locked."
        );
    }

    #[test]
    fn test_placeholders_are_replaced() {
        let locales = sample();
        assert_eq!(
            locales.translate("en-US", "auth.emails.confirm.subject", &[("home", "example.com")]),
            "Welcome to example.com"
        );
    }

    #[test]
    fn test_error_carries_translated_message() {
        let locales = sample();
        let err = locales.error("en-US", ErrorKind::Unauthorized, "auth.errors.user.is-lock", &[]);
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(err.message, "Your account is locked.");
    }

    #[test]
    fn test_flatten_nested_tables() {
        let tree = serde_json::json!({
            "auth": { "logs": { "user": { "sign-up": "Signed up" } } },
            "count": 3
        });
        let mut out = Vec::new();
        flatten("", &tree, &mut out);
        out.sort();
        assert_eq!(
            out,
            vec![
                ("auth.logs.user.sign-up".to_string(), "Signed up".to_string()),
                ("count".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_load_missing_directory_is_configuration_error() {
        let config = LocaleConfig {
            directory: "/nonexistent/warden-locales".into(),
            default_lang: "en-US".into(),
        };
        let err = Locales::load(&config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
