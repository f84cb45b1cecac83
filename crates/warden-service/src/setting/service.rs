//! Typed key/value settings.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use warden_auth::SymmetricCipher;
use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_database::store::SettingStore;

/// Stores JSON-encoded values by key, encrypting them on request.
#[derive(Debug, Clone)]
pub struct SettingService {
    store: Arc<dyn SettingStore>,
    cipher: SymmetricCipher,
}

impl SettingService {
    /// Creates the settings service.
    pub fn new(store: Arc<dyn SettingStore>, cipher: SymmetricCipher) -> Self {
        Self { store, cipher }
    }

    /// Serializes `value` and stores it under `key`, replacing any previous
    /// value. With `encrypt` the stored bytes are AES-GCM ciphertext.
    pub async fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        encrypt: bool,
    ) -> AppResult<()> {
        let plain = serde_json::to_vec(value)?;
        let stored = if encrypt {
            self.cipher.encrypt(&plain)?
        } else {
            plain
        };
        self.store.put(key, stored, encrypt).await?;
        info!(key = %key, encrypted = encrypt, "Setting saved");
        Ok(())
    }

    /// Loads and deserializes the value stored under `key`, decrypting it
    /// when it was saved encrypted. A missing key is `NotFound`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<T> {
        let setting = self
            .store
            .get(key)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Setting '{key}' not found")))?;

        let plain = if setting.encrypted {
            self.cipher.decrypt(&setting.value)?
        } else {
            setting.value
        };
        debug!(key = %key, "Setting loaded");
        Ok(serde_json::from_slice(&plain)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use warden_auth::SecretStore;
    use warden_auth::secrets::generate_config;
    use warden_core::error::ErrorKind;
    use warden_database::MemoryStore;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Smtp {
        host: String,
        port: u16,
        password: String,
    }

    fn service() -> (SettingService, MemoryStore) {
        let secrets = Arc::new(SecretStore::from_config(&generate_config()).unwrap());
        let store = MemoryStore::new();
        let service = SettingService::new(
            Arc::new(store.clone()),
            SymmetricCipher::new(&secrets).unwrap(),
        );
        (service, store)
    }

    fn smtp() -> Smtp {
        Smtp {
            host: "smtp.example.com".into(),
            port: 587,
            password: "hunter2".into(),
        }
    }

    #[tokio::test]
    async fn test_plain_setting_round_trip() {
        let (service, store) = service();
        service.set("site.title", "Warden", false).await.unwrap();

        let title: String = service.get("site.title").await.unwrap();
        assert_eq!(title, "Warden");
        let raw = store.get("site.title").await.unwrap().unwrap();
        assert_eq!(raw.value, br#""Warden""#.to_vec());
    }

    #[tokio::test]
    async fn test_encrypted_setting_is_opaque_at_rest() {
        let (service, store) = service();
        service.set("site.smtp", &smtp(), true).await.unwrap();

        let raw = store.get("site.smtp").await.unwrap().unwrap();
        assert!(raw.encrypted);
        assert!(!String::from_utf8_lossy(&raw.value).contains("hunter2"));

        let loaded: Smtp = service.get("site.smtp").await.unwrap();
        assert_eq!(loaded, smtp());
    }

    #[tokio::test]
    async fn test_overwrite_switches_encryption_flag() {
        let (service, _) = service();
        service.set("site.smtp", &smtp(), true).await.unwrap();
        service.set("site.smtp", &smtp(), false).await.unwrap();

        let loaded: Smtp = service.get("site.smtp").await.unwrap();
        assert_eq!(loaded, smtp());
    }

    #[tokio::test]
    async fn test_missing_key_is_not_found() {
        let (service, _) = service();
        let err = service.get::<String>("nope").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_type_mismatch_is_serialization_error() {
        let (service, _) = service();
        service.set("site.title", "Warden", false).await.unwrap();
        let err = service.get::<u32>("site.title").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Serialization);
    }
}
