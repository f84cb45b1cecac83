//! Store selection from configuration.

use std::sync::Arc;

use tracing::info;

use warden_core::config::DatabaseConfig;
use warden_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::migration;
use crate::repositories::{PolicyRepository, SettingRepository, UserRepository};
use crate::store::{PolicyStore, SettingStore, UserStore};

/// The three stores the rest of the application runs on.
#[derive(Debug, Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub policies: Arc<dyn PolicyStore>,
    pub settings: Arc<dyn SettingStore>,
    /// The pool behind PostgreSQL stores; `None` for the in-memory store.
    pub pool: Option<DatabasePool>,
}

impl Stores {
    /// Stores sharing one [`MemoryStore`].
    pub fn memory(store: MemoryStore) -> Self {
        Self {
            users: Arc::new(store.clone()),
            policies: Arc::new(store.clone()),
            settings: Arc::new(store),
            pool: None,
        }
    }

    /// PostgreSQL repositories over `pool`.
    pub fn postgres(pool: DatabasePool) -> Self {
        let pg = pool.pool().clone();
        Self {
            users: Arc::new(UserRepository::new(pg.clone())),
            policies: Arc::new(PolicyRepository::new(pg.clone())),
            settings: Arc::new(SettingRepository::new(pg)),
            pool: Some(pool),
        }
    }

    /// Opens the stores selected by `database.url`: `memory://` gives a
    /// fresh in-memory store, anything else connects to PostgreSQL and,
    /// when enabled, applies pending migrations.
    pub async fn open(config: &DatabaseConfig) -> AppResult<Self> {
        if config.is_memory() {
            info!("Using in-memory stores");
            return Ok(Self::memory(MemoryStore::new()));
        }

        let pool = DatabasePool::connect(config).await?;
        if config.run_migrations {
            migration::apply(pool.pool()).await?;
        }
        Ok(Self::postgres(pool))
    }
}
