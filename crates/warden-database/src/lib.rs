//! # warden-database
//!
//! Persistence for Warden: the store traits consumed by the auth and
//! service crates, their PostgreSQL implementations, an in-memory
//! implementation, connection management and embedded migrations.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;
pub mod stores;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::{PolicyStore, SettingStore, UserStore};
pub use stores::Stores;
