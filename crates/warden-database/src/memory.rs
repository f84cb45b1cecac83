//! In-memory store for single-process deployments and tests.
//!
//! All three store traits are implemented over one state guarded by a
//! Tokio `RwLock`. Check-and-write sequences run under a single write
//! guard, which gives the same uniqueness guarantees the PostgreSQL
//! indexes provide.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_core::types::{PolicyId, RoleId, UserId};
use warden_entity::rbac::{Policy, Role};
use warden_entity::setting::Setting;
use warden_entity::user::{CreateUser, CreateUserLog, PROVIDER_EMAIL, User, UserChange, UserLog};

use crate::store::{PolicyStore, SettingStore, UserStore};

#[derive(Debug, Default)]
struct InnerState {
    users: BTreeMap<UserId, User>,
    logs: Vec<UserLog>,
    roles: BTreeMap<RoleId, Role>,
    policies: BTreeMap<PolicyId, Policy>,
    settings: BTreeMap<String, Setting>,
    next_id: i64,
}

impl InnerState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory implementation of every store trait. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<InnerState>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_uid(&self, uid: Uuid) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.uid == uid).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.provider_type == PROVIDER_EMAIL && u.provider_id == email)
            .cloned())
    }

    async fn create(&self, data: CreateUser) -> AppResult<User> {
        let mut state = self.state.write().await;

        let duplicate = state.users.values().any(|u| {
            u.email == data.email
                || u.uid == data.uid
                || (u.provider_type == data.provider_type && u.provider_id == data.provider_id)
        });
        if duplicate {
            return Err(AppError::conflict("Failed to create user: already exists"));
        }

        let now = Utc::now();
        let id = UserId(state.next_id());
        let user = User {
            id,
            uid: data.uid,
            name: data.name,
            email: data.email,
            password: data.password,
            provider_type: data.provider_type,
            provider_id: data.provider_id,
            logo: data.logo,
            home: data.home,
            sign_in_count: 0,
            current_sign_in_at: None,
            current_sign_in_ip: "0.0.0.0".to_string(),
            last_sign_in_at: None,
            last_sign_in_ip: "0.0.0.0".to_string(),
            confirmed_at: None,
            locked_at: None,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(id, user.clone());
        debug!(user_id = %id, "User stored");
        Ok(user)
    }

    async fn update(&self, id: UserId, change: UserChange) -> AppResult<User> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.apply(&change, Utc::now());
        Ok(user.clone())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.state.read().await.users.values().cloned().collect())
    }

    async fn add_log(&self, entry: CreateUserLog) -> AppResult<UserLog> {
        let mut state = self.state.write().await;
        let log = UserLog {
            id: state.next_id(),
            user_id: entry.user_id,
            ip: entry.ip,
            message: entry.message,
            created_at: Utc::now(),
        };
        state.logs.push(log.clone());
        Ok(log)
    }

    async fn list_logs(&self, user_id: UserId, limit: i64) -> AppResult<Vec<UserLog>> {
        let state = self.state.read().await;
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(state
            .logs
            .iter()
            .rev()
            .filter(|l| l.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PolicyStore for MemoryStore {
    async fn find_role(
        &self,
        name: &str,
        resource_type: &str,
        resource_id: i64,
    ) -> AppResult<Option<Role>> {
        let state = self.state.read().await;
        Ok(find_role(&state, name, resource_type, resource_id).cloned())
    }

    async fn find_role_by_id(&self, id: RoleId) -> AppResult<Option<Role>> {
        Ok(self.state.read().await.roles.get(&id).cloned())
    }

    async fn get_or_create_role(
        &self,
        name: &str,
        resource_type: &str,
        resource_id: i64,
    ) -> AppResult<Role> {
        let mut state = self.state.write().await;
        if let Some(role) = find_role(&state, name, resource_type, resource_id) {
            return Ok(role.clone());
        }

        let role = Role {
            id: RoleId(state.next_id()),
            name: name.to_string(),
            resource_type: resource_type.to_string(),
            resource_id,
        };
        state.roles.insert(role.id, role.clone());
        debug!(role_id = %role.id, name = %name, "Role created");
        Ok(role)
    }

    async fn roles_for_resource(
        &self,
        resource_type: &str,
        resource_id: i64,
    ) -> AppResult<Vec<Role>> {
        let state = self.state.read().await;
        Ok(state
            .roles
            .values()
            .filter(|r| r.resource_type == resource_type && r.resource_id == resource_id)
            .cloned()
            .collect())
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Ok(self.state.read().await.roles.values().cloned().collect())
    }

    async fn find_policy(&self, user_id: UserId, role_id: RoleId) -> AppResult<Option<Policy>> {
        let state = self.state.read().await;
        Ok(find_policy(&state, user_id, role_id).cloned())
    }

    async fn upsert_policy(
        &self,
        user_id: UserId,
        role_id: RoleId,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
    ) -> AppResult<Policy> {
        if start_at > end_at {
            return Err(AppError::validation("Policy window must not end before it starts"));
        }

        let mut state = self.state.write().await;
        let now = Utc::now();
        let existing = find_policy(&state, user_id, role_id).map(|p| p.id);

        let policy = match existing.and_then(|id| state.policies.get_mut(&id)) {
            Some(policy) => {
                policy.start_at = start_at;
                policy.end_at = end_at;
                policy.updated_at = now;
                policy.clone()
            }
            None => {
                let policy = Policy {
                    id: PolicyId(state.next_id()),
                    user_id,
                    role_id,
                    start_at,
                    end_at,
                    created_at: now,
                    updated_at: now,
                };
                state.policies.insert(policy.id, policy.clone());
                policy
            }
        };
        Ok(policy)
    }

    async fn delete_policy(&self, user_id: UserId, role_id: RoleId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let before = state.policies.len();
        state
            .policies
            .retain(|_, p| !(p.user_id == user_id && p.role_id == role_id));
        Ok(state.policies.len() < before)
    }

    async fn policies_for_user(&self, user_id: UserId) -> AppResult<Vec<Policy>> {
        let state = self.state.read().await;
        Ok(state
            .policies
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn policies_for_role(&self, role_id: RoleId) -> AppResult<Vec<Policy>> {
        let state = self.state.read().await;
        Ok(state
            .policies
            .values()
            .filter(|p| p.role_id == role_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SettingStore for MemoryStore {
    async fn get(&self, key: &str) -> AppResult<Option<Setting>> {
        Ok(self.state.read().await.settings.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>, encrypted: bool) -> AppResult<Setting> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let id = match state.settings.get(key) {
            Some(existing) => existing.id,
            None => state.next_id(),
        };
        let created_at = state.settings.get(key).map_or(now, |s| s.created_at);
        let setting = Setting {
            id,
            key: key.to_string(),
            value,
            encrypted,
            created_at,
            updated_at: now,
        };
        state.settings.insert(key.to_string(), setting.clone());
        Ok(setting)
    }
}

fn find_role<'a>(
    state: &'a InnerState,
    name: &str,
    resource_type: &str,
    resource_id: i64,
) -> Option<&'a Role> {
    state.roles.values().find(|r| {
        r.name == name && r.resource_type == resource_type && r.resource_id == resource_id
    })
}

fn find_policy(state: &InnerState, user_id: UserId, role_id: RoleId) -> Option<&Policy> {
    state
        .policies
        .values()
        .find(|p| p.user_id == user_id && p.role_id == role_id)
}
