//! Store traits.
//!
//! Implementations must make [`PolicyStore::get_or_create_role`] and
//! [`PolicyStore::upsert_policy`] atomic so that concurrent callers never
//! produce two roles with the same scope or two policies for one
//! `(user, role)` pair.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use warden_core::result::AppResult;
use warden_core::types::{RoleId, UserId};
use warden_entity::rbac::{Policy, Role};
use warden_entity::setting::Setting;
use warden_entity::user::{CreateUser, CreateUserLog, User, UserChange, UserLog};

/// Persistence of user accounts and their activity logs.
#[async_trait]
pub trait UserStore: Send + Sync + fmt::Debug + 'static {
    /// Find a user by public UID.
    async fn find_by_uid(&self, uid: Uuid) -> AppResult<Option<User>>;

    /// Find an e-mail/password account by address.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a new user. A duplicate e-mail is a `Conflict`.
    async fn create(&self, data: CreateUser) -> AppResult<User>;

    /// Apply `change` to the user and return the updated row.
    async fn update(&self, id: UserId, change: UserChange) -> AppResult<User>;

    /// All users, oldest first.
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Append an activity log entry.
    async fn add_log(&self, entry: CreateUserLog) -> AppResult<UserLog>;

    /// The latest `limit` log entries of a user, newest first.
    async fn list_logs(&self, user_id: UserId, limit: i64) -> AppResult<Vec<UserLog>>;
}

/// Persistence of roles and policies.
#[async_trait]
pub trait PolicyStore: Send + Sync + fmt::Debug + 'static {
    /// Find the role with the exact scope triple.
    async fn find_role(
        &self,
        name: &str,
        resource_type: &str,
        resource_id: i64,
    ) -> AppResult<Option<Role>>;

    /// Find a role by id.
    async fn find_role_by_id(&self, id: RoleId) -> AppResult<Option<Role>>;

    /// Return the role with the scope triple, inserting it if absent.
    async fn get_or_create_role(
        &self,
        name: &str,
        resource_type: &str,
        resource_id: i64,
    ) -> AppResult<Role>;

    /// All roles defined on a resource.
    async fn roles_for_resource(&self, resource_type: &str, resource_id: i64)
    -> AppResult<Vec<Role>>;

    /// All roles, ordered by id.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// The policy binding `user_id` to `role_id`, if any.
    async fn find_policy(&self, user_id: UserId, role_id: RoleId) -> AppResult<Option<Policy>>;

    /// Create the policy for `(user_id, role_id)` or overwrite the window
    /// of the existing one.
    async fn upsert_policy(
        &self,
        user_id: UserId,
        role_id: RoleId,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
    ) -> AppResult<Policy>;

    /// Delete the policy for `(user_id, role_id)`. Returns whether a row
    /// was removed.
    async fn delete_policy(&self, user_id: UserId, role_id: RoleId) -> AppResult<bool>;

    /// All policies granted to a user.
    async fn policies_for_user(&self, user_id: UserId) -> AppResult<Vec<Policy>>;

    /// All policies granting a role.
    async fn policies_for_role(&self, role_id: RoleId) -> AppResult<Vec<Policy>>;
}

/// Persistence of key/value settings.
#[async_trait]
pub trait SettingStore: Send + Sync + fmt::Debug + 'static {
    /// Find a setting by key.
    async fn get(&self, key: &str) -> AppResult<Option<Setting>>;

    /// Insert or replace the setting stored under `key`.
    async fn put(&self, key: &str, value: Vec<u8>, encrypted: bool) -> AppResult<Setting>;
}
