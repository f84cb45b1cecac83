//! Authorization engine over the policy store.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Days, Months, Utc};
use tracing::{error, info};

use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_core::traits::Clock;
use warden_core::types::scope::{GLOBAL_RESOURCE_ID, GLOBAL_RESOURCE_TYPE};
use warden_core::types::{RoleId, UserId};
use warden_database::store::PolicyStore;
use warden_entity::rbac::{Policy, Role};

/// Answers "may this user act in this role on this resource" and manages
/// the grants behind the answer.
///
/// A grant is in force when `start_at <= now <= end_at`, with `now` taken
/// from the injected clock.
#[derive(Debug, Clone)]
pub struct Authorizer {
    store: Arc<dyn PolicyStore>,
    clock: Arc<dyn Clock>,
}

impl Authorizer {
    /// Creates an authorizer over `store`.
    pub fn new(store: Arc<dyn PolicyStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Returns the role with the given scope, creating it on first use.
    pub async fn get_or_create_role(
        &self,
        name: &str,
        resource_type: &str,
        resource_id: i64,
    ) -> AppResult<Role> {
        self.store
            .get_or_create_role(name, resource_type, resource_id)
            .await
    }

    /// Grants `role_id` to `user_id` from now for the given calendar
    /// duration. An existing grant has its window overwritten.
    pub async fn allow(
        &self,
        role_id: RoleId,
        user_id: UserId,
        years: u32,
        months: u32,
        days: u32,
    ) -> AppResult<Policy> {
        let start = self.clock.now();
        let end = grant_window(start, years, months, days)?;

        let policy = self
            .store
            .upsert_policy(user_id, role_id, start, end)
            .await?;

        info!(
            user_id = %user_id,
            role_id = %role_id,
            start_at = %start,
            end_at = %end,
            "Role granted"
        );
        Ok(policy)
    }

    /// Removes the grant of `role_id` to `user_id`, if any.
    pub async fn deny(&self, role_id: RoleId, user_id: UserId) -> AppResult<()> {
        if self.store.delete_policy(user_id, role_id).await? {
            info!(user_id = %user_id, role_id = %role_id, "Role revoked");
        }
        Ok(())
    }

    /// Whether `user_id` currently holds `role_name` on the resource.
    pub async fn can(
        &self,
        user_id: UserId,
        role_name: &str,
        resource_type: &str,
        resource_id: i64,
    ) -> AppResult<bool> {
        let Some(role) = self
            .store
            .find_role(role_name, resource_type, resource_id)
            .await?
        else {
            return Ok(false);
        };

        let policy = self.store.find_policy(user_id, role.id).await?;
        Ok(policy.is_some_and(|p| p.is_enabled_at(self.clock.now())))
    }

    /// Whether `user_id` holds any of `role_names` in the global scope.
    pub async fn is(&self, user_id: UserId, role_names: &[&str]) -> AppResult<bool> {
        for name in role_names {
            if self
                .can(user_id, name, GLOBAL_RESOURCE_TYPE, GLOBAL_RESOURCE_ID)
                .await?
            {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Like [`can`](Self::can), but a missing grant is `Forbidden`.
    pub async fn require(
        &self,
        user_id: UserId,
        role_name: &str,
        resource_type: &str,
        resource_id: i64,
    ) -> AppResult<()> {
        if self
            .can(user_id, role_name, resource_type, resource_id)
            .await?
        {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "Role '{role_name}' on {resource_type}/{resource_id} is required"
            )))
        }
    }

    /// Names of the roles on a resource that `user_id` currently holds.
    ///
    /// Store failures are logged and skipped; this never fails.
    pub async fn authority(
        &self,
        user_id: UserId,
        resource_type: &str,
        resource_id: i64,
    ) -> Vec<String> {
        let roles = match self
            .store
            .roles_for_resource(resource_type, resource_id)
            .await
        {
            Ok(roles) => roles,
            Err(e) => {
                error!(
                    error = %e,
                    resource_type = %resource_type,
                    resource_id = resource_id,
                    "Failed to list roles for resource"
                );
                return Vec::new();
            }
        };

        let now = self.clock.now();
        let mut names = Vec::new();
        for role in roles {
            match self.store.find_policy(user_id, role.id).await {
                Ok(Some(policy)) if policy.is_enabled_at(now) => names.push(role.name),
                Ok(_) => {}
                Err(e) => {
                    error!(error = %e, role_id = %role.id, user_id = %user_id, "Failed to load policy");
                }
            }
        }
        names
    }

    /// Ids of resources of `resource_type` on which `user_id` currently
    /// holds `role_name`.
    pub async fn resources_for_user(
        &self,
        user_id: UserId,
        role_name: &str,
        resource_type: &str,
    ) -> AppResult<BTreeSet<i64>> {
        let now = self.clock.now();
        let mut ids = BTreeSet::new();
        for policy in self.store.policies_for_user(user_id).await? {
            if !policy.is_enabled_at(now) {
                continue;
            }
            let role = self
                .store
                .find_role_by_id(policy.role_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Role {} not found", policy.role_id)))?;
            if role.name == role_name && role.resource_type == resource_type {
                ids.insert(role.resource_id);
            }
        }
        Ok(ids)
    }

    /// Users currently holding `role_name` on the resource.
    ///
    /// The role is created if it does not exist yet.
    pub async fn users_for_resource(
        &self,
        role_name: &str,
        resource_type: &str,
        resource_id: i64,
    ) -> AppResult<BTreeSet<UserId>> {
        let role = self
            .get_or_create_role(role_name, resource_type, resource_id)
            .await?;
        let now = self.clock.now();
        Ok(self
            .store
            .policies_for_role(role.id)
            .await?
            .into_iter()
            .filter(|p| p.is_enabled_at(now))
            .map(|p| p.user_id)
            .collect())
    }
}

/// End of a grant starting at `start`: months (including `years * 12`) are
/// added first, clamping to the end of the month, then days.
pub fn grant_window(
    start: DateTime<Utc>,
    years: u32,
    months: u32,
    days: u32,
) -> AppResult<DateTime<Utc>> {
    let overflow = || AppError::validation("Grant duration is out of range");

    let total_months = years
        .checked_mul(12)
        .and_then(|m| m.checked_add(months))
        .ok_or_else(overflow)?;

    start
        .checked_add_months(Months::new(total_months))
        .and_then(|t| t.checked_add_days(Days::new(u64::from(days))))
        .ok_or_else(overflow)
}
