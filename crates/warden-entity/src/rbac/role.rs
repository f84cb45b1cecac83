//! Role entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use warden_core::types::{ResourceScope, RoleId};

/// Name of the administrator role in the global scope.
pub const ROLE_ADMIN: &str = "admin";

/// Name of the super-user role in the global scope.
pub const ROLE_ROOT: &str = "root";

/// A named permission scope, unique per `(name, resource_type, resource_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub resource_type: String,
    pub resource_id: i64,
}

impl Role {
    /// The resource scope this role applies to.
    pub fn scope(&self) -> ResourceScope {
        ResourceScope::new(self.resource_type.clone(), self.resource_id)
    }
}
