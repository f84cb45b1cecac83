//! Resource scope narrowing a role's applicability.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Resource type of the reserved global scope.
pub const GLOBAL_RESOURCE_TYPE: &str = "-";

/// Resource id of the reserved global scope.
pub const GLOBAL_RESOURCE_ID: i64 = 0;

/// A `(resource_type, resource_id)` pair. `("-", 0)` is the global scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceScope {
    /// Kind of resource, e.g. `"forum"`.
    pub resource_type: String,
    /// Identifier of the resource instance.
    pub resource_id: i64,
}

impl ResourceScope {
    /// Creates a scope for one resource instance.
    pub fn new(resource_type: impl Into<String>, resource_id: i64) -> Self {
        Self {
            resource_type: resource_type.into(),
            resource_id,
        }
    }

    /// The reserved global scope.
    pub fn global() -> Self {
        Self::new(GLOBAL_RESOURCE_TYPE, GLOBAL_RESOURCE_ID)
    }

    /// Returns whether this is the global scope.
    pub fn is_global(&self) -> bool {
        self.resource_type == GLOBAL_RESOURCE_TYPE && self.resource_id == GLOBAL_RESOURCE_ID
    }
}

impl Default for ResourceScope {
    fn default() -> Self {
        Self::global()
    }
}

impl fmt::Display for ResourceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource_type, self.resource_id)
    }
}
