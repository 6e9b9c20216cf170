use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::role::Role;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRolePayload {
    #[validate(length(min = 1, max = 100, message = "Role name is required"))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateRolePayload {
    pub id: Uuid,
    #[validate(length(min = 1, max = 100, message = "Role name is required"))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            name: role.name,
            created_at: role.created_at,
            updated_at: role.updated_at,
        }
    }
}

/// `{label, value}` pair for dropdown-style role pickers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterItem {
    pub label: String,
    pub value: Uuid,
}

impl From<Role> for FilterItem {
    fn from(role: Role) -> Self {
        Self {
            label: role.name,
            value: role.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_role_name_is_rejected() {
        let payload = CreateRolePayload {
            name: String::new(),
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn overlong_role_name_is_rejected() {
        let payload = CreateRolePayload {
            name: "x".repeat(101),
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn valid_role_name_passes() {
        let payload = CreateRolePayload {
            name: "Admin".to_string(),
        };
        assert!(payload.validate().is_ok());
    }
}
