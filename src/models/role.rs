use crate::models::null_as_default;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(
        default,
        rename = "Permissions",
        alias = "permissions",
        deserialize_with = "null_as_default"
    )]
    pub permissions: Vec<Permission>,
}

impl Role {
    /// Granted permission ids in the order the backend listed them
    pub fn permission_ids(&self) -> Vec<i64> {
        self.permissions.iter().map(|p| p.id).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RolePayload {
    pub name: String,
    pub description: String,
    pub permissions: Vec<i64>,
}
