use crate::models::null_as_default;
use crate::models::user::RoleRef;
use serde::{Deserialize, Serialize};

/// Role as stored with the signed-in user: either a bare name or an object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleName {
    Name(String),
    Object(RoleRef),
}

impl RoleName {
    pub fn as_str(&self) -> &str {
        match self {
            RoleName::Name(name) => name,
            RoleName::Object(role) => &role.name,
        }
    }
}

/// The authenticated principal, as persisted under the `user` key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default, alias = "Role")]
    pub role: Option<RoleName>,
}

impl CurrentUser {
    pub fn role_name(&self) -> Option<&str> {
        self.role.as_ref().map(RoleName::as_str)
    }
}
