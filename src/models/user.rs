use crate::models::null_as_default;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Account status. The backend sends either the `ACTIVE`/`INACTIVE` names or
/// the numeric codes `1`/`0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

impl UserStatus {
    pub fn toggled(self) -> Self {
        match self {
            UserStatus::Active => UserStatus::Inactive,
            UserStatus::Inactive => UserStatus::Active,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "ACTIVE",
            UserStatus::Inactive => "INACTIVE",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UserStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Code(i64),
            Flag(bool),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => match text.to_ascii_uppercase().as_str() {
                "ACTIVE" | "1" => Ok(UserStatus::Active),
                "INACTIVE" | "0" => Ok(UserStatus::Inactive),
                other => Err(serde::de::Error::custom(format!(
                    "unknown user status '{}'",
                    other
                ))),
            },
            Raw::Code(0) | Raw::Flag(false) => Ok(UserStatus::Inactive),
            Raw::Code(_) | Raw::Flag(true) => Ok(UserStatus::Active),
        }
    }
}

/// Missing, `null` or unrecognised statuses decode to `None` instead of
/// failing the whole record
fn lenient_status<'de, D>(deserializer: D) -> Result<Option<UserStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match serde_json::from_value(raw.clone()) {
        Ok(status) => Ok(Some(status)),
        Err(e) => {
            debug!(status = %raw, error = %e, "Ignoring unrecognised user status");
            Ok(None)
        }
    }
}

/// Role embedded in a user record
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoleRef {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub role_id: Option<i64>,
    #[serde(default, rename = "Role")]
    pub role: Option<RoleRef>,
    /// `None` when the backend sent no usable status
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: Option<UserStatus>,
    /// Data URL or raw base64
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default, rename = "createdAt", alias = "created_at")]
    pub created_at: Option<String>,
}

impl User {
    /// Image source usable for display: data URLs pass through, raw base64 is
    /// assumed to be JPEG
    pub fn photo_src(&self) -> Option<String> {
        photo_src(self.photo.as_deref())
    }

    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('U')
    }

    pub fn role_name(&self) -> &str {
        match &self.role {
            Some(role) if !role.name.is_empty() => &role.name,
            _ => "N/A",
        }
    }

    /// Status a toggle moves to. Anything not active becomes active.
    pub fn toggled_status(&self) -> UserStatus {
        self.status.map_or(UserStatus::Active, UserStatus::toggled)
    }

    pub fn status_label(&self) -> &'static str {
        self.status.as_ref().map_or("N/A", UserStatus::as_str)
    }

    pub fn effective_role_id(&self) -> Option<i64> {
        self.role_id
            .or_else(|| self.role.as_ref().and_then(|role| role.id))
    }
}

pub fn photo_src(photo: Option<&str>) -> Option<String> {
    let photo = photo?.trim();
    if photo.is_empty() {
        return None;
    }
    if photo.starts_with("data:") {
        Some(photo.to_string())
    } else {
        Some(format!("data:image/jpeg;base64,{}", photo))
    }
}

/// Body sent on create and update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserPayload {
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub role_id: i64,
    pub status: UserStatus,
    pub photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_password: Option<String>,
    pub new_password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusUpdate {
    pub status: UserStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_accepts_names_and_codes() {
        let parse = |v| serde_json::from_value::<UserStatus>(v).unwrap();
        assert_eq!(parse(json!("ACTIVE")), UserStatus::Active);
        assert_eq!(parse(json!("inactive")), UserStatus::Inactive);
        assert_eq!(parse(json!(1)), UserStatus::Active);
        assert_eq!(parse(json!(0)), UserStatus::Inactive);
        assert_eq!(parse(json!(false)), UserStatus::Inactive);
    }

    #[test]
    fn test_status_rejects_unknown_name() {
        assert!(serde_json::from_value::<UserStatus>(json!("BANNED")).is_err());
    }

    #[test]
    fn test_status_toggle() {
        assert_eq!(UserStatus::Active.toggled(), UserStatus::Inactive);
        assert_eq!(UserStatus::Inactive.toggled(), UserStatus::Active);
        assert_eq!(serde_json::to_value(UserStatus::Inactive).unwrap(), json!("INACTIVE"));
    }

    #[test]
    fn test_user_from_backend_shape() {
        let user: User = serde_json::from_value(json!({
            "id": 7,
            "name": "sokha",
            "username": "sokha@example.com",
            "email": null,
            "role_id": null,
            "Role": {"id": 2, "name": "Admin"},
            "status": "INACTIVE",
            "photo": "",
            "createdAt": "2024-03-01T10:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(user.id, 7);
        assert_eq!(user.initial(), 'S');
        assert_eq!(user.role_name(), "Admin");
        assert_eq!(user.effective_role_id(), Some(2));
        assert_eq!(user.status, Some(UserStatus::Inactive));
        assert_eq!(user.toggled_status(), UserStatus::Active);
        assert_eq!(user.photo_src(), None);
    }

    #[test]
    fn test_user_tolerates_missing_fields() {
        let user: User = serde_json::from_value(json!({"id": 1, "name": null})).unwrap();
        assert_eq!(user.name, "");
        assert_eq!(user.initial(), 'U');
        assert_eq!(user.role_name(), "N/A");
        assert_eq!(user.status, None);
        assert_eq!(user.status_label(), "N/A");
    }

    #[test]
    fn test_user_tolerates_bad_status() {
        let null: User = serde_json::from_value(json!({"id": 3, "status": null})).unwrap();
        assert_eq!(null.status, None);
        assert_eq!(null.toggled_status(), UserStatus::Active);

        let banned: User = serde_json::from_value(json!({"id": 4, "status": "BANNED"})).unwrap();
        assert_eq!(banned.status, None);
    }

    #[test]
    fn test_photo_src() {
        assert_eq!(
            photo_src(Some("data:image/png;base64,AAAA")).as_deref(),
            Some("data:image/png;base64,AAAA")
        );
        assert_eq!(
            photo_src(Some("AAAA")).as_deref(),
            Some("data:image/jpeg;base64,AAAA")
        );
        assert_eq!(photo_src(Some("   ")), None);
        assert_eq!(photo_src(None), None);
    }

    #[test]
    fn test_payload_omits_missing_password() {
        let payload = UserPayload {
            name: "Dara".into(),
            username: "dara".into(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            role_id: 2,
            status: UserStatus::Active,
            photo: None,
            password: None,
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["photo"], json!(null));
        assert_eq!(value["role_id"], json!(2));
    }

    #[test]
    fn test_password_change_shape() {
        let body = PasswordChange {
            current_password: None,
            new_password: "secret1".into(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"newPassword": "secret1"})
        );
    }
}
