use crate::api::client::HttpClient;
use crate::api::envelope::{normalize, Envelope};
use crate::core::messages::{Locale, Message};
use crate::models::role::RolePayload;
use std::sync::Arc;
use tracing::info;

/// Operations on `/api/roles` and the permission vocabulary
#[derive(Clone)]
pub struct RoleApi {
    http: Arc<HttpClient>,
    locale: Locale,
}

impl RoleApi {
    pub fn new(http: Arc<HttpClient>, locale: Locale) -> Self {
        Self { http, locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// GET /api/roles
    pub async fn list(&self) -> Envelope {
        let result = self.http.get("/api/roles").await;
        normalize("list roles", result, Message::FetchRolesFailed, self.locale)
    }

    /// GET /api/roles/:id
    pub async fn get_by_id(&self, id: i64) -> Envelope {
        let result = self.http.get(&format!("/api/roles/{}", id)).await;
        normalize("get role", result, Message::FetchRoleFailed, self.locale)
    }

    /// POST /api/roles
    pub async fn create(&self, payload: &RolePayload) -> Envelope {
        let result = self.http.post("/api/roles", payload).await;
        let envelope = normalize("create role", result, Message::SaveRoleFailed, self.locale);
        if envelope.success {
            info!(name = %payload.name, permissions = payload.permissions.len(), "Role created");
        }
        envelope
    }

    /// PUT /api/roles/:id
    pub async fn update(&self, id: i64, payload: &RolePayload) -> Envelope {
        let result = self.http.put(&format!("/api/roles/{}", id), payload).await;
        let envelope = normalize("update role", result, Message::SaveRoleFailed, self.locale);
        if envelope.success {
            info!(role_id = id, permissions = payload.permissions.len(), "Role updated");
        }
        envelope
    }

    /// GET /api/user/permissions
    pub async fn permissions(&self) -> Envelope {
        let result = self.http.get("/api/user/permissions").await;
        normalize(
            "list permissions",
            result,
            Message::FetchPermissionsFailed,
            self.locale,
        )
    }
}
