use crate::api::client::HttpClient;
use crate::api::envelope::{normalize, Envelope};
use crate::api::query::ListParams;
use crate::core::messages::{Locale, Message};
use crate::models::user::{PasswordChange, StatusUpdate, UserPayload, UserStatus};
use std::sync::Arc;
use tracing::info;

/// Typed operations on `/api/user`. Every call resolves to an [`Envelope`];
/// nothing is raised past this boundary.
#[derive(Clone)]
pub struct UserApi {
    http: Arc<HttpClient>,
    locale: Locale,
}

impl UserApi {
    pub fn new(http: Arc<HttpClient>, locale: Locale) -> Self {
        Self { http, locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// GET /api/user?page=&limit=&offset=&search=&role=&status=
    pub async fn list(&self, params: &ListParams) -> Envelope {
        let result = match params.to_path("/api/user") {
            Ok(path) => self.http.get(&path).await,
            Err(e) => Err(e),
        };
        normalize("list users", result, Message::FetchUsersFailed, self.locale)
    }

    /// GET /api/user/:id
    pub async fn get_by_id(&self, id: i64) -> Envelope {
        let result = self.http.get(&format!("/api/user/{}", id)).await;
        normalize("get user", result, Message::FetchUsersFailed, self.locale)
    }

    /// POST /register
    pub async fn create(&self, payload: &UserPayload) -> Envelope {
        let result = self.http.post("/register", payload).await;
        let envelope = normalize("create user", result, Message::CreateUserFailed, self.locale);
        if envelope.success {
            info!(username = %payload.username, "User created");
        }
        envelope
    }

    /// PUT /api/user/:id
    pub async fn update(&self, id: i64, payload: &UserPayload) -> Envelope {
        let result = self.http.put(&format!("/api/user/{}", id), payload).await;
        let envelope = normalize("update user", result, Message::UpdateUserFailed, self.locale);
        if envelope.success {
            info!(user_id = id, "User updated");
        }
        envelope
    }

    /// DELETE /api/user/:id
    pub async fn delete(&self, id: i64) -> Envelope {
        let result = self.http.delete(&format!("/api/user/{}", id)).await;
        let envelope = normalize("delete user", result, Message::DeleteUserFailed, self.locale);
        if envelope.success {
            info!(user_id = id, "User deleted");
        }
        envelope
    }

    /// PATCH /api/user/:id/password
    pub async fn change_password(&self, id: i64, change: &PasswordChange) -> Envelope {
        let result = self
            .http
            .patch(&format!("/api/user/{}/password", id), change)
            .await;
        normalize(
            "change password",
            result,
            Message::ChangePasswordFailed,
            self.locale,
        )
    }

    /// PATCH /api/user/:id/status
    pub async fn update_status(&self, id: i64, status: UserStatus) -> Envelope {
        let result = self
            .http
            .patch(&format!("/api/user/{}/status", id), &StatusUpdate { status })
            .await;
        let envelope = normalize(
            "update user status",
            result,
            Message::UpdateStatusFailed,
            self.locale,
        );
        if envelope.success {
            info!(user_id = id, status = %status, "User status updated");
        }
        envelope
    }

    /// GET /api/roles, the reference data for the user form
    pub async fn roles(&self) -> Envelope {
        let result = self.http.get("/api/roles").await;
        normalize("list roles", result, Message::FetchRolesFailed, self.locale)
    }
}
