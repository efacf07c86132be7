use crate::api::envelope::{decode, decode_all, Envelope};
use crate::api::roles::RoleApi;
use crate::core::auth::AuthContext;
use crate::core::error::ValidationError;
use crate::core::messages::{Locale, Message};
use crate::core::routes::{FormMode, Navigator, Route};
use crate::models::role::{Permission, Role, RolePayload};
use crate::security::permissions::Gate;
use crate::validation::forms::{validate_role_form, RoleFormData};
use crate::views::user_form::SubmitOutcome;
use crate::views::Access;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Create or edit a role and its granted permissions
pub struct RoleFormView {
    api: RoleApi,
    auth: Arc<AuthContext>,
    navigator: Arc<dyn Navigator>,
    locale: Locale,
    mode: FormMode,
    permissions: Vec<Permission>,
    data: RoleFormData,
    error: Option<String>,
    loading: bool,
    saving: bool,
}

impl RoleFormView {
    pub fn new(
        api: RoleApi,
        auth: Arc<AuthContext>,
        navigator: Arc<dyn Navigator>,
        mode: FormMode,
    ) -> Self {
        let locale = api.locale();
        Self {
            api,
            auth,
            navigator,
            locale,
            mode,
            permissions: Vec::new(),
            data: RoleFormData::default(),
            error: None,
            loading: false,
            saving: false,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    pub fn data(&self) -> &RoleFormData {
        &self.data
    }

    pub fn data_mut(&mut self) -> Option<&mut RoleFormData> {
        if self.mode.is_read_only() {
            None
        } else {
            Some(&mut self.data)
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn is_selected(&self, permission_id: i64) -> bool {
        self.data.permissions.contains(&permission_id)
    }

    pub fn access(&self) -> Access {
        Gate::AdminOnly.render(
            &self.auth,
            || Access::Granted,
            || Access::Denied(Message::AdminOnlyManageRoles),
        )
    }

    pub async fn mount(&mut self) {
        self.loading = true;
        self.error = None;

        let envelope = self.api.permissions().await;
        self.apply_permissions(&envelope);

        if let Some(id) = self.mode.entity_id() {
            let envelope = self.api.get_by_id(id).await;
            self.apply_role(id, &envelope);
        }

        self.loading = false;
    }

    fn apply_permissions(&mut self, envelope: &Envelope) {
        let permissions = if envelope.success {
            envelope
                .collection(&["permissions", "data"])
                .and_then(|values| decode_all::<Permission>(values))
        } else {
            None
        };

        match permissions {
            Some(permissions) => {
                debug!(count = permissions.len(), "Permissions loaded");
                self.permissions = permissions;
            }
            None => {
                warn!(reason = ?envelope.message, "Permissions unavailable");
                self.error = Some(envelope.display_message(Message::FetchPermissionsFailed, self.locale));
            }
        }
    }

    fn apply_role(&mut self, id: i64, envelope: &Envelope) {
        let role = if envelope.success {
            envelope
                .entity(&["role", "data"])
                .and_then(|value| decode::<Role>(value))
        } else {
            None
        };

        match role {
            Some(role) => {
                self.data = RoleFormData {
                    permissions: role.permission_ids(),
                    name: role.name,
                    description: role.description,
                };
            }
            None => {
                warn!(role_id = id, reason = ?envelope.message, "Role unavailable for form");
                self.error = Some(Message::RoleUnavailable.text(self.locale));
            }
        }
    }

    pub fn toggle_permission(&mut self, permission_id: i64) {
        if let Some(data) = self.data_mut() {
            data.toggle_permission(permission_id);
        }
    }

    pub fn build_payload(&self) -> RolePayload {
        RolePayload {
            name: self.data.name.trim().to_string(),
            description: self.data.description.trim().to_string(),
            permissions: self.data.permissions.clone(),
        }
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        if let Access::Denied(message) = self.access() {
            self.error = Some(message.text(self.locale));
            return SubmitOutcome::Denied(message);
        }
        let checked = if self.mode.is_read_only() {
            Err(ValidationError::ReadOnly)
        } else {
            validate_role_form(&self.data)
        };
        if let Err(e) = checked {
            self.error = Some(e.message().text(self.locale));
            return SubmitOutcome::Invalid(e);
        }

        let payload = self.build_payload();
        self.saving = true;
        self.error = None;

        let envelope = match self.mode.entity_id() {
            Some(id) => self.api.update(id, &payload).await,
            None => self.api.create(&payload).await,
        };

        self.saving = false;

        if envelope.success {
            info!(mode = ?self.mode, name = %payload.name, "Role form saved");
            self.navigator.navigate(Route::RoleList);
            SubmitOutcome::Saved
        } else {
            let message = envelope.display_message(Message::SaveFailed, self.locale);
            self.error = Some(message.clone());
            SubmitOutcome::Failed(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::HttpClient;
    use crate::core::config::ApiConfig;
    use crate::core::routes::History;
    use crate::models::session::{CurrentUser, RoleName};
    use crate::stores::session_store::MemoryStore;
    use serde_json::json;

    fn form(mode: FormMode, role: &str) -> RoleFormView {
        let auth = Arc::new(AuthContext::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
        ));
        let user = CurrentUser {
            id: Some(1),
            name: "Root".into(),
            username: "root".into(),
            role: Some(RoleName::Name(role.into())),
        };
        auth.login("token", user, false).unwrap();

        let history: Arc<dyn Navigator> = Arc::new(History::new());
        let config = ApiConfig {
            origin: "http://127.0.0.1:9".into(),
            timeout_ms: 500,
        };
        let http = Arc::new(HttpClient::new(&config, auth.clone(), history.clone()).unwrap());
        RoleFormView::new(RoleApi::new(http, Locale::En), auth, history, mode)
    }

    #[test]
    fn test_access_requires_admin() {
        assert_eq!(
            form(FormMode::Create, "Cashier").access(),
            Access::Denied(Message::AdminOnlyManageRoles)
        );
        assert!(form(FormMode::Create, "SuperAdmin").access().is_granted());
    }

    #[test]
    fn test_hydrates_selected_permissions() {
        let mut view = form(FormMode::Edit(3), "Admin");
        let envelope = Envelope::from_payload(json!({
            "id": 3,
            "name": "Cashier",
            "description": "Front desk",
            "Permissions": [{"id": 7, "name": "sale.create"}, {"id": 2, "name": "sale.view"}]
        }));
        view.apply_role(3, &envelope);

        assert_eq!(view.data().permissions, vec![7, 2]);
        assert!(view.is_selected(7));

        view.toggle_permission(7);
        view.toggle_permission(9);
        assert_eq!(view.build_payload().permissions, vec![2, 9]);
    }

    #[test]
    fn test_permissions_from_bare_array() {
        let mut view = form(FormMode::Create, "Admin");
        view.apply_permissions(&Envelope::from_payload(json!([
            {"id": 1, "name": "user.view"},
            {"id": 2, "name": "user.edit"}
        ])));
        assert_eq!(view.permissions().len(), 2);
        assert_eq!(view.error(), None);
    }

    #[tokio::test]
    async fn test_invalid_role_is_not_sent() {
        let mut view = form(FormMode::Create, "Admin");
        if let Some(data) = view.data_mut() {
            data.name = "Cashier".into();
        }
        assert_eq!(
            view.submit().await,
            SubmitOutcome::Invalid(ValidationError::RoleDescriptionRequired)
        );
        assert_eq!(
            view.error(),
            Some(Message::RoleDescriptionRequired.text(Locale::En).as_str())
        );
    }
}
