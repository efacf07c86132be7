use crate::api::envelope::{decode, decode_all, Envelope};
use crate::api::users::UserApi;
use crate::core::auth::AuthContext;
use crate::core::error::ValidationError;
use crate::core::messages::{Locale, Message};
use crate::core::routes::{FormMode, Navigator, Route};
use crate::models::role::Role;
use crate::models::user::{photo_src, User, UserPayload};
use crate::security::permissions::{Capabilities, Gate};
use crate::validation::forms::{validate_photo_size, validate_user_form, UserFormData};
use crate::views::Access;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved,
    Denied(Message),
    Invalid(ValidationError),
    Failed(String),
}

pub struct UserFormView {
    api: UserApi,
    auth: Arc<AuthContext>,
    navigator: Arc<dyn Navigator>,
    locale: Locale,
    mode: FormMode,
    roles: Vec<Role>,
    data: UserFormData,
    error: Option<String>,
    loading: bool,
    saving: bool,
}

impl UserFormView {
    pub fn new(
        api: UserApi,
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
            roles: Vec::new(),
            data: UserFormData::default(),
            error: None,
            loading: false,
            saving: false,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn data(&self) -> &UserFormData {
        &self.data
    }

    /// Field access for input handlers; ignored in view mode
    pub fn data_mut(&mut self) -> Option<&mut UserFormData> {
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

    /// Preview source for the attached or stored photo
    pub fn image_preview(&self) -> Option<String> {
        photo_src(self.data.photo.as_deref())
    }

    pub fn access(&self) -> Access {
        let caps = Capabilities::for_user(self.auth.current_user().as_ref());
        match self.mode {
            FormMode::Create if !caps.create => {
                return Access::Denied(Message::NoCreatePermission)
            }
            FormMode::Edit(_) if !caps.edit => return Access::Denied(Message::NoEditPermission),
            FormMode::View(_) if !caps.view => return Access::Denied(Message::NoViewPermission),
            _ => {}
        }
        Gate::AdminOnly.render(
            &self.auth,
            || Access::Granted,
            || Access::Denied(Message::AdminOnlyManageUsers),
        )
    }

    /// Load roles, then the target user outside create mode
    pub async fn mount(&mut self) {
        self.loading = true;
        self.error = None;

        let envelope = self.api.roles().await;
        self.apply_roles(&envelope);

        if let Some(id) = self.mode.entity_id() {
            let envelope = self.api.get_by_id(id).await;
            self.apply_user(id, &envelope);
        }

        self.loading = false;
    }

    fn apply_roles(&mut self, envelope: &Envelope) {
        let roles = if envelope.success {
            envelope
                .collection(&["roles", "data"])
                .and_then(|values| decode_all::<Role>(values))
        } else {
            None
        };

        match roles {
            Some(roles) => {
                debug!(count = roles.len(), "Roles loaded for user form");
                self.roles = roles;
            }
            None => {
                warn!(reason = ?envelope.message, "Roles unavailable for user form");
                self.error = Some(Message::RolesUnavailable.text(self.locale));
            }
        }
    }

    fn apply_user(&mut self, id: i64, envelope: &Envelope) {
        let user = if envelope.success {
            envelope
                .entity(&["user", "data"])
                .and_then(|value| decode::<User>(value))
        } else {
            None
        };

        let Some(user) = user else {
            warn!(user_id = id, reason = ?envelope.message, "User unavailable for form");
            self.error = Some(Message::UserUnavailable.text(self.locale));
            return;
        };

        self.data = UserFormData {
            role_id: user
                .effective_role_id()
                .map(|id| id.to_string())
                .unwrap_or_default(),
            name: user.name,
            username: user.username,
            email: user.email.unwrap_or_default(),
            phone: user.phone.unwrap_or_default(),
            address: user.address.unwrap_or_default(),
            password: String::new(),
            confirm_password: String::new(),
            status: user.status.unwrap_or_default(),
            photo: user.photo.filter(|p| !p.trim().is_empty()),
        };
    }

    /// Accept an uploaded image as a data URL. Oversized files are rejected
    /// and the current photo is kept.
    pub fn attach_photo(&mut self, bytes: &[u8], mime: &str) -> Result<(), ValidationError> {
        if self.mode.is_read_only() {
            return Err(ValidationError::ReadOnly);
        }
        if let Err(e) = validate_photo_size(bytes.len()) {
            self.error = Some(e.message().text(self.locale));
            return Err(e);
        }

        let mime = if mime.is_empty() { "image/jpeg" } else { mime };
        self.data.photo = Some(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)));
        self.error = None;
        Ok(())
    }

    pub fn remove_photo(&mut self) {
        if !self.mode.is_read_only() {
            self.data.photo = None;
        }
    }

    pub fn build_payload(&self) -> Result<UserPayload, ValidationError> {
        self.data.to_payload()
    }

    /// Validate and send. Nothing goes over the wire when validation fails.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if let Access::Denied(message) = self.access() {
            self.error = Some(message.text(self.locale));
            return SubmitOutcome::Denied(message);
        }
        if let Err(e) = validate_user_form(&self.data, &self.roles, self.mode) {
            self.error = Some(e.message().text(self.locale));
            return SubmitOutcome::Invalid(e);
        }
        let payload = match self.build_payload() {
            Ok(payload) => payload,
            Err(e) => {
                self.error = Some(e.message().text(self.locale));
                return SubmitOutcome::Invalid(e);
            }
        };

        self.saving = true;
        self.error = None;

        let envelope = match self.mode {
            FormMode::Create => self.api.create(&payload).await,
            FormMode::Edit(id) => self.api.update(id, &payload).await,
            FormMode::View(_) => {
                self.saving = false;
                return SubmitOutcome::Invalid(ValidationError::ReadOnly);
            }
        };

        self.saving = false;

        if envelope.success {
            info!(mode = ?self.mode, username = %payload.username, "User form saved");
            self.navigator.navigate(Route::UserList);
            SubmitOutcome::Saved
        } else {
            let message = envelope.display_message(Message::SaveUserFailed, self.locale);
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

    fn form(mode: FormMode, role: Option<&str>) -> UserFormView {
        let auth = Arc::new(AuthContext::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
        ));
        if let Some(role) = role {
            let user = CurrentUser {
                id: Some(1),
                name: "Root".into(),
                username: "root".into(),
                role: Some(RoleName::Name(role.into())),
            };
            auth.login("token", user, false).unwrap();
        }
        let history: Arc<dyn Navigator> = Arc::new(History::new());
        let config = ApiConfig {
            origin: "http://127.0.0.1:9".into(),
            timeout_ms: 500,
        };
        let http = Arc::new(HttpClient::new(&config, auth.clone(), history.clone()).unwrap());
        UserFormView::new(UserApi::new(http, Locale::En), auth, history, mode)
    }

    #[test]
    fn test_access_per_mode() {
        assert_eq!(
            form(FormMode::Create, Some("Cashier")).access(),
            Access::Denied(Message::NoCreatePermission)
        );
        assert_eq!(
            form(FormMode::Edit(2), None).access(),
            Access::Denied(Message::NoEditPermission)
        );
        assert!(form(FormMode::Edit(2), Some("Admin")).access().is_granted());
    }

    #[tokio::test]
    async fn test_denied_submit_sends_nothing() {
        let mut view = form(FormMode::Create, Some("Cashier"));
        assert_eq!(
            view.submit().await,
            SubmitOutcome::Denied(Message::NoCreatePermission)
        );
    }

    #[test]
    fn test_attach_photo_builds_data_url() {
        let mut view = form(FormMode::Create, Some("Admin"));
        view.attach_photo(b"abc", "image/png").unwrap();
        assert_eq!(view.data().photo.as_deref(), Some("data:image/png;base64,YWJj"));
        assert_eq!(view.image_preview().as_deref(), Some("data:image/png;base64,YWJj"));
    }

    #[test]
    fn test_oversized_photo_keeps_previous() {
        let mut view = form(FormMode::Create, Some("Admin"));
        view.attach_photo(b"abc", "image/png").unwrap();

        let big = vec![0u8; 6 * 1024 * 1024];
        let err = view.attach_photo(&big, "image/png").unwrap_err();

        assert!(matches!(err, ValidationError::ImageTooLarge { .. }));
        assert_eq!(view.data().photo.as_deref(), Some("data:image/png;base64,YWJj"));
        assert_eq!(view.error(), Some(Message::ImageTooLarge.text(Locale::En).as_str()));
    }

    #[test]
    fn test_view_mode_is_read_only() {
        let mut view = form(FormMode::View(3), Some("Admin"));
        assert!(view.data_mut().is_none());
        assert_eq!(
            view.attach_photo(b"abc", "image/png"),
            Err(ValidationError::ReadOnly)
        );
    }

    #[test]
    fn test_hydrates_from_nested_or_bare_user() {
        let mut view = form(FormMode::Edit(4), Some("Admin"));
        let nested = Envelope::from_payload(json!({
            "user": {"id": 4, "name": "Dara", "username": "dara", "Role": {"id": 2, "name": "Cashier"}, "status": 0}
        }));
        view.apply_user(4, &nested);
        assert_eq!(view.data().name, "Dara");
        assert_eq!(view.data().role_id, "2");
        assert!(view.data().password.is_empty());

        let bare = Envelope::from_payload(json!({"id": 4, "name": "Sokha", "role_id": 3}));
        view.apply_user(4, &bare);
        assert_eq!(view.data().name, "Sokha");
        assert_eq!(view.data().role_id, "3");
    }

    #[test]
    fn test_hydrates_user_without_status() {
        let mut view = form(FormMode::Edit(5), Some("Admin"));
        let envelope = Envelope::from_payload(json!({
            "user": {"id": 5, "name": "Vanna", "username": "vanna", "role_id": 2, "status": null}
        }));
        view.apply_user(5, &envelope);

        assert_eq!(view.error(), None);
        assert_eq!(view.data().name, "Vanna");
        assert_eq!(view.data().status, crate::models::user::UserStatus::Active);
    }

    #[test]
    fn test_missing_roles_sets_error() {
        let mut view = form(FormMode::Create, Some("Admin"));
        view.apply_roles(&Envelope::from_payload(json!({"message": "ok"})));
        assert_eq!(view.error(), Some(Message::RolesUnavailable.text(Locale::En).as_str()));

        view.apply_roles(&Envelope::from_payload(json!({"roles": [{"id": 1, "name": "Admin"}]})));
        assert_eq!(view.roles().len(), 1);
    }
}
