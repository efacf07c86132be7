//! User and role forms against a mock backend.

mod common;

use common::{roles_json, signed_in, user_json};
use serde_json::{json, Value};
use user_admin::core::error::ValidationError;
use user_admin::core::messages::{Locale, Message};
use user_admin::core::routes::{FormMode, Route};
use user_admin::models::user::UserStatus;
use user_admin::views::user_form::SubmitOutcome;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_roles(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/roles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(roles_json()))
        .mount(server)
        .await;
}

mod user_form {
    use super::*;

    #[tokio::test]
    async fn test_empty_username_never_reaches_backend() {
        let server = MockServer::start().await;
        mock_roles(&server).await;
        Mock::given(method("POST"))
            .and(path("/register"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let state = signed_in(&server.uri(), "Admin");
        let mut form = state.user_form(FormMode::Create);
        form.mount().await;
        assert_eq!(form.roles().len(), 2);

        let data = form.data_mut().unwrap();
        data.name = "Sok Dara".into();
        data.username = "   ".into();
        data.role_id = "2".into();
        data.password = "secret1".into();
        data.confirm_password = "secret1".into();

        assert_eq!(
            form.submit().await,
            SubmitOutcome::Invalid(ValidationError::UsernameRequired)
        );
        assert_eq!(
            form.error(),
            Some(Message::UsernameRequired.text(Locale::En).as_str())
        );
        assert_eq!(state.history.current(), None);
    }

    #[tokio::test]
    async fn test_create_navigates_back_to_list() {
        let server = MockServer::start().await;
        mock_roles(&server).await;
        Mock::given(method("POST"))
            .and(path("/register"))
            .and(body_json(json!({
                "name": "Sok Dara",
                "username": "dara",
                "email": "dara@example.com",
                "phone": "",
                "address": "",
                "role_id": 2,
                "status": "ACTIVE",
                "photo": null,
                "password": "secret1"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 12, "username": "dara"})))
            .expect(1)
            .mount(&server)
            .await;

        let state = signed_in(&server.uri(), "Admin");
        let mut form = state.user_form(FormMode::Create);
        form.mount().await;

        let data = form.data_mut().unwrap();
        data.name = " Sok Dara ".into();
        data.username = "dara".into();
        data.email = "dara@example.com ".into();
        data.role_id = "2".into();
        data.password = "secret1".into();
        data.confirm_password = "secret1".into();

        assert_eq!(form.submit().await, SubmitOutcome::Saved);
        assert_eq!(state.history.current(), Some(Route::UserList));
        assert!(!form.is_saving());
    }

    #[tokio::test]
    async fn test_edit_with_blank_password_omits_key() {
        let server = MockServer::start().await;
        mock_roles(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/user/4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": user_json(4, "INACTIVE")})))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/user/4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let state = signed_in(&server.uri(), "Admin");
        let mut form = state.user_form(FormMode::Edit(4));
        form.mount().await;

        assert_eq!(form.data().username, "user4");
        assert_eq!(form.data().role_id, "2");
        assert_eq!(form.data().status, UserStatus::Inactive);

        form.data_mut().unwrap().phone = "012 345 678".into();
        assert_eq!(form.submit().await, SubmitOutcome::Saved);

        let requests = server.received_requests().await.unwrap();
        let put = requests
            .iter()
            .find(|r| r.method.to_string() == "PUT")
            .unwrap();
        let body: Value = serde_json::from_slice(&put.body).unwrap();
        assert!(body.get("password").is_none());
        assert_eq!(body["phone"], json!("012 345 678"));
        assert_eq!(body["status"], json!("INACTIVE"));
        assert_eq!(state.history.current(), Some(Route::UserList));
    }

    #[tokio::test]
    async fn test_server_rejection_is_shown() {
        let server = MockServer::start().await;
        mock_roles(&server).await;
        Mock::given(method("POST"))
            .and(path("/register"))
            .respond_with(
                ResponseTemplate::new(409)
                    .set_body_json(json!({"message": "Username already exists"})),
            )
            .mount(&server)
            .await;

        let state = signed_in(&server.uri(), "Admin");
        let mut form = state.user_form(FormMode::Create);
        form.mount().await;

        let data = form.data_mut().unwrap();
        data.name = "Dara".into();
        data.username = "dara".into();
        data.role_id = "1".into();
        data.password = "secret1".into();
        data.confirm_password = "secret1".into();

        assert_eq!(
            form.submit().await,
            SubmitOutcome::Failed("Username already exists".to_string())
        );
        assert_eq!(form.error(), Some("Username already exists"));
        assert_eq!(state.history.current(), None);
    }

    #[tokio::test]
    async fn test_missing_user_shows_error() {
        let server = MockServer::start().await;
        mock_roles(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/user/99"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not found"})))
            .mount(&server)
            .await;

        let state = signed_in(&server.uri(), "Admin");
        let mut form = state.user_form(FormMode::View(99));
        form.mount().await;

        assert_eq!(
            form.error(),
            Some(Message::UserUnavailable.text(Locale::En).as_str())
        );
        assert!(!form.is_loading());
    }

    #[tokio::test]
    async fn test_view_mode_never_submits() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let state = signed_in(&server.uri(), "Admin");
        let mut form = state.user_form(FormMode::View(4));

        assert_eq!(
            form.submit().await,
            SubmitOutcome::Invalid(ValidationError::ReadOnly)
        );
    }

    #[test]
    fn test_six_megabyte_image_rejected() {
        let state = signed_in("http://127.0.0.1:9", "Admin");
        let mut form = state.user_form(FormMode::Create);

        let image = vec![0u8; 6 * 1024 * 1024];
        assert!(matches!(
            form.attach_photo(&image, "image/jpeg"),
            Err(ValidationError::ImageTooLarge { .. })
        ));
        assert_eq!(form.data().photo, None);
        assert_eq!(form.image_preview(), None);
    }
}

mod role_form {
    use super::*;

    #[tokio::test]
    async fn test_edit_role_permissions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/user/permissions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"permissions": [
                {"id": 1, "name": "user.view"},
                {"id": 2, "name": "user.edit"},
                {"id": 3, "name": "user.delete"}
            ]})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/roles/5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"role": {
                "id": 5,
                "name": "Supervisor",
                "description": "Floor lead",
                "Permissions": [{"id": 1, "name": "user.view"}]
            }})))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/roles/5"))
            .and(body_json(json!({
                "name": "Supervisor",
                "description": "Floor lead",
                "permissions": [1, 2]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let state = signed_in(&server.uri(), "Admin");
        let mut form = state.role_form(FormMode::Edit(5));
        assert!(form.access().is_granted());
        form.mount().await;

        assert_eq!(form.permissions().len(), 3);
        assert!(form.is_selected(1));

        form.toggle_permission(2);
        assert_eq!(form.submit().await, SubmitOutcome::Saved);
        assert_eq!(state.history.current(), Some(Route::RoleList));
    }

    #[tokio::test]
    async fn test_create_role_failure_keeps_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/roles"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let state = signed_in(&server.uri(), "Admin");
        let mut form = state.role_form(FormMode::Create);
        let data = form.data_mut().unwrap();
        data.name = "Auditor".into();
        data.description = "Read only".into();

        let outcome = form.submit().await;

        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert!(form.error().is_some());
        assert_eq!(state.history.current(), None);
    }
}
