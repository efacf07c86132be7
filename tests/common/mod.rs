//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::Arc;
use user_admin::core::config::Config;
use user_admin::core::messages::Locale;
use user_admin::core::state::AppState;
use user_admin::models::session::{CurrentUser, RoleName};
use user_admin::stores::session_store::MemoryStore;

pub const TOKEN: &str = "test-token";

/// State pointed at `origin`, English messages, in-memory stores
pub fn state(origin: &str) -> AppState {
    let mut config = Config::default();
    config.api.origin = origin.to_string();
    config.api.timeout_ms = 2000;
    config.list.reset_debounce_ms = 1;
    config.ui.locale = Locale::En;

    AppState::with_stores(
        config,
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryStore::new()),
    )
    .unwrap()
}

/// State with a signed-in user holding `role`
pub fn signed_in(origin: &str, role: &str) -> AppState {
    let state = state(origin);
    state.auth.login(TOKEN, operator(role), false).unwrap();
    state
}

pub fn operator(role: &str) -> CurrentUser {
    CurrentUser {
        id: Some(1),
        name: "Operator".to_string(),
        username: "operator".to_string(),
        role: Some(RoleName::Name(role.to_string())),
    }
}

pub fn user_json(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "name": format!("User {}", id),
        "username": format!("user{}", id),
        "email": format!("user{}@example.com", id),
        "role_id": 2,
        "Role": {"id": 2, "name": "Cashier"},
        "status": status,
        "createdAt": "2024-03-01T10:00:00.000Z"
    })
}

pub fn users_page(ids: std::ops::RangeInclusive<i64>, count: u64) -> Value {
    let users: Vec<Value> = ids.map(|id| user_json(id, "ACTIVE")).collect();
    json!({"users": users, "count": count})
}

pub fn roles_json() -> Value {
    json!({"roles": [
        {"id": 1, "name": "Admin", "description": "Everything"},
        {"id": 2, "name": "Cashier", "description": "Front desk"}
    ]})
}
