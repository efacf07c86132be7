// Application state (AppState)

use crate::api::client::HttpClient;
use crate::api::roles::RoleApi;
use crate::api::users::UserApi;
use crate::core::auth::AuthContext;
use crate::core::config::Config;
use crate::core::routes::{FormMode, History, Navigator};
use crate::stores::session_store::{FileStore, KeyValueStore, MemoryStore};
use crate::views::role_form::RoleFormView;
use crate::views::user_form::UserFormView;
use crate::views::user_list::UserListView;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

/// Shared client state
///
/// Owns the session stores, the navigation history and the one HTTP client
/// every resource API goes through.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    /// Signed-in user and bearer token
    pub auth: Arc<AuthContext>,

    /// Routes visited, including forced redirects to the login page
    pub history: Arc<History>,

    pub http: Arc<HttpClient>,

    pub users: UserApi,

    pub roles: RoleApi,
}

impl AppState {
    /// Build state with a file-backed persistent store at
    /// `config.session.store_path`
    pub fn new(config: Config) -> Result<Self> {
        let persistent = FileStore::open(&config.session.store_path).with_context(|| {
            format!(
                "Failed to open session store '{}'",
                config.session.store_path.display()
            )
        })?;
        Self::with_stores(config, Arc::new(persistent), Arc::new(MemoryStore::new()))
    }

    pub fn with_stores(
        config: Config,
        persistent: Arc<dyn KeyValueStore>,
        session: Arc<dyn KeyValueStore>,
    ) -> Result<Self> {
        let config = Arc::new(config);
        let auth = Arc::new(AuthContext::load(persistent, session));
        let history = Arc::new(History::new());
        let navigator: Arc<dyn Navigator> = history.clone();

        let http = Arc::new(HttpClient::new(&config.api, auth.clone(), navigator)?);
        let locale = config.ui.locale;

        debug!(
            origin = %http.origin(),
            locale = locale.as_str(),
            authenticated = auth.is_authenticated(),
            "Application state ready"
        );

        Ok(Self {
            users: UserApi::new(http.clone(), locale),
            roles: RoleApi::new(http.clone(), locale),
            config,
            auth,
            history,
            http,
        })
    }

    pub fn user_list(&self) -> UserListView {
        UserListView::new(self.users.clone(), self.auth.clone(), &self.config.list)
    }

    pub fn user_form(&self, mode: FormMode) -> UserFormView {
        UserFormView::new(
            self.users.clone(),
            self.auth.clone(),
            self.history.clone(),
            mode,
        )
    }

    pub fn role_form(&self, mode: FormMode) -> RoleFormView {
        RoleFormView::new(
            self.roles.clone(),
            self.auth.clone(),
            self.history.clone(),
            mode,
        )
    }
}
