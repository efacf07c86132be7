// Authentication context: token storage, current user and session epochs

use crate::core::error::StoreError;
use crate::models::session::CurrentUser;
use crate::stores::session_store::{KeyValueStore, TOKEN_KEY, USER_KEY};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Snapshot published to subscribers whenever the session changes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<CurrentUser>,
    /// Bumped on every login and logout
    pub epoch: u64,
}

/// Explicit auth state shared by the HTTP client and the views.
///
/// Tokens are read from the persistent store first and the session store
/// second. The epoch lets the 401 handler tell whether a failed request was
/// issued under the session that is still current.
pub struct AuthContext {
    persistent: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
    state: watch::Sender<Session>,
}

impl AuthContext {
    pub fn new(persistent: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            persistent,
            session,
            state,
        }
    }

    /// Build the context and restore the current user from storage
    pub fn load(persistent: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        let context = Self::new(persistent, session);
        context.reload();
        context
    }

    pub fn reload(&self) {
        let user = self.read_user();
        debug!(signed_in = user.is_some(), "Session restored from storage");
        self.state.send_modify(|session| session.user = user);
    }

    fn read_user(&self) -> Option<CurrentUser> {
        for store in [&self.persistent, &self.session] {
            let Some(raw) = store.get(USER_KEY) else {
                continue;
            };
            match serde_json::from_str::<CurrentUser>(&raw) {
                Ok(user) => return Some(user),
                Err(e) => warn!(error = %e, "Ignoring unreadable stored user"),
            }
        }
        None
    }

    /// Bearer token for the next request, if any
    pub fn bearer(&self) -> Option<String> {
        self.persistent
            .get(TOKEN_KEY)
            .filter(|token| !token.is_empty())
            .or_else(|| self.session.get(TOKEN_KEY).filter(|token| !token.is_empty()))
    }

    pub fn epoch(&self) -> u64 {
        self.state.borrow().epoch
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer().is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Store the token and user. `remember` selects the persistent store;
    /// the other store is cleared so only one copy exists.
    pub fn login(&self, token: &str, user: CurrentUser, remember: bool) -> Result<(), StoreError> {
        let (target, other) = if remember {
            (&self.persistent, &self.session)
        } else {
            (&self.session, &self.persistent)
        };

        clear_store(other.as_ref())?;
        target.set(TOKEN_KEY, token.to_string())?;
        target.set(USER_KEY, serde_json::to_string(&user)?)?;

        info!(
            username = %user.username,
            role = user.role_name().unwrap_or("none"),
            remember,
            "Signed in"
        );

        self.state.send_modify(|session| {
            session.user = Some(user);
            session.epoch += 1;
        });

        Ok(())
    }

    /// Clear both stores and notify subscribers
    pub fn logout(&self) {
        for store in [&self.persistent, &self.session] {
            if let Err(e) = clear_store(store.as_ref()) {
                warn!(error = %e, "Failed to clear session store");
            }
        }

        self.state.send_modify(|session| {
            session.user = None;
            session.epoch += 1;
        });

        info!("Signed out");
    }

    /// Tear the session down after a 401, unless the failing request was
    /// issued under an older session. Returns whether the session was cleared.
    pub fn expire(&self, issued_epoch: u64) -> bool {
        let current = self.epoch();
        if issued_epoch != current {
            debug!(
                issued_epoch,
                current_epoch = current,
                "Ignoring 401 from a request issued before the current session"
            );
            return false;
        }

        self.logout();
        true
    }
}

fn clear_store(store: &dyn KeyValueStore) -> Result<(), StoreError> {
    store.remove(TOKEN_KEY)?;
    store.remove(USER_KEY)?;
    Ok(())
}
