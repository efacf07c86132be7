use crate::api::envelope::{decode_each, Envelope};
use crate::api::query::ListParams;
use crate::api::users::UserApi;
use crate::core::auth::AuthContext;
use crate::core::config::ListConfig;
use crate::core::messages::{Locale, Message};
use crate::models::user::{User, UserStatus};
use crate::security::permissions::{Capabilities, Gate};
use crate::views::pagination::Pagination;
use crate::views::Access;
use dashmap::DashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    Idle,
    Loading,
    Loaded,
    Error(String),
}

/// Identifies one list fetch. A result is only applied if its ticket is the
/// most recent one issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    params: ListParams,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn params(&self) -> &ListParams {
        &self.params
    }
}

/// Interactive yes/no prompt
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Counts over the rows of the currently loaded page only, not the whole
/// backend collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub admins: usize,
}

impl PageStats {
    pub const SCOPE_LABEL: &'static str = "this page";

    pub fn from_rows(rows: &[User], admin_role: &str) -> Self {
        Self {
            total: rows.len(),
            active: rows.iter().filter(|u| u.status == Some(UserStatus::Active)).count(),
            inactive: rows.iter().filter(|u| u.status == Some(UserStatus::Inactive)).count(),
            admins: rows.iter().filter(|u| u.role_name() == admin_role).count(),
        }
    }

    /// Share of the page in percent, `0.0` for an empty page
    pub fn percent(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 * 100.0 / self.total as f64
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowActions {
    pub view: bool,
    pub edit: bool,
    pub delete: bool,
    /// Delete in flight for this row; only its own delete is disabled
    pub delete_busy: bool,
    pub toggle_enabled: bool,
    pub toggle_to: UserStatus,
}

/// Removes a row's delete marker when dropped, so a cancelled delete future
/// does not leave the row disabled
struct DeletingGuard {
    marks: Arc<DashSet<i64>>,
    id: i64,
}

impl DeletingGuard {
    fn mark(marks: &Arc<DashSet<i64>>, id: i64) -> Self {
        marks.insert(id);
        Self {
            marks: Arc::clone(marks),
            id,
        }
    }
}

impl Drop for DeletingGuard {
    fn drop(&mut self) {
        self.marks.remove(&self.id);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    NotAllowed,
    Cancelled,
    Deleted,
    Failed(String),
}

pub struct UserListView {
    api: UserApi,
    auth: Arc<AuthContext>,
    locale: Locale,
    admin_role: String,
    reset_debounce: Duration,
    state: ListState,
    error: Option<String>,
    rows: Vec<User>,
    pagination: Pagination,
    search_term: String,
    deleting: Arc<DashSet<i64>>,
    generation: u64,
}

impl UserListView {
    pub fn new(api: UserApi, auth: Arc<AuthContext>, config: &ListConfig) -> Self {
        let locale = api.locale();
        Self {
            api,
            auth,
            locale,
            admin_role: config.admin_role.clone(),
            reset_debounce: Duration::from_millis(config.reset_debounce_ms),
            state: ListState::Idle,
            error: None,
            rows: Vec::new(),
            pagination: Pagination::new(config.page_size),
            search_term: String::new(),
            deleting: Arc::new(DashSet::new()),
            generation: 0,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities::for_user(self.auth.current_user().as_ref())
    }

    /// Whether the list may be shown at all, and the denial text otherwise
    pub fn access(&self) -> Access {
        if !self.capabilities().view {
            return Access::Denied(Message::NoViewPermission);
        }
        Gate::AdminOnly.render(
            &self.auth,
            || Access::Granted,
            || Access::Denied(Message::AdminOnlyUsers),
        )
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == ListState::Loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn rows(&self) -> &[User] {
        &self.rows
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn is_deleting(&self, id: i64) -> bool {
        self.deleting.contains(&id)
    }

    pub fn stats(&self) -> PageStats {
        PageStats::from_rows(&self.rows, &self.admin_role)
    }

    /// Message for an empty, loaded list
    pub fn empty_message(&self) -> Option<Message> {
        if self.state != ListState::Loaded || !self.rows.is_empty() {
            return None;
        }
        if self.search_term.is_empty() {
            Some(Message::NoUsers)
        } else {
            Some(Message::NoSearchResults)
        }
    }

    pub fn row_actions(&self, user: &User) -> RowActions {
        let caps = self.capabilities();
        let current = self.auth.current_user();
        RowActions {
            view: caps.view,
            edit: caps.edit && Gate::SuperAdminOnly.allows(current.as_ref()),
            delete: caps.delete,
            delete_busy: self.is_deleting(user.id),
            toggle_enabled: caps.edit,
            toggle_to: user.toggled_status(),
        }
    }

    /// Enter `Loading` and issue a ticket for the current page and search
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state = ListState::Loading;
        self.error = None;

        let mut params = ListParams::page(self.pagination.page(), self.pagination.limit());
        if !self.search_term.is_empty() {
            params = params.with_search(self.search_term.clone());
        }

        FetchTicket {
            generation: self.generation,
            params,
        }
    }

    /// Apply a fetch result. Returns false when the ticket was superseded and
    /// the result dropped.
    pub fn apply(&mut self, ticket: &FetchTicket, envelope: Envelope) -> bool {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "Discarding superseded list response"
            );
            return false;
        }

        let rows = if envelope.success {
            envelope
                .collection(&["users", "data"])
                .map(|values| decode_each::<User>(values))
        } else {
            None
        };

        match rows {
            Some(rows) => {
                let total = envelope
                    .count(&["count", "total"])
                    .filter(|n| *n > 0)
                    .unwrap_or(rows.len() as u64);
                self.pagination.set_total_items(total);
                self.rows = rows;
                self.state = ListState::Loaded;
                debug!(rows = self.rows.len(), total, page = self.pagination.page(), "User list loaded");
            }
            None => {
                let message = Message::UsersUnavailable.text(self.locale);
                warn!(reason = ?envelope.message, "User list unavailable");
                self.rows.clear();
                self.pagination.set_total_items(0);
                self.error = Some(message.clone());
                self.state = ListState::Error(message);
            }
        }
        true
    }

    pub async fn refresh(&mut self) {
        let ticket = self.begin_fetch();
        let envelope = self.api.list(ticket.params()).await;
        self.apply(&ticket, envelope);
    }

    pub async fn mount(&mut self) {
        self.refresh().await;
    }

    /// Fetch `page` directly, before the total is known. Returns false when
    /// the loaded total has fewer pages.
    pub async fn open_page(&mut self, page: u32) -> bool {
        self.pagination.jump_to(page);
        self.refresh().await;
        self.pagination.page() <= self.pagination.total_pages()
    }

    pub async fn go_to_page(&mut self, page: u32) -> bool {
        if !self.pagination.go_to(page) {
            return false;
        }
        self.refresh().await;
        true
    }

    pub async fn first_page(&mut self) -> bool {
        self.go_to_page(1).await
    }

    pub async fn prev_page(&mut self) -> bool {
        let page = self.pagination.page().saturating_sub(1);
        self.go_to_page(page).await
    }

    pub async fn next_page(&mut self) -> bool {
        let page = self.pagination.page().saturating_add(1);
        self.go_to_page(page).await
    }

    pub async fn last_page(&mut self) -> bool {
        let page = self.pagination.total_pages();
        self.go_to_page(page).await
    }

    pub async fn submit_search(&mut self) {
        self.pagination.reset();
        self.refresh().await;
    }

    /// Clear the search term and refetch unfiltered after the debounce
    pub async fn reset_search(&mut self) {
        self.search_term.clear();
        self.pagination.reset();
        tokio::time::sleep(self.reset_debounce).await;
        self.refresh().await;
    }

    /// Flip a loaded row's status, then refetch the page whatever the outcome
    pub async fn toggle_status(&mut self, id: i64) -> bool {
        let Some(target) = self.rows.iter().find(|u| u.id == id).map(User::toggled_status) else {
            return false;
        };
        self.set_status(id, target).await
    }

    /// Send a status change for any user, then refetch the page
    pub async fn set_status(&mut self, id: i64, target: UserStatus) -> bool {
        if !self.capabilities().edit {
            self.error = Some(Message::NoEditPermission.text(self.locale));
            return false;
        }

        let envelope = self.api.update_status(id, target).await;

        self.refresh().await;

        if !envelope.success {
            warn!(user_id = id, reason = ?envelope.message, "Status toggle failed");
            self.error = Some(Message::StatusToggleFailed.text(self.locale));
        }
        envelope.success
    }

    /// Delete a row after confirmation. Cancelling issues no request.
    pub async fn delete(&mut self, id: i64, confirm: &impl Confirm) -> DeleteOutcome {
        if !self.capabilities().delete {
            return DeleteOutcome::NotAllowed;
        }

        let name = self
            .rows
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.name.clone())
            .unwrap_or_else(|| id.to_string());
        let prompt = Message::ConfirmDeleteUser(name).text(self.locale);

        if !confirm.confirm(&prompt) {
            debug!(user_id = id, "Delete cancelled");
            return DeleteOutcome::Cancelled;
        }

        let marker = DeletingGuard::mark(&self.deleting, id);
        let envelope = self.api.delete(id).await;
        self.refresh().await;
        drop(marker);

        if envelope.success {
            info!(user_id = id, "Deleted user from list");
            DeleteOutcome::Deleted
        } else {
            let message = Message::DeleteRowFailed.text(self.locale);
            self.error = Some(message.clone());
            DeleteOutcome::Failed(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(id: i64, status: UserStatus, role: &str) -> User {
        serde_json::from_value(json!({
            "id": id,
            "name": format!("user{}", id),
            "username": format!("user{}", id),
            "status": status.as_str(),
            "Role": {"id": 1, "name": role}
        }))
        .unwrap()
    }

    #[test]
    fn test_page_stats() {
        let rows = vec![
            user(1, UserStatus::Active, "Admin"),
            user(2, UserStatus::Inactive, "Cashier"),
            user(3, UserStatus::Active, "Admin"),
            user(4, UserStatus::Active, "SuperAdmin"),
        ];
        let stats = PageStats::from_rows(&rows, "Admin");

        assert_eq!(stats.total, 4);
        assert_eq!(stats.active, 3);
        assert_eq!(stats.inactive, 1);
        assert_eq!(stats.admins, 2);
        assert_eq!(stats.percent(stats.active), 75.0);
    }

    #[test]
    fn test_rows_without_status_count_in_neither_bucket() {
        let mut unknown = user(5, UserStatus::Active, "Cashier");
        unknown.status = None;
        let rows = vec![user(1, UserStatus::Active, "Admin"), unknown];
        let stats = PageStats::from_rows(&rows, "Admin");

        assert_eq!((stats.total, stats.active, stats.inactive), (2, 1, 0));
    }

    #[test]
    fn test_deleting_guard_clears_on_drop() {
        let marks = Arc::new(DashSet::new());
        let guard = DeletingGuard::mark(&marks, 4);
        assert!(marks.contains(&4));
        drop(guard);
        assert!(marks.is_empty());
    }

    #[test]
    fn test_empty_page_percent() {
        let stats = PageStats::from_rows(&[], "Admin");
        assert_eq!(stats.percent(0), 0.0);
    }

    #[test]
    fn test_closure_confirm() {
        let yes = |_: &str| true;
        let no = |prompt: &str| {
            assert!(prompt.contains("user1"));
            false
        };
        assert!(yes.confirm("anything"));
        assert!(!no.confirm("delete \"user1\"?"));
    }
}
