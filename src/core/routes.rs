// Client-side route table and navigation

use std::fmt;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Presentation mode of a form, built by the router from the route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
    View(i64),
}

impl FormMode {
    pub fn entity_id(&self) -> Option<i64> {
        match self {
            FormMode::Create => None,
            FormMode::Edit(id) | FormMode::View(id) => Some(*id),
        }
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self, FormMode::View(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    UserList,
    UserNew,
    UserView(i64),
    UserEdit(i64),
    RoleList,
    RoleNew,
    RoleEdit(i64),
}

impl Route {
    /// Parse a path such as `/users/edit/7`. Trailing slashes are ignored.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split('?').next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["login"] => Some(Route::Login),
            ["users"] => Some(Route::UserList),
            ["users", "new"] => Some(Route::UserNew),
            ["users", "edit", id] => id.parse().ok().map(Route::UserEdit),
            ["users", id] => id.parse().ok().map(Route::UserView),
            ["roles"] => Some(Route::RoleList),
            ["roles", "new"] => Some(Route::RoleNew),
            ["roles", "edit", id] => id.parse().ok().map(Route::RoleEdit),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::UserList => "/users".to_string(),
            Route::UserNew => "/users/new".to_string(),
            Route::UserView(id) => format!("/users/{}", id),
            Route::UserEdit(id) => format!("/users/edit/{}", id),
            Route::RoleList => "/roles".to_string(),
            Route::RoleNew => "/roles/new".to_string(),
            Route::RoleEdit(id) => format!("/roles/edit/{}", id),
        }
    }

    /// The form mode for routes that render a form
    pub fn form_mode(&self) -> Option<FormMode> {
        match self {
            Route::UserNew | Route::RoleNew => Some(FormMode::Create),
            Route::UserEdit(id) | Route::RoleEdit(id) => Some(FormMode::Edit(*id)),
            Route::UserView(id) => Some(FormMode::View(*id)),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that records every visited route
#[derive(Debug, Default)]
pub struct History {
    entries: Mutex<Vec<Route>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Route> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .copied()
    }

    pub fn entries(&self) -> Vec<Route> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for History {
    fn navigate(&self, route: Route) {
        debug!(route = %route, "Navigating");
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route);
    }
}
