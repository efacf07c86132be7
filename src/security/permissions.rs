//! Role-based permission predicates and rendering gates.
//!
//! Predicates are pure functions of the current user. Gates evaluate a
//! predicate against the [`AuthContext`] and pick between a `children` and a
//! `fallback` render. Nesting gates is a logical AND.

use crate::core::auth::AuthContext;
use crate::models::session::CurrentUser;

/// Privilege tier derived from the role name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RoleTier {
    Member,
    Admin,
    SuperAdmin,
}

impl RoleTier {
    /// `SuperAdmin`, `super_admin` and `Super Admin` are all the same tier
    pub fn from_role_name(name: &str) -> Self {
        let normalized: String = name
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "superadmin" => RoleTier::SuperAdmin,
            "admin" => RoleTier::Admin,
            _ => RoleTier::Member,
        }
    }
}

pub fn tier(user: Option<&CurrentUser>) -> Option<RoleTier> {
    user.map(|u| u.role_name().map_or(RoleTier::Member, RoleTier::from_role_name))
}

pub fn is_admin(user: Option<&CurrentUser>) -> bool {
    tier(user).is_some_and(|t| t >= RoleTier::Admin)
}

pub fn is_super_admin(user: Option<&CurrentUser>) -> bool {
    tier(user) == Some(RoleTier::SuperAdmin)
}

pub fn can_view_user(user: Option<&CurrentUser>) -> bool {
    is_admin(user)
}

pub fn can_create_user(user: Option<&CurrentUser>) -> bool {
    is_admin(user)
}

pub fn can_edit_user(user: Option<&CurrentUser>) -> bool {
    is_admin(user)
}

pub fn can_delete_user(user: Option<&CurrentUser>) -> bool {
    is_super_admin(user)
}

/// Capability flags computed once per render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub view: bool,
    pub create: bool,
    pub edit: bool,
    pub delete: bool,
}

impl Capabilities {
    pub fn for_user(user: Option<&CurrentUser>) -> Self {
        Self {
            view: can_view_user(user),
            create: can_create_user(user),
            edit: can_edit_user(user),
            delete: can_delete_user(user),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    AdminOnly,
    SuperAdminOnly,
}

impl Gate {
    pub fn allows(self, user: Option<&CurrentUser>) -> bool {
        match self {
            Gate::AdminOnly => is_admin(user),
            Gate::SuperAdminOnly => is_super_admin(user),
        }
    }

    /// Render `children` if the signed-in user passes the gate, else `fallback`
    pub fn render<T>(
        self,
        auth: &AuthContext,
        children: impl FnOnce() -> T,
        fallback: impl FnOnce() -> T,
    ) -> T {
        if self.allows(auth.current_user().as_ref()) {
            children()
        } else {
            fallback()
        }
    }

    /// Gate with the default fallback, which renders nothing
    pub fn show<T>(self, auth: &AuthContext, children: impl FnOnce() -> T) -> Option<T> {
        self.render(auth, || Some(children()), || None)
    }
}
