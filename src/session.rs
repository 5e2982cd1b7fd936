//! Authentication session and role resolution.
//!
//! The session is the boundary where the loosely-shaped user record from the
//! auth backend becomes something the rest of the workbench can rely on. A
//! user's role arrives either as a role id or as a full role object
//! ([`RoleRef`]); [`RoleCatalog::resolve`] turns both into a normalized
//! [`Role`] once, so the [`PermissionGate`](crate::PermissionGate) never sees
//! the unresolved form.
//!
//! Authentication is cookie-presence only: a session with a token is
//! authenticated.

use crate::permission::{PermissionTag, Role};
use crate::{debug_log, warn_log};
use std::collections::HashMap;
use std::sync::Arc;

/// How a user record refers to its role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleRef {
    /// A role id to look up in the [`RoleCatalog`].
    Id(String),
    /// A role delivered inline with the user.
    Inline(Role),
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: RoleRef,
}

impl User {
    /// Create a user whose role is referenced by id.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        role_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role: RoleRef::Id(role_id.into()),
        }
    }

    /// Replace the role reference with an inline role.
    #[must_use]
    pub fn with_inline_role(mut self, role: Role) -> Self {
        self.role = RoleRef::Inline(role);
        self
    }
}

/// Current authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSession {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl AuthSession {
    /// A signed-out session
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A signed-in session
    pub fn signed_in(token: impl Into<String>, user: User) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(user),
        }
    }

    /// Whether a token is present
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Known roles, keyed by id.
#[derive(Debug, Clone)]
pub struct RoleCatalog {
    roles: HashMap<String, Arc<Role>>,
}

impl RoleCatalog {
    /// An empty catalog
    pub fn empty() -> Self {
        Self {
            roles: HashMap::new(),
        }
    }

    /// Catalog with the built-in `admin`, `editor` and `viewer` roles.
    pub fn with_defaults() -> Self {
        let mut catalog = Self::empty();
        catalog.insert(
            Role::new("admin", "Administrator")
                .with_description("Full access to every module")
                .with_permissions(PermissionTag::ALL.iter().copied()),
        );
        catalog.insert(
            Role::new("editor", "Editor")
                .with_description("Manages content, cannot administer users or settings")
                .with_permissions([
                    PermissionTag::DashboardView,
                    PermissionTag::UsersView,
                    PermissionTag::AnalyticsView,
                    PermissionTag::DocumentsView,
                    PermissionTag::DocumentsCreate,
                    PermissionTag::DocumentsEdit,
                    PermissionTag::FilesView,
                    PermissionTag::FilesUpload,
                    PermissionTag::MessagesView,
                    PermissionTag::MessagesSend,
                    PermissionTag::CalendarView,
                    PermissionTag::CalendarEdit,
                    PermissionTag::NotificationsView,
                ]),
        );
        catalog.insert(
            Role::new("viewer", "Viewer")
                .with_description("Read-only access")
                .with_permissions([
                    PermissionTag::DashboardView,
                    PermissionTag::AnalyticsView,
                    PermissionTag::DocumentsView,
                    PermissionTag::FilesView,
                    PermissionTag::MessagesView,
                    PermissionTag::CalendarView,
                    PermissionTag::NotificationsView,
                ]),
        );
        catalog
    }

    /// Add or replace a role
    pub fn insert(&mut self, role: Role) {
        self.roles.insert(role.id.clone(), Arc::new(role));
    }

    /// Look up a role by id
    pub fn get(&self, id: &str) -> Option<Arc<Role>> {
        self.roles.get(id).cloned()
    }

    /// Resolve a session's role.
    ///
    /// Returns `None` for anonymous sessions and for role ids the catalog
    /// does not know; both deny everything downstream.
    pub fn resolve(&self, session: &AuthSession) -> Option<Arc<Role>> {
        let user = session.user.as_ref()?;
        match &user.role {
            RoleRef::Inline(role) => Some(Arc::new(role.clone())),
            RoleRef::Id(id) => {
                let role = self.get(id);
                if role.is_some() {
                    debug_log!("Resolved role '{}' for user '{}'", id, user.id);
                } else {
                    warn_log!("Unknown role '{}' for user '{}', denying all", id, user.id);
                }
                role
            }
        }
    }
}

impl Default for RoleCatalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_session() {
        let session = AuthSession::anonymous();
        assert!(!session.is_authenticated());
        assert!(RoleCatalog::with_defaults().resolve(&session).is_none());
    }

    #[test]
    fn test_resolve_role_by_id() {
        let session = AuthSession::signed_in("t0k", User::new("1", "Ada", "ada@example.com", "viewer"));
        let role = RoleCatalog::with_defaults().resolve(&session).unwrap();
        assert_eq!(role.id, "viewer");
        assert!(role.grants(PermissionTag::DocumentsView));
        assert!(!role.grants(PermissionTag::DocumentsEdit));
    }

    #[test]
    fn test_resolve_inline_role() {
        let inline = Role::new("auditor", "Auditor").with_permissions([PermissionTag::AnalyticsExport]);
        let user = User::new("2", "Bo", "bo@example.com", "ignored").with_inline_role(inline);
        let role = RoleCatalog::empty()
            .resolve(&AuthSession::signed_in("t", user))
            .unwrap();
        assert_eq!(role.id, "auditor");
    }

    #[test]
    fn test_unknown_role_id_resolves_to_none() {
        let session = AuthSession::signed_in("t", User::new("3", "Cy", "cy@example.com", "root"));
        assert!(RoleCatalog::with_defaults().resolve(&session).is_none());
    }

    #[test]
    fn test_admin_holds_everything() {
        let admin = RoleCatalog::with_defaults().get("admin").unwrap();
        assert_eq!(admin.permissions.len(), PermissionTag::ALL.len());
    }
}
