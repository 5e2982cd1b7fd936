//! Permission tags, roles and the render gate.
//!
//! [`PermissionGate`] is a stateless projection of the current [`Role`]: it
//! answers set-membership questions and picks between guarded content and a
//! fallback. A gate without a role denies everything.
//!
//! # Example
//!
//! ```
//! use gpui_workbench::permission::{PermissionGate, PermissionTag, Requirement, Role};
//! use std::sync::Arc;
//!
//! let role = Role::new("editor", "Editor")
//!     .with_permissions([PermissionTag::DocumentsView, PermissionTag::DocumentsEdit]);
//! let gate = PermissionGate::new(Some(Arc::new(role)));
//!
//! assert!(gate.has_permission(PermissionTag::DocumentsEdit));
//! assert!(!gate.has_permission(PermissionTag::UsersDelete));
//!
//! let shown = gate.guard(&Requirement::One(PermissionTag::UsersDelete), || "delete", || "");
//! assert_eq!(shown, "");
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

// ============================================================================
// PermissionTag
// ============================================================================

macro_rules! permission_tags {
    ($($variant:ident => $name:literal,)*) => {
        /// Capability identifier checked by the gate.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum PermissionTag {
            $(
                #[doc = concat!("`", $name, "`")]
                $variant,
            )*
        }

        impl PermissionTag {
            /// Every tag, in declaration order.
            pub const ALL: &'static [PermissionTag] = &[$(PermissionTag::$variant,)*];

            /// Wire name, e.g. `"users:edit"`.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(PermissionTag::$variant => $name,)*
                }
            }
        }

        impl FromStr for PermissionTag {
            type Err = UnknownPermission;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(PermissionTag::$variant),)*
                    other => Err(UnknownPermission(other.to_string())),
                }
            }
        }
    };
}

permission_tags! {
    DashboardView => "dashboard:view",
    UsersView => "users:view",
    UsersCreate => "users:create",
    UsersEdit => "users:edit",
    UsersDelete => "users:delete",
    AnalyticsView => "analytics:view",
    AnalyticsExport => "analytics:export",
    SettingsView => "settings:view",
    SettingsEdit => "settings:edit",
    DocumentsView => "documents:view",
    DocumentsCreate => "documents:create",
    DocumentsEdit => "documents:edit",
    DocumentsDelete => "documents:delete",
    FilesView => "files:view",
    FilesUpload => "files:upload",
    FilesDelete => "files:delete",
    MessagesView => "messages:view",
    MessagesSend => "messages:send",
    CalendarView => "calendar:view",
    CalendarEdit => "calendar:edit",
    NotificationsView => "notifications:view",
    NotificationsManage => "notifications:manage",
}

impl fmt::Display for PermissionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A permission name outside the closed tag set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPermission(pub String);

impl fmt::Display for UnknownPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown permission: {}", self.0)
    }
}

impl std::error::Error for UnknownPermission {}

// ============================================================================
// Role
// ============================================================================

/// A normalized role with its permission set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub label: String,
    pub description: Option<String>,
    pub permissions: BTreeSet<PermissionTag>,
}

impl Role {
    /// Create a role with no permissions. `label` doubles as the display name.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            label: label.into(),
            description: None,
            permissions: BTreeSet::new(),
        }
    }

    /// Grant permissions
    #[must_use]
    pub fn with_permissions(mut self, tags: impl IntoIterator<Item = PermissionTag>) -> Self {
        self.permissions.extend(tags);
        self
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether the role holds `tag`
    pub fn grants(&self, tag: PermissionTag) -> bool {
        self.permissions.contains(&tag)
    }
}

// ============================================================================
// Requirement
// ============================================================================

/// What a guarded region needs from the current role.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Requirement {
    /// No requirement; always renders.
    #[default]
    Always,
    /// A single tag.
    One(PermissionTag),
    /// At least one of the tags. An empty list never matches.
    Any(Vec<PermissionTag>),
    /// Every tag. An empty list always matches.
    All(Vec<PermissionTag>),
}

impl From<PermissionTag> for Requirement {
    fn from(tag: PermissionTag) -> Self {
        Requirement::One(tag)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |tags: &[PermissionTag]| {
            tags.iter()
                .map(|tag| tag.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        match self {
            Requirement::Always => f.write_str("nothing"),
            Requirement::One(tag) => write!(f, "{}", tag),
            Requirement::Any(tags) => write!(f, "any of [{}]", join(tags)),
            Requirement::All(tags) => write!(f, "all of [{}]", join(tags)),
        }
    }
}

// ============================================================================
// PermissionGate
// ============================================================================

/// Set-membership predicates over the current role.
#[derive(Debug, Clone, Default)]
pub struct PermissionGate {
    role: Option<Arc<Role>>,
}

impl PermissionGate {
    /// Create a gate for `role`; `None` denies everything.
    pub fn new(role: Option<Arc<Role>>) -> Self {
        Self { role }
    }

    /// Replace the role the gate projects.
    pub fn set_role(&mut self, role: Option<Arc<Role>>) {
        self.role = role;
    }

    /// Current role
    pub fn role(&self) -> Option<&Role> {
        self.role.as_deref()
    }

    /// Whether the role holds `tag`.
    pub fn has_permission(&self, tag: PermissionTag) -> bool {
        self.role.as_ref().is_some_and(|role| role.grants(tag))
    }

    /// Whether the role holds at least one of `tags`.
    pub fn has_any(&self, tags: &[PermissionTag]) -> bool {
        tags.iter().any(|tag| self.has_permission(*tag))
    }

    /// Whether the role holds every one of `tags`.
    pub fn has_all(&self, tags: &[PermissionTag]) -> bool {
        tags.iter().all(|tag| self.has_permission(*tag))
    }

    /// Evaluate a [`Requirement`].
    pub fn allows(&self, requirement: &Requirement) -> bool {
        match requirement {
            Requirement::Always => true,
            Requirement::One(tag) => self.has_permission(*tag),
            Requirement::Any(tags) => self.has_any(tags),
            Requirement::All(tags) => self.has_all(tags),
        }
    }

    /// Produce `children` if `requirement` holds, else `fallback`.
    pub fn guard<T>(
        &self,
        requirement: &Requirement,
        children: impl FnOnce() -> T,
        fallback: impl FnOnce() -> T,
    ) -> T {
        if self.allows(requirement) {
            children()
        } else {
            fallback()
        }
    }

    /// Produce `children` if `requirement` holds, else nothing.
    pub fn guard_or_none<T>(
        &self,
        requirement: &Requirement,
        children: impl FnOnce() -> T,
    ) -> Option<T> {
        self.allows(requirement).then(children)
    }
}
