//! Navigation requests and the verdicts guards return for them.
//!
//! A trigger from the shell becomes a [`NavigationRequest`] before anything
//! else happens. Guards inspect it and answer with a [`NavigationAction`];
//! middleware observes it on both sides of the transition.
//!
//! # Pipeline
//!
//! 1. **Skip check**: external links and the current location are no-ops
//! 2. **Guards**: allow, deny, or redirect (see [`guards`](crate::guards))
//! 3. **Middleware `before`**
//! 4. **Intent recorded**, router transition issued
//! 5. **Settle**: intent cleared, tab opened or activated
//! 6. **Middleware `after`**: also on failure and timeout

use crate::intent::NavigationSource;

// ============================================================================
// NavigationRequest
// ============================================================================

/// A navigation about to be attempted.
///
/// ```
/// use gpui_workbench::{NavigationRequest, NavigationSource};
///
/// let request = NavigationRequest::new("/users", "Users", NavigationSource::Sidebar)
///     .with_from("/");
/// assert_eq!(request.to, "/users");
/// assert_eq!(request.from.as_deref(), Some("/"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    /// The location at the time of the request
    pub from: Option<String>,
    /// The requested path
    pub to: String,
    /// Label for the pending overlay and the tab title
    pub label: String,
    /// Where the trigger came from
    pub source: NavigationSource,
}

impl NavigationRequest {
    /// Create a request with no origin location.
    pub fn new(to: impl Into<String>, label: impl Into<String>, source: NavigationSource) -> Self {
        Self {
            from: None,
            to: to.into(),
            label: label.into(),
            source,
        }
    }

    /// Set the origin location.
    #[must_use]
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }
}

// ============================================================================
// NavigationAction
// ============================================================================

/// Verdict of a guard.
///
/// ```
/// use gpui_workbench::NavigationAction;
///
/// let action = NavigationAction::deny("Not authorized");
/// assert!(action.is_deny());
///
/// let action = NavigationAction::redirect("/login");
/// assert_eq!(action.redirect_path(), Some("/login"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationAction {
    /// Let the navigation proceed.
    Continue,

    /// Stop the navigation.
    Deny {
        /// Shown to the user and logged.
        reason: String,
    },

    /// Navigate somewhere else instead.
    Redirect {
        /// Replacement target.
        to: String,
        /// Optional explanation.
        reason: Option<String>,
    },
}

impl NavigationAction {
    /// Alias for [`Continue`](Self::Continue).
    pub fn allow() -> Self {
        Self::Continue
    }

    /// Deny with a reason.
    pub fn deny(reason: impl Into<String>) -> Self {
        Self::Deny {
            reason: reason.into(),
        }
    }

    /// Redirect to `to`.
    pub fn redirect(to: impl Into<String>) -> Self {
        Self::Redirect {
            to: to.into(),
            reason: None,
        }
    }

    /// Redirect to `to`, recording why.
    pub fn redirect_with_reason(to: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Redirect {
            to: to.into(),
            reason: Some(reason.into()),
        }
    }

    /// Check if this action allows navigation to continue.
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }

    /// Check if this action denies navigation.
    pub fn is_deny(&self) -> bool {
        matches!(self, Self::Deny { .. })
    }

    /// Check if this action redirects navigation.
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }

    /// The redirect target, if any.
    pub fn redirect_path(&self) -> Option<&str> {
        match self {
            Self::Redirect { to, .. } => Some(to.as_str()),
            _ => None,
        }
    }
}
