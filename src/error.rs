//! Error and outcome types.
//!
//! - [`NavigationOutcome`]: how a triggered navigation ended
//!   (`Arrived`, `Skipped`, `Blocked`, `Superseded`, `Failed`).
//! - [`NavigationError`]: why a router transition failed.
//! - [`TabError`]: why a tab command was rejected.
//!
//! # Examples
//!
//! ```
//! use gpui_workbench::error::{NavigationOutcome, TabError};
//!
//! let outcome = NavigationOutcome::Arrived { path: "/users".into() };
//! assert!(outcome.is_arrived());
//! assert_eq!(outcome.path(), Some("/users"));
//!
//! let err = TabError::CannotClose { id: "/".into() };
//! assert_eq!(err.to_string(), "Tab '/' is pinned and cannot be closed");
//! ```

use std::fmt;

// ============================================================================
// Navigation outcome
// ============================================================================

/// Why a trigger did not start a navigation at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The target is already the current location.
    AlreadyCurrent,
    /// The target is an external link (`http:`, `https:`, `mailto:`).
    External,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AlreadyCurrent => write!(f, "already at target location"),
            SkipReason::External => write!(f, "external link"),
        }
    }
}

/// Final outcome of one navigation trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    /// The router arrived; the tab for `path` is now active.
    Arrived { path: String },
    /// Nothing happened.
    Skipped(SkipReason),
    /// A guard denied the navigation before it started.
    Blocked { reason: String },
    /// A newer navigation replaced this one before it completed.
    Superseded { path: String },
    /// The router transition failed or timed out.
    Failed(NavigationError),
}

impl NavigationOutcome {
    /// Check if the navigation arrived
    pub fn is_arrived(&self) -> bool {
        matches!(self, NavigationOutcome::Arrived { .. })
    }

    /// Check if the trigger was a no-op
    pub fn is_skipped(&self) -> bool {
        matches!(self, NavigationOutcome::Skipped(_))
    }

    /// Check if a guard blocked the navigation
    pub fn is_blocked(&self) -> bool {
        matches!(self, NavigationOutcome::Blocked { .. })
    }

    /// Check if a newer navigation won
    pub fn is_superseded(&self) -> bool {
        matches!(self, NavigationOutcome::Superseded { .. })
    }

    /// Check if the transition failed
    pub fn is_failed(&self) -> bool {
        matches!(self, NavigationOutcome::Failed(_))
    }

    /// Path the outcome refers to, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            NavigationOutcome::Arrived { path } | NavigationOutcome::Superseded { path } => {
                Some(path)
            }
            _ => None,
        }
    }

    /// The error of a failed navigation
    pub fn error(&self) -> Option<&NavigationError> {
        match self {
            NavigationOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

// ============================================================================
// NavigationError
// ============================================================================

/// Reasons a router transition can fail.
///
/// Implements [`std::error::Error`] and [`Display`](std::fmt::Display).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// The router does not know the path
    RouteNotFound { path: String },

    /// The router failed for another reason
    NavigationFailed { path: String, message: String },

    /// The transition did not finish within the configured timeout
    TimedOut { path: String, timeout_ms: u128 },

    /// Custom error
    Custom { message: String },
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::RouteNotFound { path } => {
                write!(f, "Route not found: {}", path)
            }
            NavigationError::NavigationFailed { path, message } => {
                write!(f, "Navigation to {} failed: {}", path, message)
            }
            NavigationError::TimedOut { path, timeout_ms } => {
                write!(f, "Navigation to {} timed out after {}ms", path, timeout_ms)
            }
            NavigationError::Custom { message } => {
                write!(f, "{}", message)
            }
        }
    }
}

impl std::error::Error for NavigationError {}

// ============================================================================
// TabError
// ============================================================================

/// Rejected tab command. The registry is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabError {
    /// The tab is pinned
    CannotClose { id: String },

    /// No tab has this id
    NotFound { id: String },

    /// A reorder index is past the end of the tab list
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for TabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TabError::CannotClose { id } => {
                write!(f, "Tab '{}' is pinned and cannot be closed", id)
            }
            TabError::NotFound { id } => write!(f, "No tab with id '{}'", id),
            TabError::IndexOutOfRange { index, len } => {
                write!(f, "Tab index {} out of range ({} tabs)", index, len)
            }
        }
    }
}

impl std::error::Error for TabError {}

// ============================================================================
// Tests
// ============================================================================
