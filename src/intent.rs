//! Pending-navigation store.
//!
//! [`NavigationIntentStore`] records the single navigation that is currently
//! in flight: where it goes, what label the pending overlay shows, and which
//! part of the shell triggered it. A new request replaces the old one; there
//! is no queue.
//!
//! Each [`start_navigation`](NavigationIntentStore::start_navigation) hands
//! out a [`NavigationTicket`]. Completion callbacks present their ticket to
//! [`finish_if_current`](NavigationIntentStore::finish_if_current), so a
//! superseded transition that finishes late cannot clear the overlay of the
//! navigation that replaced it.
//!
//! ```
//! use gpui_workbench::intent::{NavigationIntentStore, NavigationSource};
//!
//! let mut store = NavigationIntentStore::new();
//! let first = store.start_navigation("/users", "Users", NavigationSource::Sidebar);
//! let second = store.start_navigation("/files", "Files", NavigationSource::Command);
//!
//! assert!(!store.finish_if_current(first));
//! assert_eq!(store.current().map(|i| i.target_path.as_str()), Some("/files"));
//! assert!(store.finish_if_current(second));
//! assert!(store.current().is_none());
//! ```

use crate::{debug_log, trace_log, warn_log};
use std::fmt;
use std::time::{Duration, Instant};

/// Part of the shell a navigation was triggered from. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationSource {
    Sidebar,
    Header,
    Footer,
    Command,
    TabBar,
}

impl fmt::Display for NavigationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NavigationSource::Sidebar => "sidebar",
            NavigationSource::Header => "header",
            NavigationSource::Footer => "footer",
            NavigationSource::Command => "command",
            NavigationSource::TabBar => "tab-bar",
        };
        f.write_str(name)
    }
}

/// Generation number of one `start_navigation` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NavigationTicket(u64);

impl NavigationTicket {
    /// Raw generation value
    pub const fn generation(self) -> u64 {
        self.0
    }
}

/// An in-flight, user-requested route change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationIntent {
    /// Destination route
    pub target_path: String,
    /// Label shown while the transition is pending
    pub label: String,
    /// Where the request came from
    pub source: NavigationSource,
    /// Ticket identifying this request
    pub ticket: NavigationTicket,
    /// When the request was recorded
    pub started_at: Instant,
}

impl NavigationIntent {
    /// Time since the intent was recorded, measured against `now`.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }
}

/// Holds at most one [`NavigationIntent`].
#[derive(Debug, Default)]
pub struct NavigationIntentStore {
    current: Option<NavigationIntent>,
    generation: u64,
}

impl NavigationIntentStore {
    /// Create an idle store
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a navigation request, replacing any existing one.
    ///
    /// Callers skip this when `path` is already the current location.
    pub fn start_navigation(
        &mut self,
        path: impl Into<String>,
        label: impl Into<String>,
        source: NavigationSource,
    ) -> NavigationTicket {
        self.generation += 1;
        let ticket = NavigationTicket(self.generation);
        let intent = NavigationIntent {
            target_path: path.into(),
            label: label.into(),
            source,
            ticket,
            started_at: Instant::now(),
        };

        if let Some(previous) = &self.current {
            debug_log!(
                "Intent '{}' superseded by '{}' (generation {})",
                previous.target_path,
                intent.target_path,
                ticket.0
            );
        } else {
            trace_log!(
                "Intent '{}' from {} (generation {})",
                intent.target_path,
                source,
                ticket.0
            );
        }

        self.current = Some(intent);
        ticket
    }

    /// Clear the intent unconditionally. No-op when idle.
    pub fn finish_navigation(&mut self) {
        if let Some(intent) = self.current.take() {
            trace_log!("Intent '{}' finished", intent.target_path);
        }
    }

    /// Clear the intent only if `ticket` belongs to it.
    ///
    /// Returns `false` for stale tickets, leaving the newer intent in place.
    pub fn finish_if_current(&mut self, ticket: NavigationTicket) -> bool {
        if self.is_current(ticket) {
            self.finish_navigation();
            true
        } else {
            trace_log!("Ignoring completion for stale ticket {}", ticket.0);
            false
        }
    }

    /// Clear the intent if `location` is its target.
    pub fn finish_on_arrival(&mut self, location: &str) -> bool {
        let arrived = self
            .current
            .as_ref()
            .is_some_and(|intent| intent.target_path == location);
        if arrived {
            self.finish_navigation();
        }
        arrived
    }

    /// Force-clear an intent that has been pending longer than `timeout`.
    pub fn expire(&mut self, now: Instant, timeout: Duration) -> Option<NavigationIntent> {
        let expired = self
            .current
            .as_ref()
            .is_some_and(|intent| intent.age(now) >= timeout);
        if !expired {
            return None;
        }
        let intent = self.current.take()?;
        warn_log!(
            "Intent '{}' expired after {:?}",
            intent.target_path,
            intent.age(now)
        );
        Some(intent)
    }

    /// Whether `ticket` identifies the live intent.
    pub fn is_current(&self, ticket: NavigationTicket) -> bool {
        self.current
            .as_ref()
            .is_some_and(|intent| intent.ticket == ticket)
    }

    /// The live intent
    pub fn current(&self) -> Option<&NavigationIntent> {
        self.current.as_ref()
    }

    /// Whether a navigation is in flight
    pub fn is_pending(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_and_finish() {
        let mut store = NavigationIntentStore::new();
        assert!(!store.is_pending());

        store.start_navigation("/users", "Users", NavigationSource::Sidebar);
        let intent = store.current().unwrap();
        assert_eq!(intent.target_path, "/users");
        assert_eq!(intent.label, "Users");
        assert_eq!(intent.source, NavigationSource::Sidebar);

        store.finish_navigation();
        assert!(store.current().is_none());
    }

    #[test]
    fn test_finish_when_idle_is_noop() {
        let mut store = NavigationIntentStore::new();
        store.finish_navigation();
        store.finish_navigation();
        assert!(!store.is_pending());
    }

    #[test]
    fn test_new_request_overwrites() {
        let mut store = NavigationIntentStore::new();
        let a = store.start_navigation("/a", "A", NavigationSource::Header);
        let b = store.start_navigation("/b", "B", NavigationSource::Footer);

        assert!(b > a);
        assert!(!store.is_current(a));
        assert!(store.is_current(b));
        assert_eq!(store.current().unwrap().label, "B");
    }

    #[test]
    fn test_stale_ticket_does_not_clear() {
        let mut store = NavigationIntentStore::new();
        let old = store.start_navigation("/old", "Old", NavigationSource::Sidebar);
        store.start_navigation("/new", "New", NavigationSource::Sidebar);

        assert!(!store.finish_if_current(old));
        assert_eq!(store.current().unwrap().target_path, "/new");
    }

    #[test]
    fn test_finish_on_arrival_requires_matching_location() {
        let mut store = NavigationIntentStore::new();
        store.start_navigation("/users", "Users", NavigationSource::Sidebar);

        assert!(!store.finish_on_arrival("/"));
        assert!(store.is_pending());
        assert!(store.finish_on_arrival("/users"));
        assert!(!store.is_pending());
    }

    #[test]
    fn test_expire_after_timeout() {
        let mut store = NavigationIntentStore::new();
        store.start_navigation("/slow", "Slow", NavigationSource::Command);
        let started = store.current().unwrap().started_at;

        assert!(store
            .expire(started + Duration::from_millis(10), Duration::from_secs(1))
            .is_none());
        assert!(store.is_pending());

        let expired = store.expire(started + Duration::from_secs(2), Duration::from_secs(1));
        assert_eq!(expired.unwrap().target_path, "/slow");
        assert!(!store.is_pending());
    }

    #[test]
    fn test_source_display() {
        assert_eq!(NavigationSource::Command.to_string(), "command");
        assert_eq!(NavigationSource::TabBar.to_string(), "tab-bar");
    }
}
