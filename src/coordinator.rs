//! Navigation coordinator.
//!
//! [`NavigationCoordinator`] is the composition root of the workbench: it owns
//! the router, the pending-navigation store, the tab registry, the keep-alive
//! cache and the session/permission state, and runs the navigation pipeline
//! across them.
//!
//! Navigation is two-phase so that overlapping transitions can be observed:
//!
//! 1. [`request`](NavigationCoordinator::request) runs the skip check, guards
//!    and `before` middleware, records the intent and hands back the router's
//!    transition together with the intent's ticket.
//! 2. [`settle`](NavigationCoordinator::settle) is the completion callback.
//!    Only the ticket of the live intent may clear it; an older ticket comes
//!    back as [`NavigationOutcome::Superseded`].
//!
//! [`trigger`](NavigationCoordinator::trigger) does both in one call.
//!
//! ```
//! use gpui_workbench::{
//!     MemoryRouter, NavigationCoordinator, NavigationSource, WorkbenchConfig,
//! };
//!
//! let mut workbench = NavigationCoordinator::<_, String>::new(
//!     MemoryRouter::new("/"),
//!     WorkbenchConfig::default(),
//! );
//! let outcome = pollster::block_on(workbench.trigger("/users", "Users", NavigationSource::Sidebar));
//!
//! assert!(outcome.is_arrived());
//! assert_eq!(workbench.tabs().active().map(|t| t.path.as_str()), Some("/users"));
//! assert!(workbench.intent().current().is_none());
//! ```

use crate::config::WorkbenchConfig;
use crate::error::{NavigationError, NavigationOutcome, SkipReason, TabError};
#[cfg(feature = "guard")]
use crate::guards::{GuardContext, Guards, RouteGuard};
use crate::intent::{NavigationIntentStore, NavigationSource, NavigationTicket};
use crate::keep_alive::KeepAliveCache;
#[cfg(feature = "guard")]
use crate::lifecycle::NavigationAction;
use crate::lifecycle::NavigationRequest;
#[cfg(feature = "middleware")]
use crate::middleware::{MiddlewareStack, NavigationMiddleware};
use crate::permission::PermissionGate;
use crate::router::{NavigateFuture, Router};
use crate::session::{AuthSession, RoleCatalog};
use crate::tabs::{ClosedTabs, TabId, TabRegistry};
use crate::{debug_log, error_log, info_log, trace_log, warn_log};
use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

/// Maximum redirect depth to prevent infinite redirect loops.
pub const MAX_REDIRECT_DEPTH: usize = 5;

const EXTERNAL_SCHEMES: &[&str] = &["http:", "https:", "mailto:"];

/// Whether `path` leaves the workbench.
pub fn is_external(path: &str) -> bool {
    EXTERNAL_SCHEMES
        .iter()
        .any(|scheme| path.starts_with(scheme))
}

// ============================================================================
// Trigger result
// ============================================================================

/// A transition the router has started but not finished.
pub struct PendingNavigation {
    /// Ticket to present to [`NavigationCoordinator::settle`].
    pub ticket: NavigationTicket,
    /// Resolves when the router arrives or gives up.
    pub future: NavigateFuture,
}

impl fmt::Debug for PendingNavigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingNavigation")
            .field("ticket", &self.ticket)
            .finish()
    }
}

/// What [`NavigationCoordinator::request`] did.
#[derive(Debug)]
pub enum TriggerResult {
    /// A transition is in flight.
    Pending(PendingNavigation),
    /// Nothing was started (skipped or blocked).
    Finished(NavigationOutcome),
}

impl TriggerResult {
    /// Ticket of the started navigation, if any
    pub fn ticket(&self) -> Option<NavigationTicket> {
        match self {
            TriggerResult::Pending(pending) => Some(pending.ticket),
            TriggerResult::Finished(_) => None,
        }
    }

    /// Check if a transition was started
    pub fn is_pending(&self) -> bool {
        matches!(self, TriggerResult::Pending(_))
    }

    /// The outcome if nothing was started
    pub fn outcome(&self) -> Option<&NavigationOutcome> {
        match self {
            TriggerResult::Pending(_) => None,
            TriggerResult::Finished(outcome) => Some(outcome),
        }
    }
}

// ============================================================================
// NavigationCoordinator
// ============================================================================

/// Owns every piece of workbench state and keeps them consistent.
///
/// `V` is whatever the render surface retains per tab (`AnyView` under GPUI).
pub struct NavigationCoordinator<R, V> {
    router: R,
    config: WorkbenchConfig,
    intent: NavigationIntentStore,
    tabs: TabRegistry,
    keep_alive: KeepAliveCache<V>,
    session: AuthSession,
    roles: RoleCatalog,
    gate: PermissionGate,
    in_flight: HashMap<NavigationTicket, NavigationRequest>,
    last_error: Option<NavigationError>,
    #[cfg(feature = "guard")]
    guards: Guards,
    #[cfg(feature = "middleware")]
    middleware: MiddlewareStack,
}

impl<R: Router, V> NavigationCoordinator<R, V> {
    /// Create a coordinator with the pinned home tab open.
    ///
    /// If the router starts somewhere else, that location gets a tab too and
    /// becomes active.
    pub fn new(router: R, config: WorkbenchConfig) -> Self {
        let mut tabs = TabRegistry::new();
        tabs.open_pinned(&config.home_path, config.home_title.clone());

        let mut coordinator = Self {
            keep_alive: KeepAliveCache::with_capacity(config.keep_alive_capacity),
            router,
            config,
            intent: NavigationIntentStore::new(),
            tabs,
            session: AuthSession::anonymous(),
            roles: RoleCatalog::with_defaults(),
            gate: PermissionGate::default(),
            in_flight: HashMap::new(),
            last_error: None,
            #[cfg(feature = "guard")]
            guards: Guards::default(),
            #[cfg(feature = "middleware")]
            middleware: MiddlewareStack::new(),
        };
        coordinator.sync_tabs_to_location();
        info_log!(
            "Workbench ready at '{}' ({} tab(s))",
            coordinator.router.current_location(),
            coordinator.tabs.len()
        );
        coordinator
    }

    /// Replace the role catalog used by [`login`](Self::login).
    #[must_use]
    pub fn with_roles(mut self, roles: RoleCatalog) -> Self {
        self.roles = roles;
        self
    }

    /// Register a guard.
    #[cfg(feature = "guard")]
    pub fn add_guard<G: RouteGuard>(&mut self, guard: G) {
        debug_log!("Adding guard '{}'", guard.name());
        self.guards.push(Box::new(guard));
    }

    /// Register a middleware layer.
    #[cfg(feature = "middleware")]
    pub fn add_middleware<M: NavigationMiddleware>(&mut self, middleware: M) {
        debug_log!("Adding middleware '{}'", middleware.name());
        self.middleware.push(Box::new(middleware));
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    /// Start a navigation.
    ///
    /// External links and the current location are skipped without touching
    /// any state. Guard redirects are followed up to [`MAX_REDIRECT_DEPTH`].
    pub fn request(
        &mut self,
        path: impl Into<String>,
        label: impl Into<String>,
        source: NavigationSource,
    ) -> TriggerResult {
        let from = self.router.current_location();
        let request = NavigationRequest::new(path, label, source).with_from(from);
        self.request_with_depth(request, 0)
    }

    fn request_with_depth(&mut self, request: NavigationRequest, depth: usize) -> TriggerResult {
        if depth >= MAX_REDIRECT_DEPTH {
            error_log!(
                "Redirect loop detected (depth {}) navigating to '{}'",
                depth,
                request.to
            );
            return TriggerResult::Finished(NavigationOutcome::Blocked {
                reason: format!(
                    "Redirect loop detected (depth {}): target '{}'",
                    depth, request.to
                ),
            });
        }

        if is_external(&request.to) {
            debug_log!("Not navigating to external link '{}'", request.to);
            return TriggerResult::Finished(NavigationOutcome::Skipped(SkipReason::External));
        }
        if request.from.as_deref() == Some(request.to.as_str()) {
            trace_log!("Already at '{}', nothing to do", request.to);
            return TriggerResult::Finished(NavigationOutcome::Skipped(
                SkipReason::AlreadyCurrent,
            ));
        }

        #[cfg(feature = "guard")]
        {
            let cx = GuardContext::new(&self.session, &self.gate);
            match self.guards.check(&cx, &request) {
                NavigationAction::Continue => {}
                NavigationAction::Deny { reason } => {
                    warn_log!("Navigation to '{}' blocked: {}", request.to, reason);
                    return TriggerResult::Finished(NavigationOutcome::Blocked { reason });
                }
                NavigationAction::Redirect { to, reason } => {
                    debug_log!(
                        "Guard redirecting from '{}' to '{}': {:?}",
                        request.to,
                        to,
                        reason
                    );
                    let label = self.config.title_for(&to).to_string();
                    let mut redirected = NavigationRequest::new(to, label, request.source);
                    redirected.from = request.from;
                    return self.request_with_depth(redirected, depth + 1);
                }
            }
        }

        #[cfg(feature = "middleware")]
        self.middleware.run_before(&request);

        info_log!(
            "Navigation from {}: '{}' → '{}'",
            request.source,
            request.from.as_deref().unwrap_or(""),
            request.to
        );
        let ticket = self
            .intent
            .start_navigation(request.to.clone(), request.label.clone(), request.source);
        let future = self.router.navigate(&request.to);
        self.in_flight.insert(ticket, request);

        TriggerResult::Pending(PendingNavigation { ticket, future })
    }

    /// Completion callback for a navigation started by [`request`](Self::request).
    pub fn settle(
        &mut self,
        ticket: NavigationTicket,
        result: Result<(), NavigationError>,
    ) -> NavigationOutcome {
        let request = self.in_flight.remove(&ticket);

        if !self.intent.finish_if_current(ticket) {
            let path = request
                .as_ref()
                .map(|r| r.to.clone())
                .unwrap_or_default();
            debug_log!(
                "Navigation to '{}' (ticket {}) superseded",
                path,
                ticket.generation()
            );
            if !self.intent.is_pending() {
                self.sync_tabs_to_location();
            }
            let outcome = NavigationOutcome::Superseded { path };
            self.notify_after(request.as_ref(), &outcome);
            return outcome;
        }

        let outcome = match result {
            Ok(()) => {
                let location = self.router.current_location();
                let label = request
                    .as_ref()
                    .filter(|r| r.to == location && !r.label.is_empty())
                    .map(|r| r.label.clone());
                self.open_tab_for(&location, label);
                info_log!("Navigation arrived at '{}'", location);
                NavigationOutcome::Arrived { path: location }
            }
            Err(error) => {
                warn_log!("Navigation failed: {}", error);
                self.last_error = Some(error.clone());
                self.sync_tabs_to_location();
                NavigationOutcome::Failed(error)
            }
        };
        self.notify_after(request.as_ref(), &outcome);
        outcome
    }

    /// Request, await the router and settle in one call.
    pub async fn trigger(
        &mut self,
        path: impl Into<String>,
        label: impl Into<String>,
        source: NavigationSource,
    ) -> NavigationOutcome {
        match self.request(path, label, source) {
            TriggerResult::Finished(outcome) => outcome,
            TriggerResult::Pending(pending) => {
                let result = pending.future.await;
                self.settle(pending.ticket, result)
            }
        }
    }

    /// Fail the pending navigation if it has outlived the configured timeout.
    pub fn expire_pending(&mut self, now: Instant) -> Option<NavigationOutcome> {
        let timeout = self.config.navigation_timeout?;
        let intent = self.intent.expire(now, timeout)?;
        Some(self.fail_timed_out(intent.ticket, intent.target_path, timeout))
    }

    /// Fail the navigation identified by `ticket` if it is still pending.
    ///
    /// Used by timers that fire once per request: the clock has already
    /// been checked, only the ticket needs to match.
    ///
    /// A stale ticket is forgotten without an outcome, so a router that never
    /// resolves a superseded transition does not leave it behind.
    pub fn time_out(&mut self, ticket: NavigationTicket) -> Option<NavigationOutcome> {
        let timeout = self.config.navigation_timeout?;
        let Some(path) = self
            .intent
            .current()
            .filter(|intent| intent.ticket == ticket)
            .map(|intent| intent.target_path.clone())
        else {
            if self.in_flight.remove(&ticket).is_some() {
                trace_log!("Dropped superseded ticket {}", ticket.generation());
            }
            return None;
        };
        warn_log!("Navigation to '{}' timed out after {:?}", path, timeout);
        self.intent.finish_navigation();
        Some(self.fail_timed_out(ticket, path, timeout))
    }

    fn fail_timed_out(
        &mut self,
        ticket: NavigationTicket,
        path: String,
        timeout: std::time::Duration,
    ) -> NavigationOutcome {
        let error = NavigationError::TimedOut {
            path,
            timeout_ms: timeout.as_millis(),
        };
        self.last_error = Some(error.clone());

        self.sync_tabs_to_location();

        let request = self.in_flight.remove(&ticket);
        let outcome = NavigationOutcome::Failed(error);
        self.notify_after(request.as_ref(), &outcome);
        outcome
    }

    /// Reconcile after the router moved on its own (back, forward, deep link).
    ///
    /// Clears the intent if the router is now at its target, and activates
    /// the tab for the router's location.
    pub fn observe_location(&mut self) -> Option<TabId> {
        let location = self.router.current_location();
        if self.intent.finish_on_arrival(&location) {
            debug_log!("Router reached pending target '{}'", location);
        }
        self.open_tab_for(&location, None)
    }

    #[allow(unused_variables)]
    fn notify_after(&self, request: Option<&NavigationRequest>, outcome: &NavigationOutcome) {
        #[cfg(feature = "middleware")]
        if let Some(request) = request {
            self.middleware.run_after(request, outcome);
        }
    }

    fn sync_tabs_to_location(&mut self) -> Option<TabId> {
        let location = self.router.current_location();
        self.open_tab_for(&location, None)
    }

    /// The login path (with or without a query or subpath) lives outside the
    /// tabbed shell.
    fn is_tabbed(&self, path: &str) -> bool {
        match path.strip_prefix(self.config.login_path.as_str()) {
            Some(rest) => !(rest.is_empty() || rest.starts_with('?') || rest.starts_with('/')),
            None => true,
        }
    }

    fn open_tab_for(&mut self, path: &str, label: Option<String>) -> Option<TabId> {
        if !self.is_tabbed(path) {
            trace_log!("'{}' is outside the tabbed shell", path);
            return None;
        }
        let title = label.unwrap_or_else(|| self.config.title_for(path).to_string());
        let id = self.tabs.open_or_activate(path, title);
        self.keep_alive.touch(path);
        Some(id)
    }

    // ------------------------------------------------------------------------
    // Tab commands
    // ------------------------------------------------------------------------

    /// Make a tab active and navigate to it.
    pub fn activate_tab(&mut self, id: &TabId) -> Result<TriggerResult, TabError> {
        self.tabs.activate(id)?;
        self.keep_alive.touch(id.as_str());
        let (path, title) = self.tab_target(id)?;
        let result = self.request(path, title, NavigationSource::TabBar);
        Ok(self.resync_unless_pending(result))
    }

    /// Close one tab, dropping its retained view.
    ///
    /// Returns the navigation to the newly active tab when activation moved.
    pub fn close_tab(&mut self, id: &TabId) -> Result<Option<TriggerResult>, TabError> {
        let closed = self.tabs.close(id)?;
        Ok(self.after_close(closed))
    }

    /// Close every unpinned tab except `id`, which becomes active.
    pub fn close_other_tabs(&mut self, id: &TabId) -> Result<Option<TriggerResult>, TabError> {
        let closed = self.tabs.close_others(id)?;
        Ok(self.after_close(closed))
    }

    /// Close every unpinned tab.
    pub fn close_all_tabs(&mut self) -> Option<TriggerResult> {
        let closed = self.tabs.close_all();
        self.after_close(closed)
    }

    /// Move a tab within the bar.
    pub fn reorder_tabs(&mut self, from: usize, to: usize) -> Result<(), TabError> {
        self.tabs.reorder(from, to)
    }

    fn after_close(&mut self, closed: ClosedTabs) -> Option<TriggerResult> {
        for path in closed.removed_paths() {
            self.keep_alive.evict(path);
        }
        let active = closed.active?;
        let (path, title) = self.tab_target(&active).ok()?;
        if path == self.router.current_location() {
            return None;
        }
        let result = self.request(path, title, NavigationSource::TabBar);
        Some(self.resync_unless_pending(result))
    }

    /// Tab commands activate eagerly; a navigation that never started must
    /// hand activation back to the router's location.
    fn resync_unless_pending(&mut self, result: TriggerResult) -> TriggerResult {
        if !result.is_pending() {
            self.sync_tabs_to_location();
        }
        result
    }

    fn tab_target(&self, id: &TabId) -> Result<(String, String), TabError> {
        self.tabs
            .get(id)
            .map(|tab| (tab.path.clone(), tab.title.clone()))
            .ok_or_else(|| TabError::NotFound { id: id.to_string() })
    }

    // ------------------------------------------------------------------------
    // Keep-alive
    // ------------------------------------------------------------------------

    /// The view retained for `key`, mounting it with `factory` on first use.
    pub fn mount<F>(&mut self, key: &str, factory: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        self.keep_alive.get_or_create(key, factory)
    }

    // ------------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------------

    /// Adopt a signed-in session and project its role into the gate.
    pub fn login(&mut self, session: AuthSession) {
        let role = self.roles.resolve(&session);
        info_log!(
            "Signed in as '{}' with role {:?}",
            session
                .user
                .as_ref()
                .map(|u| u.name.as_str())
                .unwrap_or(""),
            role.as_ref().map(|r| r.id.as_str())
        );
        self.gate.set_role(role);
        self.session = session;
    }

    /// Tear the shell down and go to the login page.
    ///
    /// Retained views and unpinned tabs are dropped before the router is
    /// asked to move, so nothing from the old session is rendered again.
    pub fn logout(&mut self) -> TriggerResult {
        info_log!("Signing out");
        self.keep_alive.evict_all();
        self.tabs.close_all();
        self.intent.finish_navigation();
        self.in_flight.clear();
        self.session = AuthSession::anonymous();
        self.gate.set_role(None);

        let login = self.config.login_path.clone();
        let title = self.config.title_for(&login).to_string();
        self.request(login, title, NavigationSource::Command)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn intent(&self) -> &NavigationIntentStore {
        &self.intent
    }

    pub fn tabs(&self) -> &TabRegistry {
        &self.tabs
    }

    pub fn keep_alive(&self) -> &KeepAliveCache<V> {
        &self.keep_alive
    }

    pub fn keep_alive_mut(&mut self) -> &mut KeepAliveCache<V> {
        &mut self.keep_alive
    }

    pub fn gate(&self) -> &PermissionGate {
        &self.gate
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn roles(&self) -> &RoleCatalog {
        &self.roles
    }

    pub fn config(&self) -> &WorkbenchConfig {
        &self.config
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    /// Path the router currently shows.
    pub fn current_location(&self) -> String {
        self.router.current_location()
    }

    /// The router's location when no tab represents it (the login page).
    ///
    /// The outlet renders this page directly instead of the active tab.
    pub fn untabbed_location(&self) -> Option<String> {
        let location = self.router.current_location();
        self.tabs
            .find_by_path(&location)
            .is_none()
            .then_some(location)
    }

    /// Transitions started but neither settled nor timed out.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// The most recent navigation failure.
    pub fn last_error(&self) -> Option<&NavigationError> {
        self.last_error.as_ref()
    }

    /// Take the most recent navigation failure, e.g. to show it once.
    pub fn take_error(&mut self) -> Option<NavigationError> {
        self.last_error.take()
    }

    /// Window title for `path`.
    pub fn title_for(&self, path: &str) -> &str {
        self.config.title_for(path)
    }
}

impl<R, V> fmt::Debug for NavigationCoordinator<R, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationCoordinator")
            .field("intent", &self.intent)
            .field("tabs", &self.tabs)
            .field("keep_alive", &self.keep_alive)
            .field("authenticated", &self.session.is_authenticated())
            .field("last_error", &self.last_error)
            .finish()
    }
}
