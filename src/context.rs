//! Workbench context integration for GPUI.
//!
//! This module stores the [`NavigationCoordinator`] in a GPUI `Global` and
//! drives its two-phase navigation on the foreground executor:
//!
//! - [`GlobalWorkbench`]: the coordinator plus the page table that builds a
//!   view for each tab the first time it is shown.
//! - [`Workbench`]: static methods (`Workbench::trigger`,
//!   `Workbench::close_tab`, …) that read/write the global through `cx`.
//!
//! A triggered navigation is issued synchronously; its router future is then
//! awaited in a spawned task and settled back into the global. A second task
//! fails the navigation if it is still pending when the configured timeout
//! elapses.
//!
//! # Initialization
//!
//! ```ignore
//! use gpui_workbench::{init_workbench, MemoryRouter, WorkbenchConfig};
//!
//! init_workbench(cx, MemoryRouter::new("/"), WorkbenchConfig::default(), |workbench| {
//!     workbench.page("/", |_window, cx, _path| cx.new(|_| DashboardPage).into());
//!     workbench.page("/users", |_window, cx, _path| cx.new(|_| UsersPage::default()).into());
//! });
//! ```

use crate::config::WorkbenchConfig;
use crate::coordinator::{NavigationCoordinator, PendingNavigation, TriggerResult};
use crate::error::{NavigationError, TabError};
use crate::intent::{NavigationIntent, NavigationSource};
use crate::permission::{PermissionTag, Requirement};
use crate::router::Router;
use crate::session::AuthSession;
use crate::tabs::{Tab, TabId};
use crate::{debug_log, trace_log};
use gpui::{AnyView, App, BorrowAppContext, Global, Window};
use std::collections::HashMap;
use std::rc::Rc;

// ============================================================================
// Page table
// ============================================================================

/// Builds the view for a tab. Receives the tab's path.
pub type PageBuilder = Rc<dyn Fn(&mut Window, &mut App, &str) -> AnyView>;

/// Path → view builder table.
#[derive(Default, Clone)]
pub struct PageTable {
    pages: HashMap<String, PageBuilder>,
    fallback: Option<PageBuilder>,
}

impl PageTable {
    /// Builder for `path`. The query string is ignored; unknown paths use
    /// the fallback.
    pub fn builder_for(&self, path: &str) -> Option<PageBuilder> {
        let route = path.split_once('?').map_or(path, |(route, _)| route);
        self.pages
            .get(route)
            .or(self.fallback.as_ref())
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

// ============================================================================
// GlobalWorkbench
// ============================================================================

/// The coordinator as seen by GPUI.
pub struct GlobalWorkbench {
    coordinator: NavigationCoordinator<Box<dyn Router>, AnyView>,
    pages: PageTable,
    /// View for a location outside the tab bar (the login page). Not kept
    /// alive: it is replaced when the location changes.
    detached: Option<(String, AnyView)>,
}

impl Global for GlobalWorkbench {}

impl GlobalWorkbench {
    pub fn new(router: impl Router + 'static, config: WorkbenchConfig) -> Self {
        let router: Box<dyn Router> = Box::new(router);
        Self {
            coordinator: NavigationCoordinator::new(router, config),
            pages: PageTable::default(),
            detached: None,
        }
    }

    /// Register the page shown for `path`.
    pub fn page<F>(&mut self, path: impl Into<String>, builder: F) -> &mut Self
    where
        F: Fn(&mut Window, &mut App, &str) -> AnyView + 'static,
    {
        self.pages.pages.insert(path.into(), Rc::new(builder));
        self
    }

    /// Register the page shown for paths without their own builder.
    pub fn fallback_page<F>(&mut self, builder: F) -> &mut Self
    where
        F: Fn(&mut Window, &mut App, &str) -> AnyView + 'static,
    {
        self.pages.fallback = Some(Rc::new(builder));
        self
    }

    pub fn pages(&self) -> &PageTable {
        &self.pages
    }

    pub fn coordinator(&self) -> &NavigationCoordinator<Box<dyn Router>, AnyView> {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut NavigationCoordinator<Box<dyn Router>, AnyView> {
        &mut self.coordinator
    }

    /// The view built for the untabbed `location`, if it is still current.
    pub(crate) fn detached_view(&self, location: &str) -> Option<AnyView> {
        self.detached
            .as_ref()
            .filter(|(path, _)| path == location)
            .map(|(_, view)| view.clone())
    }

    pub(crate) fn set_detached_view(&mut self, view: Option<(String, AnyView)>) {
        self.detached = view;
    }
}

// ============================================================================
// UseWorkbench trait
// ============================================================================

/// Trait for accessing the global workbench from context.
pub trait UseWorkbench {
    /// Get reference to global workbench.
    fn workbench(&self) -> &GlobalWorkbench;

    /// Update global workbench.
    fn update_workbench<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut GlobalWorkbench, &mut App) -> R;
}

impl UseWorkbench for App {
    fn workbench(&self) -> &GlobalWorkbench {
        self.global::<GlobalWorkbench>()
    }

    fn update_workbench<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut GlobalWorkbench, &mut App) -> R,
    {
        self.update_global(f)
    }
}

// ============================================================================
// init_workbench
// ============================================================================

/// Install the global workbench.
pub fn init_workbench<R, F>(cx: &mut App, router: R, config: WorkbenchConfig, configure: F)
where
    R: Router + 'static,
    F: FnOnce(&mut GlobalWorkbench),
{
    let mut workbench = GlobalWorkbench::new(router, config);
    configure(&mut workbench);
    debug_log!(
        "Workbench installed with {} page(s)",
        workbench.pages.len()
    );
    cx.set_global(workbench);
}

// ============================================================================
// Workbench static API
// ============================================================================

/// Static entry points into the global workbench.
///
/// Every mutating call refreshes all windows.
///
/// ```ignore
/// use gpui_workbench::{NavigationSource, Workbench};
///
/// Workbench::trigger(cx, "/users", "用户管理", NavigationSource::Sidebar);
/// Workbench::close_tab(cx, &TabId::from_path("/users"))?;
/// ```
pub struct Workbench;

impl Workbench {
    /// Navigate to `path`, showing `label` while the transition is pending.
    pub fn trigger(
        cx: &mut App,
        path: impl Into<String>,
        label: impl Into<String>,
        source: NavigationSource,
    ) {
        let path = path.into();
        let label = label.into();
        let result = cx.update_workbench(|workbench, _| {
            workbench.coordinator.request(path, label, source)
        });
        drive(cx, result);
        cx.refresh_windows();
    }

    /// Activate a tab and navigate to it.
    pub fn activate_tab(cx: &mut App, id: &TabId) -> Result<(), TabError> {
        let result =
            cx.update_workbench(|workbench, _| workbench.coordinator.activate_tab(id))?;
        drive(cx, result);
        cx.refresh_windows();
        Ok(())
    }

    /// Close a tab.
    pub fn close_tab(cx: &mut App, id: &TabId) -> Result<(), TabError> {
        let result = cx.update_workbench(|workbench, _| workbench.coordinator.close_tab(id))?;
        if let Some(result) = result {
            drive(cx, result);
        }
        cx.refresh_windows();
        Ok(())
    }

    /// Close every unpinned tab except `id`.
    pub fn close_other_tabs(cx: &mut App, id: &TabId) -> Result<(), TabError> {
        let result =
            cx.update_workbench(|workbench, _| workbench.coordinator.close_other_tabs(id))?;
        if let Some(result) = result {
            drive(cx, result);
        }
        cx.refresh_windows();
        Ok(())
    }

    /// Close every unpinned tab.
    pub fn close_all_tabs(cx: &mut App) {
        let result = cx.update_workbench(|workbench, _| workbench.coordinator.close_all_tabs());
        if let Some(result) = result {
            drive(cx, result);
        }
        cx.refresh_windows();
    }

    /// Move a tab within the bar.
    pub fn reorder_tabs(cx: &mut App, from: usize, to: usize) -> Result<(), TabError> {
        cx.update_workbench(|workbench, _| workbench.coordinator.reorder_tabs(from, to))?;
        cx.refresh_windows();
        Ok(())
    }

    /// Adopt a signed-in session.
    pub fn login(cx: &mut App, session: AuthSession) {
        cx.update_workbench(|workbench, _| workbench.coordinator.login(session));
        cx.refresh_windows();
    }

    /// Sign out and go to the login page.
    pub fn logout(cx: &mut App) {
        let result = cx.update_workbench(|workbench, _| workbench.coordinator.logout());
        drive(cx, result);
        cx.refresh_windows();
    }

    /// Reconcile after the router moved on its own.
    pub fn observe_location(cx: &mut App) {
        cx.update_workbench(|workbench, _| workbench.coordinator.observe_location());
        cx.refresh_windows();
    }

    /// The pending navigation, if any.
    pub fn current_intent(cx: &App) -> Option<NavigationIntent> {
        cx.workbench().coordinator.intent().current().cloned()
    }

    /// Snapshot of the tab bar.
    pub fn tabs(cx: &App) -> Vec<Tab> {
        cx.workbench().coordinator.tabs().tabs().to_vec()
    }

    /// Path of the active tab.
    pub fn active_path(cx: &App) -> Option<String> {
        cx.workbench()
            .coordinator
            .tabs()
            .active()
            .map(|tab| tab.path.clone())
    }

    /// Path the outlet renders: the router's location when it has no tab
    /// (the login page), else the active tab.
    pub fn outlet_path(cx: &App) -> Option<String> {
        let coordinator = &cx.workbench().coordinator;
        coordinator
            .untabbed_location()
            .or_else(|| coordinator.tabs().active().map(|tab| tab.path.clone()))
    }

    /// Path the router currently shows.
    pub fn current_location(cx: &App) -> String {
        cx.workbench().coordinator.current_location()
    }

    /// Whether the signed-in role holds `tag`. `false` before initialization.
    pub fn has_permission(cx: &App, tag: PermissionTag) -> bool {
        cx.try_global::<GlobalWorkbench>()
            .is_some_and(|workbench| workbench.coordinator.gate().has_permission(tag))
    }

    /// Whether the signed-in role satisfies `requirement`.
    pub fn allows(cx: &App, requirement: &Requirement) -> bool {
        cx.try_global::<GlobalWorkbench>()
            .is_some_and(|workbench| workbench.coordinator.gate().allows(requirement))
    }

    /// The most recent navigation failure.
    pub fn last_error(cx: &App) -> Option<NavigationError> {
        cx.workbench().coordinator.last_error().cloned()
    }

    /// Take the most recent navigation failure.
    pub fn take_error(cx: &mut App) -> Option<NavigationError> {
        cx.update_workbench(|workbench, _| workbench.coordinator.take_error())
    }
}

/// Await a pending transition on the foreground executor and settle it.
fn drive(cx: &mut App, result: TriggerResult) {
    let PendingNavigation { ticket, future } = match result {
        TriggerResult::Pending(pending) => pending,
        TriggerResult::Finished(outcome) => {
            trace_log!("Trigger finished immediately: {:?}", outcome);
            return;
        }
    };

    cx.spawn(async move |cx| {
        let result = future.await;
        let _ = cx.update(|cx| {
            cx.update_workbench(|workbench, _| workbench.coordinator.settle(ticket, result));
            cx.refresh_windows();
        });
    })
    .detach();

    let timeout = cx.workbench().coordinator.config().navigation_timeout;
    if let Some(timeout) = timeout {
        cx.spawn(async move |cx| {
            cx.background_executor().timer(timeout).await;
            let _ = cx.update(|cx| {
                let expired =
                    cx.update_workbench(|workbench, _| workbench.coordinator.time_out(ticket));
                if expired.is_some() {
                    cx.refresh_windows();
                }
            });
        })
        .detach();
    }
}

// ============================================================================
// Tests
// ============================================================================
