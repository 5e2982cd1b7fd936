//! Test utilities for workbench integration tests
//!
//! Provides routers, coordinators, sessions and settle helpers shared by the
//! integration test files.

#![allow(dead_code)]

use gpui_workbench::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Install `env_logger` once so `RUST_LOG=debug cargo test` shows the
/// workbench's state transitions.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// DeferredRouter
// ============================================================================

#[derive(Debug, Default)]
struct DeferredState {
    location: String,
    requested: Vec<String>,
}

/// A router whose transitions never complete on their own.
///
/// Tests move it with [`arrive`](Self::arrive) and then settle the ticket,
/// which lets them interleave completions in any order.
#[derive(Debug, Clone)]
pub struct DeferredRouter {
    state: Rc<RefCell<DeferredState>>,
}

impl DeferredRouter {
    pub fn new(initial: &str) -> Self {
        Self {
            state: Rc::new(RefCell::new(DeferredState {
                location: initial.to_string(),
                requested: Vec::new(),
            })),
        }
    }

    /// Finish a transition: the router now shows `path`.
    pub fn arrive(&self, path: &str) {
        self.state.borrow_mut().location = path.to_string();
    }

    /// Every path the coordinator asked for, in order
    pub fn requested(&self) -> Vec<String> {
        self.state.borrow().requested.clone()
    }
}

impl Router for DeferredRouter {
    fn current_location(&self) -> String {
        self.state.borrow().location.clone()
    }

    fn navigate(&self, path: &str) -> NavigateFuture {
        self.state.borrow_mut().requested.push(path.to_string());
        Box::pin(std::future::pending())
    }
}

// ============================================================================
// Coordinators
// ============================================================================

pub type TestView = String;

/// Config with the dashboard's Chinese titles
pub fn admin_config() -> WorkbenchConfig {
    WorkbenchConfig::new()
        .home("/", "Dashboard")
        .titles(
            RouteTitles::new()
                .with("/users", "用户管理")
                .with("/files", "文件管理")
                .with("/settings", "系统设置"),
        )
}

/// Coordinator over a [`MemoryRouter`] starting at `/`
pub fn memory_workbench() -> (MemoryRouter, NavigationCoordinator<MemoryRouter, TestView>) {
    init_logging();
    let router = MemoryRouter::new("/");
    let coordinator = NavigationCoordinator::new(router.clone(), admin_config());
    (router, coordinator)
}

/// Coordinator over a [`DeferredRouter`] starting at `/`
pub fn deferred_workbench() -> (DeferredRouter, NavigationCoordinator<DeferredRouter, TestView>) {
    init_logging();
    let router = DeferredRouter::new("/");
    let coordinator = NavigationCoordinator::new(router.clone(), admin_config());
    (router, coordinator)
}

// ============================================================================
// Sessions
// ============================================================================

pub fn session_for(role_id: &str) -> AuthSession {
    AuthSession::signed_in(
        "token",
        User::new("u-1", "Test User", "test@example.com", role_id),
    )
}

// ============================================================================
// Settle helpers
// ============================================================================

/// Await a trigger result and settle it against `coordinator`.
pub fn settle_now<R: Router, V>(
    coordinator: &mut NavigationCoordinator<R, V>,
    result: TriggerResult,
) -> NavigationOutcome {
    match result {
        TriggerResult::Finished(outcome) => outcome,
        TriggerResult::Pending(pending) => {
            let result = pollster::block_on(pending.future);
            coordinator.settle(pending.ticket, result)
        }
    }
}

/// Ticket of a trigger that must have started a navigation
pub fn ticket_of(result: &TriggerResult) -> NavigationTicket {
    match result.ticket() {
        Some(ticket) => ticket,
        None => panic!("Expected a pending navigation, got {:?}", result),
    }
}

/// Titles of the open tabs, in order
pub fn tab_titles<R: Router, V>(coordinator: &NavigationCoordinator<R, V>) -> Vec<String> {
    coordinator
        .tabs()
        .tabs()
        .iter()
        .map(|tab| tab.title.clone())
        .collect()
}

/// Path of the active tab
pub fn active_path<R: Router, V>(coordinator: &NavigationCoordinator<R, V>) -> Option<String> {
    coordinator.tabs().active().map(|tab| tab.path.clone())
}

/// Assert the registry has exactly one active tab when non-empty
pub fn assert_single_active(registry: &TabRegistry) {
    let active = registry.tabs().iter().filter(|tab| tab.is_active).count();
    if registry.is_empty() {
        assert_eq!(active, 0, "Empty registry must have no active tab");
    } else {
        assert_eq!(active, 1, "Expected exactly one active tab in {:?}", registry);
    }
}
