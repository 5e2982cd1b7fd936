//! Router collaborator.
//!
//! The workbench never changes the location itself; it asks a [`Router`] to
//! and awaits the transition. [`MemoryRouter`] is the in-process history
//! router used by GPUI shells and tests.

use crate::error::NavigationError;
use crate::{debug_log, trace_log};
use std::cell::RefCell;
use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

/// Future returned by [`Router::navigate`]. Resolves on arrival.
pub type NavigateFuture = Pin<Box<dyn Future<Output = Result<(), NavigationError>>>>;

/// The routing surface the coordinator drives.
pub trait Router {
    /// Path the router currently shows.
    fn current_location(&self) -> String;

    /// Begin a transition to `path`.
    fn navigate(&self, path: &str) -> NavigateFuture;
}

impl<R: Router + ?Sized> Router for Box<R> {
    fn current_location(&self) -> String {
        (**self).current_location()
    }

    fn navigate(&self, path: &str) -> NavigateFuture {
        (**self).navigate(path)
    }
}

impl<R: Router + ?Sized> Router for Rc<R> {
    fn current_location(&self) -> String {
        (**self).current_location()
    }

    fn navigate(&self, path: &str) -> NavigateFuture {
        (**self).navigate(path)
    }
}

// ============================================================================
// History
// ============================================================================

/// Navigation history stack
#[derive(Debug, Clone)]
struct History {
    entries: Vec<String>,
    current: usize,
}

impl History {
    fn new(initial: String) -> Self {
        Self {
            entries: vec![initial],
            current: 0,
        }
    }

    fn current_path(&self) -> &str {
        &self.entries[self.current]
    }

    fn push(&mut self, path: String) {
        // Remove forward history when pushing
        self.entries.truncate(self.current + 1);
        self.entries.push(path);
        self.current += 1;
    }

    fn replace(&mut self, path: String) {
        self.entries[self.current] = path;
    }

    fn back(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    fn forward(&mut self) -> bool {
        if self.current + 1 < self.entries.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }
}

// ============================================================================
// MemoryRouter
// ============================================================================

#[derive(Debug)]
struct MemoryRouterState {
    history: History,
    known_routes: Option<HashSet<String>>,
}

/// In-memory history router.
///
/// Clones share the same history, so a shell can keep one handle for
/// back/forward buttons while the coordinator owns another.
///
/// ```
/// use gpui_workbench::router::{MemoryRouter, Router};
///
/// let router = MemoryRouter::new("/");
/// pollster::block_on(router.navigate("/users")).unwrap();
/// assert_eq!(router.current_location(), "/users");
///
/// router.back();
/// assert_eq!(router.current_location(), "/");
/// ```
#[derive(Debug, Clone)]
pub struct MemoryRouter {
    state: Rc<RefCell<MemoryRouterState>>,
}

impl MemoryRouter {
    /// Create a router that accepts any path.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            state: Rc::new(RefCell::new(MemoryRouterState {
                history: History::new(initial.into()),
                known_routes: None,
            })),
        }
    }

    /// Restrict the router to `routes`; other paths fail with
    /// [`NavigationError::RouteNotFound`].
    #[must_use]
    pub fn with_routes<I, S>(self, routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.borrow_mut().known_routes = Some(routes.into_iter().map(Into::into).collect());
        self
    }

    /// Whether `path` can be navigated to. The query string is ignored.
    pub fn knows(&self, path: &str) -> bool {
        let route = path.split_once('?').map_or(path, |(route, _)| route);
        self.state
            .borrow()
            .known_routes
            .as_ref()
            .is_none_or(|routes| routes.contains(route))
    }

    /// Replace the current entry without adding history.
    pub fn replace(&self, path: impl Into<String>) {
        self.state.borrow_mut().history.replace(path.into());
    }

    /// Go back in history. Returns `false` at the start.
    pub fn back(&self) -> bool {
        self.state.borrow_mut().history.back()
    }

    /// Go forward in history. Returns `false` at the end.
    pub fn forward(&self) -> bool {
        self.state.borrow_mut().history.forward()
    }

    /// Check if can go back
    pub fn can_go_back(&self) -> bool {
        self.state.borrow().history.current > 0
    }

    /// Check if can go forward
    pub fn can_go_forward(&self) -> bool {
        let state = self.state.borrow();
        state.history.current + 1 < state.history.entries.len()
    }

    /// Snapshot of the history stack
    pub fn history(&self) -> Vec<String> {
        self.state.borrow().history.entries.clone()
    }
}

impl Router for MemoryRouter {
    fn current_location(&self) -> String {
        self.state.borrow().history.current_path().to_string()
    }

    fn navigate(&self, path: &str) -> NavigateFuture {
        let result = if self.knows(path) {
            let mut state = self.state.borrow_mut();
            let from = state.history.current_path().to_string();
            state.history.push(path.to_string());
            debug_log!("MemoryRouter: '{}' → '{}'", from, path);
            Ok(())
        } else {
            trace_log!("MemoryRouter: unknown route '{}'", path);
            Err(NavigationError::RouteNotFound {
                path: path.to_string(),
            })
        };
        Box::pin(std::future::ready(result))
    }
}
