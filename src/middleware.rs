//! Navigation middleware for cross-cutting concerns.
//!
//! Middleware runs **before** a transition is issued and **after** it settles.
//! Unlike guards (which decide *if* navigation happens), middleware handles
//! side effects: audit logs, analytics, error toasts.
//!
//! `after_navigation` sees every settled outcome, including failures,
//! timeouts and superseded navigations, so it is the place to surface a
//! "navigation failed" notice.
//!
//! # Execution order
//!
//! Middleware executes in **priority order** (higher
//! [`priority`](NavigationMiddleware::priority) first) for `before_navigation`,
//! and in reverse order for `after_navigation` (onion model).
//!
//! # Example
//!
//! ```
//! use gpui_workbench::{NavigationMiddleware, NavigationOutcome, NavigationRequest};
//!
//! struct FailureToast;
//!
//! impl NavigationMiddleware for FailureToast {
//!     fn before_navigation(&self, _request: &NavigationRequest) {}
//!
//!     fn after_navigation(&self, request: &NavigationRequest, outcome: &NavigationOutcome) {
//!         if let Some(error) = outcome.error() {
//!             eprintln!("Could not open {}: {}", request.label, error);
//!         }
//!     }
//! }
//! ```

use crate::error::NavigationOutcome;
use crate::lifecycle::NavigationRequest;

// ============================================================================
// NavigationMiddleware trait
// ============================================================================

/// Observer of navigation requests and their outcomes.
pub trait NavigationMiddleware: Send + Sync + 'static {
    /// Called once guards have allowed the request, before the router is asked.
    fn before_navigation(&self, request: &NavigationRequest);

    /// Called when the navigation settles, whatever the outcome.
    fn after_navigation(&self, request: &NavigationRequest, outcome: &NavigationOutcome);

    /// Middleware name for debugging.
    fn name(&self) -> &'static str {
        "NavigationMiddleware"
    }

    /// Middleware priority (higher runs first for `before`, last for `after`).
    fn priority(&self) -> i32 {
        0
    }
}

// ============================================================================
// middleware_fn helper
// ============================================================================

/// Create middleware from two closures (before and after).
///
/// ```
/// use gpui_workbench::middleware_fn;
///
/// let audit = middleware_fn(
///     |request| println!("-> {}", request.to),
///     |request, outcome| println!("<- {} {:?}", request.to, outcome),
/// );
/// ```
pub const fn middleware_fn<B, A>(before: B, after: A) -> FnMiddleware<B, A>
where
    B: Fn(&NavigationRequest) + Send + Sync + 'static,
    A: Fn(&NavigationRequest, &NavigationOutcome) + Send + Sync + 'static,
{
    FnMiddleware { before, after }
}

/// Middleware created from two closures via [`middleware_fn`].
pub struct FnMiddleware<B, A> {
    before: B,
    after: A,
}

impl<B, A> NavigationMiddleware for FnMiddleware<B, A>
where
    B: Fn(&NavigationRequest) + Send + Sync + 'static,
    A: Fn(&NavigationRequest, &NavigationOutcome) + Send + Sync + 'static,
{
    fn before_navigation(&self, request: &NavigationRequest) {
        (self.before)(request);
    }

    fn after_navigation(&self, request: &NavigationRequest, outcome: &NavigationOutcome) {
        (self.after)(request, outcome);
    }
}

// ============================================================================
// MiddlewareStack
// ============================================================================

/// Ordered middleware list run by the coordinator.
#[derive(Default)]
pub struct MiddlewareStack {
    layers: Vec<Box<dyn NavigationMiddleware>>,
}

impl MiddlewareStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer, keeping priority order.
    pub fn push(&mut self, middleware: Box<dyn NavigationMiddleware>) {
        self.layers.push(middleware);
        self.layers
            .sort_by_key(|m| std::cmp::Reverse(m.priority()));
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn run_before(&self, request: &NavigationRequest) {
        for layer in &self.layers {
            crate::trace_log!("Middleware '{}' before '{}'", layer.name(), request.to);
            layer.before_navigation(request);
        }
    }

    pub fn run_after(&self, request: &NavigationRequest, outcome: &NavigationOutcome) {
        for layer in self.layers.iter().rev() {
            crate::trace_log!("Middleware '{}' after '{}'", layer.name(), request.to);
            layer.after_navigation(request, outcome);
        }
    }
}

impl std::fmt::Debug for MiddlewareStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.layers.iter().map(|m| m.name()))
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NavigationError;
    use crate::intent::NavigationSource;
    use std::sync::{Arc, Mutex};

    struct TestMiddleware {
        tag: &'static str,
        priority: i32,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl NavigationMiddleware for TestMiddleware {
        fn before_navigation(&self, request: &NavigationRequest) {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{}:before:{}", self.tag, request.to));
        }

        fn after_navigation(&self, request: &NavigationRequest, _outcome: &NavigationOutcome) {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{}:after:{}", self.tag, request.to));
        }

        fn priority(&self) -> i32 {
            self.priority
        }
    }

    fn request(path: &str) -> NavigationRequest {
        NavigationRequest::new(path, path, NavigationSource::Header)
    }

    #[test]
    fn test_middleware_defaults() {
        let mw = middleware_fn(|_| {}, |_, _| {});
        assert_eq!(mw.name(), "NavigationMiddleware");
        assert_eq!(mw.priority(), 0);
    }

    #[test]
    fn test_stack_runs_onion_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut stack = MiddlewareStack::new();
        stack.push(Box::new(TestMiddleware {
            tag: "low",
            priority: 1,
            calls: calls.clone(),
        }));
        stack.push(Box::new(TestMiddleware {
            tag: "high",
            priority: 10,
            calls: calls.clone(),
        }));

        let req = request("/files");
        stack.run_before(&req);
        stack.run_after(
            &req,
            &NavigationOutcome::Arrived {
                path: "/files".to_string(),
            },
        );

        assert_eq!(
            *calls.lock().unwrap(),
            vec![
                "high:before:/files",
                "low:before:/files",
                "low:after:/files",
                "high:after:/files",
            ]
        );
    }

    #[test]
    fn test_middleware_fn_sees_failures() {
        let failures = Arc::new(Mutex::new(Vec::new()));
        let sink = failures.clone();
        let mw = middleware_fn(
            |_| {},
            move |req, outcome| {
                if outcome.is_failed() {
                    sink.lock().unwrap().push(req.to.clone());
                }
            },
        );

        let req = request("/reports");
        mw.after_navigation(
            &req,
            &NavigationOutcome::Failed(NavigationError::RouteNotFound {
                path: "/reports".to_string(),
            }),
        );
        mw.after_navigation(
            &req,
            &NavigationOutcome::Arrived {
                path: "/reports".to_string(),
            },
        );

        assert_eq!(*failures.lock().unwrap(), vec!["/reports"]);
    }
}
