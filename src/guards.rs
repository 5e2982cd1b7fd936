//! Route guards for authentication and authorization.
//!
//! Guards are checked **before** a navigation intent is recorded. They decide
//! whether a navigation should be allowed, denied, or redirected elsewhere.
//!
//! All guard methods are **synchronous**. They see the session and the
//! permission gate through a [`GuardContext`] and nothing else, so the
//! coordinator can run them without a GPUI context.
//!
//! # Built-in guards
//!
//! | Guard | Purpose |
//! |-------|---------|
//! | [`AuthGuard`] | Token presence, public and auth-only routes |
//! | [`PermissionGuard`] | A [`Requirement`] on a route prefix |
//!
//! # Composition
//!
//! | Combinator | Logic |
//! |------------|-------|
//! | [`Guards`] | AND: all guards must allow |
//! | [`NotGuard`] | Invert: allow becomes deny, deny becomes allow |
//!
//! # Execution order
//!
//! Guards run in **priority order** (higher value first). The built-in guards
//! use: `AuthGuard` = 100, `PermissionGuard` = 80.
//! The first non-[`Continue`](crate::NavigationAction::Continue) result
//! short-circuits evaluation.
//!
//! # Example
//!
//! ```
//! use gpui_workbench::{
//!     AuthGuard, AuthSession, GuardContext, NavigationRequest, NavigationSource,
//!     PermissionGate, RouteGuard,
//! };
//!
//! let guard = AuthGuard::new("/login", "/");
//! let session = AuthSession::anonymous();
//! let gate = PermissionGate::default();
//! let cx = GuardContext::new(&session, &gate);
//!
//! let request = NavigationRequest::new("/users", "Users", NavigationSource::Sidebar);
//! assert_eq!(
//!     guard.check(&cx, &request).redirect_path(),
//!     Some("/login?redirect=/users")
//! );
//! ```

use crate::lifecycle::{NavigationAction, NavigationRequest};
use crate::permission::{PermissionGate, Requirement};
use crate::session::AuthSession;

// ============================================================================
// GuardContext
// ============================================================================

/// What a guard may look at.
#[derive(Debug, Clone, Copy)]
pub struct GuardContext<'a> {
    pub session: &'a AuthSession,
    pub gate: &'a PermissionGate,
}

impl<'a> GuardContext<'a> {
    pub fn new(session: &'a AuthSession, gate: &'a PermissionGate) -> Self {
        Self { session, gate }
    }
}

// ============================================================================
// RouteGuard trait
// ============================================================================

/// Trait for guards that control access to paths.
///
/// # Example
///
/// ```
/// use gpui_workbench::{GuardContext, NavigationAction, NavigationRequest, RouteGuard};
///
/// struct ReadOnlyMode;
///
/// impl RouteGuard for ReadOnlyMode {
///     fn check(&self, _cx: &GuardContext<'_>, request: &NavigationRequest) -> NavigationAction {
///         if request.to.ends_with("/edit") {
///             NavigationAction::deny("Workbench is read-only")
///         } else {
///             NavigationAction::Continue
///         }
///     }
/// }
/// ```
///
/// # For simple guards
///
/// Use [`guard_fn`] to create a guard from a closure.
pub trait RouteGuard: Send + Sync + 'static {
    /// Check if navigation should be allowed.
    ///
    /// Returns:
    /// - [`NavigationAction::Continue`] to allow navigation
    /// - [`NavigationAction::Deny`] to block navigation
    /// - [`NavigationAction::Redirect`] to redirect to a different path
    fn check(&self, cx: &GuardContext<'_>, request: &NavigationRequest) -> NavigationAction;

    /// Guard name for debugging and error messages.
    fn name(&self) -> &'static str {
        "RouteGuard"
    }

    /// Priority for execution order. Higher runs first. Default is 0.
    fn priority(&self) -> i32 {
        0
    }
}

// ============================================================================
// guard_fn helper
// ============================================================================

/// Create a guard from a function or closure.
///
/// ```
/// use gpui_workbench::{guard_fn, NavigationAction};
///
/// let maintenance = guard_fn(|_cx, request| {
///     if request.to.starts_with("/settings") {
///         NavigationAction::redirect("/maintenance")
///     } else {
///         NavigationAction::Continue
///     }
/// });
/// ```
pub const fn guard_fn<F>(f: F) -> FnGuard<F>
where
    F: Fn(&GuardContext<'_>, &NavigationRequest) -> NavigationAction + Send + Sync + 'static,
{
    FnGuard { f }
}

/// Guard created from a function or closure.
pub struct FnGuard<F> {
    f: F,
}

impl<F> RouteGuard for FnGuard<F>
where
    F: Fn(&GuardContext<'_>, &NavigationRequest) -> NavigationAction + Send + Sync + 'static,
{
    fn check(&self, cx: &GuardContext<'_>, request: &NavigationRequest) -> NavigationAction {
        (self.f)(cx, request)
    }
}

// ============================================================================
// AuthGuard
// ============================================================================

/// Routes reachable without a token.
pub const DEFAULT_PUBLIC_ROUTES: &[&str] =
    &["/login", "/register", "/forgot-password", "/reset-password"];

/// Routes a signed-in user is bounced away from.
pub const DEFAULT_AUTH_ROUTES: &[&str] = DEFAULT_PUBLIC_ROUTES;

fn matches_prefix(routes: &[String], path: &str) -> bool {
    routes.iter().any(|route| path.starts_with(route.as_str()))
}

/// Authentication guard.
///
/// - No token and the path is not public: redirect to
///   `<login>?redirect=<path>`.
/// - Token present and the path is auth-only (login, register, ...):
///   redirect home.
///
/// Route lists match by prefix, so `/reset-password/abc` is public.
#[derive(Debug, Clone)]
pub struct AuthGuard {
    login_path: String,
    home_path: String,
    public_routes: Vec<String>,
    auth_routes: Vec<String>,
}

impl AuthGuard {
    /// Guard with the default public and auth-only routes.
    pub fn new(login_path: impl Into<String>, home_path: impl Into<String>) -> Self {
        let login_path = login_path.into();
        let mut public_routes: Vec<String> =
            DEFAULT_PUBLIC_ROUTES.iter().map(|r| r.to_string()).collect();
        let mut auth_routes: Vec<String> =
            DEFAULT_AUTH_ROUTES.iter().map(|r| r.to_string()).collect();
        if !public_routes.contains(&login_path) {
            public_routes.push(login_path.clone());
            auth_routes.push(login_path.clone());
        }
        Self {
            login_path,
            home_path: home_path.into(),
            public_routes,
            auth_routes,
        }
    }

    /// Also treat `prefix` as public.
    #[must_use]
    pub fn with_public_route(mut self, prefix: impl Into<String>) -> Self {
        self.public_routes.push(prefix.into());
        self
    }

    /// Also bounce signed-in users away from `prefix`.
    #[must_use]
    pub fn with_auth_route(mut self, prefix: impl Into<String>) -> Self {
        self.auth_routes.push(prefix.into());
        self
    }

    pub fn is_public(&self, path: &str) -> bool {
        matches_prefix(&self.public_routes, path)
    }

    pub fn is_auth_route(&self, path: &str) -> bool {
        matches_prefix(&self.auth_routes, path)
    }
}

impl RouteGuard for AuthGuard {
    fn check(&self, cx: &GuardContext<'_>, request: &NavigationRequest) -> NavigationAction {
        let path = request.to.as_str();
        let authenticated = cx.session.is_authenticated();

        if authenticated && self.is_auth_route(path) {
            return NavigationAction::redirect_with_reason(&self.home_path, "Already signed in");
        }
        if !authenticated && !self.is_public(path) {
            return NavigationAction::redirect_with_reason(
                format!("{}?redirect={}", self.login_path, path),
                "Authentication required",
            );
        }
        NavigationAction::Continue
    }

    fn name(&self) -> &'static str {
        "AuthGuard"
    }

    fn priority(&self) -> i32 {
        100
    }
}

// ============================================================================
// PermissionGuard
// ============================================================================

/// Permission-based authorization guard.
///
/// Applies a [`Requirement`] to every path under `prefix`.
///
/// ```
/// use gpui_workbench::{PermissionGuard, PermissionTag};
///
/// let guard = PermissionGuard::new("/settings", PermissionTag::SettingsView)
///     .with_redirect("/forbidden");
/// ```
#[derive(Debug, Clone)]
pub struct PermissionGuard {
    prefix: String,
    requirement: Requirement,
    redirect_path: Option<String>,
}

impl PermissionGuard {
    pub fn new(prefix: impl Into<String>, requirement: impl Into<Requirement>) -> Self {
        Self {
            prefix: prefix.into(),
            requirement: requirement.into(),
            redirect_path: None,
        }
    }

    /// Add a redirect path for when permission is denied.
    #[must_use]
    pub fn with_redirect(mut self, path: impl Into<String>) -> Self {
        self.redirect_path = Some(path.into());
        self
    }
}

impl RouteGuard for PermissionGuard {
    fn check(&self, cx: &GuardContext<'_>, request: &NavigationRequest) -> NavigationAction {
        if !request.to.starts_with(&self.prefix) || cx.gate.allows(&self.requirement) {
            return NavigationAction::Continue;
        }
        let reason = format!("Missing permission: {}", self.requirement);
        match &self.redirect_path {
            Some(redirect) => NavigationAction::redirect_with_reason(redirect, reason),
            None => NavigationAction::deny(reason),
        }
    }

    fn name(&self) -> &'static str {
        "PermissionGuard"
    }

    fn priority(&self) -> i32 {
        80
    }
}

// ============================================================================
// Guard Composition
// ============================================================================

/// Combines multiple guards with AND logic.
///
/// All guards must return [`NavigationAction::Continue`] for navigation to
/// proceed. The first non-continue result is returned immediately.
/// Guards are executed in priority order (higher priority first).
///
/// ```
/// use gpui_workbench::{AuthGuard, Guards, PermissionGuard, PermissionTag};
///
/// let guard = Guards::builder()
///     .guard(AuthGuard::new("/login", "/"))
///     .guard(PermissionGuard::new("/users", PermissionTag::UsersView))
///     .build();
/// ```
pub struct Guards {
    guards: Vec<Box<dyn RouteGuard>>,
}

impl Guards {
    /// Create a new AND composition from a vec of boxed guards.
    #[must_use]
    pub fn new(mut guards: Vec<Box<dyn RouteGuard>>) -> Self {
        guards.sort_by_key(|g| std::cmp::Reverse(g.priority()));
        Self { guards }
    }

    /// Start building a guard composition.
    pub fn builder() -> GuardBuilder {
        GuardBuilder::new()
    }

    /// Add a guard, keeping priority order.
    pub fn push(&mut self, guard: Box<dyn RouteGuard>) {
        self.guards.push(guard);
        self.guards.sort_by_key(|g| std::cmp::Reverse(g.priority()));
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl Default for Guards {
    fn default() -> Self {
        Self { guards: Vec::new() }
    }
}

impl std::fmt::Debug for Guards {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.guards.iter().map(|g| g.name()))
            .finish()
    }
}

impl RouteGuard for Guards {
    fn check(&self, cx: &GuardContext<'_>, request: &NavigationRequest) -> NavigationAction {
        for guard in &self.guards {
            let result = guard.check(cx, request);
            if !result.is_continue() {
                crate::debug_log!(
                    "Guard '{}' stopped navigation to '{}': {:?}",
                    guard.name(),
                    request.to,
                    result
                );
                return result;
            }
        }
        NavigationAction::Continue
    }

    fn name(&self) -> &'static str {
        "Guards"
    }

    fn priority(&self) -> i32 {
        self.guards.iter().map(|g| g.priority()).max().unwrap_or(0)
    }
}

/// Builder for [`Guards`] with fluent API.
#[must_use]
pub struct GuardBuilder {
    guards: Vec<Box<dyn RouteGuard>>,
}

impl GuardBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self { guards: Vec::new() }
    }

    /// Add a guard to the composition.
    pub fn guard<G: RouteGuard>(mut self, guard: G) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    /// Build the final [`Guards`].
    #[must_use]
    pub fn build(self) -> Guards {
        Guards::new(self.guards)
    }
}

impl Default for GuardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// NotGuard
// ============================================================================

/// Inverts a guard result.
///
/// - `Continue` becomes `Deny`
/// - `Deny` becomes `Continue`
/// - `Redirect` is preserved as-is
pub struct NotGuard {
    guard: Box<dyn RouteGuard>,
}

impl NotGuard {
    /// Create a new NOT guard wrapping the given guard.
    pub fn new<G: RouteGuard>(guard: G) -> Self {
        Self {
            guard: Box::new(guard),
        }
    }
}

impl RouteGuard for NotGuard {
    fn check(&self, cx: &GuardContext<'_>, request: &NavigationRequest) -> NavigationAction {
        match self.guard.check(cx, request) {
            NavigationAction::Continue => {
                NavigationAction::deny("Inverted: guard allowed but NOT expected")
            }
            NavigationAction::Deny { .. } => NavigationAction::Continue,
            redirect @ NavigationAction::Redirect { .. } => redirect,
        }
    }

    fn name(&self) -> &'static str {
        "NotGuard"
    }

    fn priority(&self) -> i32 {
        self.guard.priority()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::NavigationSource;
    use crate::permission::{PermissionTag, Role};
    use crate::session::User;
    use std::sync::Arc;

    fn make_request(path: &str) -> NavigationRequest {
        NavigationRequest::new(path, path, NavigationSource::Sidebar)
    }

    fn signed_in() -> AuthSession {
        AuthSession::signed_in("token", User::new("1", "Ada", "ada@example.com", "viewer"))
    }

    fn gate_with(tags: &[PermissionTag]) -> PermissionGate {
        let role = Role::new("custom", "Custom").with_permissions(tags.iter().copied());
        PermissionGate::new(Some(Arc::new(role)))
    }

    // --- RouteGuard trait basics ---

    #[test]
    fn test_guard_fn_helper() {
        let guard = guard_fn(|_cx, _req| NavigationAction::Continue);
        assert_eq!(guard.name(), "RouteGuard");
        assert_eq!(guard.priority(), 0);
    }

    // --- AuthGuard ---

    #[test]
    fn test_auth_guard_allows_authenticated() {
        let guard = AuthGuard::new("/login", "/");
        assert_eq!(guard.name(), "AuthGuard");
        assert_eq!(guard.priority(), 100);

        let session = signed_in();
        let gate = PermissionGate::default();
        let cx = GuardContext::new(&session, &gate);
        assert!(guard.check(&cx, &make_request("/users")).is_continue());
    }

    #[test]
    fn test_auth_guard_redirects_with_return_path() {
        let guard = AuthGuard::new("/login", "/");
        let session = AuthSession::anonymous();
        let gate = PermissionGate::default();
        let cx = GuardContext::new(&session, &gate);

        let result = guard.check(&cx, &make_request("/documents"));
        assert_eq!(result.redirect_path(), Some("/login?redirect=/documents"));
    }

    #[test]
    fn test_auth_guard_public_routes_match_by_prefix() {
        let guard = AuthGuard::new("/login", "/");
        let session = AuthSession::anonymous();
        let gate = PermissionGate::default();
        let cx = GuardContext::new(&session, &gate);

        assert!(guard.check(&cx, &make_request("/login")).is_continue());
        assert!(guard
            .check(&cx, &make_request("/reset-password/abc"))
            .is_continue());
        assert!(guard
            .check(&cx, &make_request("/login?redirect=/files"))
            .is_continue());
    }

    #[test]
    fn test_auth_guard_bounces_signed_in_from_login() {
        let guard = AuthGuard::new("/login", "/");
        let session = signed_in();
        let gate = PermissionGate::default();
        let cx = GuardContext::new(&session, &gate);

        let result = guard.check(&cx, &make_request("/register"));
        assert_eq!(result.redirect_path(), Some("/"));
    }

    #[test]
    fn test_auth_guard_custom_login_path_is_public() {
        let guard = AuthGuard::new("/sign-in", "/");
        assert!(guard.is_public("/sign-in"));
        assert!(guard.is_auth_route("/sign-in"));
        assert!(!guard.is_public("/files"));
    }

    // --- PermissionGuard ---

    #[test]
    fn test_permission_guard_allows() {
        let guard = PermissionGuard::new("/users", PermissionTag::UsersView);
        assert_eq!(guard.name(), "PermissionGuard");

        let session = signed_in();
        let gate = gate_with(&[PermissionTag::UsersView]);
        let cx = GuardContext::new(&session, &gate);
        assert!(guard.check(&cx, &make_request("/users/42")).is_continue());
    }

    #[test]
    fn test_permission_guard_ignores_other_prefixes() {
        let guard = PermissionGuard::new("/users", PermissionTag::UsersView);
        let session = signed_in();
        let gate = PermissionGate::default();
        let cx = GuardContext::new(&session, &gate);
        assert!(guard.check(&cx, &make_request("/files")).is_continue());
    }

    #[test]
    fn test_permission_guard_denies() {
        let guard = PermissionGuard::new("/users", PermissionTag::UsersDelete);
        let session = signed_in();
        let gate = gate_with(&[PermissionTag::UsersView]);
        let cx = GuardContext::new(&session, &gate);

        match guard.check(&cx, &make_request("/users")) {
            NavigationAction::Deny { reason } => {
                assert_eq!(reason, "Missing permission: users:delete")
            }
            other => panic!("Expected Deny, got {:?}", other),
        }
    }

    #[test]
    fn test_permission_guard_with_redirect() {
        let guard =
            PermissionGuard::new("/settings", PermissionTag::SettingsView).with_redirect("/403");
        let session = signed_in();
        let gate = PermissionGate::default();
        let cx = GuardContext::new(&session, &gate);

        let result = guard.check(&cx, &make_request("/settings"));
        assert_eq!(result.redirect_path(), Some("/403"));
    }

    // --- Guards composition ---

    #[test]
    fn test_guards_all_pass() {
        let guards = Guards::builder()
            .guard(AuthGuard::new("/login", "/"))
            .guard(PermissionGuard::new("/users", PermissionTag::UsersView))
            .build();

        let session = signed_in();
        let gate = gate_with(&[PermissionTag::UsersView]);
        let cx = GuardContext::new(&session, &gate);
        assert!(guards.check(&cx, &make_request("/users")).is_continue());
    }

    #[test]
    fn test_guards_priority_order() {
        // Auth (100) runs before Permission (80) regardless of insertion order
        let guards = Guards::builder()
            .guard(PermissionGuard::new("/users", PermissionTag::UsersView).with_redirect("/403"))
            .guard(AuthGuard::new("/login", "/"))
            .build();

        let session = AuthSession::anonymous();
        let gate = PermissionGate::default();
        let cx = GuardContext::new(&session, &gate);
        let result = guards.check(&cx, &make_request("/users"));
        assert_eq!(result.redirect_path(), Some("/login?redirect=/users"));
        assert_eq!(guards.priority(), 100);
    }

    #[test]
    fn test_guards_push_keeps_order() {
        let mut guards = Guards::default();
        assert!(guards.is_empty());
        guards.push(Box::new(guard_fn(|_, _| NavigationAction::deny("low"))));
        guards.push(Box::new(AuthGuard::new("/login", "/")));

        let session = AuthSession::anonymous();
        let gate = PermissionGate::default();
        let cx = GuardContext::new(&session, &gate);
        assert!(guards.check(&cx, &make_request("/x")).is_redirect());
        assert_eq!(guards.len(), 2);
    }

    // --- NotGuard ---

    #[test]
    fn test_not_guard_inverts_allow() {
        let guard = NotGuard::new(guard_fn(|_, _| NavigationAction::Continue));
        let session = AuthSession::anonymous();
        let gate = PermissionGate::default();
        let cx = GuardContext::new(&session, &gate);
        assert!(guard.check(&cx, &make_request("/test")).is_deny());
    }

    #[test]
    fn test_not_guard_inverts_deny() {
        let guard = NotGuard::new(guard_fn(|_, _| NavigationAction::deny("nope")));
        let session = AuthSession::anonymous();
        let gate = PermissionGate::default();
        let cx = GuardContext::new(&session, &gate);
        assert!(guard.check(&cx, &make_request("/test")).is_continue());
    }

    #[test]
    fn test_not_guard_preserves_redirect() {
        let guard = NotGuard::new(guard_fn(|_, _| NavigationAction::redirect("/somewhere")));
        let session = AuthSession::anonymous();
        let gate = PermissionGate::default();
        let cx = GuardContext::new(&session, &gate);
        let result = guard.check(&cx, &make_request("/test"));
        assert_eq!(result.redirect_path(), Some("/somewhere"));
    }
}
