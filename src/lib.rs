//! Tab sessions, keep-alive views and permission gating for GPUI admin shells.
//!
//! `gpui-workbench` keeps the navigation chrome of a multi-tab admin console
//! consistent while routes change:
//!
//! - a **pending-navigation intent** so the shell can show which destination
//!   is loading, without a stale transition clearing a newer one;
//! - a **tab registry** with pinned tabs and a single active tab;
//! - a bounded **keep-alive cache** so switching tabs does not rebuild views;
//! - a **permission gate** over the signed-in role.
//!
//! The core ([`NavigationCoordinator`]) is plain Rust, generic over the
//! [`Router`] and the retained view type. The [`context`] and [`widgets`]
//! modules wire it into GPUI.
//!
//! # Quick start
//!
//! ```ignore
//! use gpui_workbench::*;
//!
//! init_workbench(cx, MemoryRouter::new("/"), WorkbenchConfig::default(), |workbench| {
//!     workbench.page("/", |_, cx, _| cx.new(|_| Dashboard).into());
//!     workbench.coordinator_mut().add_guard(AuthGuard::new("/login", "/"));
//! });
//!
//! Workbench::trigger(cx, "/users", "用户管理", NavigationSource::Sidebar);
//! ```
//!
//! # Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `guard` | yes | [`RouteGuard`], [`AuthGuard`], [`PermissionGuard`] |
//! | `middleware` | yes | [`NavigationMiddleware`] |
//! | `log` | yes | logging through the `log` crate |
//! | `tracing` | no | logging through the `tracing` crate |

#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(all(feature = "log", feature = "tracing"))]
compile_error!("features `log` and `tracing` are mutually exclusive");

#[macro_use]
pub mod logging;

pub mod config;
pub mod context;
pub mod coordinator;
pub mod error;
#[cfg(feature = "guard")]
#[cfg_attr(docsrs, doc(cfg(feature = "guard")))]
pub mod guards;
pub mod intent;
pub mod keep_alive;
pub mod lifecycle;
#[cfg(feature = "middleware")]
#[cfg_attr(docsrs, doc(cfg(feature = "middleware")))]
pub mod middleware;
pub mod permission;
pub mod router;
pub mod session;
pub mod tabs;
pub mod widgets;

pub use config::{RouteTitles, WorkbenchConfig};
pub use context::{init_workbench, GlobalWorkbench, PageBuilder, PageTable, UseWorkbench, Workbench};
pub use coordinator::{
    is_external, NavigationCoordinator, PendingNavigation, TriggerResult, MAX_REDIRECT_DEPTH,
};
pub use error::{NavigationError, NavigationOutcome, SkipReason, TabError};
#[cfg(feature = "guard")]
pub use guards::{
    guard_fn, AuthGuard, FnGuard, GuardBuilder, GuardContext, Guards, NotGuard, PermissionGuard,
    RouteGuard,
};
pub use intent::{NavigationIntent, NavigationIntentStore, NavigationSource, NavigationTicket};
pub use keep_alive::{KeepAliveCache, KeepAliveStats};
pub use lifecycle::{NavigationAction, NavigationRequest};
#[cfg(feature = "middleware")]
pub use middleware::{middleware_fn, FnMiddleware, MiddlewareStack, NavigationMiddleware};
pub use permission::{PermissionGate, PermissionTag, Requirement, Role, UnknownPermission};
pub use router::{MemoryRouter, NavigateFuture, Router};
pub use session::{AuthSession, RoleCatalog, RoleRef, User};
pub use tabs::{ClosedTabs, Tab, TabId, TabRegistry};
pub use widgets::{
    keep_alive_outlet, keep_alive_view, nav_link, pending_overlay, permission_guard, tab_bar,
    NavLink,
};
