//! Property tests for tabs, keep-alive, permissions and intents
//!
//! Operation sequences are generated from a fixed seed so failures replay.

mod common;

use common::*;
use gpui_workbench::*;
use std::cell::Cell;

const PATHS: &[&str] = &["/", "/users", "/files", "/settings", "/documents", "/calendar"];

/// Small xorshift generator; enough to shuffle tab operations.
struct Sequence(u64);

impl Sequence {
    fn next(&mut self) -> usize {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0 as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.next() % items.len()]
    }
}

fn registry_with(paths: &[&str]) -> TabRegistry {
    let mut registry = TabRegistry::new();
    registry.open_pinned("/", "Dashboard");
    for path in paths {
        registry.open_or_activate(path, *path);
    }
    registry
}

// ============================================================================
// Single active tab
// ============================================================================

#[test]
fn test_single_active_tab_across_sequences() {
    for seed in 1..=64u64 {
        let mut seq = Sequence(seed * 0x9E37_79B9);
        let mut registry = TabRegistry::new();
        registry.open_pinned("/", "Dashboard");

        for _ in 0..40 {
            let path = seq.pick(PATHS);
            match seq.next() % 4 {
                0 | 1 => {
                    registry.open_or_activate(path, path);
                }
                2 => {
                    let _ = registry.close(&TabId::from_path(path));
                }
                _ => {
                    let _ = registry.activate(&TabId::from_path(path));
                }
            }
            assert_single_active(&registry);
        }
    }
}

#[test]
fn test_bulk_closes_keep_single_active() {
    let mut registry = registry_with(&["/users", "/files", "/settings"]);
    registry.close_others(&TabId::from_path("/files")).unwrap();
    assert_single_active(&registry);
    assert_eq!(registry.active().unwrap().path, "/files");

    registry.close_all();
    assert_single_active(&registry);
    assert_eq!(registry.active().unwrap().path, "/");
}

// ============================================================================
// Idempotent revisit
// ============================================================================

#[test]
fn test_idempotent_revisit() {
    for path in PATHS {
        let mut once = registry_with(&["/users"]);
        once.open_or_activate(path, "t");
        let mut twice = registry_with(&["/users"]);
        twice.open_or_activate(path, "t");
        twice.open_or_activate(path, "t");

        assert_eq!(once.len(), twice.len(), "revisiting '{}'", path);
    }
}

#[test]
fn test_revisit_refreshes_title() {
    let mut registry = registry_with(&["/users"]);
    registry.open_or_activate("/users", "用户管理");
    assert_eq!(
        registry.find_by_path("/users").unwrap().title,
        "用户管理"
    );

    registry.open_or_activate("/users", "");
    assert_eq!(
        registry.find_by_path("/users").unwrap().title,
        "用户管理"
    );
}

// ============================================================================
// Pinned survives
// ============================================================================

#[test]
fn test_pinned_tab_survives_every_close() {
    let mut registry = registry_with(&["/users", "/files"]);
    let home = TabId::from_path("/");
    let before = registry.len();

    assert_eq!(
        registry.close(&home),
        Err(TabError::CannotClose {
            id: "/".to_string()
        })
    );
    assert_eq!(registry.len(), before);

    registry.close_others(&TabId::from_path("/files")).unwrap();
    assert!(registry.get(&home).is_some());
    registry.close_all();
    assert!(registry.get(&home).is_some());
}

// ============================================================================
// Active-neighbour rule
// ============================================================================

#[test]
fn test_closing_last_active_moves_left() {
    // [A, B, C] with C active
    let mut registry = TabRegistry::new();
    for path in ["/a", "/b", "/c"] {
        registry.open_or_activate(path, path);
    }
    let closed = registry.close(&TabId::from_path("/c")).unwrap();
    assert_eq!(closed.active, Some(TabId::from_path("/b")));
}

#[test]
fn test_closing_first_active_moves_right() {
    // [A, B, C] with A active
    let mut registry = TabRegistry::new();
    for path in ["/a", "/b", "/c"] {
        registry.open_or_activate(path, path);
    }
    registry.activate(&TabId::from_path("/a")).unwrap();
    let closed = registry.close(&TabId::from_path("/a")).unwrap();
    assert_eq!(closed.active, Some(TabId::from_path("/b")));
}

#[test]
fn test_closing_inactive_keeps_activation() {
    let mut registry = registry_with(&["/users", "/files"]);
    registry.close(&TabId::from_path("/users")).unwrap();
    assert_eq!(registry.active().unwrap().path, "/files");
}

// ============================================================================
// Keep-alive
// ============================================================================

#[test]
fn test_cache_factory_runs_once_per_key() {
    let mut cache: KeepAliveCache<String> = KeepAliveCache::new();
    let calls = Cell::new(0);

    for _ in 0..3 {
        cache.get_or_create("/users", || {
            calls.set(calls.get() + 1);
            "users".to_string()
        });
    }

    assert_eq!(calls.get(), 1);
    assert_eq!(cache.stats().misses, 1);
    assert_eq!(cache.stats().hits, 2);
}

#[test]
fn test_eviction_on_close() {
    let (_router, mut workbench) = memory_workbench();
    for path in ["/users", "/files", "/settings"] {
        let result = workbench.request(path, "", NavigationSource::Sidebar);
        settle_now(&mut workbench, result);
        workbench.mount(path, || path.to_string());
    }

    for path in ["/files", "/users", "/settings"] {
        let follow_up = workbench.close_tab(&TabId::from_path(path)).unwrap();
        if let Some(result) = follow_up {
            settle_now(&mut workbench, result);
        }
        assert!(
            !workbench.keep_alive().contains(path),
            "'{}' still retained after close",
            path
        );
        assert_single_active(workbench.tabs());
    }
    assert_eq!(tab_titles(&workbench), vec!["Dashboard"]);
}

#[test]
fn test_capacity_evicts_least_recently_activated() {
    init_logging();
    let config = admin_config().keep_alive_capacity(2);
    let mut workbench: NavigationCoordinator<_, TestView> =
        NavigationCoordinator::new(MemoryRouter::new("/"), config);

    workbench.mount("/", || "home".to_string());
    let result = workbench.request("/users", "", NavigationSource::Sidebar);
    settle_now(&mut workbench, result);
    workbench.mount("/users", || "users".to_string());

    // Re-activating home makes /users the oldest entry
    let result = workbench.request("/", "", NavigationSource::TabBar);
    settle_now(&mut workbench, result);

    let result = workbench.request("/files", "", NavigationSource::Sidebar);
    settle_now(&mut workbench, result);
    workbench.mount("/files", || "files".to_string());

    assert_eq!(workbench.keep_alive().len(), 2);
    assert!(workbench.keep_alive().contains("/"));
    assert!(workbench.keep_alive().contains("/files"));
    assert!(!workbench.keep_alive().contains("/users"));
    assert_eq!(workbench.keep_alive().stats().capacity_evictions, 1);

    // The tab is still open; its view is rebuilt on next mount
    assert!(workbench.tabs().find_by_path("/users").is_some());
}

// ============================================================================
// Permissions
// ============================================================================

#[test]
fn test_permission_denial_default() {
    let gate = PermissionGate::default();
    for tag in PermissionTag::ALL {
        assert!(!gate.has_permission(*tag), "{} granted without a role", tag);
    }

    let (_router, workbench) = memory_workbench();
    assert!(!workbench.gate().has_permission(PermissionTag::DashboardView));
}

#[test]
fn test_builtin_roles_are_nested() {
    let roles = RoleCatalog::with_defaults();
    let admin = roles.get("admin").unwrap();
    let editor = roles.get("editor").unwrap();
    let viewer = roles.get("viewer").unwrap();

    assert!(viewer.permissions.is_subset(&editor.permissions));
    assert!(editor.permissions.is_subset(&admin.permissions));
}

// ============================================================================
// Intent clears on arrival
// ============================================================================

#[test]
fn test_intent_clears_on_arrival() {
    let mut store = NavigationIntentStore::new();
    let router = MemoryRouter::new("/");

    let ticket = store.start_navigation("/users", "Users", NavigationSource::Sidebar);
    pollster::block_on(router.navigate("/users")).unwrap();
    store.finish_navigation();

    assert!(store.current().is_none());
    assert!(!store.is_current(ticket));
}

#[test]
fn test_intent_replaced_not_queued() {
    let mut store = NavigationIntentStore::new();
    store.start_navigation("/users", "Users", NavigationSource::Sidebar);
    store.start_navigation("/files", "Files", NavigationSource::Footer);

    let current = store.current().unwrap();
    assert_eq!(current.target_path, "/files");
    assert_eq!(current.source, NavigationSource::Footer);

    store.finish_navigation();
    assert!(!store.is_pending());
}
