//! Admin Shell Demo
//!
//! A tabbed admin console: sidebar links open tabs, each tab's page is built
//! once and kept alive, and the header switches between the built-in roles
//! to show permission gating.
//!
//! Try: open Users, bump the counter, switch to Files and back. The count
//! survives because the Users view is retained until its tab closes.

use gpui::{
    div, prelude::FluentBuilder, px, rgb, size, App, AppContext, Application, Bounds, Context,
    InteractiveElement, IntoElement, MouseButton, ParentElement, Render, Styled, TitlebarOptions,
    Window, WindowBounds, WindowOptions,
};
use gpui_workbench::{
    init_workbench, keep_alive_outlet, nav_link, pending_overlay, permission_guard, tab_bar,
    AuthGuard, AuthSession, MemoryRouter, NavLink, NavigationSource, PermissionGuard,
    PermissionTag, Requirement, RouteTitles, User, Workbench, WorkbenchConfig,
};
use std::time::Duration;

fn main() {
    Application::new().run(|cx: &mut App| {
        let router = MemoryRouter::new("/login").with_routes([
            "/", "/login", "/users", "/files", "/settings", "/documents",
        ]);
        let config = WorkbenchConfig::new()
            .home("/", "Dashboard")
            .navigation_timeout(Some(Duration::from_secs(5)))
            .titles(
                RouteTitles::new()
                    .with("/login", "Sign in")
                    .with("/users", "用户管理")
                    .with("/files", "文件管理")
                    .with("/settings", "系统设置")
                    .with("/documents", "Documents"),
            );

        init_workbench(cx, router.clone(), config, |workbench| {
            workbench
                .page("/", |_, cx, _| cx.new(|_| DashboardPage).into())
                .page("/login", |_, cx, _| cx.new(|_| LoginPage).into())
                .page("/users", |_, cx, _| cx.new(|_| UsersPage::default()).into())
                .page("/files", |_, cx, _| cx.new(|_| FilesPage::default()).into())
                .page("/settings", |_, cx, _| cx.new(|_| SettingsPage).into())
                .page("/documents", |_, cx, _| cx.new(|_| DocumentsPage).into());

            let coordinator = workbench.coordinator_mut();
            coordinator.add_guard(AuthGuard::new("/login", "/"));
            coordinator.add_guard(PermissionGuard::new("/users", PermissionTag::UsersView));
            coordinator.add_guard(PermissionGuard::new("/settings", PermissionTag::SettingsView));
        });

        let bounds = Bounds::centered(None, size(px(1100.), px(720.)), cx);
        cx.open_window(
            WindowOptions {
                window_bounds: Some(WindowBounds::Windowed(bounds)),
                titlebar: Some(TitlebarOptions {
                    title: Some("Admin Pro".into()),
                    appears_transparent: false,
                    traffic_light_position: None,
                }),
                ..Default::default()
            },
            |_, cx| cx.new(|_| AdminShell { router }),
        )
        .unwrap();

        cx.activate(true);
    });
}

fn sign_in(cx: &mut App, role_id: &str) {
    let user = User::new(
        format!("demo-{}", role_id),
        format!("Demo {}", role_id),
        format!("{}@example.com", role_id),
        role_id,
    );
    Workbench::login(cx, AuthSession::signed_in("demo-token", user));
    Workbench::trigger(cx, "/", "Dashboard", NavigationSource::Command);
}

// ============================================================================
// Shell
// ============================================================================

struct AdminShell {
    router: MemoryRouter,
}

impl Render for AdminShell {
    fn render(&mut self, window: &mut Window, cx: &mut Context<'_, Self>) -> impl IntoElement {
        let signed_in = !Workbench::current_location(cx).starts_with("/login");

        div()
            .relative()
            .flex()
            .flex_col()
            .size_full()
            .bg(rgb(0xffffff))
            .text_color(rgb(0x222222))
            .child(self.header(cx, signed_in))
            .child(
                div()
                    .flex()
                    .flex_row()
                    .flex_1()
                    .when(signed_in, |this| this.child(self.sidebar(cx)))
                    .child(
                        div()
                            .flex()
                            .flex_col()
                            .flex_1()
                            .when(signed_in, |this| this.child(tab_bar(cx)))
                            .child(div().flex_1().p_4().child(keep_alive_outlet(window, cx))),
                    ),
            )
            .child(self.footer(cx))
            .children(pending_overlay(cx))
    }
}

impl AdminShell {
    fn header(&self, cx: &mut Context<'_, Self>, signed_in: bool) -> impl IntoElement {
        let back = self.router.clone();
        let forward = self.router.clone();

        div()
            .flex()
            .flex_row()
            .items_center()
            .gap_2()
            .px_4()
            .py_2()
            .bg(rgb(0x1e293b))
            .text_color(rgb(0xffffff))
            .child(div().text_lg().child("Admin Pro"))
            .child(div().flex_1())
            .child(button("←").on_mouse_down(
                MouseButton::Left,
                cx.listener(move |_view, _event, _window, cx| {
                    if back.back() {
                        Workbench::observe_location(cx);
                    }
                }),
            ))
            .child(button("→").on_mouse_down(
                MouseButton::Left,
                cx.listener(move |_view, _event, _window, cx| {
                    if forward.forward() {
                        Workbench::observe_location(cx);
                    }
                }),
            ))
            .when(signed_in, |this| {
                this.children(["admin", "editor", "viewer"].map(|role| {
                    button(role).on_mouse_down(
                        MouseButton::Left,
                        cx.listener(move |_view, _event, _window, cx| {
                            sign_in(cx, role);
                        }),
                    )
                }))
                .child(button("Sign out").on_mouse_down(
                    MouseButton::Left,
                    cx.listener(|_view, _event, _window, cx| Workbench::logout(cx)),
                ))
            })
    }

    #[allow(clippy::unused_self)]
    fn sidebar(&self, cx: &mut Context<'_, Self>) -> impl IntoElement {
        div()
            .flex()
            .flex_col()
            .w(px(200.))
            .p_2()
            .gap_1()
            .bg(rgb(0xf8fafc))
            .border_r_1()
            .border_color(rgb(0xe2e8f0))
            .child(nav_link(cx, "/", "Dashboard"))
            .children(
                NavLink::new("/users", "用户管理")
                    .requires(PermissionTag::UsersView)
                    .build(cx),
            )
            .children(
                NavLink::new("/files", "文件管理")
                    .requires(PermissionTag::FilesView)
                    .build(cx),
            )
            .children(
                NavLink::new("/documents", "Documents")
                    .requires(PermissionTag::DocumentsView)
                    .build(cx),
            )
            .children(
                NavLink::new("/settings", "系统设置")
                    .requires(PermissionTag::SettingsView)
                    .build(cx),
            )
    }

    #[allow(clippy::unused_self)]
    fn footer(&self, cx: &mut Context<'_, Self>) -> impl IntoElement {
        let error = Workbench::last_error(cx).map(|err| err.to_string());

        div()
            .flex()
            .flex_row()
            .gap_4()
            .px_4()
            .py_1()
            .text_xs()
            .text_color(rgb(0x64748b))
            .border_t_1()
            .border_color(rgb(0xe2e8f0))
            .child(format!("Location: {}", Workbench::current_location(cx)))
            .child(
                NavLink::new("/settings", "Settings")
                    .source(NavigationSource::Footer)
                    .requires(PermissionTag::SettingsView)
                    .build(cx)
                    .unwrap_or_else(div),
            )
            .children(error.map(|message| div().text_color(rgb(0xdc2626)).child(message)))
    }
}

fn button(label: &'static str) -> gpui::Div {
    div()
        .px_3()
        .py_1()
        .rounded_md()
        .cursor_pointer()
        .bg(rgb(0x334155))
        .hover(|style| style.bg(rgb(0x475569)))
        .child(label)
}

// ============================================================================
// Pages
// ============================================================================

struct LoginPage;

impl Render for LoginPage {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<'_, Self>) -> impl IntoElement {
        div()
            .flex()
            .flex_col()
            .items_center()
            .justify_center()
            .size_full()
            .gap_4()
            .child(div().text_2xl().child("Sign in"))
            .child(div().text_sm().child("Pick a role to sign in as:"))
            .child(
                div()
                    .flex()
                    .flex_row()
                    .gap_2()
                    .text_color(rgb(0xffffff))
                    .children(["admin", "editor", "viewer", "guest"].map(|role| {
                        button(role).on_mouse_down(
                            MouseButton::Left,
                            cx.listener(move |_view, _event, _window, cx| {
                                sign_in(cx, role);
                            }),
                        )
                    })),
            )
            .child(
                div()
                    .text_xs()
                    .text_color(rgb(0x64748b))
                    .child("\"guest\" is not a known role and sees nothing gated."),
            )
    }
}

struct DashboardPage;

impl Render for DashboardPage {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<'_, Self>) -> impl IntoElement {
        div()
            .flex()
            .flex_col()
            .gap_4()
            .child(div().text_2xl().child("Dashboard"))
            .child(permission_guard(
                cx,
                &Requirement::One(PermissionTag::AnalyticsExport),
                div().child("Export analytics"),
                div()
                    .text_sm()
                    .text_color(rgb(0x94a3b8))
                    .child("Exports need analytics:export"),
            ))
    }
}

#[derive(Default)]
struct UsersPage {
    visits: u32,
}

impl Render for UsersPage {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<'_, Self>) -> impl IntoElement {
        div()
            .flex()
            .flex_col()
            .gap_4()
            .child(div().text_2xl().child("用户管理"))
            .child(format!("Counter: {}", self.visits))
            .child(
                div()
                    .flex()
                    .flex_row()
                    .gap_2()
                    .text_color(rgb(0xffffff))
                    .child(button("+1").on_mouse_down(
                        MouseButton::Left,
                        cx.listener(|page, _event, _window, cx| {
                            page.visits += 1;
                            cx.notify();
                        }),
                    ))
                    .child(permission_guard(
                        cx,
                        &Requirement::One(PermissionTag::UsersDelete),
                        button("Delete user"),
                        div(),
                    )),
            )
    }
}

#[derive(Default)]
struct FilesPage {
    uploads: Vec<String>,
}

impl Render for FilesPage {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<'_, Self>) -> impl IntoElement {
        let can_upload = Workbench::has_permission(cx, PermissionTag::FilesUpload);

        div()
            .flex()
            .flex_col()
            .gap_4()
            .child(div().text_2xl().child("文件管理"))
            .when(can_upload, |this| {
                this.child(
                    div().text_color(rgb(0xffffff)).child(button("Upload").on_mouse_down(
                        MouseButton::Left,
                        cx.listener(|page, _event, _window, cx| {
                            let name = format!("report-{}.pdf", page.uploads.len() + 1);
                            page.uploads.push(name);
                            cx.notify();
                        }),
                    )),
                )
            })
            .children(self.uploads.iter().map(|name| div().text_sm().child(name.clone())))
    }
}

struct SettingsPage;

impl Render for SettingsPage {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<'_, Self>) -> impl IntoElement {
        div()
            .flex()
            .flex_col()
            .gap_4()
            .child(div().text_2xl().child("系统设置"))
            .child(permission_guard(
                cx,
                &Requirement::One(PermissionTag::SettingsEdit),
                div().child("Settings are editable"),
                div().child("Read-only"),
            ))
    }
}

struct DocumentsPage;

impl Render for DocumentsPage {
    fn render(&mut self, _window: &mut Window, _cx: &mut Context<'_, Self>) -> impl IntoElement {
        div()
            .flex()
            .flex_col()
            .gap_4()
            .child(div().text_2xl().child("Documents"))
            .child("Shared documents live here.")
    }
}
