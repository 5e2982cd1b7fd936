//! Workbench widgets.
//!
//! - [`tab_bar`]: the open tabs, with close buttons on unpinned ones.
//! - [`keep_alive_outlet`]: renders the active tab's retained view, or the
//!   login page when the router is outside the tab bar.
//! - [`pending_overlay`]: "Loading …" banner while a navigation is pending.
//! - [`permission_guard`]: renders content or a fallback by permission.
//! - [`nav_link`] / [`NavLink`]: sidebar/header links that trigger navigation.
//!
//! # Keep-alive
//!
//! Each tab's view is built once through the page table and retained in the
//! coordinator's keep-alive cache. Switching tabs renders a different
//! retained view; closing a tab drops it. Inactive views are never rendered,
//! but their entities (and so their state) stay alive.
//!
//! ```text
//! tabs:   [ Dashboard* | Users | Files ]
//! cache:  { "/" → view, "/users" → view, "/files" → view }
//!            ↑ rendered
//! ```

use crate::context::{GlobalWorkbench, UseWorkbench, Workbench};
use crate::intent::NavigationSource;
use crate::permission::Requirement;
use crate::{debug_log, warn_log};
use gpui::*;

// ============================================================================
// Tab bar
// ============================================================================

/// Render the tab bar.
///
/// Clicking a tab activates it; the `×` on unpinned tabs closes it.
pub fn tab_bar<V: 'static>(cx: &mut Context<'_, V>) -> Div {
    let Some(workbench) = cx.try_global::<GlobalWorkbench>() else {
        return div();
    };
    let tabs = workbench.coordinator().tabs().tabs().to_vec();

    let mut bar = div()
        .flex()
        .flex_row()
        .gap_1()
        .px_2()
        .py_1()
        .bg(rgb(0xf5f5f5))
        .border_b_1()
        .border_color(rgb(0xe0e0e0));

    for tab in tabs {
        let activate_id = tab.id.clone();
        let mut item = div()
            .flex()
            .flex_row()
            .items_center()
            .gap_2()
            .px_3()
            .py_1()
            .rounded_md()
            .cursor_pointer()
            .text_sm()
            .child(tab.title.clone())
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(move |_view, _event, _window, cx| {
                    if let Err(err) = Workbench::activate_tab(cx, &activate_id) {
                        warn_log!("Tab activation failed: {}", err);
                    }
                }),
            );

        item = if tab.is_active {
            item.bg(rgb(0xffffff)).text_color(rgb(0x2196f3))
        } else {
            item.text_color(rgb(0x555555))
                .hover(|this| this.bg(rgb(0xeeeeee)))
        };

        if !tab.is_pinned {
            let close_id = tab.id.clone();
            item = item.child(
                div()
                    .text_xs()
                    .text_color(rgb(0x999999))
                    .hover(|this| this.text_color(rgb(0xe53935)))
                    .child("×")
                    .on_mouse_down(
                        MouseButton::Left,
                        cx.listener(move |_view, _event, _window, cx| {
                            cx.stop_propagation();
                            if let Err(err) = Workbench::close_tab(cx, &close_id) {
                                warn_log!("Tab close failed: {}", err);
                            }
                        }),
                    ),
            );
        }

        bar = bar.child(item);
    }

    bar
}

// ============================================================================
// Keep-alive outlet
// ============================================================================

/// Render the active tab's view, building it on first activation.
///
/// A location without a tab (the login page) is rendered from the page table
/// directly and is not kept alive. Also keeps the window title in step.
pub fn keep_alive_outlet(window: &mut Window, cx: &mut App) -> AnyElement {
    let Some(workbench) = cx.try_global::<GlobalWorkbench>() else {
        return div().child("No workbench configured").into_any_element();
    };
    let coordinator = workbench.coordinator();
    let untabbed = coordinator.untabbed_location();
    let Some(path) = untabbed
        .clone()
        .or_else(|| coordinator.tabs().active().map(|tab| tab.path.clone()))
    else {
        return div().into_any_element();
    };
    let title = coordinator.title_for(&path).to_string();
    let builder = workbench.pages().builder_for(&path);
    let detached = workbench.detached_view(&path);

    window.set_window_title(&title);

    let Some(builder) = builder else {
        return default_missing_page(&path).into_any_element();
    };

    if untabbed.is_some() {
        if let Some(view) = detached {
            return view.into_any_element();
        }
        debug_log!("Building detached view for '{}'", path);
        let view = builder(window, cx, &path);
        cx.update_workbench(|workbench, _| {
            workbench.set_detached_view(Some((path, view.clone())));
        });
        return view.into_any_element();
    }

    let view = cx.update_workbench(|workbench, cx| {
        workbench.set_detached_view(None);
        workbench
            .coordinator_mut()
            .mount(&path, || {
                debug_log!("Building view for tab '{}'", path);
                builder(window, cx, &path)
            })
            .clone()
    });
    view.into_any_element()
}

/// Function form of [`keep_alive_outlet`] for use in a view's `render`.
pub fn keep_alive_view<V>(window: &mut Window, cx: &mut Context<'_, V>) -> AnyElement {
    keep_alive_outlet(window, cx)
}

// ============================================================================
// Pending overlay
// ============================================================================

/// A banner naming the pending navigation, or `None` when idle.
pub fn pending_overlay(cx: &App) -> Option<Div> {
    let label = cx
        .try_global::<GlobalWorkbench>()?
        .coordinator()
        .intent()
        .current()?
        .label
        .clone();
    Some(
        div()
            .absolute()
            .top_0()
            .left_0()
            .right_0()
            .flex()
            .justify_center()
            .py_1()
            .bg(rgb(0xe3f2fd))
            .text_sm()
            .text_color(rgb(0x1565c0))
            .child(format!("Loading {}…", label)),
    )
}

// ============================================================================
// Permission guard
// ============================================================================

/// Render `children` if the signed-in role satisfies `requirement`,
/// else `fallback`.
pub fn permission_guard(
    cx: &App,
    requirement: &Requirement,
    children: impl IntoElement,
    fallback: impl IntoElement,
) -> AnyElement {
    if Workbench::allows(cx, requirement) {
        children.into_any_element()
    } else {
        fallback.into_any_element()
    }
}

// ============================================================================
// NavLink
// ============================================================================

/// A clickable link that triggers a workbench navigation.
///
/// ```ignore
/// NavLink::new("/users", "用户管理")
///     .source(NavigationSource::Sidebar)
///     .requires(PermissionTag::UsersView)
///     .build(cx)
/// ```
pub struct NavLink {
    path: SharedString,
    label: SharedString,
    source: NavigationSource,
    requirement: Requirement,
}

impl NavLink {
    pub fn new(path: impl Into<SharedString>, label: impl Into<SharedString>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            source: NavigationSource::Sidebar,
            requirement: Requirement::Always,
        }
    }

    /// Where the link lives
    pub fn source(mut self, source: NavigationSource) -> Self {
        self.source = source;
        self
    }

    /// Hide the link unless the role satisfies `requirement`
    pub fn requires(mut self, requirement: impl Into<Requirement>) -> Self {
        self.requirement = requirement.into();
        self
    }

    /// Build the link, or `None` if the role may not see it.
    pub fn build<V: 'static>(self, cx: &mut Context<'_, V>) -> Option<Div> {
        if !Workbench::allows(cx, &self.requirement) {
            return None;
        }
        let is_active = cx
            .try_global::<GlobalWorkbench>()
            .and_then(|workbench| workbench.coordinator().tabs().active())
            .is_some_and(|tab| tab.path == self.path.as_ref());
        let (path, label, source) = (self.path, self.label.clone(), self.source);

        Some(
            div()
                .cursor_pointer()
                .px_3()
                .py_2()
                .rounded_md()
                .text_color(if is_active {
                    rgb(0x2196f3)
                } else {
                    rgb(0x333333)
                })
                .hover(|this| this.bg(rgb(0xf0f0f0)))
                .child(self.label)
                .on_mouse_down(
                    MouseButton::Left,
                    cx.listener(move |_view, _event, _window, cx| {
                        Workbench::trigger(cx, path.to_string(), label.to_string(), source);
                    }),
                ),
        )
    }
}

/// A sidebar link with built-in active-state color.
pub fn nav_link<V: 'static>(
    cx: &mut Context<'_, V>,
    path: impl Into<SharedString>,
    label: impl Into<SharedString>,
) -> Div {
    NavLink::new(path, label).build(cx).unwrap_or_else(div)
}

/// Placeholder shown when no page is registered for a path.
fn default_missing_page(path: &str) -> impl IntoElement {
    div()
        .flex()
        .flex_col()
        .items_center()
        .justify_center()
        .size_full()
        .p_8()
        .gap_4()
        .child(
            div()
                .text_2xl()
                .font_weight(FontWeight::BOLD)
                .child("Page Not Found"),
        )
        .child(
            div()
                .text_base()
                .text_color(rgb(0x888888))
                .child(format!("No page is registered for {}", path)),
        )
}
