//! Workbench configuration.
//!
//! ```
//! use gpui_workbench::config::{RouteTitles, WorkbenchConfig};
//! use std::time::Duration;
//!
//! let config = WorkbenchConfig::new()
//!     .home("/", "仪表盘")
//!     .titles(RouteTitles::new().with("/users", "用户管理"))
//!     .keep_alive_capacity(16)
//!     .navigation_timeout(Some(Duration::from_secs(5)));
//!
//! assert_eq!(config.title_for("/users"), "用户管理");
//! assert_eq!(config.title_for("/unknown"), "Admin Pro");
//! ```

use std::collections::HashMap;
use std::time::Duration;

/// Path → display title table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTitles {
    titles: HashMap<String, String>,
}

impl RouteTitles {
    /// An empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a title, builder style
    #[must_use]
    pub fn with(mut self, path: impl Into<String>, title: impl Into<String>) -> Self {
        self.insert(path, title);
        self
    }

    /// Add or replace a title
    pub fn insert(&mut self, path: impl Into<String>, title: impl Into<String>) {
        self.titles.insert(path.into(), title.into());
    }

    /// Look up the title for `path`
    pub fn get(&self, path: &str) -> Option<&str> {
        self.titles.get(path).map(String::as_str)
    }
}

/// Settings for a [`NavigationCoordinator`](crate::NavigationCoordinator).
#[derive(Debug, Clone)]
pub struct WorkbenchConfig {
    /// Path of the pinned home tab.
    pub home_path: String,
    /// Title of the pinned home tab.
    pub home_title: String,
    /// Where logout and the auth guard send the user.
    pub login_path: String,
    /// Title used when a path has no entry in `titles`.
    pub default_title: String,
    /// Maximum number of retained tab views.
    pub keep_alive_capacity: usize,
    /// How long a navigation may stay pending; `None` waits forever.
    pub navigation_timeout: Option<Duration>,
    /// Per-path titles.
    pub titles: RouteTitles,
}

impl WorkbenchConfig {
    /// Defaults: home `/` ("Dashboard"), login `/login`, 32 retained views,
    /// 10 second navigation timeout.
    pub fn new() -> Self {
        Self {
            home_path: "/".to_string(),
            home_title: "Dashboard".to_string(),
            login_path: "/login".to_string(),
            default_title: "Admin Pro".to_string(),
            keep_alive_capacity: 32,
            navigation_timeout: Some(Duration::from_secs(10)),
            titles: RouteTitles::new(),
        }
    }

    /// Set the home tab
    #[must_use]
    pub fn home(mut self, path: impl Into<String>, title: impl Into<String>) -> Self {
        self.home_path = path.into();
        self.home_title = title.into();
        self
    }

    /// Set the login path
    #[must_use]
    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Set the fallback title
    #[must_use]
    pub fn default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = title.into();
        self
    }

    /// Set the keep-alive capacity
    #[must_use]
    pub fn keep_alive_capacity(mut self, capacity: usize) -> Self {
        self.keep_alive_capacity = capacity;
        self
    }

    /// Set the pending-navigation timeout
    #[must_use]
    pub fn navigation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    /// Set the title table
    #[must_use]
    pub fn titles(mut self, titles: RouteTitles) -> Self {
        self.titles = titles;
        self
    }

    /// Display title for `path`.
    pub fn title_for(&self, path: &str) -> &str {
        if path == self.home_path {
            return &self.home_title;
        }
        self.titles.get(path).unwrap_or(&self.default_title)
    }
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorkbenchConfig::default();
        assert_eq!(config.home_path, "/");
        assert_eq!(config.title_for("/"), "Dashboard");
        assert_eq!(config.navigation_timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_titles_fall_back() {
        let config = WorkbenchConfig::new()
            .titles(RouteTitles::new().with("/files", "Files"))
            .default_title("Console");
        assert_eq!(config.title_for("/files"), "Files");
        assert_eq!(config.title_for("/nope"), "Console");
    }
}
