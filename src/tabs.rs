//! Ordered collection of open tabs.
//!
//! Each [`Tab`] is bound to one route path. The registry keeps tabs unique by
//! path, keeps exactly one tab active whenever it is non-empty, and preserves
//! insertion order except for explicit [`reorder`](TabRegistry::reorder).
//!
//! Per-tab lifecycle:
//!
//! ```text
//! unopened ──open_or_activate──▶ active ◀──▶ inactive ──close──▶ closed
//! ```
//!
//! Pinned tabs (the home tab) never reach `closed`.
//!
//! ```
//! use gpui_workbench::tabs::{TabId, TabRegistry};
//!
//! let mut tabs = TabRegistry::new();
//! tabs.open_pinned("/", "Dashboard");
//! tabs.open_or_activate("/users", "Users");
//! tabs.open_or_activate("/files", "Files");
//!
//! let closed = tabs.close(&TabId::from_path("/files")).unwrap();
//! assert_eq!(closed.active, Some(TabId::from_path("/users")));
//! assert!(tabs.close(&TabId::from_path("/")).is_err());
//! ```

use crate::error::TabError;
use crate::{debug_log, trace_log};
use std::fmt;

/// Stable tab identifier derived from the tab's path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(String);

impl TabId {
    /// Derive the id for a route path
    pub fn from_path(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persistent handle to a visited route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub id: TabId,
    pub path: String,
    pub title: String,
    pub is_active: bool,
    pub is_pinned: bool,
}

impl Tab {
    fn new(path: &str, title: impl Into<String>, is_pinned: bool) -> Self {
        Self {
            id: TabId::from_path(path),
            path: path.to_string(),
            title: title.into(),
            is_active: false,
            is_pinned,
        }
    }
}

/// Result of a close operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedTabs {
    /// Tabs that were removed, in their former order
    pub removed: Vec<Tab>,
    /// The active tab after the operation
    pub active: Option<TabId>,
}

impl ClosedTabs {
    /// Paths of the removed tabs
    pub fn removed_paths(&self) -> impl Iterator<Item = &str> {
        self.removed.iter().map(|tab| tab.path.as_str())
    }
}

/// Ordered, path-unique tab list with a single active tab.
#[derive(Debug, Clone, Default)]
pub struct TabRegistry {
    tabs: Vec<Tab>,
}

impl TabRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate the tab for `path`, appending a new one if needed.
    ///
    /// Revisiting a path refreshes its title but never duplicates the tab.
    pub fn open_or_activate(&mut self, path: &str, title: impl Into<String>) -> TabId {
        let title = title.into();
        let index = match self.index_of_path(path) {
            Some(index) => {
                if !title.is_empty() {
                    self.tabs[index].title = title;
                }
                trace_log!("Reactivating tab '{}'", path);
                index
            }
            None => {
                debug_log!("Opening tab '{}' ({})", path, title);
                self.tabs.push(Tab::new(path, title, false));
                self.tabs.len() - 1
            }
        };
        self.set_active_index(Some(index));
        self.tabs[index].id.clone()
    }

    /// Open (or mark) the tab for `path` as pinned without changing activation,
    /// except that the first tab of an empty registry becomes active.
    pub fn open_pinned(&mut self, path: &str, title: impl Into<String>) -> TabId {
        if let Some(index) = self.index_of_path(path) {
            self.tabs[index].is_pinned = true;
            return self.tabs[index].id.clone();
        }
        let was_empty = self.tabs.is_empty();
        self.tabs.push(Tab::new(path, title, true));
        if was_empty {
            self.set_active_index(Some(0));
        }
        self.tabs[self.tabs.len() - 1].id.clone()
    }

    /// Make an existing tab active.
    pub fn activate(&mut self, id: &TabId) -> Result<(), TabError> {
        let index = self.require(id)?;
        self.set_active_index(Some(index));
        Ok(())
    }

    /// Pin or unpin a tab.
    pub fn set_pinned(&mut self, id: &TabId, pinned: bool) -> Result<(), TabError> {
        let index = self.require(id)?;
        self.tabs[index].is_pinned = pinned;
        Ok(())
    }

    /// Close one tab.
    ///
    /// If it was active, activation moves to its right neighbour, or to its
    /// left neighbour when it was last.
    pub fn close(&mut self, id: &TabId) -> Result<ClosedTabs, TabError> {
        let index = self.require(id)?;
        if self.tabs[index].is_pinned {
            return Err(TabError::CannotClose {
                id: id.to_string(),
            });
        }

        let removed = self.tabs.remove(index);
        if removed.is_active && !self.tabs.is_empty() {
            let next = index.min(self.tabs.len() - 1);
            self.set_active_index(Some(next));
        }
        debug_log!(
            "Closed tab '{}' ({} remaining, active: {:?})",
            removed.path,
            self.tabs.len(),
            self.active_id().map(TabId::as_str)
        );

        Ok(ClosedTabs {
            removed: vec![removed],
            active: self.active_id().cloned(),
        })
    }

    /// Close every non-pinned tab except `id`, which becomes active.
    pub fn close_others(&mut self, id: &TabId) -> Result<ClosedTabs, TabError> {
        self.require(id)?;
        let (kept, removed): (Vec<Tab>, Vec<Tab>) = std::mem::take(&mut self.tabs)
            .into_iter()
            .partition(|tab| tab.is_pinned || &tab.id == id);
        self.tabs = kept;

        let index = self.index_of_id(id);
        self.set_active_index(index);
        debug_log!("Closed {} tabs other than '{}'", removed.len(), id);

        Ok(ClosedTabs {
            removed,
            active: self.active_id().cloned(),
        })
    }

    /// Close every non-pinned tab.
    ///
    /// The active tab survives if pinned; otherwise the first pinned tab
    /// becomes active.
    pub fn close_all(&mut self) -> ClosedTabs {
        let (kept, removed): (Vec<Tab>, Vec<Tab>) = std::mem::take(&mut self.tabs)
            .into_iter()
            .partition(|tab| tab.is_pinned);
        self.tabs = kept;

        let index = self
            .tabs
            .iter()
            .position(|tab| tab.is_active)
            .or(if self.tabs.is_empty() { None } else { Some(0) });
        self.set_active_index(index);
        debug_log!("Closed all {} unpinned tabs", removed.len());

        ClosedTabs {
            removed,
            active: self.active_id().cloned(),
        }
    }

    /// Move the tab at `from` to position `to`. Activation is unchanged.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), TabError> {
        let len = self.tabs.len();
        for index in [from, to] {
            if index >= len {
                return Err(TabError::IndexOutOfRange { index, len });
            }
        }
        let tab = self.tabs.remove(from);
        self.tabs.insert(to, tab);
        Ok(())
    }

    /// All tabs in display order
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// The active tab
    pub fn active(&self) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.is_active)
    }

    /// Id of the active tab
    pub fn active_id(&self) -> Option<&TabId> {
        self.active().map(|tab| &tab.id)
    }

    /// Look up a tab by id
    pub fn get(&self, id: &TabId) -> Option<&Tab> {
        self.tabs.iter().find(|tab| &tab.id == id)
    }

    /// Look up a tab by path
    pub fn find_by_path(&self, path: &str) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.path == path)
    }

    /// Number of open tabs
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    /// Whether no tab is open
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    fn require(&self, id: &TabId) -> Result<usize, TabError> {
        self.index_of_id(id).ok_or_else(|| TabError::NotFound {
            id: id.to_string(),
        })
    }

    fn index_of_id(&self, id: &TabId) -> Option<usize> {
        self.tabs.iter().position(|tab| &tab.id == id)
    }

    fn index_of_path(&self, path: &str) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.path == path)
    }

    fn set_active_index(&mut self, index: Option<usize>) {
        for (i, tab) in self.tabs.iter_mut().enumerate() {
            tab.is_active = Some(i) == index;
        }
    }
}
