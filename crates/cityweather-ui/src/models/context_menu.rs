//! Secondary-activation menu for a city row.

use crate::navigation::{Navigation, OpenTarget};
use crate::route::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    OpenInNewTab,
    OpenInNewWindow,
    CopyLinkAddress,
}

impl MenuItem {
    /// Menu order
    pub const ALL: [MenuItem; 3] = [
        MenuItem::OpenInNewTab,
        MenuItem::OpenInNewWindow,
        MenuItem::CopyLinkAddress,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::OpenInNewTab => "Open Link in New Tab",
            MenuItem::OpenInNewWindow => "Open Link in New Window",
            MenuItem::CopyLinkAddress => "Copy Link Address",
        }
    }

    /// Navigation for this item applied to `city`.
    pub fn navigation(self, city: &str) -> Navigation {
        let route = Route::weather(city);
        match self {
            MenuItem::OpenInNewTab => Navigation::Open {
                route,
                target: OpenTarget::NewTab,
            },
            MenuItem::OpenInNewWindow => Navigation::Open {
                route,
                target: OpenTarget::NewWindow,
            },
            MenuItem::CopyLinkAddress => Navigation::CopyLink(route.path()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenMenu {
    city: String,
    anchor_row: usize,
    highlighted: Option<usize>,
}

/// Open/closed state, anchor and highlight. Owned by the city browser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextMenu {
    open: Option<OpenMenu>,
}

impl ContextMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open for `city`, anchored at view row `anchor_row`. Replaces any open menu.
    pub fn open(&mut self, city: &str, anchor_row: usize) {
        self.open = Some(OpenMenu {
            city: city.to_string(),
            anchor_row,
            highlighted: None,
        });
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn city(&self) -> Option<&str> {
        self.open.as_ref().map(|m| m.city.as_str())
    }

    pub fn anchor_row(&self) -> Option<usize> {
        self.open.as_ref().map(|m| m.anchor_row)
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.open.as_ref().and_then(|m| m.highlighted)
    }

    /// Move the highlight; out-of-range indices are ignored.
    pub fn highlight(&mut self, index: usize) {
        if let Some(menu) = self.open.as_mut() {
            if index < MenuItem::ALL.len() {
                menu.highlighted = Some(index);
            }
        }
    }

    /// Activate item `index` (0-based). The menu closes either way.
    pub fn choose(&mut self, index: usize) -> Option<Navigation> {
        let menu = self.open.take()?;
        let item = MenuItem::ALL.get(index).copied()?;
        tracing::debug!(city = %menu.city, item = item.label(), "Context menu choice");
        Some(item.navigation(&menu.city))
    }

    /// Dismiss without a choice.
    pub fn close(&mut self) {
        self.open = None;
    }
}
