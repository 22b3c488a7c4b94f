use serde::{Deserialize, Serialize};

/// A single browsing context: url, title, favicon, pin state, folder
/// membership, and its own navigation history.
///
/// The view handle is an external asynchronous resource. It is created
/// lazily (first activation) and may not be ready when a load is requested;
/// `pending_url` holds the target until the view signals readiness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tab {
    pub id: String,
    pub url: Option<String>,
    pub title: String,
    pub favicon: Option<String>,
    pub pinned: bool,
    pub folder_id: Option<String>,
    pub history: TabHistory,
    #[serde(skip)]
    pub view: Option<String>,
    #[serde(skip)]
    pub view_ready: bool,
    #[serde(skip)]
    pub pending_url: Option<String>,
    #[serde(skip)]
    pub load: Option<LoadState>,
    pub created_at: i64,
    #[serde(skip)]
    pub serial: u64,
}

impl Tab {
    /// Whether this tab has navigated somewhere restorable. Blank tabs are
    /// not eligible for the closed-tab recovery stack.
    pub fn has_real_url(&self) -> bool {
        match self.url.as_deref() {
            Some(u) => !u.is_empty() && u != "about:blank",
            None => false,
        }
    }
}

/// Per-tab navigation history.
///
/// Invariant: `entries.is_empty() || index < entries.len()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabHistory {
    pub entries: Vec<String>,
    pub index: usize,
}

impl TabHistory {
    pub fn with_entry(url: &str) -> Self {
        Self {
            entries: vec![url.to_string()],
            index: 0,
        }
    }

    /// The url at the current history position, if any.
    pub fn current(&self) -> Option<&str> {
        self.entries.get(self.index).map(|s| s.as_str())
    }

    /// Records a new navigation. Any forward entries past the current index
    /// are discarded before the new entry is appended.
    pub fn push(&mut self, url: &str) {
        if !self.entries.is_empty() && self.index < self.entries.len() - 1 {
            self.entries.truncate(self.index + 1);
        }
        self.entries.push(url.to_string());
        self.index = self.entries.len() - 1;
    }

    /// Rewrites the current entry in place (same-document navigation).
    pub fn replace_current(&mut self, url: &str) {
        if let Some(entry) = self.entries.get_mut(self.index) {
            *entry = url.to_string();
        } else {
            self.push(url);
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0 && !self.entries.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.entries.is_empty() && self.index + 1 < self.entries.len()
    }

    /// Steps back one entry and returns the new current url, or `None` at
    /// the boundary (benign, not an error).
    pub fn go_back(&mut self) -> Option<&str> {
        if !self.can_go_back() {
            return None;
        }
        self.index -= 1;
        self.current()
    }

    /// Steps forward one entry and returns the new current url, or `None`
    /// at the boundary.
    pub fn go_forward(&mut self) -> Option<&str> {
        if !self.can_go_forward() {
            return None;
        }
        self.index += 1;
        self.current()
    }
}

/// Transient per-tab load tracking for the stall watchdog and retry policy.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadState {
    pub url: String,
    pub started_at: i64,
    pub attempts: u32,
}

/// A recovery record for a recently closed tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosedTab {
    pub id: String,
    pub title: String,
    pub url: String,
    pub closed_at: i64,
}

/// Built-in pages served by the shell itself rather than the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalPage {
    Settings,
    Notes,
}

impl InternalPage {
    pub fn url(&self) -> &'static str {
        match self {
            InternalPage::Settings => "tabdeck://settings",
            InternalPage::Notes => "tabdeck://notes",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            InternalPage::Settings => "Settings",
            InternalPage::Notes => "Notes",
        }
    }
}
