//! The session root.
//!
//! One `Session` owns every tab and folder, the top-level ordering, the
//! active-tab pointer, and the closed-tab recovery stack. It is constructed
//! once and passed by reference to every component that needs it; there is
//! no ambient global lookup. All mutation happens synchronously within a
//! single event-processing tick, so structural operations never interleave.
//!
//! Tab lifecycle operations live in `managers::tab_registry`; pin, folder,
//! and ordering operations live in `managers::organizer`. Both are trait
//! impls on this type.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::json;

use crate::services::settings_store::{
    MemoryStore, SettingsStore, KEY_FOLDERS, KEY_PINNED_TABS,
};
use crate::services::view_host::{NullViewHost, ViewEvent, ViewHost};
use crate::types::events::ModelEvent;
use crate::types::folder::Folder;
use crate::types::order::TopLevelItem;
use crate::types::session::{FolderRecord, PinnedTabRecord};
use crate::types::settings::ShellSettings;
use crate::types::tab::{ClosedTab, LoadState, Tab, TabHistory};

/// Capacity of the closed-tab recovery stack.
pub const MAX_CLOSED_TABS: usize = 10;

/// A load with no completion signal within this interval is stalled.
pub const LOAD_STALL_MS: i64 = 30_000;

/// Failed loads are retried this many times before surfacing an error.
pub const MAX_LOAD_RETRIES: u32 = 3;

pub struct Session {
    pub(crate) tabs: HashMap<String, Tab>,
    pub(crate) folders: HashMap<String, Folder>,
    pub(crate) top_level: Vec<TopLevelItem>,
    pub(crate) active_tab_id: Option<String>,
    pub(crate) closed_tabs: VecDeque<ClosedTab>,
    pub(crate) serial: u64,
    pub(crate) clock_ms: i64,
    pub(crate) events: Vec<ModelEvent>,
    pub(crate) view_host: Arc<Mutex<dyn ViewHost>>,
    pub(crate) store: Box<dyn SettingsStore>,
    pub settings: ShellSettings,
}

impl Session {
    pub fn new(view_host: Arc<Mutex<dyn ViewHost>>, store: Box<dyn SettingsStore>) -> Self {
        Self {
            tabs: HashMap::new(),
            folders: HashMap::new(),
            top_level: Vec::new(),
            active_tab_id: None,
            closed_tabs: VecDeque::new(),
            serial: 0,
            clock_ms: 0,
            events: Vec::new(),
            view_host,
            store,
            settings: ShellSettings::default(),
        }
    }

    /// A session wired to a no-op view host and an in-memory store.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(Mutex::new(NullViewHost::new())),
            Box::new(MemoryStore::new()),
        )
    }

    // --- accessors ---

    pub fn tab(&self, tab_id: &str) -> Option<&Tab> {
        self.tabs.get(tab_id)
    }

    pub fn folder(&self, folder_id: &str) -> Option<&Folder> {
        self.folders.get(folder_id)
    }

    pub fn tabs(&self) -> impl Iterator<Item = &Tab> {
        self.tabs.values()
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    pub fn top_level(&self) -> &[TopLevelItem] {
        &self.top_level
    }

    pub fn active_tab_id(&self) -> Option<&str> {
        self.active_tab_id.as_deref()
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.active_tab_id.as_ref().and_then(|id| self.tabs.get(id))
    }

    pub fn closed_tabs(&self) -> &VecDeque<ClosedTab> {
        &self.closed_tabs
    }

    /// Index of the conceptual separator: the position of the first
    /// unpinned tab in the top-level order, or the length when every item
    /// is in the pinned region.
    pub fn separator_index(&self) -> usize {
        self.top_level
            .iter()
            .position(|item| match item {
                TopLevelItem::Tab(id) => self.tabs.get(id).map(|t| !t.pinned).unwrap_or(false),
                TopLevelItem::Folder(_) => false,
            })
            .unwrap_or(self.top_level.len())
    }

    // --- change notifications ---

    pub fn emit(&mut self, event: ModelEvent) {
        self.events.push(event);
    }

    /// Drains the ordered queue of change notifications. The presentation
    /// layer calls this after each event-processing tick.
    pub fn drain_events(&mut self) -> Vec<ModelEvent> {
        std::mem::take(&mut self.events)
    }

    // --- clock and load watchdog ---

    /// Advances the logical clock and cancels stalled loads. A stalled load
    /// is stopped and reported without touching the tab's last-known-good
    /// url or history.
    pub fn tick(&mut self, now_ms: i64) {
        self.clock_ms = now_ms;

        let mut stalled: Vec<(String, Option<String>, String)> = Vec::new();
        for tab in self.tabs.values() {
            if let Some(load) = &tab.load {
                if now_ms - load.started_at >= LOAD_STALL_MS {
                    stalled.push((tab.id.clone(), tab.view.clone(), load.url.clone()));
                }
            }
        }

        for (tab_id, view, url) in stalled {
            log::warn!("load of {} stalled after {}ms, cancelling", url, LOAD_STALL_MS);
            if let Some(view) = view {
                self.with_host(|host| host.stop(&view));
            }
            if let Some(tab) = self.tabs.get_mut(&tab_id) {
                tab.load = None;
            }
            self.emit(ModelEvent::LoadStalled { tab_id, url });
        }
    }

    // --- view plumbing ---

    pub(crate) fn with_host<R>(&self, f: impl FnOnce(&mut dyn ViewHost) -> R) -> Option<R> {
        match self.view_host.lock() {
            Ok(mut guard) => Some(f(&mut *guard)),
            Err(e) => {
                log::error!("view host lock poisoned: {}", e);
                None
            }
        }
    }

    pub(crate) fn view_host_handle(&self) -> Arc<Mutex<dyn ViewHost>> {
        self.view_host.clone()
    }

    /// Requests a load on the tab's view, or records the target url for
    /// later if the view does not exist or is not ready yet.
    pub(crate) fn request_load(&mut self, tab_id: &str, url: &str) {
        let clock = self.clock_ms;
        let view = match self.tabs.get_mut(tab_id) {
            Some(tab) => match (&tab.view, tab.view_ready) {
                (Some(view), true) => {
                    let view = view.clone();
                    tab.load = Some(LoadState {
                        url: url.to_string(),
                        started_at: clock,
                        attempts: 0,
                    });
                    tab.pending_url = None;
                    view
                }
                _ => {
                    tab.pending_url = Some(url.to_string());
                    return;
                }
            },
            None => return,
        };
        let url = url.to_string();
        self.with_host(|host| host.load(&view, &url));
    }

    /// Routes an asynchronous view callback to the owning tab. Returns
    /// `false` when no tab owns the view (for example a split-view pane).
    pub fn handle_view_event(&mut self, view_id: &str, event: ViewEvent) -> bool {
        let tab_id = match self
            .tabs
            .values()
            .find(|t| t.view.as_deref() == Some(view_id))
        {
            Some(tab) => tab.id.clone(),
            None => return false,
        };

        match event {
            ViewEvent::Ready => {
                let pending = match self.tabs.get_mut(&tab_id) {
                    Some(tab) => {
                        tab.view_ready = true;
                        tab.pending_url.take()
                    }
                    None => None,
                };
                if let Some(url) = pending {
                    self.request_load(&tab_id, &url);
                }
            }
            ViewEvent::LoadStart => {
                let clock = self.clock_ms;
                if let Some(tab) = self.tabs.get_mut(&tab_id) {
                    match &mut tab.load {
                        Some(load) => load.started_at = clock,
                        // View-initiated load the core did not request.
                        None => {
                            tab.load = Some(LoadState {
                                url: tab.url.clone().unwrap_or_default(),
                                started_at: clock,
                                attempts: 0,
                            })
                        }
                    }
                }
                self.emit(ModelEvent::TabUpdated(tab_id));
            }
            ViewEvent::LoadFinish => {
                if let Some(tab) = self.tabs.get_mut(&tab_id) {
                    tab.load = None;
                }
                self.emit(ModelEvent::TabUpdated(tab_id));
            }
            ViewEvent::LoadFail(code) => self.handle_load_fail(&tab_id, code),
            ViewEvent::TitleUpdated(title) => {
                if let Some(tab) = self.tabs.get_mut(&tab_id) {
                    tab.title = title;
                }
                self.emit(ModelEvent::TabUpdated(tab_id));
            }
            ViewEvent::FaviconUpdated(favicon) => {
                if let Some(tab) = self.tabs.get_mut(&tab_id) {
                    tab.favicon = Some(favicon);
                }
                self.emit(ModelEvent::TabUpdated(tab_id));
            }
            ViewEvent::Navigated(url) => {
                if let Some(tab) = self.tabs.get_mut(&tab_id) {
                    if tab.history.current() != Some(url.as_str()) {
                        tab.history.push(&url);
                    }
                    tab.url = Some(url);
                }
                self.emit(ModelEvent::TabUpdated(tab_id));
            }
            ViewEvent::NavigatedInPage(url) => {
                if let Some(tab) = self.tabs.get_mut(&tab_id) {
                    tab.history.replace_current(&url);
                    tab.url = Some(url);
                }
                self.emit(ModelEvent::TabUpdated(tab_id));
            }
        }
        true
    }

    fn handle_load_fail(&mut self, tab_id: &str, code: i64) {
        let retry = match self.tabs.get_mut(tab_id) {
            Some(tab) => match &mut tab.load {
                Some(load) if load.attempts < MAX_LOAD_RETRIES => {
                    load.attempts += 1;
                    let url = load.url.clone();
                    log::debug!(
                        "load of {} failed ({}), retry {}/{}",
                        url,
                        code,
                        load.attempts,
                        MAX_LOAD_RETRIES
                    );
                    tab.view.clone().map(|view| (view, url))
                }
                _ => {
                    tab.load = None;
                    None
                }
            },
            None => return,
        };

        match retry {
            Some((view, url)) => {
                self.with_host(|host| host.load(&view, &url));
            }
            None => {
                log::warn!("load failed for tab {} with code {}", tab_id, code);
                self.emit(ModelEvent::LoadFailed {
                    tab_id: tab_id.to_string(),
                    code,
                });
            }
        }
    }

    // --- allocation helpers ---

    pub(crate) fn next_serial(&mut self) -> u64 {
        self.serial += 1;
        self.serial
    }

    pub(crate) fn wall_clock_ms() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    }

    pub(crate) fn find_top_level(&self, id: &str) -> Option<usize> {
        self.top_level.iter().position(|item| item.id() == id)
    }

    // --- persistence bridge ---

    /// Serializes the pinned layout (pinned tabs and folders) to the
    /// settings store. Called on every structural mutation; a store failure
    /// is logged and never corrupts in-memory state.
    pub fn persist_layout(&mut self) {
        let mut pinned: Vec<PinnedTabRecord> = Vec::new();
        let mut folders: Vec<FolderRecord> = Vec::new();

        for (position, item) in self.top_level.iter().enumerate() {
            match item {
                TopLevelItem::Tab(id) => {
                    if let Some(tab) = self.tabs.get(id) {
                        if tab.pinned {
                            pinned.push(PinnedTabRecord {
                                id: tab.id.clone(),
                                url: tab.url.clone(),
                                title: tab.title.clone(),
                                favicon: tab.favicon.clone(),
                                order: pinned.len(),
                            });
                        }
                    }
                }
                TopLevelItem::Folder(id) => {
                    if let Some(folder) = self.folders.get(id) {
                        folders.push(FolderRecord {
                            id: folder.id.clone(),
                            name: folder.name.clone(),
                            tab_ids: folder.children.clone(),
                            open: folder.open,
                            order: position,
                        });
                        for child_id in &folder.children {
                            if let Some(tab) = self.tabs.get(child_id) {
                                pinned.push(PinnedTabRecord {
                                    id: tab.id.clone(),
                                    url: tab.url.clone(),
                                    title: tab.title.clone(),
                                    favicon: tab.favicon.clone(),
                                    order: pinned.len(),
                                });
                            }
                        }
                    }
                }
            }
        }

        if let Err(e) = self.store.set(KEY_PINNED_TABS, json!(pinned)) {
            log::warn!("failed to persist pinned tabs: {}", e);
        }
        if let Err(e) = self.store.set(KEY_FOLDERS, json!(folders)) {
            log::warn!("failed to persist folders: {}", e);
        }
    }

    /// Rebuilds the pinned layout from persisted records. Unpinned tabs are
    /// session-only and never restored. Views are created lazily on first
    /// activation, as for any tab.
    pub fn restore_layout(&mut self, pinned: Vec<PinnedTabRecord>, mut folders: Vec<FolderRecord>) {
        let mut membership: HashMap<String, String> = HashMap::new();
        for folder in &folders {
            for tab_id in &folder.tab_ids {
                membership.insert(tab_id.clone(), folder.id.clone());
            }
        }

        let mut ordered = pinned;
        ordered.sort_by_key(|r| r.order);

        for record in ordered {
            let serial = self.next_serial();
            let folder_id = membership.get(&record.id).cloned();
            let history = match record.url.as_deref() {
                Some(url) => TabHistory::with_entry(url),
                None => TabHistory::default(),
            };
            let tab = Tab {
                id: record.id.clone(),
                url: record.url,
                title: record.title,
                favicon: record.favicon,
                pinned: true,
                folder_id: folder_id.clone(),
                history,
                view: None,
                view_ready: false,
                pending_url: None,
                load: None,
                created_at: Self::wall_clock_ms(),
                serial,
            };
            self.tabs.insert(record.id.clone(), tab);
            if folder_id.is_none() {
                self.top_level.push(TopLevelItem::Tab(record.id));
            }
        }

        folders.sort_by_key(|r| r.order);
        for record in folders {
            let children: Vec<String> = record
                .tab_ids
                .into_iter()
                .filter(|id| self.tabs.contains_key(id))
                .collect();
            let open = record.open && !children.is_empty();
            let folder = Folder {
                id: record.id.clone(),
                name: record.name,
                children,
                open,
            };
            let position = record.order.min(self.top_level.len());
            self.top_level
                .insert(position, TopLevelItem::Folder(record.id.clone()));
            self.folders.insert(record.id, folder);
        }

        self.emit(ModelEvent::LayoutChanged);
    }

    // --- consistency checking ---

    /// Verifies the cross-cutting invariants: the pin partition, single
    /// folder membership, history index bounds, the recovery-stack cap,
    /// and referential integrity of the top-level order. Violations are
    /// programming errors; this exists for tests and debug assertions.
    pub fn verify_invariants(&self) -> Result<(), String> {
        let mut seen_unpinned = false;
        for item in &self.top_level {
            match item {
                TopLevelItem::Tab(id) => {
                    let tab = self
                        .tabs
                        .get(id)
                        .ok_or_else(|| format!("top-level tab {} does not exist", id))?;
                    if tab.folder_id.is_some() {
                        return Err(format!("tab {} is top-level but claims a folder", id));
                    }
                    if tab.pinned && seen_unpinned {
                        return Err(format!("pinned tab {} after the separator", id));
                    }
                    if !tab.pinned {
                        seen_unpinned = true;
                    }
                }
                TopLevelItem::Folder(id) => {
                    if !self.folders.contains_key(id) {
                        return Err(format!("top-level folder {} does not exist", id));
                    }
                    if seen_unpinned {
                        return Err(format!("folder {} after the separator", id));
                    }
                }
            }
        }

        let mut owned: HashMap<&str, &str> = HashMap::new();
        for folder in self.folders.values() {
            for child_id in &folder.children {
                let tab = self
                    .tabs
                    .get(child_id)
                    .ok_or_else(|| format!("folder {} child {} does not exist", folder.id, child_id))?;
                if !tab.pinned {
                    return Err(format!("folder {} contains unpinned tab {}", folder.id, child_id));
                }
                if tab.folder_id.as_deref() != Some(folder.id.as_str()) {
                    return Err(format!("tab {} folder_id disagrees with folder {}", child_id, folder.id));
                }
                if let Some(other) = owned.insert(child_id.as_str(), folder.id.as_str()) {
                    return Err(format!("tab {} is in folders {} and {}", child_id, other, folder.id));
                }
                if self.find_top_level(child_id).is_some() {
                    return Err(format!("folder child {} also appears top-level", child_id));
                }
            }
        }

        for tab in self.tabs.values() {
            if !tab.history.entries.is_empty() && tab.history.index >= tab.history.entries.len() {
                return Err(format!("tab {} history index out of bounds", tab.id));
            }
            if tab.folder_id.is_none() && self.find_top_level(&tab.id).is_none() {
                return Err(format!("tab {} is neither top-level nor in a folder", tab.id));
            }
        }

        if let Some(active) = &self.active_tab_id {
            if !self.tabs.contains_key(active) {
                return Err(format!("active tab {} does not exist", active));
            }
        }

        if self.closed_tabs.len() > MAX_CLOSED_TABS {
            return Err("closed-tab stack exceeds its capacity".to_string());
        }

        Ok(())
    }
}
