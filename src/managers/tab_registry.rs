//! Tab Registry: tab lifecycle, per-tab navigation history, active-tab
//! tracking, and the bounded closed-tab recovery stack.

use uuid::Uuid;

use crate::services::navigation;
use crate::services::view_host::ViewOwner;
use crate::session::{Session, MAX_CLOSED_TABS};
use crate::types::events::ModelEvent;
use crate::types::order::TopLevelItem;
use crate::types::tab::{ClosedTab, InternalPage, Tab, TabHistory};

/// Trait defining the tab registry interface, implemented on `Session`.
///
/// Operations referencing an unknown tab id are no-ops, never errors.
/// `go_back`/`go_forward` return whether the history position moved;
/// `recover_closed_tab` returns `None` when there is nothing to recover.
pub trait TabRegistry {
    fn create_tab(&mut self, url: Option<&str>) -> String;
    fn create_internal_tab(&mut self, page: InternalPage) -> String;
    fn duplicate_tab(&mut self, tab_id: &str) -> Option<String>;
    fn close_tab(&mut self, tab_id: &str);
    fn switch_active(&mut self, tab_id: &str);
    fn navigate(&mut self, tab_id: &str, input: &str);
    fn go_back(&mut self, tab_id: &str) -> bool;
    fn go_forward(&mut self, tab_id: &str) -> bool;
    fn recover_closed_tab(&mut self) -> Option<String>;
    fn set_zoom(&mut self, tab_id: &str, factor: f64);
}

impl TabRegistry for Session {
    /// Creates a fresh unpinned tab at the tail of the unpinned region and
    /// makes it active. The view handle is requested lazily by the
    /// activation step.
    fn create_tab(&mut self, url: Option<&str>) -> String {
        let id = self.insert_tab(url, url.map(|u| u.to_string()), "New Tab".to_string(), None);
        self.emit(ModelEvent::TabCreated(id.clone()));
        self.switch_active(&id);
        id
    }

    /// Creates a tab for a shell-served page (settings, notes).
    fn create_internal_tab(&mut self, page: InternalPage) -> String {
        let id = self.insert_tab(
            Some(page.url()),
            Some(page.url().to_string()),
            page.title().to_string(),
            None,
        );
        self.emit(ModelEvent::TabCreated(id.clone()));
        self.switch_active(&id);
        id
    }

    /// Copies url, title, favicon, and history into a new unpinned tab
    /// inserted right after the source when the source is top-level and
    /// unpinned, otherwise at the unpinned tail. Pin state and folder
    /// membership are never copied.
    fn duplicate_tab(&mut self, tab_id: &str) -> Option<String> {
        let (url, title, favicon, history, source_unpinned) = {
            let source = self.tabs.get(tab_id)?;
            (
                source.url.clone(),
                source.title.clone(),
                source.favicon.clone(),
                source.history.clone(),
                !source.pinned && source.folder_id.is_none(),
            )
        };

        let id = self.insert_tab(None, url, title, Some(history));
        if let Some(tab) = self.tabs.get_mut(&id) {
            tab.favicon = favicon;
        }

        if source_unpinned {
            // insert_tab appended at the tail; move next to the source
            if let (Some(source_idx), Some(new_idx)) =
                (self.find_top_level(tab_id), self.find_top_level(&id))
            {
                let item = self.top_level.remove(new_idx);
                self.top_level.insert(source_idx + 1, item);
            }
        }

        self.emit(ModelEvent::TabCreated(id.clone()));
        Some(id)
    }

    /// Closes a tab: archives it to the recovery stack when it navigated
    /// somewhere real, releases its view, and detaches it from the order
    /// and any folder. If the closed tab was active, the most recently
    /// created remaining tab takes over; with no tabs left the session is
    /// empty and `active_tab_id` becomes `None`.
    fn close_tab(&mut self, tab_id: &str) {
        let tab = match self.tabs.remove(tab_id) {
            Some(tab) => tab,
            None => return,
        };

        if tab.has_real_url() {
            let record = ClosedTab {
                id: tab.id.clone(),
                title: tab.title.clone(),
                url: tab.url.clone().unwrap_or_default(),
                closed_at: Session::wall_clock_ms(),
            };
            self.closed_tabs.push_back(record);
            if self.closed_tabs.len() > MAX_CLOSED_TABS {
                self.closed_tabs.pop_front();
            }
        }

        if let Some(view) = &tab.view {
            let view = view.clone();
            self.with_host(|host| host.destroy(&view));
        }

        if let Some(idx) = self.find_top_level(tab_id) {
            self.top_level.remove(idx);
        }
        let mut structural = tab.pinned;
        if let Some(folder_id) = &tab.folder_id {
            if let Some(folder) = self.folders.get_mut(folder_id) {
                folder.children.retain(|id| id != tab_id);
                if folder.children.is_empty() {
                    folder.open = false;
                }
                structural = true;
            }
        }

        log::debug!("closed tab {} ({})", tab_id, tab.title);
        self.emit(ModelEvent::TabClosed(tab_id.to_string()));

        if self.active_tab_id.as_deref() == Some(tab_id) {
            let next = self
                .tabs
                .values()
                .max_by_key(|t| t.serial)
                .map(|t| t.id.clone());
            match next {
                Some(next_id) => self.switch_active(&next_id),
                None => {
                    self.active_tab_id = None;
                    self.emit(ModelEvent::ActiveChanged(None));
                }
            }
        }

        if structural {
            self.persist_layout();
            self.emit(ModelEvent::LayoutChanged);
        }
    }

    /// Makes a tab active: hides the previously active view, lazily creates
    /// the target's view, and applies the tab's url to it if that has not
    /// happened yet.
    fn switch_active(&mut self, tab_id: &str) {
        if !self.tabs.contains_key(tab_id) {
            return;
        }

        if self.active_tab_id.as_deref() != Some(tab_id) {
            let previous_view = self
                .active_tab()
                .and_then(|t| t.view.clone());
            if let Some(view) = previous_view {
                self.with_host(|host| host.hide(&view));
            }
        }

        let created = {
            let tab = match self.tabs.get(tab_id) {
                Some(tab) => tab,
                None => return,
            };
            tab.view.is_none()
        };
        if created {
            let host = self.view_host_handle();
            let view = match host.lock() {
                Ok(mut guard) => guard.create(ViewOwner::Tab(tab_id.to_string())),
                Err(e) => {
                    log::error!("view host lock poisoned: {}", e);
                    return;
                }
            };
            if let Some(tab) = self.tabs.get_mut(tab_id) {
                tab.view = Some(view);
                tab.view_ready = false;
                if tab.pending_url.is_none() {
                    tab.pending_url = tab.url.clone();
                }
            }
        } else {
            // View exists; apply the url now if it never reached the view.
            let pending = self
                .tabs
                .get_mut(tab_id)
                .and_then(|tab| {
                    if tab.view_ready {
                        tab.pending_url.take()
                    } else {
                        None
                    }
                });
            if let Some(url) = pending {
                self.request_load(tab_id, &url);
            }
        }

        if let Some(view) = self.tabs.get(tab_id).and_then(|t| t.view.clone()) {
            self.with_host(|host| host.show(&view));
        }

        self.active_tab_id = Some(tab_id.to_string());
        self.emit(ModelEvent::ActiveChanged(Some(tab_id.to_string())));
    }

    /// Sanitizes url-bar input and navigates the tab to the result,
    /// discarding any forward history first.
    fn navigate(&mut self, tab_id: &str, input: &str) {
        if !self.tabs.contains_key(tab_id) {
            return;
        }
        let url = navigation::sanitize_input(input, &self.settings);
        if let Some(tab) = self.tabs.get_mut(tab_id) {
            tab.history.push(&url);
            tab.url = Some(url.clone());
        }
        self.request_load(tab_id, &url);
        self.emit(ModelEvent::TabUpdated(tab_id.to_string()));
    }

    /// Steps the tab back one history entry and applies the resulting url
    /// to its view. Returns `false` at the boundary (benign no-op).
    fn go_back(&mut self, tab_id: &str) -> bool {
        let moved = match self.tabs.get_mut(tab_id) {
            Some(tab) => tab.history.go_back().map(|u| u.to_string()),
            None => None,
        };
        match moved {
            Some(url) => {
                if let Some(tab) = self.tabs.get_mut(tab_id) {
                    tab.url = Some(url.clone());
                }
                self.request_load(tab_id, &url);
                self.emit(ModelEvent::TabUpdated(tab_id.to_string()));
                true
            }
            None => false,
        }
    }

    fn go_forward(&mut self, tab_id: &str) -> bool {
        let moved = match self.tabs.get_mut(tab_id) {
            Some(tab) => tab.history.go_forward().map(|u| u.to_string()),
            None => None,
        };
        match moved {
            Some(url) => {
                if let Some(tab) = self.tabs.get_mut(tab_id) {
                    tab.url = Some(url.clone());
                }
                self.request_load(tab_id, &url);
                self.emit(ModelEvent::TabUpdated(tab_id.to_string()));
                true
            }
            None => false,
        }
    }

    /// Pops the most recent recovery record and reopens it as a new tab.
    /// Returns `None` when the stack is empty.
    fn recover_closed_tab(&mut self) -> Option<String> {
        let record = match self.closed_tabs.pop_back() {
            Some(record) => record,
            None => {
                log::info!("nothing to recover");
                return None;
            }
        };
        let id = self.insert_tab(
            Some(&record.url),
            Some(record.url.clone()),
            record.title.clone(),
            None,
        );
        self.emit(ModelEvent::TabCreated(id.clone()));
        self.switch_active(&id);
        Some(id)
    }

    fn set_zoom(&mut self, tab_id: &str, factor: f64) {
        if let Some(view) = self.tabs.get(tab_id).and_then(|t| t.view.clone()) {
            self.with_host(|host| host.set_zoom(&view, factor));
        }
    }
}

impl Session {
    /// Allocates a fresh unpinned tab at the unpinned tail. `history_url`
    /// seeds the history when the caller has a committed destination.
    fn insert_tab(
        &mut self,
        history_url: Option<&str>,
        url: Option<String>,
        title: String,
        history: Option<TabHistory>,
    ) -> String {
        let id = Uuid::new_v4().to_string();
        let serial = self.next_serial();
        let history = history.unwrap_or_else(|| match history_url {
            Some(u) => TabHistory::with_entry(u),
            None => TabHistory::default(),
        });
        let tab = Tab {
            id: id.clone(),
            url,
            title,
            favicon: None,
            pinned: false,
            folder_id: None,
            history,
            view: None,
            view_ready: false,
            pending_url: None,
            load: None,
            created_at: Session::wall_clock_ms(),
            serial,
        };
        self.tabs.insert(id.clone(), tab);
        self.top_level.push(TopLevelItem::Tab(id.clone()));
        id
    }
}
