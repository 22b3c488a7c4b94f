//! App core for Tabdeck.
//!
//! `Shell` wires the session root, the drag engine, and the pane router
//! around one shared view host and one settings store, and manages the
//! startup/shutdown lifecycle.

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use crate::managers::drag_engine::DragEngine;
use crate::managers::pane_router::PaneRouter;
use crate::services::settings_store::{SettingsStore, KEY_FOLDERS, KEY_PINNED_TABS, KEY_SETTINGS};
use crate::services::view_host::{ViewEvent, ViewHost};
use crate::session::Session;
use crate::types::events::ModelEvent;
use crate::types::pane::PaneSide;
use crate::types::session::{FolderRecord, PinnedTabRecord};
use crate::types::settings::ShellSettings;

pub struct Shell {
    pub session: Session,
    pub drag: DragEngine,
    pub panes: PaneRouter,
}

impl Shell {
    pub fn new(view_host: Arc<Mutex<dyn ViewHost>>, store: Box<dyn SettingsStore>) -> Self {
        let panes = PaneRouter::new(view_host.clone());
        Self {
            session: Session::new(view_host, store),
            drag: DragEngine::new(),
            panes,
        }
    }

    /// A shell wired to a no-op view host and an in-memory store.
    pub fn in_memory() -> Self {
        let session = Session::in_memory();
        let panes = PaneRouter::new(session.view_host_handle());
        Self {
            session,
            drag: DragEngine::new(),
            panes,
        }
    }

    /// Startup sequence: load settings and rebuild the pinned layout from
    /// the store.
    pub fn startup(&mut self) {
        let raw = self.session.store.get(KEY_SETTINGS, Value::Null);
        if !raw.is_null() {
            match serde_json::from_value::<ShellSettings>(raw) {
                Ok(settings) => self.session.settings = settings,
                Err(e) => log::warn!("stored settings are malformed, using defaults: {}", e),
            }
        }

        let pinned = self.session.store.get(KEY_PINNED_TABS, json!([]));
        let folders = self.session.store.get(KEY_FOLDERS, json!([]));
        let pinned: Vec<PinnedTabRecord> = serde_json::from_value(pinned).unwrap_or_default();
        let folders: Vec<FolderRecord> = serde_json::from_value(folders).unwrap_or_default();
        if !pinned.is_empty() || !folders.is_empty() {
            log::info!(
                "restoring layout: {} pinned tabs, {} folders",
                pinned.len(),
                folders.len()
            );
            self.session.restore_layout(pinned, folders);
        }
    }

    /// Shutdown sequence: flush settings and the pinned layout.
    pub fn shutdown(&mut self) {
        let settings = json!(self.session.settings);
        if let Err(e) = self.session.store.set(KEY_SETTINGS, settings) {
            log::warn!("failed to persist settings: {}", e);
        }
        self.session.persist_layout();
        self.panes.disable();
    }

    pub fn toggle_split_view(&mut self) -> bool {
        let enabled = self.panes.toggle(&self.session);
        self.session.emit(ModelEvent::SplitChanged);
        enabled
    }

    pub fn set_active_pane(&mut self, side: PaneSide) {
        self.panes.set_active_pane(side);
        self.session.emit(ModelEvent::SplitChanged);
    }

    /// Routes a view callback to whichever component owns the view: a tab
    /// in the session, or one of the split-view panes.
    pub fn handle_view_event(&mut self, view_id: &str, event: ViewEvent) {
        if self.session.handle_view_event(view_id, event.clone()) {
            return;
        }
        if !self.panes.handle_view_event(view_id, event) {
            log::debug!("view event for unknown view {}", view_id);
        }
    }

    /// Advances the logical clock; stalled loads are cancelled here.
    pub fn tick(&mut self, now_ms: i64) {
        self.session.tick(now_ms);
    }
}
