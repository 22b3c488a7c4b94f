//! Pin & Folder Organizer: the pinned/unpinned partition, folder
//! membership, and top-level reordering.
//!
//! Every structural mutation rewrites the persisted layout through the
//! settings store before returning, so the store always reflects the last
//! committed state.

use uuid::Uuid;

use crate::session::Session;
use crate::types::events::ModelEvent;
use crate::types::folder::Folder;
use crate::types::order::{Side, TopLevelItem};

/// Trait defining the organizer interface, implemented on `Session`.
///
/// Operations referencing unknown ids are no-ops. Invariants maintained
/// here: all folders and pinned tabs precede the separator; every folder
/// child is pinned and belongs to exactly one folder; folders never enter
/// the unpinned region or another folder.
pub trait Organizer {
    fn toggle_pin(&mut self, tab_id: &str);
    fn create_folder(&mut self, name: Option<&str>) -> String;
    fn rename_folder(&mut self, folder_id: &str, name: &str);
    fn delete_folder(&mut self, folder_id: &str);
    fn add_tab_to_folder(&mut self, tab_id: &str, folder_id: &str);
    fn remove_tab_from_folder(&mut self, tab_id: &str, folder_id: &str);
    fn toggle_folder(&mut self, folder_id: &str);
    fn reorder(&mut self, item_id: &str, target_id: &str, side: Side);
}

impl Organizer for Session {
    /// Flips a tab's pin flag and moves it across the separator to the
    /// tail of its new region, preserving the relative order of everything
    /// else. A tab inside a folder is detached first.
    fn toggle_pin(&mut self, tab_id: &str) {
        let pinned = match self.tabs.get(tab_id) {
            Some(tab) => tab.pinned,
            None => return,
        };
        self.detach_from_folder(tab_id);
        self.move_across_separator(tab_id, !pinned, false);
        log::debug!("tab {} pinned={}", tab_id, !pinned);
        self.persist_layout();
        self.emit(ModelEvent::LayoutChanged);
    }

    /// Creates a folder at the end of the pinned region, open by default.
    fn create_folder(&mut self, name: Option<&str>) -> String {
        let id = Uuid::new_v4().to_string();
        let name = match name.map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => Folder::fallback_name(&id),
        };
        let folder = Folder {
            id: id.clone(),
            name,
            children: Vec::new(),
            open: true,
        };
        let position = self.separator_index();
        self.top_level
            .insert(position, TopLevelItem::Folder(id.clone()));
        self.folders.insert(id.clone(), folder);
        self.persist_layout();
        self.emit(ModelEvent::FolderChanged(id.clone()));
        self.emit(ModelEvent::LayoutChanged);
        id
    }

    /// Renames a folder; a name that trims to nothing falls back to
    /// `"Folder {id}"`.
    fn rename_folder(&mut self, folder_id: &str, name: &str) {
        let renamed = match self.folders.get_mut(folder_id) {
            Some(folder) => {
                let trimmed = name.trim();
                folder.name = if trimmed.is_empty() {
                    Folder::fallback_name(folder_id)
                } else {
                    trimmed.to_string()
                };
                true
            }
            None => false,
        };
        if renamed {
            self.persist_layout();
            self.emit(ModelEvent::FolderChanged(folder_id.to_string()));
        }
    }

    /// Deletes a folder. Children stay pinned and are reinserted into the
    /// top-level pinned order at the folder's former position, in their
    /// folder order.
    fn delete_folder(&mut self, folder_id: &str) {
        let folder = match self.folders.remove(folder_id) {
            Some(folder) => folder,
            None => return,
        };
        let mut position = match self.find_top_level(folder_id) {
            Some(idx) => {
                self.top_level.remove(idx);
                idx
            }
            None => self.separator_index(),
        };
        for child_id in folder.children {
            if let Some(tab) = self.tabs.get_mut(&child_id) {
                tab.folder_id = None;
                self.top_level
                    .insert(position, TopLevelItem::Tab(child_id));
                position += 1;
            }
        }
        self.persist_layout();
        self.emit(ModelEvent::LayoutChanged);
    }

    /// Moves a tab into a folder, auto-pinning it if needed and detaching
    /// it from any other folder first. A closed folder receiving its first
    /// child opens for display.
    fn add_tab_to_folder(&mut self, tab_id: &str, folder_id: &str) {
        if !self.tabs.contains_key(tab_id) || !self.folders.contains_key(folder_id) {
            return;
        }
        if self.tabs.get(tab_id).and_then(|t| t.folder_id.as_deref()) == Some(folder_id) {
            return;
        }

        self.detach_from_folder(tab_id);
        if let Some(idx) = self.find_top_level(tab_id) {
            self.top_level.remove(idx);
        }
        if let Some(tab) = self.tabs.get_mut(tab_id) {
            tab.pinned = true;
            tab.folder_id = Some(folder_id.to_string());
        }
        if let Some(folder) = self.folders.get_mut(folder_id) {
            let first_child = folder.children.is_empty();
            folder.children.push(tab_id.to_string());
            if first_child && !folder.open {
                folder.open = true;
            }
        }
        self.persist_layout();
        self.emit(ModelEvent::FolderChanged(folder_id.to_string()));
        self.emit(ModelEvent::LayoutChanged);
    }

    /// Removes a tab from a folder, reinserting it into the pinned
    /// top-level order immediately after the folder. A folder left empty
    /// while open is forced closed.
    fn remove_tab_from_folder(&mut self, tab_id: &str, folder_id: &str) {
        let removed = match self.folders.get_mut(folder_id) {
            Some(folder) => {
                let before = folder.children.len();
                folder.children.retain(|id| id != tab_id);
                if folder.children.is_empty() && folder.open {
                    folder.open = false;
                }
                folder.children.len() != before
            }
            None => false,
        };
        if !removed {
            return;
        }

        if let Some(tab) = self.tabs.get_mut(tab_id) {
            tab.folder_id = None;
        }
        let position = self
            .find_top_level(folder_id)
            .map(|idx| idx + 1)
            .unwrap_or_else(|| self.separator_index());
        self.top_level
            .insert(position, TopLevelItem::Tab(tab_id.to_string()));
        self.persist_layout();
        self.emit(ModelEvent::FolderChanged(folder_id.to_string()));
        self.emit(ModelEvent::LayoutChanged);
    }

    /// Toggles a folder's disclosure state. An empty folder can never end
    /// up visibly expanded, so toggling it open is a no-op.
    fn toggle_folder(&mut self, folder_id: &str) {
        if let Some(folder) = self.folders.get_mut(folder_id) {
            folder.open = !folder.open && !folder.children.is_empty();
            self.emit(ModelEvent::FolderChanged(folder_id.to_string()));
        }
    }

    /// Moves a top-level item immediately before or after `target_id`.
    /// A tab crossing the separator has its pin flag flipped as part of
    /// the same atomic operation; folders never leave the pinned region.
    fn reorder(&mut self, item_id: &str, target_id: &str, side: Side) {
        if item_id == target_id {
            return;
        }
        let (subject_idx, target_idx) =
            match (self.find_top_level(item_id), self.find_top_level(target_id)) {
                (Some(s), Some(t)) => (s, t),
                _ => return,
            };

        let subject = self.top_level[subject_idx].clone();
        let target_region_pinned = self.item_in_pinned_region(target_idx);

        if subject.is_folder() && !target_region_pinned {
            return;
        }

        self.top_level.remove(subject_idx);
        let target_idx = match self.find_top_level(target_id) {
            Some(idx) => idx,
            None => return,
        };
        let insert_at = match side {
            Side::Before => target_idx,
            Side::After => target_idx + 1,
        };
        self.top_level.insert(insert_at, subject.clone());

        if let TopLevelItem::Tab(id) = &subject {
            if let Some(tab) = self.tabs.get_mut(id) {
                if tab.pinned != target_region_pinned {
                    tab.pinned = target_region_pinned;
                    log::debug!("tab {} crossed separator, pinned={}", id, target_region_pinned);
                }
            }
        }

        self.persist_layout();
        self.emit(ModelEvent::LayoutChanged);
    }
}

impl Session {
    /// Removes a tab from whatever folder holds it, collapsing the folder
    /// if it ends up open and empty. Does not touch the top-level order.
    pub(crate) fn detach_from_folder(&mut self, tab_id: &str) {
        let folder_id = match self.tabs.get_mut(tab_id) {
            Some(tab) => tab.folder_id.take(),
            None => None,
        };
        if let Some(folder_id) = folder_id {
            if let Some(folder) = self.folders.get_mut(&folder_id) {
                folder.children.retain(|id| id != tab_id);
                if folder.children.is_empty() && folder.open {
                    folder.open = false;
                }
            }
        }
    }

    /// Re-homes a tab across the separator. `to_head` places it at the head
    /// of its new region (drop on the separator deadband); otherwise it
    /// goes to the region's tail (`toggle_pin`).
    pub(crate) fn move_across_separator(&mut self, tab_id: &str, pinned: bool, to_head: bool) {
        if let Some(idx) = self.find_top_level(tab_id) {
            self.top_level.remove(idx);
        }
        if let Some(tab) = self.tabs.get_mut(tab_id) {
            tab.pinned = pinned;
        }
        let position = match (pinned, to_head) {
            // Head of the pinned region.
            (true, true) => 0,
            // Tail of the pinned region, i.e. just before the separator.
            (true, false) => self.separator_index(),
            // Head of the unpinned region, i.e. just after the separator.
            (false, true) => self.separator_index(),
            // Tail of the unpinned region.
            (false, false) => self.top_level.len(),
        };
        self.top_level
            .insert(position, TopLevelItem::Tab(tab_id.to_string()));
    }

    /// Whether the item at `idx` sits in the pinned region.
    pub(crate) fn item_in_pinned_region(&self, idx: usize) -> bool {
        match self.top_level.get(idx) {
            Some(TopLevelItem::Folder(_)) => true,
            Some(TopLevelItem::Tab(id)) => {
                self.tabs.get(id).map(|t| t.pinned).unwrap_or(false)
            }
            None => false,
        }
    }
}
