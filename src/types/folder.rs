use serde::{Deserialize, Serialize};

/// A named, ordered group of pinned tabs, collapsible independently of the
/// pinned region.
///
/// Invariant: every id in `children` refers to a tab with `pinned == true`
/// and `folder_id == Some(self.id)`; a tab belongs to at most one folder.
/// Position among top-level pinned items is implicit in the session's
/// top-level order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub children: Vec<String>,
    pub open: bool,
}

impl Folder {
    /// The display name used when a rename trims down to nothing.
    pub fn fallback_name(id: &str) -> String {
        format!("Folder {}", id)
    }

    /// An open-but-empty folder must never render as expanded.
    pub fn is_visibly_expanded(&self) -> bool {
        self.open && !self.children.is_empty()
    }
}
