use serde::{Deserialize, Serialize};

/// An entry in the session's top-level ordering. Tabs inside folders do not
/// appear here; they live in their folder's child list.
///
/// The ordering is partitioned by a conceptual separator: all pinned tabs
/// and all folders precede it, all unpinned tabs follow it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum TopLevelItem {
    Tab(String),
    Folder(String),
}

impl TopLevelItem {
    pub fn id(&self) -> &str {
        match self {
            TopLevelItem::Tab(id) | TopLevelItem::Folder(id) => id,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, TopLevelItem::Folder(_))
    }
}

/// Which side of a reorder target the moved item lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Before,
    After,
}
