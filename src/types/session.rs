use serde::{Deserialize, Serialize};

/// A pinned tab's state as written to the settings store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinnedTabRecord {
    pub id: String,
    pub url: Option<String>,
    pub title: String,
    pub favicon: Option<String>,
    pub order: usize,
}

/// A folder's state as written to the settings store. `order` is the
/// folder's position among top-level pinned items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderRecord {
    pub id: String,
    pub name: String,
    pub tab_ids: Vec<String>,
    pub open: bool,
    pub order: usize,
}
