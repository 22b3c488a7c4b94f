use serde::{Deserialize, Serialize};

/// Which of the two split-view panes a command or view belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaneSide {
    Left,
    Right,
}
