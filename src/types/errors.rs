use std::fmt;

// === StoreError ===

/// Errors related to the persisted settings store.
#[derive(Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    Io(String),
    /// Serializing or deserializing store contents failed.
    Serialization(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(msg) => write!(f, "Store I/O error: {}", msg),
            StoreError::Serialization(msg) => write!(f, "Store serialization error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

// === DragError ===

/// Errors related to starting a drag gesture.
#[derive(Debug)]
pub enum DragError {
    /// Exactly one subject may be dragging at a time.
    GestureInProgress,
    /// The subject is not a top-level item.
    UnknownItem(String),
}

impl fmt::Display for DragError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DragError::GestureInProgress => write!(f, "A drag gesture is already in progress"),
            DragError::UnknownItem(id) => write!(f, "Item is not draggable: {}", id),
        }
    }
}

impl std::error::Error for DragError {}
