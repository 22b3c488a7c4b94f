//! Drag-and-Drop Reorder Engine.
//!
//! A pointer-driven state machine, one active gesture at a time:
//! `Idle -> Dragging -> {hover states}* -> Drop | Cancel -> Idle`.
//!
//! Classification runs on every pointer move and is entirely side-effect
//! free; a single proposed intent is committed atomically through the
//! organizer on drop. Every transition back to `Idle` clears all transient
//! hover state, so nothing survives into the next gesture.
//!
//! The engine does not know about pixels beyond what the presentation
//! layer hands it: a `SidebarLayout` snapshot with per-row vertical extents
//! and the separator line position.

use crate::managers::organizer::Organizer;
use crate::session::Session;
use crate::types::errors::DragError;
use crate::types::events::ModelEvent;
use crate::types::order::{Side, TopLevelItem};

/// Vertical tolerance for edge and separator targeting, in pixels.
pub const DRAG_DEADBAND_PX: f64 = 4.0;

/// The single discrete action a gesture resolves to at release time.
#[derive(Debug, Clone, PartialEq)]
pub enum DropIntent {
    /// Subject is an unpinned tab hovering the separator deadband.
    Pin,
    /// Subject is a pinned tab hovering the separator deadband.
    Unpin,
    /// Subject is a tab hovering a folder row's interior.
    InsertIntoFolder(String),
    /// Subject hovers the edge deadband of another top-level item.
    Reorder { target: String, side: Side },
}

/// Vertical extent of one rendered top-level row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowExtent {
    pub item: TopLevelItem,
    pub top: f64,
    pub bottom: f64,
}

/// Geometry snapshot of the sidebar, supplied by the presentation layer
/// with each pointer sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SidebarLayout {
    pub rows: Vec<RowExtent>,
    pub separator_y: f64,
}

impl SidebarLayout {
    /// Builds a layout of uniform rows, `row_height` pixels each, with the
    /// separator drawn after `separator_after` rows. Convenient for tests
    /// and simple list renderings.
    pub fn uniform(items: &[TopLevelItem], row_height: f64, separator_after: usize) -> Self {
        let rows = items
            .iter()
            .enumerate()
            .map(|(i, item)| RowExtent {
                item: item.clone(),
                top: i as f64 * row_height,
                bottom: (i + 1) as f64 * row_height,
            })
            .collect();
        Self {
            rows,
            separator_y: separator_after as f64 * row_height,
        }
    }

    fn row_at(&self, y: f64) -> Option<&RowExtent> {
        self.rows.iter().find(|r| y >= r.top && y < r.bottom)
    }
}

/// The reorder engine. Holds only gesture state; all model access goes
/// through the `Session` passed to each call.
#[derive(Debug, Default)]
pub struct DragEngine {
    subject: Option<TopLevelItem>,
    intent: Option<DropIntent>,
}

impl DragEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.subject.is_some()
    }

    pub fn subject(&self) -> Option<&TopLevelItem> {
        self.subject.as_ref()
    }

    pub fn proposed_intent(&self) -> Option<&DropIntent> {
        self.intent.as_ref()
    }

    /// Enters `Dragging` for a top-level item. Exactly one subject may be
    /// dragging globally.
    pub fn begin(&mut self, session: &Session, item_id: &str) -> Result<(), DragError> {
        if self.subject.is_some() {
            return Err(DragError::GestureInProgress);
        }
        let idx = session
            .find_top_level(item_id)
            .ok_or_else(|| DragError::UnknownItem(item_id.to_string()))?;
        self.subject = Some(session.top_level()[idx].clone());
        self.intent = None;
        Ok(())
    }

    /// Classifies the pointer position into a proposed drop intent. Purely
    /// a state update; the model is untouched until `drop_subject`.
    pub fn pointer_move(
        &mut self,
        session: &Session,
        layout: &SidebarLayout,
        y: f64,
    ) -> Option<DropIntent> {
        let subject = self.subject.clone()?;
        self.intent = classify(session, layout, &subject, y);
        self.intent.clone()
    }

    /// Commits the proposed intent atomically through the organizer and
    /// returns to `Idle`. A drop with no valid intent behaves as a cancel.
    pub fn drop_subject(&mut self, session: &mut Session) -> Option<DropIntent> {
        let subject = self.subject.take()?;
        let intent = self.intent.take()?;

        match &intent {
            DropIntent::Pin => {
                session.detach_from_folder(subject.id());
                session.move_across_separator(subject.id(), true, true);
                session.persist_layout();
                session.emit(ModelEvent::LayoutChanged);
            }
            DropIntent::Unpin => {
                session.detach_from_folder(subject.id());
                session.move_across_separator(subject.id(), false, true);
                session.persist_layout();
                session.emit(ModelEvent::LayoutChanged);
            }
            DropIntent::InsertIntoFolder(folder_id) => {
                session.add_tab_to_folder(subject.id(), folder_id);
            }
            DropIntent::Reorder { target, side } => {
                session.reorder(subject.id(), target, *side);
            }
        }

        log::debug!("drop committed: {:?}", intent);
        Some(intent)
    }

    /// Abandons the gesture, leaving the model unchanged.
    pub fn cancel(&mut self) {
        self.subject = None;
        self.intent = None;
    }
}

/// Classification rules, in priority order: separator deadband, then the
/// row under the pointer (folder interior or edge deadbands). Folder
/// subjects only ever produce reorder intents.
fn classify(
    session: &Session,
    layout: &SidebarLayout,
    subject: &TopLevelItem,
    y: f64,
) -> Option<DropIntent> {
    if (y - layout.separator_y).abs() <= DRAG_DEADBAND_PX {
        if let TopLevelItem::Tab(id) = subject {
            let pinned = session.tab(id)?.pinned;
            return Some(if pinned { DropIntent::Unpin } else { DropIntent::Pin });
        }
        return None;
    }

    let row = layout.row_at(y)?;
    if row.item.id() == subject.id() {
        return None;
    }

    let near_top = y - row.top <= DRAG_DEADBAND_PX;
    let near_bottom = row.bottom - y <= DRAG_DEADBAND_PX;

    match &row.item {
        TopLevelItem::Folder(folder_id) => {
            if near_top {
                Some(DropIntent::Reorder {
                    target: folder_id.clone(),
                    side: Side::Before,
                })
            } else if near_bottom {
                Some(DropIntent::Reorder {
                    target: folder_id.clone(),
                    side: Side::After,
                })
            } else if matches!(subject, TopLevelItem::Tab(_)) {
                Some(DropIntent::InsertIntoFolder(folder_id.clone()))
            } else {
                // A folder can never target another folder's interior.
                None
            }
        }
        TopLevelItem::Tab(tab_id) => {
            // Folders may only be reordered among pinned-region items.
            if subject.is_folder() && !session.tab(tab_id).map(|t| t.pinned).unwrap_or(false) {
                return None;
            }
            if near_top {
                Some(DropIntent::Reorder {
                    target: tab_id.clone(),
                    side: Side::Before,
                })
            } else if near_bottom {
                Some(DropIntent::Reorder {
                    target: tab_id.clone(),
                    side: Side::After,
                })
            } else {
                None
            }
        }
    }
}
