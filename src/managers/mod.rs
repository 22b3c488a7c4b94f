// Tabdeck component managers
// Each submodule owns one piece of the session model's behavior.

pub mod drag_engine;
pub mod organizer;
pub mod pane_router;
pub mod tab_registry;
