// Tabdeck shared type definitions
// Each submodule defines types used across the application.

pub mod errors;
pub mod events;
pub mod folder;
pub mod order;
pub mod pane;
pub mod session;
pub mod settings;
pub mod tab;
