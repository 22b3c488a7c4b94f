//! Tabdeck — session core for a desktop browser shell.
//!
//! This library crate owns the model a browser window renders from: tabs with
//! per-tab navigation history, a pinned/unpinned top-level ordering with folder
//! grouping, a pointer-driven drag-and-drop reorder engine, and an optional
//! two-pane split-browsing mode. Rendering, window plumbing, and the actual
//! web engine live behind the `ViewHost` trait and are out of scope here.

pub mod app;
pub mod command_handler;
pub mod managers;
pub mod platform;
pub mod services;
pub mod session;
pub mod types;
