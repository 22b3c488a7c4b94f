pub mod navigation;
pub mod settings_store;
pub mod view_host;
