// Tabdeck platform paths for Linux
// Config: ~/.config/tabdeck

use std::env;
use std::path::PathBuf;

/// Returns the configuration directory for Tabdeck on Linux.
/// Uses `$XDG_CONFIG_HOME/tabdeck` if set, otherwise `~/.config/tabdeck`.
pub fn get_config_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("tabdeck")
    } else {
        let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
        PathBuf::from(home).join(".config").join("tabdeck")
    }
}
