// Tabdeck platform paths for Windows
// Config lives under %APPDATA%/Tabdeck

use std::env;
use std::path::PathBuf;

/// Returns the configuration directory for Tabdeck on Windows.
pub fn get_config_dir() -> PathBuf {
    let appdata = env::var("APPDATA").unwrap_or_else(|_| String::from("C:\\Temp"));
    PathBuf::from(appdata).join("Tabdeck")
}
