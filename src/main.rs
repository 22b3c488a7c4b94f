//! Headless command driver for Tabdeck.
//!
//! Reads one JSON object per line from stdin (`{"method": ..., "params":
//! ...}`), dispatches it through the command handler, and prints one JSON
//! result per line. Useful for exercising the session core without a
//! window or web engine attached.

use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{json, Value};

use tabdeck::app::Shell;
use tabdeck::command_handler::handle_command;
use tabdeck::services::settings_store::JsonFileStore;
use tabdeck::services::view_host::NullViewHost;

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

fn main() {
    env_logger::init();

    let store = JsonFileStore::at_default_location();
    log::info!("store at {}", store.path().display());

    let mut shell = Shell::new(Arc::new(Mutex::new(NullViewHost::new())), Box::new(store));
    shell.startup();

    let stdin = io::stdin();
    let stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" {
            break;
        }

        shell.tick(now_ms());

        let response = match serde_json::from_str::<Value>(line) {
            Ok(request) => {
                let method = request
                    .get("method")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string();
                let params = request.get("params").cloned().unwrap_or(json!({}));
                match handle_command(&mut shell, &method, &params) {
                    Ok(result) => json!({ "ok": true, "result": result }),
                    Err(e) => json!({ "ok": false, "error": e }),
                }
            }
            Err(e) => json!({ "ok": false, "error": format!("invalid request: {}", e) }),
        };

        let events: Vec<String> = shell
            .session
            .drain_events()
            .into_iter()
            .map(|e| format!("{:?}", e))
            .collect();

        let mut out = stdout.lock();
        let _ = writeln!(out, "{}", json!({ "response": response, "events": events }));
    }

    shell.shutdown();
}
