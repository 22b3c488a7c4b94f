//! Command dispatch for the shell's external surface.
//!
//! The presentation/keyboard layer drives the core through named commands
//! with JSON arguments; the names and argument shapes here are the
//! integration contract. Extracted from the binary so it can be
//! unit-tested independently.

use serde_json::{json, Value};

use crate::app::Shell;
use crate::managers::organizer::Organizer;
use crate::managers::pane_router::PaneRouter;
use crate::managers::tab_registry::TabRegistry;
use crate::session::Session;
use crate::types::order::{Side, TopLevelItem};
use crate::types::pane::PaneSide;
use crate::types::tab::InternalPage;

fn str_param<'a>(params: &'a Value, key: &str) -> Result<&'a str, String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", key))
}

/// Dispatches a named command to the appropriate manager.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message
/// for malformed requests. Unknown ids inside a well-formed request follow
/// the model's no-op semantics and still return `Ok`.
pub fn handle_command(shell: &mut Shell, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        // ─── Tabs ───
        "tab.new" => {
            let url = params.get("url").and_then(|v| v.as_str());
            let id = shell.session.create_tab(url);
            Ok(json!({ "id": id }))
        }
        "tab.new_internal" => {
            let page = match str_param(params, "page")? {
                "settings" => InternalPage::Settings,
                "notes" => InternalPage::Notes,
                other => return Err(format!("unknown internal page: {}", other)),
            };
            let id = shell.session.create_internal_tab(page);
            Ok(json!({ "id": id }))
        }
        "tab.close" => {
            shell.session.close_tab(str_param(params, "id")?);
            Ok(json!({ "ok": true }))
        }
        "tab.switch" => {
            shell.session.switch_active(str_param(params, "id")?);
            Ok(json!({ "ok": true }))
        }
        "tab.duplicate" => {
            let id = shell.session.duplicate_tab(str_param(params, "id")?);
            Ok(json!({ "id": id }))
        }
        "tab.navigate" => {
            let id = str_param(params, "id")?;
            let input = str_param(params, "input")?;
            if shell.panes.is_enabled() {
                let settings = shell.session.settings.clone();
                shell.panes.navigate(input, &settings);
            } else {
                shell.session.navigate(id, input);
            }
            Ok(json!({ "ok": true }))
        }
        "tab.back" => {
            let moved = if shell.panes.is_enabled() {
                shell.panes.go_back();
                true
            } else {
                shell.session.go_back(str_param(params, "id")?)
            };
            Ok(json!({ "moved": moved }))
        }
        "tab.forward" => {
            let moved = if shell.panes.is_enabled() {
                shell.panes.go_forward();
                true
            } else {
                shell.session.go_forward(str_param(params, "id")?)
            };
            Ok(json!({ "moved": moved }))
        }
        "tab.set_zoom" => {
            let id = str_param(params, "id")?;
            let factor = params
                .get("factor")
                .and_then(|v| v.as_f64())
                .ok_or("missing factor")?;
            shell.session.set_zoom(id, factor);
            Ok(json!({ "ok": true }))
        }
        "tab.recover" => {
            let id = shell.session.recover_closed_tab();
            let recovered = id.is_some();
            Ok(json!({ "id": id, "recovered": recovered }))
        }

        // ─── Pin & folders ───
        "pin.toggle" => {
            shell.session.toggle_pin(str_param(params, "id")?);
            Ok(json!({ "ok": true }))
        }
        "folder.create" => {
            let name = params.get("name").and_then(|v| v.as_str());
            let id = shell.session.create_folder(name);
            Ok(json!({ "id": id }))
        }
        "folder.rename" => {
            let id = str_param(params, "id")?;
            let name = str_param(params, "name")?;
            shell.session.rename_folder(id, name);
            Ok(json!({ "ok": true }))
        }
        "folder.delete" => {
            shell.session.delete_folder(str_param(params, "id")?);
            Ok(json!({ "ok": true }))
        }
        "folder.add_tab" => {
            let tab_id = str_param(params, "tabId")?;
            let folder_id = str_param(params, "folderId")?;
            shell.session.add_tab_to_folder(tab_id, folder_id);
            Ok(json!({ "ok": true }))
        }
        "folder.remove_tab" => {
            let tab_id = str_param(params, "tabId")?;
            let folder_id = str_param(params, "folderId")?;
            shell.session.remove_tab_from_folder(tab_id, folder_id);
            Ok(json!({ "ok": true }))
        }
        "folder.toggle" => {
            shell.session.toggle_folder(str_param(params, "id")?);
            Ok(json!({ "ok": true }))
        }
        "order.reorder" => {
            let item = str_param(params, "itemId")?;
            let target = str_param(params, "targetId")?;
            let side = match str_param(params, "side")? {
                "before" => Side::Before,
                "after" => Side::After,
                other => return Err(format!("unknown side: {}", other)),
            };
            shell.session.reorder(item, target, side);
            Ok(json!({ "ok": true }))
        }

        // ─── Split view ───
        "split.toggle" => {
            let enabled = shell.toggle_split_view();
            Ok(json!({ "enabled": enabled }))
        }
        "split.set_active" => {
            let side = match str_param(params, "side")? {
                "left" => PaneSide::Left,
                "right" => PaneSide::Right,
                other => return Err(format!("unknown pane: {}", other)),
            };
            shell.set_active_pane(side);
            Ok(json!({ "ok": true }))
        }
        "split.set_ratio" => {
            let ratio = params
                .get("ratio")
                .and_then(|v| v.as_f64())
                .ok_or("missing ratio")?;
            shell.panes.set_split_ratio(ratio);
            Ok(json!({ "ok": true }))
        }

        // ─── Introspection ───
        "session.state" => Ok(session_state(&shell.session, &shell.panes)),

        other => Err(format!("unknown method: {}", other)),
    }
}

/// A JSON snapshot of the model, in canonical order, for the presentation
/// layer to render from.
fn session_state(session: &Session, panes: &PaneRouter) -> Value {
    let items: Vec<Value> = session
        .top_level()
        .iter()
        .map(|item| match item {
            TopLevelItem::Tab(id) => {
                let tab = session.tab(id);
                json!({
                    "kind": "tab",
                    "id": id,
                    "title": tab.map(|t| t.title.clone()),
                    "url": tab.and_then(|t| t.url.clone()),
                    "pinned": tab.map(|t| t.pinned).unwrap_or(false),
                })
            }
            TopLevelItem::Folder(id) => {
                let folder = session.folder(id);
                json!({
                    "kind": "folder",
                    "id": id,
                    "name": folder.map(|f| f.name.clone()),
                    "open": folder.map(|f| f.is_visibly_expanded()).unwrap_or(false),
                    "children": folder.map(|f| f.children.clone()).unwrap_or_default(),
                })
            }
        })
        .collect();

    json!({
        "items": items,
        "separatorIndex": session.separator_index(),
        "activeTabId": session.active_tab_id(),
        "closedTabCount": session.closed_tabs().len(),
        "split": panes.state().map(|s| json!({
            "active": s.active,
            "ratio": s.ratio,
            "leftUrl": s.left.url,
            "rightUrl": s.right.url,
        })),
    })
}
