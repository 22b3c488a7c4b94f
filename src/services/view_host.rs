//! The rendering-surface contract.
//!
//! The core never touches a web engine directly. It requests views from a
//! `ViewHost`, issues load/stop/back/forward commands against opaque view
//! ids, and receives asynchronous `ViewEvent`s back. A wry- or
//! WebKit-backed host lives entirely outside this crate; the two hosts
//! here are a no-op stand-in and a recording test double.

use crate::types::pane::PaneSide;

/// Who a view renders for. Each view is exclusively owned by one tab or
/// one split-view pane.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewOwner {
    Tab(String),
    Pane(PaneSide),
}

/// Asynchronous callbacks from a view.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// The view finished initializing and can accept loads.
    Ready,
    LoadStart,
    LoadFinish,
    LoadFail(i64),
    TitleUpdated(String),
    FaviconUpdated(String),
    /// The view committed a navigation to the given url.
    Navigated(String),
    /// Same-document navigation (fragment or history.pushState).
    NavigatedInPage(String),
}

/// Factory and command surface for external rendering views.
///
/// `create` returns immediately; the view becomes usable later, signalled
/// by `ViewEvent::Ready`.
pub trait ViewHost: Send {
    fn create(&mut self, owner: ViewOwner) -> String;
    fn load(&mut self, view_id: &str, url: &str);
    fn stop(&mut self, view_id: &str);
    fn reload(&mut self, view_id: &str);
    fn go_back(&mut self, view_id: &str);
    fn go_forward(&mut self, view_id: &str);
    fn can_go_back(&self, view_id: &str) -> bool;
    fn can_go_forward(&self, view_id: &str) -> bool;
    fn show(&mut self, view_id: &str);
    fn hide(&mut self, view_id: &str);
    fn set_zoom(&mut self, view_id: &str, factor: f64);
    fn destroy(&mut self, view_id: &str);
    fn current_url(&self, view_id: &str) -> Option<String>;
    fn current_title(&self, view_id: &str) -> Option<String>;
}

/// A host that allocates ids and ignores every command. Used by the
/// headless binary and as a default in tests that only exercise the model.
#[derive(Debug, Default)]
pub struct NullViewHost {
    counter: u64,
}

impl NullViewHost {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ViewHost for NullViewHost {
    fn create(&mut self, _owner: ViewOwner) -> String {
        self.counter += 1;
        format!("view-{}", self.counter)
    }

    fn load(&mut self, _view_id: &str, _url: &str) {}
    fn stop(&mut self, _view_id: &str) {}
    fn reload(&mut self, _view_id: &str) {}
    fn go_back(&mut self, _view_id: &str) {}
    fn go_forward(&mut self, _view_id: &str) {}

    fn can_go_back(&self, _view_id: &str) -> bool {
        false
    }

    fn can_go_forward(&self, _view_id: &str) -> bool {
        false
    }

    fn show(&mut self, _view_id: &str) {}
    fn hide(&mut self, _view_id: &str) {}
    fn set_zoom(&mut self, _view_id: &str, _factor: f64) {}
    fn destroy(&mut self, _view_id: &str) {}

    fn current_url(&self, _view_id: &str) -> Option<String> {
        None
    }

    fn current_title(&self, _view_id: &str) -> Option<String> {
        None
    }
}

/// A command issued against a view, as recorded by `RecordingViewHost`.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewCall {
    Created { view: String, owner: ViewOwner },
    Loaded { view: String, url: String },
    Stopped(String),
    Reloaded(String),
    WentBack(String),
    WentForward(String),
    Shown(String),
    Hidden(String),
    Zoomed { view: String, factor: f64 },
    Destroyed(String),
}

/// A host that records every call for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingViewHost {
    counter: u64,
    pub calls: Vec<ViewCall>,
}

impl RecordingViewHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of all views loaded with the given url, in call order.
    pub fn loads_of(&self, url: &str) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ViewCall::Loaded { view, url: u } if u == url => Some(view.clone()),
                _ => None,
            })
            .collect()
    }
}

impl ViewHost for RecordingViewHost {
    fn create(&mut self, owner: ViewOwner) -> String {
        self.counter += 1;
        let view = format!("view-{}", self.counter);
        self.calls.push(ViewCall::Created {
            view: view.clone(),
            owner,
        });
        view
    }

    fn load(&mut self, view_id: &str, url: &str) {
        self.calls.push(ViewCall::Loaded {
            view: view_id.to_string(),
            url: url.to_string(),
        });
    }

    fn stop(&mut self, view_id: &str) {
        self.calls.push(ViewCall::Stopped(view_id.to_string()));
    }

    fn reload(&mut self, view_id: &str) {
        self.calls.push(ViewCall::Reloaded(view_id.to_string()));
    }

    fn go_back(&mut self, view_id: &str) {
        self.calls.push(ViewCall::WentBack(view_id.to_string()));
    }

    fn go_forward(&mut self, view_id: &str) {
        self.calls.push(ViewCall::WentForward(view_id.to_string()));
    }

    fn show(&mut self, view_id: &str) {
        self.calls.push(ViewCall::Shown(view_id.to_string()));
    }

    fn hide(&mut self, view_id: &str) {
        self.calls.push(ViewCall::Hidden(view_id.to_string()));
    }

    fn set_zoom(&mut self, view_id: &str, factor: f64) {
        self.calls.push(ViewCall::Zoomed {
            view: view_id.to_string(),
            factor,
        });
    }

    fn destroy(&mut self, view_id: &str) {
        self.calls.push(ViewCall::Destroyed(view_id.to_string()));
    }

    fn can_go_back(&self, _view_id: &str) -> bool {
        false
    }

    fn can_go_forward(&self, _view_id: &str) -> bool {
        false
    }

    fn current_url(&self, _view_id: &str) -> Option<String> {
        None
    }

    fn current_title(&self, _view_id: &str) -> Option<String> {
        None
    }
}
