//! Split-View Pane Router.
//!
//! Manages zero or two ephemeral browsing panes. Panes are not tabs: no
//! pin flag, no folder membership, no recovery-stack entry, and nothing
//! about them is persisted. Disabling split view discards both panes
//! outright; nothing is merged back into the originating tab.

use std::sync::{Arc, Mutex};

use crate::services::navigation;
use crate::services::view_host::{ViewEvent, ViewHost, ViewOwner};
use crate::session::Session;
use crate::types::pane::PaneSide;
use crate::types::settings::ShellSettings;

pub const MIN_SPLIT_RATIO: f64 = 0.2;
pub const MAX_SPLIT_RATIO: f64 = 0.8;

/// One ephemeral browsing surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Pane {
    pub view: String,
    pub url: String,
}

/// Live split-view state while enabled.
#[derive(Debug, Clone, PartialEq)]
pub struct PaneState {
    pub left: Pane,
    pub right: Pane,
    pub active: PaneSide,
    pub ratio: f64,
}

pub struct PaneRouter {
    host: Arc<Mutex<dyn ViewHost>>,
    state: Option<PaneState>,
}

impl PaneRouter {
    pub fn new(host: Arc<Mutex<dyn ViewHost>>) -> Self {
        Self { host, state: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&PaneState> {
        self.state.as_ref()
    }

    pub fn active_pane(&self) -> Option<PaneSide> {
        self.state.as_ref().map(|s| s.active)
    }

    /// Enables split view: the left pane captures the active tab's current
    /// url, the right pane starts at the configured homepage, and the left
    /// pane receives routed commands. No-op while already enabled.
    pub fn enable(&mut self, session: &Session) {
        if self.state.is_some() {
            return;
        }

        let left_url = session
            .active_tab()
            .and_then(|t| t.url.clone())
            .unwrap_or_else(|| session.settings.homepage.clone());
        let right_url = session.settings.homepage.clone();

        let (left_view, right_view) = match self.host.lock() {
            Ok(mut host) => {
                let left = host.create(ViewOwner::Pane(PaneSide::Left));
                let right = host.create(ViewOwner::Pane(PaneSide::Right));
                host.load(&left, &left_url);
                host.load(&right, &right_url);
                (left, right)
            }
            Err(e) => {
                log::error!("view host lock poisoned: {}", e);
                return;
            }
        };

        self.state = Some(PaneState {
            left: Pane {
                view: left_view,
                url: left_url,
            },
            right: Pane {
                view: right_view,
                url: right_url,
            },
            active: PaneSide::Left,
            ratio: 0.5,
        });
        log::debug!("split view enabled");
    }

    /// Disables split view, destroying both panes and their views.
    pub fn disable(&mut self) {
        if let Some(state) = self.state.take() {
            if let Ok(mut host) = self.host.lock() {
                host.destroy(&state.left.view);
                host.destroy(&state.right.view);
            }
            log::debug!("split view disabled");
        }
    }

    /// Returns whether split view is enabled after the toggle.
    pub fn toggle(&mut self, session: &Session) -> bool {
        if self.is_enabled() {
            self.disable();
        } else {
            self.enable(session);
        }
        self.is_enabled()
    }

    /// Subsequent back/forward/refresh/url-bar commands route to `side`.
    pub fn set_active_pane(&mut self, side: PaneSide) {
        if let Some(state) = &mut self.state {
            state.active = side;
        }
    }

    /// Clamps to `[0.2, 0.8]`. Purely presentational, never persisted.
    pub fn set_split_ratio(&mut self, ratio: f64) {
        if let Some(state) = &mut self.state {
            state.ratio = ratio.clamp(MIN_SPLIT_RATIO, MAX_SPLIT_RATIO);
        }
    }

    /// Navigates the active pane. Input goes through the same sanitizer as
    /// the tab url bar.
    pub fn navigate(&mut self, input: &str, settings: &ShellSettings) {
        let url = navigation::sanitize_input(input, settings);
        let view = match self.active_pane_mut() {
            Some(pane) => {
                pane.url = url.clone();
                pane.view.clone()
            }
            None => return,
        };
        if let Ok(mut host) = self.host.lock() {
            host.load(&view, &url);
        }
    }

    pub fn go_back(&mut self) {
        if let Some(view) = self.active_view() {
            if let Ok(mut host) = self.host.lock() {
                host.go_back(&view);
            }
        }
    }

    pub fn go_forward(&mut self) {
        if let Some(view) = self.active_view() {
            if let Ok(mut host) = self.host.lock() {
                host.go_forward(&view);
            }
        }
    }

    pub fn refresh(&mut self) {
        if let Some(view) = self.active_view() {
            if let Ok(mut host) = self.host.lock() {
                host.reload(&view);
            }
        }
    }

    /// Routes a view callback to the owning pane. Returns `false` when
    /// neither pane owns the view.
    pub fn handle_view_event(&mut self, view_id: &str, event: ViewEvent) -> bool {
        let pane = match &mut self.state {
            Some(state) if state.left.view == view_id => &mut state.left,
            Some(state) if state.right.view == view_id => &mut state.right,
            _ => return false,
        };
        match event {
            ViewEvent::Navigated(url) | ViewEvent::NavigatedInPage(url) => {
                pane.url = url;
            }
            _ => {}
        }
        true
    }

    fn active_view(&self) -> Option<String> {
        self.state.as_ref().map(|s| match s.active {
            PaneSide::Left => s.left.view.clone(),
            PaneSide::Right => s.right.view.clone(),
        })
    }

    fn active_pane_mut(&mut self) -> Option<&mut Pane> {
        self.state.as_mut().map(|s| match s.active {
            PaneSide::Left => &mut s.left,
            PaneSide::Right => &mut s.right,
        })
    }
}
