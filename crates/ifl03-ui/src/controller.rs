//! One controller for every page: sends what the page asks for, keeps the
//! surface in step with the latest snapshot and owns the status banner.

use std::sync::Arc;
use std::time::{Duration, Instant};

use ifl03_bridge::{BridgeClient, Command};
use ifl03_common::{BridgeError, StatusBanner, StatusLevel};
use tracing::{debug, warn};

use crate::event::{Request, UiEvent};
use crate::pages::{render, surface_for, Page};
use crate::surface::Surface;

pub const STATUS_MESSAGE: &str = "statusMessage";
pub const STATUS_TEXT: &str = "statusText";

const ALL_LEVELS: [StatusLevel; 3] = [StatusLevel::Info, StatusLevel::Success, StatusLevel::Error];

pub struct PageController<P: Page> {
    client: Arc<BridgeClient>,
    page: P,
    surface: Surface,
    banner: StatusBanner,
}

impl<P: Page> PageController<P> {
    pub fn new(client: Arc<BridgeClient>, page: P, status_ttl: Duration) -> Self {
        let mut surface = surface_for(&page);
        surface.declare(STATUS_MESSAGE);
        surface.declare(STATUS_TEXT);
        surface.set_hidden(STATUS_MESSAGE, true);
        Self {
            client,
            page,
            surface,
            banner: StatusBanner::new(status_ttl),
        }
    }

    pub fn client(&self) -> &Arc<BridgeClient> {
        &self.client
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    /// Mutate page-local state; call [`render`](Self::render) afterwards.
    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Fetch the initial state and render it.
    pub async fn init(&mut self) -> Result<(), BridgeError> {
        match self.client.send(&Command::GetState).await {
            Ok(_) => {
                debug!(page = self.page.name(), "initial state loaded");
                self.render();
                self.run_follow_ups().await;
                Ok(())
            }
            Err(e) => {
                warn!(page = self.page.name(), error = %e, "failed to load initial state");
                Err(e)
            }
        }
    }

    /// Re-render from the latest snapshot held by the client.
    pub fn render(&mut self) {
        let snapshot = self.client.snapshot();
        render(&self.page, snapshot.as_deref(), &mut self.surface);
        self.render_banner(Instant::now());
    }

    /// Handle one user interaction end to end.
    pub async fn dispatch(&mut self, event: UiEvent) {
        reflect_user_edit(&event, &mut self.surface);

        let snapshot = self.client.snapshot();
        let reaction = self.page.handle(&event, snapshot.as_deref(), &mut self.surface);
        if reaction.rerender {
            self.render();
        }

        let mut replaced = false;
        let mut failed = false;
        for request in reaction.requests {
            match self.run(request).await {
                Ok(r) => replaced |= r,
                Err(_) => failed = true,
            }
        }
        if failed {
            // Drop the user's edit; the last snapshot stays authoritative.
            self.render();
        }
        if replaced {
            self.run_follow_ups().await;
        }
        self.render_banner(Instant::now());
    }

    /// Apply a host push and re-render. Returns whether the state changed.
    ///
    /// Sends nothing; callers send [`follow_ups`](Self::follow_ups) themselves.
    pub fn handle_push(&mut self, text: &str) -> bool {
        match self.client.apply_push(text) {
            Ok(Some(_)) => {
                self.render();
                true
            }
            Ok(None) | Err(_) => false,
        }
    }

    /// Corrective requests the page derives from the current snapshot.
    pub fn follow_ups(&self) -> Vec<Request> {
        self.client
            .snapshot()
            .map(|snapshot| self.page.follow_up(&snapshot))
            .unwrap_or_default()
    }

    /// Show a banner message outside the request flow.
    pub fn show_status(&mut self, level: StatusLevel, text: impl Into<String>) {
        self.banner.show(level, text);
        self.render_banner(Instant::now());
    }

    /// Expire timed feedback.
    pub fn tick(&mut self, now: Instant) {
        self.page.tick(now, &mut self.surface);
        self.render_banner(now);
    }

    /// Send one request; `Ok` tells whether it replaced the snapshot.
    async fn run(&mut self, request: Request) -> Result<bool, BridgeError> {
        let cmd = request.command.name();
        match self.client.send(&request.command).await {
            Ok(snapshot) => {
                if let Some(feedback) = request.feedback {
                    self.banner.show(StatusLevel::Success, feedback.success);
                }
                let replaced = snapshot.is_some();
                if replaced {
                    self.render();
                }
                Ok(replaced)
            }
            Err(e) => {
                warn!(page = self.page.name(), cmd, error = %e, "command failed");
                if let Some(feedback) = request.feedback {
                    self.banner.show(StatusLevel::Error, feedback.failure);
                }
                Err(e)
            }
        }
    }

    /// One round of corrective requests; never chained.
    async fn run_follow_ups(&mut self) {
        for request in self.follow_ups() {
            debug!(page = self.page.name(), cmd = request.command.name(), "follow-up request");
            let _ = self.run(request).await;
        }
    }

    fn render_banner(&mut self, now: Instant) {
        let visible = self
            .banner
            .visible_at(now)
            .map(|m| (m.level, m.text.clone()));

        for level in ALL_LEVELS {
            self.surface.remove_classes(STATUS_MESSAGE, level.classes());
        }
        match visible {
            Some((level, text)) => {
                self.surface.set_text(STATUS_TEXT, text);
                self.surface.add_classes(STATUS_MESSAGE, level.classes());
                self.surface.set_hidden(STATUS_MESSAGE, false);
            }
            None => self.surface.set_hidden(STATUS_MESSAGE, true),
        }
    }
}

/// Mirror the edit the user made on the control itself, as a browser would.
fn reflect_user_edit(event: &UiEvent, surface: &mut Surface) {
    match event {
        UiEvent::Toggled { id, checked } => surface.set_checked(id, *checked),
        UiEvent::Input { id, value } | UiEvent::Changed { id, value } => {
            surface.set_value(id, value.as_str())
        }
        _ => {}
    }
}
