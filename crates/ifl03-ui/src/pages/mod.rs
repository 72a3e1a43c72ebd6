//! Pages: each owns a fixed set of controls, re-derives them from a
//! snapshot and maps user events to bridge requests.

pub mod home;
pub mod overlays;
pub mod preview;
pub mod settings;
pub mod user;

use std::time::{Duration, Instant};

use ifl03_bridge::StateSnapshot;

use crate::connection::{self, render_connection};
use crate::event::{Reaction, Request, UiEvent};
use crate::surface::Surface;

pub use home::{HomePage, LatestRelease};
pub use overlays::OverlaysPage;
pub use preview::PreviewPage;
pub use settings::SettingsPage;
pub use user::UserPage;

/// Tunables handed to pages that need them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOptions {
    pub save_feedback: Duration,
    pub nudge_step: i32,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            save_feedback: Duration::from_millis(2000),
            nudge_step: 1,
        }
    }
}

pub trait Page: Send {
    fn name(&self) -> &'static str;

    /// Ids of the page-specific controls. The connection indicator is added
    /// for every page.
    fn element_ids(&self) -> Vec<String>;

    /// Re-derive every owned control from `snapshot`.
    fn render(&self, snapshot: &StateSnapshot, surface: &mut Surface);

    fn handle(
        &mut self,
        event: &UiEvent,
        snapshot: Option<&StateSnapshot>,
        surface: &mut Surface,
    ) -> Reaction;

    /// Corrective requests implied by a freshly rendered snapshot.
    fn follow_up(&self, _snapshot: &StateSnapshot) -> Vec<Request> {
        Vec::new()
    }

    /// Expire page-local timed feedback.
    fn tick(&mut self, _now: Instant, _surface: &mut Surface) {}
}

/// Build the surface for `page`, connection indicator included.
pub fn surface_for<P: Page + ?Sized>(page: &P) -> Surface {
    let mut surface = Surface::with_elements(connection::ELEMENTS);
    for id in page.element_ids() {
        surface.declare(id);
    }
    surface
}

/// Render `page` from `snapshot`. With no snapshot the last render stays.
pub fn render<P: Page + ?Sized>(page: &P, snapshot: Option<&StateSnapshot>, surface: &mut Surface) {
    let Some(snapshot) = snapshot else {
        return;
    };
    render_connection(snapshot.connection_status(), surface);
    page.render(snapshot, surface);
}

// =============================================================================
// SHARED HELPERS
// =============================================================================

pub(crate) const SAVED_TEXT: &str = "Saved!";

/// A button temporarily showing "Saved!".
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SaveFeedback {
    button: &'static str,
    original: String,
    until: Instant,
}

impl SaveFeedback {
    pub(crate) fn start(
        button: &'static str,
        surface: &mut Surface,
        duration: Duration,
        now: Instant,
    ) -> Self {
        let original = surface.text(button).unwrap_or_default().to_string();
        surface.set_text(button, SAVED_TEXT);
        surface.set_disabled(button, true);
        Self {
            button,
            original,
            until: now + duration,
        }
    }

    /// Restart on an already active button without losing its label.
    pub(crate) fn restart(self, surface: &mut Surface, duration: Duration, now: Instant) -> Self {
        surface.set_text(self.button, SAVED_TEXT);
        surface.set_disabled(self.button, true);
        Self {
            until: now + duration,
            ..self
        }
    }

    /// Restore the button once expired; returns the feedback if still live.
    pub(crate) fn expire(self, now: Instant, surface: &mut Surface) -> Option<Self> {
        if now < self.until {
            return Some(self);
        }
        surface.set_text(self.button, self.original);
        surface.set_disabled(self.button, false);
        None
    }
}

/// `show_pit_stops` → `Show Pit Stops`.
pub(crate) fn title_case(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
