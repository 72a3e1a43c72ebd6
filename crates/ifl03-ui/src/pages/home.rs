//! Main controller page: edit mode, quick overlay toggles, version and
//! update button, release notes.

use ifl03_bridge::{Command, StateSnapshot};
use ifl03_common::version::is_newer;

use super::Page;
use crate::event::{Reaction, UiEvent};
use crate::surface::Surface;

pub const CHK_UI_EDIT: &str = "chk_uiEdit";
pub const APP_VERSION: &str = "app-version";
pub const BTN_UPDATE: &str = "btn-update";
pub const BTN_RELEASE_NOTES: &str = "btn-release-notes";
pub const BTN_CLOSE_RELEASE_NOTES: &str = "btn-close-release-notes";
pub const RELEASE_NOTES_BACKDROP: &str = "release-notes-backdrop";
pub const RELEASE_NOTES_MODAL: &str = "release-notes-modal";
pub const RELEASE_NOTES_CONTENT: &str = "release-notes-content";

/// Overlays with a quick toggle on the home page.
pub const QUICK_TOGGLES: [&str; 5] = [
    "OverlayStandings",
    "OverlayDDU",
    "OverlayInputs",
    "OverlayRelative",
    "OverlayCover",
];

const LOADING_TEXT: &str = "Loading...";

/// Newest published release as seen by the release checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestRelease {
    pub version: String,
    pub download_url: Option<String>,
}

#[derive(Debug, Default)]
pub struct HomePage {
    installed_version: Option<String>,
    latest: Option<LatestRelease>,
    notes_open: bool,
    notes_html: Option<String>,
}

fn toggle_id(overlay_key: &str) -> String {
    format!("chk_{overlay_key}")
}

impl HomePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Version read from the local descriptor; wins over the snapshot's.
    pub fn set_installed_version(&mut self, version: Option<String>) {
        self.installed_version = version.filter(|v| !v.is_empty());
    }

    pub fn installed_version(&self) -> Option<&str> {
        self.installed_version.as_deref()
    }

    pub fn set_latest_release(&mut self, latest: Option<LatestRelease>) {
        self.latest = latest;
    }

    pub fn latest_release(&self) -> Option<&LatestRelease> {
        self.latest.as_ref()
    }

    /// Fill the open release-notes modal with formatted HTML.
    pub fn show_release_notes(&mut self, html: impl Into<String>) {
        self.notes_open = true;
        self.notes_html = Some(html.into());
    }

    pub fn close_release_notes(&mut self) {
        self.notes_open = false;
    }

    pub fn release_notes_open(&self) -> bool {
        self.notes_open
    }

    /// Version shown on the page: local descriptor, then backend, then `-`.
    pub fn displayed_version(&self, snapshot: &StateSnapshot) -> String {
        self.installed_version
            .clone()
            .or_else(|| snapshot.app_version())
            .unwrap_or_else(|| "-".to_string())
    }

    fn update_available(&self, displayed: &str) -> bool {
        self.latest
            .as_ref()
            .is_some_and(|l| !l.version.is_empty() && is_newer(&l.version, displayed))
    }
}

impl Page for HomePage {
    fn name(&self) -> &'static str {
        "home"
    }

    fn element_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = [
            CHK_UI_EDIT,
            APP_VERSION,
            BTN_UPDATE,
            BTN_RELEASE_NOTES,
            BTN_CLOSE_RELEASE_NOTES,
            RELEASE_NOTES_BACKDROP,
            RELEASE_NOTES_MODAL,
            RELEASE_NOTES_CONTENT,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        ids.extend(QUICK_TOGGLES.iter().map(|k| toggle_id(k)));
        ids
    }

    fn render(&self, snapshot: &StateSnapshot, surface: &mut Surface) {
        surface.set_checked(CHK_UI_EDIT, snapshot.ui_edit().unwrap_or(false));

        for key in QUICK_TOGGLES {
            let on = snapshot
                .overlay_enabled(key)
                .or_else(|| snapshot.config_bool(key, "enabled"))
                .unwrap_or(false);
            surface.set_checked(&toggle_id(key), on);
        }

        let version = self.displayed_version(snapshot);
        surface.set_disabled(BTN_UPDATE, !self.update_available(&version));
        surface.set_text(APP_VERSION, version);

        surface.set_hidden(RELEASE_NOTES_MODAL, !self.notes_open);
        surface.toggle_classes(RELEASE_NOTES_MODAL, &["hidden"], !self.notes_open);
        surface.set_text(
            RELEASE_NOTES_CONTENT,
            self.notes_html.as_deref().unwrap_or(LOADING_TEXT),
        );
    }

    fn handle(
        &mut self,
        event: &UiEvent,
        _snapshot: Option<&StateSnapshot>,
        _surface: &mut Surface,
    ) -> Reaction {
        match event {
            UiEvent::Toggled { id, checked } if id == CHK_UI_EDIT => {
                Reaction::send(Command::SetUiEdit { on: *checked })
            }
            UiEvent::Toggled { id, checked } => {
                match QUICK_TOGGLES.iter().find(|k| toggle_id(k) == *id) {
                    Some(key) => Reaction::send(Command::set_overlay(*key, *checked)),
                    None => Reaction::none(),
                }
            }
            UiEvent::Clicked { id } if id == BTN_UPDATE => {
                match self.latest.as_ref().and_then(|l| l.download_url.clone()) {
                    Some(url) => Reaction::send(Command::OpenExternal { url }),
                    None => Reaction::none(),
                }
            }
            UiEvent::Clicked { id } if id == BTN_RELEASE_NOTES => {
                // The owner fetches the notes and calls `show_release_notes`.
                self.notes_open = true;
                self.notes_html = None;
                Reaction::rerender()
            }
            UiEvent::Clicked { id } if id == BTN_CLOSE_RELEASE_NOTES || id == RELEASE_NOTES_BACKDROP => {
                self.close_release_notes();
                Reaction::rerender()
            }
            UiEvent::OpenLink { url } => Reaction::send(Command::OpenExternal { url: url.clone() }),
            _ => Reaction::none(),
        }
    }
}
