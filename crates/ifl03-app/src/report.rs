//! Plain-text rendering of the home page for the terminal.

use std::fmt::Write;

use ifl03_bridge::StateSnapshot;
use ifl03_ui::connection::CONN_TEXT;
use ifl03_ui::controller::{STATUS_MESSAGE, STATUS_TEXT};
use ifl03_ui::pages::home::{APP_VERSION, BTN_UPDATE, CHK_UI_EDIT};
use ifl03_ui::{LatestRelease, Surface, OVERLAYS};

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

/// Summary of a rendered home surface plus the full overlay list.
pub fn summarize(surface: &Surface, snapshot: Option<&StateSnapshot>) -> String {
    let Some(snapshot) = snapshot else {
        return "No state received from the backend.\n".to_string();
    };

    let mut out = String::new();
    let _ = writeln!(out, "Connection: {}", surface.text(CONN_TEXT).unwrap_or("UNKNOWN"));
    let _ = writeln!(
        out,
        "Edit mode:  {}",
        on_off(surface.is_checked(CHK_UI_EDIT).unwrap_or(false))
    );
    let _ = writeln!(out, "Preview:    {}", on_off(snapshot.preview_mode().unwrap_or(false)));
    let _ = writeln!(out, "Version:    {}", surface.text(APP_VERSION).unwrap_or("-"));
    if surface.is_disabled(BTN_UPDATE) == Some(false) {
        let _ = writeln!(out, "Update:     available");
    }
    let _ = writeln!(out, "Overlays:");
    for overlay in OVERLAYS {
        let enabled = snapshot
            .overlay_enabled(overlay.config_key)
            .or_else(|| snapshot.config_bool(overlay.config_key, "enabled"))
            .unwrap_or(false);
        let mark = if enabled { 'x' } else { ' ' };
        let _ = writeln!(out, "  [{mark}] {:<18} {}", overlay.name, overlay.slug);
    }
    out
}

/// Banner text when the banner is showing.
pub fn status_line(surface: &Surface) -> Option<&str> {
    if surface.is_hidden(STATUS_MESSAGE).unwrap_or(true) {
        return None;
    }
    surface.text(STATUS_TEXT).filter(|t| !t.is_empty())
}

/// One-line answer for `check-update`.
pub fn update_line(installed: Option<&str>, latest: Option<&LatestRelease>, newer: bool) -> String {
    match (installed, latest) {
        (_, None) => "Could not determine the latest release.".to_string(),
        (Some(current), Some(latest)) if newer => {
            let mut line = format!("Update available: {current} -> {}", latest.version);
            if let Some(url) = &latest.download_url {
                let _ = write!(line, " ({url})");
            }
            line
        }
        (Some(current), Some(_)) => format!("Up to date ({current})."),
        (None, Some(latest)) => format!("Latest release: {}", latest.version),
    }
}
