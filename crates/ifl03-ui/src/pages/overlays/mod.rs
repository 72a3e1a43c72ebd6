//! Overlays grid and the settings sidebar of the selected overlay.

use std::time::Instant;

use ifl03_bridge::{Command, StateSnapshot};
use serde_json::Value;
use tracing::debug;

use super::{title_case, Page, PageOptions, SaveFeedback};
use crate::catalog::{self, FieldDefault, FieldKind, FieldSink, FieldSpec, OverlayDescriptor, OVERLAYS};
use crate::event::{Reaction, UiEvent};
use crate::surface::{Element, Surface};


pub const SETTINGS_SIDEBAR: &str = "overlay-settings";
pub const TITLE: &str = "overlay-title";
pub const BOOL_SECTION_TITLE: &str = "overlay-general-bool-section-title";
pub const BOOL_LIST_DESCRIPTION: &str = "overlay-bool-list-description";
pub const BOOL_LIST: &str = "overlay-bool-list";
pub const ENABLED_TOGGLE: &str = "overlay-toggle";
pub const SHOW_MENU: &str = "overlay-show-menu";
pub const SHOW_RACE: &str = "overlay-show-race";
pub const HOTKEY: &str = "overlay-hotkey";
pub const POSITION: &str = "overlay-position";
pub const OPACITY: &str = "overlay-opacity";
pub const OPACITY_LABEL: &str = "opacity-value";
pub const TARGET_FPS: &str = "overlay-target-fps";
pub const TARGET_FPS_LABEL: &str = "target-fps-value";
pub const SAVE_BUTTON: &str = "save-overlay-settings";
pub const CENTER_BUTTON: &str = "overlay-center";

const BOOL_PREFIX: &str = "bool-";
const ENABLED_BORDER: [&str; 2] = ["border-2", "border-green-500"];

/// Keys with their own dedicated control in the sidebar.
const DEDICATED_BOOL_KEYS: [&str; 3] = ["enabled", "show_in_menu", "show_in_race"];

const DEFAULT_POSITION: &str = "top-left";
const DEFAULT_OPACITY: i64 = 100;

pub struct OverlaysPage {
    options: PageOptions,
    selected: Option<&'static OverlayDescriptor>,
    save_feedback: Option<SaveFeedback>,
}

impl OverlaysPage {
    pub fn new(options: PageOptions) -> Self {
        Self {
            options,
            selected: None,
            save_feedback: None,
        }
    }

    pub fn selected(&self) -> Option<&'static OverlayDescriptor> {
        self.selected
    }

    fn render_cards(&self, snapshot: &StateSnapshot, surface: &mut Surface) {
        for overlay in OVERLAYS {
            let enabled = snapshot
                .config_bool(overlay.config_key, "enabled")
                .or_else(|| snapshot.overlay_enabled(overlay.config_key))
                .unwrap_or(false);
            surface.toggle_classes(&overlay.card_id(), &ENABLED_BORDER, enabled);
        }
    }

    fn render_sidebar(
        &self,
        overlay: &OverlayDescriptor,
        snapshot: &StateSnapshot,
        surface: &mut Surface,
    ) {
        let key = overlay.config_key;

        surface.set_text(TITLE, format!("{} Settings", overlay.name));
        surface.set_text(BOOL_SECTION_TITLE, format!("{} Options", overlay.name));
        surface.set_text(
            BOOL_LIST_DESCRIPTION,
            format!("All options for the {} configuration.", overlay.name),
        );
        surface.replace_children(BOOL_LIST, bool_toggles(snapshot, key));

        surface.set_checked(
            ENABLED_TOGGLE,
            snapshot.config_bool(key, "enabled").unwrap_or(false),
        );
        surface.set_checked(
            SHOW_MENU,
            snapshot.config_bool(key, "show_in_menu").unwrap_or(true),
        );
        surface.set_checked(
            SHOW_RACE,
            snapshot.config_bool(key, "show_in_race").unwrap_or(true),
        );
        surface.set_value(
            HOTKEY,
            snapshot.config_str(key, "toggle_hotkey").unwrap_or_default(),
        );
        surface.set_value(
            POSITION,
            snapshot
                .config_str(key, "position")
                .filter(|p| !p.is_empty())
                .unwrap_or(DEFAULT_POSITION),
        );

        let opacity = snapshot
            .config_f64(key, "opacity")
            .map(|v| v.round() as i64)
            .unwrap_or(DEFAULT_OPACITY);
        surface.set_value(OPACITY, opacity.to_string());
        surface.set_text(OPACITY_LABEL, format!("{opacity}%"));

        let fps = snapshot
            .config_i64(key, "target_fps")
            .unwrap_or(overlay.default_target_fps);
        surface.set_value(TARGET_FPS, fps.to_string());
        surface.set_text(TARGET_FPS_LABEL, fps.to_string());

        for field in overlay.fields {
            render_field(field, &field_value(snapshot, key, field), surface);
        }
    }

    fn field_request(
        &self,
        overlay: &OverlayDescriptor,
        field: &FieldSpec,
        raw: &str,
    ) -> Option<Command> {
        let raw = raw.trim();
        let component = overlay.config_key;
        match (field.sink, field.kind) {
            (FieldSink::PreviewWeatherType, _) => parse_int(raw).map(|value| Command::SetPreviewWeatherType { value }),
            (FieldSink::Config, FieldKind::Int) => {
                parse_int(raw).map(|v| Command::config_int(component, field.key, v))
            }
            (FieldSink::Config, FieldKind::Float) => raw
                .parse::<f64>()
                .ok()
                .and_then(|v| Command::config_float(component, field.key, v)),
            (FieldSink::Config, FieldKind::Str) => {
                Some(Command::config_string(component, field.key, raw))
            }
        }
    }
}

impl Default for OverlaysPage {
    fn default() -> Self {
        Self::new(PageOptions::default())
    }
}

impl Page for OverlaysPage {
    fn name(&self) -> &'static str {
        "overlays"
    }

    fn element_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = [
            SETTINGS_SIDEBAR,
            TITLE,
            BOOL_SECTION_TITLE,
            BOOL_LIST_DESCRIPTION,
            BOOL_LIST,
            ENABLED_TOGGLE,
            SHOW_MENU,
            SHOW_RACE,
            HOTKEY,
            POSITION,
            OPACITY,
            OPACITY_LABEL,
            TARGET_FPS,
            TARGET_FPS_LABEL,
            SAVE_BUTTON,
            CENTER_BUTTON,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        ids.extend(catalog::element_ids());
        ids
    }

    fn render(&self, snapshot: &StateSnapshot, surface: &mut Surface) {
        self.render_cards(snapshot, surface);

        surface.set_hidden(SETTINGS_SIDEBAR, self.selected.is_none());
        for overlay in OVERLAYS {
            if let Some(row) = overlay.settings_row {
                let shown = self.selected.is_some_and(|s| s.slug == overlay.slug);
                surface.set_hidden(row, !shown);
            }
        }

        if let Some(overlay) = self.selected {
            self.render_sidebar(overlay, snapshot, surface);
        }
    }

    fn handle(
        &mut self,
        event: &UiEvent,
        _snapshot: Option<&StateSnapshot>,
        surface: &mut Surface,
    ) -> Reaction {
        if let UiEvent::SelectOverlay { slug } = event {
            return match catalog::find(slug) {
                Some(overlay) => {
                    self.selected = Some(overlay);
                    Reaction::rerender()
                }
                None => {
                    debug!(slug = %slug, "unknown overlay selected");
                    Reaction::none()
                }
            };
        }

        let Some(overlay) = self.selected else {
            return Reaction::none();
        };
        let component = overlay.config_key;

        match event {
            UiEvent::Toggled { id, checked } if id == ENABLED_TOGGLE => {
                surface.toggle_classes(&overlay.card_id(), &ENABLED_BORDER, *checked);
                Reaction::send(Command::set_overlay(component, *checked))
            }
            UiEvent::Toggled { id, checked } if id == SHOW_MENU => {
                Reaction::send(Command::config_bool(component, "show_in_menu", *checked))
            }
            UiEvent::Toggled { id, checked } if id == SHOW_RACE => {
                Reaction::send(Command::config_bool(component, "show_in_race", *checked))
            }
            UiEvent::Toggled { id, checked } => match id.strip_prefix(BOOL_PREFIX) {
                Some(key) => Reaction::send(Command::config_bool(component, key, *checked)),
                None => Reaction::none(),
            },

            UiEvent::Changed { id, value } if id == HOTKEY => Reaction::send(Command::SetHotkey {
                component: component.to_string(),
                key: "toggle_hotkey".to_string(),
                value: value.clone(),
            }),
            UiEvent::Changed { id, value } if id == POSITION => {
                Reaction::send(Command::SetOverlayPosition {
                    component: component.to_string(),
                    position: value.clone(),
                })
            }

            UiEvent::Input { id, value } if id == OPACITY => {
                if let Some(v) = parse_int(value) {
                    surface.set_text(OPACITY_LABEL, format!("{v}%"));
                }
                Reaction::none()
            }
            UiEvent::Changed { id, value } if id == OPACITY => match parse_int(value) {
                Some(opacity) => {
                    surface.set_text(OPACITY_LABEL, format!("{opacity}%"));
                    Reaction::send(Command::SetOverlayOpacity {
                        component: component.to_string(),
                        opacity,
                    })
                }
                None => Reaction::none(),
            },

            UiEvent::Input { id, value } if id == TARGET_FPS => {
                if let Some(v) = parse_int(value) {
                    surface.set_text(TARGET_FPS_LABEL, v.to_string());
                }
                Reaction::none()
            }
            UiEvent::Changed { id, value } if id == TARGET_FPS => match parse_int(value) {
                Some(fps) => {
                    surface.set_text(TARGET_FPS_LABEL, fps.to_string());
                    Reaction::send(Command::config_int(component, "target_fps", fps))
                }
                None => Reaction::none(),
            },

            UiEvent::Input { id, value } => {
                if let Some(field) = overlay.field(id) {
                    update_label(field, value, surface);
                }
                Reaction::none()
            }
            UiEvent::Changed { id, value } => {
                // Fields of other overlays are hidden and never sent.
                let Some(field) = overlay.field(id) else {
                    return Reaction::none();
                };
                update_label(field, value, surface);
                match self.field_request(overlay, field, value) {
                    Some(command) => Reaction::send(command),
                    None => {
                        debug!(field = field.key, value = %value, "ignoring unparsable field value");
                        Reaction::none()
                    }
                }
            }

            UiEvent::Nudge { dx, dy } => {
                let step = self.options.nudge_step;
                Reaction::send(Command::MoveOverlayDelta {
                    component: component.to_string(),
                    dx: dx.saturating_mul(step),
                    dy: dy.saturating_mul(step),
                })
            }
            UiEvent::Clicked { id } if id == CENTER_BUTTON => {
                Reaction::send(Command::CenterOverlay {
                    component: component.to_string(),
                })
            }
            UiEvent::Clicked { id } if id == SAVE_BUTTON => {
                // Every control persists on change; saving only acknowledges.
                let now = Instant::now();
                let duration = self.options.save_feedback;
                self.save_feedback = Some(match self.save_feedback.take() {
                    Some(active) => active.restart(surface, duration, now),
                    None => SaveFeedback::start(SAVE_BUTTON, surface, duration, now),
                });
                Reaction::none()
            }
            _ => Reaction::none(),
        }
    }

    fn tick(&mut self, now: Instant, surface: &mut Surface) {
        self.save_feedback = self
            .save_feedback
            .take()
            .and_then(|fb| fb.expire(now, surface));
    }
}

// =============================================================================
// FIELD HELPERS
// =============================================================================

/// One switch per free-form boolean key, sorted by key.
fn bool_toggles(snapshot: &StateSnapshot, component: &str) -> Vec<(String, Element)> {
    let Some(cfg) = snapshot.component(component) else {
        return Vec::new();
    };
    let mut keys: Vec<(&String, bool)> = cfg
        .iter()
        .filter(|(k, _)| !DEDICATED_BOOL_KEYS.contains(&k.as_str()))
        .filter_map(|(k, v)| v.as_bool().map(|b| (k, b)))
        .collect();
    keys.sort_by(|a, b| a.0.cmp(b.0));

    keys.into_iter()
        .map(|(key, checked)| {
            let element = Element {
                checked,
                text: title_case(key),
                value: key.clone(),
                ..Element::default()
            };
            (format!("{BOOL_PREFIX}{key}"), element)
        })
        .collect()
}

/// Resolve a field: own value, then the inherited component, then default.
fn field_value(snapshot: &StateSnapshot, component: &str, field: &FieldSpec) -> String {
    read_field(snapshot, component, field)
        .or_else(|| field.inherit_from.and_then(|parent| read_field(snapshot, parent, field)))
        .unwrap_or_else(|| default_text(field.default))
}

fn read_field(snapshot: &StateSnapshot, component: &str, field: &FieldSpec) -> Option<String> {
    match field.kind {
        FieldKind::Int => snapshot.config_i64(component, field.key).map(|v| v.to_string()),
        FieldKind::Float => snapshot.config_f64(component, field.key).map(format_number),
        FieldKind::Str => match snapshot.config_value(component, field.key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        },
    }
}

fn default_text(default: FieldDefault) -> String {
    match default {
        FieldDefault::Int(v) => v.to_string(),
        FieldDefault::Float(v) => format_number(v),
        FieldDefault::Str(s) => s.to_string(),
    }
}

fn render_field(field: &FieldSpec, value: &str, surface: &mut Surface) {
    surface.set_value(field.element, value);
    update_label(field, value, surface);
}

fn update_label(field: &FieldSpec, value: &str, surface: &mut Surface) {
    let Some(label) = field.label else {
        return;
    };
    let text = match field.label_decimals {
        Some(decimals) => match value.trim().parse::<f64>() {
            Ok(v) => format!("{v:.decimals$}"),
            Err(_) => return,
        },
        None => value.to_string(),
    };
    surface.set_text(label, text);
}

fn format_number(v: f64) -> String {
    format!("{v}")
}

/// Leading-integer parse of a control value; `"45.7"` reads as 45.
fn parse_int(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<i64>() {
        return Some(v);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.trunc() as i64)
}
