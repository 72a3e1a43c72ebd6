//! Driver lists, ghost telemetry and UI preferences.

use ifl03_bridge::{Command, StateSnapshot};

use super::Page;
use crate::event::{Reaction, Request, UiEvent, LIST_FEEDBACK, SETTING_FEEDBACK};
use crate::surface::{Element, SelectOption, Surface};

pub const GHOST_SELECT: &str = "ghostTelemetrySelect";
pub const GHOST_SHOW_TOGGLE: &str = "ghostShowToggle";
pub const OVERLAYS_HELP_TOGGLE: &str = "toggle-overlays-help";

const GENERAL: &str = "General";
const EMPTY_LIST_TEXT: &str = "No entries";

/// A persisted string list edited with an input, an add button and
/// per-entry remove buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringList {
    pub key: &'static str,
    pub input: &'static str,
    pub add_button: &'static str,
    pub container: &'static str,
}

pub const BUDDIES: StringList = StringList {
    key: "buddies",
    input: "buddies-input",
    add_button: "buddies-add",
    container: "buddies-list",
};

pub const FLAGGED: StringList = StringList {
    key: "flagged",
    input: "flagged-input",
    add_button: "flagged-add",
    container: "flagged-list",
};

const LISTS: [StringList; 2] = [BUDDIES, FLAGGED];

impl StringList {
    /// Raw entries as persisted, non-string values skipped.
    fn raw<'a>(&self, snapshot: &'a StateSnapshot) -> Vec<&'a str> {
        snapshot
            .config_string_list(GENERAL, self.key)
            .unwrap_or_default()
    }

    /// Entries trimmed with blanks dropped.
    fn sanitized(&self, snapshot: &StateSnapshot) -> Vec<String> {
        sanitize(&self.raw(snapshot))
    }

    fn update(&self, values: Vec<String>) -> Request {
        Request::with_feedback(
            Command::config_string_vec(GENERAL, self.key, values),
            LIST_FEEDBACK,
        )
    }

    fn render(&self, snapshot: &StateSnapshot, surface: &mut Surface) {
        let entries = self.sanitized(snapshot);
        let children = if entries.is_empty() {
            vec![(
                format!("{}-empty", self.container),
                Element {
                    text: EMPTY_LIST_TEXT.to_string(),
                    ..Element::default()
                },
            )]
        } else {
            entries
                .iter()
                .enumerate()
                .map(|(idx, name)| {
                    (
                        format!("{}-{idx}", self.container),
                        Element {
                            text: name.clone(),
                            ..Element::default()
                        },
                    )
                })
                .collect()
        };
        surface.set_items(self.container, entries);
        surface.replace_children(self.container, children);
    }
}

fn sanitize(raw: &[&str]) -> Vec<String> {
    raw.iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Default)]
pub struct UserPage;

impl UserPage {
    pub fn new() -> Self {
        Self
    }

    fn add_entry(list: &StringList, snapshot: Option<&StateSnapshot>, surface: &mut Surface) -> Reaction {
        let value = surface.value(list.input).unwrap_or_default().trim().to_string();
        if value.is_empty() {
            return Reaction::none();
        }
        let mut values = snapshot.map(|s| list.sanitized(s)).unwrap_or_default();
        values.push(value);
        surface.set_value(list.input, "");
        Reaction {
            requests: vec![list.update(values)],
            rerender: false,
        }
    }

    fn remove_entry(list: &StringList, index: usize, snapshot: Option<&StateSnapshot>) -> Reaction {
        let Some(snapshot) = snapshot else {
            return Reaction::none();
        };
        // Indices refer to the displayed, sanitized entries.
        let mut values = list.sanitized(snapshot);
        if index >= values.len() {
            return Reaction::none();
        }
        values.remove(index);
        Reaction {
            requests: vec![list.update(values)],
            rerender: false,
        }
    }
}

impl Page for UserPage {
    fn name(&self) -> &'static str {
        "user"
    }

    fn element_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = [GHOST_SELECT, GHOST_SHOW_TOGGLE, OVERLAYS_HELP_TOGGLE]
            .iter()
            .map(|s| s.to_string())
            .collect();
        for list in LISTS {
            ids.extend([list.input, list.add_button, list.container].map(String::from));
        }
        ids
    }

    fn render(&self, snapshot: &StateSnapshot, surface: &mut Surface) {
        for list in LISTS {
            list.render(snapshot, surface);
        }

        let ghost = snapshot.ghost_telemetry();
        let none_label = if ghost.files.is_empty() {
            "No CSV files found"
        } else {
            "None"
        };
        let mut options = vec![SelectOption::new("", none_label)];
        options.extend(ghost.files.iter().map(|f| SelectOption::new(f.as_str(), f.as_str())));
        surface.set_options(GHOST_SELECT, options);
        surface.set_value(GHOST_SELECT, ghost.selected.unwrap_or_default());

        surface.set_checked(
            GHOST_SHOW_TOGGLE,
            snapshot
                .config_bool("OverlayInputs", "show_ghost_data")
                .unwrap_or(false),
        );
        surface.set_checked(
            OVERLAYS_HELP_TOGGLE,
            snapshot
                .config_bool(GENERAL, "show_overlays_help")
                .unwrap_or(true),
        );
    }

    /// Persisted lists holding blank entries are written back cleaned.
    fn follow_up(&self, snapshot: &StateSnapshot) -> Vec<Request> {
        LISTS
            .iter()
            .filter_map(|list| {
                let raw = list.raw(snapshot);
                let clean = sanitize(&raw);
                (clean.len() != raw.len()).then(|| list.update(clean))
            })
            .collect()
    }

    fn handle(
        &mut self,
        event: &UiEvent,
        snapshot: Option<&StateSnapshot>,
        surface: &mut Surface,
    ) -> Reaction {
        match event {
            UiEvent::Clicked { id } => match LISTS.iter().find(|l| l.add_button == id.as_str()) {
                Some(list) => Self::add_entry(list, snapshot, surface),
                None => Reaction::none(),
            },
            UiEvent::RemoveItem { list, index } => {
                match LISTS.iter().find(|l| l.container == list.as_str()) {
                    Some(list) => Self::remove_entry(list, *index, snapshot),
                    None => Reaction::none(),
                }
            }
            UiEvent::Changed { id, value } if id == GHOST_SELECT => Reaction::send_with(
                Command::config_string(GENERAL, "ghost_telemetry_file", value.as_str()),
                SETTING_FEEDBACK,
            ),
            UiEvent::Toggled { id, checked } if id == GHOST_SHOW_TOGGLE => Reaction::send_with(
                Command::config_bool("OverlayInputs", "show_ghost_data", *checked),
                SETTING_FEEDBACK,
            ),
            UiEvent::Toggled { id, checked } if id == OVERLAYS_HELP_TOGGLE => Reaction::send_with(
                Command::config_bool(GENERAL, "show_overlays_help", *checked),
                SETTING_FEEDBACK,
            ),
            _ => Reaction::none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::{render, surface_for};
    use serde_json::json;

    fn snap(value: serde_json::Value) -> StateSnapshot {
        StateSnapshot::from_value(value).unwrap()
    }

    #[test]
    fn lists_render_sanitized_entries() {
        let page = UserPage::new();
        let mut surface = surface_for(&page);
        render(
            &page,
            Some(&snap(json!({ "config": { "General": {
                "buddies": ["  Max ", "", "Lando"],
                "flagged": []
            } } }))),
            &mut surface,
        );

        assert_eq!(surface.element("buddies-list").unwrap().items, vec!["Max", "Lando"]);
        assert_eq!(surface.children("buddies-list"), vec!["buddies-list-0", "buddies-list-1"]);
        assert_eq!(surface.text("buddies-list-0"), Some("Max"));
        assert_eq!(surface.text("flagged-list-empty"), Some(EMPTY_LIST_TEXT));
    }

    #[test]
    fn blank_entries_trigger_cleanup() {
        let page = UserPage::new();
        let s = snap(json!({ "config": { "General": {
            "buddies": ["Max", "   "],
            "flagged": ["Bob"]
        } } }));

        let follow_up = page.follow_up(&s);
        assert_eq!(follow_up.len(), 1);
        assert_eq!(
            follow_up[0].command,
            Command::config_string_vec("General", "buddies", vec!["Max".to_string()])
        );
        assert_eq!(follow_up[0].feedback, Some(LIST_FEEDBACK));

        let clean = snap(json!({ "config": { "General": { "buddies": ["Max"] } } }));
        assert!(page.follow_up(&clean).is_empty());
    }

    #[test]
    fn add_appends_trimmed_value_and_clears_input() {
        let mut page = UserPage::new();
        let mut surface = surface_for(&page);
        let s = snap(json!({ "config": { "General": { "flagged": ["Bob"] } } }));
        surface.set_value("flagged-input", "  Carl ");

        let reaction = page.handle(&UiEvent::clicked("flagged-add"), Some(&s), &mut surface);
        assert_eq!(
            reaction.requests[0].command,
            Command::config_string_vec(
                "General",
                "flagged",
                vec!["Bob".to_string(), "Carl".to_string()]
            )
        );
        assert_eq!(surface.value("flagged-input"), Some(""));
    }

    #[test]
    fn add_with_blank_input_does_nothing() {
        let mut page = UserPage::new();
        let mut surface = surface_for(&page);
        surface.set_value("buddies-input", "   ");
        assert!(page
            .handle(&UiEvent::clicked("buddies-add"), None, &mut surface)
            .is_empty());
    }

    #[test]
    fn remove_by_displayed_index() {
        let mut page = UserPage::new();
        let mut surface = surface_for(&page);
        let s = snap(json!({ "config": { "General": { "buddies": ["", "Max", "Lando"] } } }));

        let reaction = page.handle(
            &UiEvent::RemoveItem {
                list: "buddies-list".into(),
                index: 0,
            },
            Some(&s),
            &mut surface,
        );
        assert_eq!(
            reaction.requests[0].command,
            Command::config_string_vec("General", "buddies", vec!["Lando".to_string()])
        );

        let out_of_range = page.handle(
            &UiEvent::RemoveItem {
                list: "buddies-list".into(),
                index: 5,
            },
            Some(&s),
            &mut surface,
        );
        assert!(out_of_range.is_empty());
    }

    #[test]
    fn ghost_telemetry_select() {
        let page = UserPage::new();
        let mut surface = surface_for(&page);

        render(&page, Some(&snap(json!({}))), &mut surface);
        let select = surface.element(GHOST_SELECT).unwrap();
        assert_eq!(select.options, vec![SelectOption::new("", "No CSV files found")]);
        assert_eq!(select.value, "");
        assert_eq!(surface.is_checked(OVERLAYS_HELP_TOGGLE), Some(true));

        render(
            &page,
            Some(&snap(json!({
                "ghostTelemetry": { "files": ["spa.csv", "monza.csv"], "selected": "monza.csv" },
                "config": { "OverlayInputs": { "show_ghost_data": true } }
            }))),
            &mut surface,
        );
        let select = surface.element(GHOST_SELECT).unwrap();
        assert_eq!(select.options.len(), 3);
        assert_eq!(select.options[0].label, "None");
        assert_eq!(select.value, "monza.csv");
        assert_eq!(surface.is_checked(GHOST_SHOW_TOGGLE), Some(true));
    }

    #[test]
    fn preferences_carry_setting_feedback() {
        let mut page = UserPage::new();
        let mut surface = surface_for(&page);
        let reaction = page.handle(
            &UiEvent::toggled(OVERLAYS_HELP_TOGGLE, false),
            None,
            &mut surface,
        );
        assert_eq!(
            reaction.requests[0].command,
            Command::config_bool("General", "show_overlays_help", false)
        );
        assert_eq!(reaction.requests[0].feedback, Some(SETTING_FEEDBACK));
    }
}
