//! General settings and per-car configuration profiles.

use std::time::Instant;

use ifl03_bridge::{Command, StateSnapshot};

use super::{Page, PageOptions, SaveFeedback};
use crate::event::{Reaction, Request, UiEvent};
use crate::surface::{SelectOption, Surface};

pub const CHK_PERFORMANCE_MODE: &str = "chk_performance_mode";
pub const SEL_UNITS: &str = "sel_units";
pub const BTN_RESET_DEFAULTS: &str = "btn-reset-defaults";
pub const BTN_SAVE: &str = "save_settings";
pub const CURRENT_CAR: &str = "current-car";
pub const CURRENT_CAR_CONFIG: &str = "current-car-config";
pub const CAR_CONFIG_SELECT: &str = "car-config-select";
pub const BTN_CAR_SAVE: &str = "btn-car-save";
pub const BTN_CAR_LOAD: &str = "btn-car-load";
pub const BTN_CAR_COPY: &str = "btn-car-copy";
pub const BTN_CAR_DELETE: &str = "btn-car-delete";

const GENERAL: &str = "General";
const DEFAULT_UNITS: &str = "metric";

pub struct SettingsPage {
    options: PageOptions,
    /// Car profile picked in the select, if the user changed it.
    picked_config: Option<String>,
    save_feedback: Option<SaveFeedback>,
}

impl SettingsPage {
    pub fn new(options: PageOptions) -> Self {
        Self {
            options,
            picked_config: None,
            save_feedback: None,
        }
    }

    /// Profile the car buttons act on: the picked one if it still exists,
    /// else the active one.
    fn target_config(&self, snapshot: Option<&StateSnapshot>) -> Option<String> {
        let snapshot = snapshot?;
        let available = snapshot.available_car_configs();
        self.picked_config
            .as_deref()
            .filter(|p| available.contains(p))
            .or_else(|| snapshot.current_car_config().filter(|c| !c.is_empty()))
            .map(str::to_string)
    }

    fn current_car(snapshot: Option<&StateSnapshot>) -> Option<String> {
        snapshot
            .and_then(StateSnapshot::current_car)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
    }
}

impl Default for SettingsPage {
    fn default() -> Self {
        Self::new(PageOptions::default())
    }
}

impl Page for SettingsPage {
    fn name(&self) -> &'static str {
        "settings"
    }

    fn element_ids(&self) -> Vec<String> {
        [
            CHK_PERFORMANCE_MODE,
            SEL_UNITS,
            BTN_RESET_DEFAULTS,
            BTN_SAVE,
            CURRENT_CAR,
            CURRENT_CAR_CONFIG,
            CAR_CONFIG_SELECT,
            BTN_CAR_SAVE,
            BTN_CAR_LOAD,
            BTN_CAR_COPY,
            BTN_CAR_DELETE,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn render(&self, snapshot: &StateSnapshot, surface: &mut Surface) {
        surface.set_checked(
            CHK_PERFORMANCE_MODE,
            snapshot
                .config_bool(GENERAL, "performance_mode_30hz")
                .unwrap_or(false),
        );
        surface.set_value(
            SEL_UNITS,
            snapshot
                .config_str(GENERAL, "units")
                .filter(|u| !u.is_empty())
                .unwrap_or(DEFAULT_UNITS),
        );

        let car = snapshot.current_car().filter(|c| !c.is_empty());
        surface.set_text(CURRENT_CAR, car.unwrap_or("-"));
        surface.set_text(
            CURRENT_CAR_CONFIG,
            snapshot
                .current_car_config()
                .filter(|c| !c.is_empty())
                .unwrap_or("-"),
        );

        let available = snapshot.available_car_configs();
        surface.set_options(
            CAR_CONFIG_SELECT,
            available
                .iter()
                .map(|name| SelectOption::new(*name, *name))
                .collect(),
        );
        let target = self.target_config(Some(snapshot));
        surface.set_value(CAR_CONFIG_SELECT, target.clone().unwrap_or_default());

        surface.set_disabled(BTN_CAR_SAVE, car.is_none());
        surface.set_disabled(BTN_CAR_LOAD, target.is_none());
        surface.set_disabled(BTN_CAR_DELETE, target.is_none());
        surface.set_disabled(BTN_CAR_COPY, target.is_none() || car.is_none());
    }

    fn handle(
        &mut self,
        event: &UiEvent,
        snapshot: Option<&StateSnapshot>,
        surface: &mut Surface,
    ) -> Reaction {
        match event {
            UiEvent::Toggled { id, checked } if id == CHK_PERFORMANCE_MODE => {
                Reaction::send(Command::SetPerformanceMode { on: *checked })
            }
            UiEvent::Changed { id, value } if id == SEL_UNITS => {
                Reaction::send(Command::config_string(GENERAL, "units", value.as_str()))
            }
            UiEvent::Confirmed { id } if id == BTN_RESET_DEFAULTS => {
                Reaction::send(Command::ResetConfig)
            }
            UiEvent::Clicked { id } if id == BTN_SAVE => {
                let mut requests = Vec::new();
                if let Some(units) = surface.value(SEL_UNITS).filter(|u| !u.is_empty()) {
                    requests.push(Request::new(Command::config_string(GENERAL, "units", units)));
                }
                requests.push(Request::new(Command::SaveSettings {
                    performance_mode_30hz: surface.is_checked(CHK_PERFORMANCE_MODE),
                }));

                let now = Instant::now();
                let duration = self.options.save_feedback;
                self.save_feedback = Some(match self.save_feedback.take() {
                    Some(active) => active.restart(surface, duration, now),
                    None => SaveFeedback::start(BTN_SAVE, surface, duration, now),
                });
                Reaction {
                    requests,
                    rerender: false,
                }
            }

            UiEvent::Changed { id, value } if id == CAR_CONFIG_SELECT => {
                self.picked_config = Some(value.clone()).filter(|v| !v.is_empty());
                Reaction::rerender()
            }
            UiEvent::Clicked { id } if id == BTN_CAR_SAVE => match Self::current_car(snapshot) {
                Some(car_name) => Reaction::send(Command::SaveCarConfig { car_name }),
                None => Reaction::none(),
            },
            UiEvent::Clicked { id } if id == BTN_CAR_LOAD => match self.target_config(snapshot) {
                Some(car_name) => Reaction::send(Command::LoadCarConfig { car_name }),
                None => Reaction::none(),
            },
            UiEvent::Clicked { id } if id == BTN_CAR_COPY => {
                match (self.target_config(snapshot), Self::current_car(snapshot)) {
                    (Some(from_car), Some(to_car)) if from_car != to_car => {
                        Reaction::send(Command::CopyCarConfig { from_car, to_car })
                    }
                    _ => Reaction::none(),
                }
            }
            UiEvent::Confirmed { id } if id == BTN_CAR_DELETE => {
                match self.target_config(snapshot) {
                    Some(car_name) => {
                        self.picked_config = None;
                        Reaction::send(Command::DeleteCarConfig { car_name })
                    }
                    None => Reaction::none(),
                }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::{render, surface_for};
    use serde_json::json;
    use std::time::Duration;

    fn snap(value: serde_json::Value) -> StateSnapshot {
        StateSnapshot::from_value(value).unwrap()
    }

    fn cars() -> StateSnapshot {
        snap(json!({
            "currentCar": "Porsche 911 GT3 R",
            "currentCarConfig": "Porsche 911 GT3 R",
            "availableCarConfigs": ["Porsche 911 GT3 R", "BMW M4 GT3"]
        }))
    }

    fn commands(reaction: Reaction) -> Vec<Command> {
        reaction.requests.into_iter().map(|r| r.command).collect()
    }

    #[test]
    fn defaults_when_general_missing() {
        let page = SettingsPage::default();
        let mut surface = surface_for(&page);
        render(&page, Some(&snap(json!({ "config": {} }))), &mut surface);

        assert_eq!(surface.is_checked(CHK_PERFORMANCE_MODE), Some(false));
        assert_eq!(surface.value(SEL_UNITS), Some("metric"));
        assert_eq!(surface.text(CURRENT_CAR), Some("-"));
        assert_eq!(surface.is_disabled(BTN_CAR_SAVE), Some(true));
    }

    #[test]
    fn general_values_render() {
        let page = SettingsPage::default();
        let mut surface = surface_for(&page);
        render(
            &page,
            Some(&snap(json!({ "config": { "General": {
                "performance_mode_30hz": true,
                "units": "imperial"
            } } }))),
            &mut surface,
        );
        assert_eq!(surface.is_checked(CHK_PERFORMANCE_MODE), Some(true));
        assert_eq!(surface.value(SEL_UNITS), Some("imperial"));
    }

    #[test]
    fn reset_requires_confirmation() {
        let mut page = SettingsPage::default();
        let mut surface = surface_for(&page);
        assert!(page
            .handle(&UiEvent::clicked(BTN_RESET_DEFAULTS), None, &mut surface)
            .is_empty());
        assert_eq!(
            commands(page.handle(&UiEvent::confirmed(BTN_RESET_DEFAULTS), None, &mut surface)),
            vec![Command::ResetConfig]
        );
    }

    #[test]
    fn save_sends_units_then_save_settings() {
        let mut page = SettingsPage::default();
        let mut surface = surface_for(&page);
        surface.set_text(BTN_SAVE, "Save");
        surface.set_value(SEL_UNITS, "imperial");
        surface.set_checked(CHK_PERFORMANCE_MODE, true);

        let sent = commands(page.handle(&UiEvent::clicked(BTN_SAVE), None, &mut surface));
        assert_eq!(
            sent,
            vec![
                Command::config_string("General", "units", "imperial"),
                Command::SaveSettings {
                    performance_mode_30hz: Some(true)
                },
            ]
        );
        assert_eq!(surface.text(BTN_SAVE), Some("Saved!"));

        page.tick(Instant::now() + Duration::from_secs(3), &mut surface);
        assert_eq!(surface.text(BTN_SAVE), Some("Save"));
    }

    #[test]
    fn car_profile_select_and_buttons() {
        let mut page = SettingsPage::default();
        let mut surface = surface_for(&page);
        let s = cars();
        render(&page, Some(&s), &mut surface);

        assert_eq!(surface.value(CAR_CONFIG_SELECT), Some("Porsche 911 GT3 R"));
        assert_eq!(surface.element(CAR_CONFIG_SELECT).unwrap().options.len(), 2);
        assert_eq!(surface.is_disabled(BTN_CAR_COPY), Some(false));

        page.handle(&UiEvent::changed(CAR_CONFIG_SELECT, "BMW M4 GT3"), Some(&s), &mut surface);
        render(&page, Some(&s), &mut surface);
        assert_eq!(surface.value(CAR_CONFIG_SELECT), Some("BMW M4 GT3"));

        assert_eq!(
            commands(page.handle(&UiEvent::clicked(BTN_CAR_LOAD), Some(&s), &mut surface)),
            vec![Command::LoadCarConfig {
                car_name: "BMW M4 GT3".into()
            }]
        );
        assert_eq!(
            commands(page.handle(&UiEvent::clicked(BTN_CAR_COPY), Some(&s), &mut surface)),
            vec![Command::CopyCarConfig {
                from_car: "BMW M4 GT3".into(),
                to_car: "Porsche 911 GT3 R".into()
            }]
        );
        assert_eq!(
            commands(page.handle(&UiEvent::clicked(BTN_CAR_SAVE), Some(&s), &mut surface)),
            vec![Command::SaveCarConfig {
                car_name: "Porsche 911 GT3 R".into()
            }]
        );
        assert_eq!(
            commands(page.handle(&UiEvent::confirmed(BTN_CAR_DELETE), Some(&s), &mut surface)),
            vec![Command::DeleteCarConfig {
                car_name: "BMW M4 GT3".into()
            }]
        );
    }

    #[test]
    fn stale_pick_falls_back_to_active_profile() {
        let mut page = SettingsPage::default();
        let mut surface = surface_for(&page);
        page.handle(&UiEvent::changed(CAR_CONFIG_SELECT, "Deleted Car"), None, &mut surface);

        render(&page, Some(&cars()), &mut surface);
        assert_eq!(surface.value(CAR_CONFIG_SELECT), Some("Porsche 911 GT3 R"));
    }
}
