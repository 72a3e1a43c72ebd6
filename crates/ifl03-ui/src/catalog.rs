//! Declarative table of the overlays the backend can render.
//!
//! Every overlay shares the same sidebar controls. Overlay-specific
//! settings are expressed as [`FieldSpec`] rows so one generic render and
//! dispatch path handles all of them.

/// Value kind of an extra setting; picks the `setConfig*` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Int,
    Float,
    Str,
}

/// Where a field's edits are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSink {
    /// `setConfig{Int,Float,String}` on the overlay's own component.
    Config,
    /// `setPreviewWeatherType`, which the backend keeps outside the config.
    PreviewWeatherType,
}

/// Value shown when neither the overlay nor its parent carries the key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    Int(i64),
    Float(f64),
    Str(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub element: &'static str,
    pub key: &'static str,
    pub kind: FieldKind,
    pub default: FieldDefault,
    /// Component consulted when the overlay's own value is missing.
    pub inherit_from: Option<&'static str>,
    /// Element echoing the current value as text.
    pub label: Option<&'static str>,
    /// Fixed decimals for the label; `None` prints the value as is.
    pub label_decimals: Option<usize>,
    pub sink: FieldSink,
}

impl FieldSpec {
    const fn config(element: &'static str, key: &'static str, kind: FieldKind, default: FieldDefault) -> Self {
        Self {
            element,
            key,
            kind,
            default,
            inherit_from: None,
            label: None,
            label_decimals: None,
            sink: FieldSink::Config,
        }
    }

    const fn inherit(mut self, component: &'static str) -> Self {
        self.inherit_from = Some(component);
        self
    }

    const fn labelled(mut self, label: &'static str, decimals: Option<usize>) -> Self {
        self.label = Some(label);
        self.label_decimals = decimals;
        self
    }

    const fn sink(mut self, sink: FieldSink) -> Self {
        self.sink = sink;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayDescriptor {
    pub slug: &'static str,
    pub name: &'static str,
    pub config_key: &'static str,
    pub description: &'static str,
    pub default_target_fps: i64,
    /// Container shown only while this overlay is selected.
    pub settings_row: Option<&'static str>,
    pub fields: &'static [FieldSpec],
}

impl OverlayDescriptor {
    /// Id of the card's icon container on the overlays grid.
    pub fn card_id(&self) -> String {
        format!("card-{}", self.slug)
    }

    pub fn field(&self, element: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.element == element)
    }
}

/// Component whose font settings the text-heavy overlays inherit.
pub const SHARED_OVERLAY_COMPONENT: &str = "Overlay";

macro_rules! font_fields {
    ($prefix:literal) => {
        &[
            FieldSpec::config(concat!($prefix, "-font"), "font", FieldKind::Str, FieldDefault::Str("Poppins"))
                .inherit(SHARED_OVERLAY_COMPONENT),
            FieldSpec::config(concat!($prefix, "-font-size"), "font_size", FieldKind::Float, FieldDefault::Float(16.0))
                .inherit(SHARED_OVERLAY_COMPONENT),
            FieldSpec::config(concat!($prefix, "-font-spacing"), "font_spacing", FieldKind::Float, FieldDefault::Float(0.30))
                .inherit(SHARED_OVERLAY_COMPONENT),
            FieldSpec::config(concat!($prefix, "-font-style"), "font_style", FieldKind::Str, FieldDefault::Str("normal"))
                .inherit(SHARED_OVERLAY_COMPONENT),
            FieldSpec::config(concat!($prefix, "-font-weight"), "font_weight", FieldKind::Int, FieldDefault::Int(500))
                .inherit(SHARED_OVERLAY_COMPONENT)
                .labelled(concat!($prefix, "-font-weight-value"), None),
        ]
    };
}

const STANDINGS_FIELDS: &[FieldSpec] = font_fields!("overlay-standings");
const FUEL_FIELDS: &[FieldSpec] = font_fields!("overlay-fuel");
const RELATIVE_FIELDS: &[FieldSpec] = font_fields!("overlay-relative");

const INPUTS_FIELDS: &[FieldSpec] = &[FieldSpec::config(
    "overlay-inputs-steering",
    "steering_wheel",
    FieldKind::Str,
    FieldDefault::Str("builtin"),
)];

const WEATHER_FIELDS: &[FieldSpec] = &[FieldSpec::config(
    "overlay-preview-weather-type",
    "preview_weather_type",
    FieldKind::Int,
    FieldDefault::Str(""),
)
.sink(FieldSink::PreviewWeatherType)];

const DELTA_FIELDS: &[FieldSpec] = &[FieldSpec::config(
    "overlay-delta-reference-mode",
    "reference_mode",
    FieldKind::Int,
    FieldDefault::Int(1),
)];

const TIRE_FIELDS: &[FieldSpec] = &[
    FieldSpec::config("overlay-tire-temp-cool", "temp_cool_c", FieldKind::Float, FieldDefault::Float(60.0)),
    FieldSpec::config("overlay-tire-temp-opt", "temp_opt_c", FieldKind::Float, FieldDefault::Float(85.0)),
    FieldSpec::config("overlay-tire-temp-hot", "temp_hot_c", FieldKind::Float, FieldDefault::Float(105.0)),
];

const TRACK_FIELDS: &[FieldSpec] = &[FieldSpec::config(
    "track-width-slider",
    "track_width",
    FieldKind::Float,
    FieldDefault::Float(6.0),
)
.labelled("track-width-value", Some(1))];

const fn overlay(
    slug: &'static str,
    name: &'static str,
    config_key: &'static str,
    description: &'static str,
    default_target_fps: i64,
) -> OverlayDescriptor {
    OverlayDescriptor {
        slug,
        name,
        config_key,
        description,
        default_target_fps,
        settings_row: None,
        fields: &[],
    }
}

const fn with_row(
    mut descriptor: OverlayDescriptor,
    row: &'static str,
    fields: &'static [FieldSpec],
) -> OverlayDescriptor {
    descriptor.settings_row = Some(row);
    descriptor.fields = fields;
    descriptor
}

pub static OVERLAYS: &[OverlayDescriptor] = &[
    with_row(
        overlay("standings", "Standings", "OverlayStandings", "Race position and timing", 10),
        "overlay-standings-font-row",
        STANDINGS_FIELDS,
    ),
    overlay("ddu", "DDU", "OverlayDDU", "Driver display unit", 10),
    with_row(
        overlay("fuel", "Fuel", "OverlayFuel", "Fuel calculator", 10),
        "overlay-fuel-font-row",
        FUEL_FIELDS,
    ),
    with_row(
        overlay("inputs", "Inputs", "OverlayInputs", "Driving inputs", 30),
        "overlay-inputs-steering-row",
        INPUTS_FIELDS,
    ),
    with_row(
        overlay("relative", "Relative", "OverlayRelative", "Relative timing", 10),
        "overlay-relative-font-row",
        RELATIVE_FIELDS,
    ),
    overlay("cover", "Cover", "OverlayCover", "Cover overlay", 10),
    with_row(
        overlay(
            "weather",
            "Weather",
            "OverlayWeather",
            "Weather conditions and track information",
            10,
        ),
        "overlay-preview-weather-row",
        WEATHER_FIELDS,
    ),
    overlay("flags", "Flags", "OverlayFlags", "Displays active iRacing session flags", 10),
    with_row(
        overlay("delta", "Delta", "OverlayDelta", "Lap time delta comparison to best lap", 15),
        "overlay-delta-reference-row",
        DELTA_FIELDS,
    ),
    with_row(
        overlay("tire", "Tire", "OverlayTire", "Tire health, temperature, pressure and laps", 10),
        "overlay-tire-settings-row",
        TIRE_FIELDS,
    ),
    overlay("radar", "Radar", "OverlayRadar", "Proximity radar for nearby cars", 10),
    with_row(
        overlay("track", "Track Map", "OverlayTrack", "Track map with live car position", 15),
        "overlay-track-width-row",
        TRACK_FIELDS,
    ),
    overlay("pit", "Pit Entry", "OverlayPit", "Distance to pitlane entry", 30),
];

pub fn find(slug: &str) -> Option<&'static OverlayDescriptor> {
    OVERLAYS.iter().find(|o| o.slug == slug)
}

/// Every element id the catalog contributes to the overlays page.
pub fn element_ids() -> Vec<String> {
    let mut ids = Vec::new();
    for overlay in OVERLAYS {
        ids.push(overlay.card_id());
        if let Some(row) = overlay.settings_row {
            ids.push(row.to_string());
        }
        for field in overlay.fields {
            ids.push(field.element.to_string());
            if let Some(label) = field.label {
                ids.push(label.to_string());
            }
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn thirteen_unique_overlays() {
        assert_eq!(OVERLAYS.len(), 13);
        let slugs: HashSet<_> = OVERLAYS.iter().map(|o| o.slug).collect();
        let keys: HashSet<_> = OVERLAYS.iter().map(|o| o.config_key).collect();
        assert_eq!(slugs.len(), 13);
        assert_eq!(keys.len(), 13);
        assert!(OVERLAYS.iter().all(|o| o.config_key.starts_with("Overlay")));
    }

    #[test]
    fn target_fps_defaults() {
        let fps = |slug| find(slug).unwrap().default_target_fps;
        assert_eq!(fps("inputs"), 30);
        assert_eq!(fps("pit"), 30);
        assert_eq!(fps("delta"), 15);
        assert_eq!(fps("track"), 15);
        assert_eq!(fps("standings"), 10);
        assert_eq!(fps("radar"), 10);
    }

    #[test]
    fn font_fields_inherit_from_shared_component() {
        for slug in ["standings", "fuel", "relative"] {
            let overlay = find(slug).unwrap();
            assert_eq!(overlay.fields.len(), 5);
            assert!(overlay
                .fields
                .iter()
                .all(|f| f.inherit_from == Some(SHARED_OVERLAY_COMPONENT)));
        }
        let size = find("fuel").unwrap().field("overlay-fuel-font-size").unwrap();
        assert_eq!(size.default, FieldDefault::Float(16.0));
        assert_eq!(size.kind, FieldKind::Float);
    }

    #[test]
    fn weather_type_uses_dedicated_command() {
        let field = find("weather").unwrap().fields[0];
        assert_eq!(field.sink, FieldSink::PreviewWeatherType);
        assert_eq!(field.default, FieldDefault::Str(""));
    }

    #[test]
    fn element_ids_are_unique() {
        let ids = element_ids();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(ids.len(), unique.len());
        assert!(ids.contains(&"card-ddu".to_string()));
        assert!(ids.contains(&"track-width-value".to_string()));
    }
}
