//! Page-side half of the bridge: the overlay catalog, a surface model of
//! each page's controls, per-page render passes, and the controller that
//! ties a page to the bridge client.

pub mod catalog;
pub mod connection;
pub mod controller;
pub mod event;
pub mod pages;
pub mod surface;

pub use catalog::{FieldDefault, FieldKind, FieldSink, FieldSpec, OverlayDescriptor, OVERLAYS};
pub use controller::PageController;
pub use event::{Feedback, Reaction, Request, UiEvent};
pub use pages::{
    render, surface_for, HomePage, LatestRelease, OverlaysPage, Page, PageOptions, PreviewPage,
    SettingsPage, UserPage,
};
pub use surface::{Element, SelectOption, Surface};
