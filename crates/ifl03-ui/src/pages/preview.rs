use ifl03_bridge::{Command, StateSnapshot};

use super::Page;
use crate::event::{Reaction, UiEvent};
use crate::surface::Surface;

pub const CHK_UI_EDIT: &str = "chk_uiEdit";
pub const CHK_PREVIEW_MODE: &str = "chk_previewMode";

/// Edit-mode and preview-mode switches.
#[derive(Debug, Default)]
pub struct PreviewPage;

impl PreviewPage {
    pub fn new() -> Self {
        Self
    }
}

impl Page for PreviewPage {
    fn name(&self) -> &'static str {
        "preview"
    }

    fn element_ids(&self) -> Vec<String> {
        vec![CHK_UI_EDIT.into(), CHK_PREVIEW_MODE.into()]
    }

    fn render(&self, snapshot: &StateSnapshot, surface: &mut Surface) {
        surface.set_checked(CHK_UI_EDIT, snapshot.ui_edit().unwrap_or(false));
        surface.set_checked(CHK_PREVIEW_MODE, snapshot.preview_mode().unwrap_or(false));
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
            UiEvent::Toggled { id, checked } if id == CHK_PREVIEW_MODE => {
                Reaction::send(Command::SetPreviewMode { on: *checked })
            }
            _ => Reaction::none(),
        }
    }
}
