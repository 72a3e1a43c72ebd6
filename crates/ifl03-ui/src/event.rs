//! UI events coming from the page and the bridge requests they produce.

use ifl03_bridge::Command;

/// A user interaction, already reduced to the element it happened on.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// A checkbox or switch changed.
    Toggled { id: String, checked: bool },
    /// Live edit while dragging or typing; the value is not committed.
    Input { id: String, value: String },
    /// Committed edit (select change, slider release, input blur).
    Changed { id: String, value: String },
    Clicked { id: String },
    /// The user accepted a confirmation prompt raised by `id`.
    Confirmed { id: String },
    /// An overlay card on the overlays grid was picked.
    SelectOverlay { slug: String },
    /// Arrow-pad nudge of the selected overlay, in steps.
    Nudge { dx: i32, dy: i32 },
    /// The remove button of entry `index` in list `list`.
    RemoveItem { list: String, index: usize },
    /// A link that must open in the system browser.
    OpenLink { url: String },
}

impl UiEvent {
    pub fn toggled(id: impl Into<String>, checked: bool) -> Self {
        Self::Toggled {
            id: id.into(),
            checked,
        }
    }

    pub fn input(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Input {
            id: id.into(),
            value: value.into(),
        }
    }

    pub fn changed(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Changed {
            id: id.into(),
            value: value.into(),
        }
    }

    pub fn clicked(id: impl Into<String>) -> Self {
        Self::Clicked { id: id.into() }
    }

    pub fn confirmed(id: impl Into<String>) -> Self {
        Self::Confirmed { id: id.into() }
    }

    pub fn select_overlay(slug: impl Into<String>) -> Self {
        Self::SelectOverlay { slug: slug.into() }
    }
}

/// Banner texts shown once a request settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feedback {
    pub success: &'static str,
    pub failure: &'static str,
}

pub const SETTING_FEEDBACK: Feedback = Feedback {
    success: "Setting saved",
    failure: "Failed to save setting",
};

pub const LIST_FEEDBACK: Feedback = Feedback {
    success: "List updated",
    failure: "Failed to update list",
};

/// One bridge call a page wants made.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub command: Command,
    pub feedback: Option<Feedback>,
}

impl Request {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            feedback: None,
        }
    }

    pub fn with_feedback(command: Command, feedback: Feedback) -> Self {
        Self {
            command,
            feedback: Some(feedback),
        }
    }
}

impl From<Command> for Request {
    fn from(command: Command) -> Self {
        Self::new(command)
    }
}

/// What a page wants done after handling an event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reaction {
    pub requests: Vec<Request>,
    /// Page-local state changed; render again from the current snapshot.
    pub rerender: bool,
}

impl Reaction {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn send(command: Command) -> Self {
        Self {
            requests: vec![Request::new(command)],
            rerender: false,
        }
    }

    pub fn send_with(command: Command, feedback: Feedback) -> Self {
        Self {
            requests: vec![Request::with_feedback(command, feedback)],
            rerender: false,
        }
    }

    pub fn rerender() -> Self {
        Self {
            requests: Vec::new(),
            rerender: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty() && !self.rerender
    }
}
