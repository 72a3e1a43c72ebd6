use std::time::{Duration, Instant};

/// Default lifetime of a status banner.
pub const DEFAULT_STATUS_TTL: Duration = Duration::from_secs(3);

/// Visual flavour of a transient status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Error,
}

impl StatusLevel {
    /// Classes applied to the banner container for this level.
    pub fn classes(&self) -> &'static [&'static str] {
        match self {
            Self::Info => &["bg-blue-100", "border-blue-500", "text-blue-800", "border"],
            Self::Success => &["bg-green-100", "border-green-500", "text-green-800", "border"],
            Self::Error => &["bg-red-100", "border-red-500", "text-red-800", "border"],
        }
    }
}

/// A short-lived, auto-dismissing status line.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
    pub shown_at: Instant,
    pub ttl: Duration,
}

impl StatusMessage {
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.ttl
    }
}

/// Holds at most one visible status message.
///
/// Showing a new message replaces the previous one and restarts the
/// timer, so an older message can never hide a newer one.
#[derive(Debug)]
pub struct StatusBanner {
    current: Option<StatusMessage>,
    ttl: Duration,
}

impl StatusBanner {
    pub fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    pub fn show(&mut self, level: StatusLevel, text: impl Into<String>) {
        self.show_at(level, text, Instant::now());
    }

    pub fn show_at(&mut self, level: StatusLevel, text: impl Into<String>, now: Instant) {
        self.current = Some(StatusMessage {
            level,
            text: text.into(),
            shown_at: now,
            ttl: self.ttl,
        });
    }

    /// The message still on screen at `now`, dropping it once expired.
    pub fn visible_at(&mut self, now: Instant) -> Option<&StatusMessage> {
        if self.current.as_ref().is_some_and(|m| m.is_expired_at(now)) {
            self.current = None;
        }
        self.current.as_ref()
    }

    pub fn visible(&mut self) -> Option<&StatusMessage> {
        self.visible_at(Instant::now())
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Default for StatusBanner {
    fn default() -> Self {
        Self::new(DEFAULT_STATUS_TTL)
    }
}
