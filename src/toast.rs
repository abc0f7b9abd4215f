//! Transient notification banner with timed auto-hide.
//!
//! Showing a toast schedules a [`HideMsg`] after [`AUTO_HIDE`]. Each show
//! bumps an internal tag and the hide message carries the tag it was
//! scheduled with, so replacing a visible toast restarts the full interval
//! instead of inheriting the remainder of the old one. Hide messages from
//! other toast instances are told apart by a unique model id.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use bubbletea_rs::{tick, Cmd, Msg};
use lipgloss_extras::prelude::*;

use crate::theme;

/// How long a toast stays on screen without interaction.
pub const AUTO_HIDE: Duration = Duration::from_millis(3000);

static NEXT_ID: AtomicI64 = AtomicI64::new(1);

fn next_id() -> i64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Severity of a toast, controlling its badge and colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
    Warning,
    Info,
}

impl Level {
    fn badge(self) -> &'static str {
        match self {
            Level::Success => "✓",
            Level::Error => "✗",
            Level::Warning => "!",
            Level::Info => "i",
        }
    }

    fn style(self) -> &'static Style {
        match self {
            Level::Success => &theme::TOAST_SUCCESS,
            Level::Error => &theme::TOAST_ERROR,
            Level::Warning => &theme::TOAST_WARNING,
            Level::Info => &theme::TOAST_INFO,
        }
    }
}

/// Scheduled when a toast is shown; hides it once [`AUTO_HIDE`] elapses.
#[derive(Debug)]
pub struct HideMsg {
    id: i64,
    tag: i64,
}

/// One toast slot. The application owns a single instance; showing while
/// visible replaces the message and restarts the timer.
#[derive(Debug)]
pub struct Model {
    id: i64,
    tag: i64,
    current: Option<(Level, String)>,
}

impl Model {
    pub fn new() -> Self {
        Self {
            id: next_id(),
            tag: 0,
            current: None,
        }
    }

    /// Displays `text` and returns the command that hides it later.
    pub fn show(&mut self, level: Level, text: impl Into<String>) -> Cmd {
        self.tag += 1;
        self.current = Some((level, text.into()));
        let id = self.id;
        let tag = self.tag;
        tick(AUTO_HIDE, move |_| Box::new(HideMsg { id, tag }) as Msg)
    }

    /// Hides the toast immediately. Any in-flight hide message becomes
    /// stale and is ignored when it lands.
    pub fn dismiss(&mut self) {
        self.tag += 1;
        self.current = None;
    }

    pub fn visible(&self) -> bool {
        self.current.is_some()
    }

    /// Applies a [`HideMsg`] if it belongs to this instance and is not
    /// stale.
    pub fn update(&mut self, msg: &Msg) {
        if let Some(hide) = msg.downcast_ref::<HideMsg>() {
            if hide.id == self.id && hide.tag == self.tag {
                self.current = None;
            }
        }
    }

    pub fn view(&self) -> String {
        match &self.current {
            Some((level, text)) => level
                .style()
                .render(&format!("{} {}", level.badge(), text)),
            None => String::new(),
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}
