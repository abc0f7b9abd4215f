//! Shared lipgloss styles for the terminal UI.
//!
//! All colors are adaptive so the console stays readable on both light and
//! dark terminal themes. Components pull these statics instead of carrying
//! their own style fields.

use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;
use once_cell::sync::Lazy;

/// Application title block.
pub static TITLE: Lazy<Style> = Lazy::new(|| {
    Style::new()
        .background(Color::from("62"))
        .foreground(Color::from("230"))
        .padding(0, 1, 0, 1)
        .bold(true)
});

/// Table header row.
pub static HEADER: Lazy<Style> = Lazy::new(|| {
    Style::new()
        .foreground(AdaptiveColor {
            Light: "#1A1A1A",
            Dark: "#DDDDDD",
        })
        .bold(true)
});

/// The currently selected table row.
pub static SELECTED_ROW: Lazy<Style> = Lazy::new(|| {
    Style::new()
        .background(Color::from("57"))
        .foreground(Color::from("230"))
});

/// De-emphasized chrome: counts, pagination, placeholders.
pub static SUBDUED: Lazy<Style> = Lazy::new(|| {
    Style::new().foreground(AdaptiveColor {
        Light: "#9B9B9B",
        Dark: "#5C5C5C",
    })
});

/// Help line at the bottom of the screen.
pub static HELP: Lazy<Style> = Lazy::new(|| {
    Style::new().foreground(AdaptiveColor {
        Light: "#B2B2B2",
        Dark: "#4A4A4A",
    })
});

/// Spinner glyphs.
pub static SPINNER: Lazy<Style> = Lazy::new(|| {
    Style::new().foreground(AdaptiveColor {
        Light: "#8E8E8E",
        Dark: "#747373",
    })
});

/// Persistent error banner above the table.
pub static ERROR_BANNER: Lazy<Style> = Lazy::new(|| {
    Style::new()
        .foreground(Color::from("196"))
        .border_style(lipgloss::normal_border())
        .border_left(true)
        .border_left_foreground(Color::from("196"))
        .padding(0, 1, 0, 1)
});

/// Inline validation message under a form field.
pub static FIELD_ERROR: Lazy<Style> = Lazy::new(|| Style::new().foreground(Color::from("203")));

/// Label of the focused form field.
pub static FOCUSED_LABEL: Lazy<Style> = Lazy::new(|| {
    Style::new()
        .foreground(Color::from("205"))
        .bold(true)
});

/// Label of a blurred form field.
pub static BLURRED_LABEL: Lazy<Style> = Lazy::new(|| {
    Style::new().foreground(AdaptiveColor {
        Light: "#4A4A4A",
        Dark: "#B2B2B2",
    })
});

/// Accent bar drawn on the left edge of the form and confirmation dialogs.
pub static DIALOG: Lazy<Style> = Lazy::new(|| {
    Style::new()
        .border_style(lipgloss::normal_border())
        .border_left(true)
        .border_left_foreground(Color::from("62"))
        .padding(1, 2, 1, 2)
});

/// Success toast.
pub static TOAST_SUCCESS: Lazy<Style> = Lazy::new(|| {
    Style::new()
        .background(Color::from("34"))
        .foreground(Color::from("230"))
        .padding(0, 1, 0, 1)
});

/// Error toast.
pub static TOAST_ERROR: Lazy<Style> = Lazy::new(|| {
    Style::new()
        .background(Color::from("196"))
        .foreground(Color::from("230"))
        .padding(0, 1, 0, 1)
});

/// Warning toast.
pub static TOAST_WARNING: Lazy<Style> = Lazy::new(|| {
    Style::new()
        .background(Color::from("214"))
        .foreground(Color::from("235"))
        .padding(0, 1, 0, 1)
});

/// Informational toast.
pub static TOAST_INFO: Lazy<Style> = Lazy::new(|| {
    Style::new()
        .background(Color::from("39"))
        .foreground(Color::from("230"))
        .padding(0, 1, 0, 1)
});
