//! Modal confirmation prompt for destructive actions.
//!
//! The prompt is armed with the record it is about to remove and stays
//! open until the user decides or the caller clears it. Decisions reach
//! the parent as [`ConfirmMsg`] or [`CancelMsg`] so the routing stays in
//! the application update loop.

use bubbletea_rs::{Cmd, KeyMsg, Msg};
use bubbletea_widgets::key;

use crate::record::Record;
use crate::theme;

/// The user confirmed removal of the armed record.
#[derive(Debug)]
pub struct ConfirmMsg {
    pub id: i64,
}

/// The user backed out of the prompt.
#[derive(Debug)]
pub struct CancelMsg;

#[derive(Debug)]
struct KeyMap {
    confirm: key::Binding,
    cancel: key::Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            confirm: key::new_binding(vec![
                key::with_keys_str(&["enter", "y"]),
                key::with_help("enter/y", "delete"),
            ]),
            cancel: key::new_binding(vec![
                key::with_keys_str(&["esc", "n"]),
                key::with_help("esc/n", "cancel"),
            ]),
        }
    }
}

/// Confirmation dialog state. Inactive unless armed with a record.
#[derive(Debug, Default)]
pub struct Model {
    keymap: KeyMap,
    target: Option<Record>,
    busy: bool,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the prompt for `record`.
    pub fn arm(&mut self, record: Record) {
        self.target = Some(record);
        self.busy = false;
    }

    /// Closes the prompt and forgets the target.
    pub fn clear(&mut self) {
        self.target = None;
        self.busy = false;
    }

    pub fn active(&self) -> bool {
        self.target.is_some()
    }

    /// Marks the armed record as being deleted; further key presses are
    /// ignored until the caller clears or re-arms the prompt.
    pub fn start_delete(&mut self) {
        self.busy = true;
    }

    /// Keeps the prompt open after a failed delete so the user can retry.
    pub fn finish_delete(&mut self) {
        self.busy = false;
    }

    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        let target = self.target.as_ref()?;
        if self.busy {
            return None;
        }
        let key_msg = msg.downcast_ref::<KeyMsg>()?;
        if self.keymap.confirm.matches(key_msg) {
            let id = target.id;
            return Some(Box::pin(async move {
                Some(Box::new(ConfirmMsg { id }) as Msg)
            }));
        }
        if self.keymap.cancel.matches(key_msg) {
            return Some(Box::pin(async { Some(Box::new(CancelMsg) as Msg) }));
        }
        None
    }

    pub fn view(&self, spinner_frame: &str) -> String {
        let Some(record) = &self.target else {
            return String::new();
        };
        let status = if self.busy {
            format!("{spinner_frame} deleting...")
        } else {
            theme::HELP.render("enter/y delete • esc/n cancel")
        };
        let body = format!(
            "Delete this user?\n\n  {}\n  {}\n  {}\n\n{}",
            record.full_name, record.email, record.phone, status
        );
        theme::DIALOG.render(&body)
    }
}
