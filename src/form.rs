//! Create/edit form for user records.
//!
//! Three text inputs with tab-cycle focus, per-field validation messages,
//! and a submitting state that freezes input while the save request is in
//! flight. Validation runs at submit time; nothing leaves the form until
//! every field passes. A field's error clears as soon as its value
//! changes. The phone input additionally re-sanitizes after every edit so
//! pasted punctuation never survives.

use bubbletea_rs::{Cmd, KeyMsg, Msg};
use bubbletea_widgets::{key, textinput};

use crate::record::{self, Draft, FieldErrors, Record, PHONE_LEN};
use crate::theme;

/// Whether a submit creates a new record or replaces an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Edit(i64),
}

/// A validated draft left the form; the parent owns the network call.
#[derive(Debug)]
pub struct SubmitMsg {
    pub mode: Mode,
    pub draft: Draft,
}

/// The form was dismissed without saving.
#[derive(Debug)]
pub struct CancelMsg;

const FIELD_COUNT: usize = 3;
const NAME: usize = 0;
const EMAIL: usize = 1;
const PHONE: usize = 2;

#[derive(Debug)]
struct KeyMap {
    next: key::Binding,
    prev: key::Binding,
    submit: key::Binding,
    cancel: key::Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            next: key::new_binding(vec![
                key::with_keys_str(&["tab", "down"]),
                key::with_help("tab", "next field"),
            ]),
            prev: key::new_binding(vec![
                key::with_keys_str(&["shift+tab", "up"]),
                key::with_help("shift+tab", "previous field"),
            ]),
            submit: key::new_binding(vec![
                key::with_keys_str(&["enter"]),
                key::with_help("enter", "save"),
            ]),
            cancel: key::new_binding(vec![
                key::with_keys_str(&["esc"]),
                key::with_help("esc", "cancel"),
            ]),
        }
    }
}

pub struct Model {
    keymap: KeyMap,
    mode: Mode,
    open: bool,
    submitting: bool,
    focus: usize,
    inputs: [textinput::Model; FIELD_COUNT],
    errors: FieldErrors,
}

impl Model {
    pub fn new() -> Self {
        let mut name = textinput::new();
        name.set_placeholder("Jane Doe");
        name.set_char_limit(120);
        name.set_width(40);

        let mut email = textinput::new();
        email.set_placeholder("jane@example.com");
        email.set_char_limit(120);
        email.set_width(40);

        let mut phone = textinput::new();
        phone.set_placeholder("5512345678");
        phone.set_char_limit(PHONE_LEN as i32);
        phone.set_width(40);

        Self {
            keymap: KeyMap::default(),
            mode: Mode::Create,
            open: false,
            submitting: false,
            focus: NAME,
            inputs: [name, email, phone],
            errors: FieldErrors::default(),
        }
    }

    /// Opens an empty form. Returns the focus command for the name field.
    pub fn open_create(&mut self) -> Cmd {
        self.reset(Mode::Create);
        self.inputs[NAME].focus()
    }

    /// Opens the form pre-filled from an existing record.
    pub fn open_edit(&mut self, record: &Record) -> Cmd {
        self.reset(Mode::Edit(record.id));
        self.inputs[NAME].set_value(&record.full_name);
        self.inputs[EMAIL].set_value(&record.email);
        self.inputs[PHONE].set_value(&record::sanitize_phone(&record.phone));
        self.inputs[NAME].focus()
    }

    pub fn close(&mut self) {
        self.open = false;
        self.submitting = false;
        for input in &mut self.inputs {
            input.blur();
        }
    }

    pub fn active(&self) -> bool {
        self.open
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Re-enables input after a failed save; the form stays open with the
    /// entered values intact.
    pub fn finish_submit(&mut self) {
        self.submitting = false;
    }

    fn reset(&mut self, mode: Mode) {
        self.mode = mode;
        self.open = true;
        self.submitting = false;
        self.focus = NAME;
        self.errors = FieldErrors::default();
        for input in &mut self.inputs {
            input.set_value("");
            input.blur();
        }
    }

    fn draft(&self) -> Draft {
        Draft {
            full_name: self.inputs[NAME].value().trim().to_string(),
            email: self.inputs[EMAIL].value().trim().to_string(),
            phone: record::sanitize_phone(&self.inputs[PHONE].value()),
        }
    }

    fn move_focus(&mut self, forward: bool) -> Cmd {
        self.inputs[self.focus].blur();
        self.focus = if forward {
            (self.focus + 1) % FIELD_COUNT
        } else {
            (self.focus + FIELD_COUNT - 1) % FIELD_COUNT
        };
        self.inputs[self.focus].focus()
    }

    fn submit(&mut self) -> Option<Cmd> {
        let draft = self.draft();
        match draft.validate() {
            Ok(()) => {
                self.errors = FieldErrors::default();
                self.submitting = true;
                let mode = self.mode;
                Some(Box::pin(async move {
                    Some(Box::new(SubmitMsg { mode, draft }) as Msg)
                }))
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }

    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        if !self.open || self.submitting {
            return None;
        }
        let key_msg = msg.downcast_ref::<KeyMsg>()?;

        if self.keymap.cancel.matches(key_msg) {
            return Some(Box::pin(async { Some(Box::new(CancelMsg) as Msg) }));
        }
        if self.keymap.submit.matches(key_msg) {
            return self.submit();
        }
        if self.keymap.next.matches(key_msg) {
            return Some(self.move_focus(true));
        }
        if self.keymap.prev.matches(key_msg) {
            return Some(self.move_focus(false));
        }

        let before = self.inputs[self.focus].value();
        let forwarded: Msg = Box::new(KeyMsg {
            key: key_msg.key,
            modifiers: key_msg.modifiers,
        });
        let cmd = self.inputs[self.focus].update(forwarded);

        if self.focus == PHONE {
            let digits = record::sanitize_phone(&self.inputs[PHONE].value());
            if digits != self.inputs[PHONE].value() {
                self.inputs[PHONE].set_value(&digits);
            }
        }
        if self.inputs[self.focus].value() != before {
            match self.focus {
                NAME => self.errors.full_name = None,
                EMAIL => self.errors.email = None,
                _ => self.errors.phone = None,
            }
        }
        cmd
    }

    pub fn view(&self, spinner_frame: &str) -> String {
        if !self.open {
            return String::new();
        }
        let title = match self.mode {
            Mode::Create => "New user",
            Mode::Edit(_) => "Edit user",
        };
        let mut out = format!("{}\n\n", theme::TITLE.render(title));
        let labels = ["Full name", "Email", "Phone"];
        let errors = [&self.errors.full_name, &self.errors.email, &self.errors.phone];
        for index in 0..FIELD_COUNT {
            let label = if index == self.focus {
                theme::FOCUSED_LABEL.render(labels[index])
            } else {
                theme::BLURRED_LABEL.render(labels[index])
            };
            out.push_str(&label);
            out.push('\n');
            out.push_str(&self.inputs[index].view());
            out.push('\n');
            if let Some(message) = errors[index] {
                out.push_str(&theme::FIELD_ERROR.render(message));
                out.push('\n');
            }
            out.push('\n');
        }
        if self.submitting {
            out.push_str(&format!("{spinner_frame} saving..."));
        } else {
            out.push_str(&theme::HELP.render("enter save • tab next field • esc cancel"));
        }
        theme::DIALOG.render(&out)
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}
