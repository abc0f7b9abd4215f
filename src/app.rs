//! Top-level application model: the record table, search, and modal flow.
//!
//! The model owns every component and routes messages between them. Data
//! arrives through typed messages produced by async commands; components
//! never talk to the network themselves. A monotonic sequence number
//! guards the debounced search so late timers and out-of-order responses
//! cannot clobber newer results.

use std::time::Duration;

use bubbletea_rs::{batch, quit, tick, Cmd, KeyMsg, Model as BubbleTeaModel, Msg};
use bubbletea_widgets::spinner::{self, with_spinner, with_style, MINI_DOT};
use bubbletea_widgets::{key, paginator, textinput};
use unicode_width::UnicodeWidthStr;

use crate::api;
use crate::confirm;
use crate::form::{self, Mode};
use crate::record::{Draft, Record};
use crate::theme;
use crate::toast;

/// How long the search input must stay unchanged before the remote search
/// fires.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Rows shown per table page.
pub const PAGE_SIZE: usize = 10;

const NAME_WIDTH: usize = 24;
const EMAIL_WIDTH: usize = 28;
const PHONE_WIDTH: usize = 12;

/// The full record list arrived.
#[derive(Debug)]
pub struct RecordsLoadedMsg {
    pub records: Vec<Record>,
}

/// Loading the record list failed.
#[derive(Debug)]
pub struct LoadFailedMsg {
    pub error: String,
}

/// The search debounce timer fired.
#[derive(Debug)]
pub struct SearchTickMsg {
    pub seq: u64,
}

/// Remote search results arrived.
#[derive(Debug)]
pub struct SearchResultsMsg {
    pub seq: u64,
    pub records: Vec<Record>,
}

/// Remote search failed; the caller falls back to local filtering.
#[derive(Debug)]
pub struct SearchFailedMsg {
    pub seq: u64,
}

/// A create or update completed.
#[derive(Debug)]
pub struct SaveDoneMsg {
    pub message: &'static str,
}

/// A create or update failed.
#[derive(Debug)]
pub struct SaveFailedMsg {
    pub error: String,
}

/// A delete completed.
#[derive(Debug)]
pub struct DeleteDoneMsg;

/// A delete failed; the confirmation prompt stays open.
#[derive(Debug)]
pub struct DeleteFailedMsg {
    pub error: String,
}

struct KeyMap {
    quit: key::Binding,
    search: key::Binding,
    create: key::Binding,
    edit: key::Binding,
    delete: key::Binding,
    refresh: key::Binding,
    dismiss: key::Binding,
    up: key::Binding,
    down: key::Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            quit: key::new_binding(vec![
                key::with_keys_str(&["q", "ctrl+c"]),
                key::with_help("q", "quit"),
            ]),
            search: key::new_binding(vec![
                key::with_keys_str(&["/"]),
                key::with_help("/", "search"),
            ]),
            create: key::new_binding(vec![
                key::with_keys_str(&["n"]),
                key::with_help("n", "new user"),
            ]),
            edit: key::new_binding(vec![
                key::with_keys_str(&["e"]),
                key::with_help("e", "edit"),
            ]),
            delete: key::new_binding(vec![
                key::with_keys_str(&["d"]),
                key::with_help("d", "delete"),
            ]),
            refresh: key::new_binding(vec![
                key::with_keys_str(&["r"]),
                key::with_help("r", "reload"),
            ]),
            dismiss: key::new_binding(vec![
                key::with_keys_str(&["x"]),
                key::with_help("x", "dismiss"),
            ]),
            up: key::new_binding(vec![
                key::with_keys_str(&["up", "k"]),
                key::with_help("↑/k", "up"),
            ]),
            down: key::new_binding(vec![
                key::with_keys_str(&["down", "j"]),
                key::with_help("↓/j", "down"),
            ]),
        }
    }
}

/// The admin console model.
pub struct App {
    keymap: KeyMap,
    spinner: spinner::Model,
    paginator: paginator::Model,
    search: textinput::Model,
    form: form::Model,
    confirm: confirm::Model,
    toast: toast::Model,

    records: Vec<Record>,
    filtered: Vec<Record>,
    cursor: usize,
    loading: bool,
    banner: Option<String>,
    search_seq: u64,
}

impl App {
    fn new() -> Self {
        let sp = spinner::new(&[
            with_spinner(MINI_DOT.clone()),
            with_style(theme::SPINNER.clone()),
        ]);
        let mut pager = paginator::Model::new();
        pager.per_page = PAGE_SIZE;

        let mut search = textinput::new();
        search.set_placeholder("type to search name, email, or phone");
        search.set_char_limit(120);
        search.set_width(48);

        Self {
            keymap: KeyMap::default(),
            spinner: sp,
            paginator: pager,
            search,
            form: form::Model::new(),
            confirm: confirm::Model::new(),
            toast: toast::Model::new(),
            records: Vec::new(),
            filtered: Vec::new(),
            cursor: 0,
            loading: false,
            banner: None,
            search_seq: 0,
        }
    }

    fn query(&self) -> String {
        self.search.value().trim().to_string()
    }

    fn selected(&self) -> Option<&Record> {
        self.filtered.get(self.cursor)
    }

    /// Replaces the visible rows and clamps pagination and selection.
    fn set_filtered(&mut self, records: Vec<Record>, reset_cursor: bool) {
        self.filtered = records;
        self.paginator.set_total_items(self.filtered.len());
        if reset_cursor {
            self.cursor = 0;
            self.paginator.page = 0;
        } else if !self.filtered.is_empty() && self.cursor >= self.filtered.len() {
            self.cursor = self.filtered.len() - 1;
        }
        self.sync_page_to_cursor();
    }

    fn sync_page_to_cursor(&mut self) {
        if self.paginator.per_page > 0 {
            self.paginator.page = self.cursor / self.paginator.per_page;
        }
    }

    fn local_matches(&self) -> Vec<Record> {
        let query = self.query();
        self.records
            .iter()
            .filter(|record| record.matches_query(&query))
            .cloned()
            .collect()
    }

    /// Re-applies the current query over a fresh record list. Runs locally;
    /// the remote search only fires from the debounce timer.
    fn reapply_filter(&mut self) {
        let rows = if self.query().is_empty() {
            self.records.clone()
        } else {
            self.local_matches()
        };
        self.set_filtered(rows, false);
    }

    fn start_load(&mut self) -> Cmd {
        self.loading = true;
        load_records()
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.filtered.is_empty() {
            return;
        }
        let last = self.filtered.len() - 1;
        self.cursor = if delta < 0 {
            self.cursor.saturating_sub(delta.unsigned_abs())
        } else {
            (self.cursor + delta.unsigned_abs()).min(last)
        };
        self.sync_page_to_cursor();
    }

    fn handle_search_change(&mut self) -> Option<Cmd> {
        self.search_seq += 1;
        if self.query().is_empty() {
            // An emptied query resets instantly without touching the
            // network.
            let rows = self.records.clone();
            self.set_filtered(rows, true);
            return None;
        }
        let seq = self.search_seq;
        Some(tick(SEARCH_DEBOUNCE, move |_| {
            Box::new(SearchTickMsg { seq }) as Msg
        }))
    }

    fn handle_table_key(&mut self, key_msg: &KeyMsg) -> Option<Cmd> {
        if self.keymap.quit.matches(key_msg) {
            return Some(quit());
        }
        if self.keymap.search.matches(key_msg) {
            return Some(self.search.focus());
        }
        if self.keymap.dismiss.matches(key_msg) {
            self.banner = None;
            self.toast.dismiss();
            return None;
        }
        if self.keymap.up.matches(key_msg) {
            self.move_cursor(-1);
            return None;
        }
        if self.keymap.down.matches(key_msg) {
            self.move_cursor(1);
            return None;
        }
        if !self.loading {
            if self.keymap.refresh.matches(key_msg) {
                return Some(self.start_load());
            }
            if self.keymap.create.matches(key_msg) {
                return Some(self.form.open_create());
            }
            if self.keymap.edit.matches(key_msg) {
                if let Some(record) = self.selected().cloned() {
                    return Some(self.form.open_edit(&record));
                }
                return None;
            }
            if self.keymap.delete.matches(key_msg) {
                if let Some(record) = self.selected().cloned() {
                    self.confirm.arm(record);
                }
                return None;
            }
        }

        // Page keys are the paginator's own bindings.
        let page_before = self.paginator.page;
        let forwarded: Msg = Box::new(KeyMsg {
            key: key_msg.key,
            modifiers: key_msg.modifiers,
        });
        self.paginator.update(&forwarded);
        if self.paginator.page != page_before {
            self.cursor = self.paginator.page * self.paginator.per_page;
        }
        None
    }

    fn handle_search_key(&mut self, key_msg: &KeyMsg) -> Option<Cmd> {
        use crossterm::event::KeyCode;

        match key_msg.key {
            KeyCode::Esc => {
                self.search.blur();
                if !self.query().is_empty() {
                    self.search.set_value("");
                    self.search_seq += 1;
                    let rows = self.records.clone();
                    self.set_filtered(rows, true);
                }
                None
            }
            KeyCode::Enter => {
                self.search.blur();
                None
            }
            _ => {
                let before = self.search.value();
                let forwarded: Msg = Box::new(KeyMsg {
                    key: key_msg.key,
                    modifiers: key_msg.modifiers,
                });
                let cmd = self.search.update(forwarded);
                if self.search.value() != before {
                    return self.handle_search_change().or(cmd);
                }
                cmd
            }
        }
    }

    fn handle_data_msg(&mut self, msg: &Msg) -> Option<Option<Cmd>> {
        if let Some(loaded) = msg.downcast_ref::<RecordsLoadedMsg>() {
            self.loading = false;
            self.banner = None;
            self.records = loaded.records.clone();
            self.reapply_filter();
            return Some(None);
        }
        if let Some(failed) = msg.downcast_ref::<LoadFailedMsg>() {
            self.loading = false;
            self.banner = Some(failed.error.clone());
            // A failed load empties the table; stale rows would suggest a
            // fresh server read that never happened.
            self.records.clear();
            self.set_filtered(Vec::new(), true);
            return Some(Some(
                self.toast.show(toast::Level::Error, failed.error.clone()),
            ));
        }
        if let Some(tick_msg) = msg.downcast_ref::<SearchTickMsg>() {
            if tick_msg.seq != self.search_seq || self.query().is_empty() {
                return Some(None);
            }
            return Some(Some(search_records(tick_msg.seq, self.query())));
        }
        if let Some(results) = msg.downcast_ref::<SearchResultsMsg>() {
            if results.seq == self.search_seq {
                self.set_filtered(results.records.clone(), true);
            }
            return Some(None);
        }
        if let Some(failed) = msg.downcast_ref::<SearchFailedMsg>() {
            if failed.seq == self.search_seq {
                let rows = self.local_matches();
                self.set_filtered(rows, true);
            }
            return Some(None);
        }
        if let Some(done) = msg.downcast_ref::<SaveDoneMsg>() {
            self.form.close();
            let toast_cmd = self.toast.show(toast::Level::Success, done.message);
            return Some(Some(batch(vec![toast_cmd, self.start_load()])));
        }
        if let Some(failed) = msg.downcast_ref::<SaveFailedMsg>() {
            self.form.finish_submit();
            self.banner = Some(failed.error.clone());
            return Some(Some(
                self.toast.show(toast::Level::Error, failed.error.clone()),
            ));
        }
        if msg.downcast_ref::<DeleteDoneMsg>().is_some() {
            self.confirm.clear();
            let toast_cmd = self
                .toast
                .show(toast::Level::Success, "user deleted successfully");
            return Some(Some(batch(vec![toast_cmd, self.start_load()])));
        }
        if let Some(failed) = msg.downcast_ref::<DeleteFailedMsg>() {
            self.confirm.finish_delete();
            self.banner = Some(failed.error.clone());
            return Some(Some(
                self.toast.show(toast::Level::Error, failed.error.clone()),
            ));
        }
        None
    }

    fn view_table(&self) -> String {
        let mut out = String::new();
        out.push_str(&theme::TITLE.render("Userdeck"));
        if self.loading {
            out.push(' ');
            out.push_str(&self.spinner.view());
            out.push_str(&theme::SUBDUED.render(" loading..."));
        }
        out.push_str("\n\n");

        if let Some(error) = &self.banner {
            out.push_str(&theme::ERROR_BANNER.render(&format!("{error}  (x to dismiss)")));
            out.push_str("\n\n");
        }

        out.push_str("Search: ");
        out.push_str(&self.search.view());
        out.push_str("\n\n");

        out.push_str(&theme::HEADER.render(&format!(
            "{:>4}  {}  {}  {}",
            "#",
            pad("Name", NAME_WIDTH),
            pad("Email", EMAIL_WIDTH),
            pad("Phone", PHONE_WIDTH),
        )));
        out.push('\n');

        if self.filtered.is_empty() {
            let placeholder = if self.query().is_empty() {
                "no users yet"
            } else {
                "no users match this search"
            };
            out.push_str(&theme::SUBDUED.render(placeholder));
            out.push('\n');
        } else {
            let (start, end) = self.paginator.get_slice_bounds(self.filtered.len());
            for (offset, record) in self.filtered[start..end].iter().enumerate() {
                let index = start + offset;
                let line = format!(
                    "{:>4}  {}  {}  {}",
                    index + 1,
                    pad(&record.full_name, NAME_WIDTH),
                    pad(&record.email, EMAIL_WIDTH),
                    pad(&record.phone, PHONE_WIDTH),
                );
                if index == self.cursor {
                    out.push_str(&theme::SELECTED_ROW.render(&line));
                } else {
                    out.push_str(&line);
                }
                out.push('\n');
            }
        }

        out.push('\n');
        out.push_str(&theme::SUBDUED.render(&format!(
            "showing {} of {} users",
            self.filtered.len(),
            self.records.len()
        )));
        if self.paginator.total_pages > 1 {
            out.push_str(&theme::SUBDUED.render(&format!("  page {}", self.paginator.view())));
        }
        out.push('\n');

        out.push_str(&theme::HELP.render(
            "n new • e edit • d delete • / search • ←/→ page • r reload • q quit",
        ));
        out
    }

    fn view_toast_line(&self) -> String {
        if self.toast.visible() {
            format!("\n\n{}", self.toast.view())
        } else {
            String::new()
        }
    }
}

impl BubbleTeaModel for App {
    fn init() -> (Self, Option<Cmd>) {
        let mut app = App::new();
        app.loading = true;
        let spinner_cmd = app.spinner.update(Box::new(app.spinner.tick_msg()));
        let mut cmds = vec![load_records()];
        if let Some(cmd) = spinner_cmd {
            cmds.push(cmd);
        }
        (app, Some(batch(cmds)))
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if msg.downcast_ref::<spinner::TickMsg>().is_some() {
            return self.spinner.update(msg);
        }
        self.toast.update(&msg);

        if let Some(result) = self.handle_data_msg(&msg) {
            return result;
        }

        if self.form.active() {
            if let Some(submit) = msg.downcast_ref::<form::SubmitMsg>() {
                return Some(save_record(submit.mode, submit.draft.clone()));
            }
            if msg.downcast_ref::<form::CancelMsg>().is_some() {
                self.form.close();
                return None;
            }
            return self.form.update(&msg);
        }

        if self.confirm.active() {
            if let Some(confirmed) = msg.downcast_ref::<confirm::ConfirmMsg>() {
                self.confirm.start_delete();
                return Some(delete_record(confirmed.id));
            }
            if msg.downcast_ref::<confirm::CancelMsg>().is_some() {
                self.confirm.clear();
                return None;
            }
            return self.confirm.update(&msg);
        }

        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            if self.search.focused() {
                return self.handle_search_key(key_msg);
            }
            return self.handle_table_key(key_msg);
        }
        None
    }

    fn view(&self) -> String {
        if self.form.active() {
            return format!("{}{}", self.form.view(&self.spinner.view()), self.view_toast_line());
        }
        if self.confirm.active() {
            return format!(
                "{}{}",
                self.confirm.view(&self.spinner.view()),
                self.view_toast_line()
            );
        }
        format!("{}{}", self.view_table(), self.view_toast_line())
    }
}

fn pad(text: &str, width: usize) -> String {
    let text_width = UnicodeWidthStr::width(text);
    if text_width >= width {
        return text.to_string();
    }
    let mut padded = text.to_string();
    padded.push_str(&" ".repeat(width - text_width));
    padded
}

fn load_records() -> Cmd {
    Box::pin(async move {
        let api = api::shared();
        match api.list_all().await {
            Ok(records) => Some(Box::new(RecordsLoadedMsg { records }) as Msg),
            Err(err) => Some(Box::new(LoadFailedMsg {
                error: err.to_string(),
            }) as Msg),
        }
    })
}

fn search_records(seq: u64, query: String) -> Cmd {
    Box::pin(async move {
        let api = api::shared();
        match api.search(&query).await {
            Ok(records) => Some(Box::new(SearchResultsMsg { seq, records }) as Msg),
            Err(_) => Some(Box::new(SearchFailedMsg { seq }) as Msg),
        }
    })
}

fn save_record(mode: Mode, draft: Draft) -> Cmd {
    Box::pin(async move {
        let api = api::shared();
        let outcome = match mode {
            Mode::Create => api.create(&draft).await.map(|_| "user created successfully"),
            Mode::Edit(id) => api
                .update(id, &draft)
                .await
                .map(|_| "user updated successfully"),
        };
        match outcome {
            Ok(message) => Some(Box::new(SaveDoneMsg { message }) as Msg),
            Err(err) => Some(Box::new(SaveFailedMsg {
                error: save_failure_message(mode, &err),
            }) as Msg),
        }
    })
}

/// Failure text for the save toast and banner, carrying whether a create
/// or an update went wrong alongside the server's own message.
fn save_failure_message(mode: Mode, err: &api::ApiError) -> String {
    let prefix = match mode {
        Mode::Create => "error creating user",
        Mode::Edit(_) => "error updating user",
    };
    let detail = err.to_string();
    // A status error without a server message already reads as the
    // prefix; keep it single in that case.
    if detail == prefix {
        detail
    } else {
        format!("{prefix}: {detail}")
    }
}

fn delete_record(id: i64) -> Cmd {
    Box::pin(async move {
        let api = api::shared();
        match api.delete(id).await {
            Ok(_) => Some(Box::new(DeleteDoneMsg) as Msg),
            Err(err) => Some(Box::new(DeleteFailedMsg {
                error: err.to_string(),
            }) as Msg),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn record(id: i64, name: &str, email: &str, phone: &str) -> Record {
        Record {
            id,
            full_name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    fn sample(count: usize) -> Vec<Record> {
        (0..count)
            .map(|i| {
                record(
                    i as i64 + 1,
                    &format!("User {i:02}"),
                    &format!("user{i:02}@example.com"),
                    &format!("55{i:08}"),
                )
            })
            .collect()
    }

    fn loaded_app(count: usize) -> App {
        let mut app = App::new();
        app.loading = true;
        let msg: Msg = Box::new(RecordsLoadedMsg {
            records: sample(count),
        });
        app.update(msg);
        app
    }

    fn press(app: &mut App, code: KeyCode) -> Option<Cmd> {
        let msg: Msg = Box::new(KeyMsg {
            key: code,
            modifiers: KeyModifiers::empty(),
        });
        app.update(msg)
    }

    fn type_query(app: &mut App, text: &str) -> Option<Cmd> {
        let mut last = None;
        press(app, KeyCode::Char('/'));
        for ch in text.chars() {
            last = press(app, KeyCode::Char(ch));
        }
        last
    }

    #[test]
    fn load_replaces_rows_and_clears_the_banner() {
        let mut app = App::new();
        app.banner = Some("error loading users".into());
        let msg: Msg = Box::new(RecordsLoadedMsg { records: sample(3) });
        app.update(msg);
        assert!(!app.loading);
        assert!(app.banner.is_none());
        assert_eq!(app.filtered.len(), 3);
    }

    #[test]
    fn failed_load_empties_the_table_and_raises_a_banner() {
        let mut app = loaded_app(5);
        let failed: Msg = Box::new(LoadFailedMsg {
            error: "error loading users".into(),
        });
        let cmd = app.update(failed);
        assert!(app.records.is_empty());
        assert!(app.filtered.is_empty());
        assert_eq!(app.banner.as_deref(), Some("error loading users"));
        assert!(cmd.is_some());
        assert!(app.toast.visible());
    }

    #[test]
    fn pages_hold_ten_rows() {
        let app = loaded_app(25);
        assert_eq!(app.paginator.total_pages, 3);
        let (start, end) = app.paginator.get_slice_bounds(app.filtered.len());
        assert_eq!((start, end), (0, 10));
    }

    #[test]
    fn page_navigation_moves_the_cursor_to_the_page_start() {
        let mut app = loaded_app(25);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.paginator.page, 1);
        assert_eq!(app.cursor, 10);
        let (start, end) = app.paginator.get_slice_bounds(app.filtered.len());
        assert_eq!((start, end), (10, 20));
    }

    #[test]
    fn cursor_movement_follows_across_pages() {
        let mut app = loaded_app(12);
        for _ in 0..11 {
            press(&mut app, KeyCode::Down);
        }
        assert_eq!(app.cursor, 11);
        assert_eq!(app.paginator.page, 1);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.cursor, 11, "cursor stops at the last row");
    }

    #[test]
    fn typing_a_query_schedules_a_debounce_tick() {
        let mut app = loaded_app(5);
        let cmd = type_query(&mut app, "ada");
        assert!(cmd.is_some());
        assert_eq!(app.search_seq, 3, "every keystroke bumps the sequence");
    }

    #[test]
    fn stale_debounce_ticks_are_discarded() {
        let mut app = loaded_app(5);
        type_query(&mut app, "ad");
        let stale: Msg = Box::new(SearchTickMsg { seq: 1 });
        assert!(app.update(stale).is_none(), "an old tick must not search");

        let current: Msg = Box::new(SearchTickMsg {
            seq: app.search_seq,
        });
        assert!(app.update(current).is_some(), "the latest tick searches");
    }

    #[test]
    fn clearing_the_query_resets_rows_and_voids_pending_ticks() {
        let mut app = loaded_app(5);
        type_query(&mut app, "a");
        let pending = app.search_seq;
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.filtered.len(), 5);

        let stale: Msg = Box::new(SearchTickMsg { seq: pending });
        assert!(app.update(stale).is_none());
        let current: Msg = Box::new(SearchTickMsg {
            seq: app.search_seq,
        });
        assert!(app.update(current).is_none(), "empty queries never search");
    }

    #[test]
    fn stale_search_results_are_discarded() {
        let mut app = loaded_app(5);
        type_query(&mut app, "user");
        let seq = app.search_seq;
        let stale: Msg = Box::new(SearchResultsMsg {
            seq: seq - 1,
            records: vec![],
        });
        app.update(stale);
        assert_eq!(app.filtered.len(), 5, "stale results must not apply");

        let fresh: Msg = Box::new(SearchResultsMsg {
            seq,
            records: sample(2),
        });
        app.update(fresh);
        assert_eq!(app.filtered.len(), 2);
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn failed_search_falls_back_to_local_filtering() {
        let mut app = loaded_app(15);
        type_query(&mut app, "user 01");
        let failed: Msg = Box::new(SearchFailedMsg {
            seq: app.search_seq,
        });
        app.update(failed);
        assert_eq!(app.filtered.len(), 1);
        assert_eq!(app.filtered[0].full_name, "User 01");
    }

    #[test]
    fn reload_reapplies_the_active_query() {
        let mut app = loaded_app(5);
        type_query(&mut app, "user 0");
        let failed: Msg = Box::new(SearchFailedMsg {
            seq: app.search_seq,
        });
        app.update(failed);
        assert_eq!(app.filtered.len(), 5);

        let reload: Msg = Box::new(RecordsLoadedMsg { records: sample(3) });
        app.update(reload);
        assert_eq!(app.records.len(), 3);
        assert_eq!(app.filtered.len(), 3, "query still applies after reload");
    }

    #[test]
    fn loading_blocks_mutating_keys() {
        let mut app = loaded_app(5);
        app.loading = true;
        press(&mut app, KeyCode::Char('n'));
        assert!(!app.form.active());
        press(&mut app, KeyCode::Char('d'));
        assert!(!app.confirm.active());
    }

    #[test]
    fn create_edit_and_delete_open_their_dialogs() {
        let mut app = loaded_app(5);
        press(&mut app, KeyCode::Char('n'));
        assert!(app.form.active());
        assert_eq!(app.form.mode(), Mode::Create);

        let cancel: Msg = Box::new(form::CancelMsg);
        app.update(cancel);
        assert!(!app.form.active());

        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.form.mode(), Mode::Edit(1));
        let cancel: Msg = Box::new(form::CancelMsg);
        app.update(cancel);

        press(&mut app, KeyCode::Char('d'));
        assert!(app.confirm.active());
    }

    #[test]
    fn save_failure_keeps_the_form_open_with_a_banner() {
        let mut app = loaded_app(5);
        press(&mut app, KeyCode::Char('n'));
        let failed: Msg = Box::new(SaveFailedMsg {
            error: save_failure_message(
                Mode::Create,
                &api::ApiError::Status("email already registered".into()),
            ),
        });
        let cmd = app.update(failed);
        assert!(app.form.active());
        assert_eq!(
            app.banner.as_deref(),
            Some("error creating user: email already registered")
        );
        assert!(cmd.is_some(), "a toast is scheduled");
        assert!(app.toast.visible());
    }

    #[test]
    fn save_failure_text_names_the_operation() {
        assert_eq!(
            save_failure_message(
                Mode::Create,
                &api::ApiError::Status("email already registered".into()),
            ),
            "error creating user: email already registered"
        );
        assert_eq!(
            save_failure_message(
                Mode::Edit(4),
                &api::ApiError::Transport("connection refused".into()),
            ),
            "error updating user: network error: connection refused"
        );
        // The no-message status fallback is already the prefix.
        assert_eq!(
            save_failure_message(
                Mode::Create,
                &api::ApiError::Status("error creating user".into()),
            ),
            "error creating user"
        );
    }

    #[test]
    fn delete_failure_keeps_the_prompt_open() {
        let mut app = loaded_app(5);
        press(&mut app, KeyCode::Char('d'));
        let confirmed: Msg = Box::new(confirm::ConfirmMsg { id: 1 });
        app.update(confirmed);

        let failed: Msg = Box::new(DeleteFailedMsg {
            error: "error deleting user".into(),
        });
        app.update(failed);
        assert!(app.confirm.active(), "the prompt survives a failed delete");
        assert_eq!(app.banner.as_deref(), Some("error deleting user"));
    }

    #[test]
    fn delete_success_closes_the_prompt_and_reloads() {
        let mut app = loaded_app(5);
        press(&mut app, KeyCode::Char('d'));
        let done: Msg = Box::new(DeleteDoneMsg);
        let cmd = app.update(done);
        assert!(!app.confirm.active());
        assert!(app.loading, "a reload starts after every mutation");
        assert!(cmd.is_some());
        assert!(app.toast.visible());
    }

    #[test]
    fn save_success_closes_the_form_and_reloads() {
        let mut app = loaded_app(5);
        press(&mut app, KeyCode::Char('n'));
        let done: Msg = Box::new(SaveDoneMsg {
            message: "user created successfully",
        });
        app.update(done);
        assert!(!app.form.active());
        assert!(app.loading);
    }

    #[test]
    fn dismiss_clears_banner_and_toast() {
        let mut app = loaded_app(5);
        app.banner = Some("error loading users".into());
        let _cmd = app.toast.show(toast::Level::Error, "error loading users");
        press(&mut app, KeyCode::Char('x'));
        assert!(app.banner.is_none());
        assert!(!app.toast.visible());
    }

    #[test]
    fn view_counts_rows_and_numbers_them_absolutely() {
        let mut app = loaded_app(25);
        press(&mut app, KeyCode::Right);
        let plain =
            String::from_utf8(strip_ansi_escapes::strip(app.view())).expect("utf8 view");
        assert!(plain.contains("showing 25 of 25 users"));
        assert!(plain.contains("  11  User 10"), "second page starts at row 11");
        assert!(!plain.contains("User 00"), "first page rows are hidden");
    }

    #[test]
    fn empty_list_shows_a_placeholder() {
        let app = loaded_app(0);
        let plain =
            String::from_utf8(strip_ansi_escapes::strip(app.view())).expect("utf8 view");
        assert!(plain.contains("no users yet"));
    }
}
