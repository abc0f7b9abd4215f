//! # userdeck
//!
//! A terminal admin console for a REST-backed user directory, built on
//! [bubbletea-rs](https://crates.io/crates/bubbletea-rs) and
//! [bubbletea-widgets](https://crates.io/crates/bubbletea-widgets).
//!
//! The console lists user records in a paginated table, searches them with
//! a debounced remote query (falling back to local filtering when the
//! server is unreachable), and edits them through modal create/edit and
//! delete-confirmation dialogs. All state lives in a single Elm-style
//! model in [`app`]; network access is confined to [`api`].
//!
//! ## Modules
//!
//! - [`app`]: top-level model, message routing, and the table view
//! - [`api`]: reqwest client for the user REST endpoints
//! - [`record`]: the user record, drafts, and field validation
//! - [`form`]: modal create/edit form
//! - [`confirm`]: delete confirmation prompt
//! - [`toast`]: transient notifications with timed auto-hide
//! - [`config`]: environment-driven settings
//! - [`theme`]: shared lipgloss styles

pub mod api;
pub mod app;
pub mod config;
pub mod confirm;
pub mod form;
pub mod record;
pub mod theme;
pub mod toast;
