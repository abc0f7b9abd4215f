//! The user record domain type and its field validation rules.
//!
//! A [`Record`] is the only entity in the system: a server-assigned id plus
//! full name, email, and phone. [`Draft`] is the id-less payload sent on
//! create and update. Validation runs on submit, not per keystroke, and
//! every rule lives here so the form and the tests share one source of
//! truth.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Basic `local@domain.tld` shape. Format only; no MX or deliverability
/// checks.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

/// Phone numbers are exactly this many decimal digits.
pub const PHONE_LEN: usize = 10;

/// A user record as returned by the server.
///
/// The `id` is opaque and immutable once assigned; it never appears in
/// request bodies. Wire names are camelCase to match the REST API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

impl Record {
    /// Case-insensitive substring match over name, email, and phone.
    ///
    /// This is the local fallback filter used when the remote search
    /// endpoint fails.
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.full_name.to_lowercase().contains(&q)
            || self.email.to_lowercase().contains(&q)
            || self.phone.contains(query)
    }
}

/// The payload for create and update requests: a record without an id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

impl Draft {
    /// Runs all three field rules, collecting every failure.
    ///
    /// Returns `Ok(())` only when the draft is safe to send; otherwise the
    /// per-field messages for the form to display.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let errors = FieldErrors {
            full_name: validate_name(&self.full_name).err(),
            email: validate_email(&self.email).err(),
            phone: validate_phone(&self.phone).err(),
        };
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// One optional message per field, produced by [`Draft::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

/// Required; trimmed length must be at least 2.
pub fn validate_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err("full name is required".to_string())
    } else if trimmed.chars().count() < 2 {
        Err("name must be at least 2 characters".to_string())
    } else {
        Ok(())
    }
}

/// Required; must look like `local@domain.tld`.
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.trim().is_empty() {
        Err("email is required".to_string())
    } else if !EMAIL_RE.is_match(email) {
        Err("email format is not valid".to_string())
    } else {
        Ok(())
    }
}

/// Required; exactly [`PHONE_LEN`] digits. Input sanitisation means the
/// only reachable failures are emptiness and "too few digits".
pub fn validate_phone(phone: &str) -> Result<(), String> {
    if phone.trim().is_empty() {
        Err("phone is required".to_string())
    } else if phone.len() != PHONE_LEN || !phone.bytes().all(|b| b.is_ascii_digit()) {
        Err("phone must be 10 digits".to_string())
    } else {
        Ok(())
    }
}

/// Keeps only ASCII digits and truncates to [`PHONE_LEN`].
///
/// Applied to the phone input on every edit, so pasted values like
/// `12-34-56-78-90` end up stored as `1234567890`.
pub fn sanitize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit())
        .take(PHONE_LEN)
        .collect()
}
