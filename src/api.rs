//! Reqwest-backed client for the remote user collection.
//!
//! This module owns transport details only: request construction, HTTP
//! error mapping, and JSON decoding into [`Record`] values. One method per
//! server operation; every method resolves to an explicit
//! `Result<_, ApiError>` and logs the failure before returning it, so
//! callers can surface the message without re-deriving it.
//!
//! The server wraps responses in a `{success, message, data}` envelope.
//! List and search tolerate either the envelope or a bare JSON array, and
//! a missing or null `data` field is an empty result rather than a format
//! error.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::record::{Draft, Record};

static SHARED: OnceCell<Arc<ApiClient>> = OnceCell::new();

/// Installs the process-wide client. Later calls are ignored; the first
/// installed client wins.
pub fn install(client: ApiClient) {
    let _ = SHARED.set(Arc::new(client));
}

/// The process-wide client. Built from the environment on first use when
/// [`install`] was never called.
pub fn shared() -> Arc<ApiClient> {
    SHARED
        .get_or_init(|| {
            let config = Config::from_env();
            let client = ApiClient::new(&config).unwrap_or_else(|_| ApiClient {
                client: Client::new(),
                base_url: config.base_url.clone(),
            });
            Arc::new(client)
        })
        .clone()
}

/// Failure modes of a user API call.
///
/// Display output is the user-facing message: the toast and error banner
/// render it verbatim.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 404 on an id-addressed operation.
    #[error("user not found")]
    NotFound,
    /// Non-success HTTP status, carrying the server's message when the
    /// error body had one, or the operation-specific default otherwise.
    #[error("{0}")]
    Status(String),
    /// Connection, TLS, or timeout failure before a status was obtained.
    #[error("network error: {0}")]
    Transport(String),
    /// A 2xx response whose body could not be decoded. Never treated as a
    /// partial success.
    #[error("malformed server response: {0}")]
    Decode(String),
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

/// Client for one REST user collection.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Builds a client with the configured endpoint and request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying reqwest client cannot be
    /// constructed.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(transport)?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// POST `/`: create a record; the server assigns the id.
    pub async fn create(&self, draft: &Draft) -> Result<Record, ApiError> {
        log_failure("create", self.try_create(draft).await)
    }

    /// GET `/`: fetch every record.
    pub async fn list_all(&self) -> Result<Vec<Record>, ApiError> {
        log_failure("list_all", self.try_list_all().await)
    }

    /// GET `/{id}`: fetch one record. 404 maps to [`ApiError::NotFound`].
    pub async fn get(&self, id: i64) -> Result<Record, ApiError> {
        log_failure("get", self.try_get(id).await)
    }

    /// GET `/buscar?nombre={q}`: server-side search. Match semantics are
    /// a server concern; the query is sent URL-encoded as-is.
    pub async fn search(&self, name: &str) -> Result<Vec<Record>, ApiError> {
        log_failure("search", self.try_search(name).await)
    }

    /// PUT `/{id}`: full field replacement, no partial patch.
    pub async fn update(&self, id: i64, draft: &Draft) -> Result<Record, ApiError> {
        log_failure("update", self.try_update(id, draft).await)
    }

    /// DELETE `/{id}`: returns `true` on success. 404 maps to
    /// [`ApiError::NotFound`].
    pub async fn delete(&self, id: i64) -> Result<bool, ApiError> {
        log_failure("delete", self.try_delete(id).await)
    }

    /// GET `/existe-correo?correo={e}`: whether a record with this email
    /// already exists.
    pub async fn email_exists(&self, email: &str) -> Result<bool, ApiError> {
        log_failure("email_exists", self.try_email_exists(email).await)
    }

    async fn try_create(&self, draft: &Draft) -> Result<Record, ApiError> {
        let request = self.client.post(&self.base_url).json(draft);
        let (status, body) = send(request).await?;
        if !status.is_success() {
            return Err(status_error(status, &body, "error creating user", false));
        }
        decode_record(&body)
    }

    async fn try_list_all(&self) -> Result<Vec<Record>, ApiError> {
        let request = self.client.get(&self.base_url);
        let (status, body) = send(request).await?;
        if !status.is_success() {
            return Err(status_error(status, &body, "error loading users", false));
        }
        decode_record_list(&body)
    }

    async fn try_get(&self, id: i64) -> Result<Record, ApiError> {
        let request = self.client.get(self.item_url(id));
        let (status, body) = send(request).await?;
        if !status.is_success() {
            return Err(status_error(status, &body, "error fetching user", true));
        }
        decode_record(&body)
    }

    async fn try_search(&self, name: &str) -> Result<Vec<Record>, ApiError> {
        let request = self
            .client
            .get(format!("{}/buscar", self.base_url))
            .query(&[("nombre", name)]);
        let (status, body) = send(request).await?;
        if !status.is_success() {
            return Err(status_error(status, &body, "error searching users", false));
        }
        decode_record_list(&body)
    }

    async fn try_update(&self, id: i64, draft: &Draft) -> Result<Record, ApiError> {
        let request = self.client.put(self.item_url(id)).json(draft);
        let (status, body) = send(request).await?;
        if !status.is_success() {
            return Err(status_error(status, &body, "error updating user", false));
        }
        decode_record(&body)
    }

    async fn try_delete(&self, id: i64) -> Result<bool, ApiError> {
        let request = self.client.delete(self.item_url(id));
        let (status, body) = send(request).await?;
        if !status.is_success() {
            return Err(status_error(status, &body, "error deleting user", true));
        }
        Ok(true)
    }

    async fn try_email_exists(&self, email: &str) -> Result<bool, ApiError> {
        let request = self
            .client
            .get(format!("{}/existe-correo", self.base_url))
            .query(&[("correo", email)]);
        let (status, body) = send(request).await?;
        if !status.is_success() {
            return Err(status_error(status, &body, "error checking email", false));
        }
        decode_bool(&body)
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

async fn send(request: reqwest::RequestBuilder) -> Result<(StatusCode, Vec<u8>), ApiError> {
    let response = request.send().await.map_err(transport)?;
    let status = response.status();
    let body = response.bytes().await.map_err(transport)?;
    Ok((status, body.to_vec()))
}

fn transport(error: reqwest::Error) -> ApiError {
    ApiError::Transport(error.to_string())
}

fn log_failure<T>(operation: &'static str, result: Result<T, ApiError>) -> Result<T, ApiError> {
    if let Err(err) = &result {
        tracing::error!(operation, error = %err, "user api request failed");
    }
    result
}

/// Maps a non-success status to the error contract: 404 on id-addressed
/// operations becomes `NotFound`; otherwise the envelope's `message` is
/// used when present and non-empty, else the fixed default.
fn status_error(status: StatusCode, body: &[u8], default_message: &str, id_addressed: bool) -> ApiError {
    if id_addressed && status == StatusCode::NOT_FOUND {
        return ApiError::NotFound;
    }
    let message = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .filter(|message| !message.is_empty());
    ApiError::Status(message.unwrap_or_else(|| default_message.to_string()))
}

fn decode_record_list(body: &[u8]) -> Result<Vec<Record>, ApiError> {
    if let Ok(records) = serde_json::from_slice::<Vec<Record>>(body) {
        return Ok(records);
    }
    let envelope: Envelope<Vec<Record>> =
        serde_json::from_slice(body).map_err(|err| ApiError::Decode(err.to_string()))?;
    Ok(envelope.data.unwrap_or_default())
}

fn decode_record(body: &[u8]) -> Result<Record, ApiError> {
    if let Ok(Envelope {
        data: Some(record), ..
    }) = serde_json::from_slice::<Envelope<Record>>(body)
    {
        return Ok(record);
    }
    serde_json::from_slice::<Record>(body).map_err(|err| ApiError::Decode(err.to_string()))
}

fn decode_bool(body: &[u8]) -> Result<bool, ApiError> {
    if let Ok(flag) = serde_json::from_slice::<bool>(body) {
        return Ok(flag);
    }
    let envelope: Envelope<bool> =
        serde_json::from_slice(body).map_err(|err| ApiError::Decode(err.to_string()))?;
    Ok(envelope.data.unwrap_or(false))
}

#[cfg(test)]
mod tests {
    //! Coverage for the non-network decoding and status-mapping helpers.

    use super::*;
    use rstest::rstest;

    const WRAPPED_LIST: &str = r#"{
        "success": true,
        "message": "ok",
        "data": [
            {"id": 1, "fullName": "Ada Lovelace", "email": "ada@example.com", "phone": "5512345678"},
            {"id": 2, "fullName": "Alan Turing", "email": "alan@example.com", "phone": "5587654321"}
        ]
    }"#;

    #[test]
    fn decodes_wrapped_list() {
        let records = decode_record_list(WRAPPED_LIST.as_bytes()).expect("list decodes");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].full_name, "Ada Lovelace");
        assert_eq!(records[1].id, 2);
    }

    #[test]
    fn decodes_bare_array_list() {
        let body = r#"[{"id": 7, "fullName": "Jo", "email": "a@b.c", "phone": "1234567890"}]"#;
        let records = decode_record_list(body.as_bytes()).expect("list decodes");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 7);
    }

    #[rstest]
    #[case::missing_data(r#"{"success": true, "message": "ok"}"#)]
    #[case::null_data(r#"{"success": true, "message": "ok", "data": null}"#)]
    fn missing_data_is_empty_not_an_error(#[case] body: &str) {
        let records = decode_record_list(body.as_bytes()).expect("list decodes");
        assert!(records.is_empty());
    }

    #[test]
    fn garbage_list_body_is_a_decode_error() {
        let error = decode_record_list(b"<html>oops</html>").expect_err("decode fails");
        assert!(matches!(error, ApiError::Decode(_)));
    }

    #[test]
    fn decodes_wrapped_and_bare_record() {
        let wrapped = r#"{"success": true, "data": {"id": 3, "fullName": "Jo", "email": "a@b.c", "phone": "1234567890"}}"#;
        let bare = r#"{"id": 3, "fullName": "Jo", "email": "a@b.c", "phone": "1234567890"}"#;
        assert_eq!(decode_record(wrapped.as_bytes()).unwrap().id, 3);
        assert_eq!(decode_record(bare.as_bytes()).unwrap().id, 3);
    }

    #[test]
    fn wrapped_success_without_record_is_a_decode_error() {
        let body = r#"{"success": true, "message": "created", "data": null}"#;
        let error = decode_record(body.as_bytes()).expect_err("decode fails");
        assert!(matches!(error, ApiError::Decode(_)));
    }

    #[test]
    fn decodes_bool_wrapped_bare_and_missing() {
        assert!(decode_bool(br#"{"data": true}"#).unwrap());
        assert!(decode_bool(b"true").unwrap());
        assert!(!decode_bool(br#"{"success": true}"#).unwrap());
    }

    #[test]
    fn not_found_only_on_id_addressed_operations() {
        let error = status_error(StatusCode::NOT_FOUND, b"{}", "error deleting user", true);
        assert!(matches!(error, ApiError::NotFound));
        assert_eq!(error.to_string(), "user not found");

        let error = status_error(StatusCode::NOT_FOUND, b"{}", "error searching users", false);
        assert!(matches!(error, ApiError::Status(_)));
    }

    #[rstest]
    #[case::server_message(
        r#"{"success": false, "message": "email already registered"}"#,
        "email already registered"
    )]
    #[case::empty_message(r#"{"success": false, "message": ""}"#, "error creating user")]
    #[case::no_message(r#"{"success": false}"#, "error creating user")]
    #[case::unparsable_body("<html>bad gateway</html>", "error creating user")]
    fn non_success_status_carries_a_message(#[case] body: &str, #[case] expected: &str) {
        let error = status_error(
            StatusCode::BAD_REQUEST,
            body.as_bytes(),
            "error creating user",
            false,
        );
        assert_eq!(error.to_string(), expected);
    }
}
