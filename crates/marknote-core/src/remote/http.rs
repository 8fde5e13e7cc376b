//! JSON-over-HTTPS implementation of `RemoteClient`.

use std::time::Duration;

use chrono::{DateTime, NaiveDateTime};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{RemoteClient, RemoteConfigError, RemoteError};
use crate::models::{RemoteId, RemoteRecord, Visibility};
use crate::session::SessionContext;
use crate::util::parse_base_url;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Longest server message kept in an error
const MAX_ERROR_CHARS: usize = 180;

#[derive(Clone)]
pub struct HttpRemoteClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRemoteClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteConfigError> {
        let base_url = normalize_base_url(base_url.into())?;
        Ok(Self {
            base_url,
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn notes_url(&self) -> String {
        format!("{}/api/notes", self.base_url)
    }

    fn note_url(&self, id: RemoteId) -> String {
        format!("{}/api/notes/{id}", self.base_url)
    }

    async fn send(
        &self,
        session: &SessionContext,
        request: RequestBuilder,
    ) -> Result<Response, RemoteError> {
        let response = request
            .bearer_auth(session.bearer_token())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_status(status, &body))
    }
}

impl RemoteClient for HttpRemoteClient {
    async fn create(
        &self,
        session: &SessionContext,
        title: &str,
        body: &str,
    ) -> Result<RemoteRecord, RemoteError> {
        let payload = NotePayload {
            id: None,
            title,
            content: body,
        };
        let response = self
            .send(session, self.client.post(self.notes_url()).json(&payload))
            .await?;
        let note: NoteDto = read_json(response).await?;
        tracing::debug!("Remote assigned id {} to new note", note.id);
        Ok(note.into())
    }

    async fn update(
        &self,
        session: &SessionContext,
        id: RemoteId,
        title: &str,
        body: &str,
    ) -> Result<(), RemoteError> {
        let payload = NotePayload {
            id: Some(id),
            title,
            content: body,
        };
        self.send(session, self.client.put(self.note_url(id)).json(&payload))
            .await?;
        Ok(())
    }

    async fn delete(&self, session: &SessionContext, id: RemoteId) -> Result<(), RemoteError> {
        self.send(session, self.client.delete(self.note_url(id)))
            .await?;
        Ok(())
    }

    async fn list(&self, session: &SessionContext) -> Result<Vec<RemoteRecord>, RemoteError> {
        let response = self
            .send(
                session,
                self.client.get(format!("{}/api/notes/my", self.base_url)),
            )
            .await?;
        let notes: Vec<NoteDto> = read_json(response).await?;
        Ok(notes.into_iter().map(RemoteRecord::from).collect())
    }
}

#[derive(Debug, Serialize)]
struct NotePayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<RemoteId>,
    title: &'a str,
    content: &'a str,
}

/// Note shape on the wire. Field casing differs between server builds, so
/// both spellings are accepted here and nowhere else.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteDto {
    #[serde(alias = "Id")]
    id: RemoteId,
    #[serde(default, alias = "Title")]
    title: String,
    #[serde(default, alias = "Content")]
    content: String,
    #[serde(default, alias = "CreatedAt")]
    created_at: Option<String>,
    #[serde(default, alias = "IsPublic")]
    is_public: bool,
}

impl From<NoteDto> for RemoteRecord {
    fn from(note: NoteDto) -> Self {
        Self {
            id: note.id,
            title: note.title,
            body: note.content,
            created_at: note
                .created_at
                .as_deref()
                .and_then(parse_timestamp)
                .unwrap_or_default(),
            visibility: Visibility::from_public_flag(note.is_public),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
    title: Option<String>,
    detail: Option<String>,
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, RemoteError> {
    let body = response.text().await.map_err(map_transport_error)?;
    serde_json::from_str(&body).map_err(|error| {
        RemoteError::ServerRejected(format!("invalid response payload: {error}"))
    })
}

/// Parse server timestamps, with or without an offset (naive values are UTC)
fn parse_timestamp(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.timestamp_millis());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|parsed| parsed.and_utc().timestamp_millis())
}

pub(crate) fn map_transport_error(error: reqwest::Error) -> RemoteError {
    if error.is_timeout() {
        RemoteError::Unreachable("request timed out".to_string())
    } else if error.is_decode() {
        RemoteError::ServerRejected(error.to_string())
    } else {
        RemoteError::Unreachable(error.to_string())
    }
}

pub(crate) fn map_status(status: StatusCode, body: &str) -> RemoteError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteError::Unauthorized,
        StatusCode::NOT_FOUND => RemoteError::NotFound,
        _ => RemoteError::ServerRejected(parse_api_error(status, body)),
    }
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload
            .message
            .or(payload.error)
            .or(payload.detail)
            .or(payload.title)
        {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }
    if let Ok(message) = serde_json::from_str::<String>(body) {
        return format!("{} ({})", clip_message(&message), status.as_u16());
    }

    let trimmed = clip_message(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

fn clip_message(value: &str) -> String {
    value.trim().chars().take(MAX_ERROR_CHARS).collect()
}

pub(crate) fn normalize_base_url(raw: String) -> Result<String, RemoteConfigError> {
    parse_base_url(&raw)
        .map_err(|error| RemoteConfigError::InvalidConfiguration(format!("API base URL {error}")))
}
