//! Client for the users REST backend.
//!
//! [`UsersApi`] is the seam the rest of the crate talks to; [`HttpUsersApi`]
//! is the reqwest implementation. Tests substitute their own implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::model::{ListPayload, Record, RecordFields, RecordId, decode_record};

/// Operations the backend offers on user records.
#[async_trait]
pub trait UsersApi: Send + Sync {
    /// Fetch the whole collection. The body shape is normalized by the caller.
    async fn list(&self) -> Result<ListPayload, ApiError>;

    /// Create a record; the backend assigns the id.
    async fn create(&self, fields: &RecordFields) -> Result<Option<Record>, ApiError>;

    /// Replace the editable fields of an existing record.
    async fn update(&self, id: RecordId, fields: &RecordFields)
    -> Result<Option<Record>, ApiError>;

    /// Delete a record.
    async fn remove(&self, id: RecordId) -> Result<(), ApiError>;
}

#[derive(Serialize)]
struct UpdateBody<'a> {
    id: RecordId,
    #[serde(flatten)]
    fields: &'a RecordFields,
}

#[derive(Serialize)]
struct RemoveBody {
    id: RecordId,
}

/// [`UsersApi`] over HTTP/JSON.
///
/// Create posts to the collection URL. Update and delete also target the
/// collection URL and carry the id in the JSON body, as the backend expects.
#[derive(Clone, Debug)]
pub struct HttpUsersApi {
    http: Client,
    base_url: String,
}

impl HttpUsersApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    /// Read the body, turning non-2xx statuses into [`ApiError::Status`].
    async fn read_body(response: Response) -> Result<Vec<u8>, ApiError> {
        let status = response.status();
        let body = response.bytes().await?;
        if status.is_success() {
            return Ok(body.to_vec());
        }
        let message = server_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
        });
        warn!(status = status.as_u16(), %message, "users api: request rejected");
        Err(ApiError::status(status.as_u16(), message))
    }
}

/// The `message` field of a JSON error body, if any.
fn server_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    let msg = value.get("message")?.as_str()?.trim();
    (!msg.is_empty()).then(|| msg.to_string())
}

#[async_trait]
impl UsersApi for HttpUsersApi {
    async fn list(&self) -> Result<ListPayload, ApiError> {
        debug!(url = %self.base_url, "users api: list");
        let response = self.http.get(&self.base_url).send().await?;
        let body = Self::read_body(response).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn create(&self, fields: &RecordFields) -> Result<Option<Record>, ApiError> {
        debug!(url = %self.base_url, "users api: create");
        let response = self.http.post(&self.base_url).json(fields).send().await?;
        let body = Self::read_body(response).await?;
        Ok(decode_record(&body))
    }

    async fn update(
        &self,
        id: RecordId,
        fields: &RecordFields,
    ) -> Result<Option<Record>, ApiError> {
        debug!(url = %self.base_url, id, "users api: update");
        let response = self
            .http
            .put(&self.base_url)
            .json(&UpdateBody { id, fields })
            .send()
            .await?;
        let body = Self::read_body(response).await?;
        Ok(decode_record(&body))
    }

    async fn remove(&self, id: RecordId) -> Result<(), ApiError> {
        debug!(url = %self.base_url, id, "users api: remove");
        let response = self
            .http
            .delete(&self.base_url)
            .json(&RemoveBody { id })
            .send()
            .await?;
        Self::read_body(response).await?;
        Ok(())
    }
}
