//! `notes` table access through the hosted backend's REST interface.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use crate::auth::Owner;
use crate::config::BackendSettings;
use crate::error::{CoreError, CoreResult};
use crate::note::{Note, NoteFields, NoteId, UserId};

use super::{NoteStore, WriteAck};

const NOTES_TABLE: &str = "notes";

#[derive(Clone)]
pub struct RestNoteStore {
    client: Client,
    settings: BackendSettings,
}

#[derive(Debug, Serialize)]
struct InsertRow<'a> {
    title: &'a str,
    content: &'a str,
    user_id: &'a UserId,
}

#[derive(Debug, Deserialize)]
struct StoreErrorBody {
    message: Option<String>,
}

impl RestNoteStore {
    pub fn new(client: Client, settings: BackendSettings) -> Self {
        Self { client, settings }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{NOTES_TABLE}", self.settings.url)
    }

    /// Attaches the public key and, when present, the caller's token so the
    /// row-level policy evaluates against the same user.
    fn authorize(&self, builder: RequestBuilder, owner: &Owner) -> RequestBuilder {
        let bearer = owner
            .access_token
            .as_deref()
            .unwrap_or(&self.settings.anon_key);
        builder
            .header("apikey", &self.settings.anon_key)
            .bearer_auth(bearer)
    }
}

fn eq(value: &str) -> String {
    format!("eq.{value}")
}

#[async_trait]
impl NoteStore for RestNoteStore {
    async fn select(&self, owner: &Owner) -> CoreResult<Vec<Note>> {
        let request = self.client.get(self.table_url()).query(&[
            ("select", "*".to_string()),
            ("user_id", eq(owner.user_id.as_str())),
            ("order", "created_at.desc".to_string()),
        ]);
        let response = send(self.authorize(request, owner)).await?;
        let body = response
            .text()
            .await
            .map_err(|e| CoreError::Store(format!("failed to read store response: {e}")))?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&body)
            .map_err(|e| CoreError::Store(format!("malformed store response: {e}")))
    }

    async fn insert(&self, owner: &Owner, fields: &NoteFields) -> CoreResult<WriteAck> {
        let row = InsertRow {
            title: &fields.title,
            content: &fields.content,
            user_id: &owner.user_id,
        };
        let request = self
            .client
            .post(self.table_url())
            .header("Prefer", "return=representation")
            .json(&[row]);
        write_ack(send(self.authorize(request, owner)).await?).await
    }

    async fn update(
        &self,
        owner: &Owner,
        id: &NoteId,
        fields: &NoteFields,
    ) -> CoreResult<WriteAck> {
        let request = self
            .client
            .patch(self.table_url())
            .query(&[("id", eq(id.as_str())), ("user_id", eq(owner.user_id.as_str()))])
            .header("Prefer", "return=representation")
            .json(fields);
        write_ack(send(self.authorize(request, owner)).await?).await
    }

    async fn delete(&self, owner: &Owner, id: &NoteId) -> CoreResult<()> {
        let request = self
            .client
            .delete(self.table_url())
            .query(&[("id", eq(id.as_str())), ("user_id", eq(owner.user_id.as_str()))]);
        send(self.authorize(request, owner)).await?;
        Ok(())
    }
}

async fn send(request: RequestBuilder) -> CoreResult<Response> {
    let response = request
        .send()
        .await
        .map_err(|e| CoreError::Store(format!("store request failed: {e}")))?;
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<StoreErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.message)
        .unwrap_or_else(|| format!("store returned {status}"));
    tracing::debug!(%status, "store rejected request");
    Err(CoreError::Store(message))
}

async fn write_ack(response: Response) -> CoreResult<WriteAck> {
    let body = response
        .text()
        .await
        .map_err(|e| CoreError::Store(format!("failed to read store response: {e}")))?;
    let body = body.trim();
    if body.is_empty() || body == "null" {
        return Ok(WriteAck::NoContent);
    }
    let rows: Vec<Note> = serde_json::from_str(body)
        .map_err(|e| CoreError::Store(format!("malformed store response: {e}")))?;
    Ok(WriteAck::Rows(rows))
}
