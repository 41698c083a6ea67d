//! Process-local note store for local mode and tests.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::Owner;
use crate::error::CoreResult;
use crate::note::{Note, NoteFields, NoteId};

use super::{NoteStore, WriteAck};

#[derive(Debug, Default)]
pub struct MemoryNoteStore {
    inner: RwLock<MemoryRows>,
}

#[derive(Debug, Default)]
struct MemoryRows {
    rows: Vec<Note>,
    last_created_at: Option<DateTime<Utc>>,
}

impl MemoryRows {
    /// Creation timestamps are strictly increasing so newest-first order is total.
    fn next_created_at(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_created_at {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_created_at = Some(stamp);
        stamp
    }
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn select(&self, owner: &Owner) -> CoreResult<Vec<Note>> {
        let inner = self.inner.read().await;
        let mut notes: Vec<Note> = inner
            .rows
            .iter()
            .filter(|note| note.user_id == owner.user_id)
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notes)
    }

    async fn insert(&self, owner: &Owner, fields: &NoteFields) -> CoreResult<WriteAck> {
        fields.validate()?;
        let mut inner = self.inner.write().await;
        let note = Note {
            id: NoteId::new(Uuid::now_v7().to_string()),
            title: fields.title.clone(),
            content: fields.content.clone(),
            created_at: inner.next_created_at(),
            user_id: owner.user_id.clone(),
        };
        inner.rows.push(note.clone());
        Ok(WriteAck::Rows(vec![note]))
    }

    async fn update(
        &self,
        owner: &Owner,
        id: &NoteId,
        fields: &NoteFields,
    ) -> CoreResult<WriteAck> {
        fields.validate()?;
        let mut inner = self.inner.write().await;
        let touched = inner
            .rows
            .iter_mut()
            .filter(|note| note.id == *id && note.user_id == owner.user_id)
            .map(|note| {
                note.title = fields.title.clone();
                note.content = fields.content.clone();
                note.clone()
            })
            .collect();
        Ok(WriteAck::Rows(touched))
    }

    async fn delete(&self, owner: &Owner, id: &NoteId) -> CoreResult<()> {
        let mut inner = self.inner.write().await;
        inner
            .rows
            .retain(|note| !(note.id == *id && note.user_id == owner.user_id));
        Ok(())
    }
}
