pub mod memory;
pub mod rest;

use async_trait::async_trait;
use std::sync::Arc;

use crate::auth::Owner;
use crate::error::CoreResult;
use crate::note::{Note, NoteFields, NoteId};

pub use memory::MemoryNoteStore;
pub use rest::RestNoteStore;

/// What the store sent back for a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteAck {
    /// The rows the write produced or touched, possibly none.
    Rows(Vec<Note>),
    /// The write succeeded but no representation came back.
    NoContent,
}

/// One round trip per call against the `notes` table, always scoped to `owner`.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Rows owned by `owner`, newest first.
    async fn select(&self, owner: &Owner) -> CoreResult<Vec<Note>>;
    async fn insert(&self, owner: &Owner, fields: &NoteFields) -> CoreResult<WriteAck>;
    async fn update(
        &self,
        owner: &Owner,
        id: &NoteId,
        fields: &NoteFields,
    ) -> CoreResult<WriteAck>;
    /// Removing an id that does not exist for `owner` is not an error.
    async fn delete(&self, owner: &Owner, id: &NoteId) -> CoreResult<()>;
}

pub type SharedNoteStore = Arc<dyn NoteStore>;
