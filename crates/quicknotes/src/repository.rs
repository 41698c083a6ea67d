//! Notes data-access layer for one authenticated user.

use crate::auth::Owner;
use crate::error::{CoreError, CoreResult};
use crate::note::{Note, NoteFields, NoteId};
use crate::store::{SharedNoteStore, WriteAck};

/// list/create/update/delete over the store, scoped to one owner.
///
/// Every call is a single store round trip with no retry and no caching.
/// Callers validate title and content before `create` and `update`.
#[derive(Clone)]
pub struct NotesRepository {
    store: SharedNoteStore,
    owner: Owner,
}

impl NotesRepository {
    pub fn new(store: SharedNoteStore, owner: Owner) -> Self {
        Self { store, owner }
    }

    /// All notes of the owner, newest first. Never fails with an absent list.
    pub async fn list(&self) -> CoreResult<Vec<Note>> {
        let notes = self.store.select(&self.owner).await?;
        tracing::debug!(user = %self.owner.user_id, count = notes.len(), "listed notes");
        Ok(notes)
    }

    pub async fn create(&self, title: &str, content: &str) -> CoreResult<Note> {
        let fields = NoteFields::new(title, content);
        let ack = self.store.insert(&self.owner, &fields).await?;
        let note = match ack {
            WriteAck::Rows(rows) => rows.into_iter().next(),
            WriteAck::NoContent => None,
        }
        .ok_or(CoreError::EmptyResponse("insert"))?;
        tracing::info!(user = %self.owner.user_id, note = %note.id, "created note");
        Ok(note)
    }

    /// Replaces title and content wholesale.
    pub async fn update(&self, id: &NoteId, title: &str, content: &str) -> CoreResult<Note> {
        let fields = NoteFields::new(title, content);
        let ack = self.store.update(&self.owner, id, &fields).await?;
        let note = match ack {
            WriteAck::Rows(rows) => rows.into_iter().next().ok_or_else(|| {
                CoreError::Store(format!("no note matched id {id}"))
            })?,
            WriteAck::NoContent => return Err(CoreError::EmptyResponse("update")),
        };
        tracing::info!(user = %self.owner.user_id, note = %note.id, "updated note");
        Ok(note)
    }

    /// Hard delete. Unknown or foreign ids succeed without effect.
    pub async fn delete(&self, id: &NoteId) -> CoreResult<()> {
        self.store.delete(&self.owner, id).await?;
        tracing::info!(user = %self.owner.user_id, note = %id, "deleted note");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::UserId;
    use crate::store::{MemoryNoteStore, NoteStore};
    use async_trait::async_trait;
    use std::sync::Arc;

    fn repository() -> NotesRepository {
        NotesRepository::new(
            Arc::new(MemoryNoteStore::new()),
            Owner::new(UserId::new("alice")),
        )
    }

    /// Store that acknowledges writes without returning rows.
    struct SilentStore;

    #[async_trait]
    impl NoteStore for SilentStore {
        async fn select(&self, _owner: &Owner) -> CoreResult<Vec<Note>> {
            Err(CoreError::Store("relation \"notes\" does not exist".to_string()))
        }
        async fn insert(&self, _owner: &Owner, _fields: &NoteFields) -> CoreResult<WriteAck> {
            Ok(WriteAck::NoContent)
        }
        async fn update(
            &self,
            _owner: &Owner,
            _id: &NoteId,
            _fields: &NoteFields,
        ) -> CoreResult<WriteAck> {
            Ok(WriteAck::NoContent)
        }
        async fn delete(&self, _owner: &Owner, _id: &NoteId) -> CoreResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn groceries_lifecycle() {
        let repo = repository();

        let created = repo
            .create("Groceries", "milk, eggs, bread")
            .await
            .expect("create");
        let notes = repo.list().await.expect("list");
        assert_eq!(notes[0].title, "Groceries");
        assert_eq!(notes[0].content, "milk, eggs, bread");

        repo.update(&created.id, "Groceries", "milk, eggs, bread, butter")
            .await
            .expect("update");
        let notes = repo.list().await.expect("list");
        assert_eq!(notes[0].content, "milk, eggs, bread, butter");
        assert_eq!(notes[0].created_at, created.created_at);

        repo.delete(&created.id).await.expect("delete");
        let notes = repo.list().await.expect("list");
        assert!(notes.iter().all(|note| note.id != created.id));
    }

    #[tokio::test]
    async fn create_puts_exactly_one_new_note_first() {
        let repo = repository();
        repo.create("older", "a").await.expect("create");
        repo.create("old", "b").await.expect("create");

        let created = repo.create("new", "c").await.expect("create");
        let notes = repo.list().await.expect("list");
        assert_eq!(notes[0].id, created.id);
        assert_eq!(notes.iter().filter(|n| n.title == "new").count(), 1);
        assert!(notes[1..].iter().all(|n| n.created_at < created.created_at));
    }

    #[tokio::test]
    async fn update_leaves_other_notes_untouched() {
        let repo = repository();
        let target = repo.create("target", "before").await.expect("create");
        repo.create("other", "same").await.expect("create");
        let before = repo.list().await.expect("list");

        repo.update(&target.id, "target", "after").await.expect("update");
        let after = repo.list().await.expect("list");

        assert_eq!(before.len(), after.len());
        for (old, new) in before.iter().zip(after.iter()) {
            if old.id == target.id {
                assert_eq!(new.content, "after");
                assert_eq!(new.created_at, old.created_at);
                assert_eq!(new.user_id, old.user_id);
            } else {
                assert_eq!(old, new);
            }
        }
    }

    #[tokio::test]
    async fn update_of_missing_id_is_a_store_error() {
        let repo = repository();
        let error = repo
            .update(&NoteId::new("missing"), "t", "c")
            .await
            .expect_err("should fail");
        assert_eq!(error, CoreError::Store("no note matched id missing".to_string()));
    }

    #[tokio::test]
    async fn delete_of_missing_id_succeeds() {
        let repo = repository();
        repo.delete(&NoteId::new("missing")).await.expect("idempotent delete");
    }

    #[tokio::test]
    async fn list_is_stable_without_mutation() {
        let repo = repository();
        repo.create("a", "1").await.expect("create");
        repo.create("b", "2").await.expect("create");
        assert_eq!(repo.list().await.expect("list"), repo.list().await.expect("list"));
    }

    #[tokio::test]
    async fn empty_list_is_empty_not_absent() {
        assert!(repository().list().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn silent_acknowledgement_is_an_empty_response() {
        let repo = NotesRepository::new(Arc::new(SilentStore), Owner::new(UserId::new("alice")));
        assert_eq!(
            repo.create("t", "c").await.expect_err("insert"),
            CoreError::EmptyResponse("insert")
        );
        assert_eq!(
            repo.update(&NoteId::new("n1"), "t", "c").await.expect_err("update"),
            CoreError::EmptyResponse("update")
        );
        assert!(matches!(repo.list().await, Err(CoreError::Store(_))));
    }

    #[tokio::test]
    async fn notes_are_invisible_to_other_owners() {
        let store: SharedNoteStore = Arc::new(MemoryNoteStore::new());
        let alice = NotesRepository::new(store.clone(), Owner::new(UserId::new("alice")));
        let bob = NotesRepository::new(store, Owner::new(UserId::new("bob")));

        let note = alice.create("private", "diary").await.expect("create");
        assert!(bob.list().await.expect("list").is_empty());
        assert!(bob.update(&note.id, "x", "y").await.is_err());
        bob.delete(&note.id).await.expect("foreign delete is a no-op");
        assert_eq!(alice.list().await.expect("list").len(), 1);
    }
}
