//! Client-side state for the notes page and the calls it orchestrates.

pub mod state;

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::note::{Note, NoteId};
use crate::repository::NotesRepository;
use crate::summary::SummaryGateway;

pub use state::{Draft, SummaryState, ViewState};

pub const TITLE_REQUIRED: &str = "Please add a title to your note";
pub const CONTENT_REQUIRED: &str = "Please add content to your note before saving";
pub const CREATE_FAILED: &str = "Failed to create note. Please try again.";
pub const UPDATE_FAILED: &str = "Failed to update note. Please try again.";
pub const DELETE_FAILED: &str = "Failed to delete note. Please try again.";
pub const SUMMARY_FAILED: &str = "Failed to generate summary. Please try again.";

/// In-memory list, draft and panel state for one signed-in user.
///
/// Mutations patch the list in place (prepend, replace, remove) and never
/// re-fetch, so the order stays the newest-first order `load` received.
pub struct NotesView {
    repository: NotesRepository,
    gateway: Arc<SummaryGateway>,
    notes: Vec<Note>,
    draft: Draft,
    message: Option<String>,
    state: ViewState,
}

/// A summary request that has been started but not yet applied.
#[derive(Debug, Clone)]
pub struct SummaryTicket {
    note_id: NoteId,
    content: String,
}

impl SummaryTicket {
    /// Runs the gateway call without holding the view.
    pub async fn fetch(self, gateway: &SummaryGateway) -> SummaryOutcome {
        let result = gateway.summarize(Some(&self.content)).await;
        SummaryOutcome {
            note_id: self.note_id,
            result,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    note_id: NoteId,
    result: CoreResult<String>,
}

impl NotesView {
    pub fn new(repository: NotesRepository, gateway: Arc<SummaryGateway>) -> Self {
        Self {
            repository,
            gateway,
            notes: Vec::new(),
            draft: Draft::default(),
            message: None,
            state: ViewState::Idle,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn gateway(&self) -> Arc<SummaryGateway> {
        self.gateway.clone()
    }

    /// Loads the list once. A failed load shows an empty list.
    pub async fn load(&mut self) {
        self.notes = match self.repository.list().await {
            Ok(notes) => notes,
            Err(error) => {
                tracing::warn!(%error, "failed to load notes, showing empty list");
                Vec::new()
            }
        };
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.draft.content = content.into();
    }

    pub fn start_edit(&mut self, note: &Note) {
        self.draft = Draft::editing(note);
        self.state = ViewState::Idle;
    }

    pub fn cancel_edit(&mut self) {
        self.draft = Draft::default();
    }

    /// Creates or updates from the draft.
    ///
    /// Blank fields set a message and make no call. On success the draft is
    /// cleared; on failure it is kept so the user can retry.
    pub async fn submit_draft(&mut self) -> CoreResult<Note> {
        self.message = None;
        if self.draft.title.trim().is_empty() {
            return Err(self.fail_validation(TITLE_REQUIRED));
        }
        if self.draft.content.trim().is_empty() {
            return Err(self.fail_validation(CONTENT_REQUIRED));
        }

        let Draft {
            title,
            content,
            editing,
        } = self.draft.clone();
        let result = match editing {
            None => self.repository.create(&title, &content).await.map(|note| {
                self.notes.insert(0, note.clone());
                note
            }),
            Some(id) => self
                .repository
                .update(&id, &title, &content)
                .await
                .map(|note| {
                    if let Some(slot) = self.notes.iter_mut().find(|n| n.id == id) {
                        *slot = note.clone();
                    }
                    note
                }),
        };

        match result {
            Ok(note) => {
                self.draft = Draft::default();
                Ok(note)
            }
            Err(error) => {
                tracing::warn!(%error, editing = self.draft.is_editing(), "failed to save note");
                self.message = Some(
                    if self.draft.is_editing() {
                        UPDATE_FAILED
                    } else {
                        CREATE_FAILED
                    }
                    .to_string(),
                );
                Err(error)
            }
        }
    }

    fn fail_validation(&mut self, message: &str) -> CoreError {
        self.message = Some(message.to_string());
        CoreError::Validation(message.to_string())
    }

    pub fn view(&mut self, note: &Note) {
        self.state = ViewState::Viewing(note.clone());
    }

    pub fn close(&mut self) {
        self.state = ViewState::Idle;
    }

    pub fn confirm_delete(&mut self, note: &Note) {
        self.state = ViewState::ConfirmingDelete(note.clone());
    }

    /// Deletes the note awaiting confirmation. Returns to `Idle` either way.
    pub async fn delete_confirmed(&mut self) -> CoreResult<()> {
        let note = match &self.state {
            ViewState::ConfirmingDelete(note) => note.clone(),
            _ => return Ok(()),
        };
        self.state = ViewState::Idle;
        match self.repository.delete(&note.id).await {
            Ok(()) => {
                self.notes.retain(|n| n.id != note.id);
                Ok(())
            }
            Err(error) => {
                tracing::warn!(%error, note = %note.id, "failed to delete note");
                self.message = Some(DELETE_FAILED.to_string());
                Err(error)
            }
        }
    }

    /// Opens the summary panel for `note` in the pending state.
    pub fn begin_summary(&mut self, note: &Note) -> SummaryTicket {
        self.state = ViewState::Summarizing {
            note: note.clone(),
            summary: SummaryState::Pending,
        };
        SummaryTicket {
            note_id: note.id.clone(),
            content: note.content.clone(),
        }
    }

    /// Applies a finished summary if its note is still the one on screen.
    /// Results for a panel that was closed or switched are dropped.
    pub fn finish_summary(&mut self, outcome: SummaryOutcome) {
        let ViewState::Summarizing { note, summary } = &mut self.state else {
            return;
        };
        if note.id != outcome.note_id {
            return;
        }
        *summary = SummaryState::Ready(match outcome.result {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(%error, note = %outcome.note_id, "summary failed");
                SUMMARY_FAILED.to_string()
            }
        });
    }

    pub async fn request_summary(&mut self, note: &Note) {
        let ticket = self.begin_summary(note);
        let gateway = self.gateway.clone();
        let outcome = ticket.fetch(&gateway).await;
        self.finish_summary(outcome);
    }
}
