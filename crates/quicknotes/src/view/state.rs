use crate::note::{Note, NoteId};

/// What the single open panel of the view is showing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Viewing(Note),
    ConfirmingDelete(Note),
    Summarizing { note: Note, summary: SummaryState },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryState {
    Pending,
    Ready(String),
}

/// The create/edit form. `editing` is `Some` while an existing note is edited.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Draft {
    pub title: String,
    pub content: String,
    pub editing: Option<NoteId>,
}

impl Draft {
    pub fn editing(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
            editing: Some(note.id.clone()),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }
}
