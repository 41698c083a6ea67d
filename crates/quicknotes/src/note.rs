//! The note entity and the identifiers that travel with it.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{CoreError, CoreResult};

/// Store-assigned note identifier. Opaque to the application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the account that owns a note.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted note row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user_id: UserId,
}

/// The two user-editable fields of a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NoteFields {
    pub title: String,
    pub content: String,
}

impl NoteFields {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Rejects a title or content that is empty after trimming.
    pub fn validate(&self) -> CoreResult<()> {
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err(CoreError::Validation(
                "Please fill in both title and content".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_whitespace_only_fields() {
        assert!(NoteFields::new("  ", "body").validate().is_err());
        assert!(NoteFields::new("title", "\n\t").validate().is_err());
        assert!(NoteFields::new("title", "body").validate().is_ok());
    }

    #[test]
    fn note_round_trips_store_row_shape() {
        let row = serde_json::json!({
            "id": "8c1d",
            "created_at": "2024-03-01T10:00:00+00:00",
            "title": "Groceries",
            "content": "milk, eggs, bread",
            "user_id": "user-1"
        });
        let note: Note = serde_json::from_value(row).expect("parse row");
        assert_eq!(note.id.as_str(), "8c1d");
        assert_eq!(note.user_id, UserId::new("user-1"));
        assert_eq!(note.created_at.to_rfc3339(), "2024-03-01T10:00:00+00:00");
    }
}
