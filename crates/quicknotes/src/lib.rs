pub mod auth;
pub mod config;
pub mod error;
pub mod llm;
pub mod note;
pub mod repository;
pub mod server;
pub mod store;
pub mod summary;
pub mod view;

#[cfg(test)]
mod test_support;

pub use crate::config::AppConfig;
pub use crate::error::{CoreError, CoreResult};
pub use crate::note::{Note, NoteId, UserId};
pub use crate::repository::NotesRepository;
pub use crate::server::{Server, ServerState};
pub use crate::summary::SummaryGateway;
pub use crate::view::NotesView;
