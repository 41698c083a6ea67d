use utoipa::OpenApi;

use crate::note::{Note, NoteFields, NoteId, UserId};
use crate::server::error::{ApiErrorBody, ApiErrorResponse};
use crate::server::notes::DeleteNoteResponse;
use crate::server::summarize::{SummarizeErrorResponse, SummarizeRequest, SummarizeResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Quicknotes API",
        version = "0.1.0",
        description = "Personal notes with on-demand summaries"
    ),
    paths(
        crate::server::summarize::summarize,
        crate::server::auth::callback,
        crate::server::auth::logout,
        crate::server::notes::list,
        crate::server::notes::create,
        crate::server::notes::update,
        crate::server::notes::delete,
    ),
    components(schemas(
        // Error
        ApiErrorResponse,
        ApiErrorBody,
        // Summary
        SummarizeRequest,
        SummarizeResponse,
        SummarizeErrorResponse,
        // Notes
        Note,
        NoteFields,
        NoteId,
        UserId,
        DeleteNoteResponse,
    )),
    tags(
        (name = "summary", description = "Note summarization"),
        (name = "auth", description = "Sign-in callback and sign-out"),
        (name = "notes", description = "Notes of the signed-in user"),
    )
)]
pub struct ApiDoc;
