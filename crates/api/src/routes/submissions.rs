//! Route definitions for the `/submissions` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::submissions;
use crate::state::AppState;

/// Routes mounted at `/submissions`.
///
/// ```text
/// GET  /                 -> list_submissions
/// POST /                 -> create_submission (student)
/// GET  /{id}             -> get_submission
/// POST /{id}/read        -> mark_read (advisor)
/// POST /{id}/revision    -> request_revision (advisor)
/// POST /{id}/approve     -> approve (advisor)
/// POST /{id}/resubmit    -> resubmit (student)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(submissions::list_submissions).post(submissions::create_submission),
        )
        .route("/{id}", get(submissions::get_submission))
        .route("/{id}/read", post(submissions::mark_read))
        .route("/{id}/revision", post(submissions::request_revision))
        .route("/{id}/approve", post(submissions::approve))
        .route("/{id}/resubmit", post(submissions::resubmit))
}
