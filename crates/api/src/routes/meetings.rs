//! Route definitions for the `/meetings` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::meetings;
use crate::state::AppState;

/// Routes mounted at `/meetings`.
///
/// ```text
/// GET    /                -> list_meetings
/// POST   /                -> create_meeting (student)
/// GET    /{id}            -> get_meeting
/// DELETE /{id}            -> cancel_meeting (student)
/// POST   /{id}/accept     -> accept_meeting (advisor)
/// POST   /{id}/decline    -> decline_meeting (advisor)
/// POST   /{id}/complete   -> complete_meeting (advisor)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(meetings::list_meetings).post(meetings::create_meeting),
        )
        .route(
            "/{id}",
            get(meetings::get_meeting).delete(meetings::cancel_meeting),
        )
        .route("/{id}/accept", post(meetings::accept_meeting))
        .route("/{id}/decline", post(meetings::decline_meeting))
        .route("/{id}/complete", post(meetings::complete_meeting))
}
