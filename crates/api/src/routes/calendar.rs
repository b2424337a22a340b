//! Route definitions for the `/calendar` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::calendar;
use crate::state::AppState;

/// Routes mounted at `/calendar`.
///
/// ```text
/// GET    /       -> list_events
/// POST   /       -> create_event (advisor or admin)
/// GET    /{id}   -> get_event
/// PUT    /{id}   -> update_event (creator or admin)
/// DELETE /{id}   -> delete_event (creator or admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(calendar::list_events).post(calendar::create_event))
        .route(
            "/{id}",
            get(calendar::get_event)
                .put(calendar::update_event)
                .delete(calendar::delete_event),
        )
}
