//! Route definitions for the aggregated activity feeds.

use axum::routing::get;
use axum::Router;

use crate::handlers::activity;
use crate::state::AppState;

/// Feed routes, merged at the `/api/v1` root.
///
/// ```text
/// GET /recent-activity/{role}/{viewer_id}  -> recent_activity
/// GET /history/{role}/{viewer_id}          -> history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/recent-activity/{role}/{viewer_id}",
            get(activity::recent_activity),
        )
        .route("/history/{role}/{viewer_id}", get(activity::history))
}
