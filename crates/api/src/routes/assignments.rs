//! Route definitions for the `/assignments` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::assignments;
use crate::state::AppState;

/// Routes mounted at `/assignments`.
///
/// ```text
/// GET /mine -> my_assignments
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/mine", get(assignments::my_assignments))
}
