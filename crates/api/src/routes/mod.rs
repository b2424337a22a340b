pub mod activity;
pub mod admin;
pub mod assignments;
pub mod auth;
pub mod calendar;
pub mod health;
pub mod meetings;
pub mod profile;
pub mod submissions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
/// /auth/me                                         current user
///
/// /profile                                         get, update own profile
/// /profile/password                                change own password (PUT)
///
/// /admin/users                                     list, create (admin only)
/// /admin/users/{id}                                get, update, deactivate
/// /admin/users/{id}/reset-password                 reset password
/// /admin/assignments                               list, create (admin only)
/// /admin/assignments/{id}                          get, update, deactivate
///
/// /assignments/mine                                own pairings
///
/// /meetings                                        list (?status), request
/// /meetings/{id}                                   get, cancel (DELETE)
/// /meetings/{id}/accept                            accept (advisor)
/// /meetings/{id}/decline                           decline (advisor)
/// /meetings/{id}/complete                          mark done (advisor)
///
/// /submissions                                     list (?status), submit
/// /submissions/{id}                                get
/// /submissions/{id}/read                           mark read (advisor)
/// /submissions/{id}/revision                       request revision (advisor)
/// /submissions/{id}/approve                        approve (advisor)
/// /submissions/{id}/resubmit                       resubmit (student)
///
/// /calendar                                        list (?from&to), create
/// /calendar/{id}                                   get, update, delete
///
/// /recent-activity/{role}/{viewer_id}              recent feed
/// /history/{role}/{viewer_id}                      history feed
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/profile", profile::router())
        .nest("/admin", admin::router())
        .nest("/assignments", assignments::router())
        .nest("/meetings", meetings::router())
        .nest("/submissions", submissions::router())
        .nest("/calendar", calendar::router())
        .merge(activity::router())
}
