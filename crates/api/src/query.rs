//! Shared query parameter types for API handlers.

use bimbingan_core::types::{DbId, Timestamp};
use serde::Deserialize;

/// `?status=` filter for meeting and submission listings.
///
/// The value is parsed into the matching status enum by the handler so an
/// unknown status is rejected with 400 rather than returning nothing.
#[derive(Debug, Deserialize)]
pub struct StatusFilterParams {
    pub status: Option<String>,
}

/// Query parameters for list endpoints that support an `include_inactive` flag.
#[derive(Debug, Deserialize)]
pub struct IncludeInactiveParams {
    #[serde(default)]
    pub include_inactive: bool,
}

/// `?role_id=` filter for the admin user listing.
#[derive(Debug, Deserialize)]
pub struct RoleFilterParams {
    pub role_id: Option<DbId>,
}

/// `?from=&to=` window for the calendar (RFC 3339 timestamps).
#[derive(Debug, Deserialize)]
pub struct CalendarWindowParams {
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
}
