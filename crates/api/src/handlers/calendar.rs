//! Handlers for the `/calendar` resource (seminars, deadlines, consultation hours).
//!
//! Visibility: admins see every event, advisors see public events and
//! their own, students see public events and those of their active
//! advisors. Only the creator or an admin may change an event.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bimbingan_core::calendar::{validate_event_span, validate_window};
use bimbingan_core::display::{format_long_date, format_time};
use bimbingan_core::error::CoreError;
use bimbingan_core::types::{DbId, Timestamp};
use bimbingan_core::validation::{normalize_optional, validate_input};
use bimbingan_db::models::calendar::{CalendarEvent, CreateCalendarEvent, UpdateCalendarEvent};
use bimbingan_db::repositories::{AssignmentRepo, CalendarRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdvisorOrAdmin;
use crate::query::CalendarWindowParams;
use crate::response::{created, Created, DataResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /calendar`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    #[serde(default)]
    pub is_public: bool,
}

/// Request body for `PUT /calendar/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub is_public: Option<bool>,
}

/// An event with its display fields.
#[derive(Debug, Serialize)]
pub struct EventView {
    #[serde(flatten)]
    pub event: CalendarEvent,
    /// `Kamis, 25 Januari 2024`
    pub date_label: String,
    /// `09:00 WIB - 11:00 WIB`
    pub time_label: String,
}

impl From<CalendarEvent> for EventView {
    fn from(event: CalendarEvent) -> Self {
        Self {
            date_label: format_long_date(event.starts_at),
            time_label: format!(
                "{} - {}",
                format_time(event.starts_at),
                format_time(event.ends_at)
            ),
            event,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/calendar?from=&to=
pub async fn list_events(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(window): Query<CalendarWindowParams>,
) -> AppResult<Json<DataResponse<Vec<EventView>>>> {
    validate_window(window.from, window.to)?;

    let creators = visible_creators(&state, &auth_user).await?;
    let events =
        CalendarRepo::list_visible(&state.pool, creators.as_deref(), window.from, window.to)
            .await?;

    Ok(Json(DataResponse {
        data: events.into_iter().map(EventView::from).collect(),
    }))
}

/// POST /api/v1/calendar
pub async fn create_event(
    State(state): State<AppState>,
    RequireAdvisorOrAdmin(user): RequireAdvisorOrAdmin,
    Json(input): Json<CreateEventRequest>,
) -> AppResult<Created<EventView>> {
    validate_input(&input)?;
    validate_event_span(input.starts_at, input.ends_at)?;

    let create_dto = CreateCalendarEvent {
        created_by: user.user_id,
        title: input.title.trim().to_string(),
        description: normalize_optional(input.description),
        location: normalize_optional(input.location),
        starts_at: input.starts_at,
        ends_at: input.ends_at,
        is_public: input.is_public,
    };

    let event = CalendarRepo::create(&state.pool, &create_dto).await?;
    tracing::info!(event_id = event.id, created_by = user.user_id, "Calendar event created");

    Ok(created(event.into()))
}

/// GET /api/v1/calendar/{id}
pub async fn get_event(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<EventView>>> {
    let event = load_event(&state, id).await?;

    let visible = match visible_creators(&state, &auth_user).await? {
        None => true,
        Some(creators) => event.is_public || creators.contains(&event.created_by),
    };
    if !visible {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Calendar event",
            id,
        }));
    }

    Ok(Json(DataResponse { data: event.into() }))
}

/// PUT /api/v1/calendar/{id}
pub async fn update_event(
    State(state): State<AppState>,
    RequireAdvisorOrAdmin(user): RequireAdvisorOrAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEventRequest>,
) -> AppResult<Json<DataResponse<EventView>>> {
    validate_input(&input)?;
    let event = load_event(&state, id).await?;
    ensure_owner(&user, &event)?;

    validate_event_span(
        input.starts_at.unwrap_or(event.starts_at),
        input.ends_at.unwrap_or(event.ends_at),
    )?;

    let update_dto = UpdateCalendarEvent {
        title: normalize_optional(input.title),
        description: normalize_optional(input.description),
        location: normalize_optional(input.location),
        starts_at: input.starts_at,
        ends_at: input.ends_at,
        is_public: input.is_public,
    };

    let updated = CalendarRepo::update(&state.pool, id, &update_dto)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Calendar event",
            id,
        }))?;

    Ok(Json(DataResponse {
        data: updated.into(),
    }))
}

/// DELETE /api/v1/calendar/{id}
pub async fn delete_event(
    State(state): State<AppState>,
    RequireAdvisorOrAdmin(user): RequireAdvisorOrAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let event = load_event(&state, id).await?;
    ensure_owner(&user, &event)?;

    if !CalendarRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Calendar event",
            id,
        }));
    }
    tracing::info!(event_id = id, deleted_by = user.user_id, "Calendar event deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Creators whose private events `user` may see; `None` means all events.
async fn visible_creators(state: &AppState, user: &AuthUser) -> AppResult<Option<Vec<DbId>>> {
    if user.is_admin() {
        Ok(None)
    } else if user.is_student() {
        let advisors = AssignmentRepo::active_advisor_ids(&state.pool, user.user_id).await?;
        Ok(Some(advisors))
    } else {
        Ok(Some(vec![user.user_id]))
    }
}

async fn load_event(state: &AppState, id: DbId) -> AppResult<CalendarEvent> {
    CalendarRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Calendar event",
            id,
        }))
}

fn ensure_owner(user: &AuthUser, event: &CalendarEvent) -> AppResult<()> {
    if user.is_admin() || event.created_by == user.user_id {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "Only the creator or an admin can change this event".into(),
        )))
    }
}
