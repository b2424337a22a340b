//! Handlers for the `/meetings` resource.
//!
//! Students request and cancel meetings; advisors accept, decline and
//! complete them. Every status change is checked against the lifecycle in
//! `bimbingan_core::meeting` and then applied with a status-guarded update.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bimbingan_core::display::{format_long_date, format_time, meeting_status_label};
use bimbingan_core::error::CoreError;
use bimbingan_core::meeting::{
    resolve_accepted_time, validate_cancellable, validate_decline_reason, validate_transition,
    MeetingStatus,
};
use bimbingan_core::types::{DbId, Timestamp};
use bimbingan_core::validation::{normalize_optional, validate_input};
use bimbingan_db::models::meeting::{CreateMeeting, Meeting};
use bimbingan_db::repositories::MeetingRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::assignments::ensure_paired;
use super::ensure_participant;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdvisor, RequireStudent};
use crate::query::StatusFilterParams;
use crate::response::{created, Created, DataResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /meetings`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMeetingRequest {
    pub advisor_id: DbId,
    #[validate(length(min = 1, max = 200))]
    pub topic: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    /// Proposed time; the advisor may pick another when accepting.
    pub scheduled_at: Option<Timestamp>,
}

/// Request body for `POST /meetings/{id}/accept`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct AcceptMeetingRequest {
    pub scheduled_at: Option<Timestamp>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
}

/// Request body for `POST /meetings/{id}/decline`.
#[derive(Debug, Deserialize)]
pub struct DeclineMeetingRequest {
    pub reason: String,
}

/// Request body for `POST /meetings/{id}/complete`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CompleteMeetingRequest {
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
}

/// A meeting with its display fields.
#[derive(Debug, Serialize)]
pub struct MeetingView {
    #[serde(flatten)]
    pub meeting: Meeting,
    pub status_label: String,
    /// `Kamis, 25 Januari 2024`
    pub scheduled_date: Option<String>,
    /// `09:00 WIB`
    pub scheduled_time: Option<String>,
}

impl From<Meeting> for MeetingView {
    fn from(meeting: Meeting) -> Self {
        let status_label = meeting
            .status
            .parse::<MeetingStatus>()
            .map(|s| meeting_status_label(s).to_string())
            .unwrap_or_else(|_| meeting.status.clone());
        Self {
            scheduled_date: meeting.scheduled_at.map(format_long_date),
            scheduled_time: meeting.scheduled_at.map(format_time),
            status_label,
            meeting,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/meetings?status=
///
/// The caller's meetings: as the student for students, as the advisor for
/// advisors.
pub async fn list_meetings(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<StatusFilterParams>,
) -> AppResult<Json<DataResponse<Vec<MeetingView>>>> {
    let status = params
        .status
        .as_deref()
        .map(str::parse::<MeetingStatus>)
        .transpose()?;
    let status = status.map(MeetingStatus::as_str);

    let meetings = if auth_user.is_student() {
        MeetingRepo::list_for_student(&state.pool, auth_user.user_id, status).await?
    } else if auth_user.is_advisor() {
        MeetingRepo::list_for_advisor(&state.pool, auth_user.user_id, status).await?
    } else {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only students and advisors have meetings".into(),
        )));
    };

    Ok(Json(DataResponse {
        data: meetings.into_iter().map(MeetingView::from).collect(),
    }))
}

/// POST /api/v1/meetings
///
/// A student requests a meeting with one of their advisors.
pub async fn create_meeting(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
    Json(input): Json<CreateMeetingRequest>,
) -> AppResult<Created<MeetingView>> {
    validate_input(&input)?;
    ensure_paired(&state, student.user_id, input.advisor_id).await?;

    let create_dto = CreateMeeting {
        student_id: student.user_id,
        advisor_id: input.advisor_id,
        topic: input.topic.trim().to_string(),
        description: normalize_optional(input.description),
        location: normalize_optional(input.location),
        scheduled_at: input.scheduled_at,
    };

    let meeting = MeetingRepo::create(&state.pool, &create_dto).await?;
    tracing::info!(
        meeting_id = meeting.id,
        student_id = meeting.student_id,
        advisor_id = meeting.advisor_id,
        "Meeting requested"
    );

    Ok(created(meeting.into()))
}

/// GET /api/v1/meetings/{id}
pub async fn get_meeting(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<MeetingView>>> {
    let meeting = load_meeting(&state, id).await?;
    ensure_participant(&auth_user, meeting.student_id, meeting.advisor_id)?;
    Ok(Json(DataResponse {
        data: meeting.into(),
    }))
}

/// DELETE /api/v1/meetings/{id}
///
/// The requesting student withdraws a meeting that is still waiting.
pub async fn cancel_meeting(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let meeting = load_meeting(&state, id).await?;
    if meeting.student_id != student.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the requesting student can cancel this meeting".into(),
        )));
    }
    validate_cancellable(meeting.status.parse()?)?;

    if !MeetingRepo::delete_waiting(&state.pool, id).await? {
        return Err(stale("Meeting", id));
    }
    tracing::info!(meeting_id = id, student_id = student.user_id, "Meeting cancelled");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/meetings/{id}/accept
///
/// Accept a waiting request, optionally moving it to another time or place.
pub async fn accept_meeting(
    State(state): State<AppState>,
    RequireAdvisor(advisor): RequireAdvisor,
    Path(id): Path<DbId>,
    Json(input): Json<AcceptMeetingRequest>,
) -> AppResult<Json<DataResponse<MeetingView>>> {
    validate_input(&input)?;
    let (meeting, current) = load_for_advisor(&state, &advisor, id).await?;
    validate_transition(current, MeetingStatus::Accepted)?;

    let scheduled_at = resolve_accepted_time(meeting.scheduled_at, input.scheduled_at)?;
    let location = normalize_optional(input.location);

    let updated = MeetingRepo::accept(&state.pool, id, scheduled_at, location.as_deref())
        .await?
        .ok_or_else(|| stale("Meeting", id))?;

    tracing::info!(meeting_id = id, advisor_id = advisor.user_id, %scheduled_at, "Meeting accepted");
    Ok(Json(DataResponse {
        data: updated.into(),
    }))
}

/// POST /api/v1/meetings/{id}/decline
///
/// Decline a waiting request or call off an accepted meeting.
pub async fn decline_meeting(
    State(state): State<AppState>,
    RequireAdvisor(advisor): RequireAdvisor,
    Path(id): Path<DbId>,
    Json(input): Json<DeclineMeetingRequest>,
) -> AppResult<Json<DataResponse<MeetingView>>> {
    validate_decline_reason(&input.reason)?;
    let (_, current) = load_for_advisor(&state, &advisor, id).await?;
    validate_transition(current, MeetingStatus::Declined)?;

    let updated = MeetingRepo::decline(&state.pool, id, current, input.reason.trim())
        .await?
        .ok_or_else(|| stale("Meeting", id))?;

    tracing::info!(meeting_id = id, advisor_id = advisor.user_id, from = %current, "Meeting declined");
    Ok(Json(DataResponse {
        data: updated.into(),
    }))
}

/// POST /api/v1/meetings/{id}/complete
///
/// Mark an accepted meeting as done.
pub async fn complete_meeting(
    State(state): State<AppState>,
    RequireAdvisor(advisor): RequireAdvisor,
    Path(id): Path<DbId>,
    Json(input): Json<CompleteMeetingRequest>,
) -> AppResult<Json<DataResponse<MeetingView>>> {
    validate_input(&input)?;
    let (_, current) = load_for_advisor(&state, &advisor, id).await?;
    validate_transition(current, MeetingStatus::Done)?;

    let notes = normalize_optional(input.notes);
    let updated = MeetingRepo::complete(&state.pool, id, notes.as_deref())
        .await?
        .ok_or_else(|| stale("Meeting", id))?;

    tracing::info!(meeting_id = id, advisor_id = advisor.user_id, "Meeting completed");
    Ok(Json(DataResponse {
        data: updated.into(),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_meeting(state: &AppState, id: DbId) -> AppResult<Meeting> {
    MeetingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Meeting",
            id,
        }))
}

/// Load a meeting addressed to `advisor` along with its parsed status.
async fn load_for_advisor(
    state: &AppState,
    advisor: &AuthUser,
    id: DbId,
) -> AppResult<(Meeting, MeetingStatus)> {
    let meeting = load_meeting(state, id).await?;
    if meeting.advisor_id != advisor.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "This meeting is addressed to another advisor".into(),
        )));
    }
    let current = meeting.status.parse::<MeetingStatus>()?;
    Ok((meeting, current))
}

/// The row changed between the read and the guarded update.
pub(crate) fn stale(entity: &str, id: DbId) -> AppError {
    AppError::Core(CoreError::Conflict(format!(
        "{entity} {id} was changed by another request"
    )))
}
