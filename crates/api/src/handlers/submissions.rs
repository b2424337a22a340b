//! Handlers for the `/submissions` resource (progress documents).
//!
//! Students submit a document to one of their advisors and resubmit it
//! after a revision request; advisors mark it read, request a revision or
//! approve it.

use axum::extract::{Path, Query, State};
use axum::Json;
use bimbingan_core::display::{format_short_datetime, submission_status_label};
use bimbingan_core::error::CoreError;
use bimbingan_core::submission::{validate_revision_notes, validate_transition, SubmissionStatus};
use bimbingan_core::types::DbId;
use bimbingan_core::validation::{normalize_optional, validate_input};
use bimbingan_db::models::submission::{CreateSubmission, Resubmission, Submission};
use bimbingan_db::repositories::SubmissionRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::assignments::ensure_paired;
use super::ensure_participant;
use super::meetings::stale;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdvisor, RequireStudent};
use crate::query::StatusFilterParams;
use crate::response::{created, Created, DataResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /submissions`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubmissionRequest {
    pub advisor_id: DbId,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(url)]
    pub file_url: String,
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
}

/// Request body for `POST /submissions/{id}/resubmit`.
#[derive(Debug, Deserialize, Validate)]
pub struct ResubmitRequest {
    #[validate(url)]
    pub file_url: String,
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Request body for `POST /submissions/{id}/revision`.
#[derive(Debug, Deserialize)]
pub struct RevisionRequest {
    pub notes: String,
}

/// A submission with its display fields.
#[derive(Debug, Serialize)]
pub struct SubmissionView {
    #[serde(flatten)]
    pub submission: Submission,
    pub status_label: String,
    /// `25 Jan 2024 09:00`
    pub submitted_display: String,
}

impl From<Submission> for SubmissionView {
    fn from(submission: Submission) -> Self {
        let status_label = submission
            .status
            .parse::<SubmissionStatus>()
            .map(|s| submission_status_label(s).to_string())
            .unwrap_or_else(|_| submission.status.clone());
        Self {
            submitted_display: format_short_datetime(submission.submitted_at),
            status_label,
            submission,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/submissions?status=
pub async fn list_submissions(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<StatusFilterParams>,
) -> AppResult<Json<DataResponse<Vec<SubmissionView>>>> {
    let status = params
        .status
        .as_deref()
        .map(str::parse::<SubmissionStatus>)
        .transpose()?;
    let status = status.map(SubmissionStatus::as_str);

    let submissions = if auth_user.is_student() {
        SubmissionRepo::list_for_student(&state.pool, auth_user.user_id, status).await?
    } else if auth_user.is_advisor() {
        SubmissionRepo::list_for_advisor(&state.pool, auth_user.user_id, status).await?
    } else {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only students and advisors have submissions".into(),
        )));
    };

    Ok(Json(DataResponse {
        data: submissions.into_iter().map(SubmissionView::from).collect(),
    }))
}

/// POST /api/v1/submissions
pub async fn create_submission(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
    Json(input): Json<CreateSubmissionRequest>,
) -> AppResult<Created<SubmissionView>> {
    validate_input(&input)?;
    ensure_paired(&state, student.user_id, input.advisor_id).await?;

    let create_dto = CreateSubmission {
        student_id: student.user_id,
        advisor_id: input.advisor_id,
        title: input.title.trim().to_string(),
        description: normalize_optional(input.description),
        file_url: input.file_url,
        file_name: input.file_name.trim().to_string(),
    };

    let submission = SubmissionRepo::create(&state.pool, &create_dto).await?;
    tracing::info!(
        submission_id = submission.id,
        student_id = submission.student_id,
        advisor_id = submission.advisor_id,
        "Submission received"
    );

    Ok(created(submission.into()))
}

/// GET /api/v1/submissions/{id}
pub async fn get_submission(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SubmissionView>>> {
    let submission = load_submission(&state, id).await?;
    ensure_participant(&auth_user, submission.student_id, submission.advisor_id)?;
    Ok(Json(DataResponse {
        data: submission.into(),
    }))
}

/// POST /api/v1/submissions/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    RequireAdvisor(advisor): RequireAdvisor,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SubmissionView>>> {
    review(&state, &advisor, id, SubmissionStatus::Read, None).await
}

/// POST /api/v1/submissions/{id}/revision
pub async fn request_revision(
    State(state): State<AppState>,
    RequireAdvisor(advisor): RequireAdvisor,
    Path(id): Path<DbId>,
    Json(input): Json<RevisionRequest>,
) -> AppResult<Json<DataResponse<SubmissionView>>> {
    validate_revision_notes(&input.notes)?;
    review(
        &state,
        &advisor,
        id,
        SubmissionStatus::NeedRevision,
        Some(input.notes.trim()),
    )
    .await
}

/// POST /api/v1/submissions/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    RequireAdvisor(advisor): RequireAdvisor,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SubmissionView>>> {
    review(&state, &advisor, id, SubmissionStatus::Done, None).await
}

/// POST /api/v1/submissions/{id}/resubmit
///
/// Upload a new version after a revision request. The submission goes
/// back to `unread` in the advisor's queue.
pub async fn resubmit(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
    Path(id): Path<DbId>,
    Json(input): Json<ResubmitRequest>,
) -> AppResult<Json<DataResponse<SubmissionView>>> {
    validate_input(&input)?;
    let submission = load_submission(&state, id).await?;
    if submission.student_id != student.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the submitting student can resubmit".into(),
        )));
    }
    validate_transition(submission.status.parse()?, SubmissionStatus::Unread)?;

    let dto = Resubmission {
        file_url: input.file_url,
        file_name: input.file_name.trim().to_string(),
        description: normalize_optional(input.description),
    };
    let updated = SubmissionRepo::resubmit(&state.pool, id, &dto)
        .await?
        .ok_or_else(|| stale("Submission", id))?;

    tracing::info!(submission_id = id, student_id = student.user_id, "Submission resubmitted");
    Ok(Json(DataResponse {
        data: updated.into(),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_submission(state: &AppState, id: DbId) -> AppResult<Submission> {
    SubmissionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Submission",
            id,
        }))
}

/// Apply an advisor review action to a submission addressed to `advisor`.
async fn review(
    state: &AppState,
    advisor: &AuthUser,
    id: DbId,
    to: SubmissionStatus,
    revision_notes: Option<&str>,
) -> AppResult<Json<DataResponse<SubmissionView>>> {
    let submission = load_submission(state, id).await?;
    if submission.advisor_id != advisor.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "This submission is addressed to another advisor".into(),
        )));
    }
    let current = submission.status.parse::<SubmissionStatus>()?;
    validate_transition(current, to)?;

    let updated = SubmissionRepo::review(&state.pool, id, current, to, revision_notes)
        .await?
        .ok_or_else(|| stale("Submission", id))?;

    tracing::info!(
        submission_id = id,
        advisor_id = advisor.user_id,
        from = %current,
        to = %to,
        "Submission reviewed"
    );
    Ok(Json(DataResponse {
        data: updated.into(),
    }))
}
