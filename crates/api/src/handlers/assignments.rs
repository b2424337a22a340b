//! Handlers for advisor assignments (pairings).
//!
//! `/admin/assignments` is admin-only; `/assignments/mine` lets students
//! and advisors see their own active pairings.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bimbingan_core::assignment::{validate_advisor_order, validate_pair_roles};
use bimbingan_core::display::advisor_order_label;
use bimbingan_core::error::CoreError;
use bimbingan_core::types::DbId;
use bimbingan_core::validation::{normalize_optional, validate_input};
use bimbingan_db::models::assignment::{
    AdvisorAssignment, AssignmentDetail, CreateAssignment, UpdateAssignment,
};
use bimbingan_db::models::user::User;
use bimbingan_db::repositories::{AssignmentRepo, RoleRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::IncludeInactiveParams;
use crate::response::{created, Created, DataResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/assignments`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAssignmentRequest {
    pub student_id: DbId,
    pub advisor_id: DbId,
    pub advisor_order: i16,
    #[validate(length(max = 500))]
    pub thesis_title: Option<String>,
}

/// Request body for `PUT /admin/assignments/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAssignmentRequest {
    pub advisor_order: Option<i16>,
    #[validate(length(max = 500))]
    pub thesis_title: Option<String>,
    pub is_active: Option<bool>,
}

/// A pairing with its display label (`Pembimbing 1`).
#[derive(Debug, Serialize)]
pub struct AssignmentView {
    #[serde(flatten)]
    pub assignment: AssignmentDetail,
    pub order_label: String,
}

impl From<AssignmentDetail> for AssignmentView {
    fn from(assignment: AssignmentDetail) -> Self {
        let order_label = advisor_order_label(assignment.advisor_order);
        Self {
            assignment,
            order_label,
        }
    }
}

// ---------------------------------------------------------------------------
// Admin handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/assignments
pub async fn list_assignments(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<Json<DataResponse<Vec<AssignmentView>>>> {
    let rows = AssignmentRepo::list_detailed(&state.pool, params.include_inactive).await?;
    Ok(Json(DataResponse {
        data: rows.into_iter().map(AssignmentView::from).collect(),
    }))
}

/// POST /api/v1/admin/assignments
///
/// Pair a student with an advisor. Both users must exist, be active and
/// hold the matching roles.
pub async fn create_assignment(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateAssignmentRequest>,
) -> AppResult<Created<AdvisorAssignment>> {
    validate_input(&input)?;
    validate_advisor_order(input.advisor_order)?;

    let student = load_active_user(&state, input.student_id).await?;
    let advisor = load_active_user(&state, input.advisor_id).await?;
    let student_role = RoleRepo::resolve_name(&state.pool, student.role_id).await?;
    let advisor_role = RoleRepo::resolve_name(&state.pool, advisor.role_id).await?;
    validate_pair_roles(&student_role, &advisor_role)?;

    let create_dto = CreateAssignment {
        student_id: student.id,
        advisor_id: advisor.id,
        advisor_order: input.advisor_order,
        thesis_title: normalize_optional(input.thesis_title),
    };

    let assignment = AssignmentRepo::create(&state.pool, &create_dto).await?;
    tracing::info!(
        assignment_id = assignment.id,
        student_id = student.id,
        advisor_id = advisor.id,
        admin_id = admin.user_id,
        "Advisor assigned"
    );

    Ok(created(assignment))
}

/// GET /api/v1/admin/assignments/{id}
pub async fn get_assignment(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AdvisorAssignment>>> {
    let assignment = AssignmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Assignment",
            id,
        }))?;
    Ok(Json(DataResponse { data: assignment }))
}

/// PUT /api/v1/admin/assignments/{id}
pub async fn update_assignment(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAssignmentRequest>,
) -> AppResult<Json<DataResponse<AdvisorAssignment>>> {
    validate_input(&input)?;
    if let Some(order) = input.advisor_order {
        validate_advisor_order(order)?;
    }

    let update_dto = UpdateAssignment {
        advisor_order: input.advisor_order,
        thesis_title: normalize_optional(input.thesis_title),
        is_active: input.is_active,
    };

    let assignment = AssignmentRepo::update(&state.pool, id, &update_dto)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Assignment",
            id,
        }))?;
    Ok(Json(DataResponse { data: assignment }))
}

/// DELETE /api/v1/admin/assignments/{id}
///
/// Deactivate a pairing. Meetings and submissions already exchanged are
/// kept. Returns 204 No Content.
pub async fn delete_assignment(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if AssignmentRepo::deactivate(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Assignment",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Participant handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/assignments/mine
///
/// A student's advisors (primary first) or an advisor's students.
pub async fn my_assignments(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<AssignmentView>>>> {
    let rows = if auth_user.is_student() {
        AssignmentRepo::list_for_student(&state.pool, auth_user.user_id).await?
    } else if auth_user.is_advisor() {
        AssignmentRepo::list_for_advisor(&state.pool, auth_user.user_id).await?
    } else {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only students and advisors have pairings".into(),
        )));
    };

    Ok(Json(DataResponse {
        data: rows.into_iter().map(AssignmentView::from).collect(),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_active_user(state: &AppState, id: DbId) -> AppResult<User> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    if !user.is_active {
        return Err(AppError::Core(CoreError::Validation(format!(
            "User {id} is deactivated"
        ))));
    }
    Ok(user)
}

/// Fail unless `student_id` is actively paired with `advisor_id`.
pub(crate) async fn ensure_paired(
    state: &AppState,
    student_id: DbId,
    advisor_id: DbId,
) -> AppResult<()> {
    match AssignmentRepo::find_active_pair(&state.pool, student_id, advisor_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::Core(CoreError::Forbidden(
            "You are not paired with this advisor".into(),
        ))),
    }
}
