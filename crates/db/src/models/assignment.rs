//! Advisor assignment (pairing) model and DTOs.

use bimbingan_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `advisor_assignments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdvisorAssignment {
    pub id: DbId,
    pub student_id: DbId,
    pub advisor_id: DbId,
    /// 1 = primary advisor, 2 = co-advisor.
    pub advisor_order: i16,
    pub thesis_title: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An assignment joined with both users' display fields.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssignmentDetail {
    pub id: DbId,
    pub student_id: DbId,
    pub student_name: String,
    pub student_identity_number: Option<String>,
    pub advisor_id: DbId,
    pub advisor_name: String,
    pub advisor_identity_number: Option<String>,
    pub advisor_order: i16,
    pub thesis_title: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
}

/// DTO for creating a new assignment.
#[derive(Debug, Deserialize)]
pub struct CreateAssignment {
    pub student_id: DbId,
    pub advisor_id: DbId,
    pub advisor_order: i16,
    pub thesis_title: Option<String>,
}

/// DTO for updating an assignment. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAssignment {
    pub advisor_order: Option<i16>,
    pub thesis_title: Option<String>,
    pub is_active: Option<bool>,
}
