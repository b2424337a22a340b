//! Submission (progress) model and DTOs.

use bimbingan_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `submissions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Submission {
    pub id: DbId,
    pub student_id: DbId,
    pub advisor_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub file_url: String,
    pub file_name: String,
    /// One of `unread`, `read`, `need_revision`, `done`.
    pub status: String,
    pub revision_notes: Option<String>,
    pub submitted_at: Timestamp,
    pub reviewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for a new submission.
#[derive(Debug, Deserialize)]
pub struct CreateSubmission {
    pub student_id: DbId,
    pub advisor_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub file_url: String,
    pub file_name: String,
}

/// DTO for a resubmission after a revision request.
#[derive(Debug, Deserialize)]
pub struct Resubmission {
    pub file_url: String,
    pub file_name: String,
    pub description: Option<String>,
}
