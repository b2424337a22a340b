//! Meeting (jadwal) model and DTOs.

use bimbingan_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `meetings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Meeting {
    pub id: DbId,
    pub student_id: DbId,
    pub advisor_id: DbId,
    pub topic: String,
    pub description: Option<String>,
    pub location: Option<String>,
    /// `None` while the request has no agreed time.
    pub scheduled_at: Option<Timestamp>,
    /// One of `waiting`, `accepted`, `declined`, `done`.
    pub status: String,
    pub decline_reason: Option<String>,
    pub advisor_notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for a student's meeting request.
#[derive(Debug, Deserialize)]
pub struct CreateMeeting {
    pub student_id: DbId,
    pub advisor_id: DbId,
    pub topic: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub scheduled_at: Option<Timestamp>,
}
