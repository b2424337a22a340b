//! Repository for the `meetings` table.
//!
//! Status changes are guarded by the status the caller validated against,
//! so a concurrent change makes the update return `None` instead of
//! silently overwriting it.

use bimbingan_core::meeting::MeetingStatus;
use bimbingan_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::meeting::{CreateMeeting, Meeting};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, student_id, advisor_id, topic, description, location, scheduled_at, \
                        status, decline_reason, advisor_notes, created_at, updated_at";

/// Provides CRUD and lifecycle operations for meetings.
pub struct MeetingRepo;

impl MeetingRepo {
    /// Insert a new meeting request in the `waiting` status.
    pub async fn create(pool: &PgPool, input: &CreateMeeting) -> Result<Meeting, sqlx::Error> {
        let query = format!(
            "INSERT INTO meetings (student_id, advisor_id, topic, description, location, scheduled_at, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Meeting>(&query)
            .bind(input.student_id)
            .bind(input.advisor_id)
            .bind(&input.topic)
            .bind(&input.description)
            .bind(&input.location)
            .bind(input.scheduled_at)
            .bind(MeetingStatus::Waiting.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a meeting by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Meeting>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM meetings WHERE id = $1");
        sqlx::query_as::<_, Meeting>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a student's meetings, newest request first.
    pub async fn list_for_student(
        pool: &PgPool,
        student_id: DbId,
        status: Option<&str>,
    ) -> Result<Vec<Meeting>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM meetings
             WHERE student_id = $1 AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Meeting>(&query)
            .bind(student_id)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// List an advisor's meetings, newest request first.
    pub async fn list_for_advisor(
        pool: &PgPool,
        advisor_id: DbId,
        status: Option<&str>,
    ) -> Result<Vec<Meeting>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM meetings
             WHERE advisor_id = $1 AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Meeting>(&query)
            .bind(advisor_id)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Move a waiting request to `accepted` at the given time.
    ///
    /// `location` replaces the requested location only when provided.
    pub async fn accept(
        pool: &PgPool,
        id: DbId,
        scheduled_at: Timestamp,
        location: Option<&str>,
    ) -> Result<Option<Meeting>, sqlx::Error> {
        let query = format!(
            "UPDATE meetings SET
                status = $2,
                scheduled_at = $3,
                location = COALESCE($4, location)
             WHERE id = $1 AND status = $5
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Meeting>(&query)
            .bind(id)
            .bind(MeetingStatus::Accepted.as_str())
            .bind(scheduled_at)
            .bind(location)
            .bind(MeetingStatus::Waiting.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Decline a meeting that is currently in `from`.
    pub async fn decline(
        pool: &PgPool,
        id: DbId,
        from: MeetingStatus,
        reason: &str,
    ) -> Result<Option<Meeting>, sqlx::Error> {
        let query = format!(
            "UPDATE meetings SET status = $2, decline_reason = $3
             WHERE id = $1 AND status = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Meeting>(&query)
            .bind(id)
            .bind(MeetingStatus::Declined.as_str())
            .bind(reason)
            .bind(from.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Mark an accepted meeting as done, optionally recording the advisor's notes.
    pub async fn complete(
        pool: &PgPool,
        id: DbId,
        advisor_notes: Option<&str>,
    ) -> Result<Option<Meeting>, sqlx::Error> {
        let query = format!(
            "UPDATE meetings SET status = $2, advisor_notes = COALESCE($3, advisor_notes)
             WHERE id = $1 AND status = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Meeting>(&query)
            .bind(id)
            .bind(MeetingStatus::Done.as_str())
            .bind(advisor_notes)
            .bind(MeetingStatus::Accepted.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Delete a request that is still waiting. Returns `true` if a row was removed.
    pub async fn delete_waiting(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM meetings WHERE id = $1 AND status = $2")
            .bind(id)
            .bind(MeetingStatus::Waiting.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
