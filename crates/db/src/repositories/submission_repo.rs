//! Repository for the `submissions` table.

use bimbingan_core::submission::SubmissionStatus;
use bimbingan_core::types::DbId;
use sqlx::PgPool;

use crate::models::submission::{CreateSubmission, Resubmission, Submission};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, student_id, advisor_id, title, description, file_url, file_name, \
                        status, revision_notes, submitted_at, reviewed_at, created_at, updated_at";

/// Provides CRUD and review operations for submissions.
pub struct SubmissionRepo;

impl SubmissionRepo {
    /// Insert a new submission in the `unread` status.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSubmission,
    ) -> Result<Submission, sqlx::Error> {
        let query = format!(
            "INSERT INTO submissions (student_id, advisor_id, title, description, file_url, file_name, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(input.student_id)
            .bind(input.advisor_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.file_url)
            .bind(&input.file_name)
            .bind(SubmissionStatus::Unread.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a submission by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM submissions WHERE id = $1");
        sqlx::query_as::<_, Submission>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a student's submissions, most recently submitted first.
    pub async fn list_for_student(
        pool: &PgPool,
        student_id: DbId,
        status: Option<&str>,
    ) -> Result<Vec<Submission>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM submissions
             WHERE student_id = $1 AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY submitted_at DESC, id DESC"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(student_id)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// List submissions addressed to an advisor, most recently submitted first.
    pub async fn list_for_advisor(
        pool: &PgPool,
        advisor_id: DbId,
        status: Option<&str>,
    ) -> Result<Vec<Submission>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM submissions
             WHERE advisor_id = $1 AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY submitted_at DESC, id DESC"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(advisor_id)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Apply an advisor review action, guarded by the current status.
    ///
    /// `revision_notes` is only written when provided. `reviewed_at` is set
    /// to now when `to` stamps a review.
    pub async fn review(
        pool: &PgPool,
        id: DbId,
        from: SubmissionStatus,
        to: SubmissionStatus,
        revision_notes: Option<&str>,
    ) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!(
            "UPDATE submissions SET
                status = $2,
                revision_notes = COALESCE($3, revision_notes),
                reviewed_at = CASE WHEN $4 THEN NOW() ELSE reviewed_at END
             WHERE id = $1 AND status = $5
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(id)
            .bind(to.as_str())
            .bind(revision_notes)
            .bind(to.stamps_review())
            .bind(from.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Replace the document of a submission awaiting revision and put it
    /// back in the advisor's queue.
    pub async fn resubmit(
        pool: &PgPool,
        id: DbId,
        input: &Resubmission,
    ) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!(
            "UPDATE submissions SET
                status = $2,
                file_url = $3,
                file_name = $4,
                description = COALESCE($5, description),
                submitted_at = NOW(),
                reviewed_at = NULL
             WHERE id = $1 AND status = $6
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(id)
            .bind(SubmissionStatus::Unread.as_str())
            .bind(&input.file_url)
            .bind(&input.file_name)
            .bind(&input.description)
            .bind(SubmissionStatus::NeedRevision.as_str())
            .fetch_optional(pool)
            .await
    }
}
