//! Repository for the `advisor_assignments` table.

use bimbingan_core::types::DbId;
use sqlx::PgPool;

use crate::models::assignment::{
    AdvisorAssignment, AssignmentDetail, CreateAssignment, UpdateAssignment,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, student_id, advisor_id, advisor_order, thesis_title, is_active, \
                        created_at, updated_at";

/// Joined select used by every listing that returns [`AssignmentDetail`].
const DETAIL_SELECT: &str = "SELECT a.id, a.student_id, s.full_name AS student_name, \
        s.identity_number AS student_identity_number, a.advisor_id, \
        d.full_name AS advisor_name, d.identity_number AS advisor_identity_number, \
        a.advisor_order, a.thesis_title, a.is_active, a.created_at \
     FROM advisor_assignments a \
     JOIN users s ON s.id = a.student_id \
     JOIN users d ON d.id = a.advisor_id";

/// Provides CRUD operations for advisor assignments.
pub struct AssignmentRepo;

impl AssignmentRepo {
    /// Insert a new assignment, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAssignment,
    ) -> Result<AdvisorAssignment, sqlx::Error> {
        let query = format!(
            "INSERT INTO advisor_assignments (student_id, advisor_id, advisor_order, thesis_title)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdvisorAssignment>(&query)
            .bind(input.student_id)
            .bind(input.advisor_id)
            .bind(input.advisor_order)
            .bind(&input.thesis_title)
            .fetch_one(pool)
            .await
    }

    /// Find an assignment by internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AdvisorAssignment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM advisor_assignments WHERE id = $1");
        sqlx::query_as::<_, AdvisorAssignment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the active assignment pairing `student_id` with `advisor_id`.
    pub async fn find_active_pair(
        pool: &PgPool,
        student_id: DbId,
        advisor_id: DbId,
    ) -> Result<Option<AdvisorAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM advisor_assignments
             WHERE student_id = $1 AND advisor_id = $2 AND is_active = true"
        );
        sqlx::query_as::<_, AdvisorAssignment>(&query)
            .bind(student_id)
            .bind(advisor_id)
            .fetch_optional(pool)
            .await
    }

    /// List all assignments with names, newest first.
    pub async fn list_detailed(
        pool: &PgPool,
        include_inactive: bool,
    ) -> Result<Vec<AssignmentDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE ($1 OR a.is_active = true)
             ORDER BY a.created_at DESC, a.id DESC"
        );
        sqlx::query_as::<_, AssignmentDetail>(&query)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    /// Active advisors of a student, primary advisor first.
    pub async fn list_for_student(
        pool: &PgPool,
        student_id: DbId,
    ) -> Result<Vec<AssignmentDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE a.student_id = $1 AND a.is_active = true
             ORDER BY a.advisor_order ASC"
        );
        sqlx::query_as::<_, AssignmentDetail>(&query)
            .bind(student_id)
            .fetch_all(pool)
            .await
    }

    /// Active students of an advisor, ordered by student name.
    pub async fn list_for_advisor(
        pool: &PgPool,
        advisor_id: DbId,
    ) -> Result<Vec<AssignmentDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE a.advisor_id = $1 AND a.is_active = true
             ORDER BY s.full_name ASC, a.id ASC"
        );
        sqlx::query_as::<_, AssignmentDetail>(&query)
            .bind(advisor_id)
            .fetch_all(pool)
            .await
    }

    /// IDs of the advisors a student is actively paired with.
    pub async fn active_advisor_ids(
        pool: &PgPool,
        student_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT advisor_id FROM advisor_assignments
             WHERE student_id = $1 AND is_active = true
             ORDER BY advisor_order ASC",
        )
        .bind(student_id)
        .fetch_all(pool)
        .await
    }

    /// Update an assignment. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAssignment,
    ) -> Result<Option<AdvisorAssignment>, sqlx::Error> {
        let query = format!(
            "UPDATE advisor_assignments SET
                advisor_order = COALESCE($2, advisor_order),
                thesis_title = COALESCE($3, thesis_title),
                is_active = COALESCE($4, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdvisorAssignment>(&query)
            .bind(id)
            .bind(input.advisor_order)
            .bind(&input.thesis_title)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Deactivate an assignment. Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE advisor_assignments SET is_active = false WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
