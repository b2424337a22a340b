//! Repository for the `calendar_events` table.

use bimbingan_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::calendar::{CalendarEvent, CreateCalendarEvent, UpdateCalendarEvent};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, created_by, title, description, location, starts_at, ends_at, \
                        is_public, created_at, updated_at";

/// Provides CRUD operations for calendar events.
pub struct CalendarRepo;

impl CalendarRepo {
    /// Insert a new event, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCalendarEvent,
    ) -> Result<CalendarEvent, sqlx::Error> {
        let query = format!(
            "INSERT INTO calendar_events (created_by, title, description, location, starts_at, ends_at, is_public)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(input.created_by)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.location)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(input.is_public)
            .fetch_one(pool)
            .await
    }

    /// Find an event by internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CalendarEvent>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM calendar_events WHERE id = $1");
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List events overlapping the optional `[from, to]` window, earliest first.
    ///
    /// With `creators = None` every event is returned. Otherwise only public
    /// events and events created by one of `creators` are returned.
    pub async fn list_visible(
        pool: &PgPool,
        creators: Option<&[DbId]>,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    ) -> Result<Vec<CalendarEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM calendar_events
             WHERE ($1::BIGINT[] IS NULL OR is_public = true OR created_by = ANY($1))
               AND ($2::TIMESTAMPTZ IS NULL OR ends_at >= $2)
               AND ($3::TIMESTAMPTZ IS NULL OR starts_at <= $3)
             ORDER BY starts_at ASC, id ASC"
        );
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(creators)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    /// Update an event. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCalendarEvent,
    ) -> Result<Option<CalendarEvent>, sqlx::Error> {
        let query = format!(
            "UPDATE calendar_events SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                location = COALESCE($4, location),
                starts_at = COALESCE($5, starts_at),
                ends_at = COALESCE($6, ends_at),
                is_public = COALESCE($7, is_public)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.location)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(input.is_public)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete an event. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM calendar_events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
