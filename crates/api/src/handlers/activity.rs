//! Handlers for the aggregated activity feeds.
//!
//! `GET /recent-activity/{role}/{viewer_id}` and `GET /history/{role}/{viewer_id}`
//! fetch the viewer's meetings and submissions concurrently, project them
//! into [`SourceRecord`]s and merge them with the [`FeedPolicy`] for the
//! requested view.

use axum::extract::{Path, State};
use axum::Json;
use bimbingan_core::activity::{
    ActivityCategory, ActivityRecord, FeedKind, FeedPolicy, SourceRecord, SubmissionTimestamp,
    ViewerRole,
};
use bimbingan_core::display::{format_short_datetime, status_label};
use bimbingan_core::error::CoreError;
use bimbingan_core::types::{DbId, Timestamp};
use bimbingan_db::models::meeting::Meeting;
use bimbingan_db::models::submission::Submission;
use bimbingan_db::repositories::{MeetingRepo, RoleRepo, SubmissionRepo, UserRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// One entry of a feed as returned to clients.
#[derive(Debug, Serialize)]
pub struct FeedItem {
    /// `meeting-{id}` or `submission-{id}`.
    pub identifier: String,
    pub label: String,
    pub occurred_at: Timestamp,
    /// `25 Jan 2024 09:00` in WIB.
    pub occurred_at_display: String,
    pub category: ActivityCategory,
    pub status: String,
    pub status_label: String,
}

impl From<ActivityRecord> for FeedItem {
    fn from(record: ActivityRecord) -> Self {
        Self {
            occurred_at_display: format_short_datetime(record.occurred_at),
            status_label: status_label(record.category, &record.status_at_source),
            identifier: record.identifier,
            label: record.label,
            occurred_at: record.occurred_at,
            category: record.category,
            status: record.status_at_source,
        }
    }
}

/// GET /api/v1/recent-activity/{role}/{viewer_id}
///
/// Items that still need attention, newest first.
pub async fn recent_activity(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((role, viewer_id)): Path<(String, DbId)>,
) -> AppResult<Json<DataResponse<Vec<FeedItem>>>> {
    build_feed(&state, &auth_user, FeedKind::Recent, &role, viewer_id).await
}

/// GET /api/v1/history/{role}/{viewer_id}
///
/// Completed meetings and approved submissions, newest first.
pub async fn history(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((role, viewer_id)): Path<(String, DbId)>,
) -> AppResult<Json<DataResponse<Vec<FeedItem>>>> {
    build_feed(&state, &auth_user, FeedKind::History, &role, viewer_id).await
}

async fn build_feed(
    state: &AppState,
    auth_user: &AuthUser,
    kind: FeedKind,
    role: &str,
    viewer_id: DbId,
) -> AppResult<Json<DataResponse<Vec<FeedItem>>>> {
    let viewer = role.parse::<ViewerRole>()?;
    ensure_can_view(auth_user, viewer, viewer_id)?;
    ensure_viewer_role(state, viewer, viewer_id).await?;

    let pool = &state.pool;
    let (meetings, submissions) = match viewer {
        ViewerRole::Student => tokio::try_join!(
            MeetingRepo::list_for_student(pool, viewer_id, None),
            SubmissionRepo::list_for_student(pool, viewer_id, None),
        )?,
        ViewerRole::Advisor => tokio::try_join!(
            MeetingRepo::list_for_advisor(pool, viewer_id, None),
            SubmissionRepo::list_for_advisor(pool, viewer_id, None),
        )?,
    };

    let policy = FeedPolicy::for_view(kind, viewer);
    let feed = policy.apply(
        meetings.into_iter().map(meeting_source).collect(),
        submissions
            .into_iter()
            .map(|s| submission_source(s, policy.submission_timestamp))
            .collect(),
    );

    if feed.skipped > 0 {
        tracing::warn!(
            viewer_id,
            role = %viewer,
            skipped = feed.skipped,
            "Skipped feed records without a timestamp"
        );
    }

    Ok(Json(DataResponse {
        data: feed.records.into_iter().map(FeedItem::from).collect(),
    }))
}

/// Viewers may read their own feed; admins may read anyone's.
fn ensure_can_view(user: &AuthUser, viewer: ViewerRole, viewer_id: DbId) -> AppResult<()> {
    if user.is_admin() || (user.user_id == viewer_id && user.role == viewer.as_str()) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "You can only view your own activity".into(),
        )))
    }
}

/// The viewer must exist and actually hold the role named in the path.
async fn ensure_viewer_role(state: &AppState, viewer: ViewerRole, viewer_id: DbId) -> AppResult<()> {
    let user = UserRepo::find_by_id(&state.pool, viewer_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: viewer_id,
        }))?;
    let role_name = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    if role_name != viewer.as_str() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "User {viewer_id} is not a {viewer}"
        ))));
    }
    Ok(())
}

/// A request without an agreed time sorts by when it was made.
fn meeting_source(meeting: Meeting) -> SourceRecord {
    SourceRecord {
        key: format!("meeting-{}", meeting.id),
        label: meeting.topic,
        status: meeting.status,
        occurred_at: meeting.scheduled_at.or(Some(meeting.created_at)),
    }
}

fn submission_source(submission: Submission, timestamp: SubmissionTimestamp) -> SourceRecord {
    let occurred_at = match timestamp {
        SubmissionTimestamp::SubmittedAt => Some(submission.submitted_at),
        SubmissionTimestamp::ReviewedAt => submission.reviewed_at,
    };
    SourceRecord {
        key: format!("submission-{}", submission.id),
        label: submission.title,
        status: submission.status,
        occurred_at,
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    use super::*;

    fn at(day: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 1, day, 2, 0, 0).unwrap()
    }

    fn meeting(id: DbId, status: &str, scheduled_at: Option<Timestamp>) -> Meeting {
        Meeting {
            id,
            student_id: 1,
            advisor_id: 2,
            topic: "Konsultasi metodologi".to_string(),
            description: None,
            location: None,
            scheduled_at,
            status: status.to_string(),
            decline_reason: None,
            advisor_notes: None,
            created_at: at(5),
            updated_at: at(5),
        }
    }

    fn submission(id: DbId, reviewed_at: Option<Timestamp>) -> Submission {
        Submission {
            id,
            student_id: 1,
            advisor_id: 2,
            title: "Bab 1".to_string(),
            description: None,
            file_url: "https://storage.example.com/bab1.pdf".to_string(),
            file_name: "bab1.pdf".to_string(),
            status: "need_revision".to_string(),
            revision_notes: None,
            submitted_at: at(10),
            reviewed_at,
            created_at: at(10),
            updated_at: at(12),
        }
    }

    #[test]
    fn submission_timestamp_follows_policy() {
        let reviewed = submission_source(submission(3, Some(at(12))), SubmissionTimestamp::ReviewedAt);
        assert_eq!(reviewed.key, "submission-3");
        assert_eq!(reviewed.occurred_at, Some(at(12)));

        let submitted =
            submission_source(submission(3, Some(at(12))), SubmissionTimestamp::SubmittedAt);
        assert_eq!(submitted.occurred_at, Some(at(10)));

        let unreviewed = submission_source(submission(4, None), SubmissionTimestamp::ReviewedAt);
        assert_eq!(unreviewed.occurred_at, None);
    }

    #[test]
    fn unscheduled_request_uses_request_time() {
        let scheduled = meeting_source(meeting(1, "waiting", Some(at(25))));
        assert_eq!(scheduled.occurred_at, Some(at(25)));

        let unscheduled = meeting_source(meeting(2, "waiting", None));
        assert_eq!(unscheduled.key, "meeting-2");
        assert_eq!(unscheduled.occurred_at, Some(at(5)));
    }

    #[test]
    fn advisor_recent_feed_keeps_unscheduled_requests() {
        let policy = FeedPolicy::for_view(FeedKind::Recent, ViewerRole::Advisor);
        let feed = policy.apply(
            vec![
                meeting_source(meeting(1, "waiting", Some(at(25)))),
                meeting_source(meeting(2, "waiting", None)),
            ],
            vec![submission_source(
                Submission {
                    status: "unread".to_string(),
                    ..submission(3, None)
                },
                policy.submission_timestamp,
            )],
        );

        assert_eq!(feed.skipped, 0);
        let order: Vec<_> = feed.records.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(order, ["meeting-1", "submission-3", "meeting-2"]);
    }

    #[test]
    fn done_is_labelled_through_its_category() {
        let item = |identifier: &str, category| {
            FeedItem::from(ActivityRecord {
                identifier: identifier.to_string(),
                label: "Bab 3".to_string(),
                occurred_at: at(20),
                category,
                status_at_source: "done".to_string(),
            })
        };

        let meeting = item("meeting-7", ActivityCategory::Meeting);
        let submission = item("submission-8", ActivityCategory::Submission);
        assert_eq!(meeting.status_label, "Selesai");
        assert_eq!(submission.status_label, "Selesai");
        assert_eq!(meeting.category, ActivityCategory::Meeting);
        assert_eq!(submission.category, ActivityCategory::Submission);
    }

    #[test]
    fn feed_item_carries_label_and_display_time() {
        let item = FeedItem::from(ActivityRecord {
            identifier: "submission-3".to_string(),
            label: "Bab 1".to_string(),
            occurred_at: at(25),
            category: ActivityCategory::Submission,
            status_at_source: "need_revision".to_string(),
        });
        assert_eq!(item.status, "need_revision");
        assert_eq!(item.status_label, "Perlu Revisi");
        assert_eq!(item.occurred_at_display, "25 Jan 2024 09:00");
    }

    #[test]
    fn only_self_or_admin_can_view() {
        let student = AuthUser {
            user_id: 5,
            role: "student".to_string(),
        };
        assert!(ensure_can_view(&student, ViewerRole::Student, 5).is_ok());
        assert_matches!(
            ensure_can_view(&student, ViewerRole::Student, 6),
            Err(AppError::Core(CoreError::Forbidden(_)))
        );
        assert_matches!(
            ensure_can_view(&student, ViewerRole::Advisor, 5),
            Err(AppError::Core(CoreError::Forbidden(_)))
        );

        let admin = AuthUser {
            user_id: 1,
            role: "admin".to_string(),
        };
        assert!(ensure_can_view(&admin, ViewerRole::Advisor, 9).is_ok());
    }
}
