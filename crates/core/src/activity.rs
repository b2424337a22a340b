//! Activity feed aggregation.
//!
//! Merges a viewer's meetings and submissions into one feed ordered by
//! time, most recent first. Which source statuses are visible depends on
//! the feed (recent activity vs history) and the viewer's role; that table
//! lives in [`FeedPolicy`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::meeting::MeetingStatus;
use crate::roles::{ROLE_ADVISOR, ROLE_STUDENT};
use crate::submission::SubmissionStatus;
use crate::types::Timestamp;

/* --------------------------------------------------------------------------
Records
-------------------------------------------------------------------------- */

/// Which source collection an activity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityCategory {
    Meeting,
    Submission,
}

/// A record from either source collection, reduced to the fields the
/// aggregator needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    /// Stable identifier, unique within the feed (e.g. `meeting-12`).
    pub key: String,
    pub label: String,
    /// Status as stored at the source.
    pub status: String,
    /// `None` when the source row has no usable timestamp.
    pub occurred_at: Option<Timestamp>,
}

/// One entry of the merged feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityRecord {
    pub identifier: String,
    pub label: String,
    pub occurred_at: Timestamp,
    pub category: ActivityCategory,
    pub status_at_source: String,
}

/// Result of [`aggregate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityFeed {
    /// Sorted by `occurred_at`, newest first.
    pub records: Vec<ActivityRecord>,
    /// Allowed records dropped because they had no timestamp.
    pub skipped: usize,
}

/* --------------------------------------------------------------------------
Aggregation
-------------------------------------------------------------------------- */

/// Filter both collections by their allow-lists, tag each survivor with
/// its category, and merge them newest first.
///
/// Ties on `occurred_at` keep input order: meetings before submissions,
/// each in the order given. Allowed records without a timestamp are not
/// emitted; they are counted in [`ActivityFeed::skipped`].
pub fn aggregate(
    meetings: Vec<SourceRecord>,
    submissions: Vec<SourceRecord>,
    meeting_allow_list: &[&str],
    submission_allow_list: &[&str],
) -> ActivityFeed {
    let mut feed = ActivityFeed::default();

    project(meetings, meeting_allow_list, ActivityCategory::Meeting, &mut feed);
    project(
        submissions,
        submission_allow_list,
        ActivityCategory::Submission,
        &mut feed,
    );

    // `sort_by` is stable, which is what makes tie order deterministic.
    feed.records.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    feed
}

fn project(
    source: Vec<SourceRecord>,
    allow_list: &[&str],
    category: ActivityCategory,
    feed: &mut ActivityFeed,
) {
    for record in source {
        if !allow_list.contains(&record.status.as_str()) {
            continue;
        }
        let Some(occurred_at) = record.occurred_at else {
            feed.skipped += 1;
            continue;
        };
        feed.records.push(ActivityRecord {
            identifier: record.key,
            label: record.label,
            occurred_at,
            category,
            status_at_source: record.status,
        });
    }
}

/* --------------------------------------------------------------------------
Feed policy
-------------------------------------------------------------------------- */

/// The perspective a feed is requested from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerRole {
    Student,
    Advisor,
}

impl ViewerRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            ViewerRole::Student => ROLE_STUDENT,
            ViewerRole::Advisor => ROLE_ADVISOR,
        }
    }
}

impl fmt::Display for ViewerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewerRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_STUDENT => Ok(ViewerRole::Student),
            ROLE_ADVISOR => Ok(ViewerRole::Advisor),
            other => Err(CoreError::Validation(format!(
                "Invalid viewer role '{other}'. Must be one of: student, advisor"
            ))),
        }
    }
}

/// Which feed is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    /// Items that still need the viewer's attention.
    Recent,
    /// Completed meetings and accepted submissions.
    History,
}

/// Which submission timestamp a feed sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionTimestamp {
    SubmittedAt,
    ReviewedAt,
}

/// Allow-lists and timestamp choice for one (feed, viewer) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedPolicy {
    pub meeting_statuses: &'static [&'static str],
    pub submission_statuses: &'static [&'static str],
    pub submission_timestamp: SubmissionTimestamp,
}

const ACCEPTED: &str = MeetingStatus::Accepted.as_str();
const WAITING: &str = MeetingStatus::Waiting.as_str();
const MEETING_DONE: &str = MeetingStatus::Done.as_str();
const UNREAD: &str = SubmissionStatus::Unread.as_str();
const READ: &str = SubmissionStatus::Read.as_str();
const NEED_REVISION: &str = SubmissionStatus::NeedRevision.as_str();
const SUBMISSION_DONE: &str = SubmissionStatus::Done.as_str();

impl FeedPolicy {
    /// Look up the policy for a feed.
    ///
    /// | Feed    | Viewer  | Meetings          | Submissions     |
    /// |---------|---------|-------------------|-----------------|
    /// | recent  | student | accepted          | need_revision   |
    /// | recent  | advisor | waiting, accepted | unread, read    |
    /// | history | any     | done              | done            |
    pub fn for_view(kind: FeedKind, viewer: ViewerRole) -> Self {
        match (kind, viewer) {
            (FeedKind::Recent, ViewerRole::Student) => FeedPolicy {
                meeting_statuses: &[ACCEPTED],
                submission_statuses: &[NEED_REVISION],
                submission_timestamp: SubmissionTimestamp::ReviewedAt,
            },
            (FeedKind::Recent, ViewerRole::Advisor) => FeedPolicy {
                meeting_statuses: &[WAITING, ACCEPTED],
                submission_statuses: &[UNREAD, READ],
                submission_timestamp: SubmissionTimestamp::SubmittedAt,
            },
            (FeedKind::History, _) => FeedPolicy {
                meeting_statuses: &[MEETING_DONE],
                submission_statuses: &[SUBMISSION_DONE],
                submission_timestamp: SubmissionTimestamp::SubmittedAt,
            },
        }
    }

    /// Run [`aggregate`] with this policy's allow-lists.
    pub fn apply(
        &self,
        meetings: Vec<SourceRecord>,
        submissions: Vec<SourceRecord>,
    ) -> ActivityFeed {
        aggregate(
            meetings,
            submissions,
            self.meeting_statuses,
            self.submission_statuses,
        )
    }
}
