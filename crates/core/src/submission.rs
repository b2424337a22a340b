//! Submission (progress) review lifecycle.
//!
//! Students upload a document for one of their advisors; the advisor reads
//! it and either asks for a revision or marks it done. A revision request
//! sends the submission back to the student, who resubmits a new file.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum length for the notes attached to a revision request.
pub const MAX_REVISION_NOTES_LENGTH: usize = 5_000;

/// Review status of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Unread,
    Read,
    NeedRevision,
    Done,
}

impl SubmissionStatus {
    pub const ALL: [SubmissionStatus; 4] = [
        SubmissionStatus::Unread,
        SubmissionStatus::Read,
        SubmissionStatus::NeedRevision,
        SubmissionStatus::Done,
    ];

    /// The string stored in the database.
    pub const fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::Unread => "unread",
            SubmissionStatus::Read => "read",
            SubmissionStatus::NeedRevision => "need_revision",
            SubmissionStatus::Done => "done",
        }
    }

    /// Whether a submission in `self` may move to `next`.
    ///
    /// `NeedRevision -> Unread` is the student's resubmission; every other
    /// edge is an advisor review action.
    pub fn can_transition_to(self, next: SubmissionStatus) -> bool {
        use SubmissionStatus::*;
        matches!(
            (self, next),
            (Unread, Read)
                | (Unread, NeedRevision)
                | (Unread, Done)
                | (Read, NeedRevision)
                | (Read, Done)
                | (NeedRevision, Unread)
        )
    }

    /// Whether moving into this status records a review time.
    pub fn stamps_review(self) -> bool {
        matches!(self, SubmissionStatus::NeedRevision | SubmissionStatus::Done)
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubmissionStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid submission status '{s}'. Must be one of: unread, read, need_revision, done"
                ))
            })
    }
}

/// Check that a submission currently in `current` can move to `next`.
pub fn validate_transition(
    current: SubmissionStatus,
    next: SubmissionStatus,
) -> Result<(), CoreError> {
    if current.can_transition_to(next) {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Submission cannot move from '{current}' to '{next}'"
        )))
    }
}

/// Validate the notes an advisor attaches when requesting a revision.
pub fn validate_revision_notes(notes: &str) -> Result<(), CoreError> {
    let trimmed = notes.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Revision notes are required when requesting a revision".to_string(),
        ));
    }
    if trimmed.len() > MAX_REVISION_NOTES_LENGTH {
        return Err(CoreError::Validation(format!(
            "Revision notes exceed maximum length of {MAX_REVISION_NOTES_LENGTH} characters"
        )));
    }
    Ok(())
}
