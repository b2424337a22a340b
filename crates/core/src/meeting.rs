//! Meeting (jadwal bimbingan) status lifecycle.
//!
//! A student requests a meeting, the advisor accepts or declines it, and an
//! accepted meeting is eventually marked done. Status values are stored as
//! text in the `meetings.status` column.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Maximum length for a decline reason.
pub const MAX_DECLINE_REASON_LENGTH: usize = 1_000;

/// Lifecycle status of a meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingStatus {
    /// Requested by the student, not yet answered.
    Waiting,
    Accepted,
    Declined,
    /// The meeting took place.
    Done,
}

impl MeetingStatus {
    pub const ALL: [MeetingStatus; 4] = [
        MeetingStatus::Waiting,
        MeetingStatus::Accepted,
        MeetingStatus::Declined,
        MeetingStatus::Done,
    ];

    /// The string stored in the database.
    pub const fn as_str(self) -> &'static str {
        match self {
            MeetingStatus::Waiting => "waiting",
            MeetingStatus::Accepted => "accepted",
            MeetingStatus::Declined => "declined",
            MeetingStatus::Done => "done",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, MeetingStatus::Declined | MeetingStatus::Done)
    }

    /// Whether a meeting in `self` may move to `next`.
    pub fn can_transition_to(self, next: MeetingStatus) -> bool {
        use MeetingStatus::*;
        matches!(
            (self, next),
            (Waiting, Accepted) | (Waiting, Declined) | (Accepted, Done) | (Accepted, Declined)
        )
    }
}

impl fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeetingStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MeetingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid meeting status '{s}'. Must be one of: waiting, accepted, declined, done"
                ))
            })
    }
}

/// Check that a meeting currently in `current` can move to `next`.
pub fn validate_transition(current: MeetingStatus, next: MeetingStatus) -> Result<(), CoreError> {
    if current.can_transition_to(next) {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Meeting cannot move from '{current}' to '{next}'"
        )))
    }
}

/// Resolve the time an accepted meeting takes place.
///
/// The advisor may supply a time when accepting; otherwise the time the
/// student proposed is kept. One of the two must be present.
pub fn resolve_accepted_time(
    proposed: Option<Timestamp>,
    from_advisor: Option<Timestamp>,
) -> Result<Timestamp, CoreError> {
    from_advisor.or(proposed).ok_or_else(|| {
        CoreError::Validation(
            "A meeting time is required to accept a request without a proposed time".to_string(),
        )
    })
}

/// Validate the reason an advisor gives when declining a meeting.
pub fn validate_decline_reason(reason: &str) -> Result<(), CoreError> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "A reason is required when declining a meeting".to_string(),
        ));
    }
    if trimmed.len() > MAX_DECLINE_REASON_LENGTH {
        return Err(CoreError::Validation(format!(
            "Decline reason exceeds maximum length of {MAX_DECLINE_REASON_LENGTH} characters"
        )));
    }
    Ok(())
}

/// A student may only withdraw a request that has not been answered yet.
pub fn validate_cancellable(current: MeetingStatus) -> Result<(), CoreError> {
    if current == MeetingStatus::Waiting {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Only waiting meetings can be cancelled (current status: '{current}')"
        )))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn parse_round_trips_every_status() {
        for status in MeetingStatus::ALL {
            assert_eq!(status.as_str().parse::<MeetingStatus>().unwrap(), status);
        }
    }

    #[test]
    fn parse_rejects_unknown_status() {
        assert_matches!(
            "pending".parse::<MeetingStatus>(),
            Err(CoreError::Validation(msg)) if msg.contains("pending")
        );
    }

    #[test]
    fn waiting_can_be_accepted_or_declined() {
        assert!(validate_transition(MeetingStatus::Waiting, MeetingStatus::Accepted).is_ok());
        assert!(validate_transition(MeetingStatus::Waiting, MeetingStatus::Declined).is_ok());
    }

    #[test]
    fn waiting_cannot_jump_to_done() {
        assert_matches!(
            validate_transition(MeetingStatus::Waiting, MeetingStatus::Done),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn accepted_can_finish_or_be_called_off() {
        assert!(MeetingStatus::Accepted.can_transition_to(MeetingStatus::Done));
        assert!(MeetingStatus::Accepted.can_transition_to(MeetingStatus::Declined));
        assert!(!MeetingStatus::Accepted.can_transition_to(MeetingStatus::Waiting));
    }

    #[test]
    fn terminal_statuses_have_no_exits() {
        for from in [MeetingStatus::Declined, MeetingStatus::Done] {
            assert!(from.is_terminal());
            for to in MeetingStatus::ALL {
                assert!(!from.can_transition_to(to), "{from} -> {to} must be rejected");
            }
        }
    }

    #[test]
    fn accepted_time_prefers_advisor_choice() {
        let proposed = chrono::Utc.with_ymd_and_hms(2024, 1, 25, 9, 0, 0).unwrap();
        let chosen = chrono::Utc.with_ymd_and_hms(2024, 1, 26, 13, 0, 0).unwrap();

        assert_eq!(resolve_accepted_time(Some(proposed), Some(chosen)).unwrap(), chosen);
        assert_eq!(resolve_accepted_time(Some(proposed), None).unwrap(), proposed);
        assert_matches!(resolve_accepted_time(None, None), Err(CoreError::Validation(_)));
    }

    #[test]
    fn decline_reason_must_not_be_blank() {
        assert!(validate_decline_reason("Sedang dinas luar kota").is_ok());
        assert!(validate_decline_reason("   ").is_err());
        assert!(validate_decline_reason(&"x".repeat(MAX_DECLINE_REASON_LENGTH + 1)).is_err());
    }

    #[test]
    fn only_waiting_meetings_are_cancellable() {
        assert!(validate_cancellable(MeetingStatus::Waiting).is_ok());
        assert_matches!(
            validate_cancellable(MeetingStatus::Accepted),
            Err(CoreError::Conflict(_))
        );
    }
}
