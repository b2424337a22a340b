//! Calendar event (kegiatan) rules.

use crate::error::CoreError;
use crate::types::Timestamp;

/// Longest listing window accepted by the calendar endpoint, in days.
pub const MAX_WINDOW_DAYS: i64 = 366;

/// An event must not end before it starts.
pub fn validate_event_span(starts_at: Timestamp, ends_at: Timestamp) -> Result<(), CoreError> {
    if ends_at < starts_at {
        return Err(CoreError::Validation(
            "Event end time must not be before its start time".to_string(),
        ));
    }
    Ok(())
}

/// Validate an optional `from`/`to` listing window.
pub fn validate_window(from: Option<Timestamp>, to: Option<Timestamp>) -> Result<(), CoreError> {
    if let (Some(from), Some(to)) = (from, to) {
        if to < from {
            return Err(CoreError::Validation(
                "'to' must not be before 'from'".to_string(),
            ));
        }
        if (to - from).num_days() > MAX_WINDOW_DAYS {
            return Err(CoreError::Validation(format!(
                "Calendar window must not exceed {MAX_WINDOW_DAYS} days"
            )));
        }
    }
    Ok(())
}
