//! Display formatting for dates and statuses shown in the UI.
//!
//! Timestamps are stored in UTC and rendered in Western Indonesia Time
//! (WIB, UTC+7) with Indonesian day and month names.

use chrono::{Datelike, Duration, NaiveDateTime, Timelike, Weekday};

use crate::activity::ActivityCategory;
use crate::meeting::MeetingStatus;
use crate::submission::SubmissionStatus;
use crate::types::Timestamp;

/// UTC offset of WIB in seconds.
pub const WIB_OFFSET_SECS: i64 = 7 * 3600;

const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

fn to_wib(ts: Timestamp) -> NaiveDateTime {
    ts.naive_utc() + Duration::seconds(WIB_OFFSET_SECS)
}

fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Senin",
        Weekday::Tue => "Selasa",
        Weekday::Wed => "Rabu",
        Weekday::Thu => "Kamis",
        Weekday::Fri => "Jumat",
        Weekday::Sat => "Sabtu",
        Weekday::Sun => "Minggu",
    }
}

fn month_name(local: &NaiveDateTime) -> &'static str {
    MONTHS[local.month0() as usize]
}

/// `Kamis, 25 Januari 2024`
pub fn format_long_date(ts: Timestamp) -> String {
    let local = to_wib(ts);
    format!(
        "{}, {} {} {}",
        day_name(local.weekday()),
        local.day(),
        month_name(&local),
        local.year()
    )
}

/// `25 Jan 2024 09:00`
pub fn format_short_datetime(ts: Timestamp) -> String {
    let local = to_wib(ts);
    let month = month_name(&local);
    format!(
        "{} {} {} {:02}:{:02}",
        local.day(),
        &month[..3],
        local.year(),
        local.hour(),
        local.minute()
    )
}

/// `09:00 WIB`
pub fn format_time(ts: Timestamp) -> String {
    let local = to_wib(ts);
    format!("{:02}:{:02} WIB", local.hour(), local.minute())
}

pub fn meeting_status_label(status: MeetingStatus) -> &'static str {
    match status {
        MeetingStatus::Waiting => "Menunggu Konfirmasi",
        MeetingStatus::Accepted => "Diterima",
        MeetingStatus::Declined => "Ditolak",
        MeetingStatus::Done => "Selesai",
    }
}

pub fn submission_status_label(status: SubmissionStatus) -> &'static str {
    match status {
        SubmissionStatus::Unread => "Belum Dibaca",
        SubmissionStatus::Read => "Sudah Dibaca",
        SubmissionStatus::NeedRevision => "Perlu Revisi",
        SubmissionStatus::Done => "Selesai",
    }
}

/// Label for a raw status string, read with the status set of `category`.
///
/// Unknown values are returned unchanged so a new database status never
/// breaks rendering.
pub fn status_label(category: ActivityCategory, raw: &str) -> String {
    let label = match category {
        ActivityCategory::Meeting => raw.parse::<MeetingStatus>().ok().map(meeting_status_label),
        ActivityCategory::Submission => raw
            .parse::<SubmissionStatus>()
            .ok()
            .map(submission_status_label),
    };
    label.map_or_else(|| raw.to_string(), str::to_string)
}

/// Short form of an advisor's position in a pairing (`Pembimbing 1`).
pub fn advisor_order_label(order: i16) -> String {
    format!("Pembimbing {order}")
}
