use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use strum_macros::{Display, EnumIter, EnumString};
use utoipa::{IntoParams, ToSchema};

use crate::model::user::UserSummary;

/// Attendance states recognized by the service. Stored as snake_case
/// strings in the `status` column.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, EnumIter,
    sqlx::Type, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Absent,
    Present,
    OnLeave,
    Late,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attendance {
    pub id: u64,
    pub user_id: u64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub clock_in: Option<DateTime<Utc>>,
    pub clock_out: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attendance row joined with the user display fields from the directory.
#[derive(Debug, Clone, FromRow)]
pub struct AttendanceWithUser {
    #[sqlx(flatten)]
    pub record: Attendance,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub emp_id: Option<String>,
}

impl AttendanceWithUser {
    pub fn into_parts(self) -> (Attendance, UserSummary) {
        let user = UserSummary {
            id: self.record.user_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            emp_id: self.emp_id,
        };
        (self.record, user)
    }
}

/// Validated insert payload handed to the store.
#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub user_id: u64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub clock_in: Option<DateTime<Utc>>,
    pub clock_out: Option<DateTime<Utc>>,
}

/// Partial update: `None` fields keep their stored values.
#[derive(Debug, Clone, Default)]
pub struct AttendanceChanges {
    pub status: Option<AttendanceStatus>,
    pub date: Option<NaiveDate>,
    pub clock_in: Option<DateTime<Utc>>,
    pub clock_out: Option<DateTime<Utc>>,
}

/// Validated listing filter handed to the store.
#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub user_id: Option<u64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<AttendanceStatus>,
}

/// One `GROUP BY status` aggregate row.
#[derive(Debug, Clone, FromRow)]
pub struct StatusCount {
    pub status: AttendanceStatus,
    pub count: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceRequest {
    #[schema(example = 42)]
    pub user_id: Option<u64>,
    #[serde(default, deserialize_with = "de_calendar_date")]
    #[schema(example = "2025-01-15", format = "date", value_type = String)]
    pub date: Option<NaiveDate>,
    #[schema(example = "present")]
    pub status: Option<String>,
    #[schema(example = "2025-01-15T09:00:00Z", format = "date-time", value_type = Option<String>)]
    pub clock_in: Option<DateTime<Utc>>,
    #[schema(example = "2025-01-15T17:30:00Z", format = "date-time", value_type = Option<String>)]
    pub clock_out: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttendanceRequest {
    #[schema(example = "late")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "de_calendar_date")]
    #[schema(example = "2025-01-16", format = "date", value_type = Option<String>)]
    pub date: Option<NaiveDate>,
    #[schema(example = "2025-01-16T09:10:00Z", format = "date-time", value_type = Option<String>)]
    pub clock_in: Option<DateTime<Utc>>,
    #[schema(example = "2025-01-16T18:00:00Z", format = "date-time", value_type = Option<String>)]
    pub clock_out: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Default, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceListQuery {
    /// Filter by user ID
    pub user_id: Option<u64>,
    /// Inclusive lower date bound
    #[serde(default, deserialize_with = "de_calendar_date")]
    #[param(example = "2025-01-01", value_type = Option<String>)]
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper date bound
    #[serde(default, deserialize_with = "de_calendar_date")]
    #[param(example = "2025-01-31", value_type = Option<String>)]
    pub end_date: Option<NaiveDate>,
    /// Filter by attendance status
    #[param(example = "present")]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Default, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    /// Inclusive lower date bound
    #[serde(default, deserialize_with = "de_calendar_date")]
    #[param(example = "2025-01-01", value_type = Option<String>)]
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper date bound
    #[serde(default, deserialize_with = "de_calendar_date")]
    #[param(example = "2025-01-31", value_type = Option<String>)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceResponse {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 42)]
    pub user_id: u64,
    #[schema(example = "2025-01-15", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "present")]
    pub status: AttendanceStatus,
    #[schema(example = "2025-01-15T09:00:00Z", format = "date-time", value_type = Option<String>)]
    pub clock_in: Option<DateTime<Utc>>,
    #[schema(example = "2025-01-15T17:30:00Z", format = "date-time", value_type = Option<String>)]
    pub clock_out: Option<DateTime<Utc>>,
    #[schema(example = "2025-01-15T09:00:01Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(example = "2025-01-15T17:30:01Z", format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
    /// Hours between clock-in and clock-out, rounded to two decimals.
    /// Null unless both timestamps are present.
    #[schema(example = 8.5)]
    pub total_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
}

/// Per-status counts over the queried window. Every status key is always
/// present, zero-filled when unobserved.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStats {
    #[schema(example = 42)]
    pub user_id: u64,
    #[schema(example = 0)]
    pub absent: i64,
    #[schema(example = 3)]
    pub present: i64,
    #[serde(rename = "on_leave")]
    #[schema(example = 0)]
    pub on_leave: i64,
    #[schema(example = 1)]
    pub late: i64,
    #[schema(example = 4)]
    pub total: i64,
}

/// Normalize a date input to a calendar date. Accepts plain `YYYY-MM-DD`
/// or a full timestamp, which is truncated to its UTC calendar day so
/// that uniqueness comparisons never shift across timezones.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.with_timezone(&Utc).date_naive());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.date());
    }
    None
}

fn de_calendar_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_calendar_date(value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {value}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_round_trips_snake_case() {
        assert_eq!(AttendanceStatus::OnLeave.to_string(), "on_leave");
        assert_eq!(
            AttendanceStatus::from_str("on_leave").unwrap(),
            AttendanceStatus::OnLeave
        );
        assert!(AttendanceStatus::from_str("holiday").is_err());
    }

    #[test]
    fn parses_plain_dates() {
        assert_eq!(
            parse_calendar_date("2025-01-15"),
            NaiveDate::from_ymd_opt(2025, 1, 15)
        );
    }

    #[test]
    fn truncates_timestamps_to_utc_day() {
        assert_eq!(
            parse_calendar_date("2025-01-15T18:30:00Z"),
            NaiveDate::from_ymd_opt(2025, 1, 15)
        );
        // 23:30 at UTC-5 is already the 16th in UTC
        assert_eq!(
            parse_calendar_date("2025-01-15T23:30:00-05:00"),
            NaiveDate::from_ymd_opt(2025, 1, 16)
        );
    }

    #[test]
    fn rejects_garbage_dates() {
        assert_eq!(parse_calendar_date("yesterday"), None);
        assert_eq!(parse_calendar_date("2025-13-40"), None);
    }
}
