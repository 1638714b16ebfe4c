use std::str::FromStr;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::ApiError;
use crate::model::attendance::{
    Attendance, AttendanceChanges, AttendanceFilter, AttendanceListQuery, AttendanceResponse,
    AttendanceStats, AttendanceStatus, DateRangeQuery, MarkAttendanceRequest, NewAttendance,
    UpdateAttendanceRequest,
};
use crate::model::user::UserSummary;
use crate::repository::{AttendanceStore, UserDirectory};

/// Business rules layered over the attendance store. Constructed from its
/// store and user-directory collaborators so tests can inject doubles.
pub struct AttendanceService<S, U> {
    store: S,
    users: U,
}

impl<S, U> AttendanceService<S, U>
where
    S: AttendanceStore,
    U: UserDirectory,
{
    pub fn new(store: S, users: U) -> Self {
        Self { store, users }
    }

    pub async fn list_attendances(
        &self,
        query: AttendanceListQuery,
    ) -> Result<Vec<AttendanceResponse>, ApiError> {
        let status = match query.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_status(raw)?),
        };

        let filter = AttendanceFilter {
            user_id: query.user_id,
            start_date: query.start_date,
            end_date: query.end_date,
            status,
        };

        let rows = self.store.find_all(&filter).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let (record, user) = row.into_parts();
                format_record(record, Some(user))
            })
            .collect())
    }

    pub async fn get_by_id(&self, id: u64) -> Result<AttendanceResponse, ApiError> {
        let record = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Attendance record not found"))?;
        Ok(format_record(record, None))
    }

    pub async fn list_for_user(
        &self,
        user_id: u64,
        range: DateRangeQuery,
    ) -> Result<Vec<AttendanceResponse>, ApiError> {
        if self.users.find_user(user_id).await?.is_none() {
            return Err(ApiError::not_found("User not found"));
        }

        let rows = self
            .store
            .find_by_user(user_id, range.start_date, range.end_date)
            .await?;
        Ok(rows
            .into_iter()
            .map(|record| format_record(record, None))
            .collect())
    }

    pub async fn mark_attendance(
        &self,
        req: MarkAttendanceRequest,
    ) -> Result<AttendanceResponse, ApiError> {
        let (Some(user_id), Some(date), Some(status_raw)) =
            (req.user_id, req.date, req.status.as_deref())
        else {
            return Err(ApiError::invalid_argument(
                "User ID, date, and status are required",
            ));
        };
        if user_id == 0 || status_raw.trim().is_empty() {
            return Err(ApiError::invalid_argument(
                "User ID, date, and status are required",
            ));
        }

        let status = parse_status(status_raw.trim())?;

        if self.users.find_user(user_id).await?.is_none() {
            return Err(ApiError::not_found("User not found"));
        }

        // Friendly-path check; the unique key on (user_id, date) is the
        // backstop when two marks race past it.
        if self.store.exists_for_user_on_date(user_id, date).await? {
            return Err(ApiError::conflict("Attendance already marked for this date"));
        }

        let record = self
            .store
            .insert(&NewAttendance {
                user_id,
                date,
                status,
                clock_in: req.clock_in,
                clock_out: req.clock_out,
            })
            .await?;

        info!(user_id, date = %record.date, status = %record.status, "Attendance marked");
        Ok(format_record(record, None))
    }

    pub async fn update_attendance(
        &self,
        id: u64,
        req: UpdateAttendanceRequest,
    ) -> Result<AttendanceResponse, ApiError> {
        let current = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Attendance record not found"))?;

        let status = match req.status.as_deref() {
            Some(raw) => Some(parse_status(raw.trim())?),
            None => None,
        };

        // Moving the record to a day already occupied by a different
        // record for the same user would break daily uniqueness.
        if let Some(new_date) = req.date {
            if new_date != current.date {
                if let Some(existing) = self
                    .store
                    .find_by_user_and_date(current.user_id, new_date)
                    .await?
                {
                    if existing.id != id {
                        return Err(ApiError::conflict(
                            "Attendance already marked for this date",
                        ));
                    }
                }
            }
        }

        let changes = AttendanceChanges {
            status,
            date: req.date,
            clock_in: req.clock_in,
            clock_out: req.clock_out,
        };

        // None here means the row vanished between the fetch above and
        // the update (concurrent delete).
        let updated = self
            .store
            .update(id, &changes)
            .await?
            .ok_or_else(|| ApiError::internal("Failed to update attendance"))?;

        Ok(format_record(updated, None))
    }

    pub async fn delete_attendance(&self, id: u64) -> Result<(), ApiError> {
        if self.store.find_by_id(id).await?.is_none() {
            return Err(ApiError::not_found("Attendance record not found"));
        }

        // Existence was just confirmed, so an unaffected delete signals a
        // concurrent removal.
        if !self.store.delete(id).await? {
            return Err(ApiError::internal("Failed to delete attendance"));
        }

        info!(id, "Attendance deleted");
        Ok(())
    }

    pub async fn stats_for_user(
        &self,
        user_id: u64,
        range: DateRangeQuery,
    ) -> Result<AttendanceStats, ApiError> {
        if self.users.find_user(user_id).await?.is_none() {
            return Err(ApiError::not_found("User not found"));
        }

        let counts = self
            .store
            .stats_by_user(user_id, range.start_date, range.end_date)
            .await?;

        let mut stats = AttendanceStats {
            user_id,
            absent: 0,
            present: 0,
            on_leave: 0,
            late: 0,
            total: 0,
        };
        for row in counts {
            match row.status {
                AttendanceStatus::Absent => stats.absent = row.count,
                AttendanceStatus::Present => stats.present = row.count,
                AttendanceStatus::OnLeave => stats.on_leave = row.count,
                AttendanceStatus::Late => stats.late = row.count,
            }
            stats.total += row.count;
        }
        Ok(stats)
    }
}

fn parse_status(raw: &str) -> Result<AttendanceStatus, ApiError> {
    AttendanceStatus::from_str(raw).map_err(|_| {
        ApiError::invalid_argument("Invalid status. Must be: absent, present, on_leave, or late")
    })
}

/// Shared by every read path: derives `total_hours` and attaches the
/// joined user display fields when the query carried them.
fn format_record(record: Attendance, user: Option<UserSummary>) -> AttendanceResponse {
    AttendanceResponse {
        total_hours: total_hours(record.clock_in, record.clock_out),
        id: record.id,
        user_id: record.user_id,
        date: record.date,
        status: record.status,
        clock_in: record.clock_in,
        clock_out: record.clock_out,
        created_at: record.created_at,
        updated_at: record.updated_at,
        user,
    }
}

/// Hours between clock-in and clock-out, rounded half-up to two decimal
/// places. The duration is not validated for negativity.
fn total_hours(
    clock_in: Option<DateTime<Utc>>,
    clock_out: Option<DateTime<Utc>>,
) -> Option<f64> {
    let (start, end) = (clock_in?, clock_out?);
    let hours = (end - start).num_milliseconds() as f64 / 3_600_000.0;
    Some((hours * 100.0).round() / 100.0)
}
