use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::MySqlPool;
use tracing::debug;

use crate::model::attendance::{
    Attendance, AttendanceChanges, AttendanceFilter, AttendanceWithUser, NewAttendance,
    StatusCount,
};
use crate::repository::StoreError;

/// Durable CRUD + query access to attendance rows, keyed by id or by
/// `(user_id, date)`.
///
/// Implementations must be thread-safe (`Send + Sync`) as they are called
/// concurrently from multiple request handlers.
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    async fn find_by_id(&self, id: u64) -> Result<Option<Attendance>, StoreError>;

    /// All rows matching the filter, joined with the user display fields,
    /// newest calendar day first, most recently inserted first within a day.
    async fn find_all(
        &self,
        filter: &AttendanceFilter,
    ) -> Result<Vec<AttendanceWithUser>, StoreError>;

    /// Rows for one user, bounded inclusively by the optional date range.
    async fn find_by_user(
        &self,
        user_id: u64,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Attendance>, StoreError>;

    async fn exists_for_user_on_date(
        &self,
        user_id: u64,
        date: NaiveDate,
    ) -> Result<bool, StoreError>;

    async fn find_by_user_and_date(
        &self,
        user_id: u64,
        date: NaiveDate,
    ) -> Result<Option<Attendance>, StoreError>;

    /// Inserts a new row. The unique key on `(user_id, date)` is the
    /// backstop for concurrent marks; violations surface as
    /// [`StoreError::Duplicate`].
    async fn insert(&self, new: &NewAttendance) -> Result<Attendance, StoreError>;

    /// Partial merge: `None` fields in `changes` keep their stored values.
    /// Returns the updated row, or `None` if the id no longer exists.
    async fn update(
        &self,
        id: u64,
        changes: &AttendanceChanges,
    ) -> Result<Option<Attendance>, StoreError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: u64) -> Result<bool, StoreError>;

    /// Per-status counts for one user over the optional date range.
    async fn stats_by_user(
        &self,
        user_id: u64,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<StatusCount>, StoreError>;
}

const ATTENDANCE_COLUMNS: &str =
    "id, user_id, date, status, clock_in, clock_out, created_at, updated_at";

/// MySQL-backed attendance store.
#[derive(Clone)]
pub struct SqlAttendanceStore {
    pool: MySqlPool,
}

impl SqlAttendanceStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceStore for SqlAttendanceStore {
    async fn find_by_id(&self, id: u64) -> Result<Option<Attendance>, StoreError> {
        let sql = format!("SELECT {ATTENDANCE_COLUMNS} FROM attendances WHERE id = ?");
        let row = sqlx::query_as::<_, Attendance>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_all(
        &self,
        filter: &AttendanceFilter,
    ) -> Result<Vec<AttendanceWithUser>, StoreError> {
        let mut sql = String::from(
            r#"
            SELECT a.id, a.user_id, a.date, a.status, a.clock_in, a.clock_out,
                   a.created_at, a.updated_at,
                   u.first_name, u.last_name, u.email, u.emp_id
            FROM attendances a
            INNER JOIN users u ON a.user_id = u.id
            WHERE 1=1
            "#,
        );

        if filter.user_id.is_some() {
            sql.push_str(" AND a.user_id = ?");
        }
        if filter.start_date.is_some() {
            sql.push_str(" AND a.date >= ?");
        }
        if filter.end_date.is_some() {
            sql.push_str(" AND a.date <= ?");
        }
        if filter.status.is_some() {
            sql.push_str(" AND a.status = ?");
        }

        // Ties within a day break by insertion recency
        sql.push_str(" ORDER BY a.date DESC, a.created_at DESC, a.id DESC");

        debug!(sql = %sql, filter = ?filter, "Fetching attendances");

        let mut query = sqlx::query_as::<_, AttendanceWithUser>(&sql);
        if let Some(user_id) = filter.user_id {
            query = query.bind(user_id);
        }
        if let Some(start) = filter.start_date {
            query = query.bind(start);
        }
        if let Some(end) = filter.end_date {
            query = query.bind(end);
        }
        if let Some(status) = filter.status {
            query = query.bind(status);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn find_by_user(
        &self,
        user_id: u64,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Attendance>, StoreError> {
        let mut sql =
            format!("SELECT {ATTENDANCE_COLUMNS} FROM attendances WHERE user_id = ?");
        if start_date.is_some() {
            sql.push_str(" AND date >= ?");
        }
        if end_date.is_some() {
            sql.push_str(" AND date <= ?");
        }
        sql.push_str(" ORDER BY date DESC, created_at DESC, id DESC");

        let mut query = sqlx::query_as::<_, Attendance>(&sql).bind(user_id);
        if let Some(start) = start_date {
            query = query.bind(start);
        }
        if let Some(end) = end_date {
            query = query.bind(end);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn exists_for_user_on_date(
        &self,
        user_id: u64,
        date: NaiveDate,
    ) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM attendances WHERE user_id = ? AND date = ? LIMIT 1)",
        )
        .bind(user_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn find_by_user_and_date(
        &self,
        user_id: u64,
        date: NaiveDate,
    ) -> Result<Option<Attendance>, StoreError> {
        let sql = format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendances WHERE user_id = ? AND date = ?"
        );
        let row = sqlx::query_as::<_, Attendance>(&sql)
            .bind(user_id)
            .bind(date)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, new: &NewAttendance) -> Result<Attendance, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendances (user_id, date, status, clock_in, clock_out)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.user_id)
        .bind(new.date)
        .bind(new.status)
        .bind(new.clock_in)
        .bind(new.clock_out)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id();
        self.find_by_id(id)
            .await?
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))
    }

    async fn update(
        &self,
        id: u64,
        changes: &AttendanceChanges,
    ) -> Result<Option<Attendance>, StoreError> {
        sqlx::query(
            r#"
            UPDATE attendances
            SET status = COALESCE(?, status),
                date = COALESCE(?, date),
                clock_in = COALESCE(?, clock_in),
                clock_out = COALESCE(?, clock_out),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
        )
        .bind(changes.status)
        .bind(changes.date)
        .bind(changes.clock_in)
        .bind(changes.clock_out)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id).await
    }

    async fn delete(&self, id: u64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM attendances WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn stats_by_user(
        &self,
        user_id: u64,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<StatusCount>, StoreError> {
        let mut sql = String::from(
            "SELECT status, COUNT(*) AS count FROM attendances WHERE user_id = ?",
        );
        if start_date.is_some() {
            sql.push_str(" AND date >= ?");
        }
        if end_date.is_some() {
            sql.push_str(" AND date <= ?");
        }
        sql.push_str(" GROUP BY status");

        let mut query = sqlx::query_as::<_, StatusCount>(&sql).bind(user_id);
        if let Some(start) = start_date {
            query = query.bind(start);
        }
        if let Some(end) = end_date {
            query = query.bind(end);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows)
    }
}
