pub mod attendance;
pub mod user;

pub use attendance::{AttendanceStore, SqlAttendanceStore};
pub use user::{SqlUserDirectory, UserDirectory};

use derive_more::{Display, Error};

/// Errors surfaced by the storage layer.
#[derive(Debug, Display, Error)]
pub enum StoreError {
    /// A row already occupies a unique key slot.
    #[display(fmt = "duplicate row for unique key")]
    Duplicate,
    #[display(fmt = "database error: {}", _0)]
    Database(#[error(source)] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        // MySQL reports integrity-constraint violations (duplicate key
        // among them) as SQLSTATE 23000.
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some("23000") {
                return StoreError::Duplicate;
            }
        }
        StoreError::Database(err)
    }
}
