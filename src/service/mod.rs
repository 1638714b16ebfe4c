pub mod attendance;

pub use attendance::AttendanceService;

use crate::repository::{SqlAttendanceStore, SqlUserDirectory};

/// Concrete service wiring used by the HTTP layer.
pub type HrmsService = AttendanceService<SqlAttendanceStore, SqlUserDirectory>;
