use crate::model::attendance::{
    AttendanceResponse, AttendanceStats, AttendanceStatus, MarkAttendanceRequest,
    UpdateAttendanceRequest,
};
use crate::model::user::UserSummary;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRMS Backend API",
        version = "1.0.0",
        description = r#"
## HR Management System — Attendance API

This API powers the attendance subsystem of an HR management backend.

### Key Features
- **Attendance Tracking**
  - Mark daily attendance (one record per user per calendar day)
  - Clock-in / clock-out timestamps with computed total hours
  - Date-range filtering and per-status statistics

### Security
Endpoints are protected using **JWT Bearer authentication**. Tokens are
issued by the external auth service; admin-only operations require an
admin role claim.

### Response Format
All responses wrap their payload as `{success, data?, message?}`.
"#,
    ),
    paths(
        crate::api::attendance::list_attendances,
        crate::api::attendance::mark_attendance,
        crate::api::attendance::get_attendance,
        crate::api::attendance::get_user_attendances,
        crate::api::attendance::get_user_stats,
        crate::api::attendance::update_attendance,
        crate::api::attendance::delete_attendance,
    ),
    components(
        schemas(
            AttendanceStatus,
            MarkAttendanceRequest,
            UpdateAttendanceRequest,
            AttendanceResponse,
            AttendanceStats,
            UserSummary
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Attendance management APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(openapi::Components::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
