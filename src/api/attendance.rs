use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::attendance::{
    AttendanceListQuery, AttendanceResponse, AttendanceStats, DateRangeQuery,
    MarkAttendanceRequest, UpdateAttendanceRequest,
};
use crate::service::HrmsService;
use actix_web::{HttpResponse, web};
use serde_json::json;

/// List attendances (admin)
#[utoipa::path(
    get,
    path = "/api/attendances",
    params(AttendanceListQuery),
    responses(
        (status = 200, description = "Attendance list", body = Object, example = json!({
            "success": true,
            "data": []
        })),
        (status = 400, description = "Invalid status filter", body = Object, example = json!({
            "success": false,
            "message": "Invalid status. Must be: absent, present, on_leave, or late"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn list_attendances(
    auth: AuthUser,
    service: web::Data<HrmsService>,
    query: web::Query<AttendanceListQuery>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;

    let data = service.list_attendances(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": data
    })))
}

/// Mark attendance
#[utoipa::path(
    post,
    path = "/api/attendances",
    request_body = MarkAttendanceRequest,
    responses(
        (status = 201, description = "Attendance marked successfully", body = Object, example = json!({
            "success": true,
            "message": "Attendance marked successfully"
        })),
        (status = 400, description = "Missing or invalid fields", body = Object, example = json!({
            "success": false,
            "message": "User ID, date, and status are required"
        })),
        (status = 404, description = "User not found"),
        (status = 409, description = "Already marked for this date", body = Object, example = json!({
            "success": false,
            "message": "Attendance already marked for this date"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    service: web::Data<HrmsService>,
    payload: web::Json<MarkAttendanceRequest>,
) -> Result<HttpResponse, ApiError> {
    let data = service.mark_attendance(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Attendance marked successfully",
        "data": data
    })))
}

/// Get attendance by ID
#[utoipa::path(
    get,
    path = "/api/attendances/{id}",
    params(
        ("id" = u64, Path, description = "Attendance record ID")
    ),
    responses(
        (status = 200, description = "Attendance record", body = AttendanceResponse),
        (status = 404, description = "Attendance record not found", body = Object, example = json!({
            "success": false,
            "message": "Attendance record not found"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn get_attendance(
    service: web::Data<HrmsService>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let data = service.get_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": data
    })))
}

/// List a user's attendances (owner or admin)
#[utoipa::path(
    get,
    path = "/api/attendances/user/{user_id}",
    params(
        ("user_id" = u64, Path, description = "User ID"),
        DateRangeQuery
    ),
    responses(
        (status = 200, description = "User attendance list", body = Object, example = json!({
            "success": true,
            "data": []
        })),
        (status = 404, description = "User not found", body = Object, example = json!({
            "success": false,
            "message": "User not found"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn get_user_attendances(
    auth: AuthUser,
    service: web::Data<HrmsService>,
    path: web::Path<u64>,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    auth.require_owner_or_admin(user_id)?;

    let data = service.list_for_user(user_id, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": data
    })))
}

/// Get a user's attendance statistics (owner or admin)
#[utoipa::path(
    get,
    path = "/api/attendances/user/{user_id}/stats",
    params(
        ("user_id" = u64, Path, description = "User ID"),
        DateRangeQuery
    ),
    responses(
        (status = 200, description = "Aggregate per-status counts", body = AttendanceStats),
        (status = 404, description = "User not found", body = Object, example = json!({
            "success": false,
            "message": "User not found"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn get_user_stats(
    auth: AuthUser,
    service: web::Data<HrmsService>,
    path: web::Path<u64>,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    auth.require_owner_or_admin(user_id)?;

    let data = service.stats_for_user(user_id, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": data
    })))
}

/// Update attendance (admin)
#[utoipa::path(
    put,
    path = "/api/attendances/{id}",
    params(
        ("id" = u64, Path, description = "Attendance record ID")
    ),
    request_body = UpdateAttendanceRequest,
    responses(
        (status = 200, description = "Attendance updated successfully", body = Object, example = json!({
            "success": true,
            "message": "Attendance updated successfully"
        })),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Attendance record not found"),
        (status = 409, description = "Date already occupied"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn update_attendance(
    auth: AuthUser,
    service: web::Data<HrmsService>,
    path: web::Path<u64>,
    payload: web::Json<UpdateAttendanceRequest>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;

    let data = service
        .update_attendance(path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Attendance updated successfully",
        "data": data
    })))
}

/// Delete attendance (admin)
#[utoipa::path(
    delete,
    path = "/api/attendances/{id}",
    params(
        ("id" = u64, Path, description = "Attendance record ID")
    ),
    responses(
        (status = 200, description = "Attendance deleted successfully", body = Object, example = json!({
            "success": true,
            "message": "Attendance deleted successfully"
        })),
        (status = 404, description = "Attendance record not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn delete_attendance(
    auth: AuthUser,
    service: web::Data<HrmsService>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;

    service.delete_attendance(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Attendance deleted successfully"
    })))
}
