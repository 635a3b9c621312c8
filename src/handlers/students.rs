use axum::{extract::State, response::Json};
use common::{StudentDto, UpdateProfileRequest};
use model::entities::user::UserRole;
use sea_orm::TransactionTrait;
use service::students::{self, ProfileChanges};
use service::users::{self, AccountChanges};
use service::{dto, validation, ServiceError};
use tracing::{debug, info, instrument, warn};

use crate::auth::AuthContext;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::schemas::{ApiResponse, AppState};

/// List all students
#[utoipa::path(
    get,
    path = "/api/students",
    tag = "students",
    responses(
        (status = 200, description = "Students retrieved successfully", body = StudentListResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 403, description = "Only professors and admins", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth), fields(user_id = auth.user_id()))]
pub async fn list_students(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ApiResponse<Vec<StudentDto>>>, ApiError> {
    auth.require_role(&[UserRole::Professor, UserRole::Admin])?;

    let students = students::list_students(&state.db).await?;
    debug!("Retrieved {} students", students.len());
    let data = students
        .iter()
        .map(|(profile, account)| dto::student_dto(profile, account.as_ref()))
        .collect();
    Ok(Json(ApiResponse::ok(data, "Students retrieved successfully")))
}

/// Get a student by profile ID
#[utoipa::path(
    get,
    path = "/api/students/{student_id}",
    tag = "students",
    params(
        ("student_id" = i32, Path, description = "Student profile ID"),
    ),
    responses(
        (status = 200, description = "Student retrieved successfully", body = StudentResponse),
        (status = 403, description = "Not your profile", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth), fields(user_id = auth.user_id()))]
pub async fn get_student(
    ApiPath(student_id): ApiPath<i32>,
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ApiResponse<StudentDto>>, ApiError> {
    if auth.role() == UserRole::Student {
        let own = students::find_by_user(&state.db, auth.user_id()).await?;
        if own.map(|profile| profile.id) != Some(student_id) {
            warn!("Student {} tried to read profile {}", auth.user_id(), student_id);
            return Err(ApiError::forbidden("Access denied"));
        }
    }

    let (profile, account) = students::find_with_user(&state.db, student_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Student"))?;

    Ok(Json(ApiResponse::ok(
        dto::student_dto(&profile, Some(&account)),
        "Student retrieved successfully",
    )))
}

/// Get the caller's own student profile
#[utoipa::path(
    get,
    path = "/api/students/profile",
    tag = "students",
    responses(
        (status = 200, description = "Profile retrieved successfully", body = StudentResponse),
        (status = 403, description = "Only students have a profile", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth), fields(user_id = auth.user_id()))]
pub async fn get_my_profile(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ApiResponse<StudentDto>>, ApiError> {
    auth.require_role(&[UserRole::Student])?;
    let profile = students::require_profile(&state.db, auth.user_id()).await?;
    Ok(Json(ApiResponse::ok(
        dto::student_dto(&profile, Some(&auth.user)),
        "Profile retrieved successfully",
    )))
}

/// Update the caller's own student profile and account details
#[utoipa::path(
    put,
    path = "/api/students/profile",
    tag = "students",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated successfully", body = StudentResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Only students have a profile", body = ErrorResponse),
        (status = 409, description = "Email already exists", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth), fields(user_id = auth.user_id()))]
pub async fn update_my_profile(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<StudentDto>>, ApiError> {
    auth.require_role(&[UserRole::Student])?;
    validation::validate_request(&request)?;

    let txn = state.db.begin().await?;
    let profile = students::require_profile(&txn, auth.user_id()).await?;
    let profile = students::update_profile(
        &txn,
        profile.id,
        ProfileChanges {
            major: request.major,
            year_level: request.year_level.map(dto::year_level_from_dto),
        },
    )
    .await?;
    let account = users::update_profile(
        &txn,
        auth.user_id(),
        AccountChanges {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
        },
    )
    .await?;
    txn.commit().await?;

    info!("Profile {} updated", profile.id);
    Ok(Json(ApiResponse::ok(
        dto::student_dto(&profile, Some(&account)),
        "Profile updated successfully",
    )))
}

/// Delete a student together with their account
///
/// Removes the account, sessions, items, enrollments and grades atomically.
#[utoipa::path(
    delete,
    path = "/api/students/{student_id}",
    tag = "students",
    params(
        ("student_id" = i32, Path, description = "Student profile ID"),
    ),
    responses(
        (status = 200, description = "Student deleted successfully", body = StudentResponse),
        (status = 403, description = "Only admins", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth), fields(user_id = auth.user_id()))]
pub async fn delete_student(
    ApiPath(student_id): ApiPath<i32>,
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ApiResponse<StudentDto>>, ApiError> {
    auth.require_role(&[UserRole::Admin])?;

    let (profile, account) = students::find_with_user(&state.db, student_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Student"))?;
    users::delete_user_cascade(&state.db, account.id).await?;

    info!("Student {} and user {} deleted", profile.id, account.id);
    Ok(Json(ApiResponse::ok(
        dto::student_dto(&profile, Some(&account)),
        "Student deleted successfully",
    )))
}
