use axum::{extract::State, http::StatusCode, response::Json};
use common::{CreateGradeRequest, GradeDto, GradesByCourse};
use model::entities::user::UserRole;
use sea_orm::TransactionTrait;
use service::{courses, dto, grades, students};
use tracing::{debug, info, instrument, warn};

use crate::auth::AuthContext;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::schemas::{ApiResponse, AppState};

/// List grades
///
/// Students see their own grades, professors and admins see all of them.
#[utoipa::path(
    get,
    path = "/api/grades",
    tag = "grades",
    responses(
        (status = 200, description = "Grades retrieved successfully", body = GradeListResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth), fields(user_id = auth.user_id()))]
pub async fn list_grades(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ApiResponse<Vec<GradeDto>>>, ApiError> {
    let records = match auth.role() {
        UserRole::Student => {
            let profile = students::require_profile(&state.db, auth.user_id()).await?;
            grades::grades_for_student(&state.db, profile.id).await?
        }
        UserRole::Professor | UserRole::Admin => grades::all_grades(&state.db).await?,
    };
    debug!("Returning {} grades", records.len());
    let data = records.iter().map(dto::grade_dto).collect();
    Ok(Json(ApiResponse::ok(data, "Grades retrieved successfully")))
}

/// Record a grade
#[utoipa::path(
    post,
    path = "/api/grades",
    tag = "grades",
    request_body = CreateGradeRequest,
    responses(
        (status = 201, description = "Grade recorded successfully", body = GradeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Not allowed to grade this enrollment", body = ErrorResponse),
        (status = 404, description = "Enrollment not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth), fields(user_id = auth.user_id()))]
pub async fn create_grade(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiJson(request): ApiJson<CreateGradeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<GradeDto>>), ApiError> {
    auth.require_role(&[UserRole::Professor, UserRole::Admin])?;

    let txn = state.db.begin().await?;
    let created = grades::record_grade(&txn, &request, &auth.user).await?;
    txn.commit().await?;

    info!("Grade {} recorded by user {}", created.id, auth.user_id());
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(dto::grade_dto(&created), "Grade recorded successfully")),
    ))
}

/// Grades of every enrollment in a course
#[utoipa::path(
    get,
    path = "/api/grades/course/{course_id}",
    tag = "grades",
    params(
        ("course_id" = i32, Path, description = "Course ID"),
    ),
    responses(
        (status = 200, description = "Grades retrieved successfully", body = GradeListResponse),
        (status = 403, description = "Only the course professor and admins", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth), fields(user_id = auth.user_id()))]
pub async fn course_grades(
    ApiPath(course_id): ApiPath<i32>,
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ApiResponse<Vec<GradeDto>>>, ApiError> {
    let course = courses::find_course(&state.db, course_id).await?;
    if !auth.is_admin() && course.professor_id != Some(auth.user_id()) {
        warn!("User {} does not teach course {}", auth.user_id(), course_id);
        return Err(ApiError::forbidden("Access denied"));
    }

    let records = grades::grades_for_course(&state.db, course.id).await?;
    let data = records.iter().map(dto::grade_dto).collect();
    Ok(Json(ApiResponse::ok(data, "Grades retrieved successfully")))
}

/// The caller's grades grouped by course code
#[utoipa::path(
    get,
    path = "/api/grades/my-grades",
    tag = "grades",
    responses(
        (status = 200, description = "Grades retrieved successfully", body = GradesByCourseResponse),
        (status = 403, description = "Only students", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth), fields(user_id = auth.user_id()))]
pub async fn my_grades(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ApiResponse<GradesByCourse>>, ApiError> {
    auth.require_role(&[UserRole::Student])?;
    let profile = students::require_profile(&state.db, auth.user_id()).await?;
    let grouped = grades::grades_by_course_for_student(&state.db, profile.id).await?;
    Ok(Json(ApiResponse::ok(grouped, "Grades retrieved successfully")))
}
