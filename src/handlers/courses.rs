use axum::{extract::State, http::StatusCode, response::Json};
use common::{CourseDto, CourseListQuery, CoursePageDto, CreateCourseRequest, EnrollmentDto, MyCoursesDto};
use model::entities::user::UserRole;
use sea_orm::TransactionTrait;
use service::{courses, dto, enrollments, students, users, ServiceError};
use tracing::{debug, info, instrument, trace};

use crate::auth::AuthContext;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ValidQuery};
use crate::schemas::{ApiResponse, AppState};

/// List courses, one page at a time
#[utoipa::path(
    get,
    path = "/api/courses",
    tag = "courses",
    params(CourseListQuery),
    responses(
        (status = 200, description = "Courses retrieved successfully", body = CoursePageResponse),
        (status = 400, description = "Invalid paging parameters"),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[instrument(skip(state, _auth))]
pub async fn list_courses(
    State(state): State<AppState>,
    _auth: AuthContext,
    ValidQuery(query): ValidQuery<CourseListQuery>,
) -> Result<Json<ApiResponse<CoursePageDto>>, ApiError> {
    trace!("Entering list_courses function");
    let page = courses::course_page(&state.db, &query).await?;
    debug!("Returning {} of {} courses", page.courses.len(), page.total);
    Ok(Json(ApiResponse::ok(page, "Courses retrieved successfully")))
}

/// Create a course
#[utoipa::path(
    post,
    path = "/api/courses",
    tag = "courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created successfully", body = CourseResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Only professors and admins", body = ErrorResponse),
        (status = 409, description = "Course code already exists", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth), fields(user_id = auth.user_id()))]
pub async fn create_course(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiJson(request): ApiJson<CreateCourseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CourseDto>>), ApiError> {
    auth.require_role(&[UserRole::Professor, UserRole::Admin])?;

    let txn = state.db.begin().await?;
    let course = courses::create_course(&txn, &request, &auth.user).await?;
    let described = courses::describe_course(&txn, &course).await?;
    txn.commit().await?;

    info!("Course {} created by user {}", course.course_code, auth.user_id());
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(described, "Course created successfully")),
    ))
}

/// Get a course by ID
#[utoipa::path(
    get,
    path = "/api/courses/{course_id}",
    tag = "courses",
    params(
        ("course_id" = i32, Path, description = "Course ID"),
    ),
    responses(
        (status = 200, description = "Course retrieved successfully", body = CourseResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, _auth))]
pub async fn get_course(
    ApiPath(course_id): ApiPath<i32>,
    State(state): State<AppState>,
    _auth: AuthContext,
) -> Result<Json<ApiResponse<CourseDto>>, ApiError> {
    let course = courses::find_course(&state.db, course_id).await?;
    let described = courses::describe_course(&state.db, &course).await?;
    Ok(Json(ApiResponse::ok(described, "Course retrieved successfully")))
}

/// Enroll the calling student in a course
#[utoipa::path(
    post,
    path = "/api/courses/{course_id}/enroll",
    tag = "courses",
    params(
        ("course_id" = i32, Path, description = "Course ID"),
    ),
    responses(
        (status = 201, description = "Enrolled successfully", body = EnrollmentResponse),
        (status = 400, description = "Course is full", body = ErrorResponse),
        (status = 403, description = "Only students can enroll", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 409, description = "Already enrolled in this course", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth), fields(user_id = auth.user_id()))]
pub async fn enroll(
    ApiPath(course_id): ApiPath<i32>,
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<(StatusCode, Json<ApiResponse<EnrollmentDto>>), ApiError> {
    if auth.role() != UserRole::Student {
        return Err(ApiError::forbidden("Only students can enroll"));
    }

    let txn = state.db.begin().await?;
    let profile = students::require_profile(&txn, auth.user_id()).await?;
    let record = enrollments::enroll(&txn, &profile, course_id).await?;
    let described = enrollments::describe_enrollments(&txn, std::slice::from_ref(&record)).await?;
    txn.commit().await?;

    let data = described
        .into_iter()
        .next()
        .unwrap_or_else(|| dto::enrollment_dto(&record, None));
    info!("Student {} enrolled in course {}", profile.id, course_id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(data, "Enrolled successfully")),
    ))
}

async fn courses_of(
    state: &AppState,
    account: &model::entities::user::Model,
) -> Result<MyCoursesDto, ApiError> {
    match account.role {
        UserRole::Student => {
            let profile = students::require_profile(&state.db, account.id).await?;
            let records = enrollments::enrollments_for_student(&state.db, profile.id).await?;
            let described = enrollments::describe_enrollments(&state.db, &records).await?;
            Ok(MyCoursesDto::Enrollments(described))
        }
        UserRole::Professor => {
            let taught = courses::courses_taught_by(&state.db, account.id).await?;
            let described = courses::describe_courses(&state.db, &taught).await?;
            Ok(MyCoursesDto::Taught(described))
        }
        UserRole::Admin => Err(ApiError::forbidden("Access denied")),
    }
}

/// Courses of the caller
///
/// Students get their enrollments, professors the courses they teach.
#[utoipa::path(
    get,
    path = "/api/courses/my-courses",
    tag = "courses",
    responses(
        (status = 200, description = "Courses retrieved successfully", body = MyCoursesResponse),
        (status = 403, description = "Admins have no courses", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth), fields(user_id = auth.user_id()))]
pub async fn my_courses(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ApiResponse<MyCoursesDto>>, ApiError> {
    let data = courses_of(&state, &auth.user).await?;
    Ok(Json(ApiResponse::ok(data, "Courses retrieved successfully")))
}

/// Courses of a given user
#[utoipa::path(
    get,
    path = "/api/my-courses/{user_id}",
    tag = "courses",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "Courses retrieved successfully", body = MyCoursesResponse),
        (status = 403, description = "Not allowed to view this user", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth), fields(caller_id = auth.user_id()))]
pub async fn courses_for_user(
    ApiPath(user_id): ApiPath<i32>,
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ApiResponse<MyCoursesDto>>, ApiError> {
    if user_id != auth.user_id() {
        auth.require_role(&[UserRole::Professor, UserRole::Admin])?;
    }

    let account = users::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("User"))?;
    let data = courses_of(&state, &account).await?;
    Ok(Json(ApiResponse::ok(data, "Courses retrieved successfully")))
}
