use common::{
    AssignmentType, ChangePasswordRequest, CourseDto, CourseGradesDto, CourseListQuery,
    CoursePageDto, CourseSummaryDto, CreateCourseRequest, CreateGradeRequest, EnrollmentDto,
    EnrollmentStatus, GradeDto, LetterGrade, LoginRequest, MyCoursesDto, RegisterRequest, Role, Semester,
    StudentDto, UpdateProfileRequest, UserDto, YearLevel,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Lifetime of newly created sessions
    pub session_ttl: chrono::Duration,
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[aliases(
    UserResponse = ApiResponse<UserDto>,
    StudentResponse = ApiResponse<StudentDto>,
    StudentListResponse = ApiResponse<Vec<StudentDto>>,
    CourseResponse = ApiResponse<CourseDto>,
    CoursePageResponse = ApiResponse<CoursePageDto>,
    EnrollmentResponse = ApiResponse<EnrollmentDto>,
    GradeResponse = ApiResponse<GradeDto>,
    GradeListResponse = ApiResponse<Vec<GradeDto>>,
    GradesByCourseResponse = ApiResponse<std::collections::BTreeMap<String, CourseGradesDto>>,
    EnrollmentListResponse = ApiResponse<Vec<EnrollmentDto>>,
    CourseListResponse = ApiResponse<Vec<CourseDto>>,
    MyCoursesResponse = ApiResponse<MyCoursesDto>
)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: &str) -> Self {
        Self {
            data,
            message: message.to_string(),
            success: true,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::logout,
        crate::handlers::auth::me,
        crate::handlers::auth::change_password,
        crate::handlers::students::list_students,
        crate::handlers::students::get_student,
        crate::handlers::students::get_my_profile,
        crate::handlers::students::update_my_profile,
        crate::handlers::students::delete_student,
        crate::handlers::courses::list_courses,
        crate::handlers::courses::create_course,
        crate::handlers::courses::get_course,
        crate::handlers::courses::enroll,
        crate::handlers::courses::my_courses,
        crate::handlers::courses::courses_for_user,
        crate::handlers::enrollments::delete_enrollment,
        crate::handlers::grades::list_grades,
        crate::handlers::grades::create_grade,
        crate::handlers::grades::course_grades,
        crate::handlers::grades::my_grades,
    ),
    components(
        schemas(
            UserResponse,
            StudentResponse,
            StudentListResponse,
            CourseResponse,
            CoursePageResponse,
            EnrollmentResponse,
            GradeResponse,
            GradeListResponse,
            GradesByCourseResponse,
            EnrollmentListResponse,
            CourseListResponse,
            MyCoursesResponse,
            MyCoursesDto,
            ErrorResponse,
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            ChangePasswordRequest,
            UpdateProfileRequest,
            CreateCourseRequest,
            CourseListQuery,
            CreateGradeRequest,
            UserDto,
            StudentDto,
            CourseDto,
            CoursePageDto,
            EnrollmentDto,
            GradeDto,
            CourseSummaryDto,
            CourseGradesDto,
            Role,
            YearLevel,
            Semester,
            EnrollmentStatus,
            AssignmentType,
            LetterGrade,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration, login and session endpoints"),
        (name = "students", description = "Student profile endpoints"),
        (name = "courses", description = "Course catalogue and enrollment endpoints"),
        (name = "enrollments", description = "Enrollment management endpoints"),
        (name = "grades", description = "Grade recording and reporting endpoints"),
    ),
    info(
        title = "Campus API",
        description = "Accounts, personal items and a university registry of courses, enrollments and grades",
        version = "0.1.0",
    )
)]
pub struct ApiDoc;
