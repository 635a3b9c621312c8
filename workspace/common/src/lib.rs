//! Common transport-layer types.
//! These structs are the request and response payloads of the HTTP API, so
//! handlers never deal with free-form JSON objects. Request types carry their
//! `validator` rules; responses derive `ToSchema` for the OpenAPI document.

mod enums;

pub use enums::{AssignmentType, EnrollmentStatus, LetterGrade, Role, Semester, YearLevel};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

// ===================== Accounts =====================

/// Request body for registering a new account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq, Default)]
pub struct RegisterRequest {
    /// Unique login name, at least 3 characters
    pub username: String,
    /// Unique e-mail address
    #[validate(email(message = "Email address is not valid"))]
    pub email: Option<String>,
    /// At least 6 characters
    pub password: String,
    /// When present it must equal `password`
    pub confirm_password: Option<String>,
    #[validate(length(max = 50, message = "First name is too long"))]
    pub first_name: Option<String>,
    #[validate(length(max = 50, message = "Last name is too long"))]
    pub last_name: Option<String>,
    /// Defaults to `student`
    pub role: Option<Role>,
    /// Student profile major, defaults to `Undeclared`
    #[validate(length(min = 1, max = 100, message = "Major must be 1 to 100 characters"))]
    pub major: Option<String>,
    /// Student profile year level, defaults to `freshman`
    pub year_level: Option<YearLevel>,
}

/// Request body for logging in.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for changing the password of the current account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

// ===================== Students =====================

/// Student profile response model.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct StudentDto {
    pub id: i32,
    pub user_id: i32,
    pub student_number: String,
    pub major: String,
    pub year_level: YearLevel,
    pub gpa: f64,
    pub total_credits: i32,
    pub user: Option<UserDto>,
}

/// Request body for updating the caller's own student profile.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq, Default)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Major must be 1 to 100 characters"))]
    pub major: Option<String>,
    pub year_level: Option<YearLevel>,
    #[validate(length(max = 50, message = "First name is too long"))]
    pub first_name: Option<String>,
    #[validate(length(max = 50, message = "Last name is too long"))]
    pub last_name: Option<String>,
    #[validate(email(message = "Email address is not valid"))]
    pub email: Option<String>,
}

// ===================== Courses =====================

/// Request body for creating a course.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq)]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = 20, message = "Course code must be 1 to 20 characters"))]
    pub course_code: String,
    #[validate(length(min = 1, max = 200, message = "Title must be 1 to 200 characters"))]
    pub title: String,
    pub description: Option<String>,
    /// Defaults to 3
    #[validate(range(min = 0, max = 12, message = "Credits must be between 0 and 12"))]
    pub credits: Option<i32>,
    /// Defaults to the caller
    pub professor_id: Option<i32>,
    #[validate(length(min = 1, max = 100, message = "Department must be 1 to 100 characters"))]
    pub department: String,
    pub semester: Semester,
    #[validate(range(min = 1900, max = 2200, message = "Year must be between 1900 and 2200"))]
    pub year: i32,
    /// Defaults to 30
    #[validate(range(min = 1, message = "Maximum enrollment must be at least 1"))]
    pub max_enrollment: Option<i32>,
}

/// Course response model.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct CourseDto {
    pub id: i32,
    pub course_code: String,
    pub title: String,
    pub description: Option<String>,
    pub credits: i32,
    pub professor_id: Option<i32>,
    pub department: String,
    pub semester: Semester,
    pub year: i32,
    pub max_enrollment: i32,
    pub professor: Option<UserDto>,
    /// Number of active enrollments
    pub enrolled_count: u64,
}

/// Query parameters for listing courses.
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams, Validate, Default)]
pub struct CourseListQuery {
    /// Page number (default: 1)
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<u64>,
    /// Page size (default: 20)
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    pub per_page: Option<u64>,
}

/// One page of courses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct CoursePageDto {
    pub courses: Vec<CourseDto>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

// ===================== Enrollments =====================

/// Enrollment response model.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct EnrollmentDto {
    pub id: i32,
    pub student_id: i32,
    pub course_id: i32,
    pub enrolled_at: DateTime<Utc>,
    pub status: EnrollmentStatus,
    pub course: Option<CourseDto>,
}

/// Courses of the caller: enrollments for a student, taught courses for a
/// professor.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(untagged)]
pub enum MyCoursesDto {
    Enrollments(Vec<EnrollmentDto>),
    Taught(Vec<CourseDto>),
}

// ===================== Grades =====================

/// Request body for recording a grade.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq)]
pub struct CreateGradeRequest {
    pub enrollment_id: i32,
    #[validate(length(min = 1, max = 200, message = "Assignment name must be 1 to 200 characters"))]
    pub assignment_name: String,
    #[validate(range(min = 0.0, message = "Grade value cannot be negative"))]
    pub grade_value: f64,
    /// Defaults to 100
    #[validate(range(exclusive_min = 0.0, message = "Max points must be greater than 0"))]
    pub max_points: Option<f64>,
    pub assignment_type: AssignmentType,
}

/// Grade response model with the derived score.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct GradeDto {
    pub id: i32,
    pub enrollment_id: i32,
    pub assignment_name: String,
    pub grade_value: f64,
    pub max_points: f64,
    pub assignment_type: AssignmentType,
    pub percentage: f64,
    pub letter_grade: LetterGrade,
    pub recorded_at: DateTime<Utc>,
}

/// Short course reference used when grouping grades.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct CourseSummaryDto {
    pub code: String,
    pub title: String,
    pub credits: i32,
}

/// Grades of one course for the calling student.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct CourseGradesDto {
    pub course: CourseSummaryDto,
    pub grades: Vec<GradeDto>,
}

/// Grades of the calling student keyed by course code.
pub type GradesByCourse = BTreeMap<String, CourseGradesDto>;
