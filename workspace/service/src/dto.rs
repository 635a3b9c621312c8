//! Conversions between stored rows and the transport types in `common`.

use common::{
    AssignmentType, CourseDto, EnrollmentDto, EnrollmentStatus, GradeDto, Role, Semester,
    StudentDto, UserDto, YearLevel,
};
use model::entities::{course, enrollment, grade, student, user};

use crate::grading;

pub fn role_to_dto(role: user::UserRole) -> Role {
    match role {
        user::UserRole::Student => Role::Student,
        user::UserRole::Professor => Role::Professor,
        user::UserRole::Admin => Role::Admin,
    }
}

pub fn role_from_dto(role: Role) -> user::UserRole {
    match role {
        Role::Student => user::UserRole::Student,
        Role::Professor => user::UserRole::Professor,
        Role::Admin => user::UserRole::Admin,
    }
}

pub fn year_level_to_dto(level: student::YearLevel) -> YearLevel {
    match level {
        student::YearLevel::Freshman => YearLevel::Freshman,
        student::YearLevel::Sophomore => YearLevel::Sophomore,
        student::YearLevel::Junior => YearLevel::Junior,
        student::YearLevel::Senior => YearLevel::Senior,
    }
}

pub fn year_level_from_dto(level: YearLevel) -> student::YearLevel {
    match level {
        YearLevel::Freshman => student::YearLevel::Freshman,
        YearLevel::Sophomore => student::YearLevel::Sophomore,
        YearLevel::Junior => student::YearLevel::Junior,
        YearLevel::Senior => student::YearLevel::Senior,
    }
}

pub fn semester_to_dto(semester: course::Semester) -> Semester {
    match semester {
        course::Semester::Fall => Semester::Fall,
        course::Semester::Spring => Semester::Spring,
        course::Semester::Summer => Semester::Summer,
    }
}

pub fn semester_from_dto(semester: Semester) -> course::Semester {
    match semester {
        Semester::Fall => course::Semester::Fall,
        Semester::Spring => course::Semester::Spring,
        Semester::Summer => course::Semester::Summer,
    }
}

pub fn status_to_dto(status: enrollment::EnrollmentStatus) -> EnrollmentStatus {
    match status {
        enrollment::EnrollmentStatus::Enrolled => EnrollmentStatus::Enrolled,
        enrollment::EnrollmentStatus::Dropped => EnrollmentStatus::Dropped,
        enrollment::EnrollmentStatus::Completed => EnrollmentStatus::Completed,
    }
}

pub fn assignment_type_to_dto(kind: grade::AssignmentType) -> AssignmentType {
    match kind {
        grade::AssignmentType::Exam => AssignmentType::Exam,
        grade::AssignmentType::Homework => AssignmentType::Homework,
        grade::AssignmentType::Project => AssignmentType::Project,
        grade::AssignmentType::Quiz => AssignmentType::Quiz,
    }
}

pub fn assignment_type_from_dto(kind: AssignmentType) -> grade::AssignmentType {
    match kind {
        AssignmentType::Exam => grade::AssignmentType::Exam,
        AssignmentType::Homework => grade::AssignmentType::Homework,
        AssignmentType::Project => grade::AssignmentType::Project,
        AssignmentType::Quiz => grade::AssignmentType::Quiz,
    }
}

pub fn user_dto(model: &user::Model) -> UserDto {
    UserDto {
        id: model.id,
        username: model.username.clone(),
        email: model.email.clone(),
        first_name: model.first_name.clone(),
        last_name: model.last_name.clone(),
        role: role_to_dto(model.role),
        created_at: model.created_at,
    }
}

pub fn student_dto(model: &student::Model, user: Option<&user::Model>) -> StudentDto {
    StudentDto {
        id: model.id,
        user_id: model.user_id,
        student_number: model.student_number.clone(),
        major: model.major.clone(),
        year_level: year_level_to_dto(model.year_level),
        gpa: model.gpa,
        total_credits: model.total_credits,
        user: user.map(user_dto),
    }
}

pub fn course_dto(
    model: &course::Model,
    professor: Option<&user::Model>,
    enrolled_count: u64,
) -> CourseDto {
    CourseDto {
        id: model.id,
        course_code: model.course_code.clone(),
        title: model.title.clone(),
        description: model.description.clone(),
        credits: model.credits,
        professor_id: model.professor_id,
        department: model.department.clone(),
        semester: semester_to_dto(model.semester),
        year: model.year,
        max_enrollment: model.max_enrollment,
        professor: professor.map(user_dto),
        enrolled_count,
    }
}

pub fn enrollment_dto(model: &enrollment::Model, course: Option<CourseDto>) -> EnrollmentDto {
    EnrollmentDto {
        id: model.id,
        student_id: model.student_id,
        course_id: model.course_id,
        enrolled_at: model.enrolled_at,
        status: status_to_dto(model.status),
        course,
    }
}

pub fn grade_dto(model: &grade::Model) -> GradeDto {
    GradeDto {
        id: model.id,
        enrollment_id: model.enrollment_id,
        assignment_name: model.assignment_name.clone(),
        grade_value: model.grade_value,
        max_points: model.max_points,
        assignment_type: assignment_type_to_dto(model.assignment_type),
        percentage: grading::percentage(model.grade_value, model.max_points),
        letter_grade: grading::letter_grade(model.grade_value, model.max_points),
        recorded_at: model.recorded_at,
    }
}
