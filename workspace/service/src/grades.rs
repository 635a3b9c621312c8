use chrono::Utc;
use common::{CourseGradesDto, CourseSummaryDto, CreateGradeRequest, GradesByCourse};
use model::entities::{course, enrollment, grade, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::{debug, info, instrument, warn};

use crate::courses;
use crate::dto;
use crate::enrollments;
use crate::error::{Result, ServiceError};
use crate::validation;

pub const DEFAULT_MAX_POINTS: f64 = 100.0;

/// Records a grade against an existing enrollment. Professors may only
/// grade enrollments of courses they teach.
#[instrument(skip(db, request, caller), fields(enrollment_id = request.enrollment_id))]
pub async fn record_grade<C: ConnectionTrait>(
    db: &C,
    request: &CreateGradeRequest,
    caller: &user::Model,
) -> Result<grade::Model> {
    if caller.role == user::UserRole::Student {
        warn!("Student {} attempted to record a grade", caller.id);
        return Err(ServiceError::Forbidden("Access denied".to_string()));
    }
    validation::validate_request(request)?;

    let record = enrollments::find_enrollment(db, request.enrollment_id).await?;
    if caller.role == user::UserRole::Professor {
        let course = courses::find_course(db, record.course_id).await?;
        if course.professor_id != Some(caller.id) {
            warn!(
                "Professor {} does not teach course {}",
                caller.id, course.id
            );
            return Err(ServiceError::Forbidden(
                "You can only grade your own courses".to_string(),
            ));
        }
    }

    let new_grade = grade::ActiveModel {
        enrollment_id: Set(record.id),
        assignment_name: Set(request.assignment_name.trim().to_string()),
        grade_value: Set(request.grade_value),
        max_points: Set(request.max_points.unwrap_or(DEFAULT_MAX_POINTS)),
        assignment_type: Set(dto::assignment_type_from_dto(request.assignment_type)),
        recorded_at: Set(Utc::now()),
        ..Default::default()
    };
    let created = new_grade.insert(db).await?;
    info!("Grade {} recorded for enrollment {}", created.id, record.id);
    Ok(created)
}

pub async fn grades_for_student<C: ConnectionTrait>(
    db: &C,
    student_id: i32,
) -> Result<Vec<grade::Model>> {
    Ok(grade::Entity::find()
        .inner_join(enrollment::Entity)
        .filter(enrollment::Column::StudentId.eq(student_id))
        .order_by_asc(grade::Column::Id)
        .all(db)
        .await?)
}

pub async fn grades_for_course<C: ConnectionTrait>(
    db: &C,
    course_id: i32,
) -> Result<Vec<grade::Model>> {
    Ok(grade::Entity::find()
        .inner_join(enrollment::Entity)
        .filter(enrollment::Column::CourseId.eq(course_id))
        .order_by_asc(grade::Column::Id)
        .all(db)
        .await?)
}

pub async fn all_grades<C: ConnectionTrait>(db: &C) -> Result<Vec<grade::Model>> {
    Ok(grade::Entity::find()
        .order_by_asc(grade::Column::Id)
        .all(db)
        .await?)
}

/// The student's grades grouped by course code. Courses without grades
/// yet appear with an empty list.
pub async fn grades_by_course_for_student<C: ConnectionTrait>(
    db: &C,
    student_id: i32,
) -> Result<GradesByCourse> {
    let records = enrollment::Entity::find()
        .filter(enrollment::Column::StudentId.eq(student_id))
        .find_also_related(course::Entity)
        .all(db)
        .await?;

    let mut grouped = GradesByCourse::new();
    for (record, course) in records {
        let Some(course) = course else {
            continue;
        };
        let grades = grade::Entity::find()
            .filter(grade::Column::EnrollmentId.eq(record.id))
            .order_by_asc(grade::Column::Id)
            .all(db)
            .await?;
        grouped.insert(
            course.course_code.clone(),
            CourseGradesDto {
                course: CourseSummaryDto {
                    code: course.course_code,
                    title: course.title,
                    credits: course.credits,
                },
                grades: grades.iter().map(dto::grade_dto).collect(),
            },
        );
    }
    debug!("Grouped grades into {} courses", grouped.len());
    Ok(grouped)
}
