use chrono::Utc;
use common::EnrollmentDto;
use model::entities::{course, enrollment, grade, student, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info, instrument, warn};

use crate::courses;
use crate::dto;
use crate::error::{Result, ServiceError};
use crate::students;

/// Enrolls a student in a course. A second enrollment in the same course
/// and an enrollment beyond capacity are both rejected.
#[instrument(skip(db, student), fields(student_id = student.id))]
pub async fn enroll<C: ConnectionTrait>(
    db: &C,
    student: &student::Model,
    course_id: i32,
) -> Result<enrollment::Model> {
    let course = courses::find_course(db, course_id).await?;

    let existing = enrollment::Entity::find()
        .filter(enrollment::Column::StudentId.eq(student.id))
        .filter(enrollment::Column::CourseId.eq(course_id))
        .one(db)
        .await?;
    if existing.is_some() {
        warn!("Student {} already enrolled in course {}", student.id, course_id);
        return Err(ServiceError::Conflict(
            "Already enrolled in this course".to_string(),
        ));
    }

    let count = courses::enrolled_count(db, course_id).await?;
    if count >= course.max_enrollment as u64 {
        warn!("Course {} is full ({} of {})", course_id, count, course.max_enrollment);
        return Err(ServiceError::Validation("Course is full".to_string()));
    }

    let record = enrollment::ActiveModel {
        student_id: Set(student.id),
        course_id: Set(course_id),
        enrolled_at: Set(Utc::now()),
        status: Set(enrollment::EnrollmentStatus::Enrolled),
        ..Default::default()
    };
    let created = record
        .insert(db)
        .await
        .map_err(|e| ServiceError::conflict_or_database(e, "Already enrolled in this course"))?;
    info!("Enrollment {} created", created.id);
    Ok(created)
}

pub async fn find_enrollment<C: ConnectionTrait>(
    db: &C,
    enrollment_id: i32,
) -> Result<enrollment::Model> {
    enrollment::Entity::find_by_id(enrollment_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Enrollment"))
}

pub async fn enrollments_for_student<C: ConnectionTrait>(
    db: &C,
    student_id: i32,
) -> Result<Vec<enrollment::Model>> {
    Ok(enrollment::Entity::find()
        .filter(enrollment::Column::StudentId.eq(student_id))
        .order_by_asc(enrollment::Column::Id)
        .all(db)
        .await?)
}

/// Enrollments with their course expanded.
pub async fn describe_enrollments<C: ConnectionTrait>(
    db: &C,
    enrollments: &[enrollment::Model],
) -> Result<Vec<EnrollmentDto>> {
    let mut described = Vec::with_capacity(enrollments.len());
    for record in enrollments {
        let course = match course::Entity::find_by_id(record.course_id).one(db).await? {
            Some(course) => Some(courses::describe_course(db, &course).await?),
            None => None,
        };
        described.push(dto::enrollment_dto(record, course));
    }
    Ok(described)
}

/// Whether `caller` may drop this enrollment: the enrolled student, the
/// professor of the course, or an admin.
pub async fn can_manage_enrollment<C: ConnectionTrait>(
    db: &C,
    caller: &user::Model,
    record: &enrollment::Model,
) -> Result<bool> {
    match caller.role {
        user::UserRole::Admin => Ok(true),
        user::UserRole::Student => Ok(students::find_by_user(db, caller.id)
            .await?
            .is_some_and(|profile| profile.id == record.student_id)),
        user::UserRole::Professor => {
            let course = courses::find_course(db, record.course_id).await?;
            Ok(course.professor_id == Some(caller.id))
        }
    }
}

/// Removes one enrollment and its grades together.
#[instrument(skip(db))]
pub async fn delete_enrollment<C: TransactionTrait>(db: &C, enrollment_id: i32) -> Result<()> {
    let txn = db.begin().await?;

    let record = find_enrollment(&txn, enrollment_id).await?;
    let grades = grade::Entity::delete_many()
        .filter(grade::Column::EnrollmentId.eq(record.id))
        .exec(&txn)
        .await?;
    enrollment::Entity::delete_by_id(record.id).exec(&txn).await?;

    txn.commit().await?;
    info!(
        "Enrollment {} deleted with {} grades",
        enrollment_id, grades.rows_affected
    );
    Ok(())
}

/// Removes every enrollment of a student and their grades. Runs on the
/// caller's connection so it joins the caller's transaction.
pub async fn delete_for_student<C: ConnectionTrait>(db: &C, student_id: i32) -> Result<u64> {
    let ids: Vec<i32> = enrollment::Entity::find()
        .select_only()
        .column(enrollment::Column::Id)
        .filter(enrollment::Column::StudentId.eq(student_id))
        .into_tuple()
        .all(db)
        .await?;
    if ids.is_empty() {
        return Ok(0);
    }

    let grades = grade::Entity::delete_many()
        .filter(grade::Column::EnrollmentId.is_in(ids.clone()))
        .exec(db)
        .await?;
    let removed = enrollment::Entity::delete_many()
        .filter(enrollment::Column::Id.is_in(ids))
        .exec(db)
        .await?;
    debug!(
        "Deleted {} enrollments and {} grades of student {}",
        removed.rows_affected, grades.rows_affected, student_id
    );
    Ok(removed.rows_affected)
}
