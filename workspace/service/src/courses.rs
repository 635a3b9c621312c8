use common::{CourseDto, CourseListQuery, CoursePageDto, CreateCourseRequest};
use model::entities::{course, enrollment, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::{debug, info, instrument, trace, warn};

use crate::dto;
use crate::error::{Result, ServiceError};
use crate::validation;

pub const DEFAULT_CREDITS: i32 = 3;
pub const DEFAULT_MAX_ENROLLMENT: i32 = 30;
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Creates a course. Professors always teach what they create; admins may
/// name another professor.
#[instrument(skip(db, request), fields(course_code = %request.course_code))]
pub async fn create_course<C: ConnectionTrait>(
    db: &C,
    request: &CreateCourseRequest,
    caller: &user::Model,
) -> Result<course::Model> {
    trace!("Entering create_course");
    let professor_id = match caller.role {
        user::UserRole::Student => {
            warn!("Student {} attempted to create a course", caller.id);
            return Err(ServiceError::Forbidden("Access denied".to_string()));
        }
        user::UserRole::Professor => match request.professor_id {
            Some(other) if other != caller.id => {
                return Err(ServiceError::Forbidden(
                    "Professors can only create their own courses".to_string(),
                ));
            }
            _ => caller.id,
        },
        user::UserRole::Admin => match request.professor_id {
            Some(id) => {
                let professor = user::Entity::find_by_id(id).one(db).await?;
                match professor {
                    Some(p) if p.role == user::UserRole::Professor => p.id,
                    _ => return Err(ServiceError::not_found("Professor")),
                }
            }
            None => caller.id,
        },
    };

    validation::validate_request(request)?;

    let record = course::ActiveModel {
        course_code: Set(request.course_code.trim().to_string()),
        title: Set(request.title.trim().to_string()),
        description: Set(request.description.clone().filter(|d| !d.trim().is_empty())),
        credits: Set(request.credits.unwrap_or(DEFAULT_CREDITS)),
        professor_id: Set(Some(professor_id)),
        department: Set(request.department.trim().to_string()),
        semester: Set(dto::semester_from_dto(request.semester)),
        year: Set(request.year),
        max_enrollment: Set(request.max_enrollment.unwrap_or(DEFAULT_MAX_ENROLLMENT)),
        ..Default::default()
    };

    let created = record
        .insert(db)
        .await
        .map_err(|e| ServiceError::conflict_or_database(e, "Course code already exists"))?;
    info!("Course created with ID: {}, code: {}", created.id, created.course_code);
    Ok(created)
}

pub async fn find_course<C: ConnectionTrait>(db: &C, course_id: i32) -> Result<course::Model> {
    course::Entity::find_by_id(course_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Course"))
}

/// One page of courses ordered by code.
pub async fn list_courses<C: ConnectionTrait>(
    db: &C,
    query: &CourseListQuery,
) -> Result<(Vec<course::Model>, u64, u64)> {
    validation::validate_request(query)?;
    let page = query.page.unwrap_or(1);
    let per_page = query.per_page.unwrap_or(DEFAULT_PAGE_SIZE);

    let paginator = course::Entity::find()
        .order_by_asc(course::Column::CourseCode)
        .paginate(db, per_page);
    let counts = paginator.num_items_and_pages().await?;
    let courses = paginator.fetch_page(page - 1).await?;
    debug!(
        "Fetched page {} of {} ({} courses total)",
        page, counts.number_of_pages, counts.number_of_items
    );
    Ok((courses, counts.number_of_items, counts.number_of_pages))
}

pub async fn courses_taught_by<C: ConnectionTrait>(
    db: &C,
    professor_id: i32,
) -> Result<Vec<course::Model>> {
    Ok(course::Entity::find()
        .filter(course::Column::ProfessorId.eq(professor_id))
        .order_by_asc(course::Column::CourseCode)
        .all(db)
        .await?)
}

/// Active enrollments of a course; this is what capacity is checked against.
pub async fn enrolled_count<C: ConnectionTrait>(db: &C, course_id: i32) -> Result<u64> {
    Ok(enrollment::Entity::find()
        .filter(enrollment::Column::CourseId.eq(course_id))
        .filter(enrollment::Column::Status.eq(enrollment::EnrollmentStatus::Enrolled))
        .count(db)
        .await?)
}

/// Response form of a course with its professor and head count.
pub async fn describe_course<C: ConnectionTrait>(
    db: &C,
    course: &course::Model,
) -> Result<CourseDto> {
    let professor = match course.professor_id {
        Some(id) => user::Entity::find_by_id(id).one(db).await?,
        None => None,
    };
    let count = enrolled_count(db, course.id).await?;
    Ok(dto::course_dto(course, professor.as_ref(), count))
}

pub async fn describe_courses<C: ConnectionTrait>(
    db: &C,
    courses: &[course::Model],
) -> Result<Vec<CourseDto>> {
    let mut described = Vec::with_capacity(courses.len());
    for course in courses {
        described.push(describe_course(db, course).await?);
    }
    Ok(described)
}

pub async fn course_page<C: ConnectionTrait>(
    db: &C,
    query: &CourseListQuery,
) -> Result<CoursePageDto> {
    let (courses, total, total_pages) = list_courses(db, query).await?;
    Ok(CoursePageDto {
        courses: describe_courses(db, &courses).await?,
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(DEFAULT_PAGE_SIZE),
        total,
        total_pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, setup_db};

    fn request(code: &str) -> CreateCourseRequest {
        CreateCourseRequest {
            course_code: code.to_string(),
            title: "Algorithms".to_string(),
            description: None,
            credits: None,
            professor_id: None,
            department: "Computer Science".to_string(),
            semester: common::Semester::Spring,
            year: 2025,
            max_enrollment: None,
        }
    }

    #[tokio::test]
    async fn test_defaults_and_owner() {
        let db = setup_db().await;
        let prof = testing::professor(&db, "prof").await;

        let created = create_course(&db, &request("CS201"), &prof).await.unwrap();
        assert_eq!(created.credits, DEFAULT_CREDITS);
        assert_eq!(created.max_enrollment, DEFAULT_MAX_ENROLLMENT);
        assert_eq!(created.professor_id, Some(prof.id));
        assert_eq!(created.semester, course::Semester::Spring);
    }

    #[tokio::test]
    async fn test_students_cannot_create_courses() {
        let db = setup_db().await;
        let (student, _) = testing::student(&db, "alice").await;

        let err = create_course(&db, &request("CS201"), &student).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_duplicate_code_conflicts() {
        let db = setup_db().await;
        let prof = testing::professor(&db, "prof").await;

        create_course(&db, &request("CS201"), &prof).await.unwrap();
        let err = create_course(&db, &request("CS201"), &prof).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(ref m) if m == "Course code already exists"));
    }

    #[tokio::test]
    async fn test_invalid_request_is_rejected() {
        let db = setup_db().await;
        let prof = testing::professor(&db, "prof").await;

        let mut bad = request("");
        bad.year = 1800;
        let err = create_course(&db, &bad, &prof).await.unwrap_err();
        match err {
            ServiceError::Validation(message) => {
                assert_eq!(
                    message,
                    "Course code must be 1 to 20 characters; Year must be between 1900 and 2200"
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_admin_assigns_professor() {
        let db = setup_db().await;
        let admin = crate::users::create_user(&db, testing::new_user("root", user::UserRole::Admin))
            .await
            .unwrap();
        let prof = testing::professor(&db, "prof").await;
        let (student, _) = testing::student(&db, "alice").await;

        let mut assigned = request("CS301");
        assigned.professor_id = Some(prof.id);
        let created = create_course(&db, &assigned, &admin).await.unwrap();
        assert_eq!(created.professor_id, Some(prof.id));

        let mut wrong = request("CS302");
        wrong.professor_id = Some(student.id);
        assert!(matches!(
            create_course(&db, &wrong, &admin).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_pagination() {
        let db = setup_db().await;
        let prof = testing::professor(&db, "prof").await;
        for code in ["C1", "C2", "C3", "C4", "C5"] {
            create_course(&db, &request(code), &prof).await.unwrap();
        }

        let query = CourseListQuery {
            page: Some(2),
            per_page: Some(2),
        };
        let page = course_page(&db, &query).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);
        let codes: Vec<_> = page.courses.iter().map(|c| c.course_code.as_str()).collect();
        assert_eq!(codes, vec!["C3", "C4"]);
        assert_eq!(page.courses[0].professor.as_ref().map(|p| p.id), Some(prof.id));

        let bad = CourseListQuery {
            page: Some(0),
            per_page: None,
        };
        assert!(matches!(
            list_courses(&db, &bad).await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_taught_by_and_missing_course() {
        let db = setup_db().await;
        let prof = testing::professor(&db, "prof").await;
        let other = testing::professor(&db, "other").await;
        testing::course(&db, "CS1", &prof, 5).await;
        testing::course(&db, "CS2", &other, 5).await;

        let taught = courses_taught_by(&db, prof.id).await.unwrap();
        assert_eq!(taught.len(), 1);
        assert_eq!(taught[0].course_code, "CS1");
        assert!(matches!(find_course(&db, 999).await, Err(ServiceError::NotFound(_))));
    }
}
