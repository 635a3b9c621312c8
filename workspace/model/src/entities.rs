//! This file serves as the root for all SeaORM entity modules.
//! Accounts and sessions come first, then personal items, then the
//! university registry (students, courses, enrollments, grades).

pub mod course;
pub mod enrollment;
pub mod grade;
pub mod item;
pub mod session;
pub mod student;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::course::Entity as Course;
    pub use super::enrollment::Entity as Enrollment;
    pub use super::grade::Entity as Grade;
    pub use super::item::Entity as Item;
    pub use super::session::Entity as Session;
    pub use super::student::Entity as Student;
    pub use super::user::Entity as User;
}

#[cfg(test)]
mod test {
    use chrono::{Duration, Utc};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, ModelTrait, QueryFilter, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    fn new_user(username: &str, role: user::UserRole) -> user::ActiveModel {
        user::ActiveModel {
            username: Set(username.to_string()),
            email: Set(Some(format!("{}@example.edu", username))),
            first_name: Set(None),
            last_name: Set(None),
            role: Set(role),
            password_hash: Set("$argon2id$placeholder".to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let alice = new_user("alice", user::UserRole::Student).insert(&db).await?;
        let prof = new_user("prof", user::UserRole::Professor).insert(&db).await?;

        let now = Utc::now();
        session::ActiveModel {
            token: Set("token-1".to_string()),
            user_id: Set(alice.id),
            created_at: Set(now),
            expires_at: Set(now + Duration::hours(1)),
        }
        .insert(&db)
        .await?;

        item::ActiveModel {
            user_id: Set(alice.id),
            title: Set("Notebook".to_string()),
            description: Set(None),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let profile = student::ActiveModel {
            user_id: Set(alice.id),
            student_number: Set(student::student_number_for(alice.id)),
            major: Set("Physics".to_string()),
            year_level: Set(student::YearLevel::Freshman),
            gpa: Set(0.0),
            total_credits: Set(0),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let physics = course::ActiveModel {
            course_code: Set("PHY101".to_string()),
            title: Set("Mechanics".to_string()),
            description: Set(None),
            credits: Set(3),
            professor_id: Set(Some(prof.id)),
            department: Set("Physics".to_string()),
            semester: Set(course::Semester::Fall),
            year: Set(2024),
            max_enrollment: Set(30),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let enrollment = enrollment::ActiveModel {
            student_id: Set(profile.id),
            course_id: Set(physics.id),
            enrolled_at: Set(now),
            status: Set(enrollment::EnrollmentStatus::Enrolled),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        grade::ActiveModel {
            enrollment_id: Set(enrollment.id),
            assignment_name: Set("Midterm".to_string()),
            grade_value: Set(88.0),
            max_points: Set(100.0),
            assignment_type: Set(grade::AssignmentType::Exam),
            recorded_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Read back through relations
        let sessions = alice.find_related(Session).all(&db).await?;
        assert_eq!(sessions.len(), 1);
        assert!(!sessions[0].is_expired(now));

        let items = alice.find_related(Item).all(&db).await?;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Notebook");

        let stored_profile = alice.find_related(Student).one(&db).await?.unwrap();
        assert_eq!(stored_profile.student_number, format!("STU{:06}", alice.id));

        let taught = prof.find_related(Course).all(&db).await?;
        assert_eq!(taught.len(), 1);
        assert_eq!(taught[0].course_code, "PHY101");

        let grades = enrollment.find_related(Grade).all(&db).await?;
        assert_eq!(grades.len(), 1);
        assert_eq!(grades[0].assignment_type, grade::AssignmentType::Exam);

        let enrolled = Enrollment::find()
            .filter(enrollment::Column::CourseId.eq(physics.id))
            .all(&db)
            .await?;
        assert_eq!(enrolled.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_enrollment_pair_is_unique() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let now = Utc::now();

        let bob = new_user("bob", user::UserRole::Student).insert(&db).await?;
        let profile = student::ActiveModel {
            user_id: Set(bob.id),
            student_number: Set(student::student_number_for(bob.id)),
            major: Set("Undeclared".to_string()),
            year_level: Set(student::YearLevel::Junior),
            gpa: Set(0.0),
            total_credits: Set(0),
            ..Default::default()
        }
        .insert(&db)
        .await?;
        let course = course::ActiveModel {
            course_code: Set("CS100".to_string()),
            title: Set("Intro".to_string()),
            description: Set(None),
            credits: Set(3),
            professor_id: Set(None),
            department: Set("CS".to_string()),
            semester: Set(course::Semester::Spring),
            year: Set(2025),
            max_enrollment: Set(10),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let enroll = || enrollment::ActiveModel {
            student_id: Set(profile.id),
            course_id: Set(course.id),
            enrolled_at: Set(now),
            status: Set(enrollment::EnrollmentStatus::Enrolled),
            ..Default::default()
        };

        enroll().insert(&db).await?;
        let duplicate = enroll().insert(&db).await;
        assert!(duplicate.is_err());

        let count = Enrollment::find().all(&db).await?.len();
        assert_eq!(count, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_username_is_unique() -> Result<(), DbErr> {
        let db = setup_db().await?;

        new_user("carol", user::UserRole::Student).insert(&db).await?;
        let mut second = new_user("carol", user::UserRole::Student);
        second.email = Set(Some("other@example.edu".to_string()));
        assert!(second.insert(&db).await.is_err());

        assert_eq!(User::find().all(&db).await?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut model = user::Model {
            id: 1,
            username: "dave".to_string(),
            email: None,
            first_name: None,
            last_name: None,
            role: user::UserRole::Admin,
            password_hash: String::new(),
            created_at: Utc::now(),
        };
        assert_eq!(model.display_name(), "dave");
        model.first_name = Some("Dave".to_string());
        assert_eq!(model.display_name(), "Dave");
        model.last_name = Some("Jones".to_string());
        assert_eq!(model.display_name(), "Dave Jones");
    }
}
