//! Shared fixtures for the service tests.

use migration::{Migrator, MigratorTrait};
use model::entities::{course, student, user};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};

use crate::courses;
use crate::users::{self, NewUser};

/// Fresh in-memory database with every migration applied.
pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");
    db.execute_unprepared("PRAGMA foreign_keys = ON;")
        .await
        .expect("Failed to enable foreign keys");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub fn new_user(username: &str, role: user::UserRole) -> NewUser {
    NewUser {
        username: username.to_string(),
        password: "password123".to_string(),
        email: Some(format!("{}@example.edu", username)),
        first_name: None,
        last_name: None,
        role,
    }
}

/// Registers a student account with its profile.
pub async fn student(db: &DatabaseConnection, username: &str) -> (user::Model, student::Model) {
    let (account, profile) =
        users::register(db, new_user(username, user::UserRole::Student), None)
            .await
            .expect("Failed to register student");
    (account, profile.expect("student profile"))
}

pub async fn professor(db: &DatabaseConnection, username: &str) -> user::Model {
    users::create_user(db, new_user(username, user::UserRole::Professor))
        .await
        .expect("Failed to create professor")
}

pub async fn course(
    db: &DatabaseConnection,
    code: &str,
    professor: &user::Model,
    max_enrollment: i32,
) -> course::Model {
    let request = common::CreateCourseRequest {
        course_code: code.to_string(),
        title: format!("{} title", code),
        description: None,
        credits: Some(3),
        professor_id: None,
        department: "Computer Science".to_string(),
        semester: common::Semester::Fall,
        year: 2024,
        max_enrollment: Some(max_enrollment),
    };
    courses::create_course(db, &request, professor)
        .await
        .expect("Failed to create course")
}
