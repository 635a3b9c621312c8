//! Student profiles. Every student-role user owns exactly one.

use model::entities::{student, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, ServiceError};

pub const DEFAULT_MAJOR: &str = "Undeclared";

/// Profile fields chosen at signup.
#[derive(Debug, Clone, Default)]
pub struct NewStudentProfile {
    pub major: Option<String>,
    pub year_level: Option<student::YearLevel>,
}

/// Profile fields a student may edit afterwards.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub major: Option<String>,
    pub year_level: Option<student::YearLevel>,
}

#[instrument(skip(db, profile))]
pub async fn create_profile_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    profile: NewStudentProfile,
) -> Result<student::Model> {
    let major = profile
        .major
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_MAJOR.to_string());

    let record = student::ActiveModel {
        user_id: Set(user_id),
        student_number: Set(student::student_number_for(user_id)),
        major: Set(major),
        year_level: Set(profile.year_level.unwrap_or(student::YearLevel::Freshman)),
        gpa: Set(0.0),
        total_credits: Set(0),
        ..Default::default()
    };
    let created = record
        .insert(db)
        .await
        .map_err(|e| ServiceError::conflict_or_database(e, "Student profile already exists"))?;
    info!(
        "Student profile {} created for user ID: {}",
        created.student_number, user_id
    );
    Ok(created)
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, student_id: i32) -> Result<Option<student::Model>> {
    Ok(student::Entity::find_by_id(student_id).one(db).await?)
}

pub async fn find_by_user<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<Option<student::Model>> {
    Ok(student::Entity::find()
        .filter(student::Column::UserId.eq(user_id))
        .one(db)
        .await?)
}

/// The caller's own profile; a student-role user without one is a 404.
pub async fn require_profile<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<student::Model> {
    find_by_user(db, user_id).await?.ok_or_else(|| {
        warn!("No student profile for user ID: {}", user_id);
        ServiceError::not_found("Student profile")
    })
}

/// A profile together with its account.
pub async fn find_with_user<C: ConnectionTrait>(
    db: &C,
    student_id: i32,
) -> Result<Option<(student::Model, user::Model)>> {
    let found = student::Entity::find_by_id(student_id)
        .find_also_related(user::Entity)
        .one(db)
        .await?;
    Ok(found.and_then(|(profile, account)| account.map(|a| (profile, a))))
}

pub async fn list_students<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<(student::Model, Option<user::Model>)>> {
    let students = student::Entity::find()
        .find_also_related(user::Entity)
        .order_by_asc(student::Column::Id)
        .all(db)
        .await?;
    debug!("Listed {} students", students.len());
    Ok(students)
}

#[instrument(skip(db))]
pub async fn update_profile<C: ConnectionTrait>(
    db: &C,
    student_id: i32,
    changes: ProfileChanges,
) -> Result<student::Model> {
    let profile = find_by_id(db, student_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Student"))?;
    let mut active: student::ActiveModel = profile.into();

    if let Some(major) = changes.major {
        let major = major.trim();
        if major.is_empty() {
            return Err(ServiceError::Validation("Major must not be empty".to_string()));
        }
        active.major = Set(major.to_string());
    }
    if let Some(year_level) = changes.year_level {
        active.year_level = Set(year_level);
    }

    let updated = active.update(db).await?;
    info!("Student profile {} updated", updated.id);
    Ok(updated)
}
