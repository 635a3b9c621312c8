use chrono::Utc;
use common::ChangePasswordRequest;
use model::entities::{course, item, session, student, user};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{debug, info, instrument, trace, warn};

use crate::credential;
use crate::enrollments;
use crate::error::{Result, ServiceError};
use crate::students::{self, NewStudentProfile};
use crate::validation;

/// Everything needed to create an account. The password is hashed before
/// it reaches the database.
#[derive(Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: user::UserRole,
}

/// Optional account fields that can change after signup.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

fn normalize_email(email: Option<String>) -> Option<String> {
    email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<Option<user::Model>> {
    Ok(user::Entity::find_by_id(user_id).one(db).await?)
}

pub async fn require_user<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<user::Model> {
    find_by_id(db, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("User"))
}

pub async fn find_by_username<C: ConnectionTrait>(
    db: &C,
    username: &str,
) -> Result<Option<user::Model>> {
    Ok(user::Entity::find()
        .filter(user::Column::Username.eq(username.trim()))
        .one(db)
        .await?)
}

async fn email_taken<C: ConnectionTrait>(db: &C, email: &str, except: Option<i32>) -> Result<bool> {
    let mut query = user::Entity::find().filter(user::Column::Email.eq(email));
    if let Some(user_id) = except {
        query = query.filter(user::Column::Id.ne(user_id));
    }
    Ok(query.one(db).await?.is_some())
}

pub async fn list_users<C: ConnectionTrait>(db: &C) -> Result<Vec<user::Model>> {
    Ok(user::Entity::find()
        .order_by_asc(user::Column::Id)
        .all(db)
        .await?)
}

/// Inserts a new account. Username and e-mail must be unused.
#[instrument(skip(db, new_user), fields(username = %new_user.username))]
pub async fn create_user<C: ConnectionTrait>(db: &C, new_user: NewUser) -> Result<user::Model> {
    trace!("Entering create_user");
    validation::validate_username(&new_user.username)?;
    validation::validate_password(&new_user.password)?;

    let username = new_user.username.trim().to_string();
    let email = normalize_email(new_user.email);

    if find_by_username(db, &username).await?.is_some() {
        warn!("Username '{}' already exists", username);
        return Err(ServiceError::Conflict("Username already exists".to_string()));
    }
    if let Some(email) = &email {
        if email_taken(db, email, None).await? {
            warn!("Email '{}' already exists", email);
            return Err(ServiceError::Conflict("Email already exists".to_string()));
        }
    }

    let password_hash = credential::hash_password(&new_user.password)?;
    let account = user::ActiveModel {
        username: Set(username),
        email: Set(email),
        first_name: Set(new_user.first_name),
        last_name: Set(new_user.last_name),
        role: Set(new_user.role),
        password_hash: Set(password_hash),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let created = account
        .insert(db)
        .await
        .map_err(|e| ServiceError::conflict_or_database(e, "Username already exists"))?;
    info!("User created with ID: {}, username: {}", created.id, created.username);
    Ok(created)
}

/// Creates the account and, for students, the student profile, atomically.
#[instrument(skip(db, new_user, profile), fields(username = %new_user.username))]
pub async fn register<C: TransactionTrait>(
    db: &C,
    new_user: NewUser,
    profile: Option<NewStudentProfile>,
) -> Result<(user::Model, Option<student::Model>)> {
    let txn = db.begin().await?;

    let account = create_user(&txn, new_user).await?;
    let profile = if account.role == user::UserRole::Student {
        let profile = profile.unwrap_or_default();
        Some(students::create_profile_for_user(&txn, account.id, profile).await?)
    } else {
        None
    };

    txn.commit().await?;
    debug!("Registration committed for user ID: {}", account.id);
    Ok((account, profile))
}

/// Returns the account when `password` matches its stored hash.
#[instrument(skip(db, password))]
pub async fn authenticate<C: ConnectionTrait>(
    db: &C,
    username: &str,
    password: &str,
) -> Result<user::Model> {
    let Some(account) = find_by_username(db, username).await? else {
        warn!("Login attempt for unknown username");
        return Err(ServiceError::InvalidCredentials);
    };

    if credential::verify_password(password, &account.password_hash) {
        debug!("Credentials verified for user ID: {}", account.id);
        Ok(account)
    } else {
        warn!("Wrong password for user ID: {}", account.id);
        Err(ServiceError::InvalidCredentials)
    }
}

/// Replaces the password after checking the old one.
#[instrument(skip(db, request))]
pub async fn change_password<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    request: &ChangePasswordRequest,
) -> Result<user::Model> {
    let account = require_user(db, user_id).await?;

    if !credential::verify_password(&request.old_password, &account.password_hash) {
        warn!("Old password mismatch for user ID: {}", user_id);
        return Err(ServiceError::Validation("Old password is incorrect".to_string()));
    }
    validation::validate_new_password(&request.new_password, &request.confirm_password)?;

    let password_hash = credential::hash_password(&request.new_password)?;
    let mut active: user::ActiveModel = account.into();
    active.password_hash = Set(password_hash);
    let updated = active.update(db).await?;
    info!("Password changed for user ID: {}", user_id);
    Ok(updated)
}

/// Applies the provided display-name and e-mail changes.
#[instrument(skip(db))]
pub async fn update_profile<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    changes: AccountChanges,
) -> Result<user::Model> {
    let account = require_user(db, user_id).await?;
    let mut active: user::ActiveModel = account.into();
    let mut updated_fields = Vec::new();

    if let Some(first_name) = changes.first_name {
        active.first_name = Set(Some(first_name).filter(|s| !s.trim().is_empty()));
        updated_fields.push("first_name");
    }
    if let Some(last_name) = changes.last_name {
        active.last_name = Set(Some(last_name).filter(|s| !s.trim().is_empty()));
        updated_fields.push("last_name");
    }
    if let Some(email) = normalize_email(changes.email) {
        if email_taken(db, &email, Some(user_id)).await? {
            return Err(ServiceError::Conflict("Email already exists".to_string()));
        }
        active.email = Set(Some(email));
        updated_fields.push("email");
    }

    if updated_fields.is_empty() {
        debug!("No fields to update for user ID: {}", user_id);
    } else {
        debug!("Updating fields: {}", updated_fields.join(", "));
    }

    active
        .update(db)
        .await
        .map_err(|e| ServiceError::conflict_or_database(e, "Email already exists"))
}

/// Deletes a user and everything that hangs off it: sessions, items, the
/// student profile with its enrollments and grades. Courses the user taught
/// stay, without a professor. All of it commits or none of it does.
#[instrument(skip(db))]
pub async fn delete_user_cascade<C: TransactionTrait>(db: &C, user_id: i32) -> Result<()> {
    let txn = db.begin().await?;

    let account = require_user(&txn, user_id).await?;

    if let Some(profile) = students::find_by_user(&txn, user_id).await? {
        let removed = enrollments::delete_for_student(&txn, profile.id).await?;
        debug!("Removed {} enrollments of student ID: {}", removed, profile.id);
        student::Entity::delete_by_id(profile.id).exec(&txn).await?;
    }

    let items = item::Entity::delete_many()
        .filter(item::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    let sessions = session::Entity::delete_many()
        .filter(session::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    course::Entity::update_many()
        .col_expr(course::Column::ProfessorId, Expr::value(Option::<i32>::None))
        .filter(course::Column::ProfessorId.eq(user_id))
        .exec(&txn)
        .await?;
    user::Entity::delete_by_id(user_id).exec(&txn).await?;

    txn.commit().await?;
    info!(
        "User '{}' deleted with {} items and {} sessions",
        account.username, items.rows_affected, sessions.rows_affected
    );
    Ok(())
}
