use chrono::Utc;
use model::entities::item;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, ServiceError};
use crate::validation;

/// Creates a personal item for `user_id`. Blank descriptions are stored as
/// absent.
#[instrument(skip(db, description))]
pub async fn create_item<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    title: &str,
    description: Option<&str>,
) -> Result<item::Model> {
    validation::validate_item(title, description)?;

    let record = item::ActiveModel {
        user_id: Set(user_id),
        title: Set(title.trim().to_string()),
        description: Set(description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let created = record.insert(db).await?;
    info!("Item created with ID: {} for user ID: {}", created.id, user_id);
    Ok(created)
}

/// Items of one user, newest first.
pub async fn list_items_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Vec<item::Model>> {
    let items = item::Entity::find()
        .filter(item::Column::UserId.eq(user_id))
        .order_by_desc(item::Column::CreatedAt)
        .order_by_desc(item::Column::Id)
        .all(db)
        .await?;
    debug!("Found {} items for user ID: {}", items.len(), user_id);
    Ok(items)
}

/// Deletes an item only when `user_id` owns it. Someone else's item looks
/// exactly like a missing one.
#[instrument(skip(db))]
pub async fn delete_item_owned<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    item_id: i32,
) -> Result<()> {
    let res = item::Entity::delete_many()
        .filter(item::Column::Id.eq(item_id))
        .filter(item::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    if res.rows_affected == 0 {
        warn!("Item {} not found for user ID: {}", item_id, user_id);
        return Err(ServiceError::not_found("Item"));
    }
    info!("Item {} deleted", item_id);
    Ok(())
}
