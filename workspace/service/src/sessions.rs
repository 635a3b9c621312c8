//! Server-side login sessions. The cookie carries only the random token;
//! user id and expiry live in the `sessions` table.

use chrono::{DateTime, Duration, Utc};
use model::entities::{session, user};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::Result;

/// Opens a new session for `user_id` valid for `ttl`. Sessions that have
/// already expired are purged first.
#[instrument(skip(db))]
pub async fn create_session<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    ttl: Duration,
) -> Result<session::Model> {
    let now = Utc::now();
    purge_expired(db, now).await?;
    let record = session::ActiveModel {
        token: Set(Uuid::new_v4().simple().to_string()),
        user_id: Set(user_id),
        created_at: Set(now),
        expires_at: Set(now + ttl),
    };
    let created = record.insert(db).await?;
    debug!("Session opened for user ID: {}", user_id);
    Ok(created)
}

/// Looks up the user behind `token`. Expired sessions are removed and
/// treated like unknown ones.
pub async fn resolve_session<C: ConnectionTrait>(
    db: &C,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Option<(session::Model, user::Model)>> {
    let found = session::Entity::find_by_id(token.to_string())
        .find_also_related(user::Entity)
        .one(db)
        .await?;

    match found {
        Some((record, _)) if record.is_expired(now) => {
            debug!("Session of user ID {} expired", record.user_id);
            session::Entity::delete_by_id(record.token).exec(db).await?;
            Ok(None)
        }
        Some((record, Some(account))) => Ok(Some((record, account))),
        Some((record, None)) => {
            warn!("Session points at missing user ID: {}", record.user_id);
            session::Entity::delete_by_id(record.token).exec(db).await?;
            Ok(None)
        }
        None => Ok(None),
    }
}

/// Ends a session. Unknown tokens are ignored.
pub async fn delete_session<C: ConnectionTrait>(db: &C, token: &str) -> Result<()> {
    let res = session::Entity::delete_by_id(token.to_string())
        .exec(db)
        .await?;
    debug!("Deleted {} session rows", res.rows_affected);
    Ok(())
}

/// Drops every session past its expiry. Returns how many were removed.
pub async fn purge_expired<C: ConnectionTrait>(db: &C, now: DateTime<Utc>) -> Result<u64> {
    let res = session::Entity::delete_many()
        .filter(session::Column::ExpiresAt.lte(now))
        .exec(db)
        .await?;
    if res.rows_affected > 0 {
        info!("Purged {} expired sessions", res.rows_affected);
    }
    Ok(res.rows_affected)
}
