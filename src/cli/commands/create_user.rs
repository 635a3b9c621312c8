use anyhow::{Context, Result};
use common::Role;
use service::dto;
use service::users::{self, NewUser};
use tracing::{info, trace};

use crate::config::connect_and_migrate;

pub async fn create_user(database_url: &str, username: &str, password: &str, role: Role) -> Result<()> {
    trace!("Entering create_user command");
    let db = connect_and_migrate(database_url).await?;

    let new_user = NewUser {
        username: username.to_string(),
        password: password.to_string(),
        email: None,
        first_name: None,
        last_name: None,
        role: dto::role_from_dto(role),
    };
    let (account, _) = users::register(&db, new_user, None)
        .await
        .with_context(|| format!("Failed to create user '{}'", username))?;

    info!(
        "Created {} account '{}' with ID {}",
        role, account.username, account.id
    );
    Ok(())
}
