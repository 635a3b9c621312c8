use anyhow::Result;
use tracing::{error, info, trace};

use crate::config::connect_and_migrate;

pub async fn init_database(database_url: &str) -> Result<()> {
    trace!("Entering init_database function");
    info!("Initializing database");

    match connect_and_migrate(database_url).await {
        Ok(_) => {
            info!("Database initialization completed successfully!");
            Ok(())
        }
        Err(e) => {
            error!("Failed to initialize database: {:#}", e);
            Err(e)
        }
    }
}
