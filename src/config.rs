use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, ConfigError, Environment};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde::Deserialize;
use tracing::{debug, info, trace};

use crate::schemas::AppState;

pub const DATABASE_FILE: &str = "campus.db";

/// Settings read from the process environment (and `.env`).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Directory holding the SQLite file
    pub data_dir: PathBuf,
    /// Overrides the database location derived from `data_dir`
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub session_ttl_hours: i64,
}

impl AppConfig {
    /// Load configuration from defaults with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let settings = Config::builder()
            .set_default("data_dir", "./data")?
            .set_default("host", "0.0.0.0")?
            .set_default("port", 5000)?
            .set_default("session_ttl_hours", 168)?
            .add_source(Environment::default().try_parsing(true))
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Message("PORT must be greater than 0".to_string()));
        }
        if self.session_ttl_hours <= 0 {
            return Err(ConfigError::Message(
                "SESSION_TTL_HOURS must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn database_url(&self) -> String {
        match &self.database_url {
            Some(url) => url.clone(),
            None => format!(
                "sqlite://{}?mode=rwc",
                self.data_dir.join(DATABASE_FILE).display()
            ),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours)
    }
}

/// Connects and applies pending migrations. The data directory is created
/// when the database lives in it.
pub async fn connect_and_migrate(database_url: &str) -> Result<DatabaseConnection> {
    trace!("Entering connect_and_migrate");
    if let Some(path) = sqlite_path(database_url) {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {}", parent.display()))?;
            debug!("Data directory ready: {}", parent.display());
        }
    }

    info!("Connecting to database: {}", database_url);
    let mut options = ConnectOptions::new(database_url.to_string());
    options.sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .with_context(|| format!("Failed to connect to database '{}'", database_url))?;

    Migrator::up(&db, None)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations applied");
    Ok(db)
}

/// Initialize application state for the given configuration
pub async fn initialize_app_state(config: &AppConfig) -> Result<AppState> {
    let db = connect_and_migrate(&config.database_url()).await?;
    Ok(AppState {
        db,
        session_ttl: config.session_ttl(),
    })
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" {
        None
    } else {
        Some(PathBuf::from(path))
    }
}
