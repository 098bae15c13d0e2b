use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::{unexpanded_placeholder, ConfigurationError, DatabaseConfig};
use crate::error::Result;

pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Connect using the configured URL and pool size
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "database.url",
                "database configuration",
            )
            .into());
        }
        if let Some(variable) = unexpanded_placeholder(&config.url) {
            return Err(
                ConfigurationError::environment_variable_error(variable, "database.url is unset")
                    .into(),
            );
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;

        crate::log_database!(debug, "Connected to record store",
            max_connections: config.max_connections
        );

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}
