use anyhow::{bail, Result};
use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::AnyPool;
use tracing::info;

use crate::config::DatabaseConfig;

/// SQL flavour behind the pool. DDL differs between the two; DML does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    MySql,
    Sqlite,
}

impl Dialect {
    pub fn from_url(url: &str) -> Result<Self> {
        if url.starts_with("mysql:") || url.starts_with("mariadb:") {
            Ok(Dialect::MySql)
        } else if url.starts_with("sqlite:") {
            Ok(Dialect::Sqlite)
        } else {
            bail!("Unsupported database URL scheme (expected mysql: or sqlite:)")
        }
    }
}

/// Creates the shared connection pool. Closed by `main` on shutdown.
pub async fn create_pool(config: &DatabaseConfig) -> Result<AnyPool> {
    install_default_drivers();
    info!("Connecting to {:?} database...", config.dialect);

    let pool = AnyPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout)
        .connect(&config.url)
        .await?;

    info!("Database connection pool established");
    Ok(pool)
}

#[cfg(test)]
pub mod testing {
    use std::time::Duration;

    use sqlx::AnyPool;
    use tempfile::TempDir;

    use super::*;
    use crate::schema::ensure_schema;

    /// A migrated SQLite database in a temp dir. Keep the guard alive for the test's duration.
    pub struct TestDb {
        pub pool: AnyPool,
        pub config: DatabaseConfig,
        _dir: TempDir,
    }

    pub async fn empty_db() -> TestDb {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interview.db");
        let config = DatabaseConfig {
            url: format!("sqlite://{}?mode=rwc", path.display()),
            dialect: Dialect::Sqlite,
            max_connections: 4,
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(5),
            write_timeout: Duration::from_secs(5),
        };
        let pool = create_pool(&config).await.unwrap();
        TestDb {
            pool,
            config,
            _dir: dir,
        }
    }

    pub async fn migrated_db() -> TestDb {
        let db = empty_db().await;
        ensure_schema(&db.pool, db.config.dialect).await.unwrap();
        db
    }
}
