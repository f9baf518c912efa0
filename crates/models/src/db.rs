use std::time::Duration;

use configs::DatabaseConfig;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::info;

use crate::errors::ModelError;

/// Build a connection pool from explicit settings.
///
/// The pool is created lazily: an unreachable data store does not stop the
/// process, each query acquiring a connection reports the failure instead.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> Result<DatabaseConnection, ModelError> {
    cfg.validate().map_err(|e| ModelError::Config(e.to_string()))?;
    let opts = connect_options(cfg);
    let db = Database::connect(opts).await.map_err(|e| ModelError::Db(e.to_string()))?;
    info!(
        event = "db_pool_ready",
        backend = ?db.get_database_backend(),
        max_connections = cfg.max_connections,
        "database pool created"
    );
    Ok(db)
}

pub fn connect_options(cfg: &DatabaseConfig) -> ConnectOptions {
    let mut opts = ConnectOptions::new(cfg.url.clone());
    opts.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .sqlx_logging(cfg.sqlx_logging)
        .connect_lazy(true);
    opts
}

/// Round-trip to the data store; used by startup to warn early.
pub async fn ping(db: &DatabaseConnection) -> Result<(), ModelError> {
    db.ping().await.map_err(|e| ModelError::Db(e.to_string()))
}
