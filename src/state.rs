use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::clock_in::{ClockInRepository, MemoryClockIns, PgClockIns};
use crate::config::{AppConfig, StoreBackend};
use crate::items::{ItemRepository, MemoryItems, PgItems};

/// Collection handles shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub items: Arc<dyn ItemRepository>,
    pub clock_ins: Arc<dyn ClockInRepository>,
    /// Present only for the postgres backend; used for migrations.
    pub db: Option<PgPool>,
}

impl AppState {
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        match (config.backend, &config.database) {
            (StoreBackend::Postgres, Some(db_cfg)) => {
                let db = PgPoolOptions::new()
                    .max_connections(db_cfg.max_connections)
                    .connect(&db_cfg.url)
                    .await
                    .context("connect to database")?;
                info!(max_connections = db_cfg.max_connections, "connected to postgres");
                Ok(Self::from_pool(db))
            }
            (StoreBackend::Postgres, None) => anyhow::bail!("postgres backend needs DATABASE_URL"),
            (StoreBackend::Memory, _) => {
                info!("using in-memory collections; data is lost on exit");
                Ok(Self::in_memory())
            }
        }
    }

    pub fn from_pool(db: PgPool) -> Self {
        Self {
            items: Arc::new(PgItems::new(db.clone())),
            clock_ins: Arc::new(PgClockIns::new(db.clone())),
            db: Some(db),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            items: Arc::new(MemoryItems::default()),
            clock_ins: Arc::new(MemoryClockIns::default()),
            db: None,
        }
    }
}
