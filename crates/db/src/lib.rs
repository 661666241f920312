use config::DatabaseConfig;
use db_migration::Migrator;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;

pub mod entities;
pub mod models;
mod retry;

pub use sea_orm::{DatabaseConnection, DbErr};

pub type DbPool = DatabaseConnection;

#[derive(Clone)]
pub struct DBService {
    pub pool: DbPool,
}

impl DBService {
    /// Opens the pool described by `config` and applies pending migrations.
    pub async fn new(config: &DatabaseConfig) -> Result<DBService, DbErr> {
        let mut options = ConnectOptions::new(config.url().to_string());
        options
            .max_connections(config.max_connections)
            .connect_timeout(config.connect_timeout)
            .acquire_timeout(config.acquire_timeout)
            .sqlx_logging(false);
        // Each connection to an in-memory SQLite database sees its own empty database.
        if config.url().starts_with("sqlite::memory:") {
            options.max_connections(1);
        }

        tracing::info!(url = %config.redacted_url(), "Connecting to database");
        let pool = Database::connect(options).await?;
        Migrator::up(&pool, None).await?;
        Ok(DBService { pool })
    }

    pub fn from_connection(pool: DbPool) -> DBService {
        DBService { pool }
    }

    /// Round-trips to the store; used by the readiness probe.
    pub async fn check_connection(&self) -> Result<(), DbErr> {
        self.pool.ping().await
    }
}
