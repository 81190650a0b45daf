use shared::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
};
use sqlx::{postgres::PgConnectOptions, PgPool};

pub mod model;

fn make_pg_connect_options(cfg: &DatabaseConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&cfg.host)
        .port(cfg.port)
        .username(&cfg.username)
        .password(&cfg.password)
        .database(&cfg.database)
}

#[derive(Clone)]
pub struct ConnectionPool(PgPool);

impl ConnectionPool {
    pub fn new(pool: PgPool) -> Self {
        Self(pool)
    }

    pub fn inner_ref(&self) -> &PgPool {
        &self.0
    }

    pub async fn begin(&self) -> AppResult<sqlx::Transaction<'_, sqlx::Postgres>> {
        self.0.begin().await.map_err(AppError::TransactionError)
    }
}

pub fn connect_database_with(cfg: &DatabaseConfig) -> ConnectionPool {
    ConnectionPool(PgPool::connect_lazy_with(make_pg_connect_options(cfg)))
}

/// Creates the reservations table and its lookup indexes if they are
/// missing. Ran once at startup; statements are idempotent.
pub async fn init_schema(pool: &ConnectionPool) -> AppResult<()> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS reservations (
            reservation_id UUID PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            age INT NOT NULL,
            gender TEXT NOT NULL,
            phone TEXT NOT NULL,
            location TEXT NOT NULL,
            primary_date DATE,
            primary_slot TIME,
            primary_cabin INT,
            secondary_date DATE,
            secondary_slot TIME,
            created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
        r#"
        CREATE INDEX IF NOT EXISTS idx_reservations_primary
        ON reservations (location, primary_date, primary_cabin, primary_slot)
        "#,
        r#"
        CREATE INDEX IF NOT EXISTS idx_reservations_secondary
        ON reservations (location, secondary_date, secondary_slot)
        "#,
    ];
    for statement in statements {
        sqlx::query(statement)
            .execute(pool.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;
    }
    Ok(())
}
