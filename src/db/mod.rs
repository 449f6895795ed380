use sqlx::{Executor, PgPool, Row};
use tracing::{error, info};

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Initialize the database schema
pub async fn init_db(pool: &PgPool) -> Result<(), sqlx::Error> {
    info!("Initializing database schema...");

    // Plain-text execution so the multi-statement script runs in one round trip
    match pool.execute(SCHEMA_SQL).await {
        Ok(_) => {
            info!("Database schema initialized successfully");
            Ok(())
        }
        Err(e) => {
            error!("Failed to initialize database schema: {}", e);
            Err(e)
        }
    }
}

/// Check if the user table exists
pub async fn check_db_initialized(pool: &PgPool) -> bool {
    let result = sqlx::query(
        "SELECT EXISTS (SELECT FROM information_schema.tables WHERE table_schema = 'travelgram' AND table_name = 'image_blobs')",
    )
    .fetch_one(pool)
    .await;

    match result {
        Ok(row) => row.try_get::<bool, _>(0).unwrap_or(false),
        Err(_) => false,
    }
}

/// Round-trip query used by the health endpoint
pub async fn ping(pool: &PgPool) -> bool {
    sqlx::query("SELECT 1").fetch_one(pool).await.is_ok()
}

/// True when an insert referenced a row that does not exist
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_foreign_key_violation(),
        _ => false,
    }
}
