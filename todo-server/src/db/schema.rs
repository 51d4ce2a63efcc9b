//! Table creation for the todo store
//!
//! Idempotent: safe to run on every startup. There is no migration history;
//! column changes need manual intervention.

use sqlx::PgPool;

use super::repos::DbError;

/// Create the `todos` table and its listing index if they don't exist.
pub async fn init(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Ensuring todo schema...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS todos (
            id UUID PRIMARY KEY,
            title VARCHAR(200) NOT NULL CHECK (char_length(title) >= 1),
            description VARCHAR(1000),
            completed BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CHECK (updated_at >= created_at)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Matches the list ordering so paging is an index scan
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_todos_created_at
        ON todos (created_at DESC, id DESC)
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Todo schema ready");
    Ok(())
}
