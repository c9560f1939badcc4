use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Bootstraps the single `jobs` collection. The store is one queryable table
/// keyed by `(source, source_id)`, so startup DDL replaces a migrations tree.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS jobs (
            id          UUID PRIMARY KEY,
            title       TEXT NOT NULL DEFAULT '',
            company     TEXT NOT NULL DEFAULT '',
            location    TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            url         TEXT NOT NULL DEFAULT '',
            source      TEXT NOT NULL,
            source_id   TEXT NOT NULL,
            skills      JSONB NOT NULL DEFAULT '[]',
            posted_at   TIMESTAMPTZ,
            scraped_at  TIMESTAMPTZ NOT NULL,
            UNIQUE (source, source_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_jobs_scraped_at ON jobs (scraped_at)")
        .execute(pool)
        .await?;

    info!("Job store schema ready");
    Ok(())
}
