use super::types::{EmailCapture, NewRoast, RoastRecord};
use super::{RoastStore, StoreFuture};
use crate::error::RoastError;
use crate::roast::{FullCritique, Grade};
use anyhow::Context;
use chrono::Utc;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use uuid::Uuid;

/// SQLite-backed roast store using an sqlx async pool.
pub struct SqliteRoastStore {
    pool: SqlitePool,
}

fn db_error(error: impl std::fmt::Display) -> RoastError {
    RoastError::storage(format!("database error: {error:#}"))
}

impl SqliteRoastStore {
    /// Open `url` and run migrations. In-memory URLs get a single pinned
    /// connection so every query sees the same database.
    pub async fn connect(url: &str) -> Result<Self, RoastError> {
        let options = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = options
            .connect(url)
            .await
            .with_context(|| format!("open roast database {url}"))
            .map_err(db_error)?;
        Self::new(pool).await
    }

    /// Create a store with an existing pool and run migrations.
    pub async fn new(pool: SqlitePool) -> Result<Self, RoastError> {
        Self::migrate(&pool).await.map_err(db_error)?;
        Ok(Self { pool })
    }

    async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
        sqlx::query("PRAGMA foreign_keys = ON;")
            .execute(pool)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS roasts (
                 id TEXT PRIMARY KEY,
                 url TEXT,
                 screenshot_url TEXT NOT NULL,
                 grade TEXT NOT NULL,
                 partial_roast TEXT NOT NULL,
                 full_roast TEXT NOT NULL,
                 is_email_captured INTEGER NOT NULL DEFAULT 0,
                 created_at TEXT NOT NULL
             )",
        )
        .execute(pool)
        .await
        .context("create roasts table")?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS email_captures (
                 id TEXT PRIMARY KEY,
                 email TEXT NOT NULL,
                 roast_id TEXT NOT NULL REFERENCES roasts(id),
                 has_received_full_audit INTEGER NOT NULL DEFAULT 0,
                 created_at TEXT NOT NULL
             )",
        )
        .execute(pool)
        .await
        .context("create email_captures table")?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_email_captures_roast
                 ON email_captures(roast_id)",
        )
        .execute(pool)
        .await
        .context("create email_captures index")?;

        Ok(())
    }

    /// Access the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn create_impl(&self, roast: NewRoast) -> Result<RoastRecord, RoastError> {
        let record = RoastRecord {
            id: Uuid::new_v4().to_string(),
            source_url: roast.source_url,
            image_url: roast.image_url,
            grade: roast.analysis.grade,
            teaser_critique: roast.analysis.partial_roast,
            full_critique: roast.analysis.full_roast,
            email_captured: false,
            created_at: Utc::now().to_rfc3339(),
        };
        let full_json = serde_json::to_string(&record.full_critique)
            .context("serialize full critique")
            .map_err(db_error)?;

        sqlx::query(
            "INSERT INTO roasts
                 (id, url, screenshot_url, grade, partial_roast, full_roast, is_email_captured, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, 0, $7)",
        )
        .bind(&record.id)
        .bind(record.source_url.as_deref())
        .bind(&record.image_url)
        .bind(record.grade.as_str())
        .bind(&record.teaser_critique)
        .bind(full_json)
        .bind(&record.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        tracing::info!(roast_id = %record.id, grade = %record.grade, "roast stored");
        Ok(record)
    }

    async fn get_impl(&self, id: &str) -> Result<RoastRecord, RoastError> {
        let row = sqlx::query(
            "SELECT id, url, screenshot_url, grade, partial_roast, full_roast,
                    is_email_captured, created_at
             FROM roasts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?
        .ok_or_else(|| RoastError::not_found("Roast not found"))?;

        map_roast_row(&row).map_err(db_error)
    }

    async fn mark_email_captured_impl(&self, id: &str) -> Result<(), RoastError> {
        let result = sqlx::query("UPDATE roasts SET is_email_captured = 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        if result.rows_affected() == 0 {
            return Err(RoastError::not_found("Roast not found"));
        }
        Ok(())
    }

    async fn create_email_capture_impl(
        &self,
        roast_id: &str,
        email: &str,
    ) -> Result<EmailCapture, RoastError> {
        let capture = EmailCapture {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            roast_id: roast_id.to_string(),
            has_received_full_audit: true,
            created_at: Utc::now().to_rfc3339(),
        };

        sqlx::query(
            "INSERT INTO email_captures (id, email, roast_id, has_received_full_audit, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&capture.id)
        .bind(&capture.email)
        .bind(&capture.roast_id)
        .bind(capture.has_received_full_audit)
        .bind(&capture.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(capture)
    }

    async fn count_impl(&self) -> Result<u64, RoastError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM roasts")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}

fn map_roast_row(row: &SqliteRow) -> anyhow::Result<RoastRecord> {
    let grade_raw: String = row.try_get("grade")?;
    let full_raw: String = row.try_get("full_roast")?;
    let full_critique: FullCritique =
        serde_json::from_str(&full_raw).context("deserialize stored full critique")?;
    let grade = grade_raw
        .parse::<Grade>()
        .map_err(|_| anyhow::anyhow!("unknown stored grade: {grade_raw}"))?;

    Ok(RoastRecord {
        id: row.try_get("id")?,
        source_url: row.try_get("url")?,
        image_url: row.try_get("screenshot_url")?,
        grade,
        teaser_critique: row.try_get("partial_roast")?,
        full_critique,
        email_captured: row.try_get::<bool, _>("is_email_captured")?,
        created_at: row.try_get("created_at")?,
    })
}

impl RoastStore for SqliteRoastStore {
    fn create<'a>(&'a self, roast: NewRoast) -> StoreFuture<'a, RoastRecord> {
        Box::pin(self.create_impl(roast))
    }

    fn get<'a>(&'a self, id: &'a str) -> StoreFuture<'a, RoastRecord> {
        Box::pin(self.get_impl(id))
    }

    fn mark_email_captured<'a>(&'a self, id: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(self.mark_email_captured_impl(id))
    }

    fn create_email_capture<'a>(
        &'a self,
        roast_id: &'a str,
        email: &'a str,
    ) -> StoreFuture<'a, EmailCapture> {
        Box::pin(self.create_email_capture_impl(roast_id, email))
    }

    fn count<'a>(&'a self) -> StoreFuture<'a, u64> {
        Box::pin(self.count_impl())
    }
}
