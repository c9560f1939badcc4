//! Job Store Gateway — the queryable collection of job records.
//!
//! `JobStore` is the seam between the matching core and persistence: the
//! engine only sees the trait. Reads degrade to an empty list on store
//! failure so the caller can fall back to a live fetch; an empty result is
//! never proof that no jobs exist.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::warn;
use uuid::Uuid;

/// Days of lookback for the store's freshness window: records scraped
/// earlier than this are invisible to reads (staleness is handled by
/// filtering, never by deletion).
pub const FRESHNESS_WINDOW_DAYS: i64 = 30;

/// A stored job posting. `(source, source_id)` is the natural dedup key:
/// re-ingesting the same pair replaces the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub url: String,
    pub source: String,
    pub source_id: String,
    /// Normalized skill set (lowercase, deduplicated) — validated at
    /// ingestion so consumers never re-check shape.
    pub skills: BTreeSet<String>,
    /// Original publication time; `None` means unknown.
    pub posted_at: Option<DateTime<Utc>>,
    pub scraped_at: DateTime<Utc>,
}

impl JobRecord {
    /// True when the dedup key is defined. Records failing this are skipped
    /// at upsert time.
    pub fn has_dedup_key(&self) -> bool {
        !self.source.is_empty() && !self.source_id.is_empty()
    }
}

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Returns jobs scraped within the freshness window, intersected with
    /// "has at least one skill in `skills`" when the set is non-empty,
    /// ordered by `posted_at` descending (unknown dates last), truncated to
    /// `limit`. Store failures are logged and degrade to an empty list.
    async fn fetch(&self, skills: &BTreeSet<String>, limit: i64) -> Vec<JobRecord>;

    /// Insert-or-replace each record keyed on `(source, source_id)`.
    /// Records without a dedup key are skipped with a warning. Returns the
    /// number of records written.
    async fn upsert(&self, jobs: &[JobRecord]) -> anyhow::Result<usize>;
}

/// Postgres-backed store over the `jobs` table.
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn fetch(&self, skills: &BTreeSet<String>, limit: i64) -> Vec<JobRecord> {
        let cutoff = Utc::now() - Duration::days(FRESHNESS_WINDOW_DAYS);
        let skill_filter: Vec<String> = skills.iter().cloned().collect();

        let result = sqlx::query(
            r#"
            SELECT id, title, company, location, description, url,
                   source, source_id, skills, posted_at, scraped_at
            FROM jobs
            WHERE scraped_at >= $1
              AND ($2 OR skills ?| $3)
            ORDER BY posted_at DESC NULLS LAST
            LIMIT $4
            "#,
        )
        .bind(cutoff)
        .bind(skill_filter.is_empty())
        .bind(&skill_filter)
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await;

        let rows = match result {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Job store fetch failed, degrading to empty result: {e}");
                return Vec::new();
            }
        };

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            match row_to_record(&row) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping malformed job row: {e}"),
            }
        }
        records
    }

    async fn upsert(&self, jobs: &[JobRecord]) -> anyhow::Result<usize> {
        let mut written = 0;
        for job in jobs {
            if !job.has_dedup_key() {
                warn!(
                    title = %job.title,
                    "Skipping job without (source, source_id) dedup key"
                );
                continue;
            }
            sqlx::query(
                r#"
                INSERT INTO jobs (id, title, company, location, description, url,
                                  source, source_id, skills, posted_at, scraped_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                ON CONFLICT (source, source_id) DO UPDATE SET
                    title = EXCLUDED.title,
                    company = EXCLUDED.company,
                    location = EXCLUDED.location,
                    description = EXCLUDED.description,
                    url = EXCLUDED.url,
                    skills = EXCLUDED.skills,
                    posted_at = EXCLUDED.posted_at,
                    scraped_at = EXCLUDED.scraped_at
                "#,
            )
            .bind(job.id)
            .bind(&job.title)
            .bind(&job.company)
            .bind(&job.location)
            .bind(&job.description)
            .bind(&job.url)
            .bind(&job.source)
            .bind(&job.source_id)
            .bind(Json(&job.skills))
            .bind(job.posted_at)
            .bind(job.scraped_at)
            .execute(&self.pool)
            .await?;
            written += 1;
        }
        Ok(written)
    }
}

fn row_to_record(row: &sqlx::postgres::PgRow) -> Result<JobRecord, sqlx::Error> {
    let skills: Json<BTreeSet<String>> = row.try_get("skills")?;
    Ok(JobRecord {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        company: row.try_get("company")?,
        location: row.try_get("location")?,
        description: row.try_get("description")?,
        url: row.try_get("url")?,
        source: row.try_get("source")?,
        source_id: row.try_get("source_id")?,
        skills: skills.0,
        posted_at: row.try_get("posted_at")?,
        scraped_at: row.try_get("scraped_at")?,
    })
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory `JobStore` mirroring the gateway's query semantics, used by
    //! engine and store tests.

    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryStore {
        jobs: Mutex<Vec<JobRecord>>,
    }

    impl MemoryStore {
        pub fn with_jobs(jobs: Vec<JobRecord>) -> Self {
            Self {
                jobs: Mutex::new(jobs),
            }
        }

        pub fn len(&self) -> usize {
            self.jobs.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl JobStore for MemoryStore {
        async fn fetch(&self, skills: &BTreeSet<String>, limit: i64) -> Vec<JobRecord> {
            let cutoff = Utc::now() - Duration::days(FRESHNESS_WINDOW_DAYS);
            let mut matched: Vec<JobRecord> = self
                .jobs
                .lock()
                .unwrap()
                .iter()
                .filter(|j| j.scraped_at >= cutoff)
                .filter(|j| skills.is_empty() || !j.skills.is_disjoint(skills))
                .cloned()
                .collect();
            // posted_at DESC, unknown dates last
            matched.sort_by(|a, b| match (a.posted_at, b.posted_at) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            });
            matched.truncate(limit.max(0) as usize);
            matched
        }

        async fn upsert(&self, jobs: &[JobRecord]) -> anyhow::Result<usize> {
            let mut stored = self.jobs.lock().unwrap();
            let mut written = 0;
            for job in jobs {
                if !job.has_dedup_key() {
                    continue;
                }
                match stored
                    .iter_mut()
                    .find(|j| j.source == job.source && j.source_id == job.source_id)
                {
                    Some(existing) => *existing = job.clone(),
                    None => stored.push(job.clone()),
                }
                written += 1;
            }
            Ok(written)
        }
    }
}
