//! External job-listing sources and the aggregator that fans out to them.
//!
//! Each adapter maps one upstream payload shape into `JobRecord`s, tagging
//! its `source` name and a best-effort `source_id`. Adapters are thin wire
//! glue; cross-cutting rules (skill derivation, discarding nameless records,
//! failure isolation) live in the aggregator fan-in.

pub mod aggregator;
pub mod jooble;
pub mod jsearch;
pub mod remoteok;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

use crate::store::JobRecord;

pub use aggregator::{SourceAggregator, SourceOutcome};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),
}

/// One external job board or API.
#[async_trait]
pub trait JobSource: Send + Sync {
    fn name(&self) -> &str;

    /// Fetches up to `limit` records for a free-text query. A source with no
    /// configured credentials returns `Ok(vec![])`.
    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<JobRecord>, SourceError>;
}

/// Synthesized `source_id` for upstreams that provide none. Combines the
/// source name with the current time so re-ingests of the same scrape batch
/// still collide on the dedup key only within the same millisecond.
pub fn synthesize_source_id(source: &str) -> String {
    format!("{source}-{}", Utc::now().timestamp_millis())
}

/// Parses upstream timestamps: RFC 3339 first, then the fraction-suffixed
/// naive form some boards emit, then bare unix seconds. `None` means the
/// posting date is unknown.
pub fn parse_posted_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(t.and_utc());
    }
    if let Ok(secs) = raw.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0);
    }
    None
}

#[cfg(test)]
pub(crate) mod testing {
    //! Stub sources for aggregator and engine tests.

    use super::*;
    use std::collections::BTreeSet;
    use uuid::Uuid;

    pub fn live_record(source: &str, source_id: &str, skills: &[&str]) -> JobRecord {
        JobRecord {
            id: Uuid::new_v4(),
            title: "Platform Engineer".to_string(),
            company: "Initech".to_string(),
            location: "Remote".to_string(),
            description: "Keep the lights on".to_string(),
            url: String::new(),
            source: source.to_string(),
            source_id: source_id.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            posted_at: Some(Utc::now()),
            scraped_at: Utc::now(),
        }
    }

    pub struct StubSource {
        pub source_name: String,
        pub records: Vec<JobRecord>,
    }

    #[async_trait]
    impl JobSource for StubSource {
        fn name(&self) -> &str {
            &self.source_name
        }

        async fn fetch(&self, _query: &str, _limit: usize) -> Result<Vec<JobRecord>, SourceError> {
            Ok(self.records.clone())
        }
    }

    pub struct FailingSource;

    #[async_trait]
    impl JobSource for FailingSource {
        fn name(&self) -> &str {
            "failing"
        }

        async fn fetch(&self, _query: &str, _limit: usize) -> Result<Vec<JobRecord>, SourceError> {
            Err(SourceError::Status(503))
        }
    }

    pub struct HangingSource;

    #[async_trait]
    impl JobSource for HangingSource {
        fn name(&self) -> &str {
            "hanging"
        }

        async fn fetch(&self, _query: &str, _limit: usize) -> Result<Vec<JobRecord>, SourceError> {
            tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
            Ok(Vec::new())
        }
    }

    pub fn skills(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339() {
        let t = parse_posted_at("2026-08-01T12:00:00+00:00").unwrap();
        assert_eq!(t.timestamp(), 1785585600);
    }

    #[test]
    fn test_parse_naive_with_fraction() {
        assert!(parse_posted_at("2026-08-01T12:00:00.000Z").is_some());
        assert!(parse_posted_at("2026-08-01T12:00:00.123456").is_some());
    }

    #[test]
    fn test_parse_unix_seconds() {
        let t = parse_posted_at("1785585600").unwrap();
        assert_eq!(t.timestamp(), 1785585600);
    }

    #[test]
    fn test_parse_garbage_is_unknown() {
        assert!(parse_posted_at("").is_none());
        assert!(parse_posted_at("yesterday").is_none());
    }

    #[test]
    fn test_synthesized_source_id_carries_source_name() {
        let id = synthesize_source_id("remoteok");
        assert!(id.starts_with("remoteok-"));
    }
}
