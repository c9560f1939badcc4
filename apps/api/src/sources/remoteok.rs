//! RemoteOK adapter — public JSON API, no key required.
//!
//! The API returns one array whose first element is a legal notice rather
//! than a posting; mapping is lenient (every field defaulted) and entries
//! that produce neither title nor company are dropped by the aggregator.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::matching::skills::normalize_skills;
use crate::sources::{parse_posted_at, synthesize_source_id, JobSource, SourceError};
use crate::store::JobRecord;

const SOURCE_NAME: &str = "remoteok";
const API_URL: &str = "https://remoteok.com/api";

#[derive(Debug, Deserialize)]
struct RemoteOkJob {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    slug: String,
    #[serde(default)]
    position: String,
    #[serde(default)]
    company: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    description: String,
    /// Epoch seconds in older payloads, RFC 3339 in newer ones.
    #[serde(default)]
    date: Value,
    #[serde(default)]
    tags: Vec<String>,
}

pub struct RemoteOkSource {
    client: Client,
}

impl RemoteOkSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn map_job(&self, job: RemoteOkJob) -> JobRecord {
        let source_id = match value_to_string(&job.id) {
            Some(id) => id,
            None => synthesize_source_id(SOURCE_NAME),
        };
        let location = if job.location.is_empty() {
            "Remote".to_string()
        } else {
            job.location
        };
        JobRecord {
            id: Uuid::new_v4(),
            title: job.position,
            company: job.company,
            location,
            description: job.description,
            url: format!("https://remoteok.com/remote-jobs/{}", job.slug),
            source: SOURCE_NAME.to_string(),
            source_id,
            skills: normalize_skills(job.tags),
            posted_at: value_to_string(&job.date).and_then(|raw| parse_posted_at(&raw)),
            scraped_at: Utc::now(),
        }
    }
}

#[async_trait]
impl JobSource for RemoteOkSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn fetch(&self, _query: &str, limit: usize) -> Result<Vec<JobRecord>, SourceError> {
        let response = self.client.get(API_URL).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let payload: Vec<Value> = response.json().await?;
        let records = payload
            .into_iter()
            // first element is API metadata, not a posting; lenient
            // deserialization drops anything else that isn't job-shaped
            .filter_map(|v| serde_json::from_value::<RemoteOkJob>(v).ok())
            .filter(|j| !j.position.is_empty() || !j.company.is_empty())
            .take(limit)
            .map(|j| self.map_job(j))
            .collect();
        Ok(records)
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> RemoteOkSource {
        RemoteOkSource::new(Client::new())
    }

    #[test]
    fn test_map_job_numeric_id_and_epoch_date() {
        let job: RemoteOkJob = serde_json::from_value(serde_json::json!({
            "id": 12345,
            "slug": "rust-engineer-acme",
            "position": "Rust Engineer",
            "company": "Acme",
            "description": "Write Rust",
            "date": 1785585600,
            "tags": ["Rust", "Backend"]
        }))
        .unwrap();
        let record = source().map_job(job);
        assert_eq!(record.source, "remoteok");
        assert_eq!(record.source_id, "12345");
        assert_eq!(record.url, "https://remoteok.com/remote-jobs/rust-engineer-acme");
        assert!(record.skills.contains("rust"));
        assert_eq!(record.posted_at.unwrap().timestamp(), 1785585600);
    }

    #[test]
    fn test_map_job_defaults_location_to_remote() {
        let job: RemoteOkJob =
            serde_json::from_value(serde_json::json!({"position": "Dev", "company": "X"})).unwrap();
        let record = source().map_job(job);
        assert_eq!(record.location, "Remote");
        assert!(record.posted_at.is_none());
    }

    #[test]
    fn test_map_job_synthesizes_missing_id() {
        let job: RemoteOkJob =
            serde_json::from_value(serde_json::json!({"position": "Dev", "company": "X"})).unwrap();
        let record = source().map_job(job);
        assert!(record.source_id.starts_with("remoteok-"));
    }

    #[test]
    fn test_metadata_row_deserializes_but_is_filtered() {
        // the first array element has none of the job fields
        let meta: RemoteOkJob = serde_json::from_value(serde_json::json!({
            "legal": "API terms of service"
        }))
        .unwrap();
        assert!(meta.position.is_empty() && meta.company.is_empty());
    }
}
