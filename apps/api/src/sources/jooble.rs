//! Jooble adapter — keyed POST API. Disabled (returns no records) when no
//! API key is configured.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::sources::{parse_posted_at, synthesize_source_id, JobSource, SourceError};
use crate::store::JobRecord;

const SOURCE_NAME: &str = "jooble";
const API_URL: &str = "https://jooble.org/api/jobs";

#[derive(Debug, Serialize)]
struct JoobleQuery<'a> {
    keywords: &'a str,
    location: &'a str,
    page: u32,
}

#[derive(Debug, Deserialize)]
struct JoobleResponse {
    #[serde(default)]
    jobs: Vec<JoobleJob>,
}

#[derive(Debug, Deserialize)]
struct JoobleJob {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    title: String,
    #[serde(default)]
    company: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    updated: String,
}

pub struct JoobleSource {
    client: Client,
    api_key: String,
}

impl JoobleSource {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }

    fn map_job(&self, job: JoobleJob) -> JobRecord {
        let source_id = match &job.id {
            Value::String(s) if !s.is_empty() => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => synthesize_source_id(SOURCE_NAME),
        };
        JobRecord {
            id: Uuid::new_v4(),
            title: job.title,
            company: job.company,
            location: job.location,
            description: job.snippet,
            url: job.link,
            source: SOURCE_NAME.to_string(),
            source_id,
            // Jooble carries no skill tags; the aggregator derives skills
            // from the snippet
            skills: Default::default(),
            posted_at: parse_posted_at(&job.updated),
            scraped_at: Utc::now(),
        }
    }
}

#[async_trait]
impl JobSource for JoobleSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<JobRecord>, SourceError> {
        if self.api_key.is_empty() {
            tracing::debug!("Jooble API key not configured, source disabled");
            return Ok(Vec::new());
        }

        let response = self
            .client
            .post(API_URL)
            .header("apiKey", &self.api_key)
            .json(&JoobleQuery {
                keywords: query,
                location: "",
                page: 1,
            })
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let payload: JoobleResponse = response.json().await?;
        Ok(payload
            .jobs
            .into_iter()
            .take(limit)
            .map(|j| self.map_job(j))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> JoobleSource {
        JoobleSource::new(Client::new(), "key".to_string())
    }

    #[tokio::test]
    async fn test_missing_api_key_disables_source() {
        let disabled = JoobleSource::new(Client::new(), String::new());
        let records = disabled.fetch("rust", 10).await.unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_map_job_fields() {
        let job: JoobleJob = serde_json::from_value(serde_json::json!({
            "id": "j-77",
            "title": "Data Engineer",
            "company": "Globex",
            "location": "Berlin",
            "snippet": "Pipelines in Python",
            "link": "https://jooble.org/jobs/j-77",
            "updated": "2026-08-10T09:30:00.000Z"
        }))
        .unwrap();
        let record = source().map_job(job);
        assert_eq!(record.source, "jooble");
        assert_eq!(record.source_id, "j-77");
        assert_eq!(record.description, "Pipelines in Python");
        assert!(record.skills.is_empty());
        assert!(record.posted_at.is_some());
    }

    #[test]
    fn test_map_job_synthesizes_missing_id() {
        let job: JoobleJob =
            serde_json::from_value(serde_json::json!({"title": "Dev"})).unwrap();
        let record = source().map_job(job);
        assert!(record.source_id.starts_with("jooble-"));
    }
}
