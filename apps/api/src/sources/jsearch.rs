//! JSearch (RapidAPI) adapter. Disabled when no API key is configured.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use uuid::Uuid;

use crate::sources::{parse_posted_at, synthesize_source_id, JobSource, SourceError};
use crate::store::JobRecord;

const SOURCE_NAME: &str = "jsearch";
const API_URL: &str = "https://jsearch.p.rapidapi.com/search";
const RAPIDAPI_HOST: &str = "jsearch.p.rapidapi.com";

#[derive(Debug, Deserialize)]
struct JSearchResponse {
    #[serde(default)]
    data: Vec<JSearchJob>,
}

#[derive(Debug, Deserialize)]
struct JSearchJob {
    #[serde(default)]
    job_id: String,
    #[serde(default)]
    job_title: String,
    #[serde(default)]
    employer_name: String,
    #[serde(default)]
    job_city: String,
    #[serde(default)]
    job_country: String,
    #[serde(default)]
    job_description: String,
    #[serde(default)]
    job_apply_link: String,
    #[serde(default)]
    job_posted_at_datetime_utc: String,
}

pub struct JSearchSource {
    client: Client,
    api_key: String,
}

impl JSearchSource {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }

    fn map_job(&self, job: JSearchJob) -> JobRecord {
        let source_id = if job.job_id.is_empty() {
            synthesize_source_id(SOURCE_NAME)
        } else {
            job.job_id
        };
        let location = match (job.job_city.as_str(), job.job_country.as_str()) {
            ("", "") => String::new(),
            ("", country) => country.to_string(),
            (city, "") => city.to_string(),
            (city, country) => format!("{city}, {country}"),
        };
        JobRecord {
            id: Uuid::new_v4(),
            title: job.job_title,
            company: job.employer_name,
            location,
            description: job.job_description,
            url: job.job_apply_link,
            source: SOURCE_NAME.to_string(),
            source_id,
            // skills derived from the description by the aggregator
            skills: Default::default(),
            posted_at: parse_posted_at(&job.job_posted_at_datetime_utc),
            scraped_at: Utc::now(),
        }
    }
}

#[async_trait]
impl JobSource for JSearchSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<JobRecord>, SourceError> {
        if self.api_key.is_empty() {
            tracing::debug!("JSearch API key not configured, source disabled");
            return Ok(Vec::new());
        }

        let response = self
            .client
            .get(API_URL)
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", RAPIDAPI_HOST)
            .query(&[("query", query), ("num_pages", "1"), ("page", "1")])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let payload: JSearchResponse = response.json().await?;
        Ok(payload
            .data
            .into_iter()
            .take(limit)
            .map(|j| self.map_job(j))
            .collect())
    }
}
