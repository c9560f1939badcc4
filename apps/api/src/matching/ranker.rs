//! Ranker/Formatter — orders scored jobs and projects them into the output
//! shape.
//!
//! Sorting is stable: jobs with equal scores keep their input order.
//! Deduplication keys on `(source, source_id)` and keeps the first (highest
//! ranked) occurrence.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::store::JobRecord;

/// A job record paired with its computed match data. Kept un-projected until
/// the very end so later stages (blending, location filters) still see the
/// full record.
#[derive(Debug, Clone)]
pub struct ScoredJob {
    pub record: JobRecord,
    pub matching_skills: Vec<String>,
    pub match_score: u32,
}

/// Wire shape of one match result.
#[derive(Debug, Clone, Serialize)]
pub struct JobMatch {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub skills: Vec<String>,
    pub url: String,
    pub matching_skills: Vec<String>,
    pub match_score: u32,
    pub source: String,
    /// RFC 3339, or null when the posting date is unknown.
    pub posted_at: Option<DateTime<Utc>>,
}

/// Sorts descending by score (stable), drops duplicate `(source, source_id)`
/// pairs keeping the first occurrence, and truncates to `limit`.
pub fn rank(mut scored: Vec<ScoredJob>, limit: usize) -> Vec<ScoredJob> {
    scored.sort_by(|a, b| b.match_score.cmp(&a.match_score));

    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut ranked: Vec<ScoredJob> = Vec::with_capacity(scored.len().min(limit));
    for job in scored {
        if ranked.len() >= limit {
            break;
        }
        let key = (job.record.source.clone(), job.record.source_id.clone());
        if !seen.insert(key) {
            continue;
        }
        ranked.push(job);
    }
    ranked
}

/// Projects ranked jobs into the response shape.
pub fn project(ranked: Vec<ScoredJob>) -> Vec<JobMatch> {
    ranked
        .into_iter()
        .map(|job| JobMatch {
            id: job.record.id,
            title: job.record.title,
            company: job.record.company,
            location: job.record.location,
            description: job.record.description,
            skills: job.record.skills.into_iter().collect(),
            url: job.record.url,
            matching_skills: job.matching_skills,
            match_score: job.match_score,
            source: job.record.source,
            posted_at: job.record.posted_at,
        })
        .collect()
}
