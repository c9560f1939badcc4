//! Live Source Aggregator — concurrent fan-out over job sources with typed
//! per-source outcomes.
//!
//! One slow or failing board must never serialize or abort the aggregation:
//! fetches run on a `JoinSet` behind a fixed-size semaphore, each bounded by
//! its own timeout. A source that misses its deadline contributes zero
//! records. Dropping the returned future abandons in-flight workers.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::extraction::SkillExtractor;
use crate::matching::skills::normalize_skills;
use crate::sources::JobSource;
use crate::store::JobRecord;

/// Concurrency ceiling for per-source fetches.
const MAX_CONCURRENT_FETCHES: usize = 3;

/// Skills folded into the fetch query; more makes board queries too long.
const QUERY_SKILL_COUNT: usize = 3;

const FALLBACK_QUERY: &str = "software developer";

/// Result of one source's fetch attempt.
#[derive(Debug)]
pub enum SourceOutcome {
    Fetched {
        source: String,
        records: Vec<JobRecord>,
    },
    Failed {
        source: String,
        reason: String,
    },
}

pub struct SourceAggregator {
    sources: Vec<Arc<dyn JobSource>>,
    extractor: Arc<SkillExtractor>,
    per_source_timeout: Duration,
}

impl SourceAggregator {
    pub fn new(
        sources: Vec<Arc<dyn JobSource>>,
        extractor: Arc<SkillExtractor>,
        per_source_timeout: Duration,
    ) -> Self {
        Self {
            sources,
            extractor,
            per_source_timeout,
        }
    }

    /// Fetches fresh records from all sources concurrently and returns up to
    /// `limit` of them. Per-source failures and timeouts are logged and
    /// excluded; the call itself never fails.
    pub async fn fetch_live(&self, skills: &BTreeSet<String>, limit: usize) -> Vec<JobRecord> {
        let query = build_query(skills);
        debug!(query = %query, limit, "Starting live fetch");

        let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_FETCHES));
        let mut tasks: JoinSet<SourceOutcome> = JoinSet::new();

        for source in &self.sources {
            let source = Arc::clone(source);
            let semaphore = Arc::clone(&semaphore);
            let query = query.clone();
            let timeout = self.per_source_timeout;

            tasks.spawn(async move {
                let name = source.name().to_string();
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return SourceOutcome::Failed {
                            source: name,
                            reason: "aggregator shut down".to_string(),
                        }
                    }
                };
                match tokio::time::timeout(timeout, source.fetch(&query, limit)).await {
                    Ok(Ok(records)) => SourceOutcome::Fetched {
                        source: name,
                        records,
                    },
                    Ok(Err(e)) => SourceOutcome::Failed {
                        source: name,
                        reason: e.to_string(),
                    },
                    Err(_) => SourceOutcome::Failed {
                        source: name,
                        reason: format!("timed out after {timeout:?}"),
                    },
                }
            });
        }

        let mut gathered = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(SourceOutcome::Fetched { source, records }) => {
                    debug!(source = %source, count = records.len(), "Source returned records");
                    gathered.extend(records);
                }
                Ok(SourceOutcome::Failed { source, reason }) => {
                    warn!(source = %source, reason = %reason, "Live source failed");
                }
                Err(e) => warn!("Source task panicked: {e}"),
            }
        }

        let mut accepted = self.finalize(gathered);
        accepted.truncate(limit);
        accepted
    }

    /// Fan-in normalization: discard records missing both title and company,
    /// and derive skills from the description for records arriving without
    /// any.
    fn finalize(&self, records: Vec<JobRecord>) -> Vec<JobRecord> {
        records
            .into_iter()
            .filter(|r| !(r.title.is_empty() && r.company.is_empty()))
            .map(|mut r| {
                if r.skills.is_empty() && !r.description.is_empty() {
                    let extracted = self.extractor.extract(&r.description);
                    r.skills = normalize_skills(extracted.all_skills);
                }
                r
            })
            .collect()
    }
}

fn build_query(skills: &BTreeSet<String>) -> String {
    if skills.is_empty() {
        return FALLBACK_QUERY.to_string();
    }
    skills
        .iter()
        .take(QUERY_SKILL_COUNT)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ")
}
