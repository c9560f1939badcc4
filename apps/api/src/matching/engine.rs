//! Match Engine — the end-to-end flow from a skill set to a ranked result
//! list.
//!
//! Flow: fetch store → (under-populated? live fetch → upsert → re-fetch) →
//! score → optional similarity blend → rank. Every external step degrades
//! rather than fails: an empty match list is a valid terminal state.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::extraction::SkillExtractor;
use crate::matching::blend::blend_scores;
use crate::matching::ranker::{self, JobMatch, ScoredJob};
use crate::matching::scoring::{matching_skills, score_job, ScoringWeights};
use crate::matching::skills::normalize_skills;
use crate::similarity::SemanticSimilarity;
use crate::sources::SourceAggregator;
use crate::store::{JobRecord, JobStore};

/// Below this many stored candidates the live aggregator is invoked. One
/// named constant: the legacy behavior scaled this threshold inconsistently
/// across entry points.
pub const SCRAPE_TRIGGER_THRESHOLD: usize = 20;

/// Candidate pool size read from the store before ranking.
pub const STORE_FETCH_LIMIT: i64 = 100;

/// Records requested from the live aggregator per replenishment.
pub const LIVE_FETCH_LIMIT: usize = 50;

pub const DEFAULT_MATCH_LIMIT: usize = 10;

pub struct MatchEngine {
    store: Arc<dyn JobStore>,
    aggregator: Arc<SourceAggregator>,
    similarity: Arc<dyn SemanticSimilarity>,
    extractor: Arc<SkillExtractor>,
    weights: ScoringWeights,
}

impl MatchEngine {
    pub fn new(
        store: Arc<dyn JobStore>,
        aggregator: Arc<SourceAggregator>,
        similarity: Arc<dyn SemanticSimilarity>,
        extractor: Arc<SkillExtractor>,
    ) -> Self {
        Self {
            store,
            aggregator,
            similarity,
            extractor,
            weights: ScoringWeights::default(),
        }
    }

    /// Ranks stored (and, when the store is under-populated, freshly
    /// fetched) jobs against a normalized skill set. Never touches resume
    /// free text.
    pub async fn match_jobs(&self, skills: &BTreeSet<String>, limit: usize) -> Vec<JobMatch> {
        let scored = self.score_candidates(skills).await;
        ranker::project(ranker::rank(scored, limit))
    }

    /// Personalized recommendations: derives skills from resume text when
    /// none are given, blends text similarity into the scores when resume
    /// text is present, and applies a best-effort location filter.
    pub async fn recommendations(
        &self,
        resume_text: Option<&str>,
        skills: BTreeSet<String>,
        location: Option<&str>,
        limit: usize,
    ) -> Vec<JobMatch> {
        let skills = if skills.is_empty() {
            match resume_text {
                Some(text) => normalize_skills(self.extractor.extract(text).all_skills),
                None => skills,
            }
        } else {
            skills
        };

        // over-fetch so blending and filtering have room to reorder
        let mut ranked = ranker::rank(self.score_candidates(&skills).await, limit * 2);

        if let Some(text) = resume_text {
            for job in &mut ranked {
                if job.record.description.is_empty() {
                    continue;
                }
                let similarity = self.similarity.similarity(text, &job.record.description);
                job.match_score = blend_scores(job.match_score, similarity);
            }
        }

        if let Some(location) = location {
            let needle = location.to_lowercase();
            let filtered: Vec<ScoredJob> = ranked
                .iter()
                .filter(|j| j.record.location.to_lowercase().contains(&needle))
                .cloned()
                .collect();
            // an over-strict location keeps the unfiltered list instead of
            // returning nothing
            if !filtered.is_empty() {
                ranked = filtered;
            }
        }

        ranker::project(ranker::rank(ranked, limit))
    }

    /// Gathers the candidate pool and scores every record. Replenishes from
    /// the live sources when the store comes back under-populated.
    async fn score_candidates(&self, skills: &BTreeSet<String>) -> Vec<ScoredJob> {
        let mut pool = self.store.fetch(skills, STORE_FETCH_LIMIT).await;

        if pool.len() < SCRAPE_TRIGGER_THRESHOLD {
            debug!(
                stored = pool.len(),
                threshold = SCRAPE_TRIGGER_THRESHOLD,
                "Store under-populated, invoking live sources"
            );
            let live = self.aggregator.fetch_live(skills, LIVE_FETCH_LIMIT).await;
            if !live.is_empty() {
                match self.store.upsert(&live).await {
                    Ok(written) => info!(written, "Upserted live records"),
                    Err(e) => warn!("Upsert of live records failed: {e}"),
                }
                let refreshed = self.store.fetch(skills, STORE_FETCH_LIMIT).await;
                // a store that cannot serve reads back still yields the live
                // records themselves
                pool = if refreshed.is_empty() { live } else { refreshed };
            }
        }

        let now = Utc::now();
        pool.into_iter()
            .map(|record| self.score_record(record, skills, now))
            .collect()
    }

    fn score_record(
        &self,
        record: JobRecord,
        skills: &BTreeSet<String>,
        now: chrono::DateTime<Utc>,
    ) -> ScoredJob {
        let match_score = score_job(&record.skills, record.posted_at, skills, now, &self.weights);
        ScoredJob {
            matching_skills: matching_skills(&record.skills, skills),
            match_score,
            record,
        }
    }
}
