//! Scoring Engine — composite match score per job from skill overlap and
//! recency.
//!
//! `score_job` is a pure function of `(job.skills, job.posted_at, now,
//! query)`: `now` is passed in explicitly so scoring stays deterministic and
//! replayable. Tie-breaking on equal scores is left to the ranker.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Days of lookback after which a posting contributes zero recency.
pub const RECENCY_DECAY_DAYS: f64 = 30.0;

/// Neutral recency when the posting date is unknown.
const UNKNOWN_RECENCY: f64 = 0.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub skill: f64,
    pub recency: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skill: 0.7,
            recency: 0.3,
        }
    }
}

/// Intersection of query skills and job skills. Both sides are assumed
/// normalized (lowercase); returns a sorted list.
pub fn matching_skills(job_skills: &BTreeSet<String>, query: &BTreeSet<String>) -> Vec<String> {
    job_skills.intersection(query).cloned().collect()
}

/// Skill component in [0, 1]: mean of coverage (how much of the query the job
/// satisfies) and relevance (how much of the job the query satisfies).
/// A job with no skills scores 0 regardless of the query.
pub fn skill_score(job_skills: &BTreeSet<String>, query: &BTreeSet<String>) -> f64 {
    if job_skills.is_empty() {
        return 0.0;
    }
    let matching = job_skills.intersection(query).count() as f64;
    let coverage = if query.is_empty() {
        0.0
    } else {
        matching / query.len() as f64
    };
    let relevance = matching / job_skills.len() as f64;
    (coverage + relevance) / 2.0
}

/// Recency component in [0, 1]: linear decay over `RECENCY_DECAY_DAYS` whole
/// days, 0.5 when the posting date is unknown.
pub fn recency_score(posted_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let posted_at = match posted_at {
        Some(t) => t,
        None => return UNKNOWN_RECENCY,
    };
    let days_old = (now - posted_at).num_days().max(0) as f64;
    (1.0 - days_old / RECENCY_DECAY_DAYS).clamp(0.0, 1.0)
}

/// Composite 0–100 match score: weighted skill + recency, floored and
/// clamped.
pub fn score_job(
    job_skills: &BTreeSet<String>,
    posted_at: Option<DateTime<Utc>>,
    query: &BTreeSet<String>,
    now: DateTime<Utc>,
    weights: &ScoringWeights,
) -> u32 {
    let combined = weights.skill * skill_score(job_skills, query)
        + weights.recency * recency_score(posted_at, now);
    ((combined * 100.0).floor() as i64).clamp(0, 100) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::skills::normalize_skills;
    use chrono::Duration;

    fn set(items: &[&str]) -> BTreeSet<String> {
        normalize_skills(items.iter())
    }

    #[test]
    fn test_full_overlap_posted_now_scores_88() {
        // query {python, react}, job {python, react, sql}:
        // coverage 1.0, relevance 2/3, skill 0.8333; recency 1.0
        // combined 0.8833 -> floor -> 88
        let now = Utc::now();
        let score = score_job(
            &set(&["python", "react", "sql"]),
            Some(now),
            &set(&["python", "react"]),
            now,
            &ScoringWeights::default(),
        );
        assert_eq!(score, 88);
    }

    #[test]
    fn test_empty_job_skills_scores_zero_skill_component() {
        assert_eq!(skill_score(&set(&[]), &set(&["python"])), 0.0);
        // only recency contributes: 0.3 * 1.0 -> 30
        let now = Utc::now();
        let score = score_job(
            &set(&[]),
            Some(now),
            &set(&["python"]),
            now,
            &ScoringWeights::default(),
        );
        assert_eq!(score, 30);
    }

    #[test]
    fn test_empty_query_scores_zero_skill_component() {
        assert_eq!(skill_score(&set(&["python"]), &set(&[])), 0.0);
    }

    #[test]
    fn test_monotonic_in_skill_overlap() {
        let job = set(&["python", "react", "sql"]);
        let narrow = skill_score(&job, &set(&["python"]));
        let wide = skill_score(&job, &set(&["python", "react"]));
        assert!(wide >= narrow, "wide {wide} < narrow {narrow}");
    }

    #[test]
    fn test_recency_decays_linearly() {
        let now = Utc::now();
        let fresh = recency_score(Some(now), now);
        let mid = recency_score(Some(now - Duration::days(15)), now);
        let stale = recency_score(Some(now - Duration::days(45)), now);
        assert_eq!(fresh, 1.0);
        assert!((mid - 0.5).abs() < f64::EPSILON, "mid was {mid}");
        assert_eq!(stale, 0.0);
    }

    #[test]
    fn test_unknown_posting_date_is_neutral() {
        assert_eq!(recency_score(None, Utc::now()), 0.5);
    }

    #[test]
    fn test_future_posting_date_clamps_to_one() {
        let now = Utc::now();
        assert_eq!(recency_score(Some(now + Duration::days(3)), now), 1.0);
    }

    #[test]
    fn test_score_bounded_0_to_100() {
        let now = Utc::now();
        let score = score_job(
            &set(&["rust"]),
            Some(now),
            &set(&["rust"]),
            now,
            &ScoringWeights {
                skill: 2.0,
                recency: 2.0,
            },
        );
        assert_eq!(score, 100);
    }

    #[test]
    fn test_matching_skills_is_case_insensitive_intersection() {
        let matched = matching_skills(&set(&["Python", "SQL"]), &set(&["python", "react"]));
        assert_eq!(matched, vec!["python".to_string()]);
    }
}
