//! Axum route handlers for the matching API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extraction::ExtractedSkills;
use crate::matching::engine::DEFAULT_MATCH_LIMIT;
use crate::matching::ranker::JobMatch;
use crate::matching::skills::normalize_skills;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchJobsRequest {
    pub skills: Vec<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct MatchJobsResponse {
    pub matches: Vec<JobMatch>,
}

#[derive(Debug, Deserialize)]
pub struct SimilarityRequest {
    pub resume_text: String,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct SimilarityResponse {
    pub similarity_score: u32,
}

#[derive(Debug, Deserialize)]
pub struct ExtractSkillsRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractSkillsResponse {
    pub skills: ExtractedSkills,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationsRequest {
    pub resume_text: Option<String>,
    pub skills: Option<Vec<String>>,
    pub location: Option<String>,
    pub limit: Option<usize>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/match-jobs
///
/// Ranks job postings against a skill list. Degrades to fewer (possibly
/// zero) matches when the store and all live sources come up empty.
pub async fn handle_match_jobs(
    State(state): State<AppState>,
    Json(request): Json<MatchJobsRequest>,
) -> Result<Json<MatchJobsResponse>, AppError> {
    let skills = normalize_skills(request.skills);
    if skills.is_empty() {
        return Err(AppError::Validation(
            "skills must contain at least one non-empty entry".to_string(),
        ));
    }
    let limit = request.limit.unwrap_or(DEFAULT_MATCH_LIMIT);

    let matches = state.engine.match_jobs(&skills, limit).await;
    Ok(Json(MatchJobsResponse { matches }))
}

/// POST /api/calculate-similarity
///
/// Semantic similarity between resume text and a job description, 0–100.
pub async fn handle_calculate_similarity(
    State(state): State<AppState>,
    Json(request): Json<SimilarityRequest>,
) -> Result<Json<SimilarityResponse>, AppError> {
    if request.resume_text.trim().is_empty() || request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Both resume_text and job_description are required".to_string(),
        ));
    }

    let similarity_score = state
        .similarity
        .similarity(&request.resume_text, &request.job_description);
    Ok(Json(SimilarityResponse { similarity_score }))
}

/// POST /api/extract-skills
///
/// Extracts known vocabulary skills from resume text.
pub async fn handle_extract_skills(
    State(state): State<AppState>,
    Json(request): Json<ExtractSkillsRequest>,
) -> Result<Json<ExtractSkillsResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    let skills = state.extractor.extract(&request.text);
    Ok(Json(ExtractSkillsResponse { skills }))
}

/// POST /api/recommendations
///
/// Full personalized flow: skills (given or derived from resume text),
/// optional similarity blending, optional location filter.
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Json(request): Json<RecommendationsRequest>,
) -> Result<Json<MatchJobsResponse>, AppError> {
    let resume_text = request
        .resume_text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let skills = normalize_skills(request.skills.unwrap_or_default());
    if resume_text.is_none() && skills.is_empty() {
        return Err(AppError::Validation(
            "Either resume_text or skills must be provided".to_string(),
        ));
    }
    let location = request
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty());
    let limit = request.limit.unwrap_or(DEFAULT_MATCH_LIMIT);

    let matches = state
        .engine
        .recommendations(resume_text, skills, location, limit)
        .await;
    Ok(Json(MatchJobsResponse { matches }))
}
