use std::sync::Arc;

use crate::extraction::SkillExtractor;
use crate::matching::engine::MatchEngine;
use crate::similarity::SemanticSimilarity;

/// Shared application state injected into all route handlers via Axum
/// extractors. Every collaborator is constructed once at startup and passed
/// in explicitly; nothing reads ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<MatchEngine>,
    pub extractor: Arc<SkillExtractor>,
    /// Pluggable similarity backend. Default: TokenCosineSimilarity.
    pub similarity: Arc<dyn SemanticSimilarity>,
}
