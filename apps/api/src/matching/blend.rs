//! Similarity Blender — folds semantic text similarity into a base match
//! score.
//!
//! Runs only when full resume text is available; a bare skill-list match
//! never reaches this stage.

/// Blends a 0–100 base score with a 0–100 similarity score (70/30), rounded
/// and clamped to [0, 100].
pub fn blend_scores(base: u32, similarity: u32) -> u32 {
    let blended = base as f64 * 0.7 + similarity as f64 * 0.3;
    (blended.round() as i64).clamp(0, 100) as u32
}
