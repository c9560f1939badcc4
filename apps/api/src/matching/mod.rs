//! Job-matching core: normalization, scoring, blending, ranking, and the
//! end-to-end engine behind the matching API.

pub mod blend;
pub mod engine;
pub mod handlers;
pub mod ranker;
pub mod scoring;
pub mod skills;
