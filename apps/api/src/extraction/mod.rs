//! Skill Extraction — vocabulary-driven skill detection over plain text.
//!
//! The vocabulary is loaded once at startup and the extractor is carried in
//! `AppState` as an explicitly constructed service; nothing here reads
//! ambient global state.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Vocabulary file shape: `data/skills_vocabulary.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillVocabulary {
    #[serde(default)]
    pub technical_skills: Vec<String>,
    #[serde(default)]
    pub soft_skills: Vec<String>,
}

impl SkillVocabulary {
    /// Loads the vocabulary from a JSON file. A missing or malformed file
    /// degrades to an empty vocabulary with a warning; the service still
    /// runs (extraction simply finds nothing).
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<SkillVocabulary>(&raw) {
                Ok(vocab) => vocab,
                Err(e) => {
                    warn!("Invalid skills vocabulary at {}: {e}", path.display());
                    SkillVocabulary::default()
                }
            },
            Err(e) => {
                warn!("Skills vocabulary not found at {}: {e}", path.display());
                SkillVocabulary::default()
            }
        }
    }
}

/// Result of running extraction over a text. Matching downstream operates on
/// the flat `all_skills` set; the technical/soft split is reported as
/// explicit attributes for callers that distinguish categories.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedSkills {
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub all_skills: Vec<String>,
    pub experience_years: Option<u32>,
}

/// Detects known vocabulary terms in free text via word-boundary phrase
/// matching over preprocessed tokens.
pub struct SkillExtractor {
    technical: Vec<Vec<String>>,
    soft: Vec<Vec<String>>,
}

impl SkillExtractor {
    pub fn new(vocabulary: SkillVocabulary) -> Self {
        Self {
            technical: tokenize_terms(&vocabulary.technical_skills),
            soft: tokenize_terms(&vocabulary.soft_skills),
        }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.technical.len() + self.soft.len()
    }

    pub fn extract(&self, text: &str) -> ExtractedSkills {
        let tokens: Vec<String> = preprocess_text(text)
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let technical_skills = match_terms(&tokens, &self.technical);
        let soft_skills = match_terms(&tokens, &self.soft);

        let mut all_skills: Vec<String> = technical_skills
            .iter()
            .chain(soft_skills.iter())
            .cloned()
            .collect();
        all_skills.sort();
        all_skills.dedup();

        ExtractedSkills {
            technical_skills,
            soft_skills,
            all_skills,
            experience_years: extract_experience_years(&tokens),
        }
    }
}

/// Lowercases and replaces punctuation/symbols with spaces, collapsing runs
/// of whitespace.
pub fn preprocess_text(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn tokenize_terms(terms: &[String]) -> Vec<Vec<String>> {
    terms
        .iter()
        .map(|t| {
            preprocess_text(t)
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|t| !t.is_empty())
        .collect()
}

/// A term matches when its tokens appear as a contiguous window in the text
/// tokens. Single-word terms reduce to whole-word matching.
fn match_terms(tokens: &[String], terms: &[Vec<String>]) -> Vec<String> {
    let mut found: Vec<String> = terms
        .iter()
        .filter(|term| {
            !term.is_empty()
                && tokens
                    .windows(term.len())
                    .any(|window| window.iter().zip(term.iter()).all(|(a, b)| a == b))
        })
        .map(|term| term.join(" "))
        .collect();
    found.sort();
    found.dedup();
    found
}

/// Finds the highest `N years [of] experience` mention, if any. Tokens are
/// already lowercased with punctuation stripped, so `5+` arrives as `5`.
fn extract_experience_years(tokens: &[String]) -> Option<u32> {
    let mut best: Option<u32> = None;
    for (i, token) in tokens.iter().enumerate() {
        let years: u32 = match token.parse() {
            Ok(n) => n,
            Err(_) => continue,
        };
        let unit = match tokens.get(i + 1) {
            Some(t) => t.as_str(),
            None => continue,
        };
        if !matches!(unit, "year" | "years" | "yr" | "yrs") {
            continue;
        }
        let mentions_experience = match (tokens.get(i + 2), tokens.get(i + 3)) {
            (Some(next), _) if next == "experience" => true,
            (Some(of), Some(next)) if of == "of" && next == "experience" => true,
            _ => false,
        };
        if mentions_experience {
            best = Some(best.map_or(years, |b| b.max(years)));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> SkillExtractor {
        SkillExtractor::new(SkillVocabulary {
            technical_skills: vec![
                "python".to_string(),
                "react".to_string(),
                "machine learning".to_string(),
                "sql".to_string(),
            ],
            soft_skills: vec!["communication".to_string(), "team work".to_string()],
        })
    }

    #[test]
    fn test_extracts_single_word_skills() {
        let result = extractor().extract("Senior engineer fluent in Python and SQL.");
        assert_eq!(result.technical_skills, vec!["python", "sql"]);
    }

    #[test]
    fn test_extracts_multi_word_phrases() {
        let result = extractor().extract("Background in machine learning and team work.");
        assert!(result.technical_skills.contains(&"machine learning".to_string()));
        assert!(result.soft_skills.contains(&"team work".to_string()));
    }

    #[test]
    fn test_no_substring_false_positives() {
        // "reactive" must not match the skill "react"
        let result = extractor().extract("Built reactive pipelines");
        assert!(result.all_skills.is_empty());
    }

    #[test]
    fn test_all_skills_is_deduped_union() {
        let result = extractor().extract("python Python PYTHON communication");
        assert_eq!(result.all_skills, vec!["communication", "python"]);
    }

    #[test]
    fn test_experience_years_highest_wins() {
        let result = extractor().extract("3 years of experience in X, then 7+ years experience");
        assert_eq!(result.experience_years, Some(7));
    }

    #[test]
    fn test_experience_years_absent() {
        let result = extractor().extract("worked for many years on experience design");
        assert_eq!(result.experience_years, None);
    }

    #[test]
    fn test_empty_vocabulary_extracts_nothing() {
        let extractor = SkillExtractor::new(SkillVocabulary::default());
        let result = extractor.extract("python sql react");
        assert!(result.all_skills.is_empty());
    }

    #[test]
    fn test_preprocess_strips_punctuation_and_lowercases() {
        assert_eq!(preprocess_text("C++, Rust!  (async)"), "c rust async");
    }

    #[test]
    fn test_missing_vocabulary_file_degrades_to_empty() {
        let vocab = SkillVocabulary::load("/nonexistent/skills.json");
        assert!(vocab.technical_skills.is_empty());
        assert!(vocab.soft_skills.is_empty());
    }
}
