//! Semantic Similarity — pluggable text-similarity backend used by the
//! Similarity Blender and the `/api/calculate-similarity` endpoint.
//!
//! Default: `TokenCosineSimilarity` (pure-Rust, deterministic, no model
//! download). The trait is the seam for an embedding-model backend.
//!
//! `AppState` holds an `Arc<dyn SemanticSimilarity>`, swapped at startup.

use std::collections::HashMap;

/// Returns a 0–100 similarity between two texts. Implementations must treat
/// a text that preprocesses to nothing as similarity 0.
pub trait SemanticSimilarity: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> u32;
}

/// Cosine similarity over term-frequency vectors of content words
/// (lowercased, punctuation/digits stripped, stopwords removed).
pub struct TokenCosineSimilarity;

impl SemanticSimilarity for TokenCosineSimilarity {
    fn similarity(&self, a: &str, b: &str) -> u32 {
        let ta = content_tokens(a);
        let tb = content_tokens(b);
        if ta.is_empty() || tb.is_empty() {
            return 0;
        }

        let va = term_frequencies(&ta);
        let vb = term_frequencies(&tb);

        let dot: f64 = va
            .iter()
            .filter_map(|(term, &fa)| vb.get(term).map(|&fb| fa * fb))
            .sum();
        let norm_a: f64 = va.values().map(|f| f * f).sum::<f64>().sqrt();
        let norm_b: f64 = vb.values().map(|f| f * f).sum::<f64>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0;
        }

        let cosine = (dot / (norm_a * norm_b)).clamp(0.0, 1.0);
        (cosine * 100.0) as u32
    }
}

/// Common English function words dropped before vectorizing.
const STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "because",
    "been", "but", "by", "can", "could", "did", "do", "does", "for", "from", "had", "has", "have",
    "he", "her", "his", "how", "i", "if", "in", "into", "is", "it", "its", "just", "like", "me",
    "more", "most", "my", "no", "not", "of", "on", "one", "only", "or", "other", "our", "out",
    "over", "she", "should", "so", "some", "such", "than", "that", "the", "their", "them", "then",
    "there", "these", "they", "this", "to", "up", "us", "was", "we", "were", "what", "when",
    "where", "which", "while", "who", "will", "with", "would", "you", "your",
];

fn is_stopword(token: &str) -> bool {
    STOPWORDS.binary_search(&token).is_ok()
}

/// Lowercases, strips everything but ASCII letters, and drops stopwords and
/// single-character fragments.
pub fn content_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|t| t.len() >= 2 && !is_stopword(t))
        .map(str::to_string)
        .collect()
}

fn term_frequencies(tokens: &[String]) -> HashMap<&str, f64> {
    let mut tf: HashMap<&str, f64> = HashMap::new();
    for token in tokens {
        *tf.entry(token.as_str()).or_insert(0.0) += 1.0;
    }
    tf
}
