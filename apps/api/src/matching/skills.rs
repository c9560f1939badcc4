//! Skill normalization — every skill set entering the matcher goes through here.
//!
//! Skills are case-insensitive tokens: two skills are equal iff their
//! lowercased forms match. Normalization happens once at the system boundary
//! so downstream components never re-check casing or duplicates.

use std::collections::BTreeSet;

/// Lowercases, trims, and deduplicates skill tokens. Empty entries are
/// silently dropped. Idempotent: normalizing an already-normalized set is a
/// no-op.
pub fn normalize_skills<I, S>(skills: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    skills
        .into_iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_dedupes() {
        let set = normalize_skills(["Python", "python", "PYTHON", "React"]);
        assert_eq!(set.len(), 2);
        assert!(set.contains("python"));
        assert!(set.contains("react"));
    }

    #[test]
    fn test_drops_empty_and_whitespace_entries() {
        let set = normalize_skills(["", "  ", "rust", " sql "]);
        assert_eq!(set.len(), 2);
        assert!(set.contains("rust"));
        assert!(set.contains("sql"));
    }

    #[test]
    fn test_case_different_inputs_yield_identical_sets() {
        let a = normalize_skills(["Docker", "Kubernetes"]);
        let b = normalize_skills(["docker", "KUBERNETES"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_skills(["Go", "TypeScript", "go"]);
        let twice = normalize_skills(once.iter());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_input_yields_empty_set() {
        let set = normalize_skills(Vec::<String>::new());
        assert!(set.is_empty());
    }
}
