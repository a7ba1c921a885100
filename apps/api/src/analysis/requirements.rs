//! Requirement extraction. Turns a free-text job description into an
//! ordered, de-duplicated list of required-skill labels.
//!
//! Pass 1 matches the controlled vocabulary (direct hit, alias, or all words
//! of a multi-word phrase). Pass 2 only runs when pass 1 finds nothing and
//! falls back to capitalized-term runs, which recovers proper-noun
//! technologies at the cost of more false positives.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::analysis::normalize::{normalize_text, tokens};
use crate::analysis::vocabulary::{SkillVocabulary, VocabularyEntry};

/// Single capitalized tokens or contiguous runs of them.
static CAPITALIZED_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:[A-Z][a-zA-Z0-9_+\-.]+(?:\s[A-Z][a-zA-Z0-9_+\-.]+)*)\b")
        .expect("capitalized-run pattern is valid")
});

const FALLBACK_STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "in", "of", "to", "a", "an", "is", "on", "or", "at", "etc",
    "are", "you", "be", "by", "as",
];

/// Extracts at most `limit` required skills, sorted by label.
pub fn extract_required_skills(
    job_description: &str,
    vocabulary: &SkillVocabulary,
    limit: usize,
) -> Vec<String> {
    if job_description.trim().is_empty() {
        return vec![];
    }

    let mut found = vocabulary_pass(job_description, vocabulary);
    if found.is_empty() {
        found = capitalized_term_pass(job_description);
    }

    found.into_iter().take(limit).collect()
}

fn vocabulary_pass(job_description: &str, vocabulary: &SkillVocabulary) -> BTreeSet<String> {
    let jd_lower = job_description.to_lowercase();
    let jd_norm = normalize_text(job_description);
    let jd_tokens: HashSet<&str> = tokens(&jd_norm).collect();

    vocabulary
        .entries()
        .iter()
        .filter(|entry| entry_matches(entry, &jd_lower, &jd_tokens, vocabulary))
        .map(|entry| entry.display.to_string())
        .collect()
}

fn entry_matches(
    entry: &VocabularyEntry,
    jd_lower: &str,
    jd_tokens: &HashSet<&str>,
    vocabulary: &SkillVocabulary,
) -> bool {
    if jd_lower.contains(entry.key) {
        return true;
    }

    if vocabulary
        .aliases_for(entry.key)
        .any(|alias| jd_tokens.contains(alias))
    {
        return true;
    }

    // Multi-word phrases tolerate reordering and filler between the words.
    let words: Vec<&str> = entry.key.split_whitespace().collect();
    words.len() > 1 && words.iter().all(|w| jd_lower.contains(w))
}

fn capitalized_term_pass(job_description: &str) -> BTreeSet<String> {
    CAPITALIZED_RUN_RE
        .find_iter(job_description)
        .map(|m| m.as_str().trim())
        .filter(|term| term.chars().count() > 2)
        .filter(|term| {
            !term
                .split_whitespace()
                .any(|w| FALLBACK_STOP_WORDS.contains(&w.to_lowercase().as_str()))
        })
        .map(str::to_string)
        .collect()
}
