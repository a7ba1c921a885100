//! Evidence matcher. Decides how strongly a resume evidences one required
//! skill.
//!
//! Tiers run cheapest and most precise first. Each tier is only attempted
//! while the running confidence is below its gate, and only replaces the
//! held evidence when it is strictly more confident, so confidence never
//! decreases as tiers run and an early strong hit skips the fuzzy work.
//!
//! | tier        | confidence                | attempted while |
//! |-------------|---------------------------|-----------------|
//! | skill list  | 0.95                      | always          |
//! | experience  | 0.85                      | < 0.85          |
//! | whole word  | 0.75                      | < 0.8           |
//! | fuzzy       | 0.6 + (ratio − 0.8) × 0.3 | < 0.7           |
//! | substring   | 0.4                       | < 0.5           |

use std::collections::BTreeSet;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::normalize::normalize_text;
use crate::analysis::similarity::sequence_ratio;
use crate::analysis::thresholds::MatchThresholds;
use crate::profile::models::CandidateProfile;

const SNIPPET_MAX_CHARS: usize = 250;
const SNIPPET_CONTEXT_BEFORE: usize = 50;
const SNIPPET_CONTEXT_AFTER: usize = 200;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    SkillList,
    Experience,
    WholeWord,
    Fuzzy,
    Substring,
}

impl MatchTier {
    /// Evaluation order.
    pub const ORDERED: [MatchTier; 5] = [
        MatchTier::SkillList,
        MatchTier::Experience,
        MatchTier::WholeWord,
        MatchTier::Fuzzy,
        MatchTier::Substring,
    ];

    /// The tier is skipped once the running confidence reaches this value.
    fn gate(self, t: &MatchThresholds) -> f64 {
        match self {
            MatchTier::SkillList => f64::INFINITY,
            MatchTier::Experience => t.experience_confidence,
            MatchTier::WholeWord => t.whole_word_gate,
            MatchTier::Fuzzy => t.fuzzy_gate,
            MatchTier::Substring => t.substring_gate,
        }
    }

    fn find(
        self,
        skill: &SkillQuery<'_>,
        index: &ProfileIndex<'_>,
        t: &MatchThresholds,
    ) -> Option<Evidence> {
        match self {
            MatchTier::SkillList => match_skill_list(skill, index, t),
            MatchTier::Experience => match_experience(skill, index, t),
            MatchTier::WholeWord => match_whole_word(skill, index, t),
            MatchTier::Fuzzy => match_fuzzy(skill, index, t),
            MatchTier::Substring => match_substring(skill, index, t),
        }
    }
}

/// Best evidence found for a single skill.
#[derive(Debug, Clone, PartialEq)]
pub struct Evidence {
    pub confidence: f64,
    pub snippet: String,
    pub tier: MatchTier,
}

/// A required skill the resume evidences above the matched cutoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub skill: String,
    pub confidence: f64,
    pub evidence_snippet: String,
    pub tier: MatchTier,
}

/// Normalized views of a profile, computed once per analysis.
pub struct ProfileIndex<'a> {
    profile: &'a CandidateProfile,
    text_norm: String,
    /// Sorted, so fuzzy tie-breaks are deterministic.
    skill_tokens: BTreeSet<String>,
}

impl<'a> ProfileIndex<'a> {
    pub fn new(profile: &'a CandidateProfile) -> Self {
        let skill_tokens = profile
            .skills
            .iter()
            .map(|s| normalize_text(s))
            .filter(|s| !s.is_empty())
            .collect();
        Self {
            profile,
            text_norm: normalize_text(&profile.content),
            skill_tokens,
        }
    }
}

struct SkillQuery<'s> {
    label: &'s str,
    norm: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Tier aggregation
// ────────────────────────────────────────────────────────────────────────────

/// Runs every applicable tier for `label` and returns the strongest evidence,
/// or `None` when no tier fired.
pub fn find_evidence(
    label: &str,
    index: &ProfileIndex<'_>,
    thresholds: &MatchThresholds,
) -> Option<Evidence> {
    let query = SkillQuery {
        label,
        norm: normalize_text(label),
    };
    if query.norm.is_empty() {
        return None;
    }

    let mut best: Option<Evidence> = None;
    for tier in MatchTier::ORDERED {
        let current = best.as_ref().map_or(0.0, |e| e.confidence);
        if current >= tier.gate(thresholds) {
            continue;
        }
        if let Some(found) = tier.find(&query, index, thresholds) {
            if found.confidence > current {
                best = Some(found);
            }
        }
    }
    best
}

fn match_skill_list(
    skill: &SkillQuery<'_>,
    index: &ProfileIndex<'_>,
    t: &MatchThresholds,
) -> Option<Evidence> {
    index.skill_tokens.contains(&skill.norm).then(|| Evidence {
        confidence: t.skill_list_confidence,
        snippet: "Explicitly listed in CV skills section.".to_string(),
        tier: MatchTier::SkillList,
    })
}

fn match_experience(
    skill: &SkillQuery<'_>,
    index: &ProfileIndex<'_>,
    t: &MatchThresholds,
) -> Option<Evidence> {
    let description = index
        .profile
        .experience
        .iter()
        .map(|entry| entry.text())
        .find(|text| !text.is_empty() && normalize_text(text).contains(&skill.norm))?;

    Some(Evidence {
        confidence: t.experience_confidence,
        snippet: snippet_or(description, skill.label, "Mentioned in an experience entry."),
        tier: MatchTier::Experience,
    })
}

fn match_whole_word(
    skill: &SkillQuery<'_>,
    index: &ProfileIndex<'_>,
    t: &MatchThresholds,
) -> Option<Evidence> {
    let pattern = format!(r"\b{}\b", regex::escape(&skill.norm));
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            debug!("whole-word pattern for '{}' rejected: {e}", skill.label);
            return None;
        }
    };
    if !re.is_match(&index.text_norm) {
        return None;
    }

    Some(Evidence {
        confidence: t.whole_word_confidence,
        snippet: snippet_or(&index.profile.content, skill.label, "Mentioned in CV text."),
        tier: MatchTier::WholeWord,
    })
}

fn match_fuzzy(
    skill: &SkillQuery<'_>,
    index: &ProfileIndex<'_>,
    t: &MatchThresholds,
) -> Option<Evidence> {
    let mut best: Option<(&str, f64)> = None;
    for token in &index.skill_tokens {
        let ratio = sequence_ratio(&skill.norm, token);
        if !ratio.is_finite() || ratio <= t.fuzzy_min_ratio {
            continue;
        }
        if best.map_or(true, |(_, r)| ratio > r) {
            best = Some((token.as_str(), ratio));
        }
    }
    let (token, ratio) = best?;

    Some(Evidence {
        confidence: t.fuzzy_base + (ratio - t.fuzzy_min_ratio) * t.fuzzy_scale,
        snippet: format!(
            "Similar to listed skill: {token} (Similarity: {}%).",
            (ratio * 100.0) as u32
        ),
        tier: MatchTier::Fuzzy,
    })
}

fn match_substring(
    skill: &SkillQuery<'_>,
    index: &ProfileIndex<'_>,
    t: &MatchThresholds,
) -> Option<Evidence> {
    if !index.text_norm.contains(&skill.norm) {
        return None;
    }
    Some(Evidence {
        confidence: t.substring_confidence,
        snippet: snippet_or(&index.profile.content, skill.label, "Found contextually in CV."),
        tier: MatchTier::Substring,
    })
}

fn snippet_or(text: &str, skill: &str, fallback: &str) -> String {
    let snippet = extract_evidence_snippet(text, skill);
    if snippet.is_empty() {
        fallback.to_string()
    } else {
        snippet
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Snippet extraction
// ────────────────────────────────────────────────────────────────────────────

/// Picks a short excerpt of `text` that mentions `skill`.
///
/// Prefers the first sentence containing the skill (case-insensitive). Long
/// sentences are windowed around the hit, with "... " / " ..." markers when
/// the window does not start at the sentence start. Without a sentence hit,
/// falls back to a ±50 character window in the normalized text.
pub fn extract_evidence_snippet(text: &str, skill: &str) -> String {
    if text.is_empty() || skill.is_empty() {
        return String::new();
    }

    let needle: Vec<char> = skill.chars().map(fold).collect();

    for sentence in split_sentences(text) {
        let chars: Vec<char> = sentence.chars().collect();
        let folded: Vec<char> = chars.iter().copied().map(fold).collect();
        let Some(pos) = find_chars(&folded, &needle) else {
            continue;
        };

        if chars.len() > SNIPPET_MAX_CHARS {
            let start = pos.saturating_sub(SNIPPET_CONTEXT_BEFORE);
            let end = (pos + needle.len() + SNIPPET_CONTEXT_AFTER).min(chars.len());
            let window: String = chars[start..end].iter().collect();
            return if start > 0 {
                format!("... {} ...", window.trim())
            } else {
                window.trim().to_string()
            };
        }
        return sentence.trim().chars().take(SNIPPET_MAX_CHARS).collect();
    }

    normalized_window(text, skill)
}

fn normalized_window(text: &str, skill: &str) -> String {
    let skill_norm = normalize_text(skill);
    if skill_norm.is_empty() {
        return String::new();
    }
    let pattern = format!(r"\b.{{0,50}}\b({})\b.{{0,50}}\b", regex::escape(&skill_norm));
    let Ok(re) = Regex::new(&pattern) else {
        return String::new();
    };
    re.find(&normalize_text(text))
        .map(|m| m.as_str().trim().chars().take(SNIPPET_MAX_CHARS).collect())
        .unwrap_or_default()
}

/// Splits after `.`, `!` or `?` when followed by whitespace; the whitespace
/// run is dropped.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c.is_whitespace() && matches!(prev, Some('.' | '!' | '?')) {
            sentences.push(&text[start..i]);
            start = text.len();
            while let Some(&(j, next)) = chars.peek() {
                if !next.is_whitespace() {
                    start = j;
                    break;
                }
                chars.next();
            }
            prev = None;
            continue;
        }
        prev = Some(c);
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

/// Single-char lowercase fold; keeps char positions aligned with the source.
fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn find_chars(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::models::ExperienceEntry;

    fn profile(content: &str, skills: &[&str], experience: &[&str]) -> CandidateProfile {
        CandidateProfile {
            content: content.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            experience: experience.iter().map(|e| ExperienceEntry::from(*e)).collect(),
            ..Default::default()
        }
    }

    fn evidence(label: &str, p: &CandidateProfile) -> Option<Evidence> {
        find_evidence(label, &ProfileIndex::new(p), &MatchThresholds::default())
    }

    #[test]
    fn test_declared_skill_is_tier_one() {
        let p = profile("", &["Python", "SQL"], &[]);
        let e = evidence("Python", &p).unwrap();
        assert_eq!(e.tier, MatchTier::SkillList);
        assert_eq!(e.confidence, 0.95);
        assert_eq!(e.snippet, "Explicitly listed in CV skills section.");
    }

    #[test]
    fn test_declared_skill_short_circuits_other_tiers() {
        let p = profile("Docker everywhere.", &["docker"], &["Ran Docker in prod"]);
        let e = evidence("Docker", &p).unwrap();
        assert_eq!(e.tier, MatchTier::SkillList);
    }

    #[test]
    fn test_experience_entry_match_with_sentence_snippet() {
        let p = profile("", &[], &["Joined in 2019. Led a team using Docker for deployments. Left."]);
        let e = evidence("Docker", &p).unwrap();
        assert_eq!(e.tier, MatchTier::Experience);
        assert_eq!(e.confidence, 0.85);
        assert_eq!(e.snippet, "Led a team using Docker for deployments.");
    }

    #[test]
    fn test_structured_experience_entry() {
        let mut p = profile("", &[], &[]);
        p.experience = vec![ExperienceEntry::Structured {
            description: "Shipped Kubernetes operators".to_string(),
        }];
        let e = evidence("Kubernetes", &p).unwrap();
        assert_eq!(e.tier, MatchTier::Experience);
    }

    #[test]
    fn test_whole_word_in_resume_text() {
        let p = profile("Skilled engineer. Wrote SQL reports weekly.", &[], &[]);
        let e = evidence("SQL", &p).unwrap();
        assert_eq!(e.tier, MatchTier::WholeWord);
        assert_eq!(e.confidence, 0.75);
        assert_eq!(e.snippet, "Wrote SQL reports weekly.");
    }

    #[test]
    fn test_fuzzy_against_declared_skills() {
        let p = profile("", &["Postgres"], &[]);
        let e = evidence("PostgreSQL", &p).unwrap();
        assert_eq!(e.tier, MatchTier::Fuzzy);
        let expected = 0.6 + (16.0 / 18.0 - 0.8) * 0.3;
        assert!((e.confidence - expected).abs() < 1e-9);
        assert_eq!(e.snippet, "Similar to listed skill: postgres (Similarity: 88%).");
    }

    #[test]
    fn test_fuzzy_picks_best_ratio() {
        let p = profile("", &["reactjs", "reacts"], &[]);
        let e = evidence("React", &p).unwrap();
        assert_eq!(e.tier, MatchTier::Fuzzy);
        assert!(e.snippet.contains("reacts"), "{}", e.snippet);
    }

    #[test]
    fn test_fuzzy_below_ratio_does_not_match() {
        let p = profile("", &["Java"], &[]);
        assert!(evidence("JavaScript", &p).is_none());
    }

    #[test]
    fn test_loose_substring_is_lowest_tier() {
        let p = profile("Built reactive dashboards.", &[], &[]);
        let e = evidence("React", &p).unwrap();
        assert_eq!(e.tier, MatchTier::Substring);
        assert_eq!(e.confidence, 0.4);
        assert_eq!(e.snippet, "Built reactive dashboards.");
    }

    #[test]
    fn test_whole_word_beats_fuzzy() {
        // whole-word (0.75) reaches the fuzzy gate, so fuzzy never runs
        let p = profile("I use terraform daily.", &["terraforms"], &[]);
        let e = evidence("Terraform", &p).unwrap();
        assert_eq!(e.tier, MatchTier::WholeWord);
    }

    #[test]
    fn test_absent_skill_has_no_evidence() {
        let p = profile("Excel and PowerPoint.", &["Excel"], &["Sales lead"]);
        assert!(evidence("Kubernetes", &p).is_none());
    }

    #[test]
    fn test_symbol_only_label_never_matches() {
        let p = profile("c++ c# ++", &["++"], &[]);
        assert!(evidence("++", &p).is_none());
    }

    #[test]
    fn test_long_sentence_is_windowed_with_markers() {
        let before = "x".repeat(120);
        let after = "y".repeat(300);
        let text = format!("{before} Kafka {after}");
        let snippet = extract_evidence_snippet(&text, "kafka");
        assert!(snippet.starts_with("... "));
        assert!(snippet.ends_with(" ..."));
        assert!(snippet.contains("Kafka"));
        // 50 before + skill + 200 after, plus markers
        assert_eq!(snippet.chars().count(), 50 + 5 + 200 + 8);
    }

    #[test]
    fn test_long_sentence_hit_near_start_has_no_markers() {
        let text = format!("Kafka {}", "y".repeat(300));
        let snippet = extract_evidence_snippet(&text, "Kafka");
        assert!(snippet.starts_with("Kafka"));
        assert!(!snippet.ends_with(" ..."));
        assert_eq!(snippet.chars().count(), 5 + 200);
    }

    #[test]
    fn test_snippet_falls_back_to_normalized_window() {
        let snippet = extract_evidence_snippet("Worked on CI-CD pipelines", "CI/CD");
        assert_eq!(snippet, "worked on ci cd pipelines");
    }

    #[test]
    fn test_snippet_empty_when_absent() {
        assert_eq!(extract_evidence_snippet("Nothing relevant.", "Rust"), "");
        assert_eq!(extract_evidence_snippet("", "Rust"), "");
    }

    #[test]
    fn test_split_sentences() {
        assert_eq!(
            split_sentences("One. Two!  Three?\nFour"),
            vec!["One.", "Two!", "Three?", "Four"]
        );
        assert_eq!(split_sentences("Trailing. "), vec!["Trailing."]);
        assert_eq!(split_sentences("v1.2 release"), vec!["v1.2 release"]);
    }
}
