use serde::{Deserialize, Serialize};

/// Heuristic constants that shape matching and scoring.
///
/// Changing any of these changes observable scores and the recommendations
/// derived from them, so they live in one place and are overridable as a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchThresholds {
    /// Tier 1: required skill equals a declared skill.
    pub skill_list_confidence: f64,
    /// Tier 2: skill appears in an experience entry.
    pub experience_confidence: f64,
    /// Tier 3: whole-word hit in the full resume text.
    pub whole_word_confidence: f64,
    /// Tier 3 runs only while confidence is below this.
    pub whole_word_gate: f64,
    /// Tier 4 confidence is `fuzzy_base + (ratio - fuzzy_min_ratio) * fuzzy_scale`.
    pub fuzzy_base: f64,
    pub fuzzy_scale: f64,
    /// Tier 4 requires a similarity ratio strictly above this.
    pub fuzzy_min_ratio: f64,
    /// Tier 4 runs only while confidence is below this.
    pub fuzzy_gate: f64,
    /// Tier 5: loose substring hit in the full resume text.
    pub substring_confidence: f64,
    /// Tier 5 runs only while confidence is below this.
    pub substring_gate: f64,
    /// Skills need a confidence strictly above this to count as matched.
    pub matched_cutoff: f64,
    pub max_required_skills: usize,
    pub max_recommendations: usize,
    /// Evidence longer than this is clipped with a trailing "...".
    pub evidence_clip: usize,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            skill_list_confidence: 0.95,
            experience_confidence: 0.85,
            whole_word_confidence: 0.75,
            whole_word_gate: 0.8,
            fuzzy_base: 0.6,
            fuzzy_scale: 0.3,
            fuzzy_min_ratio: 0.8,
            fuzzy_gate: 0.7,
            substring_confidence: 0.4,
            substring_gate: 0.5,
            matched_cutoff: 0.35,
            max_required_skills: 25,
            max_recommendations: 8,
            evidence_clip: 300,
        }
    }
}
