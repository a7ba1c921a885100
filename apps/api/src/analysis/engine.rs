//! ATS engine. Runs requirement extraction, evidence matching, scoring and
//! recommendations for one job description / candidate profile pair.
//!
//! The engine holds only immutable configuration (vocabulary + thresholds),
//! so one instance is shared across requests behind an `Arc`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analysis::evidence::{find_evidence, ProfileIndex, SkillMatch};
use crate::analysis::recommendations::{build_recommendations, NO_REQUIREMENTS_MESSAGE};
use crate::analysis::requirements::extract_required_skills;
use crate::analysis::scorer::compatibility_score;
use crate::analysis::thresholds::MatchThresholds;
use crate::analysis::vocabulary::SkillVocabulary;
use crate::profile::models::CandidateProfile;

/// Engine output. Serializes to the public analysis JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityResult {
    pub compatibility_score: u8,
    pub required_skills: Vec<String>,
    /// `"Label (NN%)"`, in required-skill order.
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub recommendations: Vec<String>,
    /// Matched skills only, rounded to two decimals.
    #[serde(rename = "_skill_confidences")]
    pub skill_confidences: BTreeMap<String, f64>,
    #[serde(rename = "_skill_evidence")]
    pub skill_evidence: BTreeMap<String, String>,
    /// Typed per-skill matches; not part of the wire format.
    #[serde(skip)]
    pub matches: Vec<SkillMatch>,
}

impl CompatibilityResult {
    fn no_requirements() -> Self {
        Self {
            compatibility_score: 0,
            required_skills: vec![],
            matched_skills: vec![],
            missing_skills: vec![],
            recommendations: vec![NO_REQUIREMENTS_MESSAGE.to_string()],
            skill_confidences: BTreeMap::new(),
            skill_evidence: BTreeMap::new(),
            matches: vec![],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AtsEngine {
    vocabulary: SkillVocabulary,
    thresholds: MatchThresholds,
}

impl AtsEngine {
    pub fn new(vocabulary: SkillVocabulary, thresholds: MatchThresholds) -> Self {
        Self {
            vocabulary,
            thresholds,
        }
    }

    pub fn thresholds(&self) -> &MatchThresholds {
        &self.thresholds
    }

    pub fn vocabulary(&self) -> &SkillVocabulary {
        &self.vocabulary
    }

    /// Required skills the engine would look for in `job_description`.
    pub fn required_skills(&self, job_description: &str) -> Vec<String> {
        extract_required_skills(
            job_description,
            &self.vocabulary,
            self.thresholds.max_required_skills,
        )
    }

    /// Scores `profile` against `job_description`. Never fails; degenerate
    /// input produces a zero score with an explanatory recommendation.
    pub fn analyze(
        &self,
        job_description: &str,
        profile: &CandidateProfile,
    ) -> CompatibilityResult {
        let t = &self.thresholds;
        let required_skills = self.required_skills(job_description);
        if required_skills.is_empty() {
            warn!("No significant skills extracted from job description");
            return CompatibilityResult::no_requirements();
        }

        let index = ProfileIndex::new(profile);
        let mut matches = Vec::new();
        let mut missing_skills = Vec::new();
        let mut confidences = Vec::with_capacity(required_skills.len());

        for skill in &required_skills {
            match find_evidence(skill, &index, t) {
                Some(evidence) if evidence.confidence > t.matched_cutoff => {
                    confidences.push(evidence.confidence);
                    matches.push(SkillMatch {
                        skill: skill.clone(),
                        confidence: evidence.confidence,
                        evidence_snippet: evidence.snippet,
                        tier: evidence.tier,
                    });
                }
                _ => {
                    confidences.push(0.0);
                    missing_skills.push(skill.clone());
                }
            }
        }

        let score = compatibility_score(&confidences, profile);
        let recommendations =
            build_recommendations(score, &missing_skills, profile, t.max_recommendations);

        debug!(
            score,
            matched = matches.len(),
            missing = missing_skills.len(),
            "compatibility analysis complete"
        );

        CompatibilityResult {
            compatibility_score: score,
            matched_skills: matches.iter().map(format_matched).collect(),
            skill_confidences: matches
                .iter()
                .map(|m| (m.skill.clone(), round2(m.confidence)))
                .collect(),
            skill_evidence: matches
                .iter()
                .map(|m| (m.skill.clone(), clip(&m.evidence_snippet, t.evidence_clip)))
                .collect(),
            required_skills,
            missing_skills,
            recommendations,
            matches,
        }
    }
}

fn format_matched(m: &SkillMatch) -> String {
    // small epsilon so 0.95 prints as 95, not 94
    let pct = (m.confidence * 100.0 + 1e-9).floor() as u32;
    format!("{} ({pct}%)", m.skill)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::evidence::MatchTier;
    use crate::profile::models::{ContactInfo, ExperienceEntry};

    const SCENARIO_JD: &str =
        "Python, Docker, and leadership experience required. Strong SQL skills a plus.";

    fn scenario_profile() -> CandidateProfile {
        CandidateProfile {
            content: "Jane Doe. Backend engineer with Python and SQL. Led a team using Docker for deployments.".to_string(),
            skills: vec!["Python".to_string(), "SQL".to_string()],
            education: vec![
                "BSc Computer Science, State University".to_string(),
                "MSc Data Engineering, Tech Institute".to_string(),
            ],
            experience: vec![ExperienceEntry::from("Led a team using Docker for deployments")],
            contact_info: ContactInfo {
                email: Some("jane@example.com".to_string()),
                phone: Some("555-123-4567".to_string()),
                ..Default::default()
            },
        }
    }

    fn engine() -> AtsEngine {
        AtsEngine::default()
    }

    fn assert_partition(result: &CompatibilityResult) {
        let matched: Vec<&String> = result.matches.iter().map(|m| &m.skill).collect();
        for skill in &result.required_skills {
            let in_matched = matched.contains(&skill);
            let in_missing = result.missing_skills.contains(skill);
            assert!(in_matched ^ in_missing, "{skill} must be in exactly one set");
        }
        assert_eq!(
            matched.len() + result.missing_skills.len(),
            result.required_skills.len()
        );
    }

    #[test]
    fn test_scenario_python_sql_docker_leadership() {
        let result = engine().analyze(SCENARIO_JD, &scenario_profile());

        assert_eq!(
            result.required_skills,
            vec!["Docker", "Leadership", "Python", "SQL"]
        );
        assert!(result.skill_confidences["Python"] >= 0.95);
        assert!(result.skill_confidences["SQL"] >= 0.75);
        assert_eq!(result.skill_confidences["Docker"], 0.85);
        assert!(result.matched_skills.contains(&"Python (95%)".to_string()));
        assert!(result.matched_skills.contains(&"Docker (85%)".to_string()));

        let docker = result.matches.iter().find(|m| m.skill == "Docker").unwrap();
        assert_eq!(docker.tier, MatchTier::Experience);
        assert_eq!(
            result.skill_evidence["Docker"],
            "Led a team using Docker for deployments"
        );

        // "Led" is not "leadership". Nothing in the resume evidences it
        assert_eq!(result.missing_skills, vec!["Leadership"]);
        assert_partition(&result);

        // (0.85 + 0 + 0.95 + 0.95) / 4 + 0.05 + 0.05 + 0.03 = 0.8175
        assert_eq!(result.compatibility_score, 82);
    }

    #[test]
    fn test_declared_python_is_matched_at_095() {
        let profile = CandidateProfile {
            skills: vec!["Python".to_string()],
            ..Default::default()
        };
        let result = engine().analyze(
            "We need a backend engineer fluent in Python to join our platform team.",
            &profile,
        );
        assert_eq!(result.matched_skills, vec!["Python (95%)"]);
        assert_eq!(result.skill_confidences["Python"], 0.95);
        assert_eq!(
            result.skill_evidence["Python"],
            "Explicitly listed in CV skills section."
        );
    }

    #[test]
    fn test_absent_skill_is_missing_without_confidence_entry() {
        let profile = CandidateProfile {
            content: "Accountant with spreadsheet experience.".to_string(),
            skills: vec!["Excel".to_string()],
            ..Default::default()
        };
        let result = engine().analyze(
            "Looking for an engineer with strong Kubernetes operations background.",
            &profile,
        );
        assert_eq!(result.missing_skills, vec!["Kubernetes"]);
        assert!(!result.skill_confidences.contains_key("Kubernetes"));
        assert!(!result.skill_evidence.contains_key("Kubernetes"));
        assert_partition(&result);
    }

    #[test]
    fn test_filler_job_description_has_no_requirements() {
        let result = engine().analyze(
            "we would like someone who is happy, kind, and friendly, with a warm and open heart",
            &scenario_profile(),
        );
        assert!(result.required_skills.is_empty());
        assert_eq!(result.compatibility_score, 0);
        assert!(result.matched_skills.is_empty());
        assert!(result.missing_skills.is_empty());
        assert_eq!(result.recommendations, vec![NO_REQUIREMENTS_MESSAGE]);
    }

    #[test]
    fn test_empty_profile_scores_in_range() {
        let result = engine().analyze(SCENARIO_JD, &CandidateProfile::default());
        assert!(result.compatibility_score <= 100);
        assert_eq!(result.compatibility_score, 0);
        assert_eq!(result.missing_skills.len(), 4);
        assert!(result.recommendations.len() <= 8);
        assert_partition(&result);
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let engine = engine();
        let a = serde_json::to_string(&engine.analyze(SCENARIO_JD, &scenario_profile())).unwrap();
        let b = serde_json::to_string(&engine.analyze(SCENARIO_JD, &scenario_profile())).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_declaring_a_missing_skill_never_lowers_the_score() {
        let engine = engine();
        let before = engine.analyze(SCENARIO_JD, &scenario_profile());
        assert!(before.missing_skills.contains(&"Leadership".to_string()));

        let mut profile = scenario_profile();
        profile.skills.push("Leadership".to_string());
        let after = engine.analyze(SCENARIO_JD, &profile);

        assert!(after.compatibility_score >= before.compatibility_score);
        assert!(after.missing_skills.is_empty());
    }

    #[test]
    fn test_wire_format_field_names() {
        let result = engine().analyze(SCENARIO_JD, &scenario_profile());
        let json = serde_json::to_value(&result).unwrap();
        for key in [
            "compatibility_score",
            "required_skills",
            "matched_skills",
            "missing_skills",
            "recommendations",
            "_skill_confidences",
            "_skill_evidence",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
        assert!(json.get("matches").is_none());
    }

    #[test]
    fn test_custom_thresholds_change_the_cutoff() {
        let thresholds = MatchThresholds {
            matched_cutoff: 0.5,
            ..Default::default()
        };
        let engine = AtsEngine::new(SkillVocabulary::builtin(), thresholds);
        let profile = CandidateProfile {
            content: "Built reactive dashboards.".to_string(),
            ..Default::default()
        };
        let result = engine.analyze(
            "Frontend role: you will build React components for our product every day.",
            &profile,
        );
        // substring tier (0.4) no longer clears the cutoff
        assert_eq!(result.missing_skills, vec!["React"]);
    }

    #[test]
    fn test_clip_and_round_helpers() {
        assert_eq!(clip("abcdef", 3), "abc...");
        assert_eq!(clip("abc", 3), "abc");
        assert_eq!(round2(0.62666), 0.63);
    }
}
