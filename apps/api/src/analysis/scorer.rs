//! Compatibility scoring. Folds per-skill confidences and profile
//! completeness into a single 0–100 score.
//!
//! Skill evidence can contribute the full 1.0; structural bonuses are capped
//! at 0.30 combined so formatting alone cannot carry a skill-poor resume.

use crate::profile::models::CandidateProfile;

const CONTACT_BONUS: f64 = 0.05;
const EDUCATION_BONUS_PER_ENTRY: f64 = 0.025;
const EDUCATION_BONUS_CAP: f64 = 0.10;
const EXPERIENCE_BONUS_PER_ENTRY: f64 = 0.03;
const EXPERIENCE_BONUS_CAP: f64 = 0.15;

/// Breakdown of the raw (0.0–1.0) score before scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub avg_skill_score: f64,
    pub contact_bonus: f64,
    pub education_bonus: f64,
    pub experience_bonus: f64,
}

impl ScoreBreakdown {
    pub fn raw(&self) -> f64 {
        (self.avg_skill_score + self.contact_bonus + self.education_bonus + self.experience_bonus)
            .min(1.0)
    }

    /// Rounded and clamped to 0–100.
    pub fn score(&self) -> u8 {
        (self.raw() * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

/// `confidences` holds one value per required skill (0.0 for missing ones).
/// Returns `None` when there are no required skills to average over.
pub fn score_breakdown(confidences: &[f64], profile: &CandidateProfile) -> Option<ScoreBreakdown> {
    if confidences.is_empty() {
        return None;
    }

    let sum: f64 = confidences.iter().map(|c| c.clamp(0.0, 1.0)).sum();
    let avg_skill_score = sum / confidences.len() as f64;

    let contact = &profile.contact_info;
    let contact_bonus = if contact.has_email() && contact.has_phone() {
        CONTACT_BONUS
    } else {
        0.0
    };
    let education_bonus =
        (EDUCATION_BONUS_PER_ENTRY * profile.education.len() as f64).min(EDUCATION_BONUS_CAP);
    let experience_bonus =
        (EXPERIENCE_BONUS_PER_ENTRY * profile.experience.len() as f64).min(EXPERIENCE_BONUS_CAP);

    Some(ScoreBreakdown {
        avg_skill_score,
        contact_bonus,
        education_bonus,
        experience_bonus,
    })
}

/// Compatibility score in 0–100; 0 when there are no required skills.
pub fn compatibility_score(confidences: &[f64], profile: &CandidateProfile) -> u8 {
    score_breakdown(confidences, profile)
        .map(|b| b.score())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::models::{ContactInfo, ExperienceEntry};

    fn full_profile(education: usize, experience: usize) -> CandidateProfile {
        CandidateProfile {
            education: vec!["BSc Computer Science".to_string(); education],
            experience: vec![ExperienceEntry::from("Engineer at Acme"); experience],
            contact_info: ContactInfo {
                email: Some("a@b.io".to_string()),
                phone: Some("555-123-4567".to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_no_required_skills_scores_zero() {
        assert_eq!(compatibility_score(&[], &full_profile(4, 5)), 0);
        assert!(score_breakdown(&[], &full_profile(4, 5)).is_none());
    }

    #[test]
    fn test_skills_only() {
        let score = compatibility_score(&[0.95, 0.0], &CandidateProfile::default());
        // 0.475 → 47.5 → 48
        assert_eq!(score, 48);
    }

    #[test]
    fn test_bonuses_are_capped() {
        let b = score_breakdown(&[0.0], &full_profile(10, 10)).unwrap();
        assert_eq!(b.contact_bonus, 0.05);
        assert_eq!(b.education_bonus, 0.10);
        assert_eq!(b.experience_bonus, 0.15);
        assert_eq!(b.score(), 30);
    }

    #[test]
    fn test_contact_bonus_requires_email_and_phone() {
        let mut profile = full_profile(0, 0);
        profile.contact_info.phone = None;
        let b = score_breakdown(&[0.5], &profile).unwrap();
        assert_eq!(b.contact_bonus, 0.0);
    }

    #[test]
    fn test_raw_score_capped_at_one() {
        assert_eq!(compatibility_score(&[0.95, 0.95], &full_profile(4, 5)), 100);
    }

    #[test]
    fn test_partial_bonuses() {
        // avg 0.5 + 0.05 + 2*0.025 + 1*0.03 = 0.63
        let b = score_breakdown(&[0.85, 0.15], &full_profile(2, 1)).unwrap();
        assert!((b.raw() - 0.63).abs() < 1e-9);
        assert_eq!(b.score(), 63);
    }
}
