//! Recommendation rules. Deterministic, order-preserving guidance derived
//! from the score, the missing skills, and the shape of the profile.

use crate::profile::models::CandidateProfile;

const MAX_MISSING_SKILL_TIPS: usize = 5;
const MIN_DETAILED_CONTENT_CHARS: usize = 700;

pub const NO_REQUIREMENTS_MESSAGE: &str = "Could not extract key requirements from the provided job description. Please provide a more detailed and structured job description.";

const FALLBACK_MESSAGE: &str =
    "Ensure your CV uses strong action verbs and quantifies achievements wherever possible.";

/// Builds the recommendation list, truncated to `limit` entries.
///
/// Rules run in a fixed order and each appends at most a few lines:
/// missing skills (first 5), education, experience, contact details,
/// content length, unmatched JD, score band, then a generic fallback when
/// nothing else fired.
pub fn build_recommendations(
    score: u8,
    missing_skills: &[String],
    profile: &CandidateProfile,
    limit: usize,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    for skill in missing_skills.iter().take(MAX_MISSING_SKILL_TIPS) {
        recommendations.push(format!(
            "Strongly consider adding '{skill}' to your CV, along with concrete examples of its application in your projects or roles (e.g., project details, specific tasks, technologies integrated, quantifiable results)."
        ));
    }

    match profile.education.len() {
        0 => recommendations.push(
            "Include an 'Education' section with degrees, institutions, graduation dates, and relevant academic achievements.".to_string(),
        ),
        1 => recommendations.push(
            "Expand on your educational background, detailing relevant coursework, academic projects, or certifications.".to_string(),
        ),
        _ => {}
    }

    match profile.experience.len() {
        0 => recommendations.push(
            "Add an 'Experience' section, listing roles with start/end dates, responsibilities, and key achievements using action verbs and quantifiable results.".to_string(),
        ),
        1 => recommendations.push(
            "Consider adding more professional experience entries or detailed project descriptions for significant freelance/personal work.".to_string(),
        ),
        _ => {}
    }

    let contact = &profile.contact_info;
    let mut contact_gaps = Vec::new();
    if !contact.has_email() {
        contact_gaps.push("a professional email address");
    }
    if !contact.has_phone() {
        contact_gaps.push("a reliable phone number");
    }
    if !contact.has_linkedin() {
        contact_gaps.push("your LinkedIn profile URL");
    }
    if !contact_gaps.is_empty() {
        recommendations.push(format!(
            "Ensure your 'Contact Information' includes {} for recruiters to reach you.",
            contact_gaps.join(", ")
        ));
    }

    if profile.content.chars().count() < MIN_DETAILED_CONTENT_CHARS {
        recommendations.push(
            "Elaborate on your past responsibilities and accomplishments with more detail and context, focusing on results.".to_string(),
        );
    }

    // A low score with nothing missing means the JD itself was hard to match.
    if score < 40 && missing_skills.is_empty() {
        recommendations.push(
            "The job description appears highly specific. Try to tailor your CV to align more directly with the keywords and required skills mentioned in the job description.".to_string(),
        );
    }

    if score >= 80 {
        recommendations.push(
            "Excellent match! To further strengthen your application, highlight unique leadership experiences or contributions to company growth if not already prominent.".to_string(),
        );
    } else if score >= 60 {
        recommendations.push(
            "Good compatibility! Focus on enhancing the depth and detail of your most relevant skills and experiences by adding quantifiable impacts.".to_string(),
        );
    }

    if recommendations.is_empty() {
        recommendations.push(FALLBACK_MESSAGE.to_string());
    }

    recommendations.truncate(limit);
    recommendations
}
