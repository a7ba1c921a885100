//! Plain-text profile extraction. Pulls contact details, skills, education
//! and experience lines out of raw resume text with keyword heuristics.

use std::sync::LazyLock;

use regex::Regex;

use crate::profile::models::{CandidateProfile, ContactInfo, ExperienceEntry};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
        .expect("email pattern is valid")
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}")
        .expect("phone pattern is valid")
});

static LINKEDIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)linkedin\.com/in/[\w-]+").expect("linkedin pattern is valid")
});

const MAX_SKILLS: usize = 20;
const MAX_EDUCATION: usize = 5;
const MAX_EXPERIENCE: usize = 10;
const MIN_EDUCATION_LINE_CHARS: usize = 10;
const MIN_EXPERIENCE_LINE_CHARS: usize = 15;

const CV_SKILL_KEYWORDS: &[&str] = &[
    "python", "javascript", "java", "c++", "c#", "html", "css", "react", "angular", "vue",
    "node.js", "express", "django", "flask", "spring", "sql", "mysql", "postgresql", "mongodb",
    "redis", "docker", "kubernetes", "aws", "azure", "gcp", "git", "linux",
    "machine learning", "data science", "artificial intelligence", "deep learning",
    "tensorflow", "pytorch", "scikit-learn", "pandas", "numpy", "matplotlib",
    "project management", "agile", "scrum", "leadership", "communication", "teamwork",
    "problem solving", "analytical", "creative", "detail oriented", "time management",
];

const EDUCATION_KEYWORDS: &[&str] = &[
    "bachelor", "master", "phd", "doctorate", "degree", "university", "college", "school",
    "institute", "academy", "certification", "certificate", "diploma", "b.s.", "b.a.", "m.s.",
    "m.a.", "mba", "ph.d.",
];

const EXPERIENCE_KEYWORDS: &[&str] = &[
    "experience", "work", "employment", "position", "role", "job", "company", "corporation",
    "inc", "ltd", "llc", "manager", "developer", "engineer", "analyst", "consultant",
    "specialist", "coordinator", "director", "senior", "junior", "lead", "team lead",
];

/// Builds a `CandidateProfile` from extracted resume text.
pub fn parse_profile(text: &str) -> CandidateProfile {
    CandidateProfile {
        content: text.to_string(),
        skills: extract_skills(text),
        education: extract_lines(
            text,
            EDUCATION_KEYWORDS,
            MIN_EDUCATION_LINE_CHARS,
            MAX_EDUCATION,
        ),
        experience: extract_lines(
            text,
            EXPERIENCE_KEYWORDS,
            MIN_EXPERIENCE_LINE_CHARS,
            MAX_EXPERIENCE,
        )
        .into_iter()
        .map(ExperienceEntry::PlainText)
        .collect(),
        contact_info: extract_contact_info(text),
    }
}

pub fn extract_contact_info(text: &str) -> ContactInfo {
    ContactInfo {
        email: first_match(&EMAIL_RE, text),
        phone: first_match(&PHONE_RE, text),
        linkedin: first_match(&LINKEDIN_RE, text),
        name: None,
    }
}

fn first_match(re: &Regex, text: &str) -> Option<String> {
    re.find(text).map(|m| m.as_str().trim().to_string())
}

/// Keyword skills found in `text`, title-cased, first-seen order, at most 20.
pub fn extract_skills(text: &str) -> Vec<String> {
    let text_lower = text.to_lowercase();
    CV_SKILL_KEYWORDS
        .iter()
        .filter(|kw| text_lower.contains(**kw))
        .map(|kw| title_case(kw))
        .take(MAX_SKILLS)
        .collect()
}

fn extract_lines(text: &str, keywords: &[&str], min_chars: usize, limit: usize) -> Vec<String> {
    text.lines()
        .filter(|line| {
            let lower = line.to_lowercase();
            keywords.iter().any(|kw| lower.contains(*kw))
        })
        .map(str::trim)
        .filter(|line| line.chars().count() > min_chars)
        .take(limit)
        .map(str::to_string)
        .collect()
}

/// Uppercases the first letter of every alphabetic run: "node.js" → "Node.Js".
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
