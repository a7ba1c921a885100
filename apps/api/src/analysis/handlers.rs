//! Axum route handlers for the ATS analysis API.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::engine::CompatibilityResult;
use crate::errors::AppError;
use crate::profile::document::{DocumentKind, DOCX_CONTENT_TYPE};
use crate::profile::models::{CandidateProfile, ContactInfo};
use crate::profile::parser::parse_profile;
use crate::state::AppState;

const MIN_JOB_DESCRIPTION_CHARS: usize = 50;
const UNKNOWN_CANDIDATE: &str = "N/A";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RequirementsRequest {
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct RequirementsResponse {
    pub required_skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub job_description: String,
    #[serde(default)]
    pub candidate_name: Option<String>,
    #[serde(default)]
    pub candidate_profile: CandidateProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CvSummary {
    pub skills_found: usize,
    pub education_entries: usize,
    pub experience_entries: usize,
}

impl CvSummary {
    fn of(profile: &CandidateProfile) -> Self {
        Self {
            skills_found: profile.skills.len(),
            education_entries: profile.education.len(),
            experience_entries: profile.experience.len(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub candidate_name: String,
    #[serde(flatten)]
    pub result: CompatibilityResult,
    pub cv_summary: CvSummary,
    pub contact_info: ContactInfo,
}

struct UploadedFile {
    filename: String,
    content_type: Option<String>,
    content: Bytes,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/ats/requirements
///
/// Previews the skills the engine would look for in a job description.
pub async fn handle_requirements(
    State(state): State<AppState>,
    Json(request): Json<RequirementsRequest>,
) -> Result<Json<RequirementsResponse>, AppError> {
    validate_job_description(&request.job_description)?;
    let required_skills = state.engine.required_skills(&request.job_description);
    Ok(Json(RequirementsResponse { required_skills }))
}

/// POST /api/v1/ats/analyze
///
/// Scores an already-structured candidate profile against a job description.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    validate_job_description(&request.job_description)?;
    let response = analyze_profile(
        &state,
        request.job_description,
        request.candidate_name,
        request.candidate_profile,
    )
    .await?;
    Ok(Json(response))
}

/// POST /api/v1/ats/analyze/upload
///
/// Multipart form: `file` (PDF, DOCX or TXT resume), `job_description`,
/// optional `candidate_name`. The file is converted to text, parsed into a
/// profile and scored.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let mut upload: Option<UploadedFile> = None;
    let mut job_description: Option<String> = None;
    let mut candidate_name: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let content = field.bytes().await?;
                upload = Some(UploadedFile {
                    filename,
                    content_type,
                    content,
                });
            }
            "job_description" => job_description = Some(field.text().await?),
            "candidate_name" => candidate_name = Some(field.text().await?),
            _ => {}
        }
    }

    let job_description = job_description.unwrap_or_default();
    validate_job_description(&job_description)?;

    let upload = upload.ok_or_else(|| AppError::Validation("No CV file provided".to_string()))?;
    validate_upload(&upload, state.config.max_upload_bytes)?;

    let text = state
        .documents
        .extract_text(&upload.filename, upload.content)
        .await?;
    let profile = parse_profile(&text);

    let response = analyze_profile(&state, job_description, candidate_name, profile).await?;
    Ok(Json(response))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn analyze_profile(
    state: &AppState,
    job_description: String,
    candidate_name: Option<String>,
    profile: CandidateProfile,
) -> Result<AnalysisResponse, AppError> {
    let candidate_name = resolve_candidate_name(candidate_name.as_deref(), &profile.contact_info);
    let cv_summary = CvSummary::of(&profile);
    let contact_info = profile.contact_info.clone();

    let engine = Arc::clone(&state.engine);
    let result = run_blocking(
        state.config.analysis_timeout(),
        state.config.analysis_timeout_secs,
        move || engine.analyze(&job_description, &profile),
    )
    .await?;

    info!(
        candidate = %candidate_name,
        score = result.compatibility_score,
        matched = result.matched_skills.len(),
        missing = result.missing_skills.len(),
        "ATS analysis completed"
    );

    Ok(AnalysisResponse {
        candidate_name,
        result,
        cv_summary,
        contact_info,
    })
}

/// Runs CPU-bound work on the blocking pool, giving up after `timeout`.
async fn run_blocking<T, F>(timeout: Duration, timeout_secs: u64, work: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let task = tokio::task::spawn_blocking(work);
    match tokio::time::timeout(timeout, task).await {
        Ok(joined) => joined.map_err(|e| {
            AppError::Internal(anyhow::anyhow!("spawn_blocking failed in analysis: {e}"))
        }),
        Err(_) => Err(AppError::Timeout(timeout_secs)),
    }
}

fn validate_job_description(job_description: &str) -> Result<(), AppError> {
    if job_description.trim().chars().count() < MIN_JOB_DESCRIPTION_CHARS {
        return Err(AppError::Validation(format!(
            "Job description is too short (minimum {MIN_JOB_DESCRIPTION_CHARS} characters)"
        )));
    }
    Ok(())
}

fn validate_upload(upload: &UploadedFile, max_bytes: usize) -> Result<(), AppError> {
    if upload.content.is_empty() {
        return Err(AppError::Validation("Uploaded CV file is empty".to_string()));
    }
    if upload.content.len() > max_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "CV file exceeds the {max_bytes} byte limit"
        )));
    }
    if !is_allowed_content_type(upload.content_type.as_deref(), &upload.filename) {
        return Err(AppError::UnsupportedMediaType(format!(
            "Unsupported file type '{}'. Only PDF, DOCX and TXT are supported.",
            upload.content_type.as_deref().unwrap_or("unknown")
        )));
    }
    Ok(())
}

/// PDF, DOCX and plain-text content types are accepted as declared; a generic
/// or missing content type falls back to the file extension.
fn is_allowed_content_type(content_type: Option<&str>, filename: &str) -> bool {
    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase())
        .unwrap_or_default();
    match mime.as_str() {
        "application/pdf" | "text/plain" | DOCX_CONTENT_TYPE => true,
        "" | "application/octet-stream" => DocumentKind::from_filename(filename).is_some(),
        _ => false,
    }
}

fn resolve_candidate_name(requested: Option<&str>, contact: &ContactInfo) -> String {
    requested
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .or_else(|| contact.display_name())
        .unwrap_or(UNKNOWN_CANDIDATE)
        .to_string()
}
