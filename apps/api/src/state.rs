use std::sync::Arc;

use crate::analysis::engine::AtsEngine;
use crate::analysis::vocabulary::SkillVocabulary;
use crate::config::Config;
use crate::profile::document::{DocumentExtractor, LocalDocumentExtractor};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Immutable after construction; shared by every in-flight analysis.
    pub engine: Arc<AtsEngine>,
    /// Pluggable document-to-text converter. Default: LocalDocumentExtractor.
    pub documents: Arc<dyn DocumentExtractor>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let engine = AtsEngine::new(SkillVocabulary::builtin(), config.thresholds.clone());
        Self {
            config,
            engine: Arc::new(engine),
            documents: Arc::new(LocalDocumentExtractor),
        }
    }
}
