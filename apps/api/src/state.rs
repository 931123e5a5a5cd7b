use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::export::renderer::PdfRenderer;
use crate::llm_client::TextGenerator;
use crate::matching::selector::VariationSelector;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    /// Text-generation client used by AI parsing and enhancement.
    pub llm: Arc<dyn TextGenerator>,
    pub config: Config,
    /// Pluggable variation selector. Default: LlmSelector. Swap via MATCHER_BACKEND.
    pub selector: Arc<dyn VariationSelector>,
    pub renderer: Arc<dyn PdfRenderer>,
}
