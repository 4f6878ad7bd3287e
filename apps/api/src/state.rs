use std::sync::Arc;

use crate::config::Config;
use crate::kv::KvStore;
use crate::upload::ResumeAnalyzer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The upload flow, wired to the production collaborators.
    pub analyzer: ResumeAnalyzer,
    /// Read side of the record store, used by the results view.
    pub kv: Arc<dyn KvStore>,
    pub config: Config,
}
