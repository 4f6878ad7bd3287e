//! Progress of a single analysis, as an explicit step rather than free text.

use tracing::{error, info};

use crate::errors::{error_chain, AnalyzeError};

/// The step an analysis is currently in. Steps only ever move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStep {
    UploadingFile,
    Converting,
    UploadingImage,
    Preparing,
    Analyzing,
    Complete,
}

impl AnalysisStep {
    pub fn status_text(self) -> &'static str {
        match self {
            AnalysisStep::UploadingFile => "Uploading file...",
            AnalysisStep::Converting => "Converting to image...",
            AnalysisStep::UploadingImage => "Uploading the image...",
            AnalysisStep::Preparing => "Preparing data...",
            AnalysisStep::Analyzing => "Analyzing...",
            AnalysisStep::Complete => "Analysis complete, redirecting...",
        }
    }
}

/// Receives progress events from `ResumeAnalyzer`.
///
/// Both methods default to no-ops so callers only override what they need.
pub trait StatusReporter: Send + Sync {
    fn on_step(&self, step: AnalysisStep) {
        let _ = step;
    }

    /// Called once when the analysis stops on an error. No further events follow.
    fn on_failure(&self, error: &AnalyzeError) {
        let _ = error;
    }
}

/// Writes progress to the tracing subscriber.
pub struct TracingStatus;

impl StatusReporter for TracingStatus {
    fn on_step(&self, step: AnalysisStep) {
        info!("{}", step.status_text());
    }

    fn on_failure(&self, error: &AnalyzeError) {
        error!("{}: {}", error.status_text(), error_chain(error));
    }
}
