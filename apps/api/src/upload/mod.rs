// Résumé upload flow: form extraction, the step-by-step analysis, and progress reporting.
// Collaborators (storage, KV, converter, AI, ids) are injected as trait objects.

pub mod analyzer;
pub mod form;
pub mod handlers;
pub mod status;

pub use analyzer::ResumeAnalyzer;
