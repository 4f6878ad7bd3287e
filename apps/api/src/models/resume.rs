use serde::{Deserialize, Serialize};

use crate::models::feedback::Feedback;

/// Key-value key under which a record is stored.
pub fn record_key(id: &str) -> String {
    format!("resume:{id}")
}

/// Route of the results view for a record.
pub fn results_route(id: &str) -> String {
    format!("/resume/{id}")
}

/// Metadata and feedback for one analysed résumé.
///
/// Persisted twice per analysis: once with `feedback: null`, once with the
/// parsed feedback. Never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    pub id: String,
    pub resume_path: String,
    pub image_path: String,
    pub company_name: String,
    pub job_title: String,
    pub job_description: String,
    pub feedback: Option<Feedback>,
}

impl ResumeRecord {
    pub fn key(&self) -> String {
        record_key(&self.id)
    }
}
