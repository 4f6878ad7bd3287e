//! The résumé analysis flow.
//!
//! A straight line of awaited steps, each gated on the previous one:
//! upload PDF → render image → upload image → persist record → AI feedback →
//! persist record again. Any failure ends the flow with a step-specific
//! `AnalyzeError`; nothing already written is rolled back.

use std::sync::Arc;

use tracing::{debug, info};

use crate::convert::PdfConverter;
use crate::errors::AnalyzeError;
use crate::ids::IdGenerator;
use crate::kv::{KvError, KvStore};
use crate::llm_client::prompts::prepare_instructions;
use crate::llm_client::{strip_json_fences, AiResponse, FeedbackClient, LlmError};
use crate::models::feedback::Feedback;
use crate::models::resume::{results_route, ResumeRecord};
use crate::storage::{FileStore, UploadFile};
use crate::upload::status::{AnalysisStep, StatusReporter};

/// One submission of the upload form.
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub company_name: String,
    pub job_title: String,
    pub job_description: String,
    pub file: UploadFile,
}

/// A finished analysis and where to send the user next.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub record: ResumeRecord,
    pub redirect_to: String,
}

#[derive(Clone)]
pub struct ResumeAnalyzer {
    files: Arc<dyn FileStore>,
    kv: Arc<dyn KvStore>,
    converter: Arc<dyn PdfConverter>,
    ai: Arc<dyn FeedbackClient>,
    ids: Arc<dyn IdGenerator>,
}

impl ResumeAnalyzer {
    pub fn new(
        files: Arc<dyn FileStore>,
        kv: Arc<dyn KvStore>,
        converter: Arc<dyn PdfConverter>,
        ai: Arc<dyn FeedbackClient>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            files,
            kv,
            converter,
            ai,
            ids,
        }
    }

    /// Runs the whole flow, reporting each step to `status`.
    pub async fn analyze(
        &self,
        request: AnalyzeRequest,
        status: &dyn StatusReporter,
    ) -> Result<AnalysisOutcome, AnalyzeError> {
        let result = self.run(request, status).await;
        if let Err(e) = &result {
            status.on_failure(e);
        }
        result
    }

    async fn run(
        &self,
        request: AnalyzeRequest,
        status: &dyn StatusReporter,
    ) -> Result<AnalysisOutcome, AnalyzeError> {
        let AnalyzeRequest {
            company_name,
            job_title,
            job_description,
            file,
        } = request;

        // 1. Original PDF
        status.on_step(AnalysisStep::UploadingFile);
        let uploaded_file = self
            .files
            .upload(&file)
            .await
            .map_err(AnalyzeError::Upload)?;
        info!(
            "Resume uploaded: {} ({}, {} bytes)",
            uploaded_file.path, uploaded_file.content_type, uploaded_file.size
        );

        // 2. First page → PNG
        status.on_step(AnalysisStep::Converting);
        let image = self
            .converter
            .convert(&file)
            .await
            .map_err(AnalyzeError::Conversion)?
            .file
            .ok_or(AnalyzeError::NoImage)?;
        debug!("PDF converted to image: {} ({} bytes)", image.name, image.size());

        // 3. Preview image
        status.on_step(AnalysisStep::UploadingImage);
        let uploaded_image = self
            .files
            .upload(&image)
            .await
            .map_err(AnalyzeError::ImageUpload)?;
        info!("Image uploaded: {} as {}", uploaded_image.name, uploaded_image.path);

        // 4. Record without feedback
        status.on_step(AnalysisStep::Preparing);
        let mut record = ResumeRecord {
            id: self.ids.next_id(),
            resume_path: uploaded_file.path,
            image_path: uploaded_image.path,
            company_name,
            job_title,
            job_description,
            feedback: None,
        };
        self.persist(&record).await?;

        // 5. Feedback, then persist again under the same key
        status.on_step(AnalysisStep::Analyzing);
        let instructions = prepare_instructions(&record.job_title, &record.job_description);
        let response = self
            .ai
            .feedback(&record.resume_path, &instructions)
            .await
            .map_err(AnalyzeError::Feedback)?;

        let feedback = parse_feedback(&response).map_err(AnalyzeError::InvalidFeedback)?;
        debug!(
            "Feedback parsed: overall score {:?}, {} tips to improve",
            feedback.overall_score(),
            feedback.improvement_count()
        );
        record.feedback = Some(feedback);
        self.persist(&record).await?;

        status.on_step(AnalysisStep::Complete);
        info!("Analysis complete for resume {}", record.id);

        let redirect_to = results_route(&record.id);
        Ok(AnalysisOutcome {
            record,
            redirect_to,
        })
    }

    async fn persist(&self, record: &ResumeRecord) -> Result<(), AnalyzeError> {
        let value = serde_json::to_string(record).map_err(KvError::from)?;
        self.kv.set(&record.key(), &value).await?;
        debug!("Persisted {} ({} bytes)", record.key(), value.len());
        Ok(())
    }
}

/// Parses the model's reply into `Feedback`, accepting both string and block content.
/// Any JSON object is accepted; fields the model added are kept.
pub fn parse_feedback(response: &AiResponse) -> Result<Feedback, LlmError> {
    let text = response.text().ok_or(LlmError::EmptyContent)?;
    Ok(serde_json::from_str(strip_json_fences(text))?)
}
