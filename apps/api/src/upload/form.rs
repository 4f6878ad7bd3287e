//! Extraction of the upload form from a multipart body.

use axum::extract::Multipart;
use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;
use crate::storage::UploadFile;
use crate::upload::analyzer::AnalyzeRequest;

pub const FIELD_COMPANY_NAME: &str = "company-name";
pub const FIELD_JOB_TITLE: &str = "job-title";
pub const FIELD_JOB_DESCRIPTION: &str = "job-description";
pub const FIELD_FILE: &str = "file";

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Raw form values as they arrived. Text fields are kept verbatim.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub company_name: String,
    pub job_title: String,
    pub job_description: String,
    pub file: Option<UploadFile>,
}

impl UploadForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("could not read field '{name}': {e}")))?;

            match file_name {
                Some(file_name) if name == FIELD_FILE => {
                    form.accept_file(file_name, content_type, data)
                }
                _ => form.accept_text(&name, &String::from_utf8_lossy(&data)),
            }
        }

        Ok(form)
    }

    /// Stores a text field. Unknown fields are ignored.
    pub fn accept_text(&mut self, name: &str, value: &str) {
        let slot = match name {
            FIELD_COMPANY_NAME => &mut self.company_name,
            FIELD_JOB_TITLE => &mut self.job_title,
            FIELD_JOB_DESCRIPTION => &mut self.job_description,
            _ => {
                debug!("Ignoring unknown form field '{name}'");
                return;
            }
        };
        *slot = value.to_string();
    }

    /// Stores the file part. Browsers send an empty, unnamed part when no file
    /// was picked; that counts as no file.
    pub fn accept_file(&mut self, file_name: String, content_type: Option<String>, data: Bytes) {
        if file_name.is_empty() && data.is_empty() {
            return;
        }
        let content_type = content_type.unwrap_or_else(|| PDF_CONTENT_TYPE.to_string());
        self.file = Some(UploadFile::new(file_name, content_type, data));
    }

    /// Checks a file is present and is a non-empty PDF.
    pub fn into_request(self) -> Result<AnalyzeRequest, AppError> {
        let file = self
            .file
            .ok_or_else(|| AppError::Validation("a resume file is required".to_string()))?;

        if !is_pdf(&file) {
            return Err(AppError::Validation(format!(
                "'{}' is not a PDF file",
                file.name
            )));
        }
        if file.bytes.is_empty() {
            return Err(AppError::Validation(format!("'{}' is empty", file.name)));
        }

        Ok(AnalyzeRequest {
            company_name: self.company_name,
            job_title: self.job_title,
            job_description: self.job_description,
            file,
        })
    }
}

fn is_pdf(file: &UploadFile) -> bool {
    file.content_type.eq_ignore_ascii_case(PDF_CONTENT_TYPE)
        || file.name.to_ascii_lowercase().ends_with(".pdf")
}
