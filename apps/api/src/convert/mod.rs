//! PDF → image conversion for the résumé preview.

use async_trait::async_trait;
use thiserror::Error;

use crate::storage::UploadFile;

pub mod pdfium;

pub use pdfium::PdfiumConverter;

/// Result of a conversion. `file` is `None` when the document had nothing to render.
#[derive(Debug, Clone)]
pub struct ConvertedImage {
    pub file: Option<UploadFile>,
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to bind pdfium library: {0}")]
    Library(String),

    #[error("corrupt or unsupported PDF: {0}")]
    CorruptPdf(String),

    #[error("rasterisation failed: {0}")]
    Rasterisation(String),

    #[error("PNG encoding failed")]
    Encode(#[from] image::ImageError),

    #[error("conversion task panicked")]
    Join(#[from] tokio::task::JoinError),
}

#[async_trait]
pub trait PdfConverter: Send + Sync {
    async fn convert(&self, file: &UploadFile) -> Result<ConvertedImage, ConvertError>;
}

/// `resume.pdf` → `resume.png`; names without a `.pdf` suffix just gain `.png`.
pub fn png_name(pdf_name: &str) -> String {
    let stem = match pdf_name.len().checked_sub(4) {
        Some(split) if pdf_name.is_char_boundary(split)
            && pdf_name[split..].eq_ignore_ascii_case(".pdf") =>
        {
            &pdf_name[..split]
        }
        _ => pdf_name,
    };
    format!("{stem}.png")
}
