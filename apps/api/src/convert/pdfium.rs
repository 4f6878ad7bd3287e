//! First-page rasterisation via pdfium.
//!
//! The library is bound once at startup and shared by every conversion.
//! Rendering is CPU-bound, so it runs inside `tokio::task::spawn_blocking`.
//! The rendered image is capped by its longest edge rather than by DPI, which
//! keeps memory bounded for oversized pages.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use image::DynamicImage;
use pdfium_render::prelude::*;
use tracing::{debug, info};

use crate::convert::{png_name, ConvertError, ConvertedImage, PdfConverter};
use crate::storage::UploadFile;

#[derive(Clone)]
pub struct PdfiumConverter {
    pdfium: Arc<Pdfium>,
    max_pixels: u32,
}

impl PdfiumConverter {
    /// Loads pdfium from `lib_dir`, or from the system library path when `None`.
    pub fn bind(lib_dir: Option<&Path>, max_pixels: u32) -> Result<Self, ConvertError> {
        let bindings = match lib_dir {
            Some(dir) => {
                let path = Pdfium::pdfium_platform_library_name_at_path(dir);
                Pdfium::bind_to_library(&path)
            }
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| ConvertError::Library(format!("{:?}", e)))?;

        Ok(Self {
            pdfium: Arc::new(Pdfium::new(bindings)),
            max_pixels,
        })
    }

    fn render_first_page(&self, pdf: &[u8]) -> Result<Option<DynamicImage>, ConvertError> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(pdf, None)
            .map_err(|e| ConvertError::CorruptPdf(format!("{:?}", e)))?;

        let pages = document.pages();
        if pages.len() == 0 {
            return Ok(None);
        }
        info!("PDF loaded: {} pages, rendering page 1", pages.len());

        let render_config = PdfRenderConfig::new()
            .set_target_width(self.max_pixels as i32)
            .set_maximum_height(self.max_pixels as i32);

        let page = pages
            .get(0)
            .map_err(|e| ConvertError::Rasterisation(format!("{:?}", e)))?;
        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| ConvertError::Rasterisation(format!("{:?}", e)))?;

        let image = bitmap.as_image();
        debug!("Rendered page 1 → {}x{} px", image.width(), image.height());
        Ok(Some(image))
    }
}

/// Encodes an image as PNG. Lossless keeps rendered text crisp.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    Ok(buf)
}

#[async_trait]
impl PdfConverter for PdfiumConverter {
    async fn convert(&self, file: &UploadFile) -> Result<ConvertedImage, ConvertError> {
        let converter = self.clone();
        let pdf = file.bytes.clone();
        let name = png_name(&file.name);

        tokio::task::spawn_blocking(move || {
            let Some(image) = converter.render_first_page(&pdf)? else {
                return Ok(ConvertedImage { file: None });
            };
            let png = encode_png(&image)?;
            debug!("Encoded {} → {} bytes PNG", name, png.len());
            Ok(ConvertedImage {
                file: Some(UploadFile::new(name, "image/png", Bytes::from(png))),
            })
        })
        .await?
    }
}
