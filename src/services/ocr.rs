//! Menu-photo OCR through the `tesseract` command line tool.
//!
//! The photo is small and low contrast, so it is upscaled ×4, given more
//! contrast and sharpened before recognition. Tesseract reads the PNG from
//! stdin and writes the text to stdout; no files touch the disk.

use super::TextRecognizer;
use crate::error::{MenuError, Result};
use crate::utils::truncate_for_log;
use async_trait::async_trait;
use image::imageops::FilterType;
use image::ImageFormat;
use std::io::Cursor;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument};

const UPSCALE: u32 = 4;
const CONTRAST: f32 = 10.0;
const SHARPEN_SIGMA: f32 = 4.0;
/// Tesseract page segmentation mode "single uniform block of text".
const PAGE_SEG_MODE: &str = "6";

#[derive(Debug, Clone)]
pub struct TesseractOcr {
    binary: String,
    language: String,
}

impl TesseractOcr {
    pub fn new(binary: impl Into<String>, language: impl Into<String>) -> Self {
        TesseractOcr {
            binary: binary.into(),
            language: language.into(),
        }
    }
}

/// Decode, enhance and re-encode the photo as PNG.
pub fn prepare_image(bytes: &[u8]) -> Result<Vec<u8>> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| MenuError::Conversion(format!("decoding menu image: {e}")))?;

    let img = img
        .resize_exact(img.width() * UPSCALE, img.height() * UPSCALE, FilterType::Lanczos3)
        .adjust_contrast(CONTRAST)
        .unsharpen(SHARPEN_SIGMA, 0);

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| MenuError::Conversion(format!("encoding menu image: {e}")))?;
    Ok(png)
}

#[async_trait]
impl TextRecognizer for TesseractOcr {
    #[instrument(level = "info", skip_all, fields(bytes = image.len(), lang = %self.language))]
    async fn recognize(&self, image: &[u8]) -> Result<String> {
        let raw = image.to_vec();
        let png = tokio::task::spawn_blocking(move || prepare_image(&raw))
            .await
            .map_err(|e| MenuError::Unexpected(format!("image preparation task: {e}")))??;
        debug!(png_bytes = png.len(), "Prepared image for OCR");

        let mut child = Command::new(&self.binary)
            .args(["stdin", "stdout", "-l", self.language.as_str(), "--psm", PAGE_SEG_MODE])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| MenuError::Conversion(format!("starting {}: {e}", self.binary)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&png).await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(MenuError::Conversion(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(preview = %truncate_for_log(&text, 200), "Recognized text");
        Ok(text)
    }
}
