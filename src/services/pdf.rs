//! PDF-to-text conversion through the `pdftotext` command line tool.
//!
//! `pdftotext` only works on files, so each call writes the PDF into its own
//! temporary directory. The directory has a unique name per call and is
//! removed when it goes out of scope, on success and on every error path.

use super::DocumentConverter;
use crate::error::{MenuError, Result};
use crate::utils::truncate_for_log;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, instrument};

const PDF_NAME: &str = "menu.pdf";
const TXT_NAME: &str = "menu.txt";

#[derive(Debug, Clone)]
pub struct PdfToText {
    binary: String,
    scratch_root: Option<PathBuf>,
}

impl PdfToText {
    pub fn new(binary: impl Into<String>) -> Self {
        PdfToText {
            binary: binary.into(),
            scratch_root: None,
        }
    }

    /// Create scratch directories under `root` instead of the system temp dir.
    pub fn with_scratch_root(mut self, root: Option<PathBuf>) -> Self {
        self.scratch_root = root;
        self
    }
}

#[async_trait]
impl DocumentConverter for PdfToText {
    #[instrument(level = "info", skip_all, fields(bytes = pdf.len()))]
    async fn convert(&self, pdf: &[u8]) -> Result<String> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("menucko-pdf-");
        let scratch = match &self.scratch_root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        let pdf_path = scratch.path().join(PDF_NAME);
        let txt_path = scratch.path().join(TXT_NAME);

        debug!(path = %pdf_path.display(), "Saving PDF for conversion");
        fs::write(&pdf_path, pdf).await?;

        let output = Command::new(&self.binary)
            .arg(&pdf_path)
            .arg(&txt_path)
            .output()
            .await
            .map_err(|e| MenuError::Conversion(format!("starting {}: {e}", self.binary)))?;

        if !output.status.success() {
            return Err(MenuError::Conversion(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let text = fs::read(&txt_path).await?;
        let text = String::from_utf8_lossy(&text).into_owned();
        debug!(preview = %truncate_for_log(&text, 200), "Converted PDF");
        Ok(text)
    }
}
