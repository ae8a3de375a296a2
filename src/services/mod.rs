//! Collaborators the extractors depend on, behind swappable traits.
//!
//! | Trait | Production impl | Purpose |
//! |-------|-----------------|---------|
//! | [`Fetcher`] | [`http::ReqwestFetcher`] | Download pages, images and PDFs |
//! | [`TextRecognizer`] | [`ocr::TesseractOcr`] | Read text from a menu photo |
//! | [`DocumentConverter`] | [`pdf::PdfToText`] | Turn a PDF into plain text |
//! | [`Calendar`] | [`calendar::SystemCalendar`] | Resolve today's weekday |
//!
//! The async traits go through `async-trait` so the sources can hold them as
//! `Arc<dyn ...>` and still be spawned onto the runtime.

use crate::error::Result;
use async_trait::async_trait;

pub mod calendar;
pub mod http;
pub mod ocr;
pub mod pdf;

pub use calendar::Calendar;

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Download the raw body behind `url`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;

    /// Download `url` and decode it as (lossy) UTF-8.
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let bytes = self.fetch(url).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image: &[u8]) -> Result<String>;
}

#[async_trait]
pub trait DocumentConverter: Send + Sync {
    async fn convert(&self, pdf: &[u8]) -> Result<String>;
}

#[cfg(test)]
pub mod fakes {
    //! In-memory collaborators for tests.

    use super::*;
    use crate::error::MenuError;
    use std::collections::HashMap;

    /// Serves canned bodies by URL; unknown URLs fail like a dead host.
    #[derive(Debug, Default)]
    pub struct StaticFetcher {
        pages: HashMap<String, Vec<u8>>,
    }

    impl StaticFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
            self.pages.insert(url.to_string(), body.into());
            self
        }
    }

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| MenuError::fetch(url, "connection refused"))
        }
    }

    /// Returns the same text for any image, or fails when built with `failing`.
    #[derive(Debug)]
    pub struct StaticRecognizer(pub Option<String>);

    impl StaticRecognizer {
        pub fn text(text: &str) -> Self {
            StaticRecognizer(Some(text.to_string()))
        }

        pub fn failing() -> Self {
            StaticRecognizer(None)
        }
    }

    #[async_trait]
    impl TextRecognizer for StaticRecognizer {
        async fn recognize(&self, _image: &[u8]) -> Result<String> {
            self.0
                .clone()
                .ok_or_else(|| MenuError::Conversion("tesseract exited with status 1".into()))
        }
    }

    #[derive(Debug)]
    pub struct StaticConverter(pub Option<String>);

    impl StaticConverter {
        pub fn text(text: &str) -> Self {
            StaticConverter(Some(text.to_string()))
        }

        pub fn failing() -> Self {
            StaticConverter(None)
        }
    }

    #[async_trait]
    impl DocumentConverter for StaticConverter {
        async fn convert(&self, _pdf: &[u8]) -> Result<String> {
            self.0
                .clone()
                .ok_or_else(|| MenuError::Conversion("pdftotext exited with status 1".into()))
        }
    }
}
