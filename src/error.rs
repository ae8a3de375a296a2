//! Error taxonomy for a single source extraction.
//!
//! Every variant is caught at the source-task boundary in
//! [`crate::orchestrator`] and converted into the failed-menu sentinel, so none
//! of these ever reach the rendered batch.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MenuError {
    /// Network or transport failure, including non-success HTTP statuses.
    #[error("fetching {url} failed: {message}")]
    Fetch { url: String, message: String },

    /// The document or a selector could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// The locator heuristic did not find today's section.
    #[error("section not found: {0}")]
    SectionNotFound(String),

    #[error("\"{element}\" element has no \"{attribute}\" attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    /// OCR or PDF-to-text collaborator failure.
    #[error("conversion failed: {0}")]
    Conversion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything not anticipated above, e.g. a panic inside a source task.
    #[error("unexpected fault: {0}")]
    Unexpected(String),
}

pub type Result<T> = std::result::Result<T, MenuError>;

impl MenuError {
    pub fn fetch(url: &str, message: impl ToString) -> Self {
        MenuError::Fetch {
            url: url.to_string(),
            message: message.to_string(),
        }
    }
}
