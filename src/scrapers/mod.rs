//! Restaurant menu scrapers.
//!
//! Every scraper follows the same two-phase pattern:
//!
//! 1. **Locate**: find today's section in the restaurant's page (or the
//!    image/PDF the page links to)
//! 2. **Extract**: turn that section into [`Meal`] records
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | Pizza Pizza | [`pizza`] | HTML scraping | Weekday picks the nth menu category |
//! | Kozel Tank Pub | [`kozel`] | HTML scraping | Day section matched by Slovak weekday name |
//! | Lindy Hop | [`lindy`] | Image OCR | Daily menu is a photo on the homepage |
//! | Bowling Erika | [`erika`] | PDF conversion | Daily menu is a linked PDF |
//!
//! Parsed [`Html`] documents are not `Send`, so each scraper confines them to
//! synchronous helpers that hand back owned data before the next `.await`.

use crate::error::{MenuError, Result};
use crate::models::{Meal, Restaurant};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

pub mod erika;
pub mod kozel;
pub mod lines;
pub mod lindy;
pub mod pizza;

/// One restaurant's menu source.
#[async_trait]
pub trait MenuSource: Send + Sync {
    fn restaurant(&self) -> Restaurant;

    /// Locate today's menu and extract its meals. Incomplete meals may be
    /// included; [`crate::models::Menu::new`] drops them.
    async fn scrape(&self) -> Result<Vec<Meal>>;
}

/// Concatenate every text node below `element`, in document order.
pub fn collect_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Parse a CSS selector, reporting failures as [`MenuError::Parse`].
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| MenuError::Parse(format!("selector \"{css}\": {e}")))
}

/// Trimmed text of the first element matching `css` under `element`, or an
/// empty string when nothing matches.
pub fn first_text(element: ElementRef<'_>, css: &str) -> Result<String> {
    let sel = selector(css)?;
    Ok(element
        .select(&sel)
        .next()
        .map(|el| collect_text(el).trim().to_string())
        .unwrap_or_default())
}

/// Parse `body` and return the trimmed, non-empty value of `attribute` on the
/// first element matching `css`.
pub fn first_attr(
    body: &str,
    css: &str,
    element: &'static str,
    attribute: &'static str,
) -> Result<String> {
    let document = Html::parse_document(body);
    let sel = selector(css)?;
    let el = document
        .select(&sel)
        .next()
        .ok_or_else(|| MenuError::SectionNotFound(format!("\"{css}\" didn't match any element")))?;

    el.value()
        .attr(attribute)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(MenuError::MissingAttribute { element, attribute })
}
