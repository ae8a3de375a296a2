//! Bowling Erika daily menu scraper.
//!
//! The homepage links the week's daily menu as a PDF from the `#denne-menu`
//! button. Once converted to text, each meal starts with `M<n>: <dish>`,
//! continues with further dish lines and ends with its price line.

use super::lines::{LineRules, MealStart, is_price_line, normalize_price, scan_meals};
use super::{MenuSource, first_attr};
use crate::error::{MenuError, Result};
use crate::models::{Meal, Restaurant};
use crate::services::{DocumentConverter, Fetcher};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use url::Url;

pub const ERIKA_URL: &str = "https://www.bowlingerika.sk/";

const MENU_LINK_CSS: &str = "#denne-menu .elementor-button-link";

static FIRST_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(M\d+):(.*)$").expect("valid first line regex"));

pub struct ErikaSource {
    fetcher: Arc<dyn Fetcher>,
    converter: Arc<dyn DocumentConverter>,
}

impl ErikaSource {
    pub fn new(fetcher: Arc<dyn Fetcher>, converter: Arc<dyn DocumentConverter>) -> Self {
        ErikaSource { fetcher, converter }
    }
}

/// Resolve the daily menu PDF's URL from the homepage.
pub fn locate_pdf(body: &str, base: &str) -> Result<String> {
    let href = first_attr(body, MENU_LINK_CSS, "a", "href")?;
    let base = Url::parse(base).map_err(|e| MenuError::Parse(format!("base URL {base}: {e}")))?;
    base.join(&href)
        .map(String::from)
        .map_err(|e| MenuError::Parse(format!("PDF URL {href}: {e}")))
}

/// Line rules for the converted menu PDF.
pub struct ErikaRules;

impl LineRules for ErikaRules {
    fn meal_start(&self, line: &str) -> Option<MealStart> {
        let caps = FIRST_LINE_RE.captures(line)?;
        Some(MealStart {
            name: caps[1].trim().to_string(),
            price: None,
            first_dish: Some(caps[2].trim())
                .filter(|dish| !dish.is_empty())
                .map(str::to_string),
        })
    }

    fn price_line(&self, line: &str) -> Option<String> {
        is_price_line(line).then(|| normalize_price(line))
    }
}

pub fn parse_text(text: &str) -> Vec<Meal> {
    scan_meals(&ErikaRules, text.lines())
}

#[async_trait]
impl MenuSource for ErikaSource {
    fn restaurant(&self) -> Restaurant {
        Restaurant::Erika
    }

    #[instrument(level = "info", skip_all, fields(restaurant = "Erika"))]
    async fn scrape(&self) -> Result<Vec<Meal>> {
        info!(url = ERIKA_URL, "Downloading homepage");
        let body = self.fetcher.fetch_text(ERIKA_URL).await?;
        debug!(bytes = body.len(), "Selecting daily menu PDF link");

        let pdf_url = locate_pdf(&body, ERIKA_URL)?;
        info!(url = %pdf_url, "Downloading menu PDF");
        let pdf = self.fetcher.fetch(&pdf_url).await?;

        let text = self.converter.convert(&pdf).await?;
        debug!(lines = text.lines().count(), "Parsing converted lines");

        let meals = parse_text(&text);
        info!(count = meals.len(), "Parsed Erika meals");
        Ok(meals)
    }
}
