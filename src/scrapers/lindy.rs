//! Lindy Hop daily menu scraper.
//!
//! The homepage only shows a photo of the daily menu (`#DenneMenu img`), so
//! the photo is downloaded and run through OCR. Each meal in the recognized
//! text starts with a `"<name> <price> €"` line followed by its dishes, with
//! allergen codes trailing each dish line.

use super::lines::{LineRules, MealStart, normalize_price, scan_meals};
use super::{MenuSource, first_attr};
use crate::error::{MenuError, Result};
use crate::models::{Meal, Restaurant};
use crate::services::{Fetcher, TextRecognizer};
use crate::utils::truncate_for_log;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use url::Url;

pub const LINDY_URL: &str = "http://www.lindyhop.sk/";

const MENU_IMAGE_CSS: &str = "#DenneMenu img";
/// Marks the start of the drinks/dessert offer below the lunch menu.
const NOISE_MARKER: &str = "Ponuka ";

static NAME_PRICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.+?) (\d+,\d+)\s+€").expect("valid name/price regex"));
static ALLERGENS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" [^ ]*\d[^ ]*$").expect("valid allergens regex"));

pub struct LindySource {
    fetcher: Arc<dyn Fetcher>,
    ocr: Arc<dyn TextRecognizer>,
}

impl LindySource {
    pub fn new(fetcher: Arc<dyn Fetcher>, ocr: Arc<dyn TextRecognizer>) -> Self {
        LindySource { fetcher, ocr }
    }
}

/// Resolve the daily menu photo's URL from the homepage.
pub fn locate_image(body: &str, base: &str) -> Result<String> {
    let src = first_attr(body, MENU_IMAGE_CSS, "img", "src")?;
    let base = Url::parse(base).map_err(|e| MenuError::Parse(format!("base URL {base}: {e}")))?;
    base.join(&src)
        .map(String::from)
        .map_err(|e| MenuError::Parse(format!("image URL {src}: {e}")))
}

/// Line rules for the OCR'd menu photo.
pub struct LindyRules;

impl LineRules for LindyRules {
    /// Any line ending in `€` opens a meal. A line that does not parse still
    /// opens one, with an empty name, so its dishes don't leak into the
    /// previous meal; it is dropped later as incomplete.
    fn meal_start(&self, line: &str) -> Option<MealStart> {
        if !line.ends_with('€') {
            return None;
        }
        let line = line.replace('.', ",");
        let start = NAME_PRICE_RE
            .captures(&line)
            .map(|caps| MealStart {
                name: caps[1].trim().to_string(),
                price: Some(normalize_price(&caps[2])),
                first_dish: None,
            })
            .unwrap_or_default();
        Some(start)
    }

    fn is_noise(&self, line: &str) -> bool {
        line.contains(NOISE_MARKER)
    }

    fn clean_dish(&self, line: &str) -> String {
        ALLERGENS_RE.replace(line, "").into_owned()
    }

    fn restarts_open_meal(&self) -> bool {
        true
    }
}

pub fn parse_text(text: &str) -> Vec<Meal> {
    scan_meals(&LindyRules, text.lines())
}

#[async_trait]
impl MenuSource for LindySource {
    fn restaurant(&self) -> Restaurant {
        Restaurant::Lindy
    }

    #[instrument(level = "info", skip_all, fields(restaurant = "Lindy"))]
    async fn scrape(&self) -> Result<Vec<Meal>> {
        info!(url = LINDY_URL, "Downloading homepage");
        let body = self.fetcher.fetch_text(LINDY_URL).await?;
        debug!(bytes = body.len(), "Selecting daily menu image");

        let image_url = locate_image(&body, LINDY_URL)?;
        info!(url = %image_url, "Downloading menu image");
        let image = self.fetcher.fetch(&image_url).await?;

        debug!(bytes = image.len(), "Recognizing text in menu image");
        let text = self.ocr.recognize(&image).await?;
        debug!(preview = %truncate_for_log(&text, 200), "Parsing recognized lines");

        let meals = parse_text(&text);
        info!(count = meals.len(), "Parsed Lindy meals");
        Ok(meals)
    }
}
