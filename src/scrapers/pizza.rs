//! Pizza Pizza daily menu scraper.
//!
//! The terrace menu page lists one `.menuCategory` per weekday, Monday first,
//! under `#ObedoveMenuu`. Each `.menuItemBox` inside holds a meal's name,
//! price and one `.rteBlock` per dish line.

use super::{MenuSource, collect_text, first_text, lines::normalize_price, selector};
use crate::error::{MenuError, Result};
use crate::models::{Meal, Restaurant};
use crate::services::{Calendar, Fetcher};
use async_trait::async_trait;
use scraper::{ElementRef, Html};
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub const PIZZA_URL: &str = "https://www.pizza-pizza.sk/menu---terasa";

pub struct PizzaSource {
    fetcher: Arc<dyn Fetcher>,
    calendar: Arc<dyn Calendar>,
}

impl PizzaSource {
    pub fn new(fetcher: Arc<dyn Fetcher>, calendar: Arc<dyn Calendar>) -> Self {
        PizzaSource { fetcher, calendar }
    }
}

/// Selector for today's category; nth-of-type is 1-based with Monday = 1.
fn day_selector(weekday: usize) -> String {
    format!("#ObedoveMenuu .menuCategory:nth-of-type({})", weekday + 1)
}

/// Find today's category in the page and extract its meals.
pub fn parse_page(body: &str, weekday: usize) -> Result<Vec<Meal>> {
    let document = Html::parse_document(body);
    let day_css = day_selector(weekday);
    debug!(selector = %day_css, "Selecting daily menu element");

    let day = document
        .select(&selector(&day_css)?)
        .next()
        .ok_or_else(|| MenuError::SectionNotFound(format!("\"{day_css}\" didn't match any element")))?;

    extract_meals(day)
}

fn extract_meals(day: ElementRef<'_>) -> Result<Vec<Meal>> {
    let item_sel = selector(".menuItemBox")?;
    let items: Vec<_> = day.select(&item_sel).collect();
    if items.is_empty() {
        return Err(MenuError::SectionNotFound(
            "\".menuItemBox\" didn't match any element".into(),
        ));
    }

    debug!(count = items.len(), "Parsing meal elements");
    let dish_sel = selector(".rteBlock")?;

    let mut meals = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let meal = Meal {
            name: first_text(item, ".menuItemName")?,
            price: normalize_price(&first_text(item, ".menuItemPrice")?),
            dishes: item
                .select(&dish_sel)
                .map(|el| collect_text(el).trim().to_string())
                .filter(|line| !line.is_empty())
                .collect(),
        };

        if !meal.is_complete() {
            debug!(index, "Meal has no name, price or dishes");
            continue;
        }
        debug!(index, name = %meal.name, "Parsed meal");
        meals.push(meal);
    }
    Ok(meals)
}

#[async_trait]
impl MenuSource for PizzaSource {
    fn restaurant(&self) -> Restaurant {
        Restaurant::Pizza
    }

    #[instrument(level = "info", skip_all, fields(restaurant = "Pizza"))]
    async fn scrape(&self) -> Result<Vec<Meal>> {
        info!(url = PIZZA_URL, "Downloading menu page");
        let body = self.fetcher.fetch_text(PIZZA_URL).await?;
        debug!(bytes = body.len(), "Parsing menu page");

        let meals = parse_page(&body, self.calendar.weekday())?;
        info!(count = meals.len(), "Parsed Pizza meals");
        Ok(meals)
    }
}
