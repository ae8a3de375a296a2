//! Kozel Tank Pub daily menu scraper.
//!
//! The lunch page carries the whole week as `.daily-menu` blocks, each headed
//! by an `h3` that starts with the Slovak weekday name. Inside today's block,
//! soups (`.polievky`) are folded into a single meal and every main course
//! (`.hlavne`) is a meal of its own.

use super::{MenuSource, collect_text, first_text, lines::normalize_price, selector};
use crate::error::{MenuError, Result};
use crate::models::{Meal, Restaurant};
use crate::services::{Calendar, Fetcher};
use async_trait::async_trait;
use scraper::{ElementRef, Html};
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub const KOZEL_URL: &str = "http://kozeltankpub.sk/obedove-menu/";

const NAME_CSS: &str = "span:first-of-type";
const PRICE_CSS: &str = ".menu-price";
const DISH_CSS: &str = "p";

pub struct KozelSource {
    fetcher: Arc<dyn Fetcher>,
    calendar: Arc<dyn Calendar>,
}

impl KozelSource {
    pub fn new(fetcher: Arc<dyn Fetcher>, calendar: Arc<dyn Calendar>) -> Self {
        KozelSource { fetcher, calendar }
    }
}

/// Find the `.daily-menu` block whose heading starts with `day_name`
/// (case-insensitive).
fn locate_day<'a>(document: &'a Html, day_name: &str) -> Result<ElementRef<'a>> {
    let day_name = day_name.to_lowercase();
    let heading_sel = selector("h3")?;

    let candidates: Vec<_> = document
        .select(&selector(".entry-content .daily-menu")?)
        .collect();
    if candidates.is_empty() {
        return Err(MenuError::SectionNotFound(
            "\".entry-content .daily-menu\" didn't match any element".into(),
        ));
    }

    debug!(day = %day_name, candidates = candidates.len(), "Looking for today's menu block");
    candidates
        .into_iter()
        .find(|block| {
            block
                .select(&heading_sel)
                .next()
                .map(|h| collect_text(h).trim().to_lowercase())
                .is_some_and(|heading| heading.starts_with(&day_name))
        })
        .ok_or_else(|| MenuError::SectionNotFound(format!("no daily menu block for \"{day_name}\"")))
}

/// Fold all soups into one meal named after the first soup holder.
fn extract_soups(day: ElementRef<'_>) -> Result<Option<Meal>> {
    let holders: Vec<_> = day.select(&selector(".polievky .menu-holder")?).collect();
    let Some(first) = holders.first() else {
        return Ok(None);
    };

    let mut price = String::new();
    let mut dishes = Vec::new();
    for holder in &holders {
        if price.is_empty() {
            price = normalize_price(&first_text(*holder, PRICE_CSS)?);
        }
        let dish = first_text(*holder, DISH_CSS)?;
        if !dish.is_empty() {
            dishes.push(dish);
        }
    }

    Ok(Some(Meal {
        name: first_text(*first, NAME_CSS)?,
        price,
        dishes,
    }))
}

fn extract_meals(day: ElementRef<'_>) -> Result<Vec<Meal>> {
    let mut meals = Vec::new();

    debug!("Parsing soups");
    match extract_soups(day)? {
        Some(soups) if soups.is_complete() => meals.push(soups),
        Some(soups) => debug!(name = %soups.name, "Soups have no name, price or dishes"),
        None => {}
    }

    debug!("Parsing main meals");
    let mains: Vec<_> = day.select(&selector(".hlavne .menu-holder")?).collect();
    if mains.is_empty() {
        return Err(MenuError::SectionNotFound(
            "\".hlavne .menu-holder\" didn't match any element".into(),
        ));
    }

    for (index, main) in mains.into_iter().enumerate() {
        let dish = first_text(main, DISH_CSS)?;
        let meal = Meal {
            name: first_text(main, NAME_CSS)?,
            price: normalize_price(&first_text(main, PRICE_CSS)?),
            dishes: if dish.is_empty() { Vec::new() } else { vec![dish] },
        };

        if !meal.is_complete() {
            debug!(index, "Meal has no name, price or dish");
            continue;
        }
        debug!(index, name = %meal.name, "Parsed meal");
        meals.push(meal);
    }
    Ok(meals)
}

pub fn parse_page(body: &str, day_name: &str) -> Result<Vec<Meal>> {
    let document = Html::parse_document(body);
    let day = locate_day(&document, day_name)?;
    extract_meals(day)
}

#[async_trait]
impl MenuSource for KozelSource {
    fn restaurant(&self) -> Restaurant {
        Restaurant::Kozel
    }

    #[instrument(level = "info", skip_all, fields(restaurant = "Kozel"))]
    async fn scrape(&self) -> Result<Vec<Meal>> {
        info!(url = KOZEL_URL, "Downloading menu page");
        let body = self.fetcher.fetch_text(KOZEL_URL).await?;
        debug!(bytes = body.len(), "Parsing menu page");

        let meals = parse_page(&body, self.calendar.localized_weekday())?;
        info!(count = meals.len(), "Parsed Kozel meals");
        Ok(meals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::calendar::FixedCalendar;
    use crate::services::fakes::StaticFetcher;

    const PAGE: &str = r#"
        <html><body><div class="entry-content">
          <div class="daily-menu">
            <h3>PONDELOK 14.10.</h3>
            <div class="hlavne">
              <div class="menu-holder"><span>Menu 1</span><span class="menu-price">7.20</span><p>Rezeň</p></div>
            </div>
          </div>
          <div class="daily-menu">
            <h3> Štvrtok 17.10. </h3>
            <div class="polievky">
              <div class="menu-holder"><span>Polievka</span><span class="menu-price">1.50</span><p>Hrachová</p></div>
              <div class="menu-holder"><span>Polievka</span><p>Slepačí vývar</p></div>
            </div>
            <div class="hlavne">
              <div class="menu-holder"><span>Menu 1</span><span class="menu-price">7.90 €</span><p>Kuracie stehno, zemiaky</p></div>
              <div class="menu-holder"><span>Menu 2</span><span class="menu-price"></span><p>Vyprážaný syr</p></div>
              <div class="menu-holder"><span>Menu 3</span><span class="menu-price">8</span><p>Bravčová panenka</p></div>
            </div>
          </div>
          <div class="daily-menu">
            <h3>Piatok 18.10.</h3>
            <div class="polievky">
              <div class="menu-holder"><span>Polievka</span><p>Gulášová</p></div>
            </div>
          </div>
        </div></body></html>
    "#;

    #[test]
    fn test_parse_thursday() {
        let meals = parse_page(PAGE, "Štvrtok").unwrap();
        assert_eq!(
            meals,
            vec![
                Meal {
                    name: "Polievka".into(),
                    price: "1,50€".into(),
                    dishes: vec!["Hrachová".into(), "Slepačí vývar".into()],
                },
                Meal {
                    name: "Menu 1".into(),
                    price: "7,90 €".into(),
                    dishes: vec!["Kuracie stehno, zemiaky".into()],
                },
                Meal {
                    name: "Menu 3".into(),
                    price: "8€".into(),
                    dishes: vec!["Bravčová panenka".into()],
                },
            ]
        );
    }

    #[test]
    fn test_heading_match_is_case_insensitive() {
        let meals = parse_page(PAGE, "Pondelok").unwrap();
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].dishes, vec!["Rezeň"]);
    }

    #[test]
    fn test_missing_day_is_section_not_found() {
        let err = parse_page(PAGE, "Sobota").unwrap_err();
        assert!(matches!(err, MenuError::SectionNotFound(_)));
    }

    #[test]
    fn test_day_without_main_meals_is_section_not_found() {
        let err = parse_page(PAGE, "Piatok").unwrap_err();
        assert!(matches!(err, MenuError::SectionNotFound(_)));
    }

    #[test]
    fn test_page_without_blocks_is_section_not_found() {
        let err = parse_page("<html><body><p>Zatvorené</p></body></html>", "Utorok").unwrap_err();
        assert!(matches!(err, MenuError::SectionNotFound(_)));
    }

    #[tokio::test]
    async fn test_scrape_uses_localized_weekday() {
        let source = KozelSource::new(
            Arc::new(StaticFetcher::new().with(KOZEL_URL, PAGE)),
            Arc::new(FixedCalendar::new(3)),
        );
        let meals = source.scrape().await.unwrap();
        assert_eq!(meals.len(), 3);
        assert_eq!(meals[0].name, "Polievka");
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let source = KozelSource::new(
            Arc::new(StaticFetcher::new()),
            Arc::new(FixedCalendar::new(3)),
        );
        assert!(matches!(
            source.scrape().await.unwrap_err(),
            MenuError::Fetch { .. }
        ));
    }
}
