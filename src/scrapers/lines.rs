//! Line classification and the meal state machine for text-based sources.
//!
//! OCR'd and PDF-converted menus arrive as loose lines of text. The machine
//! walks them with two states:
//!
//! - `AwaitMealStart`: skip lines until [`LineRules::meal_start`] matches, then
//!   open a meal.
//! - `InMeal`: a price line closes the meal; a noise marker or too many dish
//!   lines stop the scan; anything else is a dish line.
//!
//! Each source supplies its own [`LineRules`]; the drop-if-incomplete policy
//! lives in [`crate::models::Menu::new`].

use crate::models::Meal;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Dish lines allowed after a meal-start line before the scan is abandoned.
pub const DISH_LINE_CAP: usize = 5;

static BARE_AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+[.,]\d{1,2}$").expect("valid bare amount regex"));

/// Normalize a raw price for display: decimal comma, euro symbol present.
///
/// Idempotent: `"12.50"`, `"12,50€"` and `"12,50€"` again all give `"12,50€"`.
pub fn normalize_price(raw: &str) -> String {
    let price = raw.trim().replace('.', ",");
    if price.is_empty() || price.contains('€') {
        price
    } else {
        price + "€"
    }
}

/// True if `line` reads as a price: it carries the euro symbol, or it is a
/// bare decimal amount such as `12.50`.
pub fn is_price_line(line: &str) -> bool {
    line.contains('€') || BARE_AMOUNT_RE.is_match(line.trim())
}

/// What a meal-start line contributed to the new meal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealStart {
    pub name: String,
    pub price: Option<String>,
    pub first_dish: Option<String>,
}

/// Source-specific classification hooks for [`scan_meals`].
pub trait LineRules {
    /// Recognize a line that opens a new meal.
    fn meal_start(&self, line: &str) -> Option<MealStart>;

    /// Recognize a line that prices and closes the open meal.
    fn price_line(&self, _line: &str) -> Option<String> {
        None
    }

    /// A line that ends the useful part of the menu.
    fn is_noise(&self, _line: &str) -> bool {
        false
    }

    fn clean_dish(&self, line: &str) -> String {
        line.to_string()
    }

    /// Whether a meal-start line may open a new meal while one is still open.
    fn restarts_open_meal(&self) -> bool {
        false
    }
}

enum State {
    AwaitMealStart,
    /// Index of the open meal and the dish lines added after its start line.
    InMeal { meal: usize, dish_lines: usize },
}

/// Fold raw text lines into meals. Incomplete meals are returned as-is and
/// must be filtered by the caller.
pub fn scan_meals<'a, R, I>(rules: &R, lines: I) -> Vec<Meal>
where
    R: LineRules + ?Sized,
    I: IntoIterator<Item = &'a str>,
{
    let mut meals: Vec<Meal> = Vec::new();
    let mut state = State::AwaitMealStart;

    for line in lines.into_iter().map(str::trim).filter(|l| !l.is_empty()) {
        let may_start = matches!(state, State::AwaitMealStart) || rules.restarts_open_meal();
        if may_start {
            if let Some(start) = rules.meal_start(line) {
                debug!(name = %start.name, "Found first line of a meal");
                meals.push(Meal {
                    name: start.name,
                    price: start.price.unwrap_or_default(),
                    dishes: start.first_dish.into_iter().collect(),
                });
                state = State::InMeal {
                    meal: meals.len() - 1,
                    dish_lines: 0,
                };
                continue;
            }
        }

        let State::InMeal { meal, dish_lines } = &mut state else {
            continue;
        };

        if let Some(price) = rules.price_line(line) {
            meals[*meal].price = price;
            state = State::AwaitMealStart;
            continue;
        }

        if rules.is_noise(line) {
            debug!(%line, "Stopping at noise marker");
            break;
        }
        if *dish_lines >= DISH_LINE_CAP {
            debug!(cap = DISH_LINE_CAP, "Dish line cap exceeded; stopping");
            break;
        }

        meals[*meal].dishes.push(rules.clean_dish(line));
        *dish_lines += 1;
    }

    meals
}
