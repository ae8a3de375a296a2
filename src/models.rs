//! Data models shared by every source extractor and the renderer.
//!
//! - [`Restaurant`]: the closed set of menu sources, doubling as a batch index
//! - [`Meal`]: one offering with a normalized price and its dish lines
//! - [`Menu`]: a source's result for today, or the failure sentinel
//! - [`Batch`]: the fixed four-slot collection handed to the renderer

use serde::Serialize;
use std::fmt;

/// The restaurants the pipeline knows about.
///
/// The discriminant is the slot the restaurant occupies in a [`Batch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Restaurant {
    Pizza,
    Lindy,
    Kozel,
    Erika,
}

impl Restaurant {
    pub const COUNT: usize = 4;

    pub const ALL: [Restaurant; Restaurant::COUNT] = [
        Restaurant::Pizza,
        Restaurant::Lindy,
        Restaurant::Kozel,
        Restaurant::Erika,
    ];

    /// Stable slot index of this restaurant inside a [`Batch`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Restaurant::Pizza => "Pizza",
            Restaurant::Lindy => "Lindy",
            Restaurant::Kozel => "Kozel",
            Restaurant::Erika => "Erika",
        }
    }
}

impl fmt::Display for Restaurant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single lunch offering.
///
/// `price` is a display string such as `"12,50€"`; `dishes` keep the order
/// in which they appeared in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Meal {
    pub name: String,
    pub price: String,
    pub dishes: Vec<String>,
}

impl Meal {
    /// A meal missing its name, price or every dish is a parsing artifact.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.price.is_empty() && !self.dishes.is_empty()
    }
}

/// Today's menu for one restaurant.
///
/// `meals == None` means the source produced nothing usable, which is
/// different from a successful scrape that yielded no meals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Menu {
    pub restaurant: Restaurant,
    pub meals: Option<Vec<Meal>>,
}

impl Menu {
    /// Build a successful menu, dropping incomplete meals.
    pub fn new(restaurant: Restaurant, meals: Vec<Meal>) -> Self {
        let meals = meals.into_iter().filter(Meal::is_complete).collect();
        Menu {
            restaurant,
            meals: Some(meals),
        }
    }

    /// The failure sentinel for `restaurant`.
    pub fn failed(restaurant: Restaurant) -> Self {
        Menu {
            restaurant,
            meals: None,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.meals.is_none()
    }
}

/// One menu per restaurant, each at [`Restaurant::index`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Batch {
    menus: [Menu; Restaurant::COUNT],
}

impl Batch {
    /// Assemble a batch from collected slots; empty slots become the failure
    /// sentinel so every index is populated.
    pub fn from_slots(slots: [Option<Menu>; Restaurant::COUNT]) -> Self {
        let mut slots = slots;
        let menus = Restaurant::ALL.map(|restaurant| {
            slots[restaurant.index()]
                .take()
                .unwrap_or_else(|| Menu::failed(restaurant))
        });
        Batch { menus }
    }

    pub fn get(&self, restaurant: Restaurant) -> &Menu {
        &self.menus[restaurant.index()]
    }

    pub fn menus(&self) -> &[Menu] {
        &self.menus
    }

    pub fn failed_count(&self) -> usize {
        self.menus().iter().filter(|m| m.is_failed()).count()
    }
}
