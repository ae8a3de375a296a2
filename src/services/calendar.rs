//! Weekday resolution.

use chrono::{Datelike, Utc};

/// Slovak weekday names, Monday first.
pub const SLOVAK_WEEKDAYS: [&str; 7] = [
    "Pondelok", "Utorok", "Streda", "Štvrtok", "Piatok", "Sobota", "Nedeľa",
];

pub trait Calendar: Send + Sync {
    /// Today's weekday, 0 = Monday … 6 = Sunday.
    fn weekday(&self) -> usize;

    /// Today's weekday name in Slovak.
    fn localized_weekday(&self) -> &'static str {
        SLOVAK_WEEKDAYS[self.weekday() % SLOVAK_WEEKDAYS.len()]
    }
}

/// Uses the current UTC date.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCalendar;

impl Calendar for SystemCalendar {
    fn weekday(&self) -> usize {
        Utc::now().weekday().num_days_from_monday() as usize
    }
}

/// Always reports the same weekday; handy for replaying a given day's menus.
#[derive(Debug, Clone, Copy)]
pub struct FixedCalendar {
    pub weekday: usize,
}

impl FixedCalendar {
    pub fn new(weekday: usize) -> Self {
        FixedCalendar { weekday }
    }
}

impl Calendar for FixedCalendar {
    fn weekday(&self) -> usize {
        self.weekday
    }
}
