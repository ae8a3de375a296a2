//! JSON edition output.
//!
//! One run produces one [`Edition`]: the four menus plus when and for which
//! weekday they were scraped. A failed source keeps its slot with
//! `"meals": null` so consumers can tell "nothing today" from "scrape failed".
//!
//! # Example
//!
//! ```text
//! {
//!   "local_date": "2026-10-15",
//!   "local_time": "10:30",
//!   "day_name": "Štvrtok",
//!   "commit_hash": "3f2a9c1",
//!   "menus": [
//!     { "restaurant": "Pizza", "meals": [ { "name": "Menu 1", "price": "6,90€", "dishes": ["..."] } ] },
//!     { "restaurant": "Lindy", "meals": null },
//!     ...
//!   ]
//! }
//! ```

use crate::models::Batch;
use crate::services::Calendar;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Served in place of the edition when rendering fails.
pub const ERROR_DOCUMENT: &str = r#"{"error":"menus could not be rendered"}"#;

/// Editions are stamped in the restaurants' local time, whatever the host's
/// zone is.
pub const EDITION_TZ: Tz = chrono_tz::Europe::Bratislava;

#[derive(Debug, Serialize)]
pub struct Edition<'a> {
    pub local_date: String,
    pub local_time: String,
    pub day_name: &'static str,
    pub commit_hash: Option<&'a str>,
    pub menus: &'a Batch,
}

impl<'a> Edition<'a> {
    pub fn new(batch: &'a Batch, calendar: &dyn Calendar, commit_hash: Option<&'a str>) -> Self {
        Self::at(Utc::now(), batch, calendar, commit_hash)
    }

    /// Build the edition as if rendered at `instant`.
    pub fn at(
        instant: DateTime<Utc>,
        batch: &'a Batch,
        calendar: &dyn Calendar,
        commit_hash: Option<&'a str>,
    ) -> Self {
        let now = instant.with_timezone(&EDITION_TZ);
        Edition {
            local_date: now.date_naive().to_string(),
            local_time: now.format("%H:%M").to_string(),
            day_name: calendar.localized_weekday(),
            commit_hash,
            menus: batch,
        }
    }
}

/// Render `batch` as a pretty-printed JSON edition.
pub fn render_edition(
    batch: &Batch,
    calendar: &dyn Calendar,
    commit_hash: Option<&str>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&Edition::new(batch, calendar, commit_hash))
}

pub fn error_document() -> String {
    ERROR_DOCUMENT.to_string()
}

/// Write a rendered edition to `{output_dir}/{file_name}`.
#[instrument(level = "info", skip_all, fields(%output_dir, %file_name))]
pub async fn write_edition(
    content: &str,
    output_dir: &str,
    file_name: &str,
) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(output_dir).await?;
    let path = Path::new(output_dir).join(file_name);

    info!(path = %path.display(), bytes = content.len(), "Writing edition");
    fs::write(&path, content).await?;
    info!(path = %path.display(), "Wrote edition");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Meal, Menu, Restaurant};
    use crate::services::calendar::FixedCalendar;

    fn batch() -> Batch {
        let mut slots: [Option<Menu>; Restaurant::COUNT] = Default::default();
        slots[Restaurant::Pizza.index()] = Some(Menu::new(
            Restaurant::Pizza,
            vec![Meal {
                name: "Menu 1".into(),
                price: "6,90€".into(),
                dishes: vec!["Guláš".into()],
            }],
        ));
        Batch::from_slots(slots)
    }

    #[test]
    fn test_render_edition_shape() {
        let json = render_edition(&batch(), &FixedCalendar::new(3), Some("abc123")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["day_name"], "Štvrtok");
        assert_eq!(value["commit_hash"], "abc123");

        let menus = value["menus"].as_array().unwrap();
        assert_eq!(menus.len(), Restaurant::COUNT);
        assert_eq!(menus[0]["restaurant"], "Pizza");
        assert_eq!(menus[0]["meals"][0]["price"], "6,90€");
        assert_eq!(menus[0]["meals"][0]["dishes"][0], "Guláš");
        assert!(menus[1]["meals"].is_null());
        assert_eq!(menus[3]["restaurant"], "Erika");
    }

    #[test]
    fn test_edition_time_is_bratislava_local() {
        let batch = batch();
        let calendar = FixedCalendar::new(4);

        // 22:30 UTC is already the next day in Bratislava (CEST, +02:00)
        let summer = "2026-10-15T22:30:00Z".parse::<DateTime<Utc>>().unwrap();
        let edition = Edition::at(summer, &batch, &calendar, None);
        assert_eq!(edition.local_date, "2026-10-16");
        assert_eq!(edition.local_time, "00:30");

        // after the switch back to CET (+01:00)
        let winter = "2026-11-02T10:15:00Z".parse::<DateTime<Utc>>().unwrap();
        let edition = Edition::at(winter, &batch, &calendar, None);
        assert_eq!(edition.local_date, "2026-11-02");
        assert_eq!(edition.local_time, "11:15");
    }

    #[test]
    fn test_error_document_is_json() {
        let value: serde_json::Value = serde_json::from_str(&error_document()).unwrap();
        assert!(value["error"].is_string());
    }

    #[tokio::test]
    async fn test_write_edition() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("public");
        let out = out.to_str().unwrap();

        write_edition("{}", out, "menu.json").await.unwrap();

        let written = std::fs::read_to_string(Path::new(out).join("menu.json")).unwrap();
        assert_eq!(written, "{}");
    }
}
