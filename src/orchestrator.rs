//! Runs every menu source concurrently and assembles the [`Batch`].
//!
//! Each source gets its own tokio task. Inside the task a single recovery
//! boundary turns both returned errors and panics into the failed-menu
//! sentinel, so one broken page never affects the others. Results travel
//! through a bounded channel sized to hold every source's menu, which means no
//! task ever waits on the orchestrator to send.

use crate::error::{MenuError, Result};
use crate::models::{Batch, Meal, Menu, Restaurant};
use crate::scrapers::MenuSource;
use futures::FutureExt;
use std::any::Any;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Once};
use tokio::sync::mpsc;
use tracing::{error, info, instrument, warn};

thread_local! {
    /// Where the last panic on this thread happened. The hook runs on the
    /// panicking thread before unwinding reaches `catch_unwind`.
    static PANIC_ORIGIN: RefCell<Option<String>> = const { RefCell::new(None) };
}

static PANIC_HOOK: Once = Once::new();

/// Chain a panic hook that remembers each panic's source location, so a
/// caught panic can be reported together with where it came from.
pub fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let origin = info
                .location()
                .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()));
            PANIC_ORIGIN.with(|slot| *slot.borrow_mut() = origin);
            previous(info);
        }));
    });
}

/// Run `source` and catch a panic as [`MenuError::Unexpected`].
async fn run_source(source: &dyn MenuSource) -> Result<Vec<Meal>> {
    match AssertUnwindSafe(source.scrape()).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => {
            let origin = PANIC_ORIGIN
                .with(|slot| slot.borrow_mut().take())
                .unwrap_or_else(|| "unknown location".to_string());
            Err(MenuError::Unexpected(format!(
                "panicked at {origin}: {}",
                panic_message(panic.as_ref())
            )))
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg
    } else {
        "non-string panic payload"
    }
}

/// The task boundary: always yields a menu for the source's restaurant.
async fn scrape_menu(source: &dyn MenuSource) -> Menu {
    let restaurant = source.restaurant();
    match run_source(source).await {
        Ok(meals) => {
            let menu = Menu::new(restaurant, meals);
            let count = menu.meals.as_ref().map_or(0, Vec::len);
            info!(%restaurant, meals = count, "Source finished");
            menu
        }
        Err(e) => {
            error!(%restaurant, error = %e, "Source failed; publishing empty menu");
            Menu::failed(restaurant)
        }
    }
}

/// Scrape all `sources` in parallel and wait for every one of them.
///
/// The returned batch has a menu in every slot: sources that failed, and
/// restaurants that had no source at all, get the failure sentinel.
#[instrument(level = "info", skip_all, fields(sources = sources.len()))]
pub async fn run_all(sources: Vec<Arc<dyn MenuSource>>) -> Batch {
    let (tx, mut rx) = mpsc::channel::<Menu>(sources.len().max(Restaurant::COUNT));

    let handles: Vec<_> = sources
        .into_iter()
        .map(|source| {
            let tx = tx.clone();
            tokio::spawn(async move {
                let menu = scrape_menu(source.as_ref()).await;
                if tx.send(menu).await.is_err() {
                    warn!(restaurant = %source.restaurant(), "Result channel closed before send");
                }
            })
        })
        .collect();
    drop(tx);

    for handle in handles {
        if let Err(e) = handle.await {
            error!(error = %e, "Source task did not complete");
        }
    }

    let mut slots: [Option<Menu>; Restaurant::COUNT] = Default::default();
    while let Some(menu) = rx.recv().await {
        let slot = &mut slots[menu.restaurant.index()];
        if slot.is_some() {
            warn!(restaurant = %menu.restaurant, "Duplicate menu for restaurant; keeping the first");
            continue;
        }
        *slot = Some(menu);
    }

    let batch = Batch::from_slots(slots);
    info!(failed = batch.failed_count(), "All sources finished");
    batch
}
