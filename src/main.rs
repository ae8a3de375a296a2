//! # menucko
//!
//! Scrapes today's lunch menus from restaurants near the office and publishes
//! them as one JSON edition.
//!
//! ## Usage
//!
//! ```sh
//! menucko -o ./public
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Scraping**: every restaurant's source runs in its own task
//!    ([`orchestrator::run_all`]); a failing source yields an empty slot
//! 2. **Rendering**: the complete batch is serialized to JSON
//! 3. **Output**: the edition is written to the output directory

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod error;
mod models;
mod orchestrator;
mod outputs;
mod scrapers;
mod services;
mod utils;

use cli::Cli;
use outputs::json;
use scrapers::MenuSource;
use scrapers::{erika::ErikaSource, kozel::KozelSource, lindy::LindySource, pizza::PizzaSource};
use services::calendar::{Calendar, FixedCalendar, SystemCalendar};
use services::http::ReqwestFetcher;
use services::ocr::TesseractOcr;
use services::pdf::PdfToText;
use services::{DocumentConverter, Fetcher, TextRecognizer};
use utils::ensure_writable_dir;

/// Production sources, one per restaurant.
fn build_sources(
    args: &Cli,
    calendar: Arc<dyn Calendar>,
) -> Result<Vec<Arc<dyn MenuSource>>, Box<dyn Error>> {
    let timeout = args.http_timeout_secs.map(Duration::from_secs);
    let fetcher: Arc<dyn Fetcher> = Arc::new(ReqwestFetcher::new(&args.user_agent, timeout)?);
    let ocr: Arc<dyn TextRecognizer> =
        Arc::new(TesseractOcr::new(&args.tesseract_bin, &args.ocr_lang));
    let converter: Arc<dyn DocumentConverter> = Arc::new(
        PdfToText::new(&args.pdftotext_bin)
            .with_scratch_root(args.scratch_dir.as_ref().map(Into::into)),
    );

    let sources: Vec<Arc<dyn MenuSource>> = vec![
        Arc::new(PizzaSource::new(fetcher.clone(), calendar.clone())),
        Arc::new(LindySource::new(fetcher.clone(), ocr)),
        Arc::new(KozelSource::new(fetcher.clone(), calendar)),
        Arc::new(ErikaSource::new(fetcher, converter)),
    ];
    Ok(sources)
}

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    orchestrator::install_panic_hook();

    let start_time = std::time::Instant::now();
    info!("menucko starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // Early check: a bad output dir should fail before any scraping
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let calendar: Arc<dyn Calendar> = match args.weekday {
        Some(weekday) => {
            info!(weekday, "Using fixed weekday");
            Arc::new(FixedCalendar::new(weekday.into()))
        }
        None => Arc::new(SystemCalendar),
    };
    info!(day = calendar.localized_weekday(), "Resolved weekday");

    // ---- Scrape every source ----
    let sources = build_sources(&args, calendar.clone())?;
    let batch = orchestrator::run_all(sources).await;

    // ---- Render ----
    let commit_hash = args.commit_hash.as_deref();
    let content = match json::render_edition(&batch, calendar.as_ref(), commit_hash) {
        Ok(content) => content,
        Err(e) => {
            error!(error = %e, "Failed to render edition; publishing error document");
            json::error_document()
        }
    };

    // ---- Output ----
    if let Err(e) = json::write_edition(&content, &args.output_dir, &args.output_name).await {
        error!(error = %e, "Failed to write edition");
        return Err(e);
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        failed_sources = batch.failed_count(),
        "Execution complete"
    );

    Ok(())
}
