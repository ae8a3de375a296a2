//! Command-line interface definitions for menucko.
//!
//! Every option can also be supplied through a `MENUCKO_*` environment
//! variable, which is how the scheduled job configures it.

use crate::services::http::DEFAULT_USER_AGENT;
use clap::Parser;

/// Command-line arguments for menucko.
///
/// # Examples
///
/// ```sh
/// # Scrape today's menus into ./public/menu.json
/// menucko -o ./public
///
/// # Replay Wednesday's menus
/// MENUCKO_WEEKDAY=2 menucko -o ./public
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for the rendered edition
    #[arg(short, long, env = "MENUCKO_OUTPUT_DIR")]
    pub output_dir: String,

    /// File name of the rendered edition inside the output directory
    #[arg(long, env = "MENUCKO_OUTPUT_NAME", default_value = "menu.json")]
    pub output_name: String,

    /// Force the weekday (0 = Monday … 6 = Sunday) instead of using today's
    #[arg(long, env = "MENUCKO_WEEKDAY", value_parser = clap::value_parser!(u8).range(0..7))]
    pub weekday: Option<u8>,

    /// Commit hash stamped into the rendered edition
    #[arg(long, env = "MENUCKO_COMMIT_HASH")]
    pub commit_hash: Option<String>,

    /// User agent sent with every download
    #[arg(long, env = "MENUCKO_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Give up on a single download after this many seconds
    #[arg(long, env = "MENUCKO_HTTP_TIMEOUT_SECS")]
    pub http_timeout_secs: Option<u64>,

    /// Tesseract executable used for the menu photo
    #[arg(long, env = "MENUCKO_TESSERACT_BIN", default_value = "tesseract")]
    pub tesseract_bin: String,

    /// Tesseract language for the menu photo
    #[arg(long, env = "MENUCKO_OCR_LANG", default_value = "slk")]
    pub ocr_lang: String,

    /// pdftotext executable used for the menu PDF
    #[arg(long, env = "MENUCKO_PDFTOTEXT_BIN", default_value = "pdftotext")]
    pub pdftotext_bin: String,

    /// Directory for transient PDF conversion files (system temp dir if unset)
    #[arg(long, env = "MENUCKO_SCRATCH_DIR")]
    pub scratch_dir: Option<String>,
}
