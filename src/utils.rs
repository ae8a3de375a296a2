//! Small helpers for logging and the output directory.

use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a char boundary) with
/// `"…(+N bytes)"` appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Create `path` if needed and prove it accepts new files.
///
/// A throwaway file is written and removed again, so a read-only or
/// misconfigured output location fails the run before any page is fetched.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;

    let check_file = Path::new(path).join(format!(".menucko-write-check-{}", std::process::id()));
    fs::write(&check_file, b"").await?;
    if let Err(e) = fs::remove_file(&check_file).await {
        warn!(path = %check_file.display(), error = %e, "Could not remove write check file");
    }

    info!("Output directory is writable");
    Ok(())
}
