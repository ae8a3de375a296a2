//! Rendering and distribution of a finished [`crate::models::Batch`].
//!
//! # Submodules
//!
//! - [`json`]: Serializes the batch into a JSON edition and writes it to the
//!   output directory
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! └── menu.json   # today's edition, overwritten on every run
//! ```

pub mod json;
