//! Output generation for the one-shot `scrape` command.
//!
//! # Submodules
//!
//! - [`json`]: writes the extraction JSON to a dated file
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── 20251022_today.json
//! └── 20251023_today.json
//! ```

pub mod json;
