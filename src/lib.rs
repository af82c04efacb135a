//! # mdinclude
//!
//! Expands include markers in Markdown documents into fenced code blocks, so
//! configuration snippets kept as standalone files stay in sync with the docs
//! that show them.
//!
//! ## Marker syntax
//!
//! ```text
//! <!-- include: cfg/a.yml -->
//! ```
//!
//! becomes
//!
//! ````text
//! ```yaml
//! <contents of cfg/a.yml>
//! ```
//! ````
//!
//! Paths resolve against the base directory (the current working directory by
//! default), not the document's own directory. Markers whose file does not
//! exist are left in place.
//!
//! ## Usage
//!
//! ### As a Library
//!
//! ```no_run
//! use mdinclude::{ExpandConfig, run_all};
//! use std::path::Path;
//!
//! let config = ExpandConfig::default();
//! match run_all(Path::new("ReadMe"), &config) {
//!     Ok(reports) => println!("{} documents processed", reports.len()),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```
//!
//! ### As a CLI Tool
//!
//! ```bash
//! # Expand every .md file under ./ReadMe
//! mdinclude
//!
//! # Fail in CI when docs are out of date
//! mdinclude docs --check
//! ```

pub mod error;
pub mod expand;
pub mod fs_utils;

// Re-export main types and functions for convenience
pub use error::{MdIncludeError, Result};
pub use expand::{
    DocumentReport, ExpandConfig, Expansion, IncludeMarker, MarkerListing, expand, expand_text,
    find_markers, list_markers, run_all,
};
