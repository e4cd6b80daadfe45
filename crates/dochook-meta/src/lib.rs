//! Source-tree utilities for documentation builds.
//!
//! - [`Scanner`]: find markdown or HTML files, skipping hidden entries
//! - [`update_file`]: keep the `last_updated` front-matter field in sync with
//!   the file's modification time for pages that opt in

mod front_matter;
mod scanner;

pub use front_matter::{
    SkipReason, TimestampError, TimestampOutcome, modified_date, set_last_updated, update_file,
};
pub use scanner::Scanner;
