//! `dochook timestamps` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use dochook_config::Config;
use dochook_meta::{Scanner, TimestampOutcome, update_file};
use rayon::prelude::*;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the timestamps command.
#[derive(Args)]
pub(crate) struct TimestampsArgs {
    /// Markdown directory (default: docs directory).
    dir: Option<PathBuf>,
}

impl TimestampsArgs {
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();

        let dir = match self.dir {
            Some(dir) => dir,
            None => Config::load(config_path, None)?.site_resolved.docs_dir,
        };
        if !dir.is_dir() {
            return Err(CliError::Validation(format!(
                "directory not found: {}",
                dir.display()
            )));
        }

        let files = Scanner::markdown(&dir).scan();
        let outcomes: Vec<_> = files.par_iter().map(|path| update_file(path)).collect();

        let mut updated = 0;
        for outcome in outcomes {
            match outcome {
                Ok(TimestampOutcome::Updated { .. }) => updated += 1,
                Ok(_) => {}
                Err(e) => output.warning(&e.to_string()),
            }
        }

        output.success(&format!(
            "Updated {updated} of {} page(s) in {}",
            files.len(),
            dir.display()
        ));
        Ok(())
    }
}
