//! `dochook prebuild` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use dochook_config::{CliSettings, Config};
use dochook_diagrams::prepare_cache;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the prebuild command.
#[derive(Args)]
pub(crate) struct PrebuildArgs {
    /// Rendered site directory (overrides config).
    #[arg(short, long)]
    site_dir: Option<PathBuf>,
}

impl PrebuildArgs {
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            site_dir: self.site_dir,
            ..CliSettings::default()
        };
        let config = Config::load(config_path, Some(&cli_settings))?;

        let store = prepare_cache(&config.site_resolved.site_dir)?;

        output.success(&format!("Diagram cache ready: {}", store.root().display()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prebuild_creates_cache_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("dochook.toml");
        std::fs::write(&config_path, "[site]\nsite_dir = \"public\"\n").unwrap();

        PrebuildArgs { site_dir: None }
            .execute(Some(&config_path))
            .unwrap();

        assert!(tmp.path().join("public/.diagram_cache").is_dir());
    }
}
