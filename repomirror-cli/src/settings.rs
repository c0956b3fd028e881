//! Config file discovery shared by every subcommand.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use repomirror_core::{config, CoreError, MirrorConfig};

#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Config file to load (default: ~/.repomirror/config.yaml when present).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn load(&self) -> Result<MirrorConfig> {
        if let Some(path) = &self.config {
            return config::load_from(path)
                .with_context(|| format!("failed to load config {}", path.display()));
        }
        match config::load() {
            Err(CoreError::HomeNotFound) => Ok(MirrorConfig::default()),
            loaded => loaded.context("failed to load ~/.repomirror/config.yaml"),
        }
    }
}
