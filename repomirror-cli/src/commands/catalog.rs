//! `repomirror catalog` — list the repositories the catalog publishes.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use crate::{catalog, settings::ConfigArgs};

/// Arguments for `repomirror catalog`.
#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Catalog URL or local file to read instead of the configured one.
    #[arg(long, value_name = "URL")]
    pub catalog_url: Option<String>,

    /// Emit the repository list as JSON.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

impl CatalogArgs {
    pub fn run(self) -> Result<()> {
        let config = self.config.load()?;
        let url = self.catalog_url.unwrap_or(config.catalog_url);
        let repos = catalog::load(&url, Duration::from_secs(config.http_timeout_secs))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&repos).context("failed to serialize catalog JSON")?
            );
            return Ok(());
        }

        for repo in &repos {
            println!("{repo}");
        }
        eprintln!("{} repositories", repos.len());
        Ok(())
    }
}
