//! Ingest command handler.

use super::open_session;
use clap::Args;
use docqa_core::{config::AppConfig, AppResult};
use std::path::PathBuf;

/// Index documents and report what was read
#[derive(Args, Debug)]
pub struct IngestCommand {
    /// Documents or directories to read
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IngestCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ingest command for {} paths", self.paths.len());

        let (_session, stats) = open_session(config, &self.paths).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            println!(
                "Indexed {} documents ({} text units, {} fragments) in {:.2}s",
                stats.documents, stats.units, stats.fragments, stats.duration_secs
            );
        }

        Ok(())
    }
}
