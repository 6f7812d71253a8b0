//! Ask command handler.
//!
//! Indexes the given documents and answers a single question.

use super::{build_assistant, format_packet, open_session};
use clap::Args;
use docqa_core::{config::AppConfig, AppResult, ResponseMode};
use std::path::PathBuf;

/// Answer one question about a set of documents
#[derive(Args, Debug)]
pub struct AskCommand {
    /// Documents or directories to read
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// The question to ask
    #[arg(short, long)]
    pub question: String,

    /// Response mode (plain, comprehensive)
    #[arg(long, default_value = "plain")]
    pub mode: ResponseMode,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let (session, stats) = open_session(config, &self.paths).await?;
        tracing::debug!(
            "Indexed {} fragments from {} documents",
            stats.fragments,
            stats.documents
        );

        let assistant = build_assistant(config, session)?;
        let packet = assistant.answer(&self.question, self.mode).await?;

        if self.json {
            let output = serde_json::json!({
                "answer": packet.text,
                "sources": packet.sources,
                "kind": packet.kind,
                "mode": self.mode,
                "model": config.llm.model,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", format_packet(&packet));
        }

        Ok(())
    }
}
