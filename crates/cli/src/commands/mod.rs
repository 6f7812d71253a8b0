//! Command handlers for the DocQA CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod chat;
pub mod ingest;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use ingest::IngestCommand;

use docqa_core::{config::AppConfig, AppError, AppResult};
use docqa_knowledge::{AnswerPacket, Assistant, IngestStats, Session};
use docqa_llm::create_client;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Build a session and index `paths` into it.
pub(crate) async fn open_session(
    config: &AppConfig,
    paths: &[PathBuf],
) -> AppResult<(Arc<Session>, IngestStats)> {
    let session = Arc::new(Session::from_config(config)?);
    let stats = session.ingest(paths).await?;
    report_skipped(&stats);
    Ok((session, stats))
}

/// Wire an assistant answering from `session`.
pub(crate) fn build_assistant(config: &AppConfig, session: Arc<Session>) -> AppResult<Assistant> {
    let llm = create_client(
        &config.llm.provider,
        Some(&config.llm.endpoint),
        Some(Duration::from_secs(config.llm.timeout_secs)),
    )
    .map_err(AppError::Config)?;

    Assistant::from_config(config, session, llm)
}

pub(crate) fn report_skipped(stats: &IngestStats) {
    for skipped in &stats.skipped {
        eprintln!("Skipped {}", skipped);
    }
}

/// Render an answer for the terminal.
pub(crate) fn format_packet(packet: &AnswerPacket) -> String {
    let mut out = packet.text.clone();
    if !packet.sources.is_empty() {
        out.push_str("\n\nSources:");
        for source in &packet.sources {
            out.push_str("\n- ");
            out.push_str(source);
        }
    }
    out
}
