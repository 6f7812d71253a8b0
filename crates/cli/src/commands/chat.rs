//! Chat command handler.
//!
//! Indexes documents once, then answers questions read from stdin until
//! `:quit` or end of input.

use super::{build_assistant, format_packet, open_session, report_skipped};
use clap::Args;
use docqa_core::{config::AppConfig, AppResult, ResponseMode};
use docqa_knowledge::AnswerPacket;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Interactive question loop over a set of documents
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Documents or directories to read
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Initial response mode (plain, comprehensive)
    #[arg(long, default_value = "plain")]
    pub mode: ResponseMode,
}

/// One line of chat input.
#[derive(Debug, PartialEq)]
enum ChatInput {
    Question(String),
    Mode(String),
    Load(Vec<PathBuf>),
    Quit,
}

impl ChatInput {
    fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let (command, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (trimmed, ""),
        };

        match command {
            ":quit" | ":q" => Self::Quit,
            ":mode" => Self::Mode(rest.to_string()),
            ":load" => Self::Load(rest.split_whitespace().map(PathBuf::from).collect()),
            _ => Self::Question(line.to_string()),
        }
    }
}

/// What to show for one answered line.
#[derive(Debug, PartialEq)]
enum Reply {
    Answer(String),
    Failure(String),
}

impl Reply {
    fn from_outcome(outcome: AppResult<AnswerPacket>) -> Self {
        match outcome {
            Ok(packet) => Self::Answer(format_packet(&packet)),
            Err(e) => Self::Failure(format!("Question failed: {}", e)),
        }
    }
}

impl ChatCommand {
    /// Execute the chat command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let (session, stats) = open_session(config, &self.paths).await?;
        let assistant = build_assistant(config, session.clone())?;
        let mut mode = self.mode;

        eprintln!(
            "Indexed {} documents ({} fragments). Commands: :mode plain|comprehensive, :load <paths>, :quit",
            stats.documents, stats.fragments
        );

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match ChatInput::parse(&line) {
                ChatInput::Quit => break,
                ChatInput::Mode(name) => match name.parse::<ResponseMode>() {
                    Ok(new_mode) => {
                        mode = new_mode;
                        println!("Mode: {}", mode);
                    }
                    Err(e) => eprintln!("{}", e),
                },
                ChatInput::Load(paths) if paths.is_empty() => {
                    eprintln!("Usage: :load <paths>");
                }
                ChatInput::Load(paths) => match session.ingest(&paths).await {
                    Ok(stats) => {
                        report_skipped(&stats);
                        println!(
                            "Indexed {} documents ({} fragments)",
                            stats.documents, stats.fragments
                        );
                    }
                    // The previous index stays in place
                    Err(e) => eprintln!("Load failed: {}", e),
                },
                ChatInput::Question(question) => {
                    match Reply::from_outcome(assistant.answer(&question, mode).await) {
                        Reply::Answer(text) => println!("{}\n", text),
                        Reply::Failure(message) => {
                            tracing::warn!("{}", message);
                            eprintln!("{}", message);
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
