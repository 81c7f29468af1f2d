use std::path::PathBuf;

use clap::Parser;
use replydraft_core::{ReplyLength, Tone};
use replydraft_engine::BatchMode;

use crate::console::logging::LogDestination;

/// Draft AI replies for a list of post links.
#[derive(Debug, Parser)]
#[command(name = "replydraft", version, about)]
pub struct Cli {
    /// Settings file (RON). Defaults to ./replydraft.ron when present.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Read links from this file instead of stdin (one-shot mode).
    #[arg(long, value_name = "FILE")]
    pub links: Option<PathBuf>,

    /// Ingest links, draft every reply, print the results and exit.
    #[arg(long)]
    pub once: bool,

    /// Reply tone, e.g. casual or sarcastic.
    #[arg(long)]
    pub tone: Option<Tone>,

    /// Reply length: short, medium or long.
    #[arg(long)]
    pub length: Option<ReplyLength>,

    /// Extra instruction appended to every request.
    #[arg(long)]
    pub instruction: Option<String>,

    /// per-item (one call per draft) or combined (one call per batch).
    #[arg(long)]
    pub batch_mode: Option<BatchMode>,

    /// Model name passed to the generation API.
    #[arg(long)]
    pub model: Option<String>,

    /// Base URL of the generation API.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Where log output goes.
    #[arg(long, value_enum)]
    pub log: Option<LogDestination>,

    /// Log file path, used when logging to a file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log at trace level.
    #[arg(short, long)]
    pub verbose: bool,
}
