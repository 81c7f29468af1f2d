//! Logger setup for the console binary.
//!
//! Stdout belongs to the console, so terminal logging goes to stderr and the
//! default destination is a log file.

use std::fs::File;
use std::path::PathBuf;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

pub const DEFAULT_LOG_FILE: &str = "replydraft.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum LogDestination {
    /// Log file only.
    #[default]
    File,
    /// Stderr only.
    Terminal,
    Both,
    /// No logging at all.
    Off,
}

impl LogDestination {
    fn to_file(self) -> bool {
        matches!(self, LogDestination::File | LogDestination::Both)
    }

    fn to_terminal(self) -> bool {
        matches!(self, LogDestination::Terminal | LogDestination::Both)
    }
}

/// The `log` section of the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub destination: LogDestination,
    /// Truncated on every start.
    pub file: PathBuf,
    /// Log at trace level instead of the build default.
    pub verbose: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            destination: LogDestination::default(),
            file: PathBuf::from(DEFAULT_LOG_FILE),
            verbose: false,
        }
    }
}

impl LogSettings {
    pub fn level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Trace
        } else {
            replydraft_logging::default_level()
        }
    }
}

/// Installs the global logger. A log file that cannot be created is reported
/// on stderr and skipped.
pub fn initialize(settings: &LogSettings) {
    let loggers = build_loggers(settings);
    if !loggers.is_empty() {
        let _ = CombinedLogger::init(loggers);
    }
}

fn build_loggers(settings: &LogSettings) -> Vec<Box<dyn SharedLogger>> {
    let level = settings.level();
    let config = logger_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if settings.destination.to_terminal() {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if settings.destination.to_file() {
        match File::create(&settings.file) {
            Ok(file) => loggers.push(WriteLogger::new(level, config, file)),
            Err(err) => eprintln!(
                "warning: cannot create log file {}: {err}",
                settings.file.display()
            ),
        }
    }
    loggers
}

fn logger_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .add_filter_allow_str("replydraft")
        .build()
}
