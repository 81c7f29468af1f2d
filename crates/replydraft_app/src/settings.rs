//! Layered settings: defaults, then the RON settings file, then CLI flags.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use replydraft_core::GenerationConfig;
use replydraft_engine::{BatchMode, GeminiSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::Cli;
use crate::console::logging::LogSettings;

pub const DEFAULT_SETTINGS_FILE: &str = "replydraft.ron";
const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        let gemini = GeminiSettings::default();
        Self {
            endpoint: gemini.endpoint,
            model: gemini.model,
            temperature: gemini.temperature,
            top_p: gemini.top_p,
            connect_timeout_secs: gemini.connect_timeout.as_secs(),
            request_timeout_secs: gemini.request_timeout.as_secs(),
        }
    }
}

impl BackendSettings {
    pub fn to_gemini(&self, api_key: Option<String>) -> GeminiSettings {
        GeminiSettings {
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            api_key,
            temperature: self.temperature,
            top_p: self.top_p,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub generation: GenerationConfig,
    pub backend: BackendSettings,
    pub batch_mode: BatchMode,
    pub log: LogSettings,
}

impl AppSettings {
    /// Loads `path`, or `./replydraft.ron` when no path is given. Only the
    /// implicit default file may be absent.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_SETTINGS_FILE), false),
        };
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
                return Ok(Self::default());
            }
            Err(source) => return Err(SettingsError::Read { path, source }),
        };
        ron::from_str(&content).map_err(|source| SettingsError::Parse { path, source })
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(tone) = cli.tone {
            self.generation.tone = tone;
        }
        if let Some(length) = cli.length {
            self.generation.length = length;
        }
        if let Some(instruction) = &cli.instruction {
            self.generation.custom_instruction = Some(instruction.clone());
        }
        if let Some(mode) = cli.batch_mode {
            self.batch_mode = mode;
        }
        if let Some(model) = &cli.model {
            self.backend.model = model.clone();
        }
        if let Some(endpoint) = &cli.endpoint {
            self.backend.endpoint = endpoint.clone();
        }
        if let Some(destination) = cli.log {
            self.log.destination = destination;
        }
        if let Some(file) = &cli.log_file {
            self.log.file = file.clone();
        }
        if cli.verbose {
            self.log.verbose = true;
        }
    }
}

/// API key from the environment, first match wins.
pub fn api_key_from_env() -> Option<String> {
    API_KEY_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}
