use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tone {
    Professional,
    #[default]
    Casual,
    Humorous,
    Sarcastic,
    Supportive,
    Controversial,
    Insightful,
}

impl Tone {
    pub const ALL: [Tone; 7] = [
        Tone::Professional,
        Tone::Casual,
        Tone::Humorous,
        Tone::Sarcastic,
        Tone::Supportive,
        Tone::Controversial,
        Tone::Insightful,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Casual => "Casual",
            Tone::Humorous => "Humorous",
            Tone::Sarcastic => "Sarcastic",
            Tone::Supportive => "Supportive",
            Tone::Controversial => "Controversial",
            Tone::Insightful => "Insightful",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Tone::ALL
            .into_iter()
            .find(|tone| tone.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownVariant::new("tone", needle))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReplyLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl ReplyLength {
    pub const ALL: [ReplyLength; 3] = [ReplyLength::Short, ReplyLength::Medium, ReplyLength::Long];

    pub fn as_str(self) -> &'static str {
        match self {
            ReplyLength::Short => "Short",
            ReplyLength::Medium => "Medium",
            ReplyLength::Long => "Long",
        }
    }

    /// Length constraint handed to the model verbatim.
    pub fn instruction(self) -> &'static str {
        match self {
            ReplyLength::Short => "under 80 characters.",
            ReplyLength::Medium => "1-2 punchy sentences.",
            ReplyLength::Long => "3-4 sentences with high detail.",
        }
    }
}

impl fmt::Display for ReplyLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReplyLength {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        ReplyLength::ALL
            .into_iter()
            .find(|length| length.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownVariant::new("length", needle))
    }
}

/// Error returned when parsing a tone or length name fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {field} '{value}'")]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

/// Settings applied to every generation request at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub tone: Tone,
    pub length: ReplyLength,
    pub custom_instruction: Option<String>,
}

impl GenerationConfig {
    /// The custom instruction, trimmed, or `None` when blank.
    pub fn instruction(&self) -> Option<&str> {
        self.custom_instruction
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}
