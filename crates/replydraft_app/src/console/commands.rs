//! Console command parsing.

use replydraft_core::{DraftId, ReplyLength, Tone, UnknownVariant};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Newline-separated links to ingest.
    Add(String),
    Generate(DraftId),
    GenerateAll,
    Edit(DraftId, String),
    Remove(DraftId),
    Clear,
    Tone(Tone),
    Length(ReplyLength),
    /// Custom instruction; `None` clears it.
    Note(Option<String>),
    List,
    Links(DraftId),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("'{0}' needs {1}")]
    MissingArgument(&'static str, &'static str),
    #[error("'{0}' is not a draft number")]
    BadId(String),
    #[error(transparent)]
    BadValue(#[from] UnknownVariant),
}

pub const HELP: &str = "\
commands:
  add <url>...        queue post links (a bare link works too)
  gen <n>             draft (or redraft) reply #n
  all                 draft every idle or failed reply
  edit <n> <text>     replace the text of reply #n
  rm <n>              remove reply #n
  clear               discard every draft (asks first)
  tone <tone>         professional, casual, humorous, sarcastic,
                      supportive, controversial, insightful
  length <length>     short, medium, long
  note [text]         extra instruction for every request; empty clears it
  list                show the drafting queue
  links <n>           show reply/like links for reply #n
  help                this text
  quit                leave";

/// Parses one console line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    if line.to_ascii_lowercase().starts_with("http") {
        return Ok(Some(Command::Add(line.to_string())));
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "add" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument("add", "at least one link"));
            }
            Command::Add(rest.split_whitespace().collect::<Vec<_>>().join("\n"))
        }
        "gen" | "generate" => Command::Generate(parse_id("gen", rest)?),
        "all" => Command::GenerateAll,
        "edit" => {
            let (id, text) = match rest.split_once(char::is_whitespace) {
                Some((id, text)) => (id, text.trim()),
                None => (rest, ""),
            };
            Command::Edit(parse_id("edit", id)?, text.to_string())
        }
        "rm" | "remove" => Command::Remove(parse_id("rm", rest)?),
        "clear" => Command::Clear,
        "tone" => Command::Tone(required("tone", rest, "a tone")?.parse()?),
        "length" => Command::Length(required("length", rest, "a length")?.parse()?),
        "note" => Command::Note((!rest.is_empty()).then(|| rest.to_string())),
        "list" | "ls" => Command::List,
        "links" => Command::Links(parse_id("links", rest)?),
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

/// Reads a yes/no answer to the clear confirmation.
pub fn is_affirmative(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn required<'a>(
    command: &'static str,
    rest: &'a str,
    what: &'static str,
) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument(command, what))
    } else {
        Ok(rest)
    }
}

fn parse_id(command: &'static str, rest: &str) -> Result<DraftId, CommandError> {
    let raw = required(command, rest, "a draft number")?;
    raw.trim_start_matches('#')
        .parse()
        .map_err(|_| CommandError::BadId(raw.to_string()))
}
