//! Replydraft engine: generation backends and concurrent effect execution.
mod engine;
mod gemini;
mod generate;
mod prompt;
mod types;

pub use engine::{run_batch, run_generation, EngineHandle};
pub use gemini::{parse_batch_replies, GeminiGenerator, GeminiSettings};
pub use generate::{reconcile_batch, ChannelEventSink, EventSink, Generator};
pub use prompt::{build_batch_prompt, build_reply_prompt};
pub use types::{
    BatchMode, BatchReply, EngineEvent, EngineSettings, FailureKind, GenerationError,
};
