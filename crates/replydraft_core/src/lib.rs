//! Replydraft core: pure draft store state machine and view-model helpers.
mod config;
mod effect;
mod intake;
mod intent;
mod msg;
mod state;
mod update;
mod view_model;

pub use config::{GenerationConfig, ReplyLength, Tone, UnknownVariant};
pub use effect::{Effect, GenerationRequest};
pub use intake::{extract_external_ref, is_supported_link, parse_links};
pub use intent::{like_intent_url, reply_intent_url};
pub use msg::Msg;
pub use state::{
    clean_reply, AppState, DraftId, DraftState, GenerationOutcome, EMPTY_REPLY_ERROR, MAX_DRAFTS,
};
pub use update::update;
pub use view_model::{AppViewModel, DraftRowView, IntakeStats};
