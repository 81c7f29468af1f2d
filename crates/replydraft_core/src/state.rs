use std::collections::BTreeMap;

use crate::intake::{extract_external_ref, parse_links};
use crate::intent::{like_intent_url, reply_intent_url};
use crate::view_model::{AppViewModel, DraftRowView, IntakeStats};
use crate::{GenerationConfig, GenerationRequest};

pub type DraftId = u64;

/// Upper bound on the number of drafts held in one session.
pub const MAX_DRAFTS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftState {
    #[default]
    Idle,
    Generating,
    Completed,
    Failed,
}

impl DraftState {
    /// Whether "generate all" picks this draft up.
    pub fn is_pending(self) -> bool {
        matches!(self, DraftState::Idle | DraftState::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DraftItem {
    source_url: String,
    external_ref: String,
    text: String,
    state: DraftState,
    last_error: Option<String>,
}

impl DraftItem {
    fn new(source_url: String) -> Self {
        let external_ref = extract_external_ref(&source_url);
        Self {
            source_url,
            external_ref,
            text: String::new(),
            state: DraftState::Idle,
            last_error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    input: String,
    // DraftIds are allocated in ascending order, so key order is insertion order.
    drafts: BTreeMap<DraftId, DraftItem>,
    next_draft_id: DraftId,
    config: GenerationConfig,
    batch_in_flight: bool,
    confirm_clear_pending: bool,
    last_intake: Option<IntakeStats>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GenerationConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn view(&self) -> AppViewModel {
        let drafts: Vec<DraftRowView> = self
            .drafts
            .iter()
            .map(|(draft_id, item)| {
                let completed = item.state == DraftState::Completed;
                DraftRowView {
                    draft_id: *draft_id,
                    source_url: item.source_url.clone(),
                    external_ref: item.external_ref.clone(),
                    text: item.text.clone(),
                    state: item.state,
                    last_error: item.last_error.clone(),
                    reply_intent: completed
                        .then(|| reply_intent_url(&item.text, &item.external_ref)),
                    like_intent: completed.then(|| like_intent_url(&item.external_ref)),
                }
            })
            .collect();
        let in_process_count = drafts
            .iter()
            .filter(|row| row.state == DraftState::Generating)
            .count();
        let can_generate_all =
            !self.batch_in_flight && drafts.iter().any(|row| row.state.is_pending());

        AppViewModel {
            input: self.input.clone(),
            draft_count: drafts.len(),
            capacity: MAX_DRAFTS,
            in_process_count,
            drafts,
            config: self.config.clone(),
            batch_in_flight: self.batch_in_flight,
            can_generate_all,
            confirm_clear_pending: self.confirm_clear_pending,
            last_intake: self.last_intake.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_batch_in_flight(&self) -> bool {
        self.batch_in_flight
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.mark_dirty();
        }
    }

    /// Appends every acceptable link from the input buffer as a new idle draft,
    /// truncating at `MAX_DRAFTS`. Returns the number actually added.
    pub(crate) fn submit_input(&mut self) -> usize {
        let raw = std::mem::take(&mut self.input);
        let accepted = parse_links(&raw);
        let room = MAX_DRAFTS.saturating_sub(self.drafts.len());
        let added = accepted.len().min(room);

        for url in accepted.iter().take(added) {
            self.next_draft_id += 1;
            self.drafts
                .insert(self.next_draft_id, DraftItem::new(url.clone()));
        }

        self.last_intake = Some(IntakeStats {
            accepted: accepted.len(),
            added,
            dropped: accepted.len() - added,
        });
        self.mark_dirty();
        added
    }

    pub(crate) fn remove(&mut self, draft_id: DraftId) -> bool {
        let removed = self.drafts.remove(&draft_id).is_some();
        if removed {
            self.mark_dirty();
        }
        removed
    }

    pub(crate) fn edit_text(&mut self, draft_id: DraftId, text: String) -> bool {
        match self.drafts.get_mut(&draft_id) {
            Some(item) => {
                item.text = text;
                self.mark_dirty();
                true
            }
            None => false,
        }
    }

    pub(crate) fn request_clear(&mut self) {
        if !self.confirm_clear_pending {
            self.confirm_clear_pending = true;
            self.mark_dirty();
        }
    }

    pub(crate) fn confirm_clear(&mut self) -> bool {
        if !self.confirm_clear_pending {
            return false;
        }
        self.confirm_clear_pending = false;
        self.drafts.clear();
        self.last_intake = None;
        self.mark_dirty();
        true
    }

    pub(crate) fn cancel_clear(&mut self) {
        if self.confirm_clear_pending {
            self.confirm_clear_pending = false;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_config(&mut self, config: GenerationConfig) {
        if self.config != config {
            self.config = config;
            self.mark_dirty();
        }
    }

    /// Moves one draft to `Generating` and builds its request from the live
    /// config. `None` if the draft is unknown or already generating.
    pub(crate) fn begin_generation(&mut self, draft_id: DraftId) -> Option<GenerationRequest> {
        let item = self.drafts.get_mut(&draft_id)?;
        if item.state == DraftState::Generating {
            return None;
        }
        item.state = DraftState::Generating;
        item.last_error = None;
        let request = GenerationRequest {
            draft_id,
            source_url: item.source_url.clone(),
            config: self.config.clone(),
        };
        self.mark_dirty();
        Some(request)
    }

    /// Starts a batch over every idle or failed draft, in collection order.
    /// Returns an empty list, leaving the batch flag down, when nothing is pending.
    pub(crate) fn begin_batch(&mut self) -> Vec<GenerationRequest> {
        let pending: Vec<DraftId> = self
            .drafts
            .iter()
            .filter(|(_, item)| item.state.is_pending())
            .map(|(draft_id, _)| *draft_id)
            .collect();
        if pending.is_empty() {
            return Vec::new();
        }

        self.batch_in_flight = true;
        pending
            .into_iter()
            .filter_map(|draft_id| self.begin_generation(draft_id))
            .collect()
    }

    pub(crate) fn finish_batch(&mut self) {
        if self.batch_in_flight {
            self.batch_in_flight = false;
            self.mark_dirty();
        }
    }

    /// Applies a finished generation. Completions for drafts that were removed
    /// or are no longer generating are discarded.
    pub(crate) fn apply_outcome(&mut self, draft_id: DraftId, outcome: GenerationOutcome) -> bool {
        let Some(item) = self.drafts.get_mut(&draft_id) else {
            return false;
        };
        if item.state != DraftState::Generating {
            return false;
        }
        match outcome {
            GenerationOutcome::Drafted(raw) => {
                let text = clean_reply(&raw);
                if text.is_empty() {
                    item.state = DraftState::Failed;
                    item.last_error = Some(EMPTY_REPLY_ERROR.to_string());
                } else {
                    item.text = text;
                    item.state = DraftState::Completed;
                    item.last_error = None;
                }
            }
            GenerationOutcome::Failed(message) => {
                item.state = DraftState::Failed;
                item.last_error = Some(message);
            }
        }
        self.mark_dirty();
        true
    }
}

/// Error recorded when a reply is blank once cleaned.
pub const EMPTY_REPLY_ERROR: &str = "the model returned no text";

/// Result of one external generation call, as reported back to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Drafted(String),
    Failed(String),
}

/// Trims model output and strips one wrapping quote character at each end.
pub fn clean_reply(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_leading = trimmed
        .strip_prefix(['"', '\''])
        .unwrap_or(trimmed);
    without_leading
        .strip_suffix(['"', '\''])
        .unwrap_or(without_leading)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::clean_reply;

    #[test]
    fn clean_reply_strips_one_quote_each_side() {
        assert_eq!(clean_reply("  \"hello\"  "), "hello");
        assert_eq!(clean_reply("'hi'"), "hi");
        assert_eq!(clean_reply("\"\"double\"\""), "\"double\"");
        assert_eq!(clean_reply("it's fine"), "it's fine");
        assert_eq!(clean_reply("'"), "");
    }
}
