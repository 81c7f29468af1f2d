use crate::{DraftId, DraftState, GenerationConfig};

/// Outcome of the most recent link submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IntakeStats {
    /// Lines that looked like supported post links.
    pub accepted: usize,
    /// Drafts actually created.
    pub added: usize,
    /// Accepted links that did not fit under the draft cap.
    pub dropped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub input: String,
    pub drafts: Vec<DraftRowView>,
    pub draft_count: usize,
    pub capacity: usize,
    pub in_process_count: usize,
    pub config: GenerationConfig,
    pub batch_in_flight: bool,
    pub can_generate_all: bool,
    pub confirm_clear_pending: bool,
    pub last_intake: Option<IntakeStats>,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn draft(&self, draft_id: DraftId) -> Option<&DraftRowView> {
        self.drafts.iter().find(|row| row.draft_id == draft_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftRowView {
    pub draft_id: DraftId,
    pub source_url: String,
    pub external_ref: String,
    pub text: String,
    pub state: DraftState,
    pub last_error: Option<String>,
    /// Present once the draft is completed.
    pub reply_intent: Option<String>,
    pub like_intent: Option<String>,
}
