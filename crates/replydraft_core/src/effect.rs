use crate::{DraftId, GenerationConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Generate a reply for a single draft.
    Generate(GenerationRequest),
    /// Generate replies for all requests concurrently, then report `BatchFinished`.
    GenerateBatch { requests: Vec<GenerationRequest> },
}

/// Everything the generator needs for one draft. The config is captured when
/// the request is dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub draft_id: DraftId,
    pub source_url: String,
    pub config: GenerationConfig,
}
