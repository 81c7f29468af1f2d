use std::sync::mpsc;

use replydraft_core::{clean_reply, DraftId, GenerationRequest, EMPTY_REPLY_ERROR};

use crate::{BatchReply, EngineEvent, FailureKind, GenerationError};

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// The external text-generation call.
#[async_trait::async_trait]
pub trait Generator: Send + Sync {
    /// Drafts a reply for one post.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;

    /// Drafts replies for several posts in one call. Implementations may return
    /// fewer replies than requests; missing drafts are treated as failures.
    async fn generate_batch(
        &self,
        _requests: &[GenerationRequest],
    ) -> Result<Vec<BatchReply>, GenerationError> {
        Err(GenerationError::new(
            FailureKind::BatchUnsupported,
            "this generator cannot draft a whole batch in one call",
        ))
    }
}

/// Pairs each request with its reply from a combined call, in request order.
/// Missing and blank replies become failures.
pub fn reconcile_batch(
    requests: &[GenerationRequest],
    replies: Vec<BatchReply>,
) -> Vec<(DraftId, Result<String, GenerationError>)> {
    let mut replies = replies;
    requests
        .iter()
        .map(|request| {
            let found = replies
                .iter()
                .position(|reply| reply.draft_id == request.draft_id)
                .map(|idx| replies.swap_remove(idx).text);
            let result = match found {
                None => Err(GenerationError::new(
                    FailureKind::MissingFromBatch,
                    "no reply returned for this post",
                )),
                Some(text) if clean_reply(&text).is_empty() => Err(GenerationError::new(
                    FailureKind::EmptyResponse,
                    EMPTY_REPLY_ERROR,
                )),
                Some(text) => Ok(text),
            };
            (request.draft_id, result)
        })
        .collect()
}
