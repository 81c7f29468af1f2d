#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the link input box.
    InputChanged(String),
    /// User submitted the current link input for intake.
    LinksSubmitted,
    /// User removed a draft.
    RemoveClicked { draft_id: crate::DraftId },
    /// User edited the text of a draft.
    TextEdited {
        draft_id: crate::DraftId,
        text: String,
    },
    /// User asked to discard every draft; needs confirmation.
    ClearAllRequested,
    /// User confirmed the pending clear.
    ClearAllConfirmed,
    /// User backed out of the pending clear.
    ClearAllCancelled,
    /// User replaced the generation settings.
    ConfigChanged(crate::GenerationConfig),
    /// User asked for a (re)draft of one item.
    GenerateClicked { draft_id: crate::DraftId },
    /// User asked to draft every pending item.
    GenerateAllClicked,
    /// Engine completion for one draft.
    GenerationDone {
        draft_id: crate::DraftId,
        outcome: crate::GenerationOutcome,
    },
    /// Engine finished every request of the running batch.
    BatchFinished,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
