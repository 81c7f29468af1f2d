use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::LinksSubmitted => {
            state.submit_input();
            Vec::new()
        }
        Msg::RemoveClicked { draft_id } => {
            // An in-flight generation for this draft is not cancelled; its
            // completion is discarded when it arrives.
            state.remove(draft_id);
            Vec::new()
        }
        Msg::TextEdited { draft_id, text } => {
            state.edit_text(draft_id, text);
            Vec::new()
        }
        Msg::ClearAllRequested => {
            state.request_clear();
            Vec::new()
        }
        Msg::ClearAllConfirmed => {
            state.confirm_clear();
            Vec::new()
        }
        Msg::ClearAllCancelled => {
            state.cancel_clear();
            Vec::new()
        }
        Msg::ConfigChanged(config) => {
            state.set_config(config);
            Vec::new()
        }
        Msg::GenerateClicked { draft_id } => match state.begin_generation(draft_id) {
            Some(request) => vec![Effect::Generate(request)],
            None => Vec::new(),
        },
        Msg::GenerateAllClicked => {
            if state.is_batch_in_flight() {
                return (state, Vec::new());
            }
            let requests = state.begin_batch();
            if requests.is_empty() {
                Vec::new()
            } else {
                vec![Effect::GenerateBatch { requests }]
            }
        }
        Msg::GenerationDone { draft_id, outcome } => {
            state.apply_outcome(draft_id, outcome);
            Vec::new()
        }
        Msg::BatchFinished => {
            state.finish_batch();
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
