use std::sync::Once;

use pretty_assertions::assert_eq;
use replydraft_core::{
    update, AppState, DraftId, DraftState, Effect, GenerationConfig, GenerationOutcome,
    GenerationRequest, Msg, ReplyLength, Tone, EMPTY_REPLY_ERROR,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(replydraft_logging::initialize_for_tests);
}

fn state_with_links(count: usize) -> (AppState, Vec<DraftId>) {
    let input = (1..=count)
        .map(|n| format!("https://x.com/u/status/{n}"))
        .collect::<Vec<_>>()
        .join("\n");
    let (state, _) = update(AppState::new(), Msg::InputChanged(input));
    let (state, _) = update(state, Msg::LinksSubmitted);
    let ids = state.view().drafts.iter().map(|row| row.draft_id).collect();
    (state, ids)
}

fn drafted(state: AppState, draft_id: DraftId, text: &str) -> AppState {
    update(
        state,
        Msg::GenerationDone {
            draft_id,
            outcome: GenerationOutcome::Drafted(text.to_string()),
        },
    )
    .0
}

fn failed(state: AppState, draft_id: DraftId, message: &str) -> AppState {
    update(
        state,
        Msg::GenerationDone {
            draft_id,
            outcome: GenerationOutcome::Failed(message.to_string()),
        },
    )
    .0
}

fn state_of(state: &AppState, draft_id: DraftId) -> DraftState {
    state.view().draft(draft_id).map(|row| row.state).unwrap()
}

fn batch_requests(effects: Vec<Effect>) -> Vec<GenerationRequest> {
    match effects.as_slice() {
        [Effect::GenerateBatch { requests }] => requests.clone(),
        other => panic!("expected one batch effect, got {other:?}"),
    }
}

#[test]
fn generate_one_emits_request_with_live_config() {
    init_logging();
    let (state, ids) = state_with_links(1);
    let config = GenerationConfig {
        tone: Tone::Sarcastic,
        length: ReplyLength::Short,
        custom_instruction: Some("mention rust".to_string()),
    };
    let (state, _) = update(state, Msg::ConfigChanged(config.clone()));

    let (state, effects) = update(state, Msg::GenerateClicked { draft_id: ids[0] });

    assert_eq!(
        effects,
        vec![Effect::Generate(GenerationRequest {
            draft_id: ids[0],
            source_url: "https://x.com/u/status/1".to_string(),
            config,
        })]
    );
    assert_eq!(state_of(&state, ids[0]), DraftState::Generating);
    assert_eq!(state.view().in_process_count, 1);
}

#[test]
fn generate_one_is_single_flight() {
    init_logging();
    let (state, ids) = state_with_links(1);
    let (state, first) = update(state, Msg::GenerateClicked { draft_id: ids[0] });
    let (state, second) = update(state, Msg::GenerateClicked { draft_id: ids[0] });

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());

    let state = drafted(state, ids[0], "done");
    assert_eq!(state_of(&state, ids[0]), DraftState::Completed);
    // A stray second completion for the same draft is ignored.
    let state = failed(state, ids[0], "late");
    let row = state.view().drafts[0].clone();
    assert_eq!(row.state, DraftState::Completed);
    assert_eq!(row.text, "done");
    assert_eq!(row.last_error, None);
}

#[test]
fn generate_unknown_draft_is_noop() {
    init_logging();
    let (state, _) = state_with_links(1);
    let (_state, effects) = update(state, Msg::GenerateClicked { draft_id: 404 });
    assert!(effects.is_empty());
}

#[test]
fn success_trims_and_unquotes_reply() {
    init_logging();
    let (state, ids) = state_with_links(1);
    let (state, _) = update(state, Msg::GenerateClicked { draft_id: ids[0] });
    let state = drafted(state, ids[0], "  \"Great thread, thanks!\"\n");

    let row = state.view().drafts[0].clone();
    assert_eq!(row.state, DraftState::Completed);
    assert_eq!(row.text, "Great thread, thanks!");
    assert_eq!(
        row.reply_intent.as_deref(),
        Some("https://twitter.com/intent/tweet?text=Great+thread%2C+thanks%21&in_reply_to=1")
    );
    assert_eq!(
        row.like_intent.as_deref(),
        Some("https://twitter.com/intent/like?tweet_id=1")
    );
}

#[test]
fn failure_records_message_and_keeps_text() {
    init_logging();
    let (state, ids) = state_with_links(1);
    let (state, _) = update(
        state,
        Msg::TextEdited {
            draft_id: ids[0],
            text: "my own words".to_string(),
        },
    );
    let (state, _) = update(state, Msg::GenerateClicked { draft_id: ids[0] });
    let state = failed(state, ids[0], "rate limited");

    let row = state.view().drafts[0].clone();
    assert_eq!(row.state, DraftState::Failed);
    assert_eq!(row.last_error.as_deref(), Some("rate limited"));
    assert_eq!(row.text, "my own words");
    assert_eq!(row.reply_intent, None);
}

#[test]
fn blank_reply_fails_and_keeps_text() {
    init_logging();
    let (state, ids) = state_with_links(2);
    let (state, _) = update(
        state,
        Msg::TextEdited {
            draft_id: ids[1],
            text: "keep me".to_string(),
        },
    );
    let (state, _) = update(state, Msg::GenerateAllClicked);
    let state = drafted(state, ids[0], "   ");
    let state = drafted(state, ids[1], "\"\"");

    let view = state.view();
    for row in &view.drafts {
        assert_eq!(row.state, DraftState::Failed);
        assert_eq!(row.last_error.as_deref(), Some(EMPTY_REPLY_ERROR));
        assert_eq!(row.reply_intent, None);
    }
    assert_eq!(view.drafts[0].text, "");
    assert_eq!(view.drafts[1].text, "keep me");
}

#[test]
fn retry_clears_previous_error() {
    init_logging();
    let (state, ids) = state_with_links(1);
    let (state, _) = update(state, Msg::GenerateClicked { draft_id: ids[0] });
    let state = failed(state, ids[0], "boom");

    let (state, effects) = update(state, Msg::GenerateClicked { draft_id: ids[0] });
    assert_eq!(effects.len(), 1);
    let row = state.view().drafts[0].clone();
    assert_eq!(row.state, DraftState::Generating);
    assert_eq!(row.last_error, None);

    let state = drafted(state, ids[0], "second try");
    assert_eq!(state_of(&state, ids[0]), DraftState::Completed);
}

#[test]
fn completed_draft_can_be_redrafted() {
    init_logging();
    let (state, ids) = state_with_links(1);
    let (state, _) = update(state, Msg::GenerateClicked { draft_id: ids[0] });
    let state = drafted(state, ids[0], "first");

    let (state, effects) = update(state, Msg::GenerateClicked { draft_id: ids[0] });
    assert_eq!(effects.len(), 1);
    let state = drafted(state, ids[0], "second");
    assert_eq!(state.view().drafts[0].text, "second");
}

#[test]
fn completion_for_removed_draft_is_discarded() {
    init_logging();
    let (state, ids) = state_with_links(2);
    let (state, _) = update(state, Msg::GenerateClicked { draft_id: ids[0] });
    let (mut state, _) = update(state, Msg::RemoveClicked { draft_id: ids[0] });
    assert!(state.consume_dirty());
    let before = state.view();

    let mut state = drafted(state, ids[0], "orphan");

    assert_eq!(state.view(), before);
    assert!(!state.consume_dirty());
}

#[test]
fn generate_all_selects_idle_and_failed_only() {
    init_logging();
    let (state, ids) = state_with_links(4);
    // ids[0] completed, ids[1] failed, ids[2] generating, ids[3] idle.
    let (state, _) = update(state, Msg::GenerateClicked { draft_id: ids[0] });
    let state = drafted(state, ids[0], "kept");
    let (state, _) = update(state, Msg::GenerateClicked { draft_id: ids[1] });
    let state = failed(state, ids[1], "nope");
    let (state, _) = update(state, Msg::GenerateClicked { draft_id: ids[2] });

    let (state, effects) = update(state, Msg::GenerateAllClicked);
    let selected: Vec<_> = batch_requests(effects)
        .into_iter()
        .map(|request| request.draft_id)
        .collect();

    assert_eq!(selected, vec![ids[1], ids[3]]);
    let view = state.view();
    assert!(view.batch_in_flight);
    assert!(!view.can_generate_all);
    assert_eq!(view.in_process_count, 3);
    assert_eq!(view.drafts[0].text, "kept");
    assert_eq!(view.drafts[0].state, DraftState::Completed);
}

#[test]
fn generate_all_is_ignored_while_batch_in_flight() {
    init_logging();
    let (state, ids) = state_with_links(2);
    let (state, effects) = update(state, Msg::GenerateAllClicked);
    assert_eq!(batch_requests(effects).len(), 2);

    // Even with a fresh failure to retry, a second batch is refused.
    let state = failed(state, ids[0], "down");
    let (state, effects) = update(state, Msg::GenerateAllClicked);
    assert!(effects.is_empty());

    let state = drafted(state, ids[1], "ok");
    let (state, _) = update(state, Msg::BatchFinished);
    assert!(!state.view().batch_in_flight);

    let (_state, effects) = update(state, Msg::GenerateAllClicked);
    let retried: Vec<_> = batch_requests(effects)
        .into_iter()
        .map(|request| request.draft_id)
        .collect();
    assert_eq!(retried, vec![ids[0]]);
}

#[test]
fn generate_all_with_nothing_pending_does_not_raise_flag() {
    init_logging();
    let (state, ids) = state_with_links(1);
    let (state, _) = update(state, Msg::GenerateClicked { draft_id: ids[0] });
    let state = drafted(state, ids[0], "done");

    let (state, effects) = update(state, Msg::GenerateAllClicked);
    assert!(effects.is_empty());
    assert!(!state.view().batch_in_flight);
}

#[test]
fn batch_partial_failure_settles_every_draft() {
    init_logging();
    let (state, ids) = state_with_links(3);
    let (state, _) = update(state, Msg::GenerateClicked { draft_id: ids[2] });
    let state = drafted(state, ids[2], "untouched");

    let (state, effects) = update(state, Msg::GenerateAllClicked);
    assert_eq!(batch_requests(effects).len(), 2);

    // Completions arrive out of order.
    let state = drafted(state, ids[1], "second");
    let state = failed(state, ids[0], "rate limited");
    let (state, _) = update(state, Msg::BatchFinished);

    let view = state.view();
    assert!(!view.batch_in_flight);
    assert_eq!(view.in_process_count, 0);
    assert_eq!(view.drafts[0].state, DraftState::Failed);
    assert_eq!(view.drafts[0].last_error.as_deref(), Some("rate limited"));
    assert_eq!(view.drafts[1].state, DraftState::Completed);
    assert_eq!(view.drafts[1].text, "second");
    assert_eq!(view.drafts[2].text, "untouched");
    assert!(view.can_generate_all);
}

#[test]
fn config_change_mid_batch_applies_to_later_dispatches() {
    init_logging();
    let (state, ids) = state_with_links(2);
    let (state, _) = update(state, Msg::GenerateClicked { draft_id: ids[0] });

    let humorous = GenerationConfig {
        tone: Tone::Humorous,
        ..GenerationConfig::default()
    };
    let (state, _) = update(state, Msg::ConfigChanged(humorous.clone()));
    let (_state, effects) = update(state, Msg::GenerateClicked { draft_id: ids[1] });

    match effects.as_slice() {
        [Effect::Generate(request)] => assert_eq!(request.config, humorous),
        other => panic!("unexpected effects {other:?}"),
    }
}
