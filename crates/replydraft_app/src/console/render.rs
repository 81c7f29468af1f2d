//! Text rendering of the view model.

use std::fmt::Write;

use replydraft_core::{AppViewModel, DraftRowView, DraftState, GenerationConfig};

pub fn state_label(state: DraftState) -> &'static str {
    match state {
        DraftState::Idle => "idle",
        DraftState::Generating => "generating",
        DraftState::Completed => "completed",
        DraftState::Failed => "failed",
    }
}

pub fn config_line(config: &GenerationConfig) -> String {
    let mut line = format!("tone: {}  length: {}", config.tone, config.length);
    if let Some(instruction) = config.instruction() {
        let _ = write!(line, "  note: {instruction}");
    }
    line
}

pub fn draft_line(row: &DraftRowView) -> String {
    let mut out = format!(
        "#{:<3} {:<10} {}",
        row.draft_id,
        state_label(row.state),
        row.source_url
    );
    if !row.text.is_empty() {
        let _ = write!(out, "\n     {}", row.text);
    }
    if let Some(error) = &row.last_error {
        let _ = write!(out, "\n     error: {error} (gen {} to retry)", row.draft_id);
    }
    out
}

pub fn queue(view: &AppViewModel) -> String {
    if view.drafts.is_empty() {
        return "queue is empty; paste some post links".to_string();
    }
    let mut out = format!(
        "{}/{} drafts, {} in process{}\n{}",
        view.draft_count,
        view.capacity,
        view.in_process_count,
        if view.batch_in_flight { ", batch running" } else { "" },
        config_line(&view.config)
    );
    for row in &view.drafts {
        out.push('\n');
        out.push_str(&draft_line(row));
    }
    out
}

pub fn intake(view: &AppViewModel) -> String {
    match &view.last_intake {
        Some(stats) if stats.dropped > 0 => format!(
            "added {} link(s); {} dropped, the queue holds at most {}",
            stats.added, stats.dropped, view.capacity
        ),
        Some(stats) if stats.accepted == 0 => "no supported post links found".to_string(),
        Some(stats) => format!("added {} link(s)", stats.added),
        None => String::new(),
    }
}

pub fn intents(row: &DraftRowView) -> String {
    match (&row.reply_intent, &row.like_intent) {
        (Some(reply), Some(like)) => format!("reply: {reply}\nlike:  {like}"),
        _ => format!(
            "#{} is {}; links are available once it is completed",
            row.draft_id,
            state_label(row.state)
        ),
    }
}

/// Full report printed at the end of a one-shot run.
pub fn report(view: &AppViewModel) -> String {
    let mut out = String::new();
    for row in &view.drafts {
        out.push_str(&draft_line(row));
        out.push('\n');
        if row.state == DraftState::Completed {
            for line in intents(row).lines() {
                let _ = writeln!(out, "     {line}");
            }
        }
    }
    let completed = view
        .drafts
        .iter()
        .filter(|row| row.state == DraftState::Completed)
        .count();
    let _ = write!(
        out,
        "{completed} of {} drafts completed",
        view.draft_count
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use replydraft_core::{update, AppState, GenerationOutcome, Msg};

    fn view_with_completed_draft() -> AppViewModel {
        let (state, _) = update(
            AppState::new(),
            Msg::InputChanged("https://x.com/u/status/77".to_string()),
        );
        let (state, _) = update(state, Msg::LinksSubmitted);
        let (state, _) = update(state, Msg::GenerateClicked { draft_id: 1 });
        let (state, _) = update(
            state,
            Msg::GenerationDone {
                draft_id: 1,
                outcome: GenerationOutcome::Drafted("so true".to_string()),
            },
        );
        state.view()
    }

    #[test]
    fn report_lists_intents_for_completed_drafts() {
        let text = report(&view_with_completed_draft());

        assert!(text.contains("#1   completed  https://x.com/u/status/77"));
        assert!(text.contains("     so true"));
        assert!(text.contains("reply: https://twitter.com/intent/tweet?text=so+true&in_reply_to=77"));
        assert!(text.contains("like:  https://twitter.com/intent/like?tweet_id=77"));
        assert!(text.ends_with("1 of 1 drafts completed"));
    }

    #[test]
    fn empty_queue_has_hint() {
        assert_eq!(
            queue(&AppState::new().view()),
            "queue is empty; paste some post links"
        );
    }

    #[test]
    fn intake_mentions_dropped_links() {
        let links = (0..52)
            .map(|n| format!("https://x.com/u/status/{n}"))
            .collect::<Vec<_>>()
            .join("\n");
        let (state, _) = update(AppState::new(), Msg::InputChanged(links));
        let (state, _) = update(state, Msg::LinksSubmitted);

        assert_eq!(
            intake(&state.view()),
            "added 50 link(s); 2 dropped, the queue holds at most 50"
        );
    }
}
