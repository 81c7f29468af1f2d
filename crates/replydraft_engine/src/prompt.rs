use std::fmt::Write;

use replydraft_core::{GenerationConfig, GenerationRequest};

const REPLY_RULE: &str = "Rule: No hashtags, no quotes, no conversational filler like \"Here is your reply\". Just the text.";

/// Prompt for a single reply.
pub fn build_reply_prompt(request: &GenerationRequest) -> String {
    let config = &request.config;
    let mut prompt = String::new();
    let _ = writeln!(prompt, "Task: Write a Twitter (X) reply.");
    let _ = writeln!(prompt, "Context: Replying to a post at {}.", request.source_url);
    push_style(&mut prompt, config, "");
    prompt.push_str(REPLY_RULE);
    prompt
}

/// Prompt for a combined batch call. The style comes from the first request;
/// a batch is dispatched at one instant so every request carries the same config.
pub fn build_batch_prompt(requests: &[GenerationRequest]) -> String {
    let config = requests
        .first()
        .map(|request| request.config.clone())
        .unwrap_or_default();
    let mut prompt = String::new();
    let _ = writeln!(prompt, "Task: Write one Twitter (X) reply for each post below.");
    push_style(&mut prompt, &config, "each reply ");
    let _ = writeln!(prompt, "Posts:");
    for request in requests {
        let _ = writeln!(prompt, "- id {}: {}", request.draft_id, request.source_url);
    }
    prompt.push_str(REPLY_RULE);
    prompt.push_str(
        "\nRespond with a JSON array containing one object per post: {\"id\": \"<id>\", \"reply\": \"<text>\"}.",
    );
    prompt
}

fn push_style(prompt: &mut String, config: &GenerationConfig, constraint_prefix: &str) {
    let _ = writeln!(prompt, "Tone: {}.", config.tone);
    let _ = writeln!(
        prompt,
        "Constraint: {constraint_prefix}{}",
        config.length.instruction()
    );
    if let Some(instruction) = config.instruction() {
        let _ = writeln!(prompt, "Additional user instruction: {instruction}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use replydraft_core::{ReplyLength, Tone};

    fn request(draft_id: u64, instruction: Option<&str>) -> GenerationRequest {
        GenerationRequest {
            draft_id,
            source_url: format!("https://x.com/u/status/{draft_id}"),
            config: GenerationConfig {
                tone: Tone::Insightful,
                length: ReplyLength::Long,
                custom_instruction: instruction.map(str::to_string),
            },
        }
    }

    #[test]
    fn reply_prompt_carries_url_and_style() {
        let prompt = build_reply_prompt(&request(9, Some("  cite a paper ")));

        assert!(prompt.starts_with("Task: Write a Twitter (X) reply.\n"));
        assert!(prompt.contains("Context: Replying to a post at https://x.com/u/status/9.\n"));
        assert!(prompt.contains("Tone: Insightful.\n"));
        assert!(prompt.contains("Constraint: 3-4 sentences with high detail.\n"));
        assert!(prompt.contains("Additional user instruction: cite a paper\n"));
        assert!(prompt.ends_with("Just the text."));
    }

    #[test]
    fn blank_instruction_is_omitted() {
        let prompt = build_reply_prompt(&request(1, Some("   ")));
        assert!(!prompt.contains("Additional user instruction"));
    }

    #[test]
    fn batch_prompt_lists_every_post() {
        let prompt = build_batch_prompt(&[request(1, None), request(2, None)]);
        assert!(prompt.contains("- id 1: https://x.com/u/status/1\n"));
        assert!(prompt.contains("- id 2: https://x.com/u/status/2\n"));
        assert!(prompt.contains("Constraint: each reply 3-4 sentences with high detail.\n"));
    }
}
