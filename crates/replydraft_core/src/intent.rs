//! Outbound web-intent links for a finished draft.

use url::form_urlencoded;

const REPLY_INTENT_BASE: &str = "https://twitter.com/intent/tweet";
const LIKE_INTENT_BASE: &str = "https://twitter.com/intent/like";

/// Link that opens the platform composer prefilled with `text` as a reply to
/// the post identified by `external_ref`.
pub fn reply_intent_url(text: &str, external_ref: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("text", text)
        .append_pair("in_reply_to", external_ref)
        .finish();
    format!("{REPLY_INTENT_BASE}?{query}")
}

/// Link that likes the post identified by `external_ref`.
pub fn like_intent_url(external_ref: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("tweet_id", external_ref)
        .finish();
    format!("{LIKE_INTENT_BASE}?{query}")
}
