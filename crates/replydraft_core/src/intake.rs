//! Parsing of pasted link lists.

const SUPPORTED_SCHEMES: [&str; 2] = ["https://", "http://"];
const SUPPORTED_HOSTS: [&str; 2] = ["twitter.com", "x.com"];
const STATUS_SEGMENT: &str = "status/";

/// Splits pasted text into the post links we can draft replies for.
///
/// Lines are trimmed; blank lines and anything without a supported scheme and
/// host are dropped without error. Input order is preserved.
pub fn parse_links(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| is_supported_link(line))
        .map(ToOwned::to_owned)
        .collect()
}

pub fn is_supported_link(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    SUPPORTED_SCHEMES
        .iter()
        .any(|scheme| lower.starts_with(scheme))
        && SUPPORTED_HOSTS.iter().any(|host| lower.contains(host))
}

/// Extracts the numeric post id following the first `status/` segment that
/// carries one. Returns an empty string when the link has no such segment.
pub fn extract_external_ref(url: &str) -> String {
    for (idx, _) in url.match_indices(STATUS_SEGMENT) {
        let digits: String = url[idx + STATUS_SEGMENT.len()..]
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        if !digits.is_empty() {
            return digits;
        }
    }
    String::new()
}
