use once_cell::sync::Lazy;
use regex::Regex;

use crate::persona::reference::MATCH_SECTION_HEADER;

static MATCH_SUMMARY_RE: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(r"(?s){}\s*(.*?)(?:\n\n|\z)", regex::escape(MATCH_SECTION_HEADER));
    Regex::new(&pattern).expect("match summary pattern is valid")
});

/// Returns the prose under the compatible-match header, up to the first blank
/// line. `None` when the header is missing or nothing follows it.
pub fn extract_match_summary(analysis: &str) -> Option<String> {
    let captures = MATCH_SUMMARY_RE.captures(analysis)?;
    let summary = captures.get(1)?.as_str().trim();
    if summary.is_empty() {
        None
    } else {
        Some(summary.to_string())
    }
}
