//! Data-query classifier.
//!
//! Decides whether a message is a question about application data by looking
//! for any of a small set of trigger words.  Matching is a case-insensitive
//! substring test, so "somewhat" triggers on "what"; that is accepted.

/// Lower-case trigger substrings that mark a data question.
pub const DATA_QUERY_TRIGGERS: [&str; 5] = ["how many", "what", "show", "list", "count"];

/// Return `true` if `text` contains any data-query trigger.
pub fn is_data_query(text: &str) -> bool {
    let lowered = text.to_lowercase();
    DATA_QUERY_TRIGGERS
        .iter()
        .any(|trigger| lowered.contains(trigger))
}
