//! Keyword and name text helpers.

/// Trim an optional string and drop empty values.
///
/// # Returns
/// `None` when the input is missing or whitespace-only; otherwise the trimmed
/// string.
pub fn normalize_optional_nonempty(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Split the comma-separated keyword field into its ordered keyword list.
///
/// Each segment is trimmed and empty segments are dropped, so the result
/// never contains empty strings.
pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join keywords into the single display string used by edit forms.
pub fn join_keywords(keywords: &[String]) -> String {
    keywords.join(", ")
}
