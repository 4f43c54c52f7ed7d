/// Model replies that mean "no match", compared case-insensitively.
const NO_MATCH_SENTINELS: [&str; 5] = ["none", "null", "n/a", "na", ""];

/// Turn raw model output into a match, or `None` when the model declined.
///
/// Surrounding whitespace and one layer of matching `"` or `'` quotes are
/// removed; everything inside is kept as produced.
pub fn normalize(raw: &str) -> Option<String> {
    let cleaned = strip_matched_quotes(raw.trim()).trim();

    if NO_MATCH_SENTINELS
        .iter()
        .any(|sentinel| cleaned.eq_ignore_ascii_case(sentinel))
    {
        return None;
    }

    Some(cleaned.to_string())
}

fn strip_matched_quotes(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}
