//! Drops caption lines that are not speech.

/// Returns `true` when a caption line should be kept in the response.
///
/// Bracketed or parenthesised lines (`[Music]`, `(applause)`) are annotations.
/// Lines without a single Latin letter are dropped as well, which also drops
/// lines written entirely in non-Latin scripts.
pub fn keep_snippet(text: &str) -> bool {
    if text.starts_with('[') || text.starts_with('(') {
        return false;
    }
    text.chars().any(is_latin_letter)
}

fn is_latin_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || ('\u{00C0}'..='\u{017F}').contains(&c)
}
