use unicode_normalization::UnicodeNormalization;

/// NFKC-normalizes and collapses every whitespace run to one space.
pub fn sanitize_field_text(raw: &str) -> String {
    let normalized: String = raw.nfkc().collect();
    let mut result = String::with_capacity(normalized.len());
    let mut prev_was_space = false;

    for ch in normalized.trim().chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            result.push(ch);
            prev_was_space = false;
        }
    }

    result
}

/// Collapses the absent spellings an extraction model uses (`""`, `"null"`,
/// `"undefined"`, `"none"`) into `None`.
pub fn present(raw: Option<String>) -> Option<String> {
    raw.map(|v| sanitize_field_text(&v)).filter(|v| {
        !v.is_empty()
            && !matches!(
                v.to_lowercase().as_str(),
                "null" | "undefined" | "none" | "n/a"
            )
    })
}
