//! Text normalization shared by the build pipeline and the runtime.
//!
//! Every trigger, response, category, and label is normalized before storage,
//! and every incoming user message is normalized before matching — the same
//! function on both sides keeps build-time and run-time text consistent.

/// Canonicalize raw text: fold unicode punctuation to ASCII equivalents,
/// collapse whitespace runs to a single space, and trim.
///
/// Deterministic and idempotent: `normalize(normalize(x)) == normalize(x)`.
/// Empty or whitespace-only input normalizes to the empty string.
pub fn normalize(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            // Curly/smart single and double quotes
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' => folded.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' => folded.push('"'),
            // Em/en dash and middle dot
            '\u{2014}' | '\u{2013}' | '\u{00B7}' => folded.push('-'),
            '\u{2026}' => folded.push_str("..."),
            '\u{2122}' => folded.push_str("TM"),
            '\u{00AE}' => folded.push_str("(R)"),
            '\u{00A0}' => folded.push(' '),
            c => folded.push(c),
        }
    }

    // split_whitespace both collapses runs and trims the ends.
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}
