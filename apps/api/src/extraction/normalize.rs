/// Canonical form for text sent to the model: trimmed, every whitespace run
/// (spaces, tabs, newlines) collapsed to one space, lower-cased.
///
/// Idempotent: `normalize_text(&normalize_text(x)) == normalize_text(x)`.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
