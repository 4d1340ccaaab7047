//! Normalizes raw provider output into paragraph-separated plain text.

/// Collapse whitespace runs within each line, drop empty lines, and rejoin
/// the survivors with a blank line between paragraphs. Idempotent.
pub fn normalize(raw: &str) -> String {
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
