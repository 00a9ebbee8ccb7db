use std::sync::LazyLock;

use regex::Regex;

/// `1 . `, `12.`, `3 .` ... the numbering written by export.
static NUMBER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{1,2} ?\. ?").expect("valid number prefix pattern"));

/// Parse an exported (or hand-written) numbered list into candidate titles.
///
/// Splits on `\n` only and strips the numbering prefix from each line.
/// Nothing else is trimmed. Lines that are empty after stripping are
/// dropped; everything else is kept verbatim, with no length checks and no
/// deduplication.
pub fn parse_numbered_list(text: &str) -> Vec<String> {
    text.split('\n')
        .map(strip_number_prefix)
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .collect()
}

/// Remove a leading `<1-2 digits>[ ].[ ]` from a line, if present.
pub fn strip_number_prefix(line: &str) -> &str {
    match NUMBER_PREFIX.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}
