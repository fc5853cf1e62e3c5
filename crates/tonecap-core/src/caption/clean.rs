//! Cleanup of raw model output into printable caption text.

/// Tokenizer markers that some backends leak into decoded text.
const SPECIAL_TOKENS: &[&str] = &[
    "<|endoftext|>",
    "[CLS]",
    "[SEP]",
    "[PAD]",
    "[UNK]",
    "<pad>",
    "<unk>",
    "</s>",
    "<s>",
];

/// Remove `<think>...</think>` blocks emitted by reasoning models.
///
/// An unclosed block swallows the rest of the text.
pub fn strip_think_tags(text: &str) -> String {
    let mut result = text.to_string();
    while let Some(start) = result.find("<think>") {
        if let Some(end) = result[start..].find("</think>") {
            result = format!("{}{}", &result[..start], &result[start + end + 8..]);
        } else {
            result.truncate(start);
            break;
        }
    }
    result
}

/// Strip special tokens, reasoning blocks, control characters and wrapping
/// quotes, and collapse whitespace to single spaces.
pub fn clean_caption(raw: &str) -> String {
    let mut text = strip_think_tags(raw);
    for token in SPECIAL_TOKENS {
        if text.contains(token) {
            text = text.replace(token, " ");
        }
    }

    let collapsed = text
        .split(|c: char| c.is_whitespace() || c.is_control())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let unquoted = collapsed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(collapsed.as_str());
    unquoted.trim().to_string()
}
