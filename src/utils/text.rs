const ELLIPSIS: &str = "...";

/// Shortens `text` to its first `cap` characters followed by `...` when it is
/// longer than `cap`. Display only; never feed the result back into offset math.
pub fn truncate_for_display(text: &str, cap: usize) -> String {
    match text.char_indices().nth(cap) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], ELLIPSIS),
        None => text.to_string(),
    }
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of every character boundary in `text`, including the end.
/// `boundaries[i]` is where character `i` starts; the last entry is `text.len()`.
pub fn char_boundaries(text: &str) -> Vec<usize> {
    let mut boundaries: Vec<usize> = text.char_indices().map(|(idx, _)| idx).collect();
    boundaries.push(text.len());
    boundaries
}
