use sift_common::{Result, SiftError};

pub use sift_common::DEFAULT_MAX_LENGTH;

/// Split `content` into consecutive chunks of at most `max_length` characters.
///
/// Every chunk but the last holds exactly `max_length` characters and the
/// chunks concatenate back to `content`. Lengths count `char`s, so multi-byte
/// characters are never split.
///
/// ```
/// use sift_web::chunk::split_dom_content;
///
/// let chunks = split_dom_content("Hello\nWorld", 3).unwrap();
/// assert_eq!(chunks, ["Hel", "lo\n", "Wor", "ld"]);
/// ```
pub fn split_dom_content(content: &str, max_length: usize) -> Result<Vec<String>> {
    if max_length == 0 {
        return Err(SiftError::InvalidArgument(
            "max_length must be a positive integer".into(),
        ));
    }

    let mut chunks = Vec::with_capacity(content.len() / max_length + 1);
    let mut start = 0;
    let mut taken = 0;
    for (idx, _) in content.char_indices() {
        if taken == max_length {
            chunks.push(content[start..idx].to_string());
            start = idx;
            taken = 0;
        }
        taken += 1;
    }
    if start < content.len() {
        chunks.push(content[start..].to_string());
    }
    Ok(chunks)
}
