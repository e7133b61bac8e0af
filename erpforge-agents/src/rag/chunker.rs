/// Default chunk size in characters
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
/// Default overlap between consecutive chunks in characters
pub const DEFAULT_OVERLAP: usize = 200;

/// Split text into bounded, overlapping chunks.
///
/// When a chunk would cut mid-text, the split prefers the last sentence or
/// newline boundary, as long as that boundary lies beyond half the chunk
/// size. Consecutive chunks overlap by `overlap` characters so that
/// sentences near a boundary stay retrievable. Sizes are in characters,
/// not bytes, so multi-byte text never splits inside a code point.
///
/// `overlap` must not exceed half of `chunk_size`: a boundary split can
/// shorten a chunk to just over `chunk_size / 2` characters, and the next
/// start position has to advance past the previous one.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    assert!(chunk_size > 0, "chunk_size must be positive");
    assert!(
        overlap <= chunk_size / 2,
        "overlap must not exceed half the chunk size"
    );

    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();
    if total == 0 {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut start = 0usize;

    while start < total {
        let mut end = (start + chunk_size).min(total);
        let mut window: &[char] = &chars[start..end];

        // Break at a sentence or paragraph boundary when one falls in the
        // back half of the window.
        if end < total {
            let boundary = window
                .iter()
                .rposition(|&c| c == '.' || c == '\n')
                .filter(|&pos| pos > chunk_size / 2);
            if let Some(pos) = boundary {
                end = start + pos + 1;
                window = &chars[start..end];
            }
        }

        let chunk: String = window.iter().collect();
        let trimmed = chunk.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }

        if end >= total {
            break;
        }
        start = end - overlap;
    }

    chunks
}
