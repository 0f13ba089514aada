//! UTF-8 safe, separator-aware text chunking.
//!
//! Splits normalized document text into overlapping windows of at
//! most `chunk_size` characters. Window ends prefer, in order, a
//! paragraph break, a line break, a space, and only then a hard
//! character cut. The next window starts `overlap` characters
//! before the previous end, moved onto a word boundary when one
//! exists nearby.
//!
//! All positions are computed on `char_indices()` so slicing never
//! lands inside a multi-byte sequence.
//!
//! # Example
//!
//! ```
//! use docrag::core::indexer::Chunker;
//! use docrag::core::types::{SourceKey, SourceMetadata};
//!
//! let chunker = Chunker::new(40, 10);
//! let meta = SourceMetadata {
//!     source: SourceKey::new("/docs/a.pdf"),
//!     filename: "a.pdf".to_string(),
//!     extension: "pdf".to_string(),
//!     file_size: 0,
//!     indexed_at: String::new(),
//! };
//! let chunks = chunker.create_chunks("Hello 👋 World 🌍 and more words here", &meta);
//!
//! for chunk in &chunks {
//!     assert!(chunk.char_len() <= 40);
//! }
//! ```

use crate::core::types::{Chunk, ChunkInfo, ChunkerConfig, SourceMetadata};

/// Break preference, strongest first. The empty separator stands
/// for a hard cut between any two characters.
pub const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Separator-aware text chunker.
///
/// Sizes are measured in **characters**, not bytes.
#[derive(Debug, Clone)]
pub struct Chunker {
    /// Maximum number of characters per chunk
    chunk_size: usize,

    /// Number of characters shared by consecutive chunks
    overlap: usize,
}

impl Chunker {
    /// Create a new chunker.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is 0 or if `overlap >= chunk_size`.
    /// Configuration validation rejects both before a chunker is
    /// built from user settings.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        assert!(chunk_size > 0, "chunk_size must be > 0");
        assert!(overlap < chunk_size, "overlap must be < chunk_size");

        Self {
            chunk_size,
            overlap,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Settings reported by status endpoints
    pub fn config(&self) -> ChunkerConfig {
        ChunkerConfig {
            chunk_size: self.chunk_size,
            chunk_overlap: self.overlap,
            separators: SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Split `text` into overlapping chunks.
    ///
    /// Empty or whitespace-only input yields no chunks. Every chunk
    /// carries a copy of `source_metadata` and its zero-based
    /// position. Chunk content is the exact slice of `text` between
    /// its offsets.
    ///
    /// Windows holding only whitespace are skipped, so the chunks
    /// cover the whole text only when it has no whitespace run longer
    /// than half a window. Text from [`normalize_text`] satisfies this.
    ///
    /// [`normalize_text`]: crate::core::indexer::extract::normalize_text
    pub fn create_chunks(&self, text: &str, source_metadata: &SourceMetadata) -> Vec<Chunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let char_indices: Vec<(usize, char)> = text.char_indices().collect();
        let chars: Vec<char> = char_indices.iter().map(|(_, c)| *c).collect();
        let total = chars.len();
        let byte_at = |idx: usize| {
            if idx < total {
                char_indices[idx].0
            } else {
                text.len()
            }
        };

        let mut chunks = Vec::new();
        let mut start = 0;
        while start < total && chars[start].is_whitespace() {
            start += 1;
        }

        while start < total {
            let end = self.find_break(&chars, start);
            let byte_start = byte_at(start);
            let byte_end = byte_at(end);
            let content = &text[byte_start..byte_end];

            if !content.trim().is_empty() {
                chunks.push(Chunk {
                    content: content.to_string(),
                    source_metadata: source_metadata.clone(),
                    sequence_index: chunks.len(),
                    start_offset: byte_start,
                    end_offset: byte_end,
                });
            }

            if end >= total {
                break;
            }
            start = self.next_start(&chars, start, end);
        }

        chunks
    }

    /// Aggregate count and mean length of a chunk sequence
    pub fn chunk_info(chunks: &[Chunk]) -> ChunkInfo {
        if chunks.is_empty() {
            return ChunkInfo {
                total_chunks: 0,
                avg_chunk_size: 0,
            };
        }

        let total_chars: usize = chunks.iter().map(Chunk::char_len).sum();
        ChunkInfo {
            total_chunks: chunks.len(),
            avg_chunk_size: total_chars / chunks.len(),
        }
    }

    /// Character index (exclusive) where the window starting at
    /// `start` ends.
    fn find_break(&self, chars: &[char], start: usize) -> usize {
        let limit = (start + self.chunk_size).min(chars.len());
        if limit == chars.len() {
            return limit;
        }

        // A break must leave the window past the overlap so the
        // next start moves forward, and should not produce tiny
        // chunks.
        let min_end = start + self.overlap.max(self.chunk_size / 2) + 1;

        for separator in SEPARATORS.iter().filter(|s| !s.is_empty()) {
            let sep: Vec<char> = separator.chars().collect();
            let mut end = limit;
            while end >= min_end && end >= start + sep.len() {
                if chars[end - sep.len()..end] == sep[..] {
                    return end;
                }
                end -= 1;
            }
        }

        limit
    }

    /// Start of the window following `[start, end)`.
    fn next_start(&self, chars: &[char], start: usize, end: usize) -> usize {
        if self.overlap == 0 {
            let mut s = end;
            while s < chars.len() && chars[s].is_whitespace() {
                s += 1;
            }
            return s;
        }

        let raw = end - self.overlap;

        if is_mid_word(chars, raw) {
            // Forward to the next word inside the overlap region
            let mut t = raw;
            while t < end && !chars[t].is_whitespace() {
                t += 1;
            }
            while t < end && chars[t].is_whitespace() {
                t += 1;
            }
            if t < end {
                return t;
            }

            // Otherwise back to the start of the current word
            let mut b = raw;
            while b > start + 1 && !chars[b - 1].is_whitespace() {
                b -= 1;
            }
            if chars[b - 1].is_whitespace() {
                return b;
            }
            return raw;
        }

        let mut s = raw;
        while s < end && chars[s].is_whitespace() {
            s += 1;
        }
        if s < end {
            s
        } else {
            raw
        }
    }
}

fn is_mid_word(chars: &[char], idx: usize) -> bool {
    idx > 0 && idx < chars.len() && !chars[idx - 1].is_whitespace() && !chars[idx].is_whitespace()
}
