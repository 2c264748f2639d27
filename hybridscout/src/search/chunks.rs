use crate::config::ChunkOverlap;

/// One unit of text handed to the matchers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a, S> {
    /// Zero-based chunk number
    pub index: usize,
    /// Offset of `text[0]` within the whole input
    pub offset: usize,
    pub text: &'a [S],
}

/// Splits a text into consecutive chunks of `chunk_size` symbols.
///
/// With [`ChunkOverlap::None`] the chunks are disjoint and a match that
/// straddles two of them is found in neither. With
/// [`ChunkOverlap::CarryTail`] each chunk after the first also starts with
/// the previous chunk's last `pattern_len - 1` symbols. Any window of
/// `pattern_len` symbols that begins in the carried tail must end in the new
/// part, so nothing is reported twice.
#[derive(Debug, Clone)]
pub struct TextChunks<'a, S> {
    text: &'a [S],
    chunk_size: usize,
    carry: usize,
    next_start: usize,
    index: usize,
}

impl<'a, S> TextChunks<'a, S> {
    /// `chunk_size` of zero is treated as one
    pub fn new(text: &'a [S], chunk_size: usize) -> Self {
        Self {
            text,
            chunk_size: chunk_size.max(1),
            carry: 0,
            next_start: 0,
            index: 0,
        }
    }

    pub fn with_overlap(mut self, overlap: ChunkOverlap, pattern_len: usize) -> Self {
        self.carry = match overlap {
            ChunkOverlap::None => 0,
            ChunkOverlap::CarryTail => pattern_len.saturating_sub(1),
        };
        self
    }
}

impl<'a, S> Iterator for TextChunks<'a, S> {
    type Item = Chunk<'a, S>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_start >= self.text.len() {
            return None;
        }

        let start = self.next_start;
        let end = (start + self.chunk_size).min(self.text.len());
        let offset = start.saturating_sub(self.carry);

        let chunk = Chunk {
            index: self.index,
            offset,
            text: &self.text[offset..end],
        };
        self.next_start = end;
        self.index += 1;
        Some(chunk)
    }
}
