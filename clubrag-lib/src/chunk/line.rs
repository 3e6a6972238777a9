use crate::chunk::{Chunk, Chunker};

/// Default minimum length; lines must be strictly longer than this to be kept.
pub const DEFAULT_MIN_CHARS: usize = 5;

/// Line chunker - one unit per trimmed line
///
/// Lines whose trimmed length (in characters) does not exceed `min_chars`
/// are dropped. Surviving lines keep their relative order.
pub struct LineChunker {
    pub min_chars: usize,
}

impl Default for LineChunker {
    fn default() -> Self {
        Self {
            min_chars: DEFAULT_MIN_CHARS,
        }
    }
}

impl Chunker for LineChunker {
    fn name(&self) -> &str {
        "line"
    }

    fn chunk(&self, content: &str) -> Vec<Chunk> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| line.chars().count() > self.min_chars)
            .enumerate()
            .map(|(position, line)| Chunk::new(position, line))
            .collect()
    }
}
