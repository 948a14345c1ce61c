/// Block partitioning for both directions.
///
/// The encoder cuts the input bytes into `n` contiguous ranges of
/// `len / n` bytes each, with the last range running to the end of input.
/// The decoder never recomputes boundaries: it rebuilds code ranges from
/// the per-block code counts recorded in the encoded file.
use std::ops::Range;

/// Split `len` input bytes into `n` contiguous blocks.
///
/// Block `i` starts at `i * (len / n)`. When `len < n` every block except
/// the last is empty. Returns an empty list for `n == 0`.
pub fn byte_ranges(len: usize, n: usize) -> Vec<Range<usize>> {
    if n == 0 {
        return Vec::new();
    }
    let block_size = len / n;
    (0..n)
        .map(|i| {
            let start = i * block_size;
            let end = if i + 1 == n { len } else { start + block_size };
            start..end
        })
        .collect()
}

/// A block's position in the flattened code list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CodeRange {
    /// Index of the block's first code.
    pub start: usize,
    /// Number of codes in the block.
    pub len: usize,
}

impl CodeRange {
    /// One past the block's last code.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// Lay out blocks of the given code counts back to back.
pub fn code_ranges(block_lens: &[usize]) -> Vec<CodeRange> {
    let mut start = 0;
    block_lens
        .iter()
        .map(|&len| {
            let range = CodeRange { start, len };
            start += len;
            range
        })
        .collect()
}
