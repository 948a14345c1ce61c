//! Parallel LZW compression with forked per-block dictionaries.
//!
//! The input is split into contiguous blocks, one per worker thread. Workers
//! are scheduled as a binary tree: each node transforms its own block, then
//! hands its live dictionary to its left child on the same thread and a
//! snapshot of it to its right child on a new thread. The decoder walks the
//! same tree, so every block is decoded against the dictionary it was
//! encoded with.
//!
//! ```
//! use pzw::pipeline::{self, EncodeOptions};
//!
//! let input = b"TOBEORNOTTOBEORTOBEORNOT";
//! let encoded = pipeline::encode(input, &EncodeOptions { threads: 4 }).unwrap();
//! assert_eq!(encoded.num_blocks(), 4);
//! assert_eq!(pipeline::decode(&encoded).unwrap(), input);
//! ```

pub mod dictionary;
pub mod format;
pub mod partition;
pub mod pipeline;
pub mod stats;
pub mod transform;
pub mod tree;

/// A dictionary code. Codes 0..=255 are the single-byte alphabet.
pub type Code = u32;

/// Error types for pzw operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum PzError {
    /// Input data is invalid or corrupt.
    #[error("invalid input")]
    InvalidInput,
    /// The encoded file does not start with the `-2` sentinel.
    #[error("input file is corrupted: expected leading sentinel -2, found {0}")]
    BadSentinel(i64),
    /// A block does not start with the `-1` marker.
    #[error("input file is corrupted: block {block} starts with {found}, expected marker -1")]
    BadBlockMarker { block: usize, found: i64 },
    /// The header's block count disagrees with the blocks present.
    #[error("input file is corrupted: header declares {declared} blocks, found {found}")]
    BlockCountMismatch { declared: usize, found: usize },
    /// The encoded file ended in the middle of a header or block.
    #[error("input file is truncated")]
    Truncated,
    /// A code value that cannot be a dictionary code.
    #[error("invalid code value {0}")]
    InvalidCode(i64),
    /// A code that is neither in the dictionary nor the next code to be minted.
    #[error("code {0} is not in the dictionary")]
    UnknownCode(Code),
    /// Thread count outside the supported range.
    #[error("thread count {0} is outside 1..=16")]
    InvalidThreadCount(usize),
    /// The thread running a block panicked or could not be joined.
    #[error("worker for block {block} failed")]
    WorkerFailed { block: usize },
}

pub type PzResult<T> = Result<T, PzError>;
