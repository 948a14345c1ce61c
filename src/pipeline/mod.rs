//! Whole-input encode and decode runs.
//!
//! **Encode:** split the input into `threads` byte blocks, run the LZW
//! encode transform over the thread tree starting from the byte alphabet,
//! and collect the per-block code sequences in file order.
//!
//! **Decode:** take the block layout recorded in the encoded file, run the
//! LZW decode transform over the same thread tree, and concatenate the
//! decoded blocks.
//!
//! The file-level helpers read the whole input and finish the transform
//! before creating the output file, so a corrupt input never clobbers an
//! existing output.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, info_span};

use crate::dictionary::{DecodeDictionary, Dictionary, EncodeDictionary};
use crate::format::EncodedFile;
use crate::partition::byte_ranges;
use crate::stats::EncodeStats;
use crate::transform::{decode_block, encode_block};
use crate::tree;
use crate::{Code, PzError, PzResult};


/// Smallest accepted thread (block) count.
pub const MIN_THREADS: usize = 1;
/// Largest accepted thread (block) count.
pub const MAX_THREADS: usize = 16;

/// Options controlling encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Number of blocks, and so of worker nodes in the thread tree.
    /// Must be in `MIN_THREADS..=MAX_THREADS`.
    pub threads: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions { threads: 1 }
    }
}

impl EncodeOptions {
    pub fn validate(&self) -> PzResult<()> {
        if (MIN_THREADS..=MAX_THREADS).contains(&self.threads) {
            Ok(())
        } else {
            Err(PzError::InvalidThreadCount(self.threads))
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Error type for file-level operations.
///
/// Wraps codec errors (`PzError`) and I/O errors. Kept separate from
/// `PzError` so that `PzError` retains `Clone + PartialEq`.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// Encoding or decoding error.
    #[error(transparent)]
    Pz(#[from] PzError),
    /// I/O error on a named file.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// I/O error on an unnamed reader or writer.
    #[error("I/O error: {0}")]
    Read(#[from] io::Error),
}

impl StreamError {
    fn io(path: &Path, source: io::Error) -> Self {
        StreamError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for file-level operations.
pub type StreamResult<T> = Result<T, StreamError>;

// ---------------------------------------------------------------------------
// In-memory API
// ---------------------------------------------------------------------------

/// Encode `input` into `options.threads` blocks.
pub fn encode(input: &[u8], options: &EncodeOptions) -> PzResult<EncodedFile> {
    options.validate()?;
    let _span = info_span!("encode", threads = options.threads, bytes = input.len()).entered();

    let blocks: Vec<&[u8]> = byte_ranges(input.len(), options.threads)
        .into_iter()
        .map(|range| &input[range])
        .collect();

    let results = tree::run(&blocks, EncodeDictionary::alphabet(), |block, bytes, dict| {
        let codes = encode_block(bytes, dict);
        debug!(block, bytes = bytes.len(), codes = codes.len(), "encoded block");
        Ok(codes)
    });
    let blocks = results.into_iter().collect::<PzResult<Vec<Vec<Code>>>>()?;

    let file = EncodedFile::from_blocks(blocks);
    info!(codes = file.total_codes(), "encode finished");
    Ok(file)
}

/// Decode every block of `file` and concatenate the results.
pub fn decode(file: &EncodedFile) -> PzResult<Vec<u8>> {
    let _span = info_span!("decode", blocks = file.num_blocks()).entered();

    let blocks: Vec<&[Code]> = file.blocks().collect();
    let results = tree::run(&blocks, DecodeDictionary::alphabet(), |block, codes, dict| {
        let bytes = decode_block(codes, dict)?;
        debug!(block, codes = codes.len(), bytes = bytes.len(), "decoded block");
        Ok(bytes)
    });

    let mut output = Vec::new();
    for result in results {
        output.extend_from_slice(&result?);
    }
    info!(bytes = output.len(), "decode finished");
    Ok(output)
}

// ---------------------------------------------------------------------------
// File API
// ---------------------------------------------------------------------------

/// Encode the file at `input` and write the encoded text to `output`.
///
/// The output file is only created once encoding has succeeded.
pub fn encode_file(input: &Path, output: &Path, options: &EncodeOptions) -> StreamResult<EncodeStats> {
    options.validate()?;
    let data = fs::read(input).map_err(|e| StreamError::io(input, e))?;
    let file = encode(&data, options)?;

    let out = fs::File::create(output).map_err(|e| StreamError::io(output, e))?;
    let mut writer = BufWriter::new(out);
    file.write_to(&mut writer)
        .and_then(|()| writer.flush())
        .map_err(|e| StreamError::io(output, e))?;

    Ok(EncodeStats::new(data.len() as u64, &file))
}

/// Decode the encoded file at `input` and write the original bytes to
/// `output`. Returns the number of bytes written.
///
/// Parsing and decoding finish before the output file is created, so a
/// corrupt input leaves `output` untouched.
pub fn decode_file(input: &Path, output: &Path) -> StreamResult<u64> {
    let data = fs::read(input).map_err(|e| StreamError::io(input, e))?;
    let file = EncodedFile::from_bytes(&data)?;
    let decoded = decode(&file)?;
    fs::write(output, &decoded).map_err(|e| StreamError::io(output, e))?;
    Ok(decoded.len() as u64)
}
