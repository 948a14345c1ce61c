/// Compression summary for an encode run.
use std::fmt;

use crate::format::EncodedFile;
use crate::Code;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EncodeStats {
    /// Uncompressed input size in bytes.
    pub input_len: u64,
    /// Codes emitted across all blocks.
    pub total_codes: u64,
    /// Largest code emitted (0 for empty input).
    pub max_code: Code,
    /// Bits needed to store every emitted code at a fixed width.
    pub bits_per_code: u32,
    /// Size in bytes if the codes were bit-packed at `bits_per_code`.
    pub packed_size: u64,
}

impl EncodeStats {
    pub fn new(input_len: u64, file: &EncodedFile) -> Self {
        let max_code = file.max_code().unwrap_or(0);
        let bits_per_code = (Code::BITS - max_code.leading_zeros()).max(1);
        let total_codes = file.total_codes() as u64;
        EncodeStats {
            input_len,
            total_codes,
            max_code,
            bits_per_code,
            packed_size: (total_codes * bits_per_code as u64).div_ceil(8),
        }
    }

    /// `input_len / packed_size`, or 0 when nothing was emitted.
    pub fn ratio(&self) -> f64 {
        if self.packed_size == 0 {
            0.0
        } else {
            self.input_len as f64 / self.packed_size as f64
        }
    }
}

impl fmt::Display for EncodeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Maximum code: {}", self.max_code)?;
        writeln!(f, "Bits usage of code: {}", self.bits_per_code)?;
        writeln!(f, "# of output codes: {}", self.total_codes)?;
        writeln!(f, "Best compressed size: {} bytes", self.packed_size)?;
        write!(f, "Compression Rate = {:.4}", self.ratio())
    }
}
