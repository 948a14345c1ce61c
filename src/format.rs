/// Text container for encoded blocks.
///
/// Format (whitespace-separated decimal integers):
/// ```text
/// -2 <num_blocks>
/// -1 <len_0>
/// <code_0_0>
/// ...
/// -1 <len_1>
/// ...
/// ```
///
/// The writer puts the header and each block marker on their own line and
/// one code per line. The reader accepts any ASCII whitespace between
/// integers and rejects anything that does not match the layout exactly.
use std::io::{self, Read, Write};

use crate::partition::{code_ranges, CodeRange};
use crate::pipeline::StreamResult;
use crate::{Code, PzError, PzResult};

/// Sentinel that opens every encoded file.
pub const FILE_BEGIN: i64 = -2;

/// Marker that opens every block.
pub const NEW_BLOCK: i64 = -1;

/// Encoded blocks in file order, stored as one flattened code list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncodedFile {
    codes: Vec<Code>,
    ranges: Vec<CodeRange>,
}

impl EncodedFile {
    /// Build a file from per-block code sequences.
    pub fn from_blocks<I>(blocks: I) -> Self
    where
        I: IntoIterator<Item = Vec<Code>>,
    {
        let mut codes = Vec::new();
        let mut lens = Vec::new();
        for block in blocks {
            lens.push(block.len());
            codes.extend(block);
        }
        EncodedFile {
            codes,
            ranges: code_ranges(&lens),
        }
    }

    pub fn num_blocks(&self) -> usize {
        self.ranges.len()
    }

    /// Codes of block `index`.
    ///
    /// # Panics
    /// Panics if `index >= self.num_blocks()`.
    pub fn block(&self, index: usize) -> &[Code] {
        &self.codes[self.ranges[index].as_range()]
    }

    pub fn blocks(&self) -> impl Iterator<Item = &[Code]> + '_ {
        self.ranges.iter().map(|r| &self.codes[r.as_range()])
    }

    /// Every code in file order.
    pub fn codes(&self) -> &[Code] {
        &self.codes
    }

    pub fn ranges(&self) -> &[CodeRange] {
        &self.ranges
    }

    pub fn total_codes(&self) -> usize {
        self.codes.len()
    }

    pub fn max_code(&self) -> Option<Code> {
        self.codes.iter().copied().max()
    }

    /// Serialize to `output`.
    pub fn write_to<W: Write>(&self, mut output: W) -> io::Result<()> {
        writeln!(output, "{} {}", FILE_BEGIN, self.num_blocks())?;
        for block in self.blocks() {
            writeln!(output, "{} {}", NEW_BLOCK, block.len())?;
            for code in block {
                writeln!(output, "{code}")?;
            }
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(16 + self.codes.len() * 4);
        self.write_to(&mut out).expect("writing to a Vec<u8> cannot fail");
        out
    }

    /// Read `input` to the end and parse it with [`EncodedFile::from_bytes`].
    pub fn read_from<R: Read>(mut input: R) -> StreamResult<Self> {
        let mut data = Vec::new();
        input.read_to_end(&mut data)?;
        Ok(Self::from_bytes(&data)?)
    }

    /// Parse an encoded file.
    ///
    /// Fails without a partial result on a wrong leading sentinel, a wrong
    /// block marker, a block count that disagrees with the header, a short
    /// block, or any token that is not a valid integer or code.
    pub fn from_bytes(data: &[u8]) -> PzResult<Self> {
        let mut tokens = data
            .split(u8::is_ascii_whitespace)
            .filter(|t| !t.is_empty())
            .map(parse_int);

        let sentinel = next_int(&mut tokens)?.ok_or(PzError::Truncated)?;
        if sentinel != FILE_BEGIN {
            return Err(PzError::BadSentinel(sentinel));
        }
        let declared = next_int(&mut tokens)?.ok_or(PzError::Truncated)?;
        let declared = usize::try_from(declared).map_err(|_| PzError::InvalidInput)?;

        let mut codes = Vec::new();
        let mut ranges = Vec::new();
        while let Some(marker) = next_int(&mut tokens)? {
            let block = ranges.len();
            if marker != NEW_BLOCK {
                return Err(PzError::BadBlockMarker {
                    block,
                    found: marker,
                });
            }
            let len = next_int(&mut tokens)?.ok_or(PzError::Truncated)?;
            let len = usize::try_from(len).map_err(|_| PzError::InvalidInput)?;

            let start = codes.len();
            for _ in 0..len {
                let value = next_int(&mut tokens)?.ok_or(PzError::Truncated)?;
                let code = Code::try_from(value).map_err(|_| PzError::InvalidCode(value))?;
                codes.push(code);
            }
            ranges.push(CodeRange { start, len });
        }

        if ranges.len() != declared {
            return Err(PzError::BlockCountMismatch {
                declared,
                found: ranges.len(),
            });
        }
        Ok(EncodedFile { codes, ranges })
    }
}

fn parse_int(token: &[u8]) -> PzResult<i64> {
    std::str::from_utf8(token)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(PzError::InvalidInput)
}

fn next_int<I>(tokens: &mut I) -> PzResult<Option<i64>>
where
    I: Iterator<Item = PzResult<i64>>,
{
    tokens.next().transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EncodedFile {
        EncodedFile::from_blocks(vec![vec![65, 66, 256], vec![], vec![67]])
    }

    #[test]
    fn test_write_layout() {
        let text = String::from_utf8(sample().to_bytes()).unwrap();
        assert_eq!(text, "-2 3\n-1 3\n65\n66\n256\n-1 0\n-1 1\n67\n");
    }

    #[test]
    fn test_read_written() {
        let file = sample();
        let parsed = EncodedFile::from_bytes(&file.to_bytes()).unwrap();
        assert_eq!(parsed, file);
        assert_eq!(parsed.block(0), &[65, 66, 256]);
        assert!(parsed.block(1).is_empty());
        assert_eq!(parsed.block(2), &[67]);
        assert_eq!(parsed.total_codes(), 4);
        assert_eq!(parsed.max_code(), Some(256));
    }

    #[test]
    fn test_read_from_reader() {
        let file = sample();
        let bytes = file.to_bytes();
        let parsed = EncodedFile::read_from(io::Cursor::new(&bytes)).unwrap();
        assert_eq!(parsed, file);
        let parsed = EncodedFile::read_from(&bytes[..]).unwrap();
        assert_eq!(parsed, file);
    }

    #[test]
    fn test_read_from_reports_parse_and_io_errors() {
        use crate::pipeline::StreamError;

        let err = EncodedFile::read_from(&b"5 1\n-1 1\n65\n"[..]).unwrap_err();
        assert!(matches!(err, StreamError::Pz(PzError::BadSentinel(5))), "{err:?}");

        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("disk gone"))
            }
        }
        let err = EncodedFile::read_from(Broken).unwrap_err();
        assert!(matches!(err, StreamError::Read(_)), "{err:?}");
        assert_eq!(err.to_string(), "I/O error: disk gone");
    }

    #[test]
    fn test_read_any_whitespace() {
        let parsed = EncodedFile::from_bytes(b"  -2 2 -1 2 65\t66\r\n-1\n0\n").unwrap();
        assert_eq!(parsed.num_blocks(), 2);
        assert_eq!(parsed.block(0), &[65, 66]);
        assert!(parsed.block(1).is_empty());
    }

    #[test]
    fn test_read_empty_block_list() {
        let parsed = EncodedFile::from_bytes(b"-2 0\n").unwrap();
        assert_eq!(parsed.num_blocks(), 0);
        assert_eq!(parsed.max_code(), None);
    }

    #[test]
    fn test_read_bad_sentinel() {
        assert_eq!(
            EncodedFile::from_bytes(b"5 1\n-1 1\n65\n"),
            Err(PzError::BadSentinel(5))
        );
    }

    #[test]
    fn test_read_empty_input() {
        assert_eq!(EncodedFile::from_bytes(b""), Err(PzError::Truncated));
        assert_eq!(EncodedFile::from_bytes(b"-2"), Err(PzError::Truncated));
    }

    #[test]
    fn test_read_bad_block_marker() {
        assert_eq!(
            EncodedFile::from_bytes(b"-2 2\n-1 1\n65\n-3 1\n66\n"),
            Err(PzError::BadBlockMarker {
                block: 1,
                found: -3
            })
        );
    }

    #[test]
    fn test_read_extra_code_looks_like_bad_marker() {
        assert_eq!(
            EncodedFile::from_bytes(b"-2 1\n-1 1\n65\n66\n"),
            Err(PzError::BadBlockMarker {
                block: 1,
                found: 66
            })
        );
    }

    #[test]
    fn test_read_block_count_mismatch() {
        assert_eq!(
            EncodedFile::from_bytes(b"-2 3\n-1 1\n65\n"),
            Err(PzError::BlockCountMismatch {
                declared: 3,
                found: 1
            })
        );
    }

    #[test]
    fn test_read_truncated_block() {
        assert_eq!(
            EncodedFile::from_bytes(b"-2 1\n-1 4\n65\n66\n"),
            Err(PzError::Truncated)
        );
        assert_eq!(EncodedFile::from_bytes(b"-2 1\n-1"), Err(PzError::Truncated));
    }

    #[test]
    fn test_read_invalid_values() {
        assert_eq!(
            EncodedFile::from_bytes(b"-2 1\n-1 1\n-7\n"),
            Err(PzError::InvalidCode(-7))
        );
        assert_eq!(
            EncodedFile::from_bytes(b"-2 1\n-1 1\n99999999999\n"),
            Err(PzError::InvalidCode(99_999_999_999))
        );
        assert_eq!(
            EncodedFile::from_bytes(b"-2 1\n-1 1\nABC\n"),
            Err(PzError::InvalidInput)
        );
        assert_eq!(
            EncodedFile::from_bytes(b"-2 -1\n"),
            Err(PzError::InvalidInput)
        );
        assert_eq!(
            EncodedFile::from_bytes(b"-2 1\n-1 -4\n"),
            Err(PzError::InvalidInput)
        );
    }
}
