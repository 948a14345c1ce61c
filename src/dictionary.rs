/// LZW code dictionaries for both directions.
///
/// Both dictionaries start from the 256-entry byte alphabet and grow one
/// entry per learned string, minting codes in strictly increasing order
/// from `ALPHABET_SIZE`. Neither ever evicts.
///
/// A worker forks a dictionary with [`Dictionary::snapshot`], which returns
/// an independent deep copy. After the fork the two instances share nothing,
/// so each can be mutated by its own thread without locks.
use std::collections::HashMap;

use crate::Code;

/// Number of preinstalled single-byte codes.
pub const ALPHABET_SIZE: usize = 256;

/// First code minted for a learned string.
pub const FIRST_LEARNED_CODE: Code = ALPHABET_SIZE as Code;

/// Operations shared by the encode and decode dictionaries.
pub trait Dictionary: Send + Sized {
    /// A fresh dictionary holding only the byte alphabet.
    fn alphabet() -> Self;

    /// The code the next inserted entry will receive.
    fn next_code(&self) -> Code;

    /// Number of entries, alphabet included.
    fn len(&self) -> usize;

    /// False for any dictionary seeded from the alphabet.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fork this dictionary. The returned copy shares no storage with `self`.
    fn snapshot(&self) -> Self;
}

// ---------------------------------------------------------------------------
// Encode direction: string -> code
// ---------------------------------------------------------------------------

/// String-to-code mapping used by the encoder.
///
/// Every learned string is a known string plus one byte, so the mapping is
/// stored as a trie edge table: `(prefix_code, next_byte) -> code`. Single
/// bytes are implicit (`code == byte`).
#[derive(Debug, Clone)]
pub struct EncodeDictionary {
    edges: HashMap<(Code, u8), Code>,
    next_code: Code,
}

impl EncodeDictionary {
    /// Code for `prefix` extended by `byte`, if that string is known.
    #[inline]
    pub fn child(&self, prefix: Code, byte: u8) -> Option<Code> {
        self.edges.get(&(prefix, byte)).copied()
    }

    /// Learn `prefix + byte` under the next code and return that code.
    ///
    /// The caller must only insert strings that are not yet present.
    pub fn insert(&mut self, prefix: Code, byte: u8) -> Code {
        let code = self.next_code;
        let previous = self.edges.insert((prefix, byte), code);
        debug_assert!(previous.is_none(), "string inserted twice");
        self.next_code += 1;
        code
    }

    /// Code for a whole byte string, if present.
    pub fn get(&self, string: &[u8]) -> Option<Code> {
        let (&first, rest) = string.split_first()?;
        rest.iter()
            .try_fold(first as Code, |code, &byte| self.child(code, byte))
    }
}

impl Dictionary for EncodeDictionary {
    fn alphabet() -> Self {
        EncodeDictionary {
            edges: HashMap::new(),
            next_code: FIRST_LEARNED_CODE,
        }
    }

    fn next_code(&self) -> Code {
        self.next_code
    }

    fn len(&self) -> usize {
        ALPHABET_SIZE + self.edges.len()
    }

    fn snapshot(&self) -> Self {
        self.clone()
    }
}

// ---------------------------------------------------------------------------
// Decode direction: code -> string
// ---------------------------------------------------------------------------

/// Code-to-string mapping used by the decoder.
///
/// Codes are dense from zero. Like the encoder's trie, each entry stores
/// only its prefix code and final byte, so the table grows by a fixed
/// amount per code no matter how long the strings get. Strings are
/// rebuilt on demand by walking the prefix chain.
#[derive(Debug, Clone)]
pub struct DecodeDictionary {
    entries: Vec<Entry>,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    /// Code of the string minus its last byte, or `NO_PREFIX` for single bytes.
    prefix: Code,
    byte: u8,
    first: u8,
    len: u32,
}

const NO_PREFIX: Code = Code::MAX;

impl DecodeDictionary {
    #[inline]
    pub fn contains(&self, code: Code) -> bool {
        (code as usize) < self.entries.len()
    }

    /// First byte of the string for `code`, if present.
    #[inline]
    pub fn first_byte(&self, code: Code) -> Option<u8> {
        self.entries.get(code as usize).map(|e| e.first)
    }

    /// Append the string for `code` to `out` and return its length.
    /// Leaves `out` untouched and returns `None` for an unknown code.
    pub fn expand_into(&self, code: Code, out: &mut Vec<u8>) -> Option<usize> {
        let len = self.entries.get(code as usize)?.len as usize;
        let start = out.len();
        out.resize(start + len, 0);
        let mut cur = code;
        for slot in out[start..].iter_mut().rev() {
            let entry = &self.entries[cur as usize];
            *slot = entry.byte;
            cur = entry.prefix;
        }
        Some(len)
    }

    /// String for `code`, if present.
    pub fn get(&self, code: Code) -> Option<Vec<u8>> {
        let mut string = Vec::new();
        self.expand_into(code, &mut string)?;
        Some(string)
    }

    /// Learn the string for `prefix` extended by `byte` under the next code
    /// and return that code.
    ///
    /// # Panics
    /// Panics if `prefix` is not in the dictionary.
    pub fn push(&mut self, prefix: Code, byte: u8) -> Code {
        let code = self.next_code();
        let parent = self.entries[prefix as usize];
        self.entries.push(Entry {
            prefix,
            byte,
            first: parent.first,
            len: parent.len + 1,
        });
        code
    }
}

impl Dictionary for DecodeDictionary {
    fn alphabet() -> Self {
        DecodeDictionary {
            entries: (0..=u8::MAX)
                .map(|b| Entry {
                    prefix: NO_PREFIX,
                    byte: b,
                    first: b,
                    len: 1,
                })
                .collect(),
        }
    }

    fn next_code(&self) -> Code {
        self.entries.len() as Code
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn snapshot(&self) -> Self {
        self.clone()
    }
}
