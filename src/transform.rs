/// Sequential LZW over a single block.
///
/// These are the per-worker transforms. They take a block and a seeded
/// dictionary, mutate the dictionary in place, and know nothing about
/// threads or about the other blocks. A block encoded against dictionary
/// state `S` decodes exactly when the decoder's dictionary is in the
/// matching state `S`; after the block both dictionaries have learned the
/// same entries under the same codes.
use crate::dictionary::{DecodeDictionary, Dictionary, EncodeDictionary};
use crate::{Code, PzError, PzResult};

/// LZW-encode one block of bytes, extending `dict` as strings are learned.
///
/// An empty block emits nothing and leaves `dict` untouched.
pub fn encode_block(input: &[u8], dict: &mut EncodeDictionary) -> Vec<Code> {
    let Some((&first, rest)) = input.split_first() else {
        return Vec::new();
    };

    let mut codes = Vec::with_capacity(input.len() / 2 + 1);
    let mut prefix = first as Code;
    for &byte in rest {
        match dict.child(prefix, byte) {
            Some(extended) => prefix = extended,
            None => {
                codes.push(prefix);
                dict.insert(prefix, byte);
                prefix = byte as Code;
            }
        }
    }
    codes.push(prefix);
    codes
}

/// LZW-decode one block of codes, extending `dict` in lockstep with the
/// encoder that produced them.
///
/// The first code must already be in `dict`. A later code may also be the
/// one about to be minted (the KwKwK case), which is rebuilt from the
/// previous string. Any other unknown code is corruption.
pub fn decode_block(codes: &[Code], dict: &mut DecodeDictionary) -> PzResult<Vec<u8>> {
    let Some((&first, rest)) = codes.split_first() else {
        return Ok(Vec::new());
    };

    let mut output = Vec::with_capacity(codes.len() * 2);
    dict.expand_into(first, &mut output).ok_or(PzError::UnknownCode(first))?;

    let mut previous = first;
    for &code in rest {
        // The learned entry is the previous string plus the current one's
        // first byte. For KwKwK the current string starts like the previous.
        let head = match dict.first_byte(code) {
            Some(byte) => byte,
            None if code == dict.next_code() => dict
                .first_byte(previous)
                .ok_or(PzError::UnknownCode(previous))?,
            None => return Err(PzError::UnknownCode(code)),
        };
        dict.push(previous, head);
        dict.expand_into(code, &mut output).ok_or(PzError::UnknownCode(code))?;
        previous = code;
    }

    Ok(output)
}
