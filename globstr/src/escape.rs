//! Decoding of string literal escapes.
//!
//! Front ends usually hold string literals in their source spelling. This
//! module turns that spelling into the raw payload bytes that end up in the
//! global's initializer.
//!
//! | Escape     | Bytes                         |
//! |------------|-------------------------------|
//! | `\n`       | `0x0A`                        |
//! | `\r`       | `0x0D`                        |
//! | `\t`       | `0x09`                        |
//! | `\0`       | `0x00`                        |
//! | `\\`       | `0x5C`                        |
//! | `\'`       | `0x27`                        |
//! | `\"`       | `0x22`                        |
//! | `\xNN`     | the byte `0xNN`               |
//! | `\u{N..}`  | UTF-8 encoding of the scalar  |
//!
//! Any other escape (`\q`, say) is an error. It is never passed through as
//! the bare character, so a typo in a literal cannot silently change the
//! bytes of a global.

use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

/// Errors from decoding a string literal.
///
/// Offsets are byte offsets of the backslash that starts the bad escape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EscapeError {
    /// Unknown escape character.
    #[error("unknown escape sequence `\\{ch}` at offset {offset}")]
    Unknown {
        /// Character following the backslash.
        ch: char,
        /// Offset of the backslash.
        offset: usize,
    },

    /// `\x` not followed by two hex digits.
    #[error("malformed hex escape at offset {offset}")]
    MalformedHex {
        /// Offset of the backslash.
        offset: usize,
    },

    /// `\u` not followed by `{hex}`.
    #[error("malformed unicode escape at offset {offset}")]
    MalformedUnicode {
        /// Offset of the backslash.
        offset: usize,
    },

    /// `\u{...}` naming a surrogate or an out-of-range value.
    #[error("invalid unicode scalar value {value:#x} at offset {offset}")]
    InvalidCodePoint {
        /// Value between the braces.
        value: u32,
        /// Offset of the backslash.
        offset: usize,
    },

    /// The literal ends with a lone backslash.
    #[error("trailing backslash at offset {offset}")]
    TrailingBackslash {
        /// Offset of the backslash.
        offset: usize,
    },
}

/// Decode the escapes in `literal` into raw bytes.
///
/// The literal is the text between the quotes; no surrounding quotes are
/// expected or stripped.
pub fn unescape(literal: &str) -> Result<Vec<u8>, EscapeError> {
    let mut result = Vec::with_capacity(literal.len());
    let mut chars = literal.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            result.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }

        match chars.next() {
            Some((_, 'n')) => result.push(b'\n'),
            Some((_, 'r')) => result.push(b'\r'),
            Some((_, 't')) => result.push(b'\t'),
            Some((_, '0')) => result.push(0),
            Some((_, '\\')) => result.push(b'\\'),
            Some((_, '\'')) => result.push(b'\''),
            Some((_, '"')) => result.push(b'"'),
            Some((_, 'x')) => result.push(hex_byte(&mut chars, offset)?),
            Some((_, 'u')) => {
                let ch = unicode_scalar(&mut chars, offset)?;
                let mut buf = [0u8; 4];
                result.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            }
            Some((_, ch)) => return Err(EscapeError::Unknown { ch, offset }),
            None => return Err(EscapeError::TrailingBackslash { offset }),
        }
    }

    Ok(result)
}

/// Parse the two hex digits of a `\xNN` escape.
fn hex_byte(chars: &mut Peekable<CharIndices<'_>>, offset: usize) -> Result<u8, EscapeError> {
    let mut value = 0u8;
    for _ in 0..2 {
        let digit = chars
            .next()
            .and_then(|(_, h)| h.to_digit(16))
            .ok_or(EscapeError::MalformedHex { offset })?;
        value = (value << 4) | digit as u8;
    }
    Ok(value)
}

/// Parse the `{N..}` part of a `\u{N..}` escape.
fn unicode_scalar(
    chars: &mut Peekable<CharIndices<'_>>,
    offset: usize,
) -> Result<char, EscapeError> {
    if !matches!(chars.next(), Some((_, '{'))) {
        return Err(EscapeError::MalformedUnicode { offset });
    }

    let mut value: u32 = 0;
    let mut digits = 0;
    loop {
        match chars.next() {
            Some((_, '}')) if digits > 0 => break,
            Some((_, h)) if digits < 6 => {
                let digit = h
                    .to_digit(16)
                    .ok_or(EscapeError::MalformedUnicode { offset })?;
                value = (value << 4) | digit;
                digits += 1;
            }
            _ => return Err(EscapeError::MalformedUnicode { offset }),
        }
    }

    char::from_u32(value).ok_or(EscapeError::InvalidCodePoint { value, offset })
}
