//! String-length classification ladder: which token form a string's length
//! and ASCII-ness select, for value context and field-name context.
//!
//! Kept as a pure classifier separate from the encoder so the range math in
//! spec lives in exactly one place; `encode.rs` matches on the returned enum
//! instead of re-deriving the boundaries inline.

/// How a value-context string of a given length and ASCII-ness is encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueStringForm {
    /// `0x20`, no payload.
    Empty,
    /// `0x40 + (len - 1)`, len in [1, 32].
    TinyAscii,
    /// `0x60 + (len - 33)`, len in [33, 64].
    SmallAscii,
    /// `0xE0`, VInt(len), bytes, `0xFC`.
    LongAscii,
    /// `0x80 + (len - 2)`, len in [2, 33].
    TinyUnicode,
    /// `0xA0 + (len - 34)`, len in [34, 64].
    ShortUnicode,
    /// `0xE4`, VInt(len), bytes, `0xFC`.
    LongUnicode,
}

/// Classify a value-context string by byte length and ASCII-ness (spec.md §4.5).
pub fn classify_value(len: usize, ascii: bool) -> ValueStringForm {
    use ValueStringForm::*;
    if len == 0 {
        return Empty;
    }
    if ascii {
        match len {
            1..=32 => TinyAscii,
            33..=64 => SmallAscii,
            _ => LongAscii,
        }
    } else {
        match len {
            // A single-byte non-ASCII UTF-8 sequence cannot occur; len == 1
            // non-ASCII strings are impossible, not merely unhandled here.
            2..=33 => TinyUnicode,
            34..=64 => ShortUnicode,
            _ => LongUnicode,
        }
    }
}

/// How a field-name-context string of a given length and ASCII-ness is encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldStringForm {
    /// `0x20`, no payload.
    Empty,
    /// `0x80 + (len - 1)`, len in [1, 64].
    ShortAscii,
    /// `0xC0 + (len - 1)`, len in [1, 64].
    ShortUnicode,
    /// `0x34`, VInt(len), bytes, `0xFC`.
    Long,
}

/// Classify a field-name-context string by byte length and ASCII-ness (spec.md §4.5).
pub fn classify_field(len: usize, ascii: bool) -> FieldStringForm {
    use FieldStringForm::*;
    if len == 0 {
        return Empty;
    }
    if len <= 64 {
        if ascii {
            ShortAscii
        } else {
            ShortUnicode
        }
    } else {
        Long
    }
}
