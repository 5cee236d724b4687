//! Library error types.
//!
use std::fmt;

/// A smile-codec Result, normally returning a [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error produced while encoding or decoding a Smile-format byte stream.
///
/// This is a closed set: every failure mode the codec can hit is named here,
/// so callers can match on it exhaustively instead of inspecting a message
/// string. Decoding fails fast and does not attempt recovery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The first three bytes of the input were not `0x3A 0x29 0x0A`.
    InvalidHeader,
    /// The dispatcher ran out of input with no token byte to read.
    UnexpectedEndOfInput,
    /// Fewer than 4 bytes remained after a 32-bit integer token.
    IncompleteInt32,
    /// Fewer than 8 bytes remained after a 64-bit integer token.
    IncompleteInt64,
    /// Fewer than 4 bytes remained after a 32-bit float token.
    IncompleteFloat32,
    /// Fewer than 8 bytes remained after a 64-bit float token.
    IncompleteFloat64,
    /// A string's declared length exceeded the bytes remaining in the input.
    IncompleteString,
    /// A long string ran to end-of-input without hitting its `0xFC` terminator.
    MissingStringTerminator,
    /// A long field name ran to end-of-input without hitting its `0xFC` terminator.
    MissingFieldNameTerminator,
    /// A VInt's continuation bit never cleared before the input ran out.
    IncompleteVInt,
    /// A long shared-value reference's index byte was missing.
    IncompleteSharedReference,
    /// A long shared-name reference's index bytes were missing.
    IncompleteSharedNameReference,
    /// A dispatch byte in value context had no defined meaning.
    UnknownToken(u8),
    /// A dispatch byte in field-name context had no defined meaning.
    UnknownKeyToken(u8),
    /// A shared-name or shared-value reference pointed past the end of its table.
    InvalidSharedReference(usize),
    /// A decoded byte sequence was not valid UTF-8 where a string was expected.
    InvalidUtf8,
    /// Encode-only: the input value had no representation in the Smile type set.
    UnsupportedType(&'static str),
    /// Encode-only: a signed 64-bit integer could not be produced for the input.
    IntegerOutOfRange,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::InvalidHeader => write!(f, "input does not start with the Smile header bytes"),
            Error::UnexpectedEndOfInput => write!(f, "ran out of input expecting a token byte"),
            Error::IncompleteInt32 => write!(f, "not enough bytes for a 32-bit integer token"),
            Error::IncompleteInt64 => write!(f, "not enough bytes for a 64-bit integer token"),
            Error::IncompleteFloat32 => write!(f, "not enough bytes for a 32-bit float token"),
            Error::IncompleteFloat64 => write!(f, "not enough bytes for a 64-bit float token"),
            Error::IncompleteString => write!(f, "declared string length exceeds remaining input"),
            Error::MissingStringTerminator => {
                write!(f, "long string ran to end of input without a terminator")
            }
            Error::MissingFieldNameTerminator => {
                write!(f, "long field name ran to end of input without a terminator")
            }
            Error::IncompleteVInt => write!(f, "VInt continuation bits never terminated"),
            Error::IncompleteSharedReference => {
                write!(f, "long shared-value reference was truncated")
            }
            Error::IncompleteSharedNameReference => {
                write!(f, "long shared-name reference was truncated")
            }
            Error::UnknownToken(b) => write!(f, "unrecognized value token 0x{:02x}", b),
            Error::UnknownKeyToken(b) => write!(f, "unrecognized field name token 0x{:02x}", b),
            Error::InvalidSharedReference(idx) => {
                write!(f, "shared reference to index {} has no entry yet", idx)
            }
            Error::InvalidUtf8 => write!(f, "decoded string bytes were not valid UTF-8"),
            Error::UnsupportedType(name) => {
                write!(f, "value of type {} has no Smile encoding", name)
            }
            Error::IntegerOutOfRange => {
                write!(f, "integer does not fit in a signed 64-bit value")
            }
        }
    }
}

impl std::error::Error for Error {}
