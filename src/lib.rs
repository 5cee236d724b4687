//! Codec for the FasterXML Smile binary JSON interchange format
//! (version 1.0.0).
//!
//! ```
//! use smile_codec::{encode, decode, Options, Value};
//!
//! let value = Value::from("hello");
//! let bytes = encode(&value, &Options::default()).unwrap();
//! assert_eq!(decode(&bytes).unwrap(), value);
//! ```

mod error;
mod header;
mod marker;
mod strclass;
mod tables;
mod varint;
mod zigzag;

pub mod decode;
pub mod encode;
mod value;

pub use decode::decode;
pub use encode::{encode, Options};
pub use error::{Error, Result};
pub use value::{OrderedMap, Value};
