//! Decoder: reads Smile tokens and reconstructs a [`Value`](crate::Value),
//! maintaining the shared-reference tables in lockstep with the rules in
//! `tables.rs`.

use byteorder::{BigEndian, ReadBytesExt};

use crate::error::{Error, Result};
use crate::header;
use crate::marker::{FieldMarker, Marker};
use crate::tables::{DecodeTable, MAX_SHARED_VALUE_LEN};
use crate::value::{OrderedMap, Value};
use crate::varint;
use crate::zigzag;

struct Decoder<'a> {
    buf: &'a [u8],
    shared_names: bool,
    shared_values: bool,
    name_table: DecodeTable,
    value_table: DecodeTable,
}

/// Decode a complete Smile byte stream into a [`Value`].
pub fn decode(bytes: &[u8]) -> Result<Value> {
    let mut buf = bytes;
    let header = header::decode(&mut buf)?;
    let mut dec = Decoder {
        buf,
        shared_names: header.flags.shared_names,
        shared_values: header.flags.shared_values,
        name_table: DecodeTable::new(),
        value_table: DecodeTable::new(),
    };
    dec.read_value()
}

impl<'a> Decoder<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.buf.len() < n {
            return Err(Error::IncompleteString);
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    fn next_byte(&mut self) -> Result<u8> {
        let &b = self.buf.first().ok_or(Error::UnexpectedEndOfInput)?;
        self.buf = &self.buf[1..];
        Ok(b)
    }

    fn read_string_bytes(&mut self, len: usize) -> Result<String> {
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| Error::InvalidUtf8)
    }

    fn read_long_string_bytes(&mut self) -> Result<String> {
        let len = varint::read(&mut self.buf)? as usize;
        let bytes = self.take(len)?;
        let terminator = self.next_byte()?;
        if terminator != 0xFC {
            return Err(Error::MissingStringTerminator);
        }
        String::from_utf8(bytes.to_vec()).map_err(|_| Error::InvalidUtf8)
    }

    fn read_long_field_name_bytes(&mut self) -> Result<String> {
        let len = varint::read(&mut self.buf)? as usize;
        let bytes = self.take(len)?;
        let terminator = self.next_byte()?;
        if terminator != 0xFC {
            return Err(Error::MissingFieldNameTerminator);
        }
        String::from_utf8(bytes.to_vec()).map_err(|_| Error::InvalidUtf8)
    }

    fn maybe_share_value(&mut self, s: &str) {
        if self.shared_values && s.len() <= MAX_SHARED_VALUE_LEN && self.value_table.has_room() {
            self.value_table.push(s.to_string());
        }
    }

    fn maybe_share_name(&mut self, s: &str) {
        if self.shared_names && self.name_table.has_room() {
            self.name_table.push(s.to_string());
        }
    }

    fn read_value(&mut self) -> Result<Value> {
        let byte = self.next_byte()?;
        match Marker::from_u8(byte) {
            Marker::Null => Ok(Value::Null),
            Marker::False => Ok(Value::Bool(false)),
            Marker::True => Ok(Value::Bool(true)),
            Marker::EmptyString => Ok(Value::Str(String::new())),
            Marker::StartArray => self.read_array(),
            Marker::StartObject => self.read_object(),
            Marker::SmallInt(v) => Ok(Value::Int(v as i64)),
            Marker::Int32 => {
                let bits = self
                    .buf
                    .read_u32::<BigEndian>()
                    .map_err(|_| Error::IncompleteInt32)?;
                Ok(Value::Int(zigzag::decode_32(bits) as i64))
            }
            Marker::Int64 => {
                let bits = self
                    .buf
                    .read_u64::<BigEndian>()
                    .map_err(|_| Error::IncompleteInt64)?;
                Ok(Value::Int(zigzag::decode_64(bits)))
            }
            Marker::Float32 => {
                let bits = self
                    .buf
                    .read_u32::<BigEndian>()
                    .map_err(|_| Error::IncompleteFloat32)?;
                Ok(Value::Float(f32::from_bits(bits) as f64))
            }
            Marker::Float64 => {
                let bits = self
                    .buf
                    .read_u64::<BigEndian>()
                    .map_err(|_| Error::IncompleteFloat64)?;
                Ok(Value::Float(f64::from_bits(bits)))
            }
            Marker::TinyAscii(low5) => {
                let s = self.read_string_bytes(low5 as usize + 1)?;
                self.maybe_share_value(&s);
                Ok(Value::Str(s))
            }
            Marker::SmallAscii(low5) => {
                let s = self.read_string_bytes(low5 as usize + 33)?;
                self.maybe_share_value(&s);
                Ok(Value::Str(s))
            }
            Marker::TinyUnicode(low5) => {
                let s = self.read_string_bytes(low5 as usize + 2)?;
                self.maybe_share_value(&s);
                Ok(Value::Str(s))
            }
            Marker::ShortUnicode(low5) => {
                let s = self.read_string_bytes(low5 as usize + 34)?;
                self.maybe_share_value(&s);
                Ok(Value::Str(s))
            }
            Marker::LongAscii | Marker::LongUnicode => {
                let s = self.read_long_string_bytes()?;
                self.maybe_share_value(&s);
                Ok(Value::Str(s))
            }
            Marker::ShortSharedValue(idx) => self.resolve_value_reference(idx as usize),
            Marker::LongSharedValue => {
                let b = self
                    .buf
                    .first()
                    .copied()
                    .ok_or(Error::IncompleteSharedReference)?;
                self.buf = &self.buf[1..];
                self.resolve_value_reference(b as usize + 31)
            }
            Marker::StringTerminator
            | Marker::EndArray
            | Marker::EndObject
            | Marker::Unknown(_) => Err(Error::UnknownToken(byte)),
        }
    }

    fn resolve_value_reference(&mut self, idx: usize) -> Result<Value> {
        self.value_table
            .get(idx)
            .map(|s| Value::Str(s.to_string()))
            .ok_or(Error::InvalidSharedReference(idx))
    }

    fn read_array(&mut self) -> Result<Value> {
        let mut items = Vec::new();
        loop {
            match self.buf.first() {
                None => return Err(Error::UnexpectedEndOfInput),
                Some(&0xF9) => {
                    self.buf = &self.buf[1..];
                    return Ok(Value::Array(items));
                }
                _ => items.push(self.read_value()?),
            }
        }
    }

    fn read_object(&mut self) -> Result<Value> {
        let mut map = OrderedMap::new();
        loop {
            match self.buf.first() {
                None => return Err(Error::UnexpectedEndOfInput),
                Some(&0xFB) => {
                    self.buf = &self.buf[1..];
                    return Ok(Value::Object(map));
                }
                _ => {
                    let key = self.read_field_name()?;
                    let value = self.read_value()?;
                    map.insert(key, value);
                }
            }
        }
    }

    fn read_field_name(&mut self) -> Result<String> {
        let byte = self.next_byte()?;
        match FieldMarker::from_u8(byte) {
            FieldMarker::Empty => Ok(String::new()),
            FieldMarker::ShortSharedName(idx) => self.resolve_name_reference(idx as usize),
            FieldMarker::LongSharedName => {
                let idx = self
                    .buf
                    .read_u16::<BigEndian>()
                    .map_err(|_| Error::IncompleteSharedNameReference)?;
                self.resolve_name_reference(idx as usize)
            }
            FieldMarker::ShortAscii(low6) => {
                let s = self.read_string_bytes(low6 as usize + 1)?;
                self.maybe_share_name(&s);
                Ok(s)
            }
            FieldMarker::ShortUnicode(low6) => {
                let s = self.read_string_bytes(low6 as usize + 1)?;
                self.maybe_share_name(&s);
                Ok(s)
            }
            FieldMarker::LongName => {
                let s = self.read_long_field_name_bytes()?;
                self.maybe_share_name(&s);
                Ok(s)
            }
            FieldMarker::Unknown(_) => Err(Error::UnknownKeyToken(byte)),
        }
    }

    fn resolve_name_reference(&mut self, idx: usize) -> Result<String> {
        self.name_table
            .get(idx)
            .map(|s| s.to_string())
            .ok_or(Error::InvalidSharedReference(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{encode, Options};
    use crate::value::OrderedMap;

    fn full(bytes: &[u8]) -> Vec<u8> {
        let mut v = vec![0x3A, 0x29, 0x0A, 0x03];
        v.extend_from_slice(bytes);
        v
    }

    #[test]
    fn null() {
        assert_eq!(decode(&full(&[0x21])).unwrap(), Value::Null);
    }

    #[test]
    fn bool_values() {
        assert_eq!(decode(&full(&[0x22])).unwrap(), Value::Bool(false));
        assert_eq!(decode(&full(&[0x23])).unwrap(), Value::Bool(true));
    }

    #[test]
    fn empty_string() {
        assert_eq!(decode(&full(&[0x20])).unwrap(), Value::Str(String::new()));
    }

    #[test]
    fn small_ints() {
        assert_eq!(decode(&full(&[0xC5])).unwrap(), Value::Int(5));
        assert_eq!(decode(&full(&[0xDF])).unwrap(), Value::Int(-1));
        assert_eq!(decode(&full(&[0xD0])).unwrap(), Value::Int(-16));
        assert_eq!(decode(&full(&[0xCF])).unwrap(), Value::Int(15));
    }

    #[test]
    fn five_byte_ascii() {
        assert_eq!(
            decode(&full(&[0x44, 0x68, 0x65, 0x6C, 0x6C, 0x6F])).unwrap(),
            Value::Str("hello".to_string())
        );
    }

    #[test]
    fn empty_array_and_object() {
        assert_eq!(decode(&full(&[0xF8, 0xF9])).unwrap(), Value::Array(vec![]));
        assert_eq!(
            decode(&full(&[0xFA, 0xFB])).unwrap(),
            Value::Object(OrderedMap::new())
        );
    }

    #[test]
    fn single_field_object() {
        let expected = {
            let mut m = OrderedMap::new();
            m.insert("a".to_string(), Value::Int(1));
            Value::Object(m)
        };
        assert_eq!(
            decode(&full(&[0xFA, 0x80, 0x61, 0xC1, 0xFB])).unwrap(),
            expected
        );
    }

    #[test]
    fn rejects_bad_header() {
        let bytes = vec![0x00, 0x29, 0x0A, 0x03, 0x21];
        assert_eq!(decode(&bytes), Err(Error::InvalidHeader));
    }

    #[test]
    fn rejects_garbage_prefix_universally() {
        // Any 3-byte prefix other than the exact magic is rejected.
        for first in [0x00u8, 0x3A, 0xFF] {
            for second in [0x00u8, 0x29] {
                for third in [0x00u8, 0x0A] {
                    if [first, second, third] == [0x3A, 0x29, 0x0A] {
                        continue;
                    }
                    let bytes = vec![first, second, third, 0x03, 0x21];
                    assert_eq!(decode(&bytes), Err(Error::InvalidHeader));
                }
            }
        }
    }

    #[test]
    fn unknown_token_errors() {
        assert_eq!(decode(&full(&[0x00])), Err(Error::UnknownToken(0x00)));
        assert_eq!(decode(&full(&[0xFC])), Err(Error::UnknownToken(0xFC)));
    }

    #[test]
    fn truncated_int32_errors() {
        assert_eq!(
            decode(&full(&[0x24, 0x01, 0x02])),
            Err(Error::IncompleteInt32)
        );
    }

    #[test]
    fn truncated_float64_errors() {
        assert_eq!(
            decode(&full(&[0x29, 0x00, 0x00, 0x00])),
            Err(Error::IncompleteFloat64)
        );
    }

    #[test]
    fn long_string_missing_terminator_errors() {
        assert_eq!(
            decode(&full(&[0xE0, 0x03, b'a', b'b', b'c'])),
            Err(Error::MissingStringTerminator)
        );
    }

    #[test]
    fn invalid_shared_reference_errors() {
        assert_eq!(decode(&full(&[0x01])), Err(Error::InvalidSharedReference(0)));
    }

    #[test]
    fn unexpected_end_of_input_inside_array() {
        assert_eq!(decode(&full(&[0xF8, 0x21])), Err(Error::UnexpectedEndOfInput));
    }

    #[test]
    fn roundtrip_through_encoder() {
        let mut inner = OrderedMap::new();
        inner.insert("k".to_string(), Value::Int(3));
        let mut outer = OrderedMap::new();
        outer.insert("k".to_string(), Value::Object(inner));
        outer.insert(
            "list".to_string(),
            Value::Array(vec![
                Value::Str("a".to_string()),
                Value::Str("a".to_string()),
                Value::Null,
                Value::Float(2.5),
            ]),
        );
        let value = Value::Object(outer);
        let bytes = encode(&value, &Options::default()).unwrap();
        assert_eq!(decode(&bytes).unwrap(), value);
    }

    #[test]
    fn option_independence() {
        let value = Value::Array(vec![Value::Int(42), Value::Str("same".to_string())]);
        for shared_names in [true, false] {
            for shared_values in [true, false] {
                let opts = Options {
                    shared_names,
                    shared_values,
                    raw_binary: false,
                };
                let bytes = encode(&value, &opts).unwrap();
                assert_eq!(decode(&bytes).unwrap(), value);
            }
        }
    }

    #[test]
    fn long_ascii_string_roundtrip() {
        let s = "x".repeat(100);
        let value = Value::Str(s.clone());
        let bytes = encode(&value, &Options::default()).unwrap();
        assert_eq!(decode(&bytes).unwrap(), Value::Str(s));
    }
}
