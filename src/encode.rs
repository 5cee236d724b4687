//! Encoder: walks a [`Value`](crate::Value) and emits Smile tokens, updating
//! the shared-reference tables as it goes.

use crate::error::{Error, Result};
use crate::header;
use crate::strclass::{self, FieldStringForm, ValueStringForm};
use crate::tables::{EncodeTable, MAX_SHARED_VALUE_INDEX, MAX_SHARED_VALUE_LEN};
use crate::value::{OrderedMap, Value};
use crate::zigzag;

/// The three header-flag / back-reference options an encode call runs under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Options {
    pub shared_names: bool,
    pub shared_values: bool,
    pub raw_binary: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            shared_names: true,
            shared_values: true,
            raw_binary: false,
        }
    }
}

struct Encoder {
    buf: Vec<u8>,
    options: Options,
    name_table: EncodeTable,
    value_table: EncodeTable,
}

/// Encode `value` into a Smile byte stream under `options`.
pub fn encode(value: &Value, options: &Options) -> Result<Vec<u8>> {
    let mut enc = Encoder {
        buf: Vec::new(),
        options: *options,
        name_table: EncodeTable::new(),
        value_table: EncodeTable::new(),
    };
    header::encode(
        &mut enc.buf,
        header::Flags {
            shared_names: options.shared_names,
            shared_values: options.shared_values,
            raw_binary: options.raw_binary,
        },
    );
    enc.write_value(value)?;
    Ok(enc.buf)
}

impl Encoder {
    fn write_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.buf.push(0x21),
            Value::Bool(false) => self.buf.push(0x22),
            Value::Bool(true) => self.buf.push(0x23),
            Value::Int(v) => self.write_int(*v),
            Value::Float(v) => {
                self.buf.push(0x29);
                self.buf.extend_from_slice(&v.to_bits().to_be_bytes());
            }
            Value::Str(s) => self.write_value_string(s),
            Value::Array(items) => {
                self.buf.push(0xF8);
                for item in items {
                    self.write_value(item)?;
                }
                self.buf.push(0xF9);
            }
            Value::Object(entries) => self.write_object(entries)?,
        }
        Ok(())
    }

    fn write_int(&mut self, v: i64) {
        if (-16..=15).contains(&v) {
            self.buf.push(0xC0 | ((v as i8) & 0x1F) as u8);
        } else if let Ok(v32) = i32::try_from(v) {
            self.buf.push(0x24);
            self.buf
                .extend_from_slice(&zigzag::encode_32(v32).to_be_bytes());
        } else {
            self.buf.push(0x25);
            self.buf
                .extend_from_slice(&zigzag::encode_64(v).to_be_bytes());
        }
    }

    fn write_value_string(&mut self, s: &str) {
        if s.is_empty() {
            self.buf.push(0x20);
            return;
        }
        let eligible = self.options.shared_values && s.len() <= MAX_SHARED_VALUE_LEN;
        if eligible {
            if let Some(idx) = self.value_table.find(s) {
                if idx <= MAX_SHARED_VALUE_INDEX {
                    self.write_value_reference(idx);
                    return;
                }
                // Table index has grown past what the one-byte/0xEC reference
                // forms can express (spec.md §4.8 caps at 286); the entry
                // already exists but can no longer be referenced, so fall
                // back to a literal without inserting a duplicate.
                self.emit_value_string_literal(s);
                return;
            }
        }
        self.emit_value_string_literal(s);
        if eligible && self.value_table.has_room() {
            self.value_table.insert(s);
        }
    }

    fn emit_value_string_literal(&mut self, s: &str) {
        let len = s.len();
        let ascii = s.is_ascii();
        match strclass::classify_value(len, ascii) {
            ValueStringForm::Empty => self.buf.push(0x20),
            ValueStringForm::TinyAscii => {
                self.buf.push(0x40 + (len as u8 - 1));
                self.buf.extend_from_slice(s.as_bytes());
            }
            ValueStringForm::SmallAscii => {
                self.buf.push(0x60 + (len as u8 - 33));
                self.buf.extend_from_slice(s.as_bytes());
            }
            ValueStringForm::LongAscii => {
                self.buf.push(0xE0);
                crate::varint::write(&mut self.buf, len as u64);
                self.buf.extend_from_slice(s.as_bytes());
                self.buf.push(0xFC);
            }
            ValueStringForm::TinyUnicode => {
                self.buf.push(0x80 + (len as u8 - 2));
                self.buf.extend_from_slice(s.as_bytes());
            }
            ValueStringForm::ShortUnicode => {
                self.buf.push(0xA0 + (len as u8 - 34));
                self.buf.extend_from_slice(s.as_bytes());
            }
            ValueStringForm::LongUnicode => {
                self.buf.push(0xE4);
                crate::varint::write(&mut self.buf, len as u64);
                self.buf.extend_from_slice(s.as_bytes());
                self.buf.push(0xFC);
            }
        }
    }

    fn write_value_reference(&mut self, idx: usize) {
        if idx <= 30 {
            self.buf.push((idx + 1) as u8);
        } else {
            self.buf.push(0xEC);
            self.buf.push((idx - 31) as u8);
        }
    }

    fn write_object(&mut self, entries: &OrderedMap) -> Result<()> {
        self.buf.push(0xFA);
        for (key, value) in entries.iter() {
            self.write_field_name(key);
            self.write_value(value)?;
        }
        self.buf.push(0xFB);
        Ok(())
    }

    fn write_field_name(&mut self, name: &str) {
        if name.is_empty() {
            self.buf.push(0x20);
            return;
        }
        if self.options.shared_names {
            if let Some(idx) = self.name_table.find(name) {
                self.write_name_reference(idx);
                return;
            }
        }
        self.emit_field_name_literal(name);
        if self.options.shared_names && self.name_table.has_room() {
            self.name_table.insert(name);
        }
    }

    fn emit_field_name_literal(&mut self, name: &str) {
        let len = name.len();
        let ascii = name.is_ascii();
        match strclass::classify_field(len, ascii) {
            FieldStringForm::Empty => self.buf.push(0x20),
            FieldStringForm::ShortAscii => {
                self.buf.push(0x80 + (len as u8 - 1));
                self.buf.extend_from_slice(name.as_bytes());
            }
            FieldStringForm::ShortUnicode => {
                self.buf.push(0xC0 + (len as u8 - 1));
                self.buf.extend_from_slice(name.as_bytes());
            }
            FieldStringForm::Long => {
                self.buf.push(0x34);
                crate::varint::write(&mut self.buf, len as u64);
                self.buf.extend_from_slice(name.as_bytes());
                self.buf.push(0xFC);
            }
        }
    }

    fn write_name_reference(&mut self, idx: usize) {
        if idx <= 63 {
            self.buf.push(0x40 + idx as u8);
        } else {
            self.buf.push(0x30);
            self.buf.extend_from_slice(&(idx as u16).to_be_bytes());
        }
    }
}

/// Marker used only to satisfy `Error::UnsupportedType`'s signature for host
/// adapters that map their own types onto [`Value`] before calling [`encode`].
/// The core encoder above never produces this error: every [`Value`] variant
/// has a defined Smile encoding.
pub fn unsupported(type_name: &'static str) -> Error {
    Error::UnsupportedType(type_name)
}
