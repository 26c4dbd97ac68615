// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema-guided binary encoding of [`Datum`] values.
//!
//! Layout (little-endian, no padding):
//! - boolean: one byte, 0 or 1
//! - int / long / float / double: fixed width
//! - string / bytes: `u32` length, then the raw bytes
//! - array: `u32` count, then each element
//! - map: `u32` count, then (string key, value) pairs in key order
//! - record: each field in schema order
//! - enum: `u32` symbol index
//! - union: `u32` branch index, then the value under that branch
//!
//! The byte stream carries no schema; the reader must supply the same one.
//!
//! Decoding treats counts as untrusted: a count must fit the remaining input
//! at the item's minimum width, and a single decode yields at most
//! [`MAX_ZERO_WIDTH_ITEMS`] elements that occupy no bytes.

use crate::datum::Datum;
use crate::error::{Error, Result};
use crate::generic::GenericRecord;
use crate::schema::Schema;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::sync::Arc;

/// Upper bound on zero-width elements (null, empty records) per decode.
pub const MAX_ZERO_WIDTH_ITEMS: usize = 1 << 20;

/// Encode `datum` as described by `schema`.
pub fn encode(datum: &Datum, schema: &Schema) -> Result<Vec<u8>> {
    let mut encoder = Encoder { buffer: Vec::new() };
    encoder.encode_value(datum, schema)?;
    Ok(encoder.buffer)
}

/// Decode a single value of `schema`; trailing bytes are an error.
pub fn decode(bytes: &[u8], schema: &Schema) -> Result<Datum> {
    let mut decoder = Decoder {
        cursor: Cursor::new(bytes),
        zero_width_items: 0,
    };
    let datum = decoder.decode_value(schema)?;
    let consumed = decoder.cursor.position() as usize;
    if consumed != bytes.len() {
        return Err(Error::Codec(format!(
            "{} trailing bytes after {}",
            bytes.len() - consumed,
            schema.kind()
        )));
    }
    Ok(datum)
}

struct Encoder {
    buffer: Vec<u8>,
}

impl Encoder {
    fn write_len(&mut self, len: usize) -> Result<()> {
        let len = u32::try_from(len)
            .map_err(|_| Error::Codec(format!("length {} exceeds u32", len)))?;
        self.buffer.write_u32::<LittleEndian>(len).map_err(io_err)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_len(bytes.len())?;
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    fn encode_value(&mut self, value: &Datum, schema: &Schema) -> Result<()> {
        match (schema, value) {
            (Schema::Null, Datum::Null) => Ok(()),
            (Schema::Boolean, Datum::Boolean(v)) => {
                self.buffer.push(u8::from(*v));
                Ok(())
            }
            (Schema::Int, Datum::Int(v)) => {
                self.buffer.write_i32::<LittleEndian>(*v).map_err(io_err)
            }
            (Schema::Long, Datum::Long(v)) => {
                self.buffer.write_i64::<LittleEndian>(*v).map_err(io_err)
            }
            (Schema::Float, Datum::Float(v)) => {
                self.buffer.write_f32::<LittleEndian>(*v).map_err(io_err)
            }
            (Schema::Double, Datum::Double(v)) => {
                self.buffer.write_f64::<LittleEndian>(*v).map_err(io_err)
            }
            (Schema::Bytes, Datum::Bytes(v)) => self.write_bytes(v),
            (Schema::String, Datum::String(s)) => self.write_bytes(s.as_bytes()),
            (Schema::Array { items }, Datum::Array(values)) => {
                self.write_len(values.len())?;
                for elem in values {
                    self.encode_value(elem, items)?;
                }
                Ok(())
            }
            (Schema::Map { values }, Datum::Map(entries)) => {
                self.write_len(entries.len())?;
                for (key, entry) in entries {
                    self.write_bytes(key.as_bytes())?;
                    self.encode_value(entry, values)?;
                }
                Ok(())
            }
            (Schema::Record { name, fields }, Datum::Record(record)) => {
                if record.values().len() != fields.len() {
                    return Err(Error::mismatch(
                        format!("{} fields for record {}", fields.len(), name),
                        format!("{} values", record.values().len()),
                    ));
                }
                for (field, field_value) in fields.iter().zip(record.values()) {
                    self.encode_value(field_value, &field.schema)?;
                }
                Ok(())
            }
            (Schema::Enum { name, symbols }, Datum::Enum(symbol)) => {
                let index = symbols.iter().position(|s| s == symbol).ok_or_else(|| {
                    Error::mismatch(format!("symbol of enum {}", name), symbol.clone())
                })?;
                self.write_len(index)
            }
            (Schema::Union { branches }, datum) => {
                let index = schema
                    .branch_for(datum)
                    .ok_or_else(|| Error::mismatch("union branch", datum.kind()))?;
                self.write_len(index)?;
                self.encode_value(datum, &branches[index])
            }
            (schema, value) => Err(Error::mismatch(schema.kind(), value.kind())),
        }
    }
}

/// Smallest number of bytes a value of `schema` can encode to.
fn min_width(schema: &Schema) -> usize {
    match schema {
        Schema::Null => 0,
        Schema::Boolean => 1,
        Schema::Int | Schema::Float => 4,
        Schema::Long | Schema::Double => 8,
        Schema::Bytes
        | Schema::String
        | Schema::Array { .. }
        | Schema::Map { .. }
        | Schema::Enum { .. }
        | Schema::Union { .. } => 4,
        Schema::Record { fields, .. } => fields.iter().map(|f| min_width(&f.schema)).sum(),
    }
}

struct Decoder<'a> {
    cursor: Cursor<&'a [u8]>,
    zero_width_items: usize,
}

impl Decoder<'_> {
    fn remaining(&self) -> usize {
        let data = self.cursor.get_ref();
        data.len().saturating_sub(self.cursor.position() as usize)
    }

    fn read_len(&mut self) -> Result<usize> {
        let len = self.cursor.read_u32::<LittleEndian>().map_err(io_err)?;
        Ok(len as usize)
    }

    /// Read a count of items at least `width` bytes wide each.
    fn read_count(&mut self, width: usize) -> Result<usize> {
        let count = self.read_len()?;
        if width == 0 {
            self.zero_width_items = self.zero_width_items.saturating_add(count);
            if self.zero_width_items > MAX_ZERO_WIDTH_ITEMS {
                return Err(Error::Codec(format!(
                    "more than {} zero-width items",
                    MAX_ZERO_WIDTH_ITEMS
                )));
            }
        } else if count.saturating_mul(width) > self.remaining() {
            return Err(Error::Codec(format!(
                "count {} needs at least {} bytes, have {}",
                count,
                count.saturating_mul(width),
                self.remaining()
            )));
        }
        Ok(count)
    }

    fn read_bytes(&mut self) -> Result<Vec<u8>> {
        let len = self.read_len()?;
        if len > self.remaining() {
            return Err(Error::Codec(format!(
                "buffer too small: need {} bytes, have {}",
                len,
                self.remaining()
            )));
        }
        let mut bytes = vec![0u8; len];
        self.cursor.read_exact(&mut bytes).map_err(io_err)?;
        Ok(bytes)
    }

    fn read_string(&mut self) -> Result<String> {
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes).map_err(|e| Error::Codec(format!("UTF-8 error: {}", e)))
    }

    fn decode_value(&mut self, schema: &Schema) -> Result<Datum> {
        let datum = match schema {
            Schema::Null => Datum::Null,
            Schema::Boolean => match self.cursor.read_u8().map_err(io_err)? {
                0 => Datum::Boolean(false),
                1 => Datum::Boolean(true),
                other => return Err(Error::Codec(format!("invalid boolean byte {}", other))),
            },
            Schema::Int => Datum::Int(self.cursor.read_i32::<LittleEndian>().map_err(io_err)?),
            Schema::Long => Datum::Long(self.cursor.read_i64::<LittleEndian>().map_err(io_err)?),
            Schema::Float => Datum::Float(self.cursor.read_f32::<LittleEndian>().map_err(io_err)?),
            Schema::Double => {
                Datum::Double(self.cursor.read_f64::<LittleEndian>().map_err(io_err)?)
            }
            Schema::Bytes => Datum::Bytes(self.read_bytes()?),
            Schema::String => Datum::String(self.read_string()?),
            Schema::Array { items } => {
                let count = self.read_count(min_width(items))?;
                let mut values = Vec::with_capacity(count);
                for _ in 0..count {
                    values.push(self.decode_value(items)?);
                }
                Datum::Array(values)
            }
            Schema::Map { values } => {
                let count = self.read_count(4 + min_width(values))?;
                let mut entries = BTreeMap::new();
                for _ in 0..count {
                    let key = self.read_string()?;
                    if entries.contains_key(&key) {
                        return Err(Error::Codec(format!("duplicate map key '{}'", key)));
                    }
                    let value = self.decode_value(values)?;
                    entries.insert(key, value);
                }
                Datum::Map(entries)
            }
            Schema::Record { fields, .. } => {
                let mut values = Vec::with_capacity(fields.len());
                for field in fields {
                    values.push(self.decode_value(&field.schema)?);
                }
                Datum::Record(GenericRecord::from_values(
                    Arc::new(schema.clone()),
                    values,
                )?)
            }
            Schema::Enum { name, symbols } => {
                let index = self.read_len()?;
                let symbol = symbols.get(index).ok_or_else(|| {
                    Error::Codec(format!("enum {} has no symbol at index {}", name, index))
                })?;
                Datum::Enum(symbol.clone())
            }
            Schema::Union { branches } => {
                let index = self.read_len()?;
                let branch = branches.get(index).ok_or_else(|| {
                    Error::Codec(format!("union has no branch at index {}", index))
                })?;
                self.decode_value(branch)?
            }
        };
        Ok(datum)
    }
}

fn io_err(e: std::io::Error) -> Error {
    Error::Codec(e.to_string())
}
