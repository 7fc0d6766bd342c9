//! The Versioned decoder: every value is preceded by a skip-tag byte
//! that declares its wire form, which lets the decoder skip unknown
//! fields and choice arms without understanding their shape (§4.D).

use std::collections::BTreeMap;

use crate::bit_reader::BitCursor;
use crate::schema::{Field, TypeInfo, TypeTable, Value};
use crate::{Error, Result};

mod tag {
    pub const ARRAY: u8 = 0;
    pub const BITBLOB: u8 = 1;
    pub const BLOB: u8 = 2;
    pub const CHOICE: u8 = 3;
    pub const OPTIONAL: u8 = 4;
    pub const STRUCT: u8 = 5;
    pub const U8: u8 = 6;
    pub const U32: u8 = 7;
    pub const U64: u8 = 8;
    pub const VINT: u8 = 9;
}

/// Decodes a byte-aligned, self-describing ("Versioned") stream against
/// a [`TypeTable`], owning its cursor by value (§9 "Two decoders, one
/// cursor").
pub struct VersionedDecoder<'a> {
    cursor: BitCursor<'a>,
    schema: &'a TypeTable,
}

impl<'a> VersionedDecoder<'a> {
    /// Build a decoder over `cursor` against `schema`.
    pub fn new(cursor: BitCursor<'a>, schema: &'a TypeTable) -> Self {
        VersionedDecoder { cursor, schema }
    }

    /// Consume the underlying cursor, handing it back to the caller
    /// (the event stream driver reuses it across events).
    pub fn into_cursor(self) -> BitCursor<'a> {
        self.cursor
    }

    /// Mutable access to the underlying cursor, e.g. for `used_bits()`.
    pub fn cursor_mut(&mut self) -> &mut BitCursor<'a> {
        &mut self.cursor
    }

    /// Read a raw event id: a vint, with no preceding skip tag (§4.E
    /// step 4 — event ids are stream framing, not a schema-described
    /// value).
    pub fn read_event_id(&mut self) -> Result<u16> {
        Ok(self.read_vint()? as u16)
    }

    fn read_tag(&mut self) -> Result<u8> {
        Ok(self.cursor.read_aligned_bytes(1)?[0])
    }

    fn expect_tag(&mut self, expected: u8) -> Result<()> {
        let found = self.read_tag()?;
        if found != expected {
            return Err(Error::invalid_format(format!(
                "expected skip tag {expected}, found {found}"
            )));
        }
        Ok(())
    }

    /// Signed ZigZag-like varint (§4.D "Vint").
    fn read_vint(&mut self) -> Result<i64> {
        let b0 = self.cursor.read_aligned_bytes(1)?[0];
        let sign = b0 & 1 != 0;
        let mut magnitude: u64 = ((b0 >> 1) & 0x3F) as u64;
        let mut cont = b0 & 0x80 != 0;
        let mut k: u32 = 0;
        while cont {
            let b = self.cursor.read_aligned_bytes(1)?[0];
            magnitude |= ((b & 0x7F) as u64) << (6 + 7 * k);
            cont = b & 0x80 != 0;
            k += 1;
        }
        Ok(if sign {
            -(magnitude as i64)
        } else {
            magnitude as i64
        })
    }

    fn type_info(&self, type_id: u32) -> Result<&'a TypeInfo> {
        self.schema
            .get(type_id)
            .ok_or_else(|| Error::invalid_format(format!("type-id {type_id} out of range")))
    }

    /// Decode a value of `type_id`.
    pub fn decode(&mut self, type_id: u32) -> Result<Value> {
        let info = self.type_info(type_id)?;
        match *info {
            TypeInfo::Int { .. } => {
                self.expect_tag(tag::VINT)?;
                Ok(Value::Int(self.read_vint()?))
            }
            TypeInfo::Bool => {
                self.expect_tag(tag::U8)?;
                let byte = self.cursor.read_aligned_bytes(1)?[0];
                Ok(Value::Bool(byte != 0))
            }
            TypeInfo::Blob { .. } => {
                self.expect_tag(tag::BLOB)?;
                let len = self.read_vint()? as usize;
                Ok(Value::Blob(self.cursor.read_aligned_bytes(len)?.to_vec()))
            }
            TypeInfo::FourCc => {
                self.expect_tag(tag::U32)?;
                let bytes = self.cursor.read_aligned_bytes(4)?;
                Ok(Value::FourCc([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
            TypeInfo::Real32 => {
                self.expect_tag(tag::U32)?;
                let bytes = self.cursor.read_aligned_bytes(4)?;
                Ok(Value::Real32(f32::from_be_bytes(
                    bytes.try_into().expect("4 bytes"),
                )))
            }
            TypeInfo::Real64 => {
                self.expect_tag(tag::U64)?;
                let bytes = self.cursor.read_aligned_bytes(8)?;
                Ok(Value::Real64(f64::from_be_bytes(
                    bytes.try_into().expect("8 bytes"),
                )))
            }
            TypeInfo::Array { element_type_id, .. } => {
                self.expect_tag(tag::ARRAY)?;
                let len = self.read_vint()? as usize;
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.decode(element_type_id)?);
                }
                Ok(Value::Array(items))
            }
            TypeInfo::Optional { inner_type_id } => {
                self.expect_tag(tag::OPTIONAL)?;
                let present = self.cursor.read_aligned_bytes(1)?[0] != 0;
                if present {
                    Ok(Value::Optional(Some(Box::new(self.decode(inner_type_id)?))))
                } else {
                    Ok(Value::Optional(None))
                }
            }
            TypeInfo::Choice { arms, .. } => {
                self.expect_tag(tag::CHOICE)?;
                let selected = self.read_vint()? as u32;
                match arms.iter().find(|a| a.tag == selected) {
                    Some(arm) => {
                        let value = self.decode(arm.type_id)?;
                        Ok(Value::Choice {
                            arm: arm.name.to_string(),
                            value: Box::new(value),
                        })
                    }
                    None => {
                        self.skip_value()?;
                        Ok(Value::Null)
                    }
                }
            }
            TypeInfo::Struct { fields } => {
                self.expect_tag(tag::STRUCT)?;
                let count = self.read_vint()? as usize;
                let mut decoded = BTreeMap::new();
                for _ in 0..count {
                    let field_tag = self.read_vint()? as i32;
                    match fields.iter().find(|f| f.tag == field_tag) {
                        Some(field) => {
                            let value = self.decode(field.type_id)?;
                            decoded.insert(field.name.to_string(), value);
                        }
                        None => self.skip_value()?,
                    }
                }
                Ok(apply_parent_rule(fields, decoded))
            }
            TypeInfo::BitArray { .. } => {
                self.expect_tag(tag::BITBLOB)?;
                let bit_length = self.read_vint()? as u32;
                let byte_len = bit_length.div_ceil(8) as usize;
                let bytes = self.cursor.read_aligned_bytes(byte_len)?.to_vec();
                Ok(Value::BitBlob { bit_length, bytes })
            }
            TypeInfo::Null => Ok(Value::Null),
        }
    }

    /// Recursively consume and discard one value of unknown type,
    /// driven entirely by its own wire tag (§4.D "Skip routine").
    fn skip_value(&mut self) -> Result<()> {
        let found = self.read_tag()?;
        match found {
            tag::VINT => {
                self.read_vint()?;
            }
            tag::U8 => {
                self.cursor.read_aligned_bytes(1)?;
            }
            tag::U32 => {
                self.cursor.read_aligned_bytes(4)?;
            }
            tag::U64 => {
                self.cursor.read_aligned_bytes(8)?;
            }
            tag::BLOB => {
                let len = self.read_vint()? as usize;
                self.cursor.read_aligned_bytes(len)?;
            }
            tag::BITBLOB => {
                let bit_length = self.read_vint()? as u32;
                let byte_len = bit_length.div_ceil(8) as usize;
                self.cursor.read_aligned_bytes(byte_len)?;
            }
            tag::ARRAY => {
                let len = self.read_vint()?;
                for _ in 0..len {
                    self.skip_value()?;
                }
            }
            tag::OPTIONAL => {
                let present = self.cursor.read_aligned_bytes(1)?[0] != 0;
                if present {
                    self.skip_value()?;
                }
            }
            tag::CHOICE => {
                self.read_vint()?;
                self.skip_value()?;
            }
            tag::STRUCT => {
                let count = self.read_vint()?;
                for _ in 0..count {
                    self.read_vint()?;
                    self.skip_value()?;
                }
            }
            other => {
                return Err(Error::invalid_format(format!(
                    "unknown skip tag {other}"
                )))
            }
        }
        Ok(())
    }
}

/// Apply the `"__parent"` embedding rule (§4.D struct dispatch): a field
/// of that name either merges its struct's fields into the enclosing
/// one, or — when it is the struct's only declared field — replaces the
/// whole struct with its own value.
pub(super) fn apply_parent_rule(schema_fields: &[Field], mut decoded: BTreeMap<String, Value>) -> Value {
    if schema_fields.len() == 1 && schema_fields[0].name == "__parent" {
        if let Some(parent) = decoded.remove("__parent") {
            return parent;
        }
        return Value::Struct(decoded);
    }

    if let Some(parent) = decoded.remove("__parent") {
        if let Value::Struct(parent_fields) = parent {
            decoded.extend(parent_fields);
        } else {
            decoded.insert("__parent".to_string(), parent);
        }
    }
    Value::Struct(decoded)
}
