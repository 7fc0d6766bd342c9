//! The BitPacked decoder: no wire tags at all — every value is a raw
//! bit pattern whose meaning comes entirely from the schema (§4.D).

use std::collections::BTreeMap;

use super::versioned::apply_parent_rule;
use crate::bit_reader::BitCursor;
use crate::schema::{TypeInfo, TypeTable, Value};
use crate::{Error, Result};

/// Decodes a densely bit-packed stream against a [`TypeTable`], owning
/// its cursor by value (§9 "Two decoders, one cursor").
pub struct BitPackedDecoder<'a> {
    cursor: BitCursor<'a>,
    schema: &'a TypeTable,
}

impl<'a> BitPackedDecoder<'a> {
    /// Build a decoder over `cursor` against `schema`.
    pub fn new(cursor: BitCursor<'a>, schema: &'a TypeTable) -> Self {
        BitPackedDecoder { cursor, schema }
    }

    /// Consume the underlying cursor, handing it back to the caller.
    pub fn into_cursor(self) -> BitCursor<'a> {
        self.cursor
    }

    /// Mutable access to the underlying cursor, e.g. for `used_bits()`.
    pub fn cursor_mut(&mut self) -> &mut BitCursor<'a> {
        &mut self.cursor
    }

    /// Read a raw event id: 7 bits, with no schema involvement at all
    /// (§4.E step 4 — event ids are stream framing, not a schema-described
    /// value).
    pub fn read_event_id(&mut self) -> Result<u16> {
        Ok(self.cursor.read_bits(7)? as u16)
    }

    fn type_info(&self, type_id: u32) -> Result<&'a TypeInfo> {
        self.schema
            .get(type_id)
            .ok_or_else(|| Error::invalid_format(format!("type-id {type_id} out of range")))
    }

    /// Read a raw `offset + bit_count`-bit integer, the primitive every
    /// other BitPacked form is expressed in terms of.
    fn read_int(&mut self, offset: i64, bit_count: u8) -> Result<i64> {
        if bit_count == 0 {
            return Ok(offset);
        }
        if bit_count > 32 {
            return Err(Error::invalid_format(format!(
                "bit_count {bit_count} exceeds the 32-bit read_bits limit"
            )));
        }
        Ok(offset + self.cursor.read_bits(bit_count as u32)? as i64)
    }

    /// Decode a value of `type_id`.
    pub fn decode(&mut self, type_id: u32) -> Result<Value> {
        let info = self.type_info(type_id)?;
        match *info {
            TypeInfo::Int { offset, bit_count } => Ok(Value::Int(self.read_int(offset, bit_count)?)),
            TypeInfo::Bool => Ok(Value::Bool(self.read_int(0, 1)? != 0)),
            TypeInfo::Blob { bit_count } => {
                let len = self.read_int(0, bit_count)? as usize;
                Ok(Value::Blob(self.cursor.read_aligned_bytes(len)?.to_vec()))
            }
            TypeInfo::FourCc => {
                let bytes = self.cursor.read_aligned_bytes(4)?;
                Ok(Value::FourCc([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
            TypeInfo::Real32 => {
                let bytes = self.cursor.read_aligned_bytes(4)?;
                Ok(Value::Real32(f32::from_be_bytes(
                    bytes.try_into().expect("4 bytes"),
                )))
            }
            TypeInfo::Real64 => {
                let bytes = self.cursor.read_aligned_bytes(8)?;
                Ok(Value::Real64(f64::from_be_bytes(
                    bytes.try_into().expect("8 bytes"),
                )))
            }
            TypeInfo::Array { length_bits, element_type_id } => {
                let len = self.read_int(0, length_bits)? as usize;
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.decode(element_type_id)?);
                }
                Ok(Value::Array(items))
            }
            TypeInfo::Optional { inner_type_id } => {
                let present = self.read_int(0, 1)? != 0;
                if present {
                    Ok(Value::Optional(Some(Box::new(self.decode(inner_type_id)?))))
                } else {
                    Ok(Value::Optional(None))
                }
            }
            TypeInfo::Choice { tag_bits, arms } => {
                let selected = self.read_int(0, tag_bits)? as u32;
                let arm = arms.iter().find(|a| a.tag == selected).ok_or_else(|| {
                    Error::invalid_format(format!("unknown choice tag {selected}"))
                })?;
                let value = self.decode(arm.type_id)?;
                Ok(Value::Choice {
                    arm: arm.name.to_string(),
                    value: Box::new(value),
                })
            }
            TypeInfo::Struct { fields } => {
                let mut decoded = BTreeMap::new();
                for field in fields {
                    decoded.insert(field.name.to_string(), self.decode(field.type_id)?);
                }
                Ok(apply_parent_rule(fields, decoded))
            }
            TypeInfo::BitArray { length_bits } => {
                let bit_length = self.read_int(0, length_bits)? as u32;
                if bit_length > 32 {
                    return Err(Error::invalid_format(format!(
                        "bitarray length {bit_length} exceeds the 32-bit read_bits limit"
                    )));
                }
                let value = if bit_length == 0 {
                    0
                } else {
                    self.cursor.read_bits(bit_length)? as u64
                };
                Ok(Value::BitArray { bit_length, value })
            }
            TypeInfo::Null => Ok(Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bit_reader::BitOrder;
    use crate::schema::{ChoiceArm, Field};

    fn cursor(data: &[u8]) -> BitCursor<'_> {
        BitCursor::new(data, BitOrder::Msb)
    }

    #[test]
    fn decodes_an_offset_integer() {
        static TYPES: &[TypeInfo] = &[TypeInfo::Int { offset: -5, bit_count: 4 }];
        let schema = TypeTable { types: TYPES };
        // 4 bits = 0b0011 = 3, + offset -5 = -2
        let data = [0b0011_0000];
        let mut decoder = BitPackedDecoder::new(cursor(&data), &schema);
        assert_eq!(decoder.decode(0).unwrap(), Value::Int(-2));
    }

    #[test]
    fn bitarray_returns_raw_value_not_bytes() {
        // R3: BitPacked bitarray{len=2, bits=0b11} yields (2, 3)
        static TYPES: &[TypeInfo] = &[TypeInfo::BitArray { length_bits: 3 }];
        let schema = TypeTable { types: TYPES };
        // length_bits=3 reads 3 bits for the length (=2), then reads 2 bits of value (=0b11=3)
        let data = [0b010_11_000];
        let mut decoder = BitPackedDecoder::new(cursor(&data), &schema);
        let value = decoder.decode(0).unwrap();
        assert_eq!(value, Value::BitArray { bit_length: 2, value: 3 });
    }

    #[test]
    fn choice_requires_a_known_arm() {
        static ARMS: &[ChoiceArm] = &[ChoiceArm { name: "a", tag: 0, type_id: 1 }];
        static TYPES: &[TypeInfo] = &[
            TypeInfo::Choice { tag_bits: 2, arms: ARMS },
            TypeInfo::Bool,
        ];
        let schema = TypeTable { types: TYPES };
        // tag bits = 0b11 = 3, unknown arm
        let data = [0b11_000000];
        let mut decoder = BitPackedDecoder::new(cursor(&data), &schema);
        assert!(decoder.decode(0).is_err());
    }

    #[test]
    fn struct_fields_decode_in_declared_order_without_tags() {
        static FIELDS: &[Field] = &[
            Field { name: "a", type_id: 1, tag: 0 },
            Field { name: "b", type_id: 1, tag: 1 },
        ];
        static TYPES: &[TypeInfo] = &[
            TypeInfo::Struct { fields: FIELDS },
            TypeInfo::Bool,
        ];
        let schema = TypeTable { types: TYPES };
        // a=1, b=0
        let data = [0b10_000000];
        let mut decoder = BitPackedDecoder::new(cursor(&data), &schema);
        let value = decoder.decode(0).unwrap();
        assert_eq!(value.field("a"), Some(&Value::Bool(true)));
        assert_eq!(value.field("b"), Some(&Value::Bool(false)));
    }
}
