//! The decoded value tree produced by both bit-packed decoders (§9
//! "Value representation").

use std::collections::BTreeMap;

/// A decoded value. Recursive: structs, arrays, and choices all nest
/// further `Value`s.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Signed integer, wide enough for any `int{offset, bit_count}` range
    Int(i64),
    /// Boolean
    Bool(bool),
    /// Raw byte blob (a `blob` or a Versioned-form `bitarray`)
    Blob(Vec<u8>),
    /// Four-character ASCII code
    FourCc([u8; 4]),
    /// `struct` fields, keyed by declared field name
    Struct(BTreeMap<String, Value>),
    /// `array` elements, in order
    Array(Vec<Value>),
    /// Present value of an `optional`
    Optional(Option<Box<Value>>),
    /// A selected `choice` arm: its name and payload
    Choice { arm: String, value: Box<Value> },
    /// A BitPacked-form `bitarray`: `(bit_length, raw unsigned value)`
    BitArray { bit_length: u32, value: u64 },
    /// A Versioned-form `bitarray`: `(bit_length, aligned byte content)`
    BitBlob { bit_length: u32, bytes: Vec<u8> },
    /// IEEE-754 single precision
    Real32(f32),
    /// IEEE-754 double precision
    Real64(f64),
    /// The `null` type-info entry, or an absent `optional`
    Null,
}

impl Value {
    /// Project a struct field by name, if this is a struct and the field
    /// is present.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Struct(fields) => fields.get(name),
            _ => None,
        }
    }

    /// View this value as a signed integer, if it is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// View this value as a blob's bytes, if it is one.
    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Value::Blob(b) => Some(b),
            _ => None,
        }
    }

    /// View this value as an array's elements, if it is one.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Decode a blob's bytes as a UTF-8 string, lossily substituting
    /// invalid sequences. SC2 schema blobs that hold text are ASCII in
    /// practice, so this rarely triggers the lossy path.
    pub fn as_text(&self) -> Option<String> {
        self.as_blob()
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn struct_field_lookup() {
        let mut fields = BTreeMap::new();
        fields.insert("m_build".to_string(), Value::Int(89720));
        let value = Value::Struct(fields);
        assert_eq!(value.field("m_build").and_then(Value::as_int), Some(89720));
        assert_eq!(value.field("missing"), None);
    }

    #[test]
    fn non_struct_field_lookup_is_none() {
        assert_eq!(Value::Int(1).field("anything"), None);
    }
}
