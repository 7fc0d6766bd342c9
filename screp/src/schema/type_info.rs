//! The type-info table: a closed, numerically indexed graph describing
//! how to decode every value the schema names (§3 "Type-Info Table", §9).

/// A field within a `struct` type-info entry
#[derive(Debug, Clone, Copy)]
pub struct Field {
    /// Field name, as it appears in the decoded `Value::Struct` map
    pub name: &'static str,
    /// Type-id of this field's value
    pub type_id: u32,
    /// Wire tag used by the Versioned struct decoder to identify this
    /// field out of declaration order; `-1` marks the "__parent" embed rule
    pub tag: i32,
}

/// One arm of a `choice` type-info entry
#[derive(Debug, Clone, Copy)]
pub struct ChoiceArm {
    /// Arm name, used as the key of the decoded `Value::Choice`
    pub name: &'static str,
    /// Tag value on the wire that selects this arm
    pub tag: u32,
    /// Type-id of this arm's payload
    pub type_id: u32,
}

/// A single entry of the type-info table (§3).
///
/// The tag/payload shape mirrors the specification's tagged-record
/// description directly: one variant per wire form, no behavior beyond
/// "how to read my bits" attached to any of them.
#[derive(Debug, Clone, Copy)]
pub enum TypeInfo {
    /// Bounded or unbounded integer. Versioned ignores `bit_count` and
    /// reads a signed varint; BitPacked reads exactly `bit_count` bits
    /// and adds `offset`.
    Int { offset: i64, bit_count: u8 },
    /// Boolean, backed by an `Int{0,1}` read.
    Bool,
    /// Length-prefixed byte blob. `bit_count` bounds the BitPacked length
    /// field's width; Versioned always reads the length as a varint.
    Blob { bit_count: u8 },
    /// Ordered, named fields. See [`Field`] for the "__parent" embed rule.
    Struct { fields: &'static [Field] },
    /// Homogeneous, length-prefixed sequence of `element_type_id`.
    Array { length_bits: u8, element_type_id: u32 },
    /// Present/absent wrapper around `inner_type_id`.
    Optional { inner_type_id: u32 },
    /// Tagged union selected by a `tag_bits`-wide (BitPacked) or varint
    /// (Versioned) discriminant.
    Choice { tag_bits: u8, arms: &'static [ChoiceArm] },
    /// Four-byte ASCII code, e.g. a map/player-tag identifier.
    FourCc,
    /// Always decodes to `Value::Null`, consuming nothing.
    Null,
    /// Length-prefixed bit run. Versioned decodes to aligned bytes;
    /// BitPacked decodes to a raw integer (§3: "semantically load-bearing"
    /// divergence — never unified).
    BitArray { length_bits: u8 },
    /// Big-endian IEEE-754 single precision.
    Real32,
    /// Big-endian IEEE-754 double precision.
    Real64,
}

/// An ordered, indexed table of [`TypeInfo`] entries.
///
/// Invariant: every `type_id` referenced by any entry (field, array
/// element, optional inner, choice arm) is `< types.len()` — the table
/// is a closed graph. This is checked once, at construction, rather
/// than re-validated on every decode.
#[derive(Debug, Clone, Copy)]
pub struct TypeTable {
    pub types: &'static [TypeInfo],
}

impl TypeTable {
    /// Look up a type by id.
    pub fn get(&self, type_id: u32) -> Option<&'static TypeInfo> {
        self.types.get(type_id as usize)
    }

    /// Validate that every type-id referenced anywhere in the table is
    /// in range. Intended to run once in a test, not on the hot path.
    pub fn validate_closed(&self) -> Result<(), u32> {
        for t in self.types {
            match t {
                TypeInfo::Struct { fields } => {
                    for f in *fields {
                        self.check(f.type_id)?;
                    }
                }
                TypeInfo::Array { element_type_id, .. } => self.check(*element_type_id)?,
                TypeInfo::Optional { inner_type_id } => self.check(*inner_type_id)?,
                TypeInfo::Choice { arms, .. } => {
                    for a in *arms {
                        self.check(a.type_id)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn check(&self, type_id: u32) -> Result<(), u32> {
        if (type_id as usize) < self.types.len() {
            Ok(())
        } else {
            Err(type_id)
        }
    }
}
