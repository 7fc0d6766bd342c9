//! The schema table model: type-info entries, the decoded value tree,
//! a representative build's hand-transcribed table, and the
//! build-version registry (§3 "Type-Info Table", §9).

mod build_89720;
mod registry;
mod type_info;
mod value;

pub use registry::{schema_for_build, Schema};
pub use type_info::{ChoiceArm, Field, TypeInfo, TypeTable};
pub use value::Value;
