//! The two bit-packed decoders (Versioned, BitPacked) sharing the bit
//! cursor, the schema table, and the dispatch skeleton (§4.D, §9 "Two
//! decoders, one cursor").

mod bitpacked;
mod versioned;

pub use bitpacked::BitPackedDecoder;
pub use versioned::VersionedDecoder;
