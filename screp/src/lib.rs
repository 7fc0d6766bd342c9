//! # screp
//!
//! `screp` is a Rust library for reading StarCraft II replay files
//! (`.SC2Replay`). A replay is an MPQ archive carrying a handful of
//! member files encoded in a bit-packed wire protocol; this crate
//! provides both layers:
//!
//! - the MPQ container: header discovery, the classic hash/block
//!   tables, filename hashing, and block decryption/decompression
//!   (`mpq`, `crypto`, `compression`);
//! - the bit-packed protocol: a shared bit cursor, the Versioned and
//!   BitPacked decoders, the schema table that drives both, and the
//!   lazy event stream driver built on top of them (`bit_reader`,
//!   `schema`, `decode`, `events`).
//!
//! ## Example
//!
//! ```no_run
//! use screp::Replay;
//!
//! # fn main() -> screp::Result<()> {
//! let replay = Replay::open("example.SC2Replay")?;
//! let header = replay.header()?;
//! for event in replay.tracker_events() {
//!     let event = event?;
//!     println!("{:?} @ loop {}", event.event_name, event.gameloop);
//! }
//! # let _ = header;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

pub mod attributes;
pub mod bit_reader;
pub mod byte_reader;
pub mod compression;
pub mod crypto;
pub mod decode;
pub mod error;
pub mod events;
pub mod mpq;
pub mod normalize;
pub mod replay;
pub mod schema;
pub mod special_files;

pub use error::{Error, Result};
pub use mpq::Archive;
pub use replay::Replay;
