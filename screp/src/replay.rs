//! High-level replay API tying the archive, schema, decoders, and event
//! stream driver together (§6 "Primary API surface").

use std::path::Path;

use crate::attributes::{self, Attributes};
use crate::bit_reader::{BitCursor, BitOrder};
use crate::decode::{BitPackedDecoder, VersionedDecoder};
use crate::events::{EventStream, StreamKind};
use crate::mpq::Archive;
use crate::schema::{schema_for_build, Schema, Value};
use crate::special_files::{parse_listfile, FIXED_MEMBER_FILES};
use crate::{Error, Result};

/// An opened SC2 replay: the archive plus the schema resolved for its
/// engine build.
///
/// The three event-stream member files are decompressed once at open
/// time and held for the replay's lifetime, so `game_events()` and
/// friends can hand out iterators that borrow from `self` rather than
/// from a freshly allocated buffer per call.
pub struct Replay {
    archive: Archive,
    schema: &'static Schema,
    game_bytes: Vec<u8>,
    message_bytes: Vec<u8>,
    tracker_bytes: Vec<u8>,
}

impl Replay {
    /// Open a replay from a file path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_archive(Archive::open(path)?)
    }

    /// Open a replay already resident in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_archive(Archive::from_bytes(data)?)
    }

    fn from_archive(archive: Archive) -> Result<Self> {
        let content = archive
            .user_data_content()
            .ok_or_else(|| Error::invalid_format("archive has no SC2 replay user-data header"))?;

        // Every build currently resolves to the same representative
        // schema (OQ5), so the build number doesn't change which table
        // gets used, but it's still decoded honestly from the header
        // rather than hardcoded.
        let probe_schema = schema_for_build(0);
        let header = decode_top_level(content, probe_schema, probe_schema.replay_header_type)?;
        let build = header
            .field("m_version")
            .and_then(|v| v.field("m_build"))
            .and_then(Value::as_int)
            .unwrap_or(0) as u32;
        let schema = schema_for_build(build);

        let game_bytes = read_optional(&archive, "replay.game.events");
        let message_bytes = read_optional(&archive, "replay.message.events");
        let tracker_bytes = read_optional(&archive, "replay.tracker.events");

        Ok(Replay { archive, schema, game_bytes, message_bytes, tracker_bytes })
    }

    /// The underlying archive, for direct member-file access.
    pub fn archive(&self) -> &Archive {
        &self.archive
    }

    /// Member file names: `(listfile)` content when present and
    /// non-empty, otherwise the fixed inventory filtered by lookup
    /// success (§6).
    pub fn member_names(&self) -> Vec<String> {
        if let Ok(data) = self.archive.read_file("(listfile)") {
            if let Ok(names) = parse_listfile(&data) {
                if !names.is_empty() {
                    return names;
                }
            }
        }
        FIXED_MEMBER_FILES
            .iter()
            .copied()
            .filter(|&name| self.archive.read_file(name).is_ok())
            .map(str::to_string)
            .collect()
    }

    /// Decode the SC2 replay header from the user-data content.
    pub fn header(&self) -> Result<Value> {
        let content = self
            .archive
            .user_data_content()
            .ok_or_else(|| Error::invalid_format("archive has no SC2 replay user-data header"))?;
        decode_top_level(content, self.schema, self.schema.replay_header_type)
    }

    /// Decode `replay.details`.
    pub fn details(&self) -> Result<Value> {
        let data = self.archive.read_file("replay.details")?;
        decode_top_level(&data, self.schema, self.schema.details_type)
    }

    /// Decode `replay.initData`.
    pub fn init_data(&self) -> Result<Value> {
        let data = self.archive.read_file("replay.initData")?;
        decode_top_level(&data, self.schema, self.schema.init_data_type)
    }

    /// Parse `(attributes)`.
    pub fn attributes(&self) -> Result<Attributes> {
        let data = self.archive.read_file("(attributes)")?;
        attributes::parse(&data)
    }

    /// Lazily decode `replay.game.events`. Empty when the member file is
    /// absent (some replays omit it).
    pub fn game_events(&self) -> EventStream<'_> {
        EventStream::new(&self.game_bytes, self.schema, StreamKind::Game)
    }

    /// Lazily decode `replay.message.events`.
    pub fn message_events(&self) -> EventStream<'_> {
        EventStream::new(&self.message_bytes, self.schema, StreamKind::Message)
    }

    /// Lazily decode `replay.tracker.events`.
    pub fn tracker_events(&self) -> EventStream<'_> {
        EventStream::new(&self.tracker_bytes, self.schema, StreamKind::Tracker)
    }
}

fn read_optional(archive: &Archive, name: &str) -> Vec<u8> {
    archive.read_file(name).unwrap_or_default()
}

/// Peek the first byte to select Versioned vs BitPacked mode (S5), then
/// decode a single top-level value. Used for the header, details, and
/// init-data one-shot values, which share the event stream's framing
/// convention without its event-record repetition.
fn decode_top_level(data: &[u8], schema: &Schema, type_id: u32) -> Result<Value> {
    let versioned_mode = data.first().is_some_and(|&b| b != 0);
    let cursor = BitCursor::new(data, BitOrder::Msb);
    if versioned_mode {
        VersionedDecoder::new(cursor, &schema.type_table).decode(type_id)
    } else {
        BitPackedDecoder::new(cursor, &schema.type_table).decode(type_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{TypeInfo, TypeTable};

    fn bool_schema(types: &'static [TypeInfo]) -> Schema {
        Schema {
            type_table: TypeTable { types },
            replay_header_type: 0,
            details_type: 0,
            init_data_type: 0,
            svaruint32_type: 0,
            replay_userid_type: 0,
            game_events: &[],
            message_events: &[],
            tracker_events: &[],
        }
    }

    #[test]
    fn decode_top_level_selects_versioned_mode_on_nonzero_first_byte() {
        static TYPES: &[TypeInfo] = &[TypeInfo::Bool];
        let schema = bool_schema(TYPES);
        let data = [6u8, 1]; // skip tag U8, byte=1
        assert_eq!(decode_top_level(&data, &schema, 0).unwrap(), Value::Bool(true));
    }

    #[test]
    fn decode_top_level_selects_bitpacked_mode_on_zero_first_byte() {
        static TYPES: &[TypeInfo] = &[TypeInfo::Bool];
        let schema = bool_schema(TYPES);
        let data = [0b0000_0000u8];
        assert_eq!(decode_top_level(&data, &schema, 0).unwrap(), Value::Bool(false));
    }
}
