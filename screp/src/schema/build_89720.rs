//! Hand-transcribed representative type-info table and event dispatch
//! tables for SC2 protocol build 89720 (OQ5).
//!
//! This is not exhaustive: it covers the header, details, init-data, and
//! a representative slice of the game/message/tracker event families,
//! in exactly the shape a schema-table generator would emit. A real
//! generator driven from the upstream Python reference is future work
//! (see `DESIGN.md`), not a gap in the decoder's design — event ids
//! outside this table are handled by the byte-align-and-continue
//! recovery in §4.E/§7 regardless of which build produced them.

use super::type_info::{ChoiceArm, Field, TypeInfo, TypeTable};

/// SC2 protocol build this table was transcribed for.
pub const BUILD: u32 = 89720;

// Index reference (positions in `TYPES`, used by the `Field`/`ChoiceArm`
// type_id literals below):
//  0  Null
//  1  Bool
//  2  Int{0,8}    u8
//  3  Int{0,32}   u32
//  4  Int{0,64}   u64-range (timestamps, offsets)
//  5  Blob{8}     short blob/string, length < 256
//  6  Blob{11}    longer blob/string, length < 2048
//  7  FourCc
//  8  Real32
//  9  Optional<u32>
// 10  Version struct
// 11  ReplayHeader struct
// 12  Color struct
// 13  PlayerDetails struct
// 14  Array<PlayerDetails>
// 15  Details struct
// 16  GameDescription struct
// 17  InitData struct
// 18  RawEvent struct (opaque blob payload, used for events this table
//     does not model field-by-field)
// 19  CameraUpdateEvent struct
// 20  PlayerLeaveEvent struct
// 21  ChatMessageEvent struct
// 22  UnitInitEvent struct (tracker)
// 23  PlayerStatsEvent struct (tracker)
// 24  svaruint32 choice (event-stream delta encoding, §4.E)
// 25  replay_userid struct (§4.E)
// 26  Int{0,6}   svaruint32 m_uint6 arm
// 27  Int{0,14}  svaruint32 m_uint14 arm
// 28  Int{0,22}  svaruint32 m_uint22 arm
// 29  Int{0,32}  svaruint32 m_uint32 arm
// 30  Int{0,4}   replay_userid m_userId field

static VERSION_FIELDS: &[Field] = &[
    Field { name: "m_flags", type_id: 3, tag: 0 },
    Field { name: "m_major", type_id: 2, tag: 1 },
    Field { name: "m_minor", type_id: 2, tag: 2 },
    Field { name: "m_revision", type_id: 2, tag: 3 },
    Field { name: "m_build", type_id: 3, tag: 4 },
    Field { name: "m_baseBuild", type_id: 3, tag: 5 },
];

static REPLAY_HEADER_FIELDS: &[Field] = &[
    Field { name: "m_signature", type_id: 6, tag: 0 },
    Field { name: "m_version", type_id: 10, tag: 1 },
    Field { name: "m_type", type_id: 3, tag: 2 },
    Field { name: "m_elapsedGameLoops", type_id: 3, tag: 3 },
    Field { name: "m_useScaledTime", type_id: 1, tag: 4 },
    Field { name: "m_ngdpRootKey", type_id: 6, tag: 5 },
    Field { name: "m_fixedFileHash", type_id: 6, tag: 6 },
];

static COLOR_FIELDS: &[Field] = &[
    Field { name: "m_a", type_id: 2, tag: 0 },
    Field { name: "m_r", type_id: 2, tag: 1 },
    Field { name: "m_g", type_id: 2, tag: 2 },
    Field { name: "m_b", type_id: 2, tag: 3 },
];

static PLAYER_DETAILS_FIELDS: &[Field] = &[
    Field { name: "m_name", type_id: 6, tag: 0 },
    Field { name: "m_toon", type_id: 6, tag: 1 },
    Field { name: "m_race", type_id: 6, tag: 2 },
    Field { name: "m_color", type_id: 12, tag: 3 },
    Field { name: "m_control", type_id: 2, tag: 4 },
    Field { name: "m_teamId", type_id: 2, tag: 5 },
    Field { name: "m_handicap", type_id: 2, tag: 6 },
    Field { name: "m_observe", type_id: 2, tag: 7 },
    Field { name: "m_result", type_id: 2, tag: 8 },
    Field { name: "m_workingSetSlotId", type_id: 9, tag: 9 },
];

static DETAILS_FIELDS: &[Field] = &[
    Field { name: "m_playerList", type_id: 14, tag: 0 },
    Field { name: "m_title", type_id: 6, tag: 1 },
    Field { name: "m_difficulty", type_id: 6, tag: 2 },
    Field { name: "m_thumbnail", type_id: 6, tag: 3 },
    Field { name: "m_isBlizzardMap", type_id: 1, tag: 4 },
    Field { name: "m_timeUTC", type_id: 4, tag: 5 },
    Field { name: "m_timeLocalOffset", type_id: 4, tag: 6 },
    Field { name: "m_description", type_id: 6, tag: 7 },
    Field { name: "m_imageFilePath", type_id: 6, tag: 8 },
    Field { name: "m_mapFileName", type_id: 6, tag: 9 },
    Field { name: "m_campaignIndex", type_id: 2, tag: 10 },
    Field { name: "m_mapSizeX", type_id: 3, tag: 11 },
    Field { name: "m_mapSizeY", type_id: 3, tag: 12 },
];

static GAME_DESCRIPTION_FIELDS: &[Field] = &[
    Field { name: "m_randomSeed", type_id: 3, tag: 0 },
    Field { name: "m_gameCacheName", type_id: 6, tag: 1 },
    Field { name: "m_gameOptions", type_id: 6, tag: 2 },
    Field { name: "m_maxUsers", type_id: 2, tag: 3 },
    Field { name: "m_maxObservers", type_id: 2, tag: 4 },
    Field { name: "m_mapSizeX", type_id: 3, tag: 5 },
    Field { name: "m_mapSizeY", type_id: 3, tag: 6 },
];

static INIT_DATA_FIELDS: &[Field] = &[
    Field { name: "m_gameDescription", type_id: 16, tag: 0 },
    Field { name: "m_maxUsers", type_id: 2, tag: 1 },
];

static RAW_EVENT_FIELDS: &[Field] = &[Field { name: "m_data", type_id: 6, tag: 0 }];

static CAMERA_UPDATE_FIELDS: &[Field] = &[
    Field { name: "m_x", type_id: 8, tag: 0 },
    Field { name: "m_y", type_id: 8, tag: 1 },
];

static PLAYER_LEAVE_FIELDS: &[Field] = &[Field { name: "m_reason", type_id: 3, tag: 0 }];

static CHAT_MESSAGE_FIELDS: &[Field] = &[
    Field { name: "m_recipient", type_id: 2, tag: 0 },
    Field { name: "m_string", type_id: 6, tag: 1 },
];

static UNIT_INIT_FIELDS: &[Field] = &[
    Field { name: "m_unitTagIndex", type_id: 3, tag: 0 },
    Field { name: "m_unitTagRecycle", type_id: 3, tag: 1 },
    Field { name: "m_unitTypeName", type_id: 6, tag: 2 },
    Field { name: "m_controlPlayerId", type_id: 2, tag: 3 },
    Field { name: "m_upkeepPlayerId", type_id: 2, tag: 4 },
    Field { name: "m_x", type_id: 2, tag: 5 },
    Field { name: "m_y", type_id: 2, tag: 6 },
];

static PLAYER_STATS_FIELDS: &[Field] = &[
    Field { name: "m_playerId", type_id: 2, tag: 0 },
    Field { name: "m_stats", type_id: 6, tag: 1 },
];

static SVARUINT32_ARMS: &[ChoiceArm] = &[
    ChoiceArm { name: "m_uint6", tag: 0, type_id: 26 },
    ChoiceArm { name: "m_uint14", tag: 1, type_id: 27 },
    ChoiceArm { name: "m_uint22", tag: 2, type_id: 28 },
    ChoiceArm { name: "m_uint32", tag: 3, type_id: 29 },
];

static REPLAY_USERID_FIELDS: &[Field] = &[Field { name: "m_userId", type_id: 30, tag: 0 }];

static TYPES: &[TypeInfo] = &[
    TypeInfo::Null,
    TypeInfo::Bool,
    TypeInfo::Int { offset: 0, bit_count: 8 },
    TypeInfo::Int { offset: 0, bit_count: 32 },
    TypeInfo::Int { offset: 0, bit_count: 64 },
    TypeInfo::Blob { bit_count: 8 },
    TypeInfo::Blob { bit_count: 11 },
    TypeInfo::FourCc,
    TypeInfo::Real32,
    TypeInfo::Optional { inner_type_id: 3 },
    TypeInfo::Struct { fields: VERSION_FIELDS },
    TypeInfo::Struct { fields: REPLAY_HEADER_FIELDS },
    TypeInfo::Struct { fields: COLOR_FIELDS },
    TypeInfo::Struct { fields: PLAYER_DETAILS_FIELDS },
    TypeInfo::Array { length_bits: 5, element_type_id: 13 },
    TypeInfo::Struct { fields: DETAILS_FIELDS },
    TypeInfo::Struct { fields: GAME_DESCRIPTION_FIELDS },
    TypeInfo::Struct { fields: INIT_DATA_FIELDS },
    TypeInfo::Struct { fields: RAW_EVENT_FIELDS },
    TypeInfo::Struct { fields: CAMERA_UPDATE_FIELDS },
    TypeInfo::Struct { fields: PLAYER_LEAVE_FIELDS },
    TypeInfo::Struct { fields: CHAT_MESSAGE_FIELDS },
    TypeInfo::Struct { fields: UNIT_INIT_FIELDS },
    TypeInfo::Struct { fields: PLAYER_STATS_FIELDS },
    TypeInfo::Choice { tag_bits: 2, arms: SVARUINT32_ARMS },
    TypeInfo::Struct { fields: REPLAY_USERID_FIELDS },
    TypeInfo::Int { offset: 0, bit_count: 6 },
    TypeInfo::Int { offset: 0, bit_count: 14 },
    TypeInfo::Int { offset: 0, bit_count: 22 },
    TypeInfo::Int { offset: 0, bit_count: 32 },
    TypeInfo::Int { offset: 0, bit_count: 4 },
];

/// Type-id of the top-level `ReplayHeader` struct (decoded from the
/// user-data content).
pub const REPLAY_HEADER_TYPE: u32 = 11;
/// Type-id of the top-level `Details` struct (`replay.details`).
pub const DETAILS_TYPE: u32 = 15;
/// Type-id of the top-level `InitData` struct (`replay.initData`).
pub const INIT_DATA_TYPE: u32 = 17;
/// Type-id of the `svaruint32` choice used for event-stream deltas.
pub const SVARUINT32_TYPE: u32 = 24;
/// Type-id of the `replay_userid` struct used by user-carrying streams.
pub const REPLAY_USERID_TYPE: u32 = 25;

/// The build-89720 type-info table.
pub const TYPE_TABLE: TypeTable = TypeTable { types: TYPES };

/// `(event_id, payload_type_id, event_name)` for the game event stream.
pub static GAME_EVENTS: &[(u16, u32, &str)] = &[
    (0x05, 18, "NNet.Game.SBankFileEvent"),
    (0x0B, 0, "NNet.Game.SUserFinishedLoadingSyncEvent"),
    (0x19, 19, "NNet.Game.SCameraUpdateEvent"),
    (0x22, 20, "NNet.Game.SPlayerLeaveEvent"),
];

/// `(event_id, payload_type_id, event_name)` for the message event stream.
pub static MESSAGE_EVENTS: &[(u16, u32, &str)] = &[
    (0x00, 21, "NNet.Game.SChatMessage"),
    (0x03, 18, "NNet.Game.SPingMessage"),
];

/// `(event_id, payload_type_id, event_name)` for the tracker event stream.
pub static TRACKER_EVENTS: &[(u16, u32, &str)] = &[
    (0x00, 18, "NNet.Replay.Tracker.SPlayerSetupEvent"),
    (0x01, 22, "NNet.Replay.Tracker.SUnitInitEvent"),
    (0x02, 23, "NNet.Replay.Tracker.SPlayerStatsEvent"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_table_is_a_closed_graph() {
        assert!(TYPE_TABLE.validate_closed().is_ok());
    }

    #[test]
    fn dispatch_tables_reference_in_range_types() {
        for &(_, type_id, _) in GAME_EVENTS.iter().chain(MESSAGE_EVENTS).chain(TRACKER_EVENTS) {
            assert!(TYPE_TABLE.get(type_id).is_some());
        }
    }
}
