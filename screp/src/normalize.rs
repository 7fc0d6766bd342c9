//! Friendlier accessors over the raw decoded [`Value`] trees for
//! `replay.details` and the replay header (§6 "Normalization boundary").
//!
//! This performs no decoding of its own — it is a pure projection over
//! already-decoded values, grounded in the schema's field names, and
//! only covers the fields the representative build's schema names (§9).

use crate::schema::Value;

/// One player entry from `replay.details`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub race: String,
    pub team_id: i64,
    pub result: i64,
}

/// A friendlier view over a decoded `replay.details` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchInfo {
    pub map_name: String,
    pub players: Vec<Player>,
}

/// Project a decoded `replay.details` struct into a [`MatchInfo`].
pub fn match_info(details: &Value) -> Option<MatchInfo> {
    let map_name = details.field("m_title")?.as_text().unwrap_or_default();
    let players = details
        .field("m_playerList")?
        .as_array()?
        .iter()
        .filter_map(player_from)
        .collect();
    Some(MatchInfo { map_name, players })
}

fn player_from(value: &Value) -> Option<Player> {
    Some(Player {
        name: value.field("m_name")?.as_text().unwrap_or_default(),
        race: value.field("m_race")?.as_text().unwrap_or_default(),
        team_id: value.field("m_teamId")?.as_int()?,
        result: value.field("m_result")?.as_int()?,
    })
}

/// Elapsed game loops from a decoded replay header.
pub fn game_length_loops(header: &Value) -> Option<i64> {
    header.field("m_elapsedGameLoops")?.as_int()
}

/// Engine build number from a decoded replay header's nested version struct.
pub fn engine_build(header: &Value) -> Option<i64> {
    header.field("m_version")?.field("m_build")?.as_int()
}
