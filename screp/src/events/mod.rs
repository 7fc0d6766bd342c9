//! The event stream driver: a lazy iterator over one `.events` member's
//! `{gameloop delta, optional user id, event id, payload}` records (§4.E).

use crate::bit_reader::{BitCursor, BitOrder};
use crate::decode::{BitPackedDecoder, VersionedDecoder};
use crate::schema::{Schema, Value};
use crate::{Error, Result};

/// Which event family is being decoded — governs whether a `replay_userid`
/// follows the gameloop delta (§4.E: game and message streams carry one,
/// tracker does not).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Game,
    Message,
    Tracker,
}

impl StreamKind {
    fn carries_user_id(self) -> bool {
        matches!(self, StreamKind::Game | StreamKind::Message)
    }

    fn dispatch_table(self, schema: &Schema) -> &'static [(u16, u32, &'static str)] {
        match self {
            StreamKind::Game => schema.game_events,
            StreamKind::Message => schema.message_events,
            StreamKind::Tracker => schema.tracker_events,
        }
    }
}

/// One decoded event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    /// Absolute game loop this event fired at, the running sum of deltas.
    pub gameloop: u32,
    /// Originating user id, present only on game/message streams.
    pub user_id: Option<i64>,
    /// Raw event id as read off the wire.
    pub event_id: u16,
    /// Dispatch-table name, when the id was recognized.
    pub event_name: Option<&'static str>,
    /// Decoded payload, or `None` for an id outside this build's dispatch
    /// table (§7 "unknown event id": aligned over and skipped, not an
    /// error).
    pub payload: Option<Value>,
    /// Bits this event consumed, including its trailing byte-align pad.
    pub bits_consumed: u64,
}

enum Decoder<'a> {
    Versioned(VersionedDecoder<'a>),
    BitPacked(BitPackedDecoder<'a>),
}

impl<'a> Decoder<'a> {
    fn decode(&mut self, type_id: u32) -> Result<Value> {
        match self {
            Decoder::Versioned(d) => d.decode(type_id),
            Decoder::BitPacked(d) => d.decode(type_id),
        }
    }

    fn read_event_id(&mut self) -> Result<u16> {
        match self {
            Decoder::Versioned(d) => d.read_event_id(),
            Decoder::BitPacked(d) => d.read_event_id(),
        }
    }

    fn cursor_mut(&mut self) -> &mut BitCursor<'a> {
        match self {
            Decoder::Versioned(d) => d.cursor_mut(),
            Decoder::BitPacked(d) => d.cursor_mut(),
        }
    }
}

fn choice_magnitude(value: &Value) -> Result<i64> {
    match value {
        Value::Choice { value, .. } => value
            .as_int()
            .ok_or_else(|| Error::invalid_format("svaruint32 arm did not decode to an int")),
        other => Err(Error::invalid_format(format!(
            "expected a svaruint32 choice, got {other:?}"
        ))),
    }
}

/// Lazily decodes one event stream (`replay.game.events`,
/// `replay.message.events`, or `replay.tracker.events`) (§4.E).
///
/// Mode is fixed at construction by peeking (not consuming) the first
/// byte of `data` (S5): non-zero selects Versioned, `0x00` selects
/// BitPacked. A stream that ends exactly on an event boundary terminates
/// cleanly; one that ends mid-event surfaces `Err` from the next `next()`
/// call rather than silently truncating (B3).
pub struct EventStream<'a> {
    decoder: Decoder<'a>,
    schema: &'a Schema,
    kind: StreamKind,
    gameloop: u64,
    done: bool,
    unknown_event_count: u64,
}

impl<'a> EventStream<'a> {
    /// Open `data` for decoding as `kind`.
    pub fn new(data: &'a [u8], schema: &'a Schema, kind: StreamKind) -> Self {
        let done = data.is_empty();
        let versioned_mode = data.first().is_some_and(|&b| b != 0);
        let cursor = BitCursor::new(data, BitOrder::Msb);
        let decoder = if versioned_mode {
            Decoder::Versioned(VersionedDecoder::new(cursor, &schema.type_table))
        } else {
            Decoder::BitPacked(BitPackedDecoder::new(cursor, &schema.type_table))
        };
        EventStream {
            decoder,
            schema,
            kind,
            gameloop: 0,
            done,
            unknown_event_count: 0,
        }
    }

    /// Number of events seen so far whose id fell outside the dispatch
    /// table (diagnostic only, §9).
    pub fn unknown_event_count(&self) -> u64 {
        self.unknown_event_count
    }

    fn decode_next(&mut self) -> Result<Option<EventRecord>> {
        if self.done || self.decoder.cursor_mut().done() {
            return Ok(None);
        }
        let start_bits = self.decoder.cursor_mut().used_bits();

        let delta = choice_magnitude(&self.decoder.decode(self.schema.svaruint32_type)?)?;
        self.gameloop += delta as u64;

        let user_id = if self.kind.carries_user_id() {
            let decoded = self.decoder.decode(self.schema.replay_userid_type)?;
            decoded.field("m_userId").and_then(Value::as_int)
        } else {
            None
        };

        let event_id = self.decoder.read_event_id()?;
        let known = self
            .kind
            .dispatch_table(self.schema)
            .iter()
            .find(|&&(id, _, _)| id == event_id);

        let (event_name, payload) = match known {
            Some(&(_, type_id, name)) => (Some(name), Some(self.decoder.decode(type_id)?)),
            None => {
                self.unknown_event_count += 1;
                log::debug!("unknown event id {event_id} on a {:?} stream, skipping", self.kind);
                (None, None)
            }
        };

        self.decoder.cursor_mut().byte_align();
        let bits_consumed = self.decoder.cursor_mut().used_bits() - start_bits;

        Ok(Some(EventRecord {
            gameloop: self.gameloop as u32,
            user_id,
            event_id,
            event_name,
            payload,
            bits_consumed,
        }))
    }
}

impl<'a> Iterator for EventStream<'a> {
    type Item = Result<EventRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.decode_next() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
