//! Event stream parsing.
//!
//! The parser walks the records after the startup record with a cursor.
//! Every record starts with a one-byte tag, and the tag alone decides how
//! many bytes the record occupies, so an unknown tag stops the parse: there
//! is no way to find the next record.
//!
//! | Tag | Record | Size |
//! |-----|--------|------|
//! | 0x17 | Left game | 14 |
//! | 0x1A, 0x1B, 0x1C | Unmodeled | 5 |
//! | 0x1E, 0x1F | Time slot | `n + 3` |
//! | 0x20 | Chat | `n + 4` |
//! | 0x22 | Checksum, unmodeled | 6 |
//! | 0x23 | Unmodeled | 11 |
//! | 0x2F | Countdown | 9 |
//!
//! A zero tag ends the stream.

use crate::binary::{read_bytes, read_u16_le, read_u8};
use crate::error::{ParserError, Result};
use crate::events::{Action, ActionKind, Chat, Countdown, Event, EventKind, LeftGame};

/// Tag byte that ends the event stream.
pub const END_OF_STREAM: u8 = 0x00;

/// Record tags of the event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordTag {
    /// 0x17
    LeftGame,
    /// 0x1A, 0x1B, 0x1C
    Unmodeled5,
    /// 0x1E, before patch 1.07.
    TimeSlotLegacy,
    /// 0x1F
    TimeSlot,
    /// 0x20
    Chat,
    /// 0x22
    Checksum,
    /// 0x23
    Unmodeled11,
    /// 0x2F
    Countdown,
}

impl RecordTag {
    /// Maps a tag byte, or `None` if the tag is unknown.
    #[must_use]
    pub const fn from_byte(tag: u8) -> Option<Self> {
        match tag {
            0x17 => Some(RecordTag::LeftGame),
            0x1A..=0x1C => Some(RecordTag::Unmodeled5),
            0x1E => Some(RecordTag::TimeSlotLegacy),
            0x1F => Some(RecordTag::TimeSlot),
            0x20 => Some(RecordTag::Chat),
            0x22 => Some(RecordTag::Checksum),
            0x23 => Some(RecordTag::Unmodeled11),
            0x2F => Some(RecordTag::Countdown),
            _ => None,
        }
    }
}

/// Parse state threaded through one pass over the event stream.
#[derive(Debug, Default)]
pub struct EventParser {
    /// Running game clock in milliseconds.
    clock: u32,

    /// Index in `events` of the last left-game event.
    last_left_game: Option<usize>,

    events: Vec<Event>,
}

impl EventParser {
    /// Creates a parser with the clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses every record from `offset` until the end-of-stream tag and
    /// returns the events in stream order.
    ///
    /// # Errors
    ///
    /// - `ParserError::UnknownBlock` for a tag outside the record table
    /// - `ParserError::UnexpectedEof` if a record runs past the buffer or
    ///   the buffer ends before the end-of-stream tag
    /// - `ParserError::InvalidFormat` for a malformed time slot
    /// - `ParserError::InvalidEncoding` for a chat message that is not UTF-8
    pub fn parse(mut self, data: &[u8], mut offset: usize) -> Result<Vec<Event>> {
        let mut records = 0usize;

        loop {
            let tag = read_u8(data, offset)?;
            if tag == END_OF_STREAM {
                break;
            }

            let record_tag =
                RecordTag::from_byte(tag).ok_or(ParserError::UnknownBlock { tag, offset })?;
            let record = &data[offset..];

            let consumed = match record_tag {
                RecordTag::LeftGame => self.parse_left_game(record)?,
                RecordTag::Unmodeled5 => skip(record, 5)?,
                RecordTag::TimeSlotLegacy | RecordTag::TimeSlot => self.parse_time_slot(record)?,
                RecordTag::Chat => self.parse_chat(record)?,
                RecordTag::Checksum => skip(record, 6)?,
                RecordTag::Unmodeled11 => skip(record, 11)?,
                RecordTag::Countdown => self.parse_countdown(record)?,
            };

            tracing::trace!(tag, offset, consumed, clock = self.clock, "record");

            offset += consumed;
            records += 1;
        }

        tracing::debug!(
            records,
            events = self.events.len(),
            clock = self.clock,
            "parsed event stream"
        );

        Ok(self.events)
    }

    fn push(&mut self, kind: EventKind) -> usize {
        self.events.push(Event {
            time_ms: self.clock,
            kind,
        });
        self.events.len() - 1
    }

    fn parse_left_game(&mut self, record: &[u8]) -> Result<usize> {
        let previous = self.last_left_game.and_then(|i| match &self.events[i].kind {
            EventKind::LeftGame(left) => Some(left),
            _ => None,
        });

        let left = LeftGame::parse(record, previous)?;
        let index = self.push(EventKind::LeftGame(left));

        if let Some(prev) = self.last_left_game {
            if let EventKind::LeftGame(prev) = &mut self.events[prev].kind {
                prev.successor = Some(index);
            }
        }
        self.last_left_game = Some(index);

        Ok(LeftGame::SIZE)
    }

    fn parse_time_slot(&mut self, record: &[u8]) -> Result<usize> {
        let n = read_u16_le(record, 1)? as usize;
        if n < 2 {
            return Err(ParserError::invalid_format(format!(
                "time slot length {n} too short for its clock delta"
            )));
        }
        let delta = read_u16_le(record, 3)?;
        let len = n + 3;
        let commands = read_bytes(record, 5, len - 5)?;

        let mut pos = 0;
        while pos < commands.len() {
            let player_id = read_u8(commands, pos)?;
            let payload_len = read_u16_le(commands, pos + 1).map_err(|_| {
                ParserError::invalid_format(format!(
                    "command block header at {pos} overruns time slot of {} bytes",
                    commands.len()
                ))
            })?;
            let payload = read_bytes(commands, pos + 3, payload_len as usize).map_err(|_| {
                ParserError::invalid_format(format!(
                    "command block of {payload_len} bytes at {pos} overruns time slot of {} bytes",
                    commands.len()
                ))
            })?;

            self.push(EventKind::Action(Action {
                player_id,
                kind: ActionKind::classify(payload),
                payload_len,
            }));
            pos += 3 + payload.len();
        }

        self.clock = self.clock.saturating_add(u32::from(delta));
        Ok(len)
    }

    fn parse_chat(&mut self, record: &[u8]) -> Result<usize> {
        let (chat, len) = Chat::parse(record)?;
        self.push(EventKind::Chat(chat));
        Ok(len)
    }

    fn parse_countdown(&mut self, record: &[u8]) -> Result<usize> {
        let countdown = Countdown::parse(record)?;
        self.push(EventKind::Countdown(countdown));
        Ok(Countdown::SIZE)
    }
}

fn skip(record: &[u8], size: usize) -> Result<usize> {
    read_bytes(record, 0, size)?;
    Ok(size)
}

/// Parses the event stream of a decompressed replay starting at `offset`.
///
/// # Errors
///
/// See [`EventParser::parse`].
pub fn parse_events(data: &[u8], offset: usize) -> Result<Vec<Event>> {
    EventParser::new().parse(data, offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{ChatMode, Closer, LeaveOutcome};

    fn time_slot(delta: u16, blocks: &[(u8, &[u8])]) -> Vec<u8> {
        let mut commands = Vec::new();
        for (player_id, payload) in blocks {
            commands.push(*player_id);
            commands.extend_from_slice(&(payload.len() as u16).to_le_bytes());
            commands.extend_from_slice(payload);
        }
        let mut data = vec![0x1F];
        data.extend_from_slice(&((commands.len() + 2) as u16).to_le_bytes());
        data.extend_from_slice(&delta.to_le_bytes());
        data.extend(commands);
        data
    }

    fn left_game(reason: u32, player_id: u8, result_code: u32, sequence: u32) -> Vec<u8> {
        let mut data = vec![0x17];
        data.extend_from_slice(&reason.to_le_bytes());
        data.push(player_id);
        data.extend_from_slice(&result_code.to_le_bytes());
        data.extend_from_slice(&sequence.to_le_bytes());
        data
    }

    fn chat(player_id: u8, code: u32, message: &str) -> Vec<u8> {
        let mut body = vec![0x20];
        body.extend_from_slice(&code.to_le_bytes());
        body.extend_from_slice(message.as_bytes());
        body.push(0);
        let mut data = vec![0x20, player_id];
        data.extend_from_slice(&(body.len() as u16).to_le_bytes());
        data.extend(body);
        data
    }

    #[test]
    fn test_empty_stream() {
        assert!(parse_events(&[0x00], 0).unwrap().is_empty());
        assert!(matches!(
            parse_events(&[], 0),
            Err(ParserError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_missing_end_tag() {
        let mut data = time_slot(250, &[]);
        data.extend(chat(1, 0, "first"));

        match parse_events(&data, 0) {
            Err(ParserError::UnexpectedEof {
                expected,
                available,
            }) => {
                assert_eq!(expected, data.len() + 1);
                assert_eq!(available, data.len());
            }
            other => panic!("expected UnexpectedEof, got {other:?}"),
        }
    }

    #[test]
    fn test_unmodeled_records_are_skipped() {
        let mut data = vec![0x1A, 1, 2, 3, 4];
        data.extend_from_slice(&[0x22, 0x04, 0, 0, 0, 0]);
        data.extend_from_slice(&[0x23; 11]);
        data.extend(chat(1, 0, "hi"));
        data.push(0x00);

        let events = parse_events(&data, 0).unwrap();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0].kind, EventKind::Chat(_)));
    }

    #[test]
    fn test_unknown_tag() {
        let mut data = time_slot(100, &[]);
        let offset = data.len();
        data.push(0xFF);

        match parse_events(&data, 0) {
            Err(ParserError::UnknownBlock { tag, offset: at }) => {
                assert_eq!(tag, 0xFF);
                assert_eq!(at, offset);
            }
            other => panic!("expected UnknownBlock, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_starts_at_offset() {
        let mut data = vec![0xEE, 0xEE];
        data.extend(chat(3, 2, "obs"));
        data.push(0x00);

        let events = parse_events(&data, 2).unwrap();
        match &events[0].kind {
            EventKind::Chat(chat) => {
                assert_eq!(chat.player_id, 3);
                assert_eq!(chat.mode, ChatMode::Observers);
            }
            other => panic!("expected chat, got {other:?}"),
        }
    }

    #[test]
    fn test_time_slots_advance_clock() {
        let mut data = time_slot(100, &[(1, &[0x01]), (2, &[0x16, 0x01])]);
        data.extend(time_slot(250, &[(1, &[])]));
        data.extend(chat(1, 0, "gg"));
        data.push(0x00);

        let events = parse_events(&data, 0).unwrap();
        assert_eq!(events.len(), 4);

        assert_eq!(events[0].time_ms, 0);
        assert_eq!(
            events[0].kind,
            EventKind::Action(Action {
                player_id: 1,
                kind: ActionKind::Pause,
                payload_len: 1,
            })
        );
        assert_eq!(
            events[1].kind,
            EventKind::Action(Action {
                player_id: 2,
                kind: ActionKind::Other { action_id: 0x16 },
                payload_len: 2,
            })
        );
        assert_eq!(events[2].time_ms, 100);
        assert_eq!(events[3].time_ms, 350);
    }

    #[test]
    fn test_clock_saturates() {
        let mut data = Vec::new();
        for _ in 0..70_000 {
            data.extend(time_slot(u16::MAX, &[]));
        }
        data.extend(chat(1, 0, "late"));
        data.push(0x00);

        let events = parse_events(&data, 0).unwrap();
        assert_eq!(events[0].time_ms, u32::MAX);
    }

    #[test]
    fn test_time_slot_too_short() {
        let data = [0x1F, 0x01, 0x00, 0x00];
        assert!(matches!(
            parse_events(&data, 0),
            Err(ParserError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_time_slot_block_overrun() {
        let mut data = time_slot(100, &[(1, &[0x01, 0x02])]);
        // Claim a 3 byte payload inside a slot holding only two.
        data[6] = 0x03;
        data.push(0x00);

        assert!(matches!(
            parse_events(&data, 0),
            Err(ParserError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_truncated_record() {
        let mut data = left_game(0x0C, 1, 0x09, 0);
        data.truncate(10);

        assert!(matches!(
            parse_events(&data, 0),
            Err(ParserError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_left_game_chain() {
        let mut data = left_game(0x01, 2, 0x08, 4);
        data.extend(time_slot(500, &[]));
        data.extend(left_game(0x0C, 1, 0x07, 5));
        data.extend(left_game(0x0C, 3, 0x07, 6));
        data.push(0x00);

        let events = parse_events(&data, 0).unwrap();
        let lefts: Vec<&LeftGame> = events
            .iter()
            .filter_map(|e| match &e.kind {
                EventKind::LeftGame(left) => Some(left),
                _ => None,
            })
            .collect();

        assert_eq!(lefts.len(), 3);
        assert_eq!(lefts[0].successor, Some(1));
        assert_eq!(lefts[1].successor, Some(2));
        assert_eq!(lefts[2].successor, None);

        assert_eq!(lefts[0].closer, Closer::Remote);
        assert_eq!(lefts[0].outcome(), LeaveOutcome::Lost);
        assert!(lefts[1].is_consecutive);
        assert_eq!(lefts[1].outcome(), LeaveOutcome::Lost);
        assert!(lefts[2].is_consecutive);
        assert_eq!(lefts[2].outcome(), LeaveOutcome::Won);

        assert_eq!(events[1].time_ms, 500);
    }

    #[test]
    fn test_record_tag_table() {
        assert_eq!(RecordTag::from_byte(0x1B), Some(RecordTag::Unmodeled5));
        assert_eq!(RecordTag::from_byte(0x1E), Some(RecordTag::TimeSlotLegacy));
        assert_eq!(RecordTag::from_byte(0x1D), None);
        assert_eq!(RecordTag::from_byte(0x21), None);
    }
}
