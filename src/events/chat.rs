//! Chat record parsing.
//!
//! # Format
//!
//! | Offset | Size | Type | Field |
//! |--------|------|------|-------|
//! | 0 | 1 | u8 | Record tag (0x20) |
//! | 1 | 1 | u8 | Sender player id |
//! | 2 | 2 | u16 LE | Bytes following this field (`n`) |
//! | 4 | 1 | u8 | Flags: 0x10 for lobby (startup) chat |
//! | 5 | 4 | u32 LE | Audience code, absent for lobby chat |
//! | 9 / 5 | var | string | Message (null-terminated) |
//!
//! The record occupies `n + 4` bytes.

use serde::Serialize;

use crate::binary::{read_bytes, read_cstring, read_u16_le, read_u32_le, read_u8};
use crate::error::Result;

/// Flags value of chat sent in the lobby before the game started.
pub const STARTUP_CHAT_FLAG: u8 = 0x10;

/// Audience of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChatMode {
    /// Everyone.
    All,
    /// Allies only.
    Allies,
    /// Observers and referees.
    Observers,
    /// Lobby chat before the game started.
    Startup,
    /// A private message to the given player id.
    Direct(u32),
}

impl ChatMode {
    /// Maps an audience code. Codes from 3 upward address one player,
    /// `code - 3` being the recipient; the result is not validated.
    #[must_use]
    pub const fn from_code(code: u32) -> Self {
        match code {
            0x00 => ChatMode::All,
            0x01 => ChatMode::Allies,
            0x02 => ChatMode::Observers,
            other => ChatMode::Direct(other - 3),
        }
    }
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chat {
    /// Sender.
    pub player_id: u8,
    /// Audience.
    pub mode: ChatMode,
    /// Message text.
    pub message: String,
}

impl Chat {
    /// Parses a chat record at the start of `data`.
    ///
    /// Returns the chat and the number of bytes the record occupies.
    ///
    /// # Errors
    ///
    /// - `ParserError::UnexpectedEof` if the record is cut off
    /// - `ParserError::InvalidEncoding` if the message is not valid UTF-8
    pub fn parse(data: &[u8]) -> Result<(Self, usize)> {
        let player_id = read_u8(data, 1)?;
        let len = read_u16_le(data, 2)? as usize + 4;
        let record = read_bytes(data, 0, len)?;

        let flags = read_u8(record, 4)?;
        let (mode, message_offset) = if flags == STARTUP_CHAT_FLAG {
            (ChatMode::Startup, 5)
        } else {
            (ChatMode::from_code(read_u32_le(record, 5)?), 9)
        };

        let (message, _) = read_cstring(record, message_offset)?;

        Ok((
            Chat {
                player_id,
                mode,
                message,
            },
            len,
        ))
    }
}
