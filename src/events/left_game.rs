//! Left-game records and outcome resolution.
//!
//! # Format
//!
//! | Offset | Size | Type | Field |
//! |--------|------|------|-------|
//! | 0 | 1 | u8 | Record tag (0x17) |
//! | 1 | 4 | u32 LE | Reason: 0x01 remote, 0x0C local |
//! | 5 | 1 | u8 | Player id |
//! | 6 | 4 | u32 LE | Result code |
//! | 10 | 4 | u32 LE | Sequence number |
//!
//! The meaning of the result code depends on who closed the connection and
//! on whether another left-game record follows, so outcomes are resolved
//! over the chain of left-game events rather than per record.

use std::fmt;

use serde::Serialize;

use crate::binary::{read_u32_le, read_u8};
use crate::error::Result;

/// Reason code of a connection closed by the remote side.
pub const REASON_REMOTE: u32 = 0x01;

/// Reason code of a connection closed by the recording client.
pub const REASON_LOCAL: u32 = 0x0C;

/// Which side closed the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Closer {
    /// The leaving player's side.
    Remote,
    /// The recording client.
    Local,
    /// Any other reason code.
    Unknown,
}

impl Closer {
    /// Maps a reason code.
    #[must_use]
    pub const fn from_reason(reason: u32) -> Self {
        match reason {
            REASON_REMOTE => Closer::Remote,
            REASON_LOCAL => Closer::Local,
            _ => Closer::Unknown,
        }
    }
}

impl fmt::Display for Closer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Closer::Remote => "remote",
            Closer::Local => "local",
            Closer::Unknown => "unknown",
        })
    }
}

/// How a player's game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LeaveOutcome {
    /// Left without a result.
    Left,
    /// Lost connection.
    Disconnected,
    /// Lost.
    Lost,
    /// Won.
    Won,
    /// Draw.
    Draw,
    /// The result code has no meaning for this closer.
    Unrecognized(u32),
}

impl fmt::Display for LeaveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaveOutcome::Left => f.write_str("left"),
            LeaveOutcome::Disconnected => f.write_str("disconnected"),
            LeaveOutcome::Lost => f.write_str("lost"),
            LeaveOutcome::Won => f.write_str("won"),
            LeaveOutcome::Draw => f.write_str("draw"),
            LeaveOutcome::Unrecognized(code) => write!(f, "unrecognized result 0x{code:02X}"),
        }
    }
}

/// A player leaving the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeftGame {
    /// Leaving player.
    pub player_id: u8,
    /// Raw reason code.
    pub reason: u32,
    /// Side that closed the connection.
    pub closer: Closer,
    /// Raw result code.
    pub result_code: u32,
    /// Sequence number.
    pub sequence: u32,
    /// Whether the previous left-game record's sequence is one less.
    pub is_consecutive: bool,
    /// Index in the event list of the next left-game event.
    pub successor: Option<usize>,
}

impl LeftGame {
    /// Size of the record, tag included.
    pub const SIZE: usize = 14;

    /// Parses a left-game record at the start of `data`.
    ///
    /// `previous` is the last left-game record seen before this one; it
    /// decides [`LeftGame::is_consecutive`]. The successor link is left
    /// empty for the caller to fill in.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if fewer than 14 bytes remain.
    pub fn parse(data: &[u8], previous: Option<&LeftGame>) -> Result<Self> {
        let reason = read_u32_le(data, 1)?;
        let player_id = read_u8(data, 5)?;
        let result_code = read_u32_le(data, 6)?;
        let sequence = read_u32_le(data, 10)?;

        let is_consecutive =
            previous.is_some_and(|prev| sequence == prev.sequence.wrapping_add(1));

        Ok(LeftGame {
            player_id,
            reason,
            closer: Closer::from_reason(reason),
            result_code,
            sequence,
            is_consecutive,
            successor: None,
        })
    }

    /// Resolves how the player's game ended.
    #[must_use]
    pub fn outcome(&self) -> LeaveOutcome {
        let code = self.result_code;
        let resolved = match self.closer {
            Closer::Remote => remote_outcome(code),
            Closer::Local if self.successor.is_none() => match code {
                0x07 | 0x0B if self.is_consecutive => Some(LeaveOutcome::Won),
                0x07 | 0x0B => Some(LeaveOutcome::Lost),
                _ => local_last_outcome(code),
            },
            Closer::Local => local_not_last_outcome(code),
            Closer::Unknown => Some(LeaveOutcome::Left),
        };
        resolved.unwrap_or(LeaveOutcome::Unrecognized(code))
    }
}

fn remote_outcome(code: u32) -> Option<LeaveOutcome> {
    match code {
        0x01 | 0x07 | 0x0B => Some(LeaveOutcome::Left),
        0x08 => Some(LeaveOutcome::Lost),
        0x09 => Some(LeaveOutcome::Won),
        0x0A => Some(LeaveOutcome::Draw),
        _ => None,
    }
}

fn local_last_outcome(code: u32) -> Option<LeaveOutcome> {
    match code {
        0x01 => Some(LeaveOutcome::Disconnected),
        0x08 => Some(LeaveOutcome::Lost),
        0x09 => Some(LeaveOutcome::Won),
        _ => None,
    }
}

fn local_not_last_outcome(code: u32) -> Option<LeaveOutcome> {
    match code {
        0x01 => Some(LeaveOutcome::Disconnected),
        0x07 | 0x08 | 0x0B => Some(LeaveOutcome::Lost),
        0x09 => Some(LeaveOutcome::Won),
        0x0A => Some(LeaveOutcome::Draw),
        _ => None,
    }
}
