//! Lobby codes of the startup record: game type, privacy and select mode.

use std::fmt;

use serde::Serialize;

use crate::error::{ParserError, Result};

/// Kind of game the replay was recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameType {
    /// 0x00
    Unknown,
    /// 0x01, ladder 1 on 1 or free for all.
    OneOnOne,
    /// 0x09, custom game.
    Custom,
    /// 0x1D, single player game.
    SinglePlayer,
    /// 0x20, ladder team game.
    LadderTeam,
}

impl GameType {
    /// Maps a game type byte.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::InvalidFormat` for codes outside the table.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0x00 => Ok(GameType::Unknown),
            0x01 => Ok(GameType::OneOnOne),
            0x09 => Ok(GameType::Custom),
            0x1D => Ok(GameType::SinglePlayer),
            0x20 => Ok(GameType::LadderTeam),
            other => Err(ParserError::invalid_format(format!(
                "unknown game type 0x{other:02X}"
            ))),
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameType::Unknown => "unknown",
            GameType::OneOnOne => "1on1",
            GameType::Custom => "custom",
            GameType::SinglePlayer => "single player",
            GameType::LadderTeam => "ladder team",
        })
    }
}

/// Lobby visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Privacy {
    /// 0x00
    Public,
    /// 0x08
    Private,
    /// Any other value, kept raw.
    Unrecognized(u8),
}

impl Privacy {
    /// Maps a privacy byte. Unknown values are kept, never rejected.
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code {
            0x00 => Privacy::Public,
            0x08 => Privacy::Private,
            other => Privacy::Unrecognized(other),
        }
    }
}

/// How teams and races were chosen in the lobby.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SelectMode {
    /// 0x00
    TeamAndRaceSelectable,
    /// 0x01
    TeamNotSelectable,
    /// 0x03
    TeamAndRaceNotSelectable,
    /// 0x04
    RaceFixedToRandom,
    /// 0xCC, automated match making.
    AutomatedMatchMaking,
}

impl SelectMode {
    /// Maps a select mode byte.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::InvalidFormat` for codes outside the table.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0x00 => Ok(SelectMode::TeamAndRaceSelectable),
            0x01 => Ok(SelectMode::TeamNotSelectable),
            0x03 => Ok(SelectMode::TeamAndRaceNotSelectable),
            0x04 => Ok(SelectMode::RaceFixedToRandom),
            0xCC => Ok(SelectMode::AutomatedMatchMaking),
            other => Err(ParserError::invalid_format(format!(
                "unknown select mode 0x{other:02X}"
            ))),
        }
    }
}

impl fmt::Display for SelectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SelectMode::TeamAndRaceSelectable => "team & race selectable",
            SelectMode::TeamNotSelectable => "team not selectable",
            SelectMode::TeamAndRaceNotSelectable => "team & race not selectable",
            SelectMode::RaceFixedToRandom => "race fixed to random",
            SelectMode::AutomatedMatchMaking => "automated match making",
        })
    }
}
