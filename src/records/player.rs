//! Player record parsing for the startup record.
//!
//! # Format
//!
//! | Offset | Size | Type | Field |
//! |--------|------|------|-------|
//! | 0 | 1 | u8 | Record id: 0x00 for the host, 0x16 for other players |
//! | 1 | 1 | u8 | Player id |
//! | 2 | var | string | Player name (null-terminated) |
//! | var | 1 | u8 | Game kind: 0x01 custom, 0x08 ladder |
//! | var | 1 | u8 | Custom: reserved |
//! | var | 4 | u32 LE | Ladder: runtime of the player's client in ms |
//! | var | 4 | u32 LE | Ladder: race flag |
//!
//! Non-host records are followed by four padding bytes that belong to the
//! startup record, not to the player record.

use std::fmt;

use serde::Serialize;

use crate::binary::{read_bytes, read_cstring, read_u32_le, read_u8};
use crate::error::{ParserError, Result};

/// Record id preceding every non-host player record.
pub const PLAYER_INFO_TAG: u8 = 0x16;

/// Game kind byte of custom (non-ladder) games.
pub const GAME_KIND_CUSTOM: u8 = 0x01;

/// Game kind byte of ladder games.
pub const GAME_KIND_LADDER: u8 = 0x08;

/// A race, as encoded by its flag value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Race {
    /// 0x01
    Human,
    /// 0x02
    Orc,
    /// 0x04
    NightElf,
    /// 0x08
    Undead,
    /// 0x10
    Daemon,
    /// 0x20
    Random,
    /// 0x40, race selectable or fixed by the map.
    SelectableOrFixed,
}

impl Race {
    /// Maps a race flag to a race; combined or unknown flags yield `None`.
    #[must_use]
    pub const fn from_flag(flag: u32) -> Option<Self> {
        match flag {
            0x01 => Some(Race::Human),
            0x02 => Some(Race::Orc),
            0x04 => Some(Race::NightElf),
            0x08 => Some(Race::Undead),
            0x10 => Some(Race::Daemon),
            0x20 => Some(Race::Random),
            0x40 => Some(Race::SelectableOrFixed),
            _ => None,
        }
    }

    /// Returns the lowercase display name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Race::Human => "human",
            Race::Orc => "orc",
            Race::NightElf => "nightelf",
            Race::Undead => "undead",
            Race::Daemon => "daemon",
            Race::Random => "random",
            Race::SelectableOrFixed => "selectable/fixed",
        }
    }
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A player taking part in the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    /// Player id, referenced by events and slot records.
    pub id: u8,

    /// Display name.
    pub name: String,

    /// Race for ladder games; `None` for custom games.
    pub race: Option<Race>,

    /// Whether this is the host record.
    pub is_host: bool,

    /// Client runtime in ms when the player joined (ladder games only).
    pub runtime_ms: u32,

    /// The raw bytes of the record.
    #[serde(skip)]
    pub raw: Vec<u8>,

    /// Total bytes consumed by this record.
    pub byte_length: usize,
}

impl Player {
    /// Parses a player record from the start of `data`.
    ///
    /// # Errors
    ///
    /// - `ParserError::InvalidFormat` if the game kind or the ladder race
    ///   flag is unknown
    /// - `ParserError::InvalidEncoding` if the name is not valid UTF-8
    /// - `ParserError::UnexpectedEof` if the record is truncated
    pub fn parse(data: &[u8]) -> Result<Self> {
        let is_host = read_u8(data, 0)? == 0;
        let id = read_u8(data, 1)?;

        let (name, name_len) = read_cstring(data, 2)?;
        let mut offset = 2 + name_len;

        let kind = read_u8(data, offset)?;
        offset += 1;

        let (race, runtime_ms) = match kind {
            GAME_KIND_CUSTOM => {
                read_u8(data, offset)?;
                offset += 1;
                (None, 0)
            }
            GAME_KIND_LADDER => {
                let runtime_ms = read_u32_le(data, offset)?;
                let race_flag = read_u32_le(data, offset + 4)?;
                offset += 8;
                let race = Race::from_flag(race_flag).ok_or_else(|| {
                    ParserError::invalid_format(format!(
                        "unknown race flag 0x{race_flag:02X} for player {id}"
                    ))
                })?;
                (Some(race), runtime_ms)
            }
            other => {
                return Err(ParserError::invalid_format(format!(
                    "player {id} record has game kind 0x{other:02X}, expected custom (0x01) or ladder (0x08)"
                )));
            }
        };

        Ok(Player {
            id,
            name,
            race,
            is_host,
            runtime_ms,
            raw: read_bytes(data, 0, offset)?.to_vec(),
            byte_length: offset,
        })
    }

    /// Returns the race name, "none" for custom games.
    #[must_use]
    pub fn race_name(&self) -> &'static str {
        self.race.map_or("none", |r| r.as_str())
    }
}
