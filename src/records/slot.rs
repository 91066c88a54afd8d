//! Slot record parsing.
//!
//! The slot-info section lists every lobby slot, including empty and
//! closed ones and computer players. Records are fixed size within one
//! replay, but the size grew across patches:
//!
//! | Offset | Size | Field | Present |
//! |--------|------|-------|---------|
//! | 0 | 1 | Player id | always |
//! | 1 | 1 | Map download percent | always |
//! | 2 | 1 | Status: 0 empty, 1 closed, 2 used | always |
//! | 3 | 1 | 0 human, otherwise computer | always |
//! | 4 | 1 | Team | always |
//! | 5 | 1 | Color | always |
//! | 6 | 1 | Race flags | always |
//! | 7 | 1 | AI strength | 8+ byte records |
//! | 8 | 1 | Handicap percent | 9 byte records |

use std::fmt;

use serde::Serialize;

use crate::error::{ParserError, Result};
use crate::records::player::Race;

/// Record id of the slot-info section.
pub const SLOT_INFO_TAG: u8 = 0x19;

/// Bytes of the section byte count that are not slot records: the record
/// count, random seed, select mode and start position count.
pub const SLOT_SECTION_OVERHEAD: usize = 7;

/// Smallest known slot record.
pub const MIN_SLOT_RECORD_SIZE: usize = 7;

/// Largest known slot record.
pub const MAX_SLOT_RECORD_SIZE: usize = 9;

/// Derives the size of each slot record from the section byte count and
/// the record count.
///
/// # Errors
///
/// Returns `ParserError::InvalidFormat` when the count is zero, the
/// division is not exact, or the size falls outside 7..=9.
///
/// ```
/// use w3g_replay::records::slot_record_size;
///
/// assert_eq!(slot_record_size(23, 2).unwrap(), 8);
/// assert!(slot_record_size(24, 2).is_err());
/// ```
pub fn slot_record_size(section_len: u16, count: u8) -> Result<usize> {
    let section_len = section_len as usize;
    let count = count as usize;

    let payload = section_len
        .checked_sub(SLOT_SECTION_OVERHEAD)
        .filter(|_| count > 0)
        .ok_or_else(|| {
            ParserError::invalid_format(format!(
                "slot section of {section_len} bytes cannot hold {count} records"
            ))
        })?;

    if payload % count != 0 {
        return Err(ParserError::invalid_format(format!(
            "slot section payload of {payload} bytes is not a multiple of {count} records"
        )));
    }

    let size = payload / count;
    if !(MIN_SLOT_RECORD_SIZE..=MAX_SLOT_RECORD_SIZE).contains(&size) {
        return Err(ParserError::invalid_format(format!(
            "slot record size {size} outside {MIN_SLOT_RECORD_SIZE}..={MAX_SLOT_RECORD_SIZE}"
        )));
    }

    Ok(size)
}

/// Occupancy of a lobby slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SlotStatus {
    /// Open, nobody in it.
    Empty,
    /// Closed by the host.
    Closed,
    /// Occupied by a human or computer player.
    Used,
}

impl SlotStatus {
    fn from_code(code: u8) -> Result<Self> {
        match code {
            0x00 => Ok(SlotStatus::Empty),
            0x01 => Ok(SlotStatus::Closed),
            0x02 => Ok(SlotStatus::Used),
            other => Err(ParserError::invalid_format(format!(
                "unknown slot status 0x{other:02X}"
            ))),
        }
    }
}

/// Player colors in slot order; index 12 is the observer color.
pub const COLORS: [&str; 13] = [
    "red",
    "blue",
    "cyan",
    "purple",
    "yellow",
    "orange",
    "green",
    "pink",
    "gray",
    "light blue",
    "dark green",
    "brown",
    "observer",
];

/// A slot color, indexing [`COLORS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotColor(u8);

impl SlotColor {
    fn from_index(index: u8) -> Result<Self> {
        if (index as usize) < COLORS.len() {
            Ok(SlotColor(index))
        } else {
            Err(ParserError::invalid_format(format!(
                "unknown slot color {index}"
            )))
        }
    }

    /// Returns whether this is the observer color.
    #[must_use]
    pub fn is_observer(self) -> bool {
        self.0 as usize == COLORS.len() - 1
    }

    /// Returns the color name.
    #[must_use]
    pub fn name(self) -> &'static str {
        COLORS[self.0 as usize]
    }
}

impl fmt::Display for SlotColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Strength of a computer player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AiStrength {
    /// 0x00
    Easy,
    /// 0x01
    Normal,
    /// 0x02
    Insane,
}

impl AiStrength {
    fn from_code(code: u8) -> Result<Self> {
        match code {
            0x00 => Ok(AiStrength::Easy),
            0x01 => Ok(AiStrength::Normal),
            0x02 => Ok(AiStrength::Insane),
            other => Err(ParserError::invalid_format(format!(
                "unknown AI strength 0x{other:02X}"
            ))),
        }
    }
}

/// One lobby slot's team, color, race and AI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotRecord {
    /// Player id occupying the slot (0 for computers and empty slots).
    pub player_id: u8,

    /// Map download progress in percent.
    pub download_percent: u8,

    /// Slot occupancy.
    pub status: SlotStatus,

    /// Whether a human occupies the slot.
    pub is_human: bool,

    /// Team number.
    pub team: u8,

    /// Slot color.
    pub color: SlotColor,

    /// Race; `None` when the flags do not name a single race.
    pub race: Option<Race>,

    /// Computer strength, present in 8 and 9 byte records.
    pub ai_strength: Option<AiStrength>,

    /// Handicap in percent, present in 9 byte records.
    pub handicap: Option<u8>,

    /// The raw bytes of the record.
    #[serde(skip)]
    pub raw: Vec<u8>,
}

impl SlotRecord {
    /// Parses one slot record. The record size is the length of `raw`.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::InvalidFormat` if `raw` is not 7 to 9 bytes or
    /// a status, color or AI strength code is unknown.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        if !(MIN_SLOT_RECORD_SIZE..=MAX_SLOT_RECORD_SIZE).contains(&raw.len()) {
            return Err(ParserError::invalid_format(format!(
                "slot record of {} bytes, expected {MIN_SLOT_RECORD_SIZE}..={MAX_SLOT_RECORD_SIZE}",
                raw.len()
            )));
        }

        Ok(SlotRecord {
            player_id: raw[0],
            download_percent: raw[1],
            status: SlotStatus::from_code(raw[2])?,
            is_human: raw[3] == 0x00,
            team: raw[4],
            color: SlotColor::from_index(raw[5])?,
            race: Race::from_flag(u32::from(raw[6])),
            ai_strength: raw.get(7).copied().map(AiStrength::from_code).transpose()?,
            handicap: raw.get(8).copied(),
            raw: raw.to_vec(),
        })
    }

    /// Returns the race name, "none" when no single race is set.
    #[must_use]
    pub fn race_name(&self) -> &'static str {
        self.race.map_or("none", |r| r.as_str())
    }
}
