//! Game settings decoded from the masked settings string.
//!
//! After [`decode_obfuscated`](crate::obfuscation::decode_obfuscated), the
//! settings string holds 13 bytes of packed rule flags followed by the map
//! path and the creator name, both null-terminated.
//!
//! | Byte | Bits | Field |
//! |------|------|-------|
//! | 0 | 0-1 | Game speed |
//! | 1 | 0-3 | Hide terrain, map explored, always visible, default |
//! | 1 | 4-5 | Observer mode (`bit4 + 2 * bit5`) |
//! | 1 | 6 | Teams together |
//! | 2 | 1-2 | Fixed teams |
//! | 3 | 0, 1, 2 | Full shared unit control, random hero, random races |
//! | 3 | 6 | Observer referees |

use serde::Serialize;

use crate::binary::{bitfield, bits, read_bytes, read_cstring};
use crate::error::{ParserError, Result};

/// Size of the packed flag block at the start of the settings string.
pub const SETTINGS_FLAGS_SIZE: usize = 13;

/// Game speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameSpeed {
    /// 0
    Slow,
    /// 1
    Normal,
    /// 2
    Fast,
    /// 3, never written by the game.
    Unused,
}

impl GameSpeed {
    const TABLE: [GameSpeed; 4] = [
        GameSpeed::Slow,
        GameSpeed::Normal,
        GameSpeed::Fast,
        GameSpeed::Unused,
    ];
}

/// Observer setting of the lobby.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ObserverMode {
    /// No observers.
    Off,
    /// Unused encoding.
    Unused,
    /// Defeated players become observers.
    OnDefeat,
    /// Full observers allowed.
    On,
}

impl ObserverMode {
    const TABLE: [ObserverMode; 4] = [
        ObserverMode::Off,
        ObserverMode::Unused,
        ObserverMode::OnDefeat,
        ObserverMode::On,
    ];
}

/// Fixed teams setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FixedTeams {
    /// Teams may change.
    Off,
    /// Unused encoding (1 or 2).
    Unused,
    /// Teams are fixed.
    On,
}

impl FixedTeams {
    const TABLE: [FixedTeams; 4] = [
        FixedTeams::Off,
        FixedTeams::Unused,
        FixedTeams::Unused,
        FixedTeams::On,
    ];
}

/// Rules and map of the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSettings {
    /// Game speed.
    pub speed: GameSpeed,
    /// Terrain hidden.
    pub hide_terrain: bool,
    /// Map explored.
    pub map_explored: bool,
    /// Map always visible.
    pub always_visible: bool,
    /// Default visibility.
    pub default_visibility: bool,
    /// Observer mode.
    pub observer: ObserverMode,
    /// Allies placed together.
    pub teams_together: bool,
    /// Fixed teams.
    pub fixed_teams: FixedTeams,
    /// Full shared unit control.
    pub shared_unit_control: bool,
    /// Random hero.
    pub random_hero: bool,
    /// Random races.
    pub random_races: bool,
    /// Observers act as referees.
    pub observer_referees: bool,
    /// Map path as stored by the game.
    pub map_name: String,
    /// Name of the game's creator.
    pub creator_name: String,
}

impl GameSettings {
    /// Parses the decoded settings string.
    ///
    /// The creator name may run to the end of the decoded bytes without a
    /// terminator, since the outer masked string's terminator ends it.
    ///
    /// # Errors
    ///
    /// - `ParserError::UnexpectedEof` if the flag block or map name is cut off
    /// - `ParserError::InvalidEncoding` if a name is not valid UTF-8
    pub fn parse(decoded: &[u8]) -> Result<Self> {
        let flags = read_bytes(decoded, 0, SETTINGS_FLAGS_SIZE)?;

        let vis = bits(flags[1]);
        let ctl = bits(flags[3]);

        let (map_name, map_len) = read_cstring(decoded, SETTINGS_FLAGS_SIZE)?;
        let creator_name = read_trailing_name(decoded, SETTINGS_FLAGS_SIZE + map_len)?;

        Ok(GameSettings {
            speed: GameSpeed::TABLE[bitfield(flags[0], 0..2) as usize],
            hide_terrain: vis[0],
            map_explored: vis[1],
            always_visible: vis[2],
            default_visibility: vis[3],
            observer: ObserverMode::TABLE[usize::from(vis[4]) + 2 * usize::from(vis[5])],
            teams_together: vis[6],
            fixed_teams: FixedTeams::TABLE[bitfield(flags[2], 1..3) as usize],
            shared_unit_control: ctl[0],
            random_hero: ctl[1],
            random_races: ctl[2],
            observer_referees: ctl[6],
            map_name,
            creator_name,
        })
    }
}

fn read_trailing_name(decoded: &[u8], offset: usize) -> Result<String> {
    let tail = decoded.get(offset..).unwrap_or_default();
    let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
    std::str::from_utf8(&tail[..end])
        .map(str::to_owned)
        .map_err(|source| ParserError::InvalidEncoding { offset, source })
}
