//! Startup record parsing for decompressed W3G replay data.
//!
//! The decompressed stream opens with the startup record, which describes
//! the lobby the game was started from:
//!
//! - **Host player** and the game name
//! - **Game settings**, stored as a masked string (see [`crate::obfuscation`])
//! - **Lobby information**: player count, game type, privacy, language
//! - **Player records** (0x16 marker), one per additional player
//! - **Slot records** (0x19 marker), one per lobby slot
//! - **Random seed**, select mode and start position count
//!
//! Event records follow immediately after; [`StartupRecord::byte_length`]
//! is the offset at which they begin.
//!
//! # Example
//!
//! ```no_run
//! use w3g_replay::header::Header;
//! use w3g_replay::decompress::decompress;
//! use w3g_replay::records::StartupRecord;
//!
//! let data = std::fs::read("replay.w3g").unwrap();
//! let header = Header::parse(&data).unwrap();
//! let stream = decompress(&data, &header).unwrap();
//!
//! let startup = StartupRecord::parse(&stream).unwrap();
//! println!("Map: {}", startup.settings.map_name);
//! for player in &startup.players {
//!     println!("Player {}: {}", player.id, player.name);
//! }
//! ```

pub mod lobby;
pub mod player;
pub mod settings;
pub mod slot;

pub use lobby::{GameType, Privacy, SelectMode};
pub use player::{Player, Race, PLAYER_INFO_TAG};
pub use settings::{FixedTeams, GameSettings, GameSpeed, ObserverMode};
pub use slot::{
    slot_record_size, AiStrength, SlotColor, SlotRecord, SlotStatus, COLORS, SLOT_INFO_TAG,
};

use serde::Serialize;

use crate::binary::{read_bytes, read_cstring, read_u16_le, read_u32_le, read_u8};
use crate::error::{ParserError, Result};
use crate::obfuscation::decode_obfuscated;

/// Leading bytes of the decompressed stream with no known meaning.
pub const STARTUP_RESERVED_SIZE: usize = 4;

/// Padding byte following the game name.
const GAME_NAME_PADDING: usize = 1;

/// Reserved bytes between the privacy flag and the language id.
const LOBBY_RESERVED_SIZE: usize = 2;

/// Padding after each non-host player record.
const PLAYER_RECORD_PADDING: usize = 4;

/// Everything the startup record says about the game and its lobby.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartupRecord {
    /// All players, host first.
    pub players: Vec<Player>,

    /// Name of the game as shown in the lobby.
    pub game_name: String,

    /// Rules, map and creator.
    pub settings: GameSettings,

    /// Declared player count.
    pub player_count: u32,

    /// Kind of game.
    pub game_type: GameType,

    /// Lobby visibility.
    pub privacy: Privacy,

    /// Language id of the recording client.
    pub language_id: u32,

    /// Lobby slots in slot order.
    pub slots: Vec<SlotRecord>,

    /// Random seed of the game.
    pub random_seed: u32,

    /// How teams and races were chosen.
    pub select_mode: SelectMode,

    /// Number of start positions on the map.
    pub start_positions: u8,

    /// Bytes consumed; the event stream starts here.
    pub byte_length: usize,
}

impl StartupRecord {
    /// Parses the startup record from the start of the decompressed stream.
    ///
    /// # Errors
    ///
    /// - `ParserError::InvalidFormat` if a player, slot or lobby code is not
    ///   in its table, the slot-info marker is missing, or the slot section
    ///   sizes are inconsistent
    /// - `ParserError::InvalidEncoding` if a name is not valid UTF-8
    /// - `ParserError::UnexpectedEof` if the record is truncated
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut offset = STARTUP_RESERVED_SIZE;

        let host = Player::parse(data.get(offset..).unwrap_or_default())?;
        offset += host.byte_length;
        let mut players = vec![host];

        let (game_name, name_len) = read_cstring(data, offset)?;
        offset += name_len + GAME_NAME_PADDING;

        let (decoded, encoded_len) =
            decode_obfuscated(data.get(offset..).unwrap_or_default())?;
        offset += encoded_len + 1;
        let settings = GameSettings::parse(&decoded)?;

        let player_count = read_u32_le(data, offset)?;
        let game_type = GameType::from_code(read_u8(data, offset + 4)?)?;
        let privacy = Privacy::from_code(read_u8(data, offset + 5)?);
        offset += 6 + LOBBY_RESERVED_SIZE;
        let language_id = read_u32_le(data, offset)?;
        offset += 4;

        if let Privacy::Unrecognized(code) = privacy {
            tracing::warn!(code, "unrecognized privacy flag");
        }

        while read_u8(data, offset)? == PLAYER_INFO_TAG {
            let player = Player::parse(&data[offset..])?;
            tracing::trace!(id = player.id, name = %player.name, "player record");
            offset += player.byte_length + PLAYER_RECORD_PADDING;
            players.push(player);
        }

        let marker = read_u8(data, offset)?;
        if marker != SLOT_INFO_TAG {
            return Err(ParserError::invalid_format(format!(
                "expected slot info marker 0x{SLOT_INFO_TAG:02X} at offset 0x{offset:X}, found 0x{marker:02X}"
            )));
        }
        let section_len = read_u16_le(data, offset + 1)?;
        let slot_count = read_u8(data, offset + 3)?;
        offset += 4;

        let record_size = slot_record_size(section_len, slot_count)?;
        let slot_bytes = read_bytes(data, offset, record_size * slot_count as usize)?;
        let slots = slot_bytes
            .chunks_exact(record_size)
            .map(SlotRecord::parse)
            .collect::<Result<Vec<_>>>()?;
        offset += slot_bytes.len();

        let random_seed = read_u32_le(data, offset)?;
        let select_mode = SelectMode::from_code(read_u8(data, offset + 4)?)?;
        let start_positions = read_u8(data, offset + 5)?;
        offset += 6;

        tracing::debug!(
            players = players.len(),
            slots = slots.len(),
            slot_record_size = record_size,
            byte_length = offset,
            "parsed startup record"
        );

        Ok(StartupRecord {
            players,
            game_name,
            settings,
            player_count,
            game_type,
            privacy,
            language_id,
            slots,
            random_seed,
            select_mode,
            start_positions,
            byte_length: offset,
        })
    }

    /// Returns the host player.
    #[must_use]
    pub fn host(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_host)
    }
}
