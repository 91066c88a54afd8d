//! Header parsing for W3G replay containers.
//!
//! # Header Layout
//!
//! | Offset | Size | Field | Description |
//! |--------|------|-------|-------------|
//! | 0x00 | 28 | prefix | Magic/reserved, not validated |
//! | 0x1C | 4 | `header_size` | Offset of the first block |
//! | 0x20 | 4 | `compressed_size` | Total compressed file size |
//! | 0x24 | 4 | `version` | Header version, 0 or 1 |
//! | 0x28 | 4 | `decompressed_size` | Total decompressed size |
//! | 0x2C | 4 | `block_count` | Number of compressed blocks |
//! | 0x30 | 4/8 | `game_version` | See [`GameVersion`] |
//! | +0 | 2 | `build_number` | Game build |
//! | +2 | 2 | `flags` | 0x0000 single player, 0x8000 multiplayer |
//! | +4 | 4 | `duration_ms` | Replay length in milliseconds |
//! | +8 | 4 | `checksum` | Header checksum |
//!
//! # Example
//!
//! ```no_run
//! use w3g_replay::header::Header;
//!
//! let data = std::fs::read("replay.w3g").unwrap();
//! let header = Header::parse(&data).unwrap();
//!
//! println!("Blocks start at offset {}", header.data_offset());
//! println!("Game duration: {}", header.duration_string());
//! ```

pub mod game_version;

pub use game_version::GameVersion;

use serde::Serialize;

use crate::binary::{read_u16_le, read_u32_le};
use crate::error::{ParserError, Result};
use crate::format::{GameMode, HeaderVersion, MAGIC_PREFIX_SIZE, SUB_HEADER_OFFSET};

/// Parsed replay container header. Immutable once read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    /// Declared header size; the first block starts here.
    pub header_size: u32,

    /// Declared total compressed size.
    pub compressed_size: u32,

    /// Header version.
    pub version: HeaderVersion,

    /// Declared total size of all decompressed blocks.
    pub decompressed_size: u32,

    /// Number of compressed blocks following the header.
    pub block_count: u32,

    /// Game version sub-header.
    pub game_version: GameVersion,

    /// Game build number.
    pub build_number: u16,

    /// Raw single/multiplayer flags.
    pub flags: u16,

    /// Replay length in milliseconds.
    pub duration_ms: u32,

    /// Header checksum (not verified).
    pub checksum: u32,
}

impl Header {
    /// Parses the container header from the start of a replay.
    ///
    /// # Errors
    ///
    /// - `ParserError::InvalidHeader` if the header version is neither 0 nor 1
    /// - `ParserError::UnexpectedEof` if the data is shorter than the header
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < SUB_HEADER_OFFSET {
            return Err(ParserError::unexpected_eof(SUB_HEADER_OFFSET, data.len()));
        }

        let header_size = read_u32_le(data, MAGIC_PREFIX_SIZE)?;
        let compressed_size = read_u32_le(data, 0x20)?;
        let version = HeaderVersion::from_raw(read_u32_le(data, 0x24)?)?;
        let decompressed_size = read_u32_le(data, 0x28)?;
        let block_count = read_u32_le(data, 0x2C)?;

        let game_version = GameVersion::parse(data, SUB_HEADER_OFFSET, version)?;

        let offset = SUB_HEADER_OFFSET + version.sub_header_size();
        let build_number = read_u16_le(data, offset)?;
        let flags = read_u16_le(data, offset + 2)?;
        let duration_ms = read_u32_le(data, offset + 4)?;
        let checksum = read_u32_le(data, offset + 8)?;

        let header = Header {
            header_size,
            compressed_size,
            version,
            decompressed_size,
            block_count,
            game_version,
            build_number,
            flags,
            duration_ms,
            checksum,
        };

        if let GameMode::Unrecognized(raw) = header.game_mode() {
            tracing::warn!(flags = raw, "unrecognized game mode flags in replay header");
        }
        tracing::debug!(
            version = ?header.version,
            build = header.build_number,
            blocks = header.block_count,
            "parsed replay header"
        );

        Ok(header)
    }

    /// Returns the byte offset where the first compressed block begins.
    #[must_use]
    pub fn data_offset(&self) -> usize {
        self.header_size as usize
    }

    /// Returns the single/multiplayer mode encoded in the flags.
    #[must_use]
    pub fn game_mode(&self) -> GameMode {
        GameMode::from_flags(self.flags)
    }

    /// Returns whether the flags mark a single-player replay.
    #[must_use]
    pub fn is_single_player(&self) -> bool {
        self.game_mode() == GameMode::SinglePlayer
    }

    /// Returns whether the flags mark a multiplayer replay.
    #[must_use]
    pub fn is_multiplayer(&self) -> bool {
        self.game_mode() == GameMode::Multiplayer
    }

    /// Splits the replay duration into (hours, minutes, seconds, milliseconds).
    #[must_use]
    pub fn duration_parts(&self) -> (u32, u32, u32, u32) {
        let total_ms = self.duration_ms;
        let ms = total_ms % 1000;
        let total_seconds = total_ms / 1000;
        let seconds = total_seconds % 60;
        let total_minutes = total_seconds / 60;
        let minutes = total_minutes % 60;
        let hours = total_minutes / 60;

        (hours, minutes, seconds, ms)
    }

    /// Returns the replay duration formatted as "HH:MM:SS".
    #[must_use]
    pub fn duration_string(&self) -> String {
        let (hours, minutes, seconds, _) = self.duration_parts();
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    }
}
