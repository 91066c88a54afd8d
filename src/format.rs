//! Container layout constants and format variants for W3G replay files.
//!
//! A replay starts with a 28-byte magic/reserved prefix that is not
//! validated, followed by the fixed header fields, a sub-header whose shape
//! depends on the header version, and then the compressed blocks.
//!
//! # Header versions
//!
//! - **v0** (RoC betas and early patches): 4-byte sub-header holding a
//!   16-bit game version, 64-byte header overall
//! - **v1**: 8-byte sub-header holding a reversed ASCII product tag
//!   (`PX3W` for `W3XP`) and a 32-bit game version, 68-byte header overall
//!
//! # Example
//!
//! ```
//! use w3g_replay::format::{GameMode, HeaderVersion};
//!
//! let version = HeaderVersion::from_raw(1).unwrap();
//! assert_eq!(version.header_size(), 68);
//! assert!(HeaderVersion::from_raw(2).is_err());
//!
//! assert_eq!(GameMode::from_flags(0x8000), GameMode::Multiplayer);
//! ```

use serde::Serialize;

use crate::error::{ParserError, Result};

/// Length of the unvalidated magic/reserved prefix at the start of a file.
pub const MAGIC_PREFIX_SIZE: usize = 28;

/// Offset of the version-dependent sub-header.
pub const SUB_HEADER_OFFSET: usize = 0x30;

/// Size of the build number, flags, duration and checksum fields that
/// follow the sub-header.
pub const HEADER_TRAILER_SIZE: usize = 12;

/// Size of the per-block header preceding every compressed block.
pub const BLOCK_HEADER_SIZE: usize = 8;

/// Flags value of a single-player replay.
pub const FLAGS_SINGLE_PLAYER: u16 = 0x0000;

/// Flags value of a multiplayer replay.
pub const FLAGS_MULTIPLAYER: u16 = 0x8000;

/// The header version stored at offset 0x24.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HeaderVersion {
    /// Version 0: 16-bit game version sub-header.
    V0,

    /// Version 1: product tag + 32-bit game version sub-header.
    V1,
}

impl HeaderVersion {
    /// Maps the raw header version field to a known version.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::InvalidHeader` for anything other than 0 or 1.
    pub fn from_raw(raw: u32) -> Result<Self> {
        match raw {
            0 => Ok(HeaderVersion::V0),
            1 => Ok(HeaderVersion::V1),
            other => Err(ParserError::InvalidHeader {
                reason: format!("Header must be either v0 or v1, got v{other}"),
            }),
        }
    }

    /// Returns the size of the version-dependent sub-header.
    #[must_use]
    pub const fn sub_header_size(&self) -> usize {
        match self {
            HeaderVersion::V0 => 4,
            HeaderVersion::V1 => 8,
        }
    }

    /// Returns the full header size implied by this version.
    #[must_use]
    pub const fn header_size(&self) -> usize {
        SUB_HEADER_OFFSET + self.sub_header_size() + HEADER_TRAILER_SIZE
    }
}

/// Single/multiplayer mode decoded from the 2-byte header flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameMode {
    /// Flags 0x0000.
    SinglePlayer,

    /// Flags 0x8000.
    Multiplayer,

    /// Any other flags value, kept raw.
    Unrecognized(u16),
}

impl GameMode {
    /// Decodes the header flags field.
    #[must_use]
    pub const fn from_flags(flags: u16) -> Self {
        match flags {
            FLAGS_SINGLE_PLAYER => GameMode::SinglePlayer,
            FLAGS_MULTIPLAYER => GameMode::Multiplayer,
            other => GameMode::Unrecognized(other),
        }
    }
}
