//! The version-dependent sub-header at offset 0x30.
//!
//! # Layout
//!
//! | Header version | Offset | Size | Field |
//! |----------------|--------|------|-------|
//! | v0 | 0x30 | 2 | padding |
//! | v0 | 0x32 | 2 | game version (u16) |
//! | v1 | 0x30 | 4 | product tag, reversed ASCII (`PX3W` = `W3XP`) |
//! | v1 | 0x34 | 4 | game version (u32) |

use serde::Serialize;

use crate::binary::{read_bytes, read_u16_le, read_u32_le};
use crate::error::{ParserError, Result};
use crate::format::HeaderVersion;

/// Game version information carried by the sub-header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GameVersion {
    /// v0 sub-header.
    Legacy {
        /// Numeric game version (e.g. 6 for 1.06).
        version: u16,
    },

    /// v1 sub-header.
    Tagged {
        /// Product tag in reading order, `WAR3` or `W3XP`.
        tag: String,
        /// Numeric game version (e.g. 26 for 1.26).
        version: u32,
    },
}

impl GameVersion {
    /// Parses the sub-header starting at `offset` in the layout selected by
    /// `header_version`.
    ///
    /// # Errors
    ///
    /// - `ParserError::UnexpectedEof` if the sub-header is truncated
    /// - `ParserError::InvalidEncoding` if the v1 tag is not valid text
    pub fn parse(data: &[u8], offset: usize, header_version: HeaderVersion) -> Result<Self> {
        match header_version {
            HeaderVersion::V0 => Ok(GameVersion::Legacy {
                version: read_u16_le(data, offset + 2)?,
            }),
            HeaderVersion::V1 => {
                let mut raw = read_bytes(data, offset, 4)?.to_vec();
                raw.reverse();
                let tag = String::from_utf8(raw).map_err(|e| ParserError::InvalidEncoding {
                    offset,
                    source: e.utf8_error(),
                })?;
                Ok(GameVersion::Tagged {
                    tag,
                    version: read_u32_le(data, offset + 4)?,
                })
            }
        }
    }

    /// Returns the numeric game version.
    #[must_use]
    pub fn number(&self) -> u32 {
        match self {
            GameVersion::Legacy { version } => u32::from(*version),
            GameVersion::Tagged { version, .. } => *version,
        }
    }

    /// Returns the product tag for v1 headers.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        match self {
            GameVersion::Legacy { .. } => None,
            GameVersion::Tagged { tag, .. } => Some(tag),
        }
    }

    /// Returns whether the replay was recorded with The Frozen Throne.
    #[must_use]
    pub fn is_expansion(&self) -> bool {
        self.tag() == Some("W3XP")
    }
}
