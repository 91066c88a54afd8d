//! Countdown record (0x2F): u32 mode, u32 seconds remaining.

use std::fmt;

use serde::Serialize;

use crate::binary::read_u32_le;
use crate::error::Result;

/// State of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CountdownMode {
    /// Still counting.
    Running,
    /// Finished.
    Over,
}

impl fmt::Display for CountdownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CountdownMode::Running => "running",
            CountdownMode::Over => "over",
        })
    }
}

/// The end-of-game countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Countdown {
    /// Countdown state.
    pub mode: CountdownMode,
    /// Seconds left.
    pub seconds: u32,
}

impl Countdown {
    /// Size of the record, tag included.
    pub const SIZE: usize = 9;

    /// Parses a countdown record at the start of `data`.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if fewer than 9 bytes remain.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mode = match read_u32_le(data, 1)? {
            0 => CountdownMode::Running,
            _ => CountdownMode::Over,
        };
        let seconds = read_u32_le(data, 5)?;
        Ok(Countdown { mode, seconds })
    }

    /// Formats the remaining time as `MM:SS`.
    #[must_use]
    pub fn remaining_string(&self) -> String {
        format!("{:02}:{:02}", self.seconds / 60, self.seconds % 60)
    }
}
