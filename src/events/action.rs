//! Command blocks inside time slot records.
//!
//! Each block is a player id, a u16 payload length and the payload. Only
//! the leading action id of the payload is looked at.

use serde::Serialize;

/// Action id of a pause command.
pub const PAUSE_ACTION_ID: u8 = 0x01;

/// What a command block contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActionKind {
    /// The game was paused.
    Pause,
    /// Any other command, by its leading action id.
    Other {
        /// First payload byte.
        action_id: u8,
    },
    /// A block without payload.
    Empty,
}

impl ActionKind {
    /// Classifies a payload by its first byte.
    #[must_use]
    pub fn classify(payload: &[u8]) -> Self {
        match payload.first() {
            Some(&PAUSE_ACTION_ID) => ActionKind::Pause,
            Some(&action_id) => ActionKind::Other { action_id },
            None => ActionKind::Empty,
        }
    }
}

/// A command block issued by one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Action {
    /// Issuing player.
    pub player_id: u8,
    /// Leading command.
    pub kind: ActionKind,
    /// Payload length in bytes.
    pub payload_len: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_payloads() {
        assert_eq!(ActionKind::classify(&[0x01]), ActionKind::Pause);
        assert_eq!(
            ActionKind::classify(&[0x16, 0x01, 0x00]),
            ActionKind::Other { action_id: 0x16 }
        );
        assert_eq!(ActionKind::classify(&[]), ActionKind::Empty);
    }
}
