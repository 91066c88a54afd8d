//! Event model and event stream parsing.
//!
//! Everything after the startup record is a sequence of tagged records. The
//! records that carry meaning become [`Event`]s, each stamped with the
//! running game clock at the moment it was read:
//!
//! - **Chat** (0x20): a chat line and its audience
//! - **Left game** (0x17): a player leaving, with a resolvable outcome
//! - **Countdown** (0x2F): the end-of-game countdown
//! - **Action** (inside 0x1E/0x1F time slots): one player command batch
//!
//! Time slot records advance the clock; the remaining recognized records
//! are skipped.
//!
//! # Example
//!
//! ```no_run
//! use w3g_replay::events::{parse_events, EventKind};
//!
//! # fn run(stream: &[u8], startup_len: usize) -> w3g_replay::Result<()> {
//! for event in parse_events(stream, startup_len)? {
//!     if let EventKind::Chat(chat) = &event.kind {
//!         println!("[{}] {}", event.clock_string(), chat.message);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod chat;
pub mod countdown;
pub mod left_game;
pub mod parser;

pub use action::{Action, ActionKind, PAUSE_ACTION_ID};
pub use chat::{Chat, ChatMode};
pub use countdown::{Countdown, CountdownMode};
pub use left_game::{Closer, LeaveOutcome, LeftGame};
pub use parser::{parse_events, EventParser, RecordTag};

use serde::Serialize;

/// A decoded event and the game time it happened at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    /// Milliseconds since game start.
    pub time_ms: u32,

    /// What happened.
    pub kind: EventKind,
}

/// The event variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// A chat message.
    Chat(Chat),
    /// A player left the game.
    LeftGame(LeftGame),
    /// The end-of-game countdown.
    Countdown(Countdown),
    /// A player command batch.
    Action(Action),
}

impl Event {
    /// Formats the timestamp as `[HH:][MM:]SS.sss`.
    ///
    /// Hours and minutes are only printed when non-zero.
    ///
    /// ```
    /// use w3g_replay::events::{Countdown, CountdownMode, Event, EventKind};
    ///
    /// let event = Event {
    ///     time_ms: 65_250,
    ///     kind: EventKind::Countdown(Countdown { mode: CountdownMode::Running, seconds: 10 }),
    /// };
    /// assert_eq!(event.clock_string(), "01:05.250");
    /// ```
    #[must_use]
    pub fn clock_string(&self) -> String {
        format_clock(self.time_ms)
    }

    /// Returns the id of the player the event belongs to, if any.
    #[must_use]
    pub fn player_id(&self) -> Option<u8> {
        match &self.kind {
            EventKind::Chat(chat) => Some(chat.player_id),
            EventKind::LeftGame(left) => Some(left.player_id),
            EventKind::Action(action) => Some(action.player_id),
            EventKind::Countdown(_) => None,
        }
    }
}

fn format_clock(time_ms: u32) -> String {
    let hours = time_ms / 3_600_000;
    let minutes = (time_ms / 60_000) % 60;
    let seconds = f64::from(time_ms % 60_000) / 1000.0;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours:02}:"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes:02}:"));
    }
    out.push_str(&format!("{seconds:06.3}"));
    out
}
