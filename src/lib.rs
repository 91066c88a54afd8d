//! # W3G Replay
//!
//! A Warcraft III replay (.w3g) decoder.
//!
//! The library turns a replay file into the game's metadata (map, players,
//! slots, rules) and a time-ordered event log of chat messages, players
//! leaving with their outcomes, the end-of-game countdown and player
//! command batches.
//!
//! ## Quick Start
//!
//! ```no_run
//! use w3g_replay::events::EventKind;
//! use w3g_replay::{Replay, Result};
//!
//! fn print_leavers(data: &[u8]) -> Result<()> {
//!     let replay = Replay::parse(data)?;
//!
//!     println!("Map: {}", replay.settings().map_name);
//!     println!("Duration: {}", replay.header().duration_string());
//!
//!     for event in replay.events() {
//!         if let EventKind::LeftGame(left) = &event.kind {
//!             let name = replay.player_name_by_id(left.player_id)?;
//!             println!("[{}] {name} {}", event.clock_string(), left.outcome());
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`error`] - Error types and result alias for parser operations
//! - [`binary`] - Low-level readers for little-endian data, C strings and bits
//! - [`format`] - Container constants, header versions and game mode flags
//! - [`header`] - Container header parsing
//! - [`decompress`] - Block stream decompression
//! - [`obfuscation`] - Decoder for the masked settings string
//! - [`records`] - Startup record parsing (players, slots, settings, lobby)
//! - [`events`] - Event model and event stream parsing
//! - [`replay`] - The decoded replay and player lookups
//!
//! ## Pipeline
//!
//! 1. [`Header::parse`] reads the fixed header (64 bytes for v0, 68 for v1).
//! 2. [`decompress`] inflates `block_count` zlib blocks into one buffer.
//! 3. [`records::StartupRecord::parse`] reads the lobby description from the
//!    start of that buffer.
//! 4. [`events::parse_events`] walks the tagged records that follow.
//!
//! All multi-byte integers are stored in little-endian byte order.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod binary;
pub mod decompress;
pub mod error;
pub mod events;
pub mod format;
pub mod header;
pub mod obfuscation;
pub mod records;
pub mod replay;

// Re-export commonly used types at the crate root
pub use decompress::decompress;
pub use error::{ParserError, Result};
pub use events::{Event, EventKind, LeaveOutcome};
pub use format::{GameMode, HeaderVersion};
pub use header::Header;
pub use records::{GameSettings, Player, SlotRecord, StartupRecord};
pub use replay::{PlayerRef, Replay};
