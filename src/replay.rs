//! The decoded replay.
//!
//! [`Replay`] runs the whole pipeline (header, block decompression,
//! startup record, event stream) and owns the results. Events refer to
//! players by id; names are resolved through the replay.
//!
//! # Example
//!
//! ```no_run
//! use w3g_replay::Replay;
//!
//! let file = std::fs::File::open("replay.w3g").unwrap();
//! let replay = Replay::from_reader(file).unwrap();
//!
//! println!("{} on {}", replay.startup().game_name, replay.settings().map_name);
//! for (event, chat) in replay.chat_messages() {
//!     let name = replay.player_name_by_id(chat.player_id).unwrap_or("?");
//!     println!("[{}] {name}: {}", event.clock_string(), chat.message);
//! }
//! ```

use std::collections::HashMap;
use std::io::Read;
use std::sync::OnceLock;

use serde::Serialize;

use crate::decompress::decompress;
use crate::error::{ParserError, Result};
use crate::events::{parse_events, Chat, Event, EventKind, LeftGame};
use crate::header::Header;
use crate::records::{GameSettings, Player, SlotRecord, StartupRecord};

/// Name reported for ids that only appear in a slot record.
pub const OBSERVER_NAME: &str = "observer";

/// A participant found by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerRef<'a> {
    /// A player record.
    Player(&'a Player),
    /// A slot record without a matching player record.
    Slot(&'a SlotRecord),
}

#[derive(Debug, Clone, Copy)]
enum Resolved {
    Player(usize),
    Slot(usize),
}

/// A fully decoded replay.
#[derive(Debug, Clone, Serialize)]
pub struct Replay {
    header: Header,
    startup: StartupRecord,
    events: Vec<Event>,

    #[serde(skip)]
    roster_index: OnceLock<HashMap<u8, Resolved>>,
}

impl Replay {
    /// Decodes a complete replay file.
    ///
    /// # Errors
    ///
    /// Any error of the individual stages; no partial replay is returned.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let header = Header::parse(data)?;
        let stream = decompress(data, &header)?;
        let startup = StartupRecord::parse(&stream)?;
        let events = parse_events(&stream, startup.byte_length)?;

        Ok(Replay {
            header,
            startup,
            events,
            roster_index: OnceLock::new(),
        })
    }

    /// Reads `reader` to the end and decodes it.
    ///
    /// # Errors
    ///
    /// `ParserError::IoError` if reading fails, otherwise as [`Replay::parse`].
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::parse(&data)
    }

    /// Container header.
    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Startup record with lobby information.
    #[must_use]
    pub fn startup(&self) -> &StartupRecord {
        &self.startup
    }

    /// Game rules and map.
    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.startup.settings
    }

    /// Players, host first.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.startup.players
    }

    /// Lobby slots.
    #[must_use]
    pub fn slots(&self) -> &[SlotRecord] {
        &self.startup.slots
    }

    /// Events in stream order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// The host player.
    #[must_use]
    pub fn host(&self) -> Option<&Player> {
        self.startup.host()
    }

    /// Iterates over chat events.
    pub fn chat_messages(&self) -> impl Iterator<Item = (&Event, &Chat)> {
        self.events.iter().filter_map(|event| match &event.kind {
            EventKind::Chat(chat) => Some((event, chat)),
            _ => None,
        })
    }

    /// Follows a left-game event's successor link.
    #[must_use]
    pub fn next_left_game(&self, left: &LeftGame) -> Option<&LeftGame> {
        left.successor
            .and_then(|i| self.events.get(i))
            .and_then(|event| match &event.kind {
                EventKind::LeftGame(next) => Some(next),
                _ => None,
            })
    }

    /// Finds a participant by id: the first player record with that id,
    /// else the first slot record naming it.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::PlayerNotFound` if neither exists.
    pub fn player_by_id(&self, player_id: u8) -> Result<PlayerRef<'_>> {
        match self.index().get(&player_id) {
            Some(Resolved::Player(i)) => Ok(PlayerRef::Player(&self.startup.players[*i])),
            Some(Resolved::Slot(i)) => Ok(PlayerRef::Slot(&self.startup.slots[*i])),
            None => Err(ParserError::PlayerNotFound { player_id }),
        }
    }

    /// Returns a participant's name, [`OBSERVER_NAME`] for ids known only
    /// from a slot record.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::PlayerNotFound` if the id is unknown.
    pub fn player_name_by_id(&self, player_id: u8) -> Result<&str> {
        Ok(match self.player_by_id(player_id)? {
            PlayerRef::Player(player) => player.name.as_str(),
            PlayerRef::Slot(_) => OBSERVER_NAME,
        })
    }

    fn index(&self) -> &HashMap<u8, Resolved> {
        self.roster_index.get_or_init(|| {
            let mut lookup = HashMap::new();
            for (i, player) in self.startup.players.iter().enumerate() {
                lookup.entry(player.id).or_insert(Resolved::Player(i));
            }
            for (i, slot) in self.startup.slots.iter().enumerate() {
                lookup.entry(slot.player_id).or_insert(Resolved::Slot(i));
            }
            lookup
        })
    }
}
