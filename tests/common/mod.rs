//! Builders for synthetic replay containers.
//!
//! Integration tests assemble the decompressed stream by hand (startup
//! record plus event records) and wrap it in a real container: a v0 or v1
//! header followed by zlib blocks.

#![allow(dead_code)]

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

/// The 28-byte prefix written by the game.
pub const PREFIX: &[u8; 28] = b"Warcraft III recorded game\x1A\x00";

/// Masks `plain` the way the game stores the settings string: every byte
/// incremented by one, mask bytes with only bit 0 set.
pub fn mask(plain: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for chunk in plain.chunks(7) {
        out.push(0x01);
        out.extend(chunk.iter().map(|b| b + 1));
    }
    out.push(0);
    out
}

/// A player record of a custom game.
pub fn player_record(tag: u8, id: u8, name: &str) -> Vec<u8> {
    let mut data = vec![tag, id];
    data.extend_from_slice(name.as_bytes());
    data.push(0);
    data.extend_from_slice(&[0x01, 0x00]);
    data
}

/// A 9-byte slot record.
pub fn slot_record(player_id: u8, team: u8, color: u8, race: u8) -> Vec<u8> {
    vec![player_id, 0x64, 0x02, 0x00, team, color, race, 0x01, 0x64]
}

/// Builds the decompressed startup record.
pub struct StartupBuilder {
    host: (u8, String),
    guests: Vec<(u8, String)>,
    slots: Vec<Vec<u8>>,
    slot_section_len: Option<u16>,
    map_name: String,
}

impl StartupBuilder {
    pub fn new(host_id: u8, host_name: &str) -> Self {
        StartupBuilder {
            host: (host_id, host_name.to_string()),
            guests: Vec::new(),
            slots: Vec::new(),
            slot_section_len: None,
            map_name: "Maps\\FrozenThrone\\(4)TwistedMeadows.w3x".to_string(),
        }
    }

    pub fn guest(mut self, id: u8, name: &str) -> Self {
        self.guests.push((id, name.to_string()));
        self
    }

    pub fn slot(mut self, record: Vec<u8>) -> Self {
        self.slots.push(record);
        self
    }

    /// Overrides the slot section byte count.
    pub fn slot_section_len(mut self, len: u16) -> Self {
        self.slot_section_len = Some(len);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut data = vec![0x00, 0x00, 0x00, 0x00];

        data.extend(player_record(0x00, self.host.0, &self.host.1));
        data.extend_from_slice(b"Local Game\x00");
        data.push(0x00);

        let mut settings = vec![0x02, 0x4F, 0x06, 0x01];
        settings.resize(13, 0x00);
        settings.extend_from_slice(self.map_name.as_bytes());
        settings.push(0);
        settings.extend_from_slice(self.host.1.as_bytes());
        settings.push(0);
        data.extend(mask(&settings));

        data.extend_from_slice(&((self.guests.len() + 1) as u32).to_le_bytes());
        data.push(0x09);
        data.push(0x00);
        data.extend_from_slice(&[0x00, 0x00]);
        data.extend_from_slice(&0x0000_0409u32.to_le_bytes());

        for (id, name) in &self.guests {
            data.extend(player_record(0x16, *id, name));
            data.extend_from_slice(&[0x00; 4]);
        }

        let payload: usize = self.slots.iter().map(Vec::len).sum();
        let section_len = self.slot_section_len.unwrap_or((payload + 7) as u16);
        data.push(0x19);
        data.extend_from_slice(&section_len.to_le_bytes());
        data.push(self.slots.len() as u8);
        for slot in &self.slots {
            data.extend_from_slice(slot);
        }

        data.extend_from_slice(&0xCAFE_BABEu32.to_le_bytes());
        data.push(0x00);
        data.push(0x04);
        data
    }
}

/// A time slot record.
pub fn time_slot(delta: u16, blocks: &[(u8, &[u8])]) -> Vec<u8> {
    let mut commands = Vec::new();
    for (player_id, payload) in blocks {
        commands.push(*player_id);
        commands.extend_from_slice(&(payload.len() as u16).to_le_bytes());
        commands.extend_from_slice(payload);
    }
    let mut data = vec![0x1F];
    data.extend_from_slice(&((commands.len() + 2) as u16).to_le_bytes());
    data.extend_from_slice(&delta.to_le_bytes());
    data.extend(commands);
    data
}

/// An in-game chat record with an audience code.
pub fn chat(player_id: u8, code: u32, message: &str) -> Vec<u8> {
    let mut body = vec![0x20];
    body.extend_from_slice(&code.to_le_bytes());
    body.extend_from_slice(message.as_bytes());
    body.push(0);
    let mut data = vec![0x20, player_id];
    data.extend_from_slice(&(body.len() as u16).to_le_bytes());
    data.extend(body);
    data
}

/// A lobby chat record.
pub fn startup_chat(player_id: u8, message: &str) -> Vec<u8> {
    let mut body = vec![0x10];
    body.extend_from_slice(message.as_bytes());
    body.push(0);
    let mut data = vec![0x20, player_id];
    data.extend_from_slice(&(body.len() as u16).to_le_bytes());
    data.extend(body);
    data
}

/// A left-game record.
pub fn left_game(reason: u32, player_id: u8, result_code: u32, sequence: u32) -> Vec<u8> {
    let mut data = vec![0x17];
    data.extend_from_slice(&reason.to_le_bytes());
    data.push(player_id);
    data.extend_from_slice(&result_code.to_le_bytes());
    data.extend_from_slice(&sequence.to_le_bytes());
    data
}

/// A countdown record.
pub fn countdown(mode: u32, seconds: u32) -> Vec<u8> {
    let mut data = vec![0x2F];
    data.extend_from_slice(&mode.to_le_bytes());
    data.extend_from_slice(&seconds.to_le_bytes());
    data
}

fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Wraps a decompressed stream in a container, splitting it into blocks of
/// at most `block_size` bytes.
pub fn container(stream: &[u8], header_version: u32, block_size: usize) -> Vec<u8> {
    let header_size: usize = if header_version == 0 { 64 } else { 68 };

    let mut blocks = Vec::new();
    for chunk in stream.chunks(block_size) {
        let compressed = zlib(chunk);
        blocks.extend_from_slice(&(compressed.len() as u16).to_le_bytes());
        blocks.extend_from_slice(&(chunk.len() as u16).to_le_bytes());
        blocks.extend_from_slice(&[0x00; 4]);
        blocks.extend(compressed);
    }
    let block_count = stream.chunks(block_size).count() as u32;

    let mut file = PREFIX.to_vec();
    file.extend_from_slice(&(header_size as u32).to_le_bytes());
    file.extend_from_slice(&((header_size + blocks.len()) as u32).to_le_bytes());
    file.extend_from_slice(&header_version.to_le_bytes());
    file.extend_from_slice(&(stream.len() as u32).to_le_bytes());
    file.extend_from_slice(&block_count.to_le_bytes());

    if header_version == 0 {
        file.extend_from_slice(&[0x00, 0x00]);
        file.extend_from_slice(&26u16.to_le_bytes());
    } else {
        file.extend_from_slice(b"PX3W");
        file.extend_from_slice(&26u32.to_le_bytes());
    }

    file.extend_from_slice(&6059u16.to_le_bytes());
    file.extend_from_slice(&0x8000u16.to_le_bytes());
    file.extend_from_slice(&754_500u32.to_le_bytes());
    file.extend_from_slice(&0u32.to_le_bytes());
    assert_eq!(file.len(), header_size);

    file.extend(blocks);
    file
}

/// A startup record for a two player game with matching slots.
pub fn two_player_startup() -> Vec<u8> {
    StartupBuilder::new(1, "Grubby")
        .guest(2, "Moon")
        .slot(slot_record(1, 0, 0, 0x02))
        .slot(slot_record(2, 1, 1, 0x04))
        .slot(slot_record(3, 2, 12, 0x20))
        .build()
}
