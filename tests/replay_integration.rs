//! End-to-end tests: synthetic containers decoded through `Replay`.

mod common;

use common::*;
use w3g_replay::events::{ActionKind, ChatMode, Closer, CountdownMode, EventKind, LeaveOutcome};
use w3g_replay::format::HeaderVersion;
use w3g_replay::records::{GameType, ObserverMode, SlotStatus};
use w3g_replay::{ParserError, PlayerRef, Replay};

#[test]
fn test_minimal_replay() {
    let mut stream = StartupBuilder::new(1, "Solo")
        .slot(slot_record(1, 0, 0, 0x01))
        .build();
    stream.push(0x00);

    let replay = Replay::parse(&container(&stream, 1, 8192)).unwrap();

    assert_eq!(replay.players().len(), 1);
    assert_eq!(replay.slots().len(), 1);
    assert!(replay.events().is_empty());

    let host = replay.host().unwrap();
    assert_eq!(host.name, "Solo");
    assert_eq!(replay.settings().creator_name, "Solo");
    assert_eq!(replay.startup().game_type, GameType::Custom);
    assert_eq!(replay.startup().random_seed, 0xCAFE_BABE);
    assert_eq!(replay.startup().start_positions, 4);
}

#[test]
fn test_header_fields() {
    let mut stream = two_player_startup();
    stream.push(0x00);
    let replay = Replay::parse(&container(&stream, 1, 8192)).unwrap();
    let header = replay.header();

    assert_eq!(header.version, HeaderVersion::V1);
    assert_eq!(header.game_version.tag(), Some("W3XP"));
    assert_eq!(header.build_number, 6059);
    assert!(header.is_multiplayer());
    assert_eq!(header.duration_string(), "00:12:34");
}

#[test]
fn test_v0_header_multiple_blocks() {
    let mut stream = two_player_startup();
    for _ in 0..20 {
        stream.extend(time_slot(100, &[(1, &[0x10, 0x00, 0x00])]));
    }
    stream.extend(chat(2, 0, "gg"));
    stream.push(0x00);

    let data = container(&stream, 0, 64);
    let replay = Replay::parse(&data).unwrap();

    assert_eq!(replay.header().version, HeaderVersion::V0);
    assert!(replay.header().block_count > 1);
    assert_eq!(replay.events().len(), 21);

    let (event, chat) = replay.chat_messages().next().unwrap();
    assert_eq!(event.time_ms, 2000);
    assert_eq!(chat.message, "gg");
}

#[test]
fn test_startup_fields() {
    let mut stream = two_player_startup();
    stream.push(0x00);
    let replay = Replay::parse(&container(&stream, 1, 8192)).unwrap();

    let startup = replay.startup();
    assert_eq!(startup.game_name, "Local Game");
    assert_eq!(startup.player_count, 2);
    assert_eq!(startup.language_id, 0x0409);

    let settings = replay.settings();
    assert_eq!(settings.map_name, "Maps\\FrozenThrone\\(4)TwistedMeadows.w3x");
    assert_eq!(settings.observer, ObserverMode::Off);
    assert!(settings.teams_together);
    assert!(settings.shared_unit_control);

    assert_eq!(replay.players()[1].name, "Moon");
    assert_eq!(replay.slots()[2].status, SlotStatus::Used);
    assert!(replay.slots()[2].color.is_observer());
}

#[test]
fn test_unsupported_header_version() {
    let mut data = container(&two_player_startup(), 1, 8192);
    data[0x24..0x28].copy_from_slice(&2u32.to_le_bytes());

    assert!(matches!(
        Replay::parse(&data),
        Err(ParserError::InvalidHeader { .. })
    ));
}

#[test]
fn test_block_length_mismatch() {
    let mut data = container(&two_player_startup(), 1, 8192);
    let declared = u16::from_le_bytes([data[70], data[71]]);
    data[70..72].copy_from_slice(&(declared + 1).to_le_bytes());

    assert!(matches!(
        Replay::parse(&data),
        Err(ParserError::DecompressionError { .. })
    ));
}

#[test]
fn test_unknown_event_tag() {
    let mut stream = two_player_startup();
    let offset = stream.len() + chat(1, 0, "hi").len();
    stream.extend(chat(1, 0, "hi"));
    stream.push(0xFF);
    stream.extend_from_slice(&[0x00; 8]);

    match Replay::parse(&container(&stream, 1, 8192)) {
        Err(ParserError::UnknownBlock { tag, offset: at }) => {
            assert_eq!(tag, 0xFF);
            assert_eq!(at, offset);
        }
        other => panic!("expected UnknownBlock, got {other:?}"),
    }
}

#[test]
fn test_slot_section_sizing() {
    let two_eight_byte = StartupBuilder::new(1, "A")
        .slot(vec![1, 0x64, 0x02, 0x00, 0, 0, 0x01, 0x01])
        .slot(vec![2, 0x64, 0x02, 0x00, 1, 1, 0x02, 0x01])
        .slot_section_len(23)
        .build();
    let replay = Replay::parse(&container(&two_eight_byte, 1, 8192)).unwrap();
    assert_eq!(replay.slots().len(), 2);
    assert_eq!(replay.slots()[1].handicap, None);

    let non_integral = StartupBuilder::new(1, "A")
        .slot(vec![1, 0x64, 0x02, 0x00, 0, 0, 0x01, 0x01])
        .slot(vec![2, 0x64, 0x02, 0x00, 1, 1, 0x02, 0x01])
        .slot_section_len(24)
        .build();
    assert!(matches!(
        Replay::parse(&container(&non_integral, 1, 8192)),
        Err(ParserError::InvalidFormat { .. })
    ));

    let too_large = StartupBuilder::new(1, "A")
        .slot(vec![1, 0x64, 0x02, 0x00, 0, 0, 0x01, 0x01])
        .slot_section_len(7 + 10)
        .build();
    assert!(matches!(
        Replay::parse(&container(&too_large, 1, 8192)),
        Err(ParserError::InvalidFormat { .. })
    ));
}

#[test]
fn test_chat_modes() {
    let mut stream = two_player_startup();
    stream.extend(startup_chat(1, "hello lobby"));
    stream.extend(chat(2, 5, "secret"));
    stream.extend(chat(1, 1, "push now"));
    stream.push(0x00);

    let replay = Replay::parse(&container(&stream, 1, 8192)).unwrap();
    let modes: Vec<ChatMode> = replay.chat_messages().map(|(_, c)| c.mode).collect();

    assert_eq!(
        modes,
        vec![ChatMode::Startup, ChatMode::Direct(2), ChatMode::Allies]
    );
    let (_, lobby) = replay.chat_messages().next().unwrap();
    assert_eq!(lobby.message, "hello lobby");
}

#[test]
fn test_left_game_chain() {
    let mut stream = two_player_startup();
    stream.extend(time_slot(1000, &[]));
    stream.extend(left_game(0x0C, 2, 0x07, 9));
    stream.extend(left_game(0x0C, 1, 0x07, 10));
    stream.push(0x00);

    let replay = Replay::parse(&container(&stream, 1, 8192)).unwrap();
    let lefts: Vec<_> = replay
        .events()
        .iter()
        .filter_map(|e| match &e.kind {
            EventKind::LeftGame(left) => Some(left),
            _ => None,
        })
        .collect();

    assert_eq!(lefts.len(), 2);
    assert_eq!(lefts[0].closer, Closer::Local);
    assert!(lefts[0].successor.is_some());
    // Local, not last: 0x07 is a loss even though the sequence continues.
    assert_eq!(lefts[0].outcome(), LeaveOutcome::Lost);
    assert!(lefts[1].is_consecutive);
    assert_eq!(lefts[1].outcome(), LeaveOutcome::Won);

    let next = replay.next_left_game(lefts[0]).unwrap();
    assert_eq!(next.player_id, 1);
    assert!(replay.next_left_game(lefts[1]).is_none());
    assert_eq!(replay.events()[0].time_ms, 1000);
}

#[test]
fn test_actions_and_countdown() {
    let mut stream = two_player_startup();
    stream.extend(time_slot(250, &[(1, &[0x01]), (2, &[0x16, 0x01, 0x00])]));
    stream.extend_from_slice(&[0x22, 0x04, 0x11, 0x22, 0x33, 0x44]);
    stream.extend(countdown(0, 90));
    stream.push(0x00);

    let replay = Replay::parse(&container(&stream, 1, 8192)).unwrap();
    let events = replay.events();

    assert_eq!(events.len(), 3);
    match &events[0].kind {
        EventKind::Action(action) => {
            assert_eq!(action.player_id, 1);
            assert_eq!(action.kind, ActionKind::Pause);
        }
        other => panic!("expected action, got {other:?}"),
    }
    match &events[2].kind {
        EventKind::Countdown(c) => {
            assert_eq!(c.mode, CountdownMode::Running);
            assert_eq!(c.remaining_string(), "01:30");
            assert_eq!(events[2].time_ms, 250);
        }
        other => panic!("expected countdown, got {other:?}"),
    }
}

#[test]
fn test_stream_without_end_tag() {
    let mut stream = two_player_startup();
    stream.extend(chat(1, 0, "first"));

    assert!(matches!(
        Replay::parse(&container(&stream, 1, 8192)),
        Err(ParserError::UnexpectedEof { .. })
    ));
}

#[test]
fn test_player_lookup() {
    let mut stream = two_player_startup();
    stream.push(0x00);
    let replay = Replay::parse(&container(&stream, 1, 8192)).unwrap();

    assert!(matches!(replay.player_by_id(2), Ok(PlayerRef::Player(p)) if p.name == "Moon"));
    assert!(matches!(replay.player_by_id(3), Ok(PlayerRef::Slot(s)) if s.team == 2));
    assert_eq!(replay.player_name_by_id(1).unwrap(), "Grubby");
    assert_eq!(replay.player_name_by_id(3).unwrap(), "observer");
    assert!(matches!(
        replay.player_name_by_id(9),
        Err(ParserError::PlayerNotFound { player_id: 9 })
    ));
    // Second lookup is served from the index.
    assert_eq!(replay.player_name_by_id(2).unwrap(), "Moon");
}

#[test]
fn test_from_reader() {
    let mut stream = two_player_startup();
    stream.push(0x00);
    let data = container(&stream, 1, 8192);
    let replay = Replay::from_reader(std::io::Cursor::new(data)).unwrap();
    assert_eq!(replay.players().len(), 2);
}

#[test]
fn test_replay_serializes_to_json() {
    let mut stream = two_player_startup();
    stream.extend(chat(1, 0, "gl"));
    stream.push(0x00);
    let replay = Replay::parse(&container(&stream, 1, 8192)).unwrap();

    let json = serde_json::to_value(&replay).unwrap();
    assert_eq!(json["startup"]["game_name"], "Local Game");
    assert_eq!(json["events"][0]["kind"]["type"], "chat");
    assert_eq!(json["events"][0]["kind"]["message"], "gl");
}
