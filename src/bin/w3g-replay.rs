//! Warcraft 3 replay (.w3g) decoder CLI
//!
//! A command-line interface for inspecting and validating W3G replay files.
//!
//! ## Commands
//!
//! - `info` - Display header, game settings, players and slots
//! - `events` - Print the event log as text or JSON
//! - `validate` - Validate replay format (exit codes for scripting)
//!
//! Set `RUST_LOG` (for example `RUST_LOG=w3g_replay=debug`) to see decoder
//! diagnostics on stderr.

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use w3g_replay::events::{parse_events, ChatMode, EventKind};
use w3g_replay::{decompress, Event, Header, Replay, StartupRecord};

/// Warcraft 3 replay (.w3g) decoder
#[derive(Parser)]
#[command(name = "w3g-replay")]
#[command(about = "Warcraft 3 replay (.w3g) decoder", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display replay information
    Info {
        /// Path to the replay file
        file: PathBuf,
    },
    /// Print the event log
    Events {
        /// Path to the replay file
        file: PathBuf,
        /// Output format: json, pretty
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
        /// Only chat messages
        #[arg(long)]
        chat: bool,
    },
    /// Validate replay format
    Validate {
        /// Path to the replay file
        file: PathBuf,
        /// Verbose error reporting
        #[arg(short, long)]
        verbose: bool,
    },
}

/// Output format options
#[derive(Clone, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info { file } => cmd_info(&file),
        Commands::Events { file, output, chat } => cmd_events(&file, &output, chat),
        Commands::Validate { file, verbose } => cmd_validate(&file, verbose),
    }
}

fn load_replay(file: &Path) -> Option<Replay> {
    let data = match std::fs::read(file) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading file: {e}");
            return None;
        }
    };

    match Replay::parse(&data) {
        Ok(replay) => Some(replay),
        Err(e) => {
            eprintln!("Error decoding replay: {e}");
            None
        }
    }
}

// ============================================================================
// Info Command Implementation
// ============================================================================

fn cmd_info(file: &Path) -> ExitCode {
    let Some(replay) = load_replay(file) else {
        return ExitCode::FAILURE;
    };

    print_info(&replay);
    ExitCode::SUCCESS
}

fn print_info(replay: &Replay) {
    let header = replay.header();
    let startup = replay.startup();
    let settings = replay.settings();

    println!("=== Header ===");
    println!("Header version: {:?}", header.version);
    match header.game_version.tag() {
        Some(tag) => println!("Game version:   {tag} {}", header.game_version.number()),
        None => println!("Game version:   {}", header.game_version.number()),
    }
    println!(
        "Expansion:      {}",
        if header.game_version.is_expansion() { "yes" } else { "no" }
    );
    println!("Build:          {}", header.build_number);
    println!("Mode:           {:?}", header.game_mode());
    println!("Duration:       {}", header.duration_string());
    println!("Blocks:         {}", header.block_count);

    println!("\n=== Game ===");
    println!("Name:           {}", startup.game_name);
    println!("Type:           {}", startup.game_type);
    println!("Privacy:        {:?}", startup.privacy);
    println!("Map:            {}", settings.map_name);
    println!("Creator:        {}", settings.creator_name);
    println!("Speed:          {:?}", settings.speed);
    println!("Observers:      {:?}", settings.observer);
    println!("Fixed teams:    {:?}", settings.fixed_teams);
    println!("Select mode:    {}", startup.select_mode);
    println!("Random seed:    0x{:08X}", startup.random_seed);

    println!("\n=== Players ({}) ===", startup.players.len());
    for player in &startup.players {
        let host = if player.is_host { " (host)" } else { "" };
        println!(
            "  [{:>2}] {}{host}, race {}",
            player.id,
            player.name,
            player.race_name()
        );
    }

    println!("\n=== Slots ({}) ===", startup.slots.len());
    for slot in &startup.slots {
        let who = if slot.is_human { "human" } else { "computer" };
        println!(
            "  player {:>2}: {:?}, {who}, team {}, {}, race {}",
            slot.player_id,
            slot.status,
            slot.team,
            slot.color,
            slot.race_name()
        );
    }
}

// ============================================================================
// Events Command Implementation
// ============================================================================

#[derive(Serialize)]
struct EventOutput<'a> {
    time: String,
    #[serde(flatten)]
    event: &'a Event,
    #[serde(skip_serializing_if = "Option::is_none")]
    player: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<String>,
}

fn cmd_events(file: &Path, output: &OutputFormat, chat_only: bool) -> ExitCode {
    let Some(replay) = load_replay(file) else {
        return ExitCode::FAILURE;
    };

    let events = replay
        .events()
        .iter()
        .filter(|e| !chat_only || matches!(e.kind, EventKind::Chat(_)));

    match output {
        OutputFormat::Pretty => {
            for event in events {
                println!("{}", format_event(&replay, event));
            }
        }
        OutputFormat::Json => {
            let out: Vec<EventOutput<'_>> = events
                .map(|event| EventOutput {
                    time: event.clock_string(),
                    event,
                    player: event
                        .player_id()
                        .and_then(|id| replay.player_name_by_id(id).ok()),
                    outcome: match &event.kind {
                        EventKind::LeftGame(left) => Some(left.outcome().to_string()),
                        _ => None,
                    },
                })
                .collect();
            match serde_json::to_string_pretty(&out) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Error serializing to JSON: {e}");
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    ExitCode::SUCCESS
}

fn name_of(replay: &Replay, player_id: u8) -> String {
    replay
        .player_name_by_id(player_id)
        .map_or_else(|_| format!("player {player_id}"), str::to_owned)
}

fn format_event(replay: &Replay, event: &Event) -> String {
    let time = event.clock_string();
    match &event.kind {
        EventKind::Chat(chat) => {
            let mode = match chat.mode {
                ChatMode::All => "all".to_string(),
                ChatMode::Allies => "allies".to_string(),
                ChatMode::Observers => "observers".to_string(),
                ChatMode::Startup => "startup".to_string(),
                ChatMode::Direct(id) => u8::try_from(id)
                    .map_or_else(|_| format!("player{id}"), |id| name_of(replay, id)),
            };
            format!(
                "[{time}] <{mode}> {}: {}",
                name_of(replay, chat.player_id),
                chat.message
            )
        }
        EventKind::LeftGame(left) => format!(
            "[{time}] <{}> {} left game, {}",
            left.closer,
            name_of(replay, left.player_id),
            left.outcome()
        ),
        EventKind::Countdown(countdown) => format!(
            "[{time}] Game countdown {}, {} left",
            countdown.mode,
            countdown.remaining_string()
        ),
        EventKind::Action(action) => format!(
            "[{time}] {} action {:?} ({} bytes)",
            name_of(replay, action.player_id),
            action.kind,
            action.payload_len
        ),
    }
}

// ============================================================================
// Validate Command Implementation
// ============================================================================

/// Decode stages checked by `validate`, in pipeline order.
#[derive(Clone, Copy)]
enum Stage {
    Header,
    Blocks,
    Startup,
    Events,
}

impl Stage {
    const ALL: [Stage; 4] = [Stage::Header, Stage::Blocks, Stage::Startup, Stage::Events];

    fn label(self) -> &'static str {
        match self {
            Stage::Header => "header",
            Stage::Blocks => "compressed blocks",
            Stage::Startup => "startup record",
            Stage::Events => "event stream",
        }
    }
}

/// Outcome of decoding one file stage by stage. Decoding stops at the
/// first stage that fails.
struct Report {
    passed: usize,
    failure: Option<String>,
    notes: Vec<String>,
}

impl Report {
    fn is_valid(&self) -> bool {
        self.failure.is_none()
    }

    fn failed_stage(&self) -> Option<Stage> {
        self.failure.as_ref().and(Stage::ALL.get(self.passed).copied())
    }
}

fn cmd_validate(file: &Path, verbose: bool) -> ExitCode {
    let mut report = Report {
        passed: 0,
        failure: None,
        notes: Vec::new(),
    };
    if let Err(e) = run_stages(file, &mut report) {
        report.failure = Some(e);
    }

    match (report.failed_stage(), &report.failure) {
        (Some(stage), Some(_)) => println!("{}: invalid {}", file.display(), stage.label()),
        (None, Some(e)) => println!("{}: {e}", file.display()),
        _ => println!("{}: ok", file.display()),
    }
    if verbose {
        print_report(&report);
    }

    if report.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run_stages(file: &Path, report: &mut Report) -> Result<(), String> {
    let data = std::fs::read(file).map_err(|e| format!("cannot read file: {e}"))?;

    let header = Header::parse(&data).map_err(|e| e.to_string())?;
    report.passed += 1;

    let stream = decompress(&data, &header).map_err(|e| e.to_string())?;
    report.passed += 1;
    if stream.len() != header.decompressed_size as usize {
        report.notes.push(format!(
            "header declares {} decompressed bytes, blocks hold {}",
            header.decompressed_size,
            stream.len()
        ));
    }

    let startup = StartupRecord::parse(&stream).map_err(|e| e.to_string())?;
    report.passed += 1;

    let events = parse_events(&stream, startup.byte_length).map_err(|e| e.to_string())?;
    report.passed += 1;
    if events.is_empty() {
        report.notes.push("event stream holds no events".to_string());
    }

    Ok(())
}

fn print_report(report: &Report) {
    for (i, stage) in Stage::ALL.iter().enumerate() {
        let state = match i.cmp(&report.passed) {
            std::cmp::Ordering::Less => "passed",
            std::cmp::Ordering::Equal if report.failure.is_some() => "failed",
            _ => "not reached",
        };
        println!("  {:<18} {state}", stage.label());
    }
    if let Some(failure) = &report.failure {
        println!("  error: {failure}");
    }
    for note in &report.notes {
        println!("  note: {note}");
    }
}
