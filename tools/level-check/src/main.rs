//! level-check: validate Sunk Cost level files and play them headless.
//!
//! Usage:
//!   level-check validate --level levels/manor.json
//!   level-check simulate --level levels/manor.json --frames 3600 --snapshot out.json

use std::path::PathBuf;
use std::process;

use sunkcost_core::enums::{Role, RoundPhase};
use sunkcost_core::events::GameEvent;
use sunkcost_core::input::InputState;
use sunkcost_core::level::LevelData;
use sunkcost_core::state::RoundSnapshot;
use sunkcost_core::types::{Position, Velocity};
use sunkcost_sim::net::LoopbackChannel;
use sunkcost_sim::round::run_frame;
use sunkcost_sim::scene::{BodyView, KinematicBody, RecordingScene};
use sunkcost_sim::{RoundConfig, RoundEngine};

/// Hunter walking speed in the scripted round (pixels per frame).
const HUNTER_SPEED: f32 = 4.0;

/// Frames between scripted trap placements.
const TRAP_INTERVAL: u64 = 240;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "validate" => cmd_validate(&args[2..]),
        "simulate" => cmd_simulate(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "level-check: Sunk Cost level tool\n\
         \n\
         Commands:\n\
         \n\
         validate  Parse a level file and print what it contains\n\
         \n\
           --level <path>     Level JSON file\n\
         \n\
         simulate  Play a scripted headless round on a level\n\
         \n\
           --level <path>     Level JSON file\n\
           --config <path>    Round config JSON (optional)\n\
           --frames <N>       Frame limit (default: 3600)\n\
           --snapshot <path>  Write the Spirit's final snapshot as JSON (optional)\n\
         \n\
         Set RUST_LOG=info to see round events as they happen.\n"
    );
}

fn parse_flag<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(&args[i + 1]);
        }
    }
    None
}

fn parse_frames(args: &[String], default: u64) -> u64 {
    parse_flag(args, "--frames")
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn load_level(args: &[String]) -> LevelData {
    let path = match parse_flag(args, "--level") {
        Some(p) => PathBuf::from(p),
        None => {
            eprintln!("Error: --level <path> is required");
            process::exit(1);
        }
    };

    let text = match std::fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error reading {}: {e}", path.display());
            process::exit(1);
        }
    };

    let level = match LevelData::from_json(&text) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error parsing {}: {e}", path.display());
            process::exit(1);
        }
    };

    if let Err(e) = level.validate() {
        eprintln!("Invalid level {}: {e}", path.display());
        process::exit(1);
    }
    level
}

fn load_config(args: &[String]) -> RoundConfig {
    let Some(path) = parse_flag(args, "--config") else {
        return RoundConfig::default();
    };
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            process::exit(1);
        }
    };
    match serde_json::from_str(&text) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error parsing config {path}: {e}");
            process::exit(1);
        }
    }
}

// --- Validate command ---

fn cmd_validate(args: &[String]) {
    let level = load_level(args);

    eprintln!("Map: {}×{} tiles, tile scale {}", level.width, level.height, level.tile_scale());
    eprintln!("Battery capacity: {} ticks", level.battery_capacity());
    for (i, portrait) in level.portraits().enumerate() {
        let limits = portrait
            .limits
            .map(|(lo, hi)| format!("{lo:.2}..{hi:.2}"))
            .unwrap_or_else(|| "any".into());
        eprintln!(
            "  portrait {i}: ({:.0}, {:.0}) look {limits}",
            portrait.position.x, portrait.position.y
        );
    }
    for (i, (pos, orientation)) in level.doors().enumerate() {
        eprintln!("  door {i}: ({:.0}, {:.0}) {orientation:?}", pos.x, pos.y);
    }
    match level.player_start() {
        Some(p) => eprintln!("Hunter start: ({:.0}, {:.0})", p.x, p.y),
        None => eprintln!("Warning: no player start, Hunter spawns nowhere"),
    }
    match level.treasure() {
        Some(p) => eprintln!("Treasure: ({:.0}, {:.0})", p.x, p.y),
        None => eprintln!("Warning: no treasure, the Hunter cannot win"),
    }

    // Building the round catches problems the parser can't, such as bad limits.
    let mut engine = RoundEngine::new(RoundConfig::default());
    if let Err(e) = engine.load_level(&level) {
        eprintln!("Error building round: {e}");
        process::exit(1);
    }
    eprintln!("OK");
}

// --- Simulate command ---

struct Peer {
    engine: RoundEngine,
    channel: LoopbackChannel,
    scene: RecordingScene,
    last: RoundSnapshot,
}

impl Peer {
    fn new(level: &LevelData, config: &RoundConfig, role: Role, channel: LoopbackChannel) -> Self {
        let mut engine = RoundEngine::new(RoundConfig {
            role,
            ..config.clone()
        });
        if let Err(e) = engine.load_level(level) {
            eprintln!("Error building round: {e}");
            process::exit(1);
        }
        Self {
            engine,
            channel,
            scene: RecordingScene::default(),
            last: RoundSnapshot::default(),
        }
    }

    fn frame(&mut self, input: &InputState, body: Option<&dyn BodyView>) -> &RoundSnapshot {
        self.last = run_frame(&mut self.engine, &mut self.channel, &mut self.scene, input, body);
        &self.last
    }
}

#[derive(Default)]
struct Tally {
    switches: u32,
    blackouts: u32,
    traps_placed: u32,
    traps_sprung: u32,
    doors_locked: u32,
    doors_unlocked: u32,
}

impl Tally {
    fn record(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::CameraSwitched { .. } => self.switches += 1,
                GameEvent::BlackoutStarted => self.blackouts += 1,
                GameEvent::TrapPlaced { .. } => self.traps_placed += 1,
                GameEvent::TrapSprung { .. } => self.traps_sprung += 1,
                GameEvent::DoorLocked { .. } => self.doors_locked += 1,
                GameEvent::DoorUnlocked { .. } => self.doors_unlocked += 1,
                _ => {}
            }
        }
    }
}

fn cmd_simulate(args: &[String]) {
    let level = load_level(args);
    let config = load_config(args);
    let frames = parse_frames(args, 3600);

    let (spirit_end, hunter_end) = LoopbackChannel::pair();
    let mut spirit = Peer::new(&level, &config, Role::Spirit, spirit_end);
    let mut hunter = Peer::new(&level, &config, Role::Hunter, hunter_end);

    let start = level.player_start().unwrap_or_default();
    let mut body = KinematicBody::at(start);
    let target = level.treasure();
    let doors: Vec<Position> = level.doors().map(|(p, _)| p).collect();
    let first_portrait = level.portraits().next().map(|p| p.position);

    // Every event reaches the Spirit, so its snapshots are the ones tallied.
    let mut tally = Tally::default();
    tracing::info!("[round] Simulating up to {frames} frames with seed {}", config.seed);

    for frame in 0..frames {
        // Spirit: look through the first portrait and follow the Hunter with
        // it, drop traps where the Hunter was last seen, and lock the first door.
        let mut spirit_input = InputState::idle();
        if frame == 0 {
            spirit_input.minimap_tap = first_portrait;
        }
        spirit_input.look_at = spirit.last.hunter;
        if frame % TRAP_INTERVAL == TRAP_INTERVAL / 2 {
            spirit_input.place_trap = spirit.last.hunter;
        }
        spirit_input = scripted_lock(frame, &doors, spirit_input);
        tally.record(&spirit.frame(&spirit_input, None).events);

        // Hunter: walk straight at the treasure and try every door on the way.
        body.velocity = match target {
            Some(t) if !hunter.last.hunter_trapped => heading_to(body.position, t),
            _ => Velocity::default(),
        };
        body.step();
        let hunter_input = InputState {
            interact: true,
            ..InputState::default()
        };
        hunter.frame(&hunter_input, Some(&body));

        if spirit.last.phase == RoundPhase::Over && hunter.last.phase == RoundPhase::Over {
            break;
        }
    }

    let last = &spirit.last;
    eprintln!(
        "Finished at tick {} ({:.1}s): {:?}",
        last.time.tick,
        last.time.elapsed_secs(),
        last.outcome
    );
    eprintln!(
        "Camera switches: {}, blackouts: {}",
        tally.switches, tally.blackouts
    );
    eprintln!(
        "Traps placed: {}, sprung: {}",
        tally.traps_placed, tally.traps_sprung
    );
    eprintln!(
        "Door events: {} locked, {} unlocked",
        tally.doors_locked, tally.doors_unlocked
    );
    eprintln!(
        "Scene nodes still attached: spirit {}, hunter {}",
        spirit.scene.children().len(),
        hunter.scene.children().len()
    );

    if let Some(path) = parse_flag(args, "--snapshot") {
        let json = match serde_json::to_string_pretty(last) {
            Ok(j) => j,
            Err(e) => {
                eprintln!("Error serializing snapshot: {e}");
                process::exit(1);
            }
        };
        if let Err(e) = std::fs::write(path, json) {
            eprintln!("Error writing {path}: {e}");
            process::exit(1);
        }
        eprintln!("Snapshot written to {path}");
    }
}

/// Unit-speed velocity from `from` toward `to`, scaled to the walking speed.
fn heading_to(from: Position, to: Position) -> Velocity {
    let delta = to.to_vec2() - from.to_vec2();
    let dir = delta.normalize_or_zero() * HUNTER_SPEED.min(delta.length());
    Velocity::new(dir.x, dir.y)
}

/// Every 600 frames, drag the first door shut over three frames.
fn scripted_lock(frame: u64, doors: &[Position], mut input: InputState) -> InputState {
    let Some(door) = doors.first() else {
        return input;
    };
    let grab = Position::new(door.x + 60.0, door.y);
    match frame % 600 {
        300 => {
            input.touch_down = true;
            input.touch_position = Some(grab);
        }
        301 => input.touch_position = Some(grab),
        302 => {
            input.touch_released = true;
            input.touch_position = Some(grab);
        }
        _ => {}
    }
    input
}
