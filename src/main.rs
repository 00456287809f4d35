//! OLED Asteroids - headless attract mode
//!
//! Runs the game against an in-memory panel with a scripted pilot, saves the
//! input log, checks it replays to the same result and dumps the last frame
//! as ASCII.
//!
//! Usage: oled-asteroids [extended|classic|<tuning.json>] [ticks] [seed] [realtime]
//!
//! With `realtime` the loop paces itself on the wall clock like the board
//! firmware; otherwise time is simulated and the run finishes immediately.

#[cfg(not(target_arch = "wasm32"))]
use oled_asteroids::{
    Tuning, Variant,
    audio::RecordingTone,
    persistence::{JsonFileStore, MemoryStore, ScoreStore},
    platform::{Cabinet, Clock, SimClock, StdClock},
    renderer::{FrameBuffer, Presenter},
    sim::{GameSession, GameState, InputLog, TickInput},
};

/// Fixed frame period of the firmware loop (ms)
#[cfg(not(target_arch = "wasm32"))]
const FRAME_MS: u64 = 16;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(arg) => match Variant::from_str(&arg) {
            Some(variant) => variant.tuning(),
            None => Tuning::load_or(std::path::Path::new(&arg), Tuning::default()),
        },
        None => Tuning::default(),
    };
    let ticks: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(3_600);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(0x5EED);
    let realtime = args.next().is_some_and(|s| s == "realtime");

    log::info!(
        "OLED Asteroids (headless) - {} tuning, {ticks} ticks{}",
        tuning.variant.as_str(),
        if realtime { ", real time" } else { "" }
    );

    let store = JsonFileStore::open(std::env::temp_dir().join("oled-asteroids-scores.json"));
    let session = GameSession::new(tuning, seed, store);
    let mut cabinet = Cabinet::new(
        session,
        Presenter::new(seed ^ 0xA5A5),
        FrameBuffer::new(),
        RecordingTone::default(),
    );

    let recording = if realtime {
        run(&mut cabinet, &mut StdClock::new(), ticks, seed)
    } else {
        run(&mut cabinet, &mut SimClock::new(0), ticks, seed)
    };

    save_and_verify(&recording, &cabinet.session);

    let session = &cabinet.session;
    println!("{}", cabinet.surface().to_ascii());
    for text in cabinet.surface().texts() {
        println!("text @({}, {}) x{}: {}", text.x, text.y, text.size, text.text);
    }
    println!(
        "state {:?} | score {} | lives {} | high {} | tone changes {}",
        session.state(),
        session.score,
        session.lives,
        session.high_score(),
        cabinet.tone_device().log.len()
    );
    if session.state() == GameState::GameOver {
        println!("(game over)");
    }
}

/// Drive the cabinet for `ticks` frames, recording every input
#[cfg(not(target_arch = "wasm32"))]
fn run<S: ScoreStore>(
    cabinet: &mut Cabinet<S, FrameBuffer, RecordingTone>,
    clock: &mut impl Clock,
    ticks: u64,
    seed: u64,
) -> InputLog {
    let mut recording = InputLog::new(cabinet.session.tuning.clone(), seed);
    for tick in 0..ticks {
        let input = autopilot(&cabinet.session.tuning, tick);
        recording.record(input, clock.now_ms());
        cabinet.frame(&input, clock);
        clock.stall(FRAME_MS);
    }
    recording
}

/// Write the input log next to the score file and replay it
#[cfg(not(target_arch = "wasm32"))]
fn save_and_verify<S: ScoreStore>(recording: &InputLog, live: &GameSession<S>) {
    let path = std::env::temp_dir().join("oled-asteroids-last-run.json");
    match recording.to_json() {
        Ok(json) => match std::fs::write(&path, json) {
            Ok(()) => log::info!("Saved {} input frames to {}", recording.len(), path.display()),
            Err(e) => log::warn!("Failed to save input log: {e}"),
        },
        Err(e) => log::warn!("Failed to encode input log: {e}"),
    }

    let replayed = recording.replay(MemoryStore::default());
    if replayed.score == live.score && replayed.state() == live.state() {
        log::info!("Replay matches: score {}", replayed.score);
    } else {
        log::warn!(
            "Replay diverged: score {} vs {}, {:?} vs {:?}",
            replayed.score,
            live.score,
            replayed.state(),
            live.state()
        );
    }
}

/// Scripted pilot: sweeps the stick, pulses thrust, taps fire and
/// occasionally jumps
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(tuning: &Tuning, tick: u64) -> TickInput {
    let center = tuning.joystick_center;
    let sweep = ((tick as f32) * 0.03).sin();
    TickInput {
        axis_x: center + (sweep * tuning.max_throw as f32) as i32,
        axis_y: if tick % 90 < 20 { center - tuning.max_throw } else { center },
        fire: tick % 12 < 3,
        hyperspace: tick % 700 == 350,
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the library is driven by board firmware there
}
