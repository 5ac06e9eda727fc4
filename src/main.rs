//! Hurdle Dash headless runner
//!
//! Runs one race with a scripted player and prints the result as JSON.
//! Usage: `hurdle-dash [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
use hurdle_dash::sim::{ControlInput, Race, RaceEvent, RacePhase, SprintKey};
#[cfg(not(target_arch = "wasm32"))]
use hurdle_dash::{RaceError, RaceSettings, clamp_frame_dt};

/// Simulated frame time
#[cfg(not(target_arch = "wasm32"))]
const FRAME_DT: f32 = 1.0 / 60.0;

/// Give up after ten simulated minutes
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES: u32 = 60 * 600;

/// Frames between sprint key presses
#[cfg(not(target_arch = "wasm32"))]
const PRESS_INTERVAL: u32 = 5;

/// Fraction of a second ahead of the hurdle to take off, so the apex lands over it
#[cfg(not(target_arch = "wasm32"))]
const JUMP_LEAD_SECONDS: f32 = 0.34;

/// Scripted human: alternate keys at a steady cadence and jump on approach
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(race: &Race, frame: u32) -> ControlInput {
    let key = if (frame / PRESS_INTERVAL) % 2 == 0 {
        SprintKey::Left
    } else {
        SprintKey::Right
    };
    let mut input = ControlInput::default();
    input.held.set(key, true);
    if frame % PRESS_INTERVAL == 0 {
        input.sprint_presses.push(key);
    }

    let player = &race.player.body;
    let lead = race.player.frame_speed() * JUMP_LEAD_SECONDS;
    let hurdle_ahead = race
        .track
        .hurdles
        .iter()
        .filter(|h| h.lane_x == player.lane_x())
        .map(|h| player.position.z - h.z)
        .any(|d| d > 0.0 && d <= lead);
    if hurdle_ahead && player.on_ground() {
        input.jump = true;
    }
    input
}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> Result<(), RaceError> {
    let settings = match std::env::args().nth(1) {
        Some(path) => RaceSettings::load(path)?,
        None => RaceSettings::default(),
    };

    let mut race = Race::new(settings)?;
    race.subscribe(|event: &RaceEvent| match event {
        RaceEvent::CountdownTick(display) => log::info!("Countdown: {display}"),
        RaceEvent::HurdleHit { racer } => log::debug!("{racer:?} hit a hurdle"),
        RaceEvent::RacerFinished { racer, time } => log::info!("{racer:?} finished at {time:.2}"),
        _ => {}
    });
    race.start();

    let mut frame = 0u32;
    while race.phase != RacePhase::Finished && frame < MAX_FRAMES {
        let input = autopilot(&race, frame);
        race.step(clamp_frame_dt(FRAME_DT), Some(&input))?;
        frame += 1;
    }

    match &race.summary {
        Some(summary) => println!("{}", serde_json::to_string_pretty(summary)?),
        None => {
            log::warn!("Race did not finish after {frame} frames");
            println!("{}", serde_json::to_string_pretty(&race.snapshot())?);
        }
    }
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Hurdle Dash (native) starting...");

    if let Err(e) = run() {
        log::error!("Race failed: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page on the web
}
