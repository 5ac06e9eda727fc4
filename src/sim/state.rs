//! Race lifecycle types, events and snapshots
//!
//! Everything collaborators (renderer, audio, UI) read from the simulation
//! is defined here.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::racer::{RacerBody, RacerId, Stance};
use super::ranking::Standing;
use crate::format_race_time;

/// Current phase of the race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RacePhase {
    /// Waiting for the start command
    #[default]
    Ready,
    /// Counting down to the start
    Countdown,
    /// Racers are moving
    Running,
    /// Everyone is done; terminal until reset
    Finished,
}

/// What the countdown shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountdownDisplay {
    /// Whole seconds left (ceiling)
    Seconds(u32),
    /// The start signal, shown for the last second of the countdown
    Go,
}

impl CountdownDisplay {
    /// Display for the remaining countdown value; None once the race should start
    pub fn from_remaining(remaining: f32) -> Option<Self> {
        if remaining <= -1.0 {
            None
        } else if remaining <= 0.0 {
            Some(CountdownDisplay::Go)
        } else {
            Some(CountdownDisplay::Seconds(remaining.ceil() as u32))
        }
    }
}

impl fmt::Display for CountdownDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountdownDisplay::Seconds(n) => write!(f, "{n}"),
            CountdownDisplay::Go => f.write_str("GO!"),
        }
    }
}

/// Results handed to the UI when the race ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceSummary {
    pub player_time: Option<f32>,
    /// 1-based
    pub player_rank: usize,
    pub total_racers: usize,
    pub standings: Vec<Standing>,
}

impl RaceSummary {
    /// Player time with two decimals, or "DNF"
    pub fn player_time_display(&self) -> String {
        self.player_time
            .map(format_race_time)
            .unwrap_or_else(|| "DNF".to_string())
    }
}

/// Discrete events emitted by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RaceEvent {
    /// Countdown display changed
    CountdownTick(CountdownDisplay),
    /// Countdown expired; racers are off (crowd cue)
    RaceStarted,
    /// A racer crossed the finish line
    RacerFinished { racer: RacerId, time: f32 },
    /// A racer ran into a hurdle
    HurdleHit { racer: RacerId },
    /// All racers are done
    RaceFinished(RaceSummary),
    /// Race returned to Ready
    RaceReset,
}

/// Subscriber for race events
pub trait RaceEventHandler {
    fn handle(&mut self, event: &RaceEvent);
}

impl<F: FnMut(&RaceEvent)> RaceEventHandler for F {
    fn handle(&mut self, event: &RaceEvent) {
        self(event)
    }
}

/// Per-racer view for the renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RacerSnapshot {
    pub id: RacerId,
    pub position: [f32; 3],
    pub speed: f32,
    pub airborne: bool,
    pub finished: bool,
    pub finish_time: Option<f32>,
    /// Boost flash showing (human only)
    pub boosting: bool,
}

impl RacerSnapshot {
    pub fn new(id: RacerId, body: &RacerBody, speed: f32, boosting: bool) -> Self {
        Self {
            id,
            position: body.position.to_array(),
            speed,
            airborne: body.stance == Stance::Airborne,
            finished: body.is_finished(),
            finish_time: body.finish_time,
            boosting,
        }
    }
}

/// Compact race view for rendering and debugging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceSnapshot {
    pub phase: RacePhase,
    pub clock: f32,
    pub countdown: Option<CountdownDisplay>,
    pub racers: Vec<RacerSnapshot>,
}
