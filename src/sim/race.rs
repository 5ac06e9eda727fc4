//! Race state machine and per-frame orchestration
//!
//! `Ready -> Countdown -> Running -> Finished`, with `reset` back to Ready
//! from anywhere. Each running frame advances the human, then every
//! opponent, then the clock, then checks for completion. That order is
//! fixed: finish times and ranking assume all racers saw the same frame.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

use super::ai::AiOpponent;
use super::input::ControlInput;
use super::player::Player;
use super::racer::{Racer, RacerId};
use super::ranking::{RankEntry, rank_of, rank_racers};
use super::state::{
    CountdownDisplay, RaceEvent, RaceEventHandler, RacePhase, RaceSnapshot, RaceSummary,
    RacerSnapshot,
};
use super::track::Track;
use crate::error::RaceError;
use crate::settings::RaceSettings;

/// A single race: track, racers, clock and subscribers
pub struct Race {
    /// Settings the race was built with
    pub settings: RaceSettings,
    pub track: Track,
    pub phase: RacePhase,
    /// Seconds left on the countdown (meaningful in Countdown)
    pub countdown_remaining: f32,
    /// Seconds since the race went Running
    pub clock: f32,
    pub player: Player,
    pub opponents: Vec<AiOpponent>,
    /// Results, once Finished
    pub summary: Option<RaceSummary>,
    paused: bool,
    last_countdown: Option<CountdownDisplay>,
    rng: Pcg32,
    /// Events emitted since the start of the current frame
    events: Vec<RaceEvent>,
    handlers: Vec<Box<dyn RaceEventHandler>>,
}

impl Race {
    /// Build a race: lay out the track, place the player in the middle lane
    /// and opponents in shuffled free lanes.
    pub fn new(settings: RaceSettings) -> Result<Self, RaceError> {
        settings.validate()?;

        let mut rng = Pcg32::seed_from_u64(settings.seed);
        let track = Track::new(settings.track_length, &settings.hurdle_z_positions);
        let player = Player::new(track.player_lane());

        let mut lanes = track.opponent_lanes();
        lanes.shuffle(&mut rng);
        if settings.opponent_count > lanes.len() {
            log::warn!(
                "Requested {} opponents but only {} free lanes",
                settings.opponent_count,
                lanes.len()
            );
        }
        let opponents = lanes
            .into_iter()
            .take(settings.opponent_count)
            .enumerate()
            .map(|(i, x)| AiOpponent::new(i, x, &mut rng))
            .collect::<Vec<_>>();

        log::info!(
            "Race ready: {:.0}m, {} hurdles, {} opponent(s), seed {}",
            track.length,
            track.hurdles.len(),
            opponents.len(),
            settings.seed
        );

        Ok(Self {
            settings,
            track,
            phase: RacePhase::Ready,
            countdown_remaining: 0.0,
            clock: 0.0,
            player,
            opponents,
            summary: None,
            paused: false,
            last_countdown: None,
            rng,
            events: Vec::new(),
            handlers: Vec::new(),
        })
    }

    /// Add an event subscriber
    pub fn subscribe(&mut self, handler: impl RaceEventHandler + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// Events emitted during the most recent frame (and any command since)
    pub fn events(&self) -> &[RaceEvent] {
        &self.events
    }

    /// Human plus opponents
    pub fn racer_count(&self) -> usize {
        1 + self.opponents.len()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stop simulating until `resume`; frames are accepted and ignored
    pub fn pause(&mut self) {
        if !self.paused {
            log::info!("Race paused in {:?}", self.phase);
            self.paused = true;
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            log::info!("Race resumed");
            self.paused = false;
        }
    }

    /// Start the countdown. Only valid from Ready; returns whether it started.
    pub fn start(&mut self) -> bool {
        if self.phase != RacePhase::Ready {
            log::debug!("Ignoring start in {:?}", self.phase);
            return false;
        }
        self.reset_racers();
        self.clock = 0.0;
        self.summary = None;
        self.phase = RacePhase::Countdown;
        self.countdown_remaining = self.settings.countdown_seconds;
        log::info!("Countdown started ({}s)", self.countdown_remaining);

        match CountdownDisplay::from_remaining(self.countdown_remaining) {
            Some(display) => {
                self.last_countdown = Some(display);
                self.emit(RaceEvent::CountdownTick(display));
            }
            None => self.begin_running(),
        }
        true
    }

    /// Back to Ready from any phase, clearing every racer's motion state
    pub fn reset(&mut self) {
        self.events.clear();
        self.reset_racers();
        self.phase = RacePhase::Ready;
        self.countdown_remaining = 0.0;
        self.clock = 0.0;
        self.summary = None;
        self.last_countdown = None;
        self.paused = false;
        log::info!("Race reset");
        self.emit(RaceEvent::RaceReset);
    }

    fn reset_racers(&mut self) {
        self.player.reset();
        for opponent in &mut self.opponents {
            opponent.reset(&mut self.rng);
        }
    }

    /// Advance the race by one frame.
    ///
    /// `dt` must be finite and non-negative; callers should also cap it
    /// (see [`crate::clamp_frame_dt`]). A missing input counts as no input.
    pub fn step(&mut self, dt: f32, input: Option<&ControlInput>) -> Result<(), RaceError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(RaceError::InvalidFrameDelta { dt });
        }
        self.events.clear();
        if self.paused {
            return Ok(());
        }

        match self.phase {
            RacePhase::Ready | RacePhase::Finished => {}
            RacePhase::Countdown => self.step_countdown(dt),
            RacePhase::Running => {
                let idle = ControlInput::default();
                self.step_running(dt, input.unwrap_or(&idle));
            }
        }
        Ok(())
    }

    fn step_countdown(&mut self, dt: f32) {
        self.countdown_remaining -= dt;
        match CountdownDisplay::from_remaining(self.countdown_remaining) {
            None => self.begin_running(),
            Some(display) if self.last_countdown != Some(display) => {
                self.last_countdown = Some(display);
                self.emit(RaceEvent::CountdownTick(display));
            }
            Some(_) => {}
        }
    }

    fn begin_running(&mut self) {
        self.phase = RacePhase::Running;
        self.clock = 0.0;
        self.last_countdown = None;
        log::info!("Race started");
        self.emit(RaceEvent::RaceStarted);
    }

    fn step_running(&mut self, dt: f32, input: &ControlInput) {
        let clock = self.clock;
        let mut frame_events = Vec::new();

        if !self.player.is_finished() {
            let outcome = self.player.advance(dt, input, &self.track, clock);
            if outcome.collided {
                frame_events.push(RaceEvent::HurdleHit {
                    racer: RacerId::Player,
                });
            }
            if outcome.finished {
                log::info!("Player finished in {clock:.2}s");
                frame_events.push(RaceEvent::RacerFinished {
                    racer: RacerId::Player,
                    time: clock,
                });
            }
        }

        for opponent in self.opponents.iter_mut().filter(|o| !o.is_finished()) {
            let outcome = opponent.advance(dt, &self.track, clock, &mut self.rng);
            if outcome.collided {
                frame_events.push(RaceEvent::HurdleHit {
                    racer: opponent.id(),
                });
            }
            if outcome.finished {
                log::info!("AI {} finished in {clock:.2}s", opponent.index);
                frame_events.push(RaceEvent::RacerFinished {
                    racer: opponent.id(),
                    time: clock,
                });
            }
        }

        for event in frame_events {
            self.emit(event);
        }

        self.clock += dt;

        if self.is_complete() {
            self.finish_race();
        }
    }

    /// Human done, and every opponent done (trivially true with none)
    pub fn is_complete(&self) -> bool {
        self.player.is_finished() && self.opponents.iter().all(|o| o.is_finished())
    }

    fn finish_race(&mut self) {
        if self.phase == RacePhase::Finished {
            return;
        }
        self.phase = RacePhase::Finished;

        let entries: Vec<RankEntry> = std::iter::once(RankEntry::from_racer(&self.player))
            .chain(self.opponents.iter().map(RankEntry::from_racer))
            .collect();
        let standings = rank_racers(&entries, self.clock);
        let summary = RaceSummary {
            player_time: self.player.finish_time(),
            player_rank: rank_of(&standings, RacerId::Player).unwrap_or(1),
            total_racers: standings.len(),
            standings,
        };

        log::info!(
            "Race finished: player {} place {}/{}",
            summary.player_time_display(),
            summary.player_rank,
            summary.total_racers
        );
        self.summary = Some(summary.clone());
        self.emit(RaceEvent::RaceFinished(summary));
    }

    fn emit(&mut self, event: RaceEvent) {
        for handler in &mut self.handlers {
            handler.handle(&event);
        }
        self.events.push(event);
    }

    /// Current countdown display, if counting down
    pub fn countdown_display(&self) -> Option<CountdownDisplay> {
        match self.phase {
            RacePhase::Countdown => CountdownDisplay::from_remaining(self.countdown_remaining),
            _ => None,
        }
    }

    /// View of the race for the renderer
    pub fn snapshot(&self) -> RaceSnapshot {
        let player = RacerSnapshot::new(
            RacerId::Player,
            &self.player.body,
            self.player.frame_speed(),
            self.player.boost_active(),
        );
        let racers = std::iter::once(player)
            .chain(self.opponents.iter().map(|o| {
                RacerSnapshot::new(o.id(), &o.body, o.body.horizontal_speed, false)
            }))
            .collect();
        RaceSnapshot {
            phase: self.phase,
            clock: self.clock,
            countdown: self.countdown_display(),
            racers,
        }
    }
}
