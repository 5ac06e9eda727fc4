//! The human-controlled racer
//!
//! Speed comes from two sources: a base speed that builds while a sprint key
//! is held, and a decaying sprint energy bonus earned by alternating the
//! left and right keys.

use serde::{Deserialize, Serialize};

use super::collision::check_collisions;
use super::input::{ControlInput, SprintKey};
use super::racer::{FrameOutcome, Racer, RacerBody, RacerId};
use super::track::Track;
use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: RacerBody,
    /// Transient speed bonus from key alternation
    pub sprint_energy: f32,
    /// Last sprint key accepted, for alternation checks
    pub last_sprint_key: Option<SprintKey>,
    /// Seconds left on the boost flash effect (cosmetic)
    pub boost_flash: f32,
}

impl Player {
    pub fn new(lane_x: f32) -> Self {
        Self {
            body: RacerBody::new(lane_x),
            sprint_energy: 0.0,
            last_sprint_key: None,
            boost_flash: 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.body.reset();
        self.sprint_energy = 0.0;
        self.last_sprint_key = None;
        self.boost_flash = 0.0;
    }

    /// Register a sprint key press. Grants a boost only when it alternates
    /// with the previous press; returns whether energy was granted.
    pub fn sprint(&mut self, key: SprintKey) -> bool {
        if self.body.is_finished() {
            return false;
        }
        let alternated = self.last_sprint_key != Some(key);
        if alternated {
            self.sprint_energy =
                (self.sprint_energy + SPRINT_BOOST).min(MAX_SPEED * SPRINT_ENERGY_CAP_FACTOR);
            self.boost_flash = SPRINT_FLASH_DURATION;
        }
        self.last_sprint_key = Some(key);
        alternated
    }

    pub fn jump(&mut self) -> bool {
        let jumped = self.body.jump(JUMP_FORCE);
        if jumped {
            log::debug!("Player jumped at z={:.2}", self.body.position.z);
        }
        jumped
    }

    /// Speed actually used for movement this frame
    pub fn frame_speed(&self) -> f32 {
        (self.body.horizontal_speed + self.sprint_energy).clamp(0.0, MAX_SPEED)
    }

    /// Whether the boost flash effect is showing
    #[inline]
    pub fn boost_active(&self) -> bool {
        self.boost_flash > 0.0
    }

    /// Advance one frame. `clock` is the race clock, used for the finish
    /// time and the bob phase.
    pub fn advance(&mut self, dt: f32, input: &ControlInput, track: &Track, clock: f32) -> FrameOutcome {
        if self.body.is_finished() {
            return FrameOutcome::default();
        }

        for &key in &input.sprint_presses {
            self.sprint(key);
        }
        if input.jump {
            self.jump();
        }

        // Collision before movement; a hit zeroes speed and energy for this frame
        let collided = check_collisions(self, &track.hurdles);

        self.boost_flash = (self.boost_flash - dt).max(0.0);

        let body = &mut self.body;
        body.driven = input.held.any();
        if body.driven {
            body.horizontal_speed += ACCELERATION * dt;
        } else if body.on_ground() {
            body.horizontal_speed -= DECELERATION * dt;
        } else if body.horizontal_speed > 0.0 {
            body.horizontal_speed -= DECELERATION * AIR_DECELERATION_FACTOR * dt;
        }
        body.horizontal_speed = body.horizontal_speed.max(0.0);

        self.sprint_energy = (self.sprint_energy - SPRINT_DECAY_RATE * dt).max(0.0);

        let speed = self.frame_speed();
        let body = &mut self.body;
        body.integrate_forward(speed, dt);
        body.integrate_vertical(dt);
        body.apply_bob(clock, PLAYER_BOB_FREQUENCY);

        let finished = self.check_finish(track.length, clock);
        FrameOutcome { collided, finished }
    }
}

impl Racer for Player {
    fn id(&self) -> RacerId {
        RacerId::Player
    }

    fn body(&self) -> &RacerBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut RacerBody {
        &mut self.body
    }

    fn apply_collision_penalty(&mut self) {
        self.body.horizontal_speed = 0.0;
        self.body.driven = false;
        self.sprint_energy = 0.0;
    }

    fn finish(&mut self, clock: f32) -> bool {
        let finished = self.body.finish(clock);
        if finished {
            self.sprint_energy = 0.0;
        }
        finished
    }
}
