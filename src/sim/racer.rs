//! Shared racer kinematics
//!
//! `RacerBody` holds the state every racer has (position, speeds, stance,
//! finish). The [`Racer`] trait is implemented by the human [`Player`] and
//! the computer [`AiOpponent`], which add their own speed control on top.
//!
//! [`Player`]: super::player::Player
//! [`AiOpponent`]: super::ai::AiOpponent

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;
use crate::consts::*;

/// Stable identity of a racer within one race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RacerId {
    /// The human-controlled racer
    Player,
    /// Computer opponent by index
    Ai(usize),
}

/// Vertical state. Exactly one holds at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Stance {
    #[default]
    Grounded,
    Airborne,
}

/// What happened to a racer during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    /// A hurdle penalty was applied
    pub collided: bool,
    /// The racer crossed the finish line this frame
    pub finished: bool,
}

/// Physical state shared by all racers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RacerBody {
    /// Centre of the racer (bob included while grounded)
    pub position: Vec3,
    /// Resting y of the racer centre
    pub base_ground_y: f32,
    /// Ground speed, never negative
    pub horizontal_speed: f32,
    /// Only meaningful while airborne
    pub vertical_velocity: f32,
    pub stance: Stance,
    /// Actively accelerating this frame (sprint key held / below target)
    pub driven: bool,
    /// Cosmetic bob currently added to `position.y`
    pub bob_offset: f32,
    /// Race clock when the finish line was crossed
    pub finish_time: Option<f32>,
}

impl RacerBody {
    /// New racer standing on the start line in the given lane
    pub fn new(lane_x: f32) -> Self {
        Self {
            position: Vec3::new(lane_x, RACER_BASE_Y, 0.0),
            base_ground_y: RACER_BASE_Y,
            horizontal_speed: 0.0,
            vertical_velocity: 0.0,
            stance: Stance::Grounded,
            driven: false,
            bob_offset: 0.0,
            finish_time: None,
        }
    }

    /// Back to the start line, keeping the lane
    pub fn reset(&mut self) {
        *self = Self::new(self.position.x);
    }

    #[inline]
    pub fn lane_x(&self) -> f32 {
        self.position.x
    }

    #[inline]
    pub fn on_ground(&self) -> bool {
        self.stance == Stance::Grounded
    }

    #[inline]
    pub fn is_jumping(&self) -> bool {
        self.stance == Stance::Airborne
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finish_time.is_some()
    }

    /// World bounds used for collision. Ignores the cosmetic bob.
    pub fn bounds(&self) -> Aabb {
        let y = match self.stance {
            Stance::Grounded => self.base_ground_y,
            Stance::Airborne => self.position.y,
        };
        Aabb::new(
            Vec3::new(
                self.position.x - RACER_HALF_WIDTH,
                y - RACER_BOTTOM_OFFSET,
                self.position.z - RACER_HALF_DEPTH,
            ),
            Vec3::new(
                self.position.x + RACER_HALF_WIDTH,
                y + RACER_TOP_OFFSET,
                self.position.z + RACER_HALF_DEPTH,
            ),
        )
    }

    /// Leave the ground with the given upward velocity.
    ///
    /// Returns false if the racer is already airborne or finished.
    pub fn jump(&mut self, jump_force: f32) -> bool {
        if !self.on_ground() || self.is_finished() {
            return false;
        }
        self.position.y = self.base_ground_y;
        self.bob_offset = 0.0;
        self.stance = Stance::Airborne;
        self.vertical_velocity = jump_force;
        true
    }

    /// Integrate the jump arc; snaps to the ground on landing
    pub fn integrate_vertical(&mut self, dt: f32) {
        if self.stance != Stance::Airborne {
            return;
        }
        self.position.y += self.vertical_velocity * dt;
        self.vertical_velocity -= GRAVITY * dt;
        if self.position.y <= self.base_ground_y {
            self.land();
        }
    }

    fn land(&mut self) {
        self.position.y = self.base_ground_y;
        self.stance = Stance::Grounded;
        self.vertical_velocity = 0.0;
    }

    /// Move along the track at `speed` for `dt` seconds
    #[inline]
    pub fn integrate_forward(&mut self, speed: f32, dt: f32) {
        self.position.z -= speed.max(0.0) * dt;
    }

    /// Apply the cosmetic running bob for animation time `time`
    pub fn apply_bob(&mut self, time: f32, frequency: f32) {
        if self.stance != Stance::Grounded {
            return;
        }
        self.bob_offset = if self.horizontal_speed > BOB_MIN_SPEED {
            (time * frequency * self.horizontal_speed + self.position.x).sin() * BOB_AMPLITUDE
        } else {
            0.0
        };
        self.position.y = self.base_ground_y + self.bob_offset;
    }

    /// Record the finish at `clock` and stop. No-op once finished.
    pub fn finish(&mut self, clock: f32) -> bool {
        if self.is_finished() {
            return false;
        }
        self.finish_time = Some(clock);
        self.horizontal_speed = 0.0;
        self.driven = false;
        true
    }

    /// Whether the racer is at or past the finish line
    #[inline]
    pub fn reached_line(&self, track_length: f32) -> bool {
        self.position.z <= -track_length
    }
}

/// Common interface over the human and computer racers
pub trait Racer {
    fn id(&self) -> RacerId;

    fn body(&self) -> &RacerBody;

    fn body_mut(&mut self) -> &mut RacerBody;

    /// Hurdle hit: stop dead and drop the driven state
    fn apply_collision_penalty(&mut self) {
        let body = self.body_mut();
        body.horizontal_speed = 0.0;
        body.driven = false;
    }

    /// Record the finish at `clock`; returns false if already finished
    fn finish(&mut self, clock: f32) -> bool {
        self.body_mut().finish(clock)
    }

    /// Finish if the racer has reached the line
    fn check_finish(&mut self, track_length: f32, clock: f32) -> bool {
        self.body().reached_line(track_length) && self.finish(clock)
    }

    fn is_finished(&self) -> bool {
        self.body().is_finished()
    }

    fn finish_time(&self) -> Option<f32> {
        self.body().finish_time
    }
}
