//! Computer-controlled opponents
//!
//! A simple reactive policy: chase a per-opponent target speed, wander that
//! target a little now and then, and jump when the next hurdle comes within
//! a speed-dependent distance. No lookahead beyond the next hurdle row.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::check_collisions;
use super::racer::{FrameOutcome, Racer, RacerBody, RacerId};
use super::track::{HurdleRegistry, Track};
use crate::consts::*;

/// Target speed range as a fraction of MAX_SPEED
pub const TARGET_SPEED_FACTOR_MIN: f32 = 0.78;
pub const TARGET_SPEED_FACTOR_MAX: f32 = 0.99;
/// Bounds for the pace wander
pub const WANDER_FACTOR_FLOOR: f32 = 0.75;
pub const WANDER_FACTOR_BAND: f32 = 0.05;
/// Per-frame chance to wander the target speed
pub const WANDER_CHANCE: f32 = 0.01;
/// Above target, slow down at this fraction of DECELERATION...
pub const OVERSPEED_DECEL_FACTOR: f32 = 0.5;
/// ...but never below this fraction of target
pub const OVERSPEED_FLOOR_FACTOR: f32 = 0.9;

/// Jump decision distance = BASE + SPAN * (target / MAX_SPEED)
const JUMP_DISTANCE_BASE: f32 = 2.5;
const JUMP_DISTANCE_SPAN: f32 = 2.5;

/// Randomised traits of one opponent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiProfile {
    pub target_speed: f32,
    pub acceleration: f32,
    pub jump_force: f32,
    /// Forward distance to a hurdle at which the opponent commits to a jump
    pub jump_decision_distance: f32,
}

impl AiProfile {
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let target_speed = sample_target_speed(rng);
        Self {
            target_speed,
            acceleration: ACCELERATION * rng.random_range(0.85..1.2),
            jump_force: JUMP_FORCE * rng.random_range(0.85..1.15),
            jump_decision_distance: jump_decision_distance(target_speed),
        }
    }

    /// New target speed for a replay; acceleration and jump force carry over
    pub fn resample_pace<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.target_speed = sample_target_speed(rng);
        self.jump_decision_distance = jump_decision_distance(self.target_speed);
    }
}

fn sample_target_speed<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    MAX_SPEED * rng.random_range(TARGET_SPEED_FACTOR_MIN..TARGET_SPEED_FACTOR_MAX)
}

/// Faster opponents commit to a jump earlier
pub fn jump_decision_distance(target_speed: f32) -> f32 {
    JUMP_DISTANCE_BASE + JUMP_DISTANCE_SPAN * (target_speed / MAX_SPEED)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiOpponent {
    pub index: usize,
    pub body: RacerBody,
    pub profile: AiProfile,
    /// Next hurdle row to handle; only ever increases during a race
    pub next_hurdle: usize,
}

impl AiOpponent {
    pub fn new<R: Rng + ?Sized>(index: usize, lane_x: f32, rng: &mut R) -> Self {
        Self {
            index,
            body: RacerBody::new(lane_x),
            profile: AiProfile::sample(rng),
            next_hurdle: 0,
        }
    }

    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.body.reset();
        self.profile.resample_pace(rng);
        self.next_hurdle = 0;
    }

    #[inline]
    pub fn target_speed(&self) -> f32 {
        self.profile.target_speed
    }

    /// Advance one frame: collision, jump arc, hurdle approach, speed, move.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        track: &Track,
        clock: f32,
        rng: &mut R,
    ) -> FrameOutcome {
        if self.body.is_finished() {
            return FrameOutcome::default();
        }

        let collided = check_collisions(self, &track.hurdles);

        self.body.integrate_vertical(dt);
        self.approach_hurdles(&track.hurdles);
        self.control_speed(dt);
        self.wander_pace(rng);

        let speed = self.body.horizontal_speed;
        self.body.integrate_forward(speed, dt);
        self.body.apply_bob(clock, AI_BOB_FREQUENCY);

        let finished = self.check_finish(track.length, clock);
        FrameOutcome { collided, finished }
    }

    /// Jump when the next hurdle is close; move the pointer once past it
    fn approach_hurdles(&mut self, hurdles: &HurdleRegistry) {
        if !self.body.on_ground() {
            return;
        }
        let Some(hurdle) = hurdles.row_hurdle(self.next_hurdle, self.body.lane_x()) else {
            return;
        };

        let z = self.body.position.z;
        let distance = z - hurdle.z;
        if distance > 0.0
            && distance < self.profile.jump_decision_distance
            && self.body.jump(self.profile.jump_force)
        {
            log::debug!(
                "AI {} jumping hurdle {} from {:.2}m",
                self.index,
                self.next_hurdle,
                distance
            );
        }
        if z < hurdle.trailing_edge() {
            self.next_hurdle += 1;
        }
    }

    /// Converge on the target speed; slowing down is gentler than speeding up
    fn control_speed(&mut self, dt: f32) {
        let target = self.profile.target_speed;
        let body = &mut self.body;
        body.driven = body.horizontal_speed < target;
        if body.driven {
            body.horizontal_speed =
                (body.horizontal_speed + self.profile.acceleration * dt).min(target);
        } else if body.horizontal_speed > target {
            body.horizontal_speed = (body.horizontal_speed
                - DECELERATION * OVERSPEED_DECEL_FACTOR * dt)
                .max(target * OVERSPEED_FLOOR_FACTOR);
        }
        body.horizontal_speed = body.horizontal_speed.max(0.0);
    }

    /// Occasionally nudge the target within a small band around itself
    fn wander_pace<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if rng.random::<f32>() >= WANDER_CHANCE {
            return;
        }
        let factor = self.profile.target_speed / MAX_SPEED;
        let lo = (factor - WANDER_FACTOR_BAND).max(WANDER_FACTOR_FLOOR);
        let hi = (factor + WANDER_FACTOR_BAND).min(TARGET_SPEED_FACTOR_MAX);
        self.profile.target_speed = MAX_SPEED * (lo + rng.random::<f32>() * (hi - lo).max(0.0));
    }
}

impl Racer for AiOpponent {
    fn id(&self) -> RacerId {
        RacerId::Ai(self.index)
    }

    fn body(&self) -> &RacerBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut RacerBody {
        &mut self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 60.0;

    /// Opponent in a lane that has hurdles
    fn opponent(seed: u64) -> (AiOpponent, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let ai = AiOpponent::new(0, Track::default().player_lane(), &mut rng);
        (ai, rng)
    }

    #[test]
    fn test_profile_ranges() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..500 {
            let p = AiProfile::sample(&mut rng);
            assert!(p.target_speed >= MAX_SPEED * 0.78 && p.target_speed <= MAX_SPEED * 0.99);
            assert!(p.acceleration >= ACCELERATION * 0.85 && p.acceleration <= ACCELERATION * 1.2);
            assert!(p.jump_force >= JUMP_FORCE * 0.85 && p.jump_force <= JUMP_FORCE * 1.15);
            assert!(p.jump_decision_distance > 2.5 && p.jump_decision_distance < 5.0);
        }
    }

    #[test]
    fn test_faster_ai_jumps_earlier() {
        assert!(jump_decision_distance(9.9) > jump_decision_distance(7.8));
        assert!((jump_decision_distance(MAX_SPEED) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_accelerates_to_target_without_overshoot() {
        let (mut ai, _) = opponent(2);
        for _ in 0..600 {
            ai.control_speed(DT);
        }
        assert_eq!(ai.body.horizontal_speed, ai.target_speed());
        assert!(!ai.body.driven);
    }

    #[test]
    fn test_overspeed_settles_on_target() {
        let (mut ai, _) = opponent(3);
        let target = ai.target_speed();
        ai.body.horizontal_speed = MAX_SPEED * 2.0;
        for _ in 0..2000 {
            ai.control_speed(DT);
            assert!(ai.body.horizontal_speed >= target * OVERSPEED_FLOOR_FACTOR);
        }
        assert_eq!(ai.body.horizontal_speed, target);
    }

    #[test]
    fn test_overspeed_step_floors_at_ninety_percent() {
        let (mut ai, _) = opponent(3);
        let target = ai.target_speed();
        ai.body.horizontal_speed = MAX_SPEED * 2.0;
        ai.control_speed(10.0);
        assert_eq!(ai.body.horizontal_speed, target * OVERSPEED_FLOOR_FACTOR);
    }

    #[test]
    fn test_wander_stays_in_band() {
        let (mut ai, mut rng) = opponent(4);
        for _ in 0..20_000 {
            let before = ai.target_speed() / MAX_SPEED;
            ai.wander_pace(&mut rng);
            let after = ai.target_speed() / MAX_SPEED;
            assert!(after >= WANDER_FACTOR_FLOOR - 1e-5);
            assert!(after <= TARGET_SPEED_FACTOR_MAX + 1e-5);
            assert!((after - before).abs() <= WANDER_FACTOR_BAND + 1e-5);
        }
    }

    #[test]
    fn test_jumps_inside_decision_distance() {
        let track = Track::default();
        let (mut ai, mut rng) = opponent(5);
        let d = ai.profile.jump_decision_distance;
        ai.body.position.z = -20.0 + d + 0.5;
        ai.approach_hurdles(&track.hurdles);
        assert!(ai.body.on_ground());

        ai.body.position.z = -20.0 + d - 0.1;
        ai.advance(DT, &track, 0.0, &mut rng);
        assert!(ai.body.is_jumping());
        assert_eq!(ai.next_hurdle, 0);
    }

    #[test]
    fn test_hurdle_pointer_is_monotonic() {
        let track = Track::default();
        let (mut ai, _) = opponent(6);
        ai.body.position.z = -20.1;
        ai.approach_hurdles(&track.hurdles);
        assert_eq!(ai.next_hurdle, 1);

        // Pushed back behind the first row: still targets the second one
        ai.body.position.z = -19.0;
        ai.approach_hurdles(&track.hurdles);
        assert_eq!(ai.next_hurdle, 1);
        assert!(ai.body.on_ground());
    }

    #[test]
    fn test_no_jump_when_all_rows_passed() {
        let track = Track::default();
        let (mut ai, _) = opponent(7);
        ai.next_hurdle = track.hurdles.rows().len();
        ai.body.position.z = -81.0;
        ai.approach_hurdles(&track.hurdles);
        assert!(ai.body.on_ground());
    }

    #[test]
    fn test_collision_zeroes_speed() {
        let track = Track::default();
        let (mut ai, mut rng) = opponent(8);
        ai.body.position.z = -19.9;
        ai.body.horizontal_speed = 8.0;
        ai.next_hurdle = 1;
        let out = ai.advance(DT, &track, 0.0, &mut rng);
        assert!(out.collided);
        // Penalty then one frame of acceleration from rest
        assert!(ai.body.horizontal_speed <= ai.profile.acceleration * DT + 1e-6);
    }

    #[test]
    fn test_collision_then_jump_in_same_frame() {
        let track = Track::default();
        let (mut ai, mut rng) = opponent(11);
        // Grounded, overlapping the first hurdle, still short of its centre
        ai.body.position.z = -19.9;
        ai.body.horizontal_speed = 8.0;
        assert_eq!(ai.next_hurdle, 0);

        let out = ai.advance(DT, &track, 0.0, &mut rng);
        assert!(out.collided);
        assert!(ai.body.is_jumping());
        assert_eq!(ai.body.vertical_velocity, ai.profile.jump_force);
        assert_eq!(ai.next_hurdle, 0);
    }

    #[test]
    fn test_pointer_uses_registry_hurdle_edge() {
        let track = Track::default();
        let (mut ai, _) = opponent(12);
        let edge = track
            .hurdles
            .row_hurdle(0, ai.body.lane_x())
            .unwrap()
            .trailing_edge();
        ai.body.position.z = edge;
        ai.approach_hurdles(&track.hurdles);
        assert_eq!(ai.next_hurdle, 0);

        ai.body.position.z = edge - 0.01;
        ai.approach_hurdles(&track.hurdles);
        assert_eq!(ai.next_hurdle, 1);
    }

    #[test]
    fn test_runs_whole_race() {
        let track = Track::default();
        let (mut ai, mut rng) = opponent(9);
        let mut clock = 0.0;
        while !ai.body.is_finished() {
            ai.advance(DT, &track, clock, &mut rng);
            clock += DT;
            assert!(ai.body.horizontal_speed >= 0.0);
            assert!(clock < 300.0, "opponent never finished");
        }
        assert_eq!(ai.next_hurdle, track.hurdles.rows().len());
        assert_eq!(ai.body.horizontal_speed, 0.0);
        assert!(ai.body.finish_time.is_some());
    }

    #[test]
    fn test_reset_resamples_pace_only() {
        let (mut ai, mut rng) = opponent(10);
        let profile = ai.profile;
        ai.body.position.z = -50.0;
        ai.next_hurdle = 2;
        ai.reset(&mut rng);
        assert_eq!(ai.body.position.z, 0.0);
        assert_eq!(ai.next_hurdle, 0);
        assert_eq!(ai.profile.acceleration, profile.acceleration);
        assert_eq!(ai.profile.jump_force, profile.jump_force);
        assert_eq!(
            ai.profile.jump_decision_distance,
            jump_decision_distance(ai.profile.target_speed)
        );
    }

    proptest! {
        /// Property: opponent speed never goes negative and stance stays consistent
        #[test]
        fn prop_ai_speed_non_negative_and_stance_exclusive(
            seed in any::<u64>(),
            steps in prop::collection::vec(0.0f32..0.1f32, 1..400)
        ) {
            let track = Track::default();
            let (mut ai, mut rng) = opponent(seed);
            let mut clock = 0.0;
            for dt in steps {
                ai.advance(dt, &track, clock, &mut rng);
                clock += dt;
                prop_assert!(ai.body.horizontal_speed >= 0.0);
                prop_assert!(ai.body.on_ground() != ai.body.is_jumping());
                prop_assert!(ai.next_hurdle <= track.hurdles.rows().len());
                if ai.body.on_ground() {
                    prop_assert_eq!(ai.body.vertical_velocity, 0.0);
                }
            }
        }
    }
}
