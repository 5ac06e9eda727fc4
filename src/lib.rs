//! Hurdle Dash - Arcade hurdles race simulation
//!
//! Core modules:
//! - `sim`: Deterministic race simulation (kinematics, hurdles, race lifecycle, ranking)
//! - `settings`: Per-race configuration loaded once at startup
//! - `error`: Crate error type

pub mod error;
pub mod settings;
pub mod sim;

pub use error::RaceError;
pub use settings::RaceSettings;

/// Game configuration constants
pub mod consts {
    /// Track dimensions (meters)
    pub const TRACK_LENGTH: f32 = 100.0;
    pub const TRACK_WIDTH: f32 = 9.0;
    pub const LANE_WIDTH: f32 = 1.22;

    /// Horizontal physics
    pub const MAX_SPEED: f32 = 10.0; // m/s
    pub const ACCELERATION: f32 = 2.5; // m/s², while driven
    pub const DECELERATION: f32 = 5.0; // m/s², no sprint keys held
    /// Fraction of ground deceleration applied while airborne
    pub const AIR_DECELERATION_FACTOR: f32 = 0.2;

    /// Sprint boost granted per valid left/right alternation
    pub const SPRINT_BOOST: f32 = 1.5;
    /// Sprint energy lost per second
    pub const SPRINT_DECAY_RATE: f32 = 4.2;
    /// Sprint energy ceiling as a fraction of MAX_SPEED
    pub const SPRINT_ENERGY_CAP_FACTOR: f32 = 0.85;
    /// Duration of the cosmetic boost flash (seconds)
    pub const SPRINT_FLASH_DURATION: f32 = 0.2;

    /// Vertical physics
    pub const JUMP_FORCE: f32 = 7.5; // initial upward velocity, m/s
    pub const GRAVITY: f32 = 22.0; // m/s²

    /// Racer body, relative to the racer centre
    pub const RACER_BASE_Y: f32 = 0.9;
    pub const RACER_HALF_WIDTH: f32 = 0.36; // torso + arms
    pub const RACER_HALF_DEPTH: f32 = 0.22; // head sphere
    pub const RACER_BOTTOM_OFFSET: f32 = 1.0; // feet below centre
    pub const RACER_TOP_OFFSET: f32 = 0.77; // top of head above centre

    /// Cosmetic bobbing
    pub const BOB_AMPLITUDE: f32 = 0.05;
    pub const BOB_MIN_SPEED: f32 = 0.1;
    pub const PLAYER_BOB_FREQUENCY: f32 = 10.0;
    pub const AI_BOB_FREQUENCY: f32 = 15.0;

    /// Hurdle geometry (standard women's 100m hurdle height)
    pub const HURDLE_WIDTH: f32 = 1.18;
    pub const HURDLE_HEIGHT: f32 = 0.914;
    pub const HURDLE_DEPTH: f32 = 0.1;
    /// Z of each hurdle row; negative is ahead of the start line
    pub const HURDLE_Z_POSITIONS: [f32; 2] = [-20.0, -80.0];
    /// Hurdles farther than this along Z are skipped before the box test
    pub const COLLISION_Z_MARGIN: f32 = 2.0;

    /// Race settings defaults
    pub const NUM_AI_OPPONENTS: usize = 5;
    pub const COUNTDOWN_SECONDS: f32 = 3.0;

    /// Largest frame delta the caller should feed a single step
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Clamp a measured frame delta before handing it to the simulation.
///
/// The simulation has no internal substepping, so a stalled frame would
/// otherwise let a fast racer skip through a hurdle in one step.
#[inline]
pub fn clamp_frame_dt(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, consts::MAX_FRAME_DT)
    } else {
        0.0
    }
}

/// Race time as shown on the results screen (two decimals)
pub fn format_race_time(seconds: f32) -> String {
    format!("{seconds:.2}")
}
