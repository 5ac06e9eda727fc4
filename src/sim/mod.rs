//! Deterministic race simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied frame time only
//! - Seeded RNG only
//! - Stable update order (human first, then opponents by index)
//! - No rendering, audio or platform dependencies

pub mod ai;
pub mod bounds;
pub mod collision;
pub mod input;
pub mod player;
pub mod race;
pub mod racer;
pub mod ranking;
pub mod state;
pub mod track;

pub use ai::{AiOpponent, AiProfile};
pub use bounds::Aabb;
pub use collision::{check_collisions, find_collision};
pub use input::{ControlInput, HeldKeys, SprintKey};
pub use player::Player;
pub use race::Race;
pub use racer::{FrameOutcome, Racer, RacerBody, RacerId, Stance};
pub use ranking::{RankEntry, Standing, rank_of, rank_racers};
pub use state::{
    CountdownDisplay, RaceEvent, RaceEventHandler, RacePhase, RaceSnapshot, RaceSummary,
    RacerSnapshot,
};
pub use track::{Hurdle, HurdleRegistry, Track, lane_centers};
