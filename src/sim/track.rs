//! Track layout: lanes and the hurdle registry
//!
//! Hurdles are placed once per lane per row during setup and never move.

use serde::{Deserialize, Serialize};

use super::bounds::Aabb;
use crate::consts::*;
use glam::Vec3;

/// A single hurdle, standing on the track surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hurdle {
    /// Lane centre (x)
    pub lane_x: f32,
    /// Row position along the track (z)
    pub z: f32,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Hurdle {
    /// Standard-size hurdle at the given lane and row
    pub fn new(lane_x: f32, z: f32) -> Self {
        Self {
            lane_x,
            z,
            width: HURDLE_WIDTH,
            height: HURDLE_HEIGHT,
            depth: HURDLE_DEPTH,
        }
    }

    /// World-space box (base at y = 0)
    pub fn bounds(&self) -> Aabb {
        let half = Vec3::new(self.width, self.height, self.depth) / 2.0;
        Aabb::from_center_half_extents(Vec3::new(self.lane_x, half.y, self.z), half)
    }

    /// Z of the edge a racer leaves last
    #[inline]
    pub fn trailing_edge(&self) -> f32 {
        self.z - self.depth / 2.0
    }
}

/// All hurdles on the track, plus the distinct row offsets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HurdleRegistry {
    hurdles: Vec<Hurdle>,
    /// Row Z offsets ordered nearest-first (descending z)
    rows: Vec<f32>,
}

impl HurdleRegistry {
    /// Place one hurdle per lane for every row that fits on the track.
    ///
    /// A row is dropped when it would sit behind the start line or past the
    /// finish line.
    pub fn build(lane_xs: &[f32], z_positions: &[f32], track_length: f32) -> Self {
        let mut rows: Vec<f32> = z_positions
            .iter()
            .copied()
            .filter(|&z| z.abs() < track_length - HURDLE_DEPTH / 2.0 && z < -HURDLE_DEPTH / 2.0)
            .collect();
        let outside = z_positions.len() - rows.len();
        if outside > 0 {
            log::warn!("Skipped {outside} hurdle row(s) outside the track");
        }

        rows.sort_by(|a, b| b.total_cmp(a));
        let placed = rows.len();
        rows.dedup();
        if rows.len() < placed {
            log::warn!("Ignored {} duplicate hurdle row(s)", placed - rows.len());
        }

        let hurdles = lane_xs
            .iter()
            .flat_map(|&x| rows.iter().map(move |&z| Hurdle::new(x, z)))
            .collect();

        Self { hurdles, rows }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hurdle> {
        self.hurdles.iter()
    }

    pub fn len(&self) -> usize {
        self.hurdles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hurdles.is_empty()
    }

    /// Row offsets, nearest to the start line first
    pub fn rows(&self) -> &[f32] {
        &self.rows
    }

    /// Hurdle of row `row` standing in the lane centred at `lane_x`
    pub fn row_hurdle(&self, row: usize, lane_x: f32) -> Option<&Hurdle> {
        let z = *self.rows.get(row)?;
        self.hurdles.iter().find(|h| h.z == z && h.lane_x == lane_x)
    }
}

/// Lane centres across a track of the given width
pub fn lane_centers(track_width: f32, lane_width: f32) -> Vec<f32> {
    let lanes = (track_width / lane_width).floor() as usize;
    (0..lanes)
        .map(|i| -track_width / 2.0 + (i as f32 + 0.5) * lane_width)
        .collect()
}

/// Static race course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Distance to the finish line; racers finish at z <= -length
    pub length: f32,
    /// Lane centres, left to right
    pub lanes: Vec<f32>,
    pub hurdles: HurdleRegistry,
}

impl Track {
    pub fn new(length: f32, hurdle_z_positions: &[f32]) -> Self {
        let lanes = lane_centers(TRACK_WIDTH, LANE_WIDTH);
        let hurdles = HurdleRegistry::build(&lanes, hurdle_z_positions, length);
        Self {
            length,
            lanes,
            hurdles,
        }
    }

    /// Index of the human racer's lane (middle of the track)
    #[inline]
    pub fn player_lane_index(&self) -> usize {
        self.lanes.len() / 2
    }

    /// Lane centre for the human racer
    pub fn player_lane(&self) -> f32 {
        self.lanes
            .get(self.player_lane_index())
            .copied()
            .unwrap_or(0.0)
    }

    /// Every lane except the human's, left to right
    pub fn opponent_lanes(&self) -> Vec<f32> {
        let player = self.player_lane_index();
        self.lanes
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != player)
            .map(|(_, &x)| x)
            .collect()
    }
}

impl Default for Track {
    fn default() -> Self {
        Self::new(TRACK_LENGTH, &HURDLE_Z_POSITIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_centers() {
        let lanes = lane_centers(TRACK_WIDTH, LANE_WIDTH);
        assert_eq!(lanes.len(), 7);
        // Lanes start at the left edge; 7 lanes don't fill the full width
        assert!((lanes[0] - (-TRACK_WIDTH / 2.0 + LANE_WIDTH / 2.0)).abs() < 1e-5);
        assert!((lanes[3] - (-0.23)).abs() < 1e-4);
        assert!((lanes[1] - lanes[0] - LANE_WIDTH).abs() < 1e-5);
    }

    #[test]
    fn test_registry_one_hurdle_per_lane_per_row() {
        let track = Track::default();
        assert_eq!(track.hurdles.len(), 7 * 2);
        assert_eq!(track.hurdles.rows(), &[-20.0, -80.0]);
    }

    #[test]
    fn test_rows_ordered_nearest_first() {
        let reg = HurdleRegistry::build(&[0.0], &[-80.0, -20.0, -50.0], TRACK_LENGTH);
        assert_eq!(reg.rows(), &[-20.0, -50.0, -80.0]);
    }

    #[test]
    fn test_rows_outside_track_are_dropped() {
        let reg = HurdleRegistry::build(&[0.0], &[5.0, 0.0, -20.0, -100.0, -150.0], TRACK_LENGTH);
        assert_eq!(reg.rows(), &[-20.0]);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_duplicate_rows_collapse() {
        let reg = HurdleRegistry::build(&[0.0, 1.22], &[-20.0, -80.0, -20.0], TRACK_LENGTH);
        assert_eq!(reg.rows(), &[-20.0, -80.0]);
        assert_eq!(reg.len(), 4);
    }

    #[test]
    fn test_row_hurdle_lookup() {
        let track = Track::default();
        let lane = track.player_lane();
        let h = track.hurdles.row_hurdle(1, lane).unwrap();
        assert_eq!((h.lane_x, h.z), (lane, -80.0));
        assert!(track.hurdles.row_hurdle(2, lane).is_none());
        assert!(track.hurdles.row_hurdle(0, lane + 0.5).is_none());
    }

    #[test]
    fn test_hurdle_bounds() {
        let h = Hurdle::new(1.0, -20.0);
        let b = h.bounds();
        assert!((b.min.x - (1.0 - HURDLE_WIDTH / 2.0)).abs() < 1e-6);
        assert_eq!(b.min.y, 0.0);
        assert_eq!(b.max.y, HURDLE_HEIGHT);
        assert!((b.min.z - h.trailing_edge()).abs() < 1e-6);
    }

    #[test]
    fn test_opponent_lanes_exclude_player() {
        let track = Track::default();
        let lanes = track.opponent_lanes();
        assert_eq!(lanes.len(), track.lanes.len() - 1);
        assert!(!lanes.contains(&track.player_lane()));
    }
}
