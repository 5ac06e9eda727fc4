//! Finish order and ranks
//!
//! Finishers sort by time; racers without a time (DNF) come after all of
//! them in their input order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::racer::{Racer, RacerId};

/// Ranking input for one racer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankEntry {
    pub racer: RacerId,
    /// Racer reports having crossed the line
    pub finished: bool,
    pub finish_time: Option<f32>,
}

impl RankEntry {
    pub fn from_racer<R: Racer + ?Sized>(racer: &R) -> Self {
        Self {
            racer: racer.id(),
            finished: racer.is_finished(),
            finish_time: racer.finish_time(),
        }
    }
}

/// One row of the final standings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub racer: RacerId,
    /// 1-based
    pub rank: usize,
    /// None for DNF
    pub finish_time: Option<f32>,
}

fn by_finish_time(a: &Option<f32>, b: &Option<f32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Rank racers by finish time.
///
/// A racer flagged finished but missing its time is credited with `clock`.
pub fn rank_racers(entries: &[RankEntry], clock: f32) -> Vec<Standing> {
    let mut rows: Vec<(RacerId, Option<f32>)> = entries
        .iter()
        .map(|e| {
            let time = match e.finish_time {
                None if e.finished => {
                    log::warn!("{:?} finished without a time; using clock {clock:.2}", e.racer);
                    Some(clock)
                }
                t => t,
            };
            (e.racer, time)
        })
        .collect();

    // Stable sort keeps DNF (and exact ties) in input order
    rows.sort_by(|a, b| by_finish_time(&a.1, &b.1));

    rows.into_iter()
        .enumerate()
        .map(|(i, (racer, finish_time))| Standing {
            racer,
            rank: i + 1,
            finish_time,
        })
        .collect()
}

/// Rank of one racer in the standings
pub fn rank_of(standings: &[Standing], racer: RacerId) -> Option<usize> {
    standings.iter().find(|s| s.racer == racer).map(|s| s.rank)
}
