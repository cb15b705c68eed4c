//! Defender pressure around the kicker.

use crate::error::Result;
use crate::geometry::distance;
use crate::goal::opposing_goal;
use crate::models::{Kick, Match, PositionSample, Stadium};
use crate::position_index::frame_at;
use tracing::trace;

/// Defenders this close to the kicker or to the goal midpoint weigh 1.5.
pub const CLOSE_PRESSURE_DISTANCE: f64 = 5.0;
const CLOSE_PRESSURE_WEIGHT: f64 = 1.5;

/// Closest opponent and how many stand within the pressuring radius.
///
/// `closest` is `f64::INFINITY` when no opponent was sampled: it means "no
/// defender present", not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pressure {
    pub closest: f64,
    pub count: u32,
}

impl Pressure {
    pub const NONE: Pressure = Pressure { closest: f64::INFINITY, count: 0 };
}

/// Like [`Pressure`], with close-range defenders weighted more heavily.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedPressure {
    pub closest: f64,
    pub weighted: f64,
}

/// Pressure on the kicker in the frame at the kick's timestamp.
pub fn closest_defender_and_pressure_count(m: &Match, kick: &Kick, radius: f64) -> Pressure {
    let frame = frame_at(m.positions(), kick.time);
    let mut pressure = Pressure::NONE;

    for defender in opponents(frame, kick) {
        let d = distance(kick.from.x, kick.from.y, defender.x, defender.y);
        if d < pressure.closest {
            pressure.closest = d;
        }
        if d <= radius {
            pressure.count += 1;
        }
    }

    if pressure.closest.is_infinite() {
        trace!(time = kick.time, "no opposing player sampled at kick frame");
    }
    pressure
}

/// Pressure over a caller-chosen sample set, weighting defenders that are
/// within [`CLOSE_PRESSURE_DISTANCE`] of the kicker or of the goal midpoint.
pub fn weighted_pressure_count(
    kick: &Kick,
    stadium: &Stadium,
    positions: &[PositionSample],
    radius: f64,
) -> Result<WeightedPressure> {
    let goal_mid = opposing_goal(stadium, kick.from_team)?.mid;
    let mut closest = f64::INFINITY;
    let mut weighted = 0.0;

    for defender in opponents(positions, kick) {
        let d = distance(kick.from.x, kick.from.y, defender.x, defender.y);
        closest = closest.min(d);
        if d <= radius {
            let goal_d = distance(goal_mid.x, goal_mid.y, defender.x, defender.y);
            weighted += if d <= CLOSE_PRESSURE_DISTANCE || goal_d <= CLOSE_PRESSURE_DISTANCE {
                CLOSE_PRESSURE_WEIGHT
            } else {
                1.0
            };
        }
    }

    Ok(WeightedPressure { closest, weighted })
}

fn opponents<'a>(
    samples: &'a [PositionSample],
    kick: &'a Kick,
) -> impl Iterator<Item = &'a PositionSample> + 'a {
    samples.iter().filter(move |s| s.is_opponent_of(kick.from_team))
}
