//! # Feature Row Assembler
//!
//! Turns every kick of a match into one flat [`FeatureRow`].
//!
//! Feature sets are cumulative generations: each one keeps every column of
//! the previous set unchanged and appends its own, so switching sets never
//! alters the meaning of a column already in use.
//!
//! | Set | Adds |
//! |-----|------|
//! | `basic` | kick/goal position, distance and angle to goal |
//! | `with_pressure` | closest defender, defenders pressuring |
//! | `with_occupancy` | lane and cone occupancy |
//! | `with_trajectory` | ball speed, kicker speed, projected shot on goal |
//! | `full` | proximity-weighted pressure |

use crate::config::FeatureConfig;
use crate::error::{FeatureError, Result};
use crate::features::{
    ball_speed, closest_defender_and_pressure_count, cone_occupancy, lane_occupancy,
    shot_intersection, shot_on_goal, speed_of_player, weighted_pressure_count,
};
use crate::geometry::{angle_from_goal, distance};
use crate::goal::opposing_goal;
use crate::models::{Kick, Match, Stadium, Team};
use crate::position_index::{frame_at, range_select};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

const BASIC_COLUMNS: &[&str] = &["time", "x", "y", "goal_x", "goal_y", "goal_distance", "goal_angle"];
const PRESSURE_COLUMNS: &[&str] = &["closest_defender", "defenders_pressuring"];
const OCCUPANCY_COLUMNS: &[&str] =
    &["defenders_in_lane", "lane_occupied", "defenders_in_cone", "cone_occupied"];
const TRAJECTORY_COLUMNS: &[&str] = &["ball_speed", "player_speed", "shot_on_goal"];
const WEIGHTED_COLUMNS: &[&str] = &["weighted_closest_defender", "weighted_defenders_pressuring"];

/// Named feature-set generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSet {
    Basic,
    WithPressure,
    WithOccupancy,
    WithTrajectory,
    Full,
}

impl FeatureSet {
    pub const ALL: [FeatureSet; 5] = [
        FeatureSet::Basic,
        FeatureSet::WithPressure,
        FeatureSet::WithOccupancy,
        FeatureSet::WithTrajectory,
        FeatureSet::Full,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureSet::Basic => "basic",
            FeatureSet::WithPressure => "with_pressure",
            FeatureSet::WithOccupancy => "with_occupancy",
            FeatureSet::WithTrajectory => "with_trajectory",
            FeatureSet::Full => "full",
        }
    }

    /// Feature columns in output order.
    pub fn columns(self) -> Vec<&'static str> {
        let groups: [(FeatureSet, &[&'static str]); 5] = [
            (FeatureSet::Basic, BASIC_COLUMNS),
            (FeatureSet::WithPressure, PRESSURE_COLUMNS),
            (FeatureSet::WithOccupancy, OCCUPANCY_COLUMNS),
            (FeatureSet::WithTrajectory, TRAJECTORY_COLUMNS),
            (FeatureSet::Full, WEIGHTED_COLUMNS),
        ];
        groups
            .into_iter()
            .filter(|(level, _)| self >= *level)
            .flat_map(|(_, cols)| cols.iter().copied())
            .collect()
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureSet {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        FeatureSet::ALL
            .into_iter()
            .find(|set| set.as_str() == normalized)
            .ok_or_else(|| FeatureError::PreconditionViolation(format!("unknown feature set: {}", s)))
    }
}

/// A single feature value.
///
/// The infinite "no defender" sentinel serializes as JSON `null` and reads
/// back as `Number(f64::INFINITY)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Flag(bool),
    Number(f64),
}

impl<'de> Deserialize<'de> for FeatureValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Number(f64),
            Null(()),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Flag(b) => FeatureValue::Flag(b),
            Raw::Number(v) => FeatureValue::Number(v),
            Raw::Null(()) => FeatureValue::Number(f64::INFINITY),
        })
    }
}

impl FeatureValue {
    /// Numeric view; flags map to 0/1.
    pub fn as_f64(self) -> f64 {
        match self {
            FeatureValue::Number(v) => v,
            FeatureValue::Flag(b) => f64::from(u8::from(b)),
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Number(v) => write!(f, "{}", v),
            FeatureValue::Flag(b) => write!(f, "{}", u8::from(*b)),
        }
    }
}

/// One kick's label and features, joinable back to the kick by
/// `(match_id, kick_index)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub match_id: String,
    pub kick_index: usize,
    /// 1 for a scored goal (goal or error), else 0
    pub label: u8,
    pub team: Team,
    pub stadium: String,
    pub feature_set: FeatureSet,
    pub features: BTreeMap<String, FeatureValue>,
}

impl FeatureRow {
    pub fn get(&self, name: &str) -> Option<FeatureValue> {
        self.features.get(name).copied()
    }

    /// Values in the feature set's column order.
    pub fn values(&self) -> Vec<FeatureValue> {
        self.feature_set
            .columns()
            .into_iter()
            .filter_map(|col| self.features.get(col).copied())
            .collect()
    }
}

/// Builds feature rows for one configured feature set.
#[derive(Debug, Clone)]
pub struct FeatureAssembler {
    set: FeatureSet,
    config: FeatureConfig,
}

impl FeatureAssembler {
    pub fn new(set: FeatureSet, config: FeatureConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { set, config })
    }

    pub fn feature_set(&self) -> FeatureSet {
        self.set
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// One row per kick, in kick order.
    ///
    /// Fails on the first kick whose goal geometry or position windows are
    /// malformed, and then no row of the match is returned: a single kick
    /// with ragged kicker/ball tracks drops the whole match. Missing samples
    /// only degrade individual features.
    pub fn assemble(&self, match_id: &str, m: &Match, stadium: &Stadium) -> Result<Vec<FeatureRow>> {
        let rows = m
            .kicks()
            .iter()
            .enumerate()
            .map(|(index, kick)| self.assemble_kick(match_id, m, stadium, index, kick))
            .collect::<Result<Vec<_>>>()?;

        debug!(match_id, kicks = rows.len(), set = %self.set, "assembled feature rows");
        Ok(rows)
    }

    pub fn assemble_kick(
        &self,
        match_id: &str,
        m: &Match,
        stadium: &Stadium,
        index: usize,
        kick: &Kick,
    ) -> Result<FeatureRow> {
        let mut features = BTreeMap::new();
        let mut put = |name: &str, value: FeatureValue| {
            features.insert(name.to_string(), value);
        };
        let num = FeatureValue::Number;
        let flag = FeatureValue::Flag;

        let goal = opposing_goal(stadium, kick.from_team)?;
        let (x, y) = (kick.from.x, kick.from.y);
        let (gx, gy) = (goal.mid.x, goal.mid.y);
        put("time", num(kick.time));
        put("x", num(x));
        put("y", num(y));
        put("goal_x", num(gx));
        put("goal_y", num(gy));
        put("goal_distance", num(distance(x, y, gx, gy)));
        put("goal_angle", num(angle_from_goal(x, y, gx, gy)));

        if self.set >= FeatureSet::WithPressure {
            let p = closest_defender_and_pressure_count(m, kick, self.config.pressure_radius);
            put("closest_defender", num(p.closest));
            put("defenders_pressuring", num(f64::from(p.count)));
        }

        if self.set >= FeatureSet::WithOccupancy {
            let lane = lane_occupancy(m, stadium, kick)?;
            let cone = cone_occupancy(m, stadium, kick, self.config.cone_time_offset)?;
            put("defenders_in_lane", num(f64::from(lane.count)));
            put("lane_occupied", flag(lane.any));
            put("defenders_in_cone", num(f64::from(cone.count)));
            put("cone_occupied", flag(cone.any));
        }

        if self.set >= FeatureSet::WithTrajectory {
            put("ball_speed", num(ball_speed(m, kick, self.config.ball_speed_time_offset)));

            let speed_window =
                range_select(m.positions(), kick.time - self.config.player_speed_window, kick.time)?;
            put("player_speed", num(speed_of_player(kick.from_id, speed_window)));

            let shot_window =
                range_select(m.positions(), kick.time - self.config.trajectory_window, kick.time)?;
            let on_goal = match shot_intersection(kick, stadium, shot_window)? {
                Some(shot) => shot_on_goal(&shot.intersect, stadium, kick.from_team)?,
                None => 0,
            };
            put("shot_on_goal", num(f64::from(on_goal)));
        }

        if self.set >= FeatureSet::Full {
            let frame = frame_at(m.positions(), kick.time);
            let w = weighted_pressure_count(kick, stadium, frame, self.config.pressure_radius)?;
            put("weighted_closest_defender", num(w.closest));
            put("weighted_defenders_pressuring", num(w.weighted));
        }

        Ok(FeatureRow {
            match_id: match_id.to_string(),
            kick_index: index,
            label: kick.label(),
            team: kick.from_team,
            stadium: m.stadium().to_string(),
            feature_set: self.set,
            features,
        })
    }
}
