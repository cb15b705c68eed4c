//! # Goal Geometry Resolver
//!
//! Goal ownership: each goal belongs to the team that defends it, so a team
//! scores into the goal of the *other* team.

use crate::error::{FeatureError, Result};
use crate::models::{GoalGeometry, Stadium, Team};

/// Goal the given team is trying to score into.
pub fn opposing_goal(stadium: &Stadium, team: Team) -> Result<&GoalGeometry> {
    let goals = stadium
        .goals
        .as_ref()
        .ok_or_else(|| FeatureError::invalid_stadium(&stadium.name, "no goal geometry"))?;
    Ok(match team {
        Team::Red => &goals.blue,
        Team::Blue => &goals.red,
    })
}

/// `1.0` when the team attacks toward increasing x, `-1.0` otherwise.
pub fn attack_direction(stadium: &Stadium, team: Team) -> Result<f64> {
    let target = opposing_goal(stadium, team)?.line_x();
    let own = opposing_goal(stadium, team.opponent())?.line_x();
    Ok(if target >= own { 1.0 } else { -1.0 })
}

/// Same as [`opposing_goal`], for a raw team tag from recorded data.
pub fn opposing_goal_for_tag<'a>(stadium: &'a Stadium, tag: &str) -> Result<&'a GoalGeometry> {
    opposing_goal(stadium, Team::parse(tag)?)
}
