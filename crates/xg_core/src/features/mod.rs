//! # Feature Module
//!
//! Per-kick spatial and kinematic context.
//!
//! - `pressure` - closest defender and (weighted) pressuring count
//! - `occupancy` - defenders in the shooting lane and shot cone
//! - `kinematics` - ball and player speed
//! - `trajectory` - projected shot line and on-goal test
//!
//! Missing positional data never fails a feature: each one falls back to a
//! sentinel (infinite distance, zero count, zero speed, `false`).

pub mod kinematics;
pub mod occupancy;
pub mod pressure;
pub mod trajectory;

pub use kinematics::{ball_speed, player_speed, speed_of_player};
pub use occupancy::{cone_occupancy, lane_occupancy, Occupancy};
pub use pressure::{
    closest_defender_and_pressure_count, weighted_pressure_count, Pressure, WeightedPressure,
    CLOSE_PRESSURE_DISTANCE,
};
pub use trajectory::{shot_intersection, shot_on_goal, ShotProjection, CONTACT_DISTANCE};
