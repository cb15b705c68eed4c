//! # Data Model
//!
//! Typed records for recorded matches and stadiums.
//!
//! - `team` - the two sides and tag parsing
//! - `kick` - kick events and label classification
//! - `game` - players, goals, possessions, position samples, `Match`
//! - `stadium` - goal geometry and the stadium catalog

pub mod game;
pub mod kick;
pub mod point;
pub mod stadium;
pub mod team;

pub use game::{Entity, Goal, Match, MatchParts, Player, Possession, PositionSample, Score};
pub use kick::{is_allowed_goal, is_scored_goal, is_shot, Kick, KickType};
pub use point::Point;
pub use stadium::{is_target_stadium, Bounds, GoalGeometry, GoalPair, Stadium, StadiumCatalog};
pub use team::Team;
