//! Static stadium geometry.

use super::point::Point;
use crate::error::{FeatureError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stadiums used in competitive play; rows from other maps are not comparable.
pub const TARGET_STADIUMS: &[&str] = &[
    "NAFL Official Map v1",
    "Futsal 3x3 4x4 from HaxMaps",
    "Futsalx3 | TK&ED",
    "Futsal x3 by Bazinga from HaxMaps",
    "FUTHAX 4v4",
    "Happy Futsal 3x3 4x4",
];

pub fn is_target_stadium(name: &str) -> bool {
    TARGET_STADIUMS.contains(&name)
}

/// Axis-aligned playing area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

/// One goal mouth: two posts on the goal line and their midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalGeometry {
    pub posts: [Point; 2],
    pub mid: Point,
}

impl GoalGeometry {
    pub fn post_low_y(&self) -> f64 {
        self.posts[0].y.min(self.posts[1].y)
    }

    pub fn post_high_y(&self) -> f64 {
        self.posts[0].y.max(self.posts[1].y)
    }

    /// Goal line x (posts share it).
    pub fn line_x(&self) -> f64 {
        self.posts[0].x
    }

    pub fn low_post(&self) -> Point {
        if self.posts[0].y <= self.posts[1].y {
            self.posts[0]
        } else {
            self.posts[1]
        }
    }

    pub fn high_post(&self) -> Point {
        if self.posts[0].y <= self.posts[1].y {
            self.posts[1]
        } else {
            self.posts[0]
        }
    }
}

/// Goals keyed by the team that defends them.
///
/// The recorder numbers them `1` (red) and `2` (blue).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalPair {
    #[serde(alias = "1")]
    pub red: GoalGeometry,
    #[serde(alias = "2")]
    pub blue: GoalGeometry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stadium {
    pub name: String,
    pub bounds: Bounds,
    #[serde(default, alias = "goalposts")]
    pub goals: Option<GoalPair>,
    #[serde(default = "default_ball_radius")]
    pub ball_radius: f64,
}

fn default_ball_radius() -> f64 {
    10.0
}

/// Stadium lookup by name.
#[derive(Debug, Clone, Default)]
pub struct StadiumCatalog {
    stadiums: HashMap<String, Stadium>,
}

impl StadiumCatalog {
    pub fn new(stadiums: Vec<Stadium>) -> Self {
        Self { stadiums: stadiums.into_iter().map(|s| (s.name.clone(), s)).collect() }
    }

    pub fn from_json_str(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let stadiums: Vec<Stadium> = serde_json::from_str(json)?;
        Ok(Self::new(stadiums))
    }

    pub fn get(&self, name: &str) -> Result<&Stadium> {
        self.stadiums
            .get(name)
            .ok_or_else(|| FeatureError::invalid_stadium(name, "no stadium data"))
    }

    pub fn len(&self) -> usize {
        self.stadiums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stadiums.is_empty()
    }
}
