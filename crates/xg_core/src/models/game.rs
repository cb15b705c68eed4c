//! Recorded match data.
//!
//! A [`Match`] is produced once by the upstream deserializer and read by the
//! feature engine without mutation. Construction validates the ordering
//! invariants every frame lookup relies on.

use super::kick::Kick;
use super::point::Point;
use super::team::Team;
use crate::error::{FeatureError, Result};
use serde::{Deserialize, Serialize};

/// Participant identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub team: Team,
}

/// Final (or running) score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub red: u32,
    pub blue: u32,
}

impl Score {
    pub fn for_team(&self, team: Team) -> u32 {
        match team {
            Team::Red => self.red,
            Team::Blue => self.blue,
        }
    }
}

/// A goal record, including the score after it was scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub time: f64,
    pub team: Team,
    pub score: Score,
    pub ball: Point,
    pub scorer_id: u32,
    pub scorer: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assist_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assist: Option<Point>,
}

/// Interval during which one player controlled the ball.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Possession {
    pub start: f64,
    pub end: f64,
    pub player_id: u32,
    pub team: Team,
}

impl Possession {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// What a position sample tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entity {
    Ball,
    Player { player_id: u32, team: Team },
}

/// A timestamped location of the ball or of one player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    pub time: f64,
    pub x: f64,
    pub y: f64,
    #[serde(flatten)]
    pub entity: Entity,
}

impl PositionSample {
    pub fn ball(time: f64, x: f64, y: f64) -> Self {
        Self { time, x, y, entity: Entity::Ball }
    }

    pub fn player(time: f64, x: f64, y: f64, player_id: u32, team: Team) -> Self {
        Self { time, x, y, entity: Entity::Player { player_id, team } }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_ball(&self) -> bool {
        matches!(self.entity, Entity::Ball)
    }

    pub fn player_id(&self) -> Option<u32> {
        match self.entity {
            Entity::Player { player_id, .. } => Some(player_id),
            Entity::Ball => None,
        }
    }

    pub fn team(&self) -> Option<Team> {
        match self.entity {
            Entity::Player { team, .. } => Some(team),
            Entity::Ball => None,
        }
    }

    /// Player sample belonging to the side opposing `team`.
    pub fn is_opponent_of(&self, team: Team) -> bool {
        self.team().is_some_and(|t| t != team)
    }
}

/// Serialized shape of a match, before invariant checks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchParts {
    pub stadium: String,
    #[serde(default)]
    pub score: Score,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub kicks: Vec<Kick>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub possessions: Vec<Possession>,
    #[serde(default)]
    pub positions: Vec<PositionSample>,
}

/// Immutable recorded match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MatchParts", into = "MatchParts")]
pub struct Match {
    stadium: String,
    score: Score,
    players: Vec<Player>,
    kicks: Vec<Kick>,
    goals: Vec<Goal>,
    possessions: Vec<Possession>,
    positions: Vec<PositionSample>,
}

impl Match {
    /// Validates ordering invariants and freezes the record.
    ///
    /// Positions must be sorted ascending by time, and every kick must fall
    /// within `[0, duration]`.
    pub fn new(parts: MatchParts) -> Result<Self> {
        if let Some(i) = parts.positions.windows(2).position(|w| w[1].time < w[0].time) {
            return Err(FeatureError::PreconditionViolation(format!(
                "positions not sorted: sample {} at t={} precedes sample {} at t={}",
                i + 1,
                parts.positions[i + 1].time,
                i,
                parts.positions[i].time
            )));
        }

        let duration = parts.positions.last().map(|p| p.time);
        for (i, kick) in parts.kicks.iter().enumerate() {
            let out_of_range = kick.time < 0.0 || duration.is_some_and(|d| kick.time > d);
            if out_of_range || kick.time.is_nan() {
                return Err(FeatureError::PreconditionViolation(format!(
                    "kick {} at t={} outside match duration {:?}",
                    i, kick.time, duration
                )));
            }
        }

        Ok(Self {
            stadium: parts.stadium,
            score: parts.score,
            players: parts.players,
            kicks: parts.kicks,
            goals: parts.goals,
            possessions: parts.possessions,
            positions: parts.positions,
        })
    }

    pub fn stadium(&self) -> &str {
        &self.stadium
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn kicks(&self) -> &[Kick] {
        &self.kicks
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn possessions(&self) -> &[Possession] {
        &self.possessions
    }

    pub fn positions(&self) -> &[PositionSample] {
        &self.positions
    }

    /// Time of the last recorded sample (or last kick when untracked).
    pub fn duration(&self) -> f64 {
        self.positions
            .last()
            .map(|p| p.time)
            .or_else(|| self.kicks.iter().map(|k| k.time).reduce(f64::max))
            .unwrap_or(0.0)
    }

    pub fn player(&self, id: u32) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }
}

impl TryFrom<MatchParts> for Match {
    type Error = FeatureError;

    fn try_from(parts: MatchParts) -> Result<Self> {
        Match::new(parts)
    }
}

impl From<Match> for MatchParts {
    fn from(m: Match) -> Self {
        MatchParts {
            stadium: m.stadium,
            score: m.score,
            players: m.players,
            kicks: m.kicks,
            goals: m.goals,
            possessions: m.possessions,
            positions: m.positions,
        }
    }
}
