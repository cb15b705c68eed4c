//! Kick events and their label classification.

use super::point::Point;
use super::team::Team;
use crate::error::{FeatureError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome tag attached to a kick by the recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum KickType {
    Goal,
    OwnGoal,
    Save,
    /// Shot deflected off a defender into their own goal.
    Error,
    /// Neutral ball contact (pass, dribble touch, clearance).
    Pass,
}

impl KickType {
    pub fn parse(tag: &str) -> Result<Self> {
        match tag.trim().to_lowercase().as_str() {
            "goal" => Ok(KickType::Goal),
            "own_goal" | "owngoal" => Ok(KickType::OwnGoal),
            "save" => Ok(KickType::Save),
            "error" => Ok(KickType::Error),
            "pass" | "kick" | "touch" => Ok(KickType::Pass),
            _ => Err(FeatureError::InvalidKickType(tag.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            KickType::Goal => "goal",
            KickType::OwnGoal => "own_goal",
            KickType::Save => "save",
            KickType::Error => "error",
            KickType::Pass => "pass",
        }
    }
}

impl fmt::Display for KickType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for KickType {
    type Error = FeatureError;

    fn try_from(tag: String) -> Result<Self> {
        KickType::parse(&tag)
    }
}

impl From<KickType> for String {
    fn from(kind: KickType) -> Self {
        kind.as_str().to_string()
    }
}

/// Binary target for offensive xG: goals and errors.
///
/// Errors count because the shot originated from the attacker; plain own
/// goals do not.
pub fn is_scored_goal(kind: KickType) -> bool {
    matches!(kind, KickType::Goal | KickType::Error)
}

/// Shots on goal: anything that scored or forced a save.
pub fn is_shot(kind: KickType) -> bool {
    matches!(kind, KickType::Goal | KickType::Error | KickType::Save)
}

/// Defensive measure: goals conceded, including own goals but not errors
/// (own goals already cover them).
pub fn is_allowed_goal(kind: KickType) -> bool {
    matches!(kind, KickType::Goal | KickType::OwnGoal)
}

/// A ball-contact event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kick {
    pub time: f64,
    #[serde(rename = "type")]
    pub kind: KickType,
    pub from_id: u32,
    pub from_team: Team,
    pub from: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Point>,
}

impl Kick {
    pub fn is_scored_goal(&self) -> bool {
        is_scored_goal(self.kind)
    }

    pub fn is_shot(&self) -> bool {
        is_shot(self.kind)
    }

    pub fn is_allowed_goal(&self) -> bool {
        is_allowed_goal(self.kind)
    }

    /// 1 for a scored goal, 0 otherwise.
    pub fn label(&self) -> u8 {
        u8::from(self.is_scored_goal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_table() {
        let cases = [
            (KickType::Goal, true, true, true),
            (KickType::Error, true, true, false),
            (KickType::Save, false, true, false),
            (KickType::OwnGoal, false, false, true),
            (KickType::Pass, false, false, false),
        ];
        for (kind, scored, shot, allowed) in cases {
            assert_eq!(is_scored_goal(kind), scored, "scored mismatch for {}", kind);
            assert_eq!(is_shot(kind), shot, "shot mismatch for {}", kind);
            assert_eq!(is_allowed_goal(kind), allowed, "allowed mismatch for {}", kind);
        }
    }

    #[test]
    fn test_parse_neutral_aliases() {
        assert_eq!(KickType::parse("kick").unwrap(), KickType::Pass);
        assert_eq!(KickType::parse("touch").unwrap(), KickType::Pass);
        assert_eq!(KickType::parse("own_goal").unwrap(), KickType::OwnGoal);
        assert!(matches!(KickType::parse("header"), Err(FeatureError::InvalidKickType(_))));
    }

    #[test]
    fn test_kick_deserializes_from_typed_json() {
        let kick: Kick = serde_json::from_str(
            r#"{"time": 12.5, "type": "error", "from_id": 3, "from_team": 2,
                "from": {"x": -100.0, "y": 20.0}}"#,
        )
        .unwrap();
        assert_eq!(kick.kind, KickType::Error);
        assert_eq!(kick.from_team, Team::Blue);
        assert_eq!(kick.label(), 1);
        assert!(kick.to.is_none());
    }
}
