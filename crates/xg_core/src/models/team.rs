use crate::error::{FeatureError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two sides of a match.
///
/// Accepts the wire tags `red`/`blue` as well as the numeric team ids `1`/`2`
/// used by the recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "TeamTag", into = "String")]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    pub fn parse(tag: &str) -> Result<Self> {
        match tag.trim().to_lowercase().as_str() {
            "red" | "1" => Ok(Team::Red),
            "blue" | "2" => Ok(Team::Blue),
            _ => Err(FeatureError::InvalidTeam(tag.to_string())),
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Team::Red => "red",
            Team::Blue => "blue",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Team {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self> {
        Team::parse(s)
    }
}

impl From<Team> for String {
    fn from(team: Team) -> Self {
        team.as_str().to_string()
    }
}

/// Raw team tag as it appears in recorded data.
#[derive(Deserialize)]
#[serde(untagged)]
enum TeamTag {
    Id(u8),
    Name(String),
}

impl TryFrom<TeamTag> for Team {
    type Error = FeatureError;

    fn try_from(tag: TeamTag) -> Result<Self> {
        match tag {
            TeamTag::Id(id) => Team::parse(&id.to_string()),
            TeamTag::Name(name) => Team::parse(&name),
        }
    }
}
