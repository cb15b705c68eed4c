//! # Match Metadata
//!
//! Per-match summaries and the goal-balanced train/test split.

use crate::geometry::ZERO;
use crate::models::{Match, Score, Team};
use serde::{Deserialize, Serialize};

/// Summary of one recorded match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchMetadata {
    pub match_id: String,
    pub stadium: String,
    /// Time of the last kick
    pub time: f64,
    pub kicks_red: u32,
    pub kicks_blue: u32,
    pub score_red: u32,
    pub score_blue: u32,
    /// Goals and errors credited to red (own goals excluded)
    pub scored_goals_red: u32,
    pub scored_goals_blue: u32,
}

impl MatchMetadata {
    pub fn from_match(match_id: &str, m: &Match) -> Self {
        let Score { red, blue } = m.score();
        let mut meta = Self {
            match_id: match_id.to_string(),
            stadium: m.stadium().to_string(),
            time: 0.0,
            kicks_red: 0,
            kicks_blue: 0,
            score_red: red,
            score_blue: blue,
            scored_goals_red: 0,
            scored_goals_blue: 0,
        };

        for kick in m.kicks() {
            meta.time = meta.time.max(kick.time);
            let scored = u32::from(kick.is_scored_goal());
            match kick.from_team {
                Team::Red => {
                    meta.kicks_red += 1;
                    meta.scored_goals_red += scored;
                }
                Team::Blue => {
                    meta.kicks_blue += 1;
                    meta.scored_goals_blue += scored;
                }
            }
        }
        meta
    }

    pub fn total_scored_goals(&self) -> u32 {
        self.scored_goals_red + self.scored_goals_blue
    }

    pub fn total_kicks(&self) -> u32 {
        self.kicks_red + self.kicks_blue
    }

    /// Match clock at the last kick.
    pub fn clock(&self) -> String {
        to_clock(self.time)
    }
}

/// Goals per kick. Never divides by zero.
pub fn goal_fraction(goals: u32, kicks: u32) -> f64 {
    f64::from(goals) / (f64::from(kicks) + ZERO)
}

/// Splits matches into two halves with similar goal counts.
///
/// Records are stably sorted by total scored goals, then dealt alternately:
/// even positions to train, odd positions to test.
pub fn train_test_split_even_count(
    metadata: &[MatchMetadata],
) -> (Vec<MatchMetadata>, Vec<MatchMetadata>) {
    let mut sorted = metadata.to_vec();
    sorted.sort_by_key(MatchMetadata::total_scored_goals);

    let mut train = Vec::with_capacity(sorted.len().div_ceil(2));
    let mut test = Vec::with_capacity(sorted.len() / 2);
    for (i, record) in sorted.into_iter().enumerate() {
        if i % 2 == 0 {
            train.push(record);
        } else {
            test.push(record);
        }
    }
    (train, test)
}

/// Totals over one side of a split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitSummary {
    pub matches: usize,
    pub goals: u32,
    pub kicks: u32,
    /// Baseline expected goals per kick
    pub goal_fraction: f64,
}

impl SplitSummary {
    pub fn of(metadata: &[MatchMetadata]) -> Self {
        let goals = metadata.iter().map(MatchMetadata::total_scored_goals).sum();
        let kicks = metadata.iter().map(MatchMetadata::total_kicks).sum();
        Self { matches: metadata.len(), goals, kicks, goal_fraction: goal_fraction(goals, kicks) }
    }
}

/// `m:ss` rendering of a match time in seconds.
pub fn to_clock(seconds: f64) -> String {
    let whole = seconds.max(0.0).floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}
