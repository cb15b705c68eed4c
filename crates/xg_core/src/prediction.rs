//! # Prediction Re-attachment
//!
//! Joins probabilities from an external classifier back to the kicks they
//! were computed for. Model fitting happens elsewhere; this module only
//! consumes a fitted model through [`XgModel`].

use crate::assembler::FeatureRow;
use crate::error::{FeatureError, Result};
use crate::models::Team;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A fitted scoring model: probability that the kick is a scored goal.
pub trait XgModel {
    fn predict_proba(&self, row: &FeatureRow) -> f64;
}

/// Logistic model over named feature columns.
///
/// Columns absent from a row, or with a non-finite value, contribute
/// nothing to the linear term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub intercept: f64,
    pub weights: BTreeMap<String, f64>,
}

impl LogisticModel {
    pub fn from_json_str(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl XgModel for LogisticModel {
    fn predict_proba(&self, row: &FeatureRow) -> f64 {
        let z = self.weights.iter().fold(self.intercept, |acc, (name, w)| {
            match row.get(name).map(|v| v.as_f64()) {
                Some(v) if v.is_finite() => acc + w * v,
                _ => acc,
            }
        });
        1.0 / (1.0 + (-z).exp())
    }
}

/// Predicted scoring probability for one kick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KickXg {
    pub kick_index: usize,
    pub xg: f64,
}

/// Scores every row and returns predictions in kick order.
///
/// A probability outside `[0, 1]` (or NaN) means the model is broken and
/// fails the whole match.
pub fn attach_predictions<M: XgModel + ?Sized>(model: &M, rows: &[FeatureRow]) -> Result<Vec<KickXg>> {
    let mut predictions = rows
        .iter()
        .map(|row| {
            let xg = model.predict_proba(row);
            if (0.0..=1.0).contains(&xg) {
                Ok(KickXg { kick_index: row.kick_index, xg })
            } else {
                Err(FeatureError::PreconditionViolation(format!(
                    "model returned {} for kick {} of match {}",
                    xg, row.kick_index, row.match_id
                )))
            }
        })
        .collect::<Result<Vec<_>>>()?;
    predictions.sort_by_key(|p| p.kick_index);
    Ok(predictions)
}

/// Expected against actual goals for one team.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TeamXg {
    pub kicks: u32,
    pub expected_goals: f64,
    pub scored_goals: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchXgSummary {
    pub match_id: String,
    pub red: TeamXg,
    pub blue: TeamXg,
}

impl MatchXgSummary {
    pub fn for_team(&self, team: Team) -> &TeamXg {
        match team {
            Team::Red => &self.red,
            Team::Blue => &self.blue,
        }
    }
}

/// Aggregates per-kick predictions by the kicking team.
///
/// Every row needs a prediction with the same `kick_index`.
pub fn match_xg_summary(rows: &[FeatureRow], predictions: &[KickXg]) -> Result<MatchXgSummary> {
    let by_kick: HashMap<usize, f64> = predictions.iter().map(|p| (p.kick_index, p.xg)).collect();
    let mut summary = MatchXgSummary {
        match_id: rows.first().map(|r| r.match_id.clone()).unwrap_or_default(),
        red: TeamXg::default(),
        blue: TeamXg::default(),
    };

    for row in rows {
        let xg = by_kick.get(&row.kick_index).copied().ok_or_else(|| {
            FeatureError::PreconditionViolation(format!(
                "no prediction for kick {} of match {}",
                row.kick_index, row.match_id
            ))
        })?;
        let team = match row.team {
            Team::Red => &mut summary.red,
            Team::Blue => &mut summary.blue,
        };
        team.kicks += 1;
        team.expected_goals += xg;
        team.scored_goals += u32::from(row.label);
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::{FeatureSet, FeatureValue};

    fn row(kick_index: usize, team: Team, label: u8, distance: f64) -> FeatureRow {
        let mut features = BTreeMap::new();
        features.insert("goal_distance".to_string(), FeatureValue::Number(distance));
        features.insert("closest_defender".to_string(), FeatureValue::Number(f64::INFINITY));
        FeatureRow {
            match_id: "m1".into(),
            kick_index,
            label,
            team,
            stadium: "NAFL Official Map v1".into(),
            feature_set: FeatureSet::WithPressure,
            features,
        }
    }

    struct Fixed(f64);

    impl XgModel for Fixed {
        fn predict_proba(&self, _row: &FeatureRow) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_predictions_sorted_by_kick() {
        let rows = vec![row(2, Team::Red, 0, 10.0), row(0, Team::Blue, 1, 10.0)];
        let preds = attach_predictions(&Fixed(0.25), &rows).unwrap();
        assert_eq!(preds.iter().map(|p| p.kick_index).collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_out_of_range_probability_rejected() {
        let rows = vec![row(0, Team::Red, 0, 10.0)];
        assert!(attach_predictions(&Fixed(1.5), &rows).is_err());
        assert!(attach_predictions(&Fixed(f64::NAN), &rows).is_err());
    }

    #[test]
    fn test_logistic_ignores_non_finite_features() {
        let model = LogisticModel::from_json_str(
            r#"{"intercept": 0.0, "weights": {"goal_distance": -0.01, "closest_defender": 0.5}}"#,
        )
        .unwrap();
        let near = model.predict_proba(&row(0, Team::Red, 0, 0.0));
        let far = model.predict_proba(&row(0, Team::Red, 0, 300.0));
        assert!((near - 0.5).abs() < 1e-12, "infinite defender distance must not contribute");
        assert!(far < near, "farther shots should score less often");
    }

    #[test]
    fn test_summary_by_team() {
        let rows = vec![
            row(0, Team::Red, 1, 10.0),
            row(1, Team::Red, 0, 10.0),
            row(2, Team::Blue, 0, 10.0),
        ];
        let preds = attach_predictions(&Fixed(0.25), &rows).unwrap();
        let summary = match_xg_summary(&rows, &preds).unwrap();
        assert_eq!(summary.match_id, "m1");
        assert_eq!(summary.red, TeamXg { kicks: 2, expected_goals: 0.5, scored_goals: 1 });
        assert_eq!(summary.for_team(Team::Blue).kicks, 1);
    }

    #[test]
    fn test_summary_requires_every_prediction() {
        let rows = vec![row(0, Team::Red, 1, 10.0), row(1, Team::Red, 0, 10.0)];
        let preds = vec![KickXg { kick_index: 0, xg: 0.3 }];
        let err = match_xg_summary(&rows, &preds).unwrap_err();
        assert!(matches!(err, FeatureError::PreconditionViolation(_)));
    }
}
