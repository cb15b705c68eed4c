//! JSON entry point for embedding hosts.

use crate::assembler::{FeatureAssembler, FeatureRow, FeatureSet};
use crate::config::FeatureConfig;
use crate::models::{Match, Stadium};
use crate::SCHEMA_VERSION;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractRequest {
    pub schema_version: u8,
    pub match_id: String,
    #[serde(default = "default_feature_set")]
    pub feature_set: FeatureSet,
    #[serde(default)]
    pub config: Option<FeatureConfig>,
    pub stadium: Stadium,
    #[serde(rename = "match")]
    pub game: Match,
}

fn default_feature_set() -> FeatureSet {
    FeatureSet::Full
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractResponse {
    pub schema_version: u8,
    pub match_id: String,
    pub columns: Vec<&'static str>,
    pub rows: Vec<FeatureRow>,
}

/// Feature rows for one match, JSON in and JSON out.
pub fn extract_features_json(request_json: &str) -> Result<String, String> {
    let request: ExtractRequest =
        serde_json::from_str(request_json).map_err(|e| format!("Invalid JSON request: {}", e))?;

    if request.schema_version != SCHEMA_VERSION {
        return Err(format!("Unsupported schema version: {}", request.schema_version));
    }

    let config = request.config.unwrap_or_else(FeatureConfig::from_env_or_default);
    let assembler = FeatureAssembler::new(request.feature_set, config).map_err(|e| e.to_string())?;
    let rows = assembler
        .assemble(&request.match_id, &request.game, &request.stadium)
        .map_err(|e| e.to_string())?;

    let response = ExtractResponse {
        schema_version: SCHEMA_VERSION,
        match_id: request.match_id,
        columns: request.feature_set.columns(),
        rows,
    };
    serde_json::to_string(&response).map_err(|e| format!("Failed to serialize response: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(schema_version: u8) -> String {
        json!({
            "schema_version": schema_version,
            "match_id": "abc",
            "feature_set": "basic",
            "stadium": {
                "name": "Futsal x3 by Bazinga from HaxMaps",
                "bounds": {"min_x": -420.0, "min_y": -200.0, "max_x": 420.0, "max_y": 200.0},
                "goals": {
                    "red": {"posts": [{"x": -370.0, "y": -64.0}, {"x": -370.0, "y": 64.0}], "mid": {"x": -370.0, "y": 0.0}},
                    "blue": {"posts": [{"x": 370.0, "y": -64.0}, {"x": 370.0, "y": 64.0}], "mid": {"x": 370.0, "y": 0.0}}
                }
            },
            "match": {
                "stadium": "Futsal x3 by Bazinga from HaxMaps",
                "kicks": [
                    {"time": 1.0, "type": "goal", "from_id": 1, "from_team": "red", "from": {"x": 270.0, "y": 0.0}}
                ]
            }
        })
        .to_string()
    }

    #[test]
    fn test_extract_features_json() {
        let out = extract_features_json(&request(1)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["schema_version"], 1);
        assert_eq!(parsed["columns"].as_array().unwrap().len(), 7);
        assert_eq!(parsed["rows"][0]["label"], 1);
        assert_eq!(parsed["rows"][0]["features"]["goal_distance"], 100.0);
    }

    #[test]
    fn test_schema_version_checked() {
        let err = extract_features_json(&request(9)).unwrap_err();
        assert!(err.contains("schema version"), "unexpected error: {}", err);
    }

    #[test]
    fn test_invalid_json() {
        assert!(extract_features_json("{").is_err());
    }
}
