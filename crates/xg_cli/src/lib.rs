//! xG Batch Library
//!
//! Match/stadium JSON → feature rows (CSV or JSON)
//! Match JSON → per-match metadata and train/test split
//!
//! The engine stays single-threaded; batches fan out one match per rayon task.

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use xg_core::models::is_target_stadium;
use xg_core::{
    attach_predictions, match_xg_summary, FeatureAssembler, FeatureConfig, FeatureRow, FeatureSet,
    KickXg, Match, MatchMetadata, MatchXgSummary, StadiumCatalog, XgModel,
};

/// A recorded match and the id derived from its file name.
#[derive(Debug, Clone)]
pub struct LoadedMatch {
    pub match_id: String,
    pub game: Match,
}

/// Loads every `*.json` match in `dir`, sorted by file name.
///
/// Files that fail to parse or validate are logged and skipped.
pub fn load_matches(dir: &Path) -> Result<Vec<LoadedMatch>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read match directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut matches = Vec::with_capacity(paths.len());
    for path in paths {
        match load_match(&path) {
            Ok(m) => matches.push(m),
            Err(e) => warn!(path = %path.display(), error = %format!("{:#}", e), "skipping unreadable match"),
        }
    }
    info!(count = matches.len(), dir = %dir.display(), "loaded matches");
    Ok(matches)
}

pub fn load_match(path: &Path) -> Result<LoadedMatch> {
    let match_id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("Match file has no usable name: {}", path.display()))?
        .to_string();
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read match file: {}", path.display()))?;
    let game: Match = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse match: {}", path.display()))?;
    Ok(LoadedMatch { match_id, game })
}

pub fn load_stadiums(path: &Path) -> Result<StadiumCatalog> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read stadium file: {}", path.display()))?;
    let catalog = StadiumCatalog::from_json_str(&json)
        .with_context(|| format!("Failed to parse stadiums: {}", path.display()))?;
    info!(count = catalog.len(), "loaded stadiums");
    Ok(catalog)
}

/// YAML config when a path is given, else the `XG_FEATURE_PROFILE` preset.
pub fn load_config(path: Option<&Path>) -> Result<FeatureConfig> {
    let Some(path) = path else {
        return Ok(FeatureConfig::from_env_or_default());
    };
    let yaml = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = FeatureConfig::from_yaml_str(&yaml)
        .with_context(|| format!("Invalid feature config: {}", path.display()))?;
    Ok(config)
}

/// Which matches take part in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StadiumFilter {
    /// Only the stadiums the models are trained for
    Target,
    All,
}

impl StadiumFilter {
    fn admits(self, stadium: &str) -> bool {
        match self {
            StadiumFilter::Target => is_target_stadium(stadium),
            StadiumFilter::All => true,
        }
    }
}

/// Matches left out of a batch and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skipped {
    pub match_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct FeatureBatch {
    pub rows: Vec<FeatureRow>,
    pub skipped: Vec<Skipped>,
}

/// Assembles rows for every admitted match, in input order.
///
/// A match whose stadium is unknown or whose data violates a precondition
/// is skipped with a warning; the rest of the batch still completes.
pub fn extract_batch(
    matches: &[LoadedMatch],
    catalog: &StadiumCatalog,
    assembler: &FeatureAssembler,
    filter: StadiumFilter,
) -> FeatureBatch {
    let results: Vec<(usize, std::result::Result<Vec<FeatureRow>, String>)> = matches
        .par_iter()
        .enumerate()
        .filter(|(_, m)| filter.admits(m.game.stadium()))
        .map(|(i, m)| {
            let rows = catalog
                .get(m.game.stadium())
                .and_then(|stadium| assembler.assemble(&m.match_id, &m.game, stadium))
                .map_err(|e| e.to_string());
            (i, rows)
        })
        .collect();

    let mut batch = FeatureBatch::default();
    for (i, result) in results {
        match result {
            Ok(rows) => batch.rows.extend(rows),
            Err(reason) => {
                let match_id = matches[i].match_id.clone();
                warn!(match_id = %match_id, reason = %reason, "skipping match");
                batch.skipped.push(Skipped { match_id, reason });
            }
        }
    }
    debug!(rows = batch.rows.len(), skipped = batch.skipped.len(), "feature batch complete");
    batch
}

/// CSV with identity columns, label, then the feature set's columns.
pub fn write_rows_csv<W: Write>(writer: W, set: FeatureSet, rows: &[FeatureRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["match_id", "kick_index", "label", "team", "stadium"];
    header.extend(set.columns());
    wtr.write_record(&header)?;

    for row in rows {
        let mut record = vec![
            row.match_id.clone(),
            row.kick_index.to_string(),
            row.label.to_string(),
            row.team.to_string(),
            row.stadium.clone(),
        ];
        for col in set.columns() {
            record.push(row.get(col).map(|v| v.to_string()).unwrap_or_default());
        }
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_rows_json<W: Write>(mut writer: W, rows: &[FeatureRow]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, rows).context("Failed to serialize feature rows")?;
    writer.flush().context("Failed to flush feature rows")?;
    Ok(())
}

pub fn build_metadata(matches: &[LoadedMatch], filter: StadiumFilter) -> Vec<MatchMetadata> {
    matches
        .iter()
        .filter(|m| filter.admits(m.game.stadium()))
        .map(|m| MatchMetadata::from_match(&m.match_id, &m.game))
        .collect()
}

pub fn write_metadata_csv<W: Write>(writer: W, metadata: &[MatchMetadata]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for meta in metadata {
        wtr.serialize(meta)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_metadata_csv(path: &Path) -> Result<Vec<MatchMetadata>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open metadata file: {}", path.display()))?;
    let mut metadata = Vec::new();
    for record in rdr.deserialize() {
        let meta: MatchMetadata =
            record.with_context(|| format!("Malformed metadata row in {}", path.display()))?;
        metadata.push(meta);
    }
    Ok(metadata)
}

/// Predictions for one match, joinable to its kicks by `kick_index`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchPredictions {
    pub match_id: String,
    pub predictions: Vec<KickXg>,
    pub summary: MatchXgSummary,
}

pub fn write_predictions_json<W: Write>(mut writer: W, scored: &[MatchPredictions]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, scored).context("Failed to serialize predictions")?;
    writer.flush().context("Failed to flush predictions")?;
    Ok(())
}

/// Scores every admitted match with `model`. Failed matches are skipped.
pub fn predict_batch<M: XgModel + Sync>(
    matches: &[LoadedMatch],
    catalog: &StadiumCatalog,
    assembler: &FeatureAssembler,
    model: &M,
    filter: StadiumFilter,
) -> Vec<MatchPredictions> {
    matches
        .par_iter()
        .filter(|m| filter.admits(m.game.stadium()))
        .filter_map(|m| {
            let scored = catalog
                .get(m.game.stadium())
                .and_then(|stadium| assembler.assemble(&m.match_id, &m.game, stadium))
                .and_then(|rows| {
                    let predictions = attach_predictions(model, &rows)?;
                    let summary = match_xg_summary(&rows, &predictions)?;
                    Ok(MatchPredictions { match_id: m.match_id.clone(), predictions, summary })
                });
            match scored {
                Ok(p) => Some(p),
                Err(e) => {
                    warn!(match_id = %m.match_id, reason = %e, "skipping match");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use xg_core::models::{Bounds, GoalGeometry, GoalPair, MatchParts, Point, Stadium};
    use xg_core::{Kick, KickType, Team};

    const FUTSAL: &str = "Futsal x3 by Bazinga from HaxMaps";

    fn futsal() -> Stadium {
        let goal = |x: f64| GoalGeometry {
            posts: [Point::new(x, -64.0), Point::new(x, 64.0)],
            mid: Point::new(x, 0.0),
        };
        Stadium {
            name: FUTSAL.into(),
            bounds: Bounds { min_x: -420.0, min_y: -200.0, max_x: 420.0, max_y: 200.0 },
            goals: Some(GoalPair { red: goal(-370.0), blue: goal(370.0) }),
            ball_radius: 10.0,
        }
    }

    fn loaded(id: &str, stadium: &str) -> LoadedMatch {
        let kick = Kick {
            time: 1.0,
            kind: KickType::Goal,
            from_id: 1,
            from_team: Team::Red,
            from: Point::new(270.0, 0.0),
            to_id: None,
            to: None,
        };
        let game = Match::new(MatchParts { stadium: stadium.into(), kicks: vec![kick], ..MatchParts::default() })
            .unwrap();
        LoadedMatch { match_id: id.into(), game }
    }

    #[test]
    fn test_extract_batch_skips_unknown_stadium() {
        let catalog = StadiumCatalog::new(vec![futsal()]);
        let assembler = FeatureAssembler::new(FeatureSet::Basic, FeatureConfig::default()).unwrap();
        let matches = vec![loaded("a", FUTSAL), loaded("b", "Big"), loaded("c", FUTSAL)];

        let batch = extract_batch(&matches, &catalog, &assembler, StadiumFilter::All);
        assert_eq!(batch.rows.len(), 2);
        assert_eq!(batch.rows[0].match_id, "a");
        assert_eq!(batch.rows[1].match_id, "c");
        assert_eq!(batch.skipped.len(), 1);
        assert_eq!(batch.skipped[0].match_id, "b");
    }

    #[test]
    fn test_target_filter_drops_other_stadiums() {
        let catalog = StadiumCatalog::new(vec![futsal()]);
        let assembler = FeatureAssembler::new(FeatureSet::Basic, FeatureConfig::default()).unwrap();
        let matches = vec![loaded("a", FUTSAL), loaded("b", "Big")];

        let batch = extract_batch(&matches, &catalog, &assembler, StadiumFilter::Target);
        assert_eq!(batch.rows.len(), 1);
        assert!(batch.skipped.is_empty(), "filtered matches are not failures");
    }

    #[test]
    fn test_csv_header_and_values() {
        let catalog = StadiumCatalog::new(vec![futsal()]);
        let assembler = FeatureAssembler::new(FeatureSet::Basic, FeatureConfig::default()).unwrap();
        let batch = extract_batch(&[loaded("a", FUTSAL)], &catalog, &assembler, StadiumFilter::All);

        let mut out = Vec::new();
        write_rows_csv(&mut out, FeatureSet::Basic, &batch.rows).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "match_id,kick_index,label,team,stadium,time,x,y,goal_x,goal_y,goal_distance,goal_angle"
        );
        let first = lines.next().unwrap();
        assert!(first.starts_with("a,0,1,red,"), "unexpected row: {}", first);
        assert!(first.contains(",100,"), "goal distance should be 100: {}", first);
    }

    fn sentinel_rows() -> Vec<FeatureRow> {
        let catalog = StadiumCatalog::new(vec![futsal()]);
        let assembler = FeatureAssembler::new(FeatureSet::WithPressure, FeatureConfig::default()).unwrap();
        // No positions at all, so no defender is ever sampled.
        extract_batch(&[loaded("a", FUTSAL)], &catalog, &assembler, StadiumFilter::All).rows
    }

    #[test]
    fn test_csv_writes_infinite_sentinel_as_inf() {
        let mut out = Vec::new();
        write_rows_csv(&mut out, FeatureSet::WithPressure, &sentinel_rows()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert!(row.ends_with(",inf,0"), "closest defender should be inf: {}", row);
    }

    #[test]
    fn test_json_rows_read_back_with_sentinel() {
        let rows = sentinel_rows();
        let mut out = Vec::new();
        write_rows_json(&mut out, &rows).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(r#""closest_defender": null"#), "json was {}", text);

        let back: Vec<FeatureRow> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn test_json_writer_flushes_buffered_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");
        let writer = std::io::BufWriter::new(fs::File::create(&path).unwrap());
        write_rows_json(writer, &sentinel_rows()).unwrap();
        let back: Vec<FeatureRow> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.len(), 1);
    }

    #[test]
    fn test_metadata_csv_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta.csv");
        let metadata = build_metadata(&[loaded("a", FUTSAL), loaded("b", "Big")], StadiumFilter::Target);
        assert_eq!(metadata.len(), 1);

        write_metadata_csv(fs::File::create(&path).unwrap(), &metadata).unwrap();
        let back = read_metadata_csv(&path).unwrap();
        assert_eq!(back, metadata);
    }

    #[test]
    fn test_load_matches_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        let good = loaded("good", FUTSAL);
        fs::write(dir.path().join("good.json"), serde_json::to_string(&good.game).unwrap()).unwrap();
        fs::write(dir.path().join("bad.json"), "{ not json").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let matches = load_matches(dir.path()).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_id, "good");
    }

    #[test]
    fn test_load_config_defaults_without_path() {
        std::env::remove_var("XG_FEATURE_PROFILE");
        assert_eq!(load_config(None).unwrap(), FeatureConfig::default());
    }
}
