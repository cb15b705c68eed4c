//! xG Feature CLI
//!
//! Recorded matches → feature rows, match metadata, splits and predictions

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use xg_cli::{
    build_metadata, extract_batch, load_config, load_matches, load_stadiums, predict_batch,
    read_metadata_csv, write_metadata_csv, write_predictions_json, write_rows_csv, write_rows_json,
    StadiumFilter,
};
use xg_core::{train_test_split_even_count, FeatureAssembler, FeatureSet, LogisticModel, SplitSummary};

#[derive(Parser)]
#[command(name = "xg_cli")]
#[command(about = "Extract expected-goals features from recorded matches", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Write one feature row per kick
    Features {
        /// Directory of match JSON files
        #[arg(long)]
        matches: PathBuf,

        /// Stadium geometry JSON file
        #[arg(long)]
        stadiums: PathBuf,

        /// Feature config YAML file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Feature set (basic, with-pressure, with-occupancy, with-trajectory, full)
        #[arg(long, default_value = "full")]
        feature_set: String,

        #[arg(long, value_enum, default_value = "csv")]
        format: Format,

        /// Include matches outside the target stadiums
        #[arg(long, default_value = "false")]
        all_stadiums: bool,

        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Write per-match metadata CSV
    Metadata {
        #[arg(long)]
        matches: PathBuf,

        #[arg(long, default_value = "false")]
        all_stadiums: bool,

        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Split a metadata CSV into train and test halves with balanced goals
    Split {
        #[arg(long)]
        metadata: PathBuf,

        #[arg(long)]
        train: PathBuf,

        #[arg(long)]
        test: PathBuf,
    },

    /// Score every kick with a fitted logistic model
    Predict {
        #[arg(long)]
        matches: PathBuf,

        #[arg(long)]
        stadiums: PathBuf,

        /// Model JSON: {"intercept": .., "weights": {column: weight}}
        #[arg(long)]
        model: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, default_value = "full")]
        feature_set: String,

        #[arg(long, default_value = "false")]
        all_stadiums: bool,

        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Features { matches, stadiums, config, feature_set, format, all_stadiums, out } => {
            let assembler = build_assembler(config.as_deref(), &feature_set)?;
            let catalog = load_stadiums(&stadiums)?;
            let loaded = load_matches(&matches)?;

            let batch = extract_batch(&loaded, &catalog, &assembler, filter(all_stadiums));
            info!(
                rows = batch.rows.len(),
                skipped = batch.skipped.len(),
                set = %assembler.feature_set(),
                "extracted features"
            );

            let writer = open_output(out.as_deref())?;
            match format {
                Format::Csv => write_rows_csv(writer, assembler.feature_set(), &batch.rows)?,
                Format::Json => write_rows_json(writer, &batch.rows)?,
            }
        }

        Commands::Metadata { matches, all_stadiums, out } => {
            let loaded = load_matches(&matches)?;
            let metadata = build_metadata(&loaded, filter(all_stadiums));
            let summary = SplitSummary::of(&metadata);
            info!(
                matches = summary.matches,
                goals = summary.goals,
                kicks = summary.kicks,
                "E(xG) {:.3}",
                summary.goal_fraction
            );
            write_metadata_csv(open_output(out.as_deref())?, &metadata)?;
        }

        Commands::Split { metadata, train, test } => {
            let records = read_metadata_csv(&metadata)?;
            let (train_set, test_set) = train_test_split_even_count(&records);
            for (name, split) in [("train", &train_set), ("test", &test_set)] {
                let s = SplitSummary::of(split);
                info!(
                    split = name,
                    matches = s.matches,
                    goals = s.goals,
                    kicks = s.kicks,
                    "E(xG) {:.3}",
                    s.goal_fraction
                );
            }
            write_metadata_csv(open_output(Some(&train))?, &train_set)?;
            write_metadata_csv(open_output(Some(&test))?, &test_set)?;
        }

        Commands::Predict { matches, stadiums, model, config, feature_set, all_stadiums, out } => {
            let assembler = build_assembler(config.as_deref(), &feature_set)?;
            let catalog = load_stadiums(&stadiums)?;
            let model_json = fs::read_to_string(&model)
                .with_context(|| format!("Failed to read model file: {}", model.display()))?;
            let model = LogisticModel::from_json_str(&model_json)
                .with_context(|| format!("Failed to parse model: {}", model.display()))?;
            let loaded = load_matches(&matches)?;

            let scored = predict_batch(&loaded, &catalog, &assembler, &model, filter(all_stadiums));
            info!(matches = scored.len(), "scored matches");
            write_predictions_json(open_output(out.as_deref())?, &scored)?;
        }
    }

    Ok(())
}

fn build_assembler(config: Option<&Path>, feature_set: &str) -> Result<FeatureAssembler> {
    let config = load_config(config)?;
    let set: FeatureSet = feature_set.parse()?;
    Ok(FeatureAssembler::new(set, config)?)
}

fn filter(all_stadiums: bool) -> StadiumFilter {
    if all_stadiums {
        StadiumFilter::All
    } else {
        StadiumFilter::Target
    }
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
            let file = fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Ok(Box::new(io::BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}
