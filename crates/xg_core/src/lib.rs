//! # xg_core - Expected-Goals Feature Extraction
//!
//! Turns recorded HaxBall matches (kicks, per-frame positions, stadium
//! geometry) into one feature row per kick for an external xG classifier,
//! and re-attaches the classifier's probabilities to the kicks.
//!
//! ## Features
//! - Deterministic: same match and config give identical rows
//! - Cumulative feature sets, from distance/angle up to weighted pressure
//! - Frame lookups over sorted position streams without copying
//! - JSON API for embedding hosts

// Doc formatting lints - purely cosmetic, fix incrementally
#![allow(clippy::doc_lazy_continuation)]
// Float comparisons against recorded timestamps are exact by construction
#![allow(clippy::float_cmp)]

pub mod api;
pub mod assembler;
pub mod config;
pub mod error;
pub mod features;
pub mod geometry;
pub mod goal;
pub mod metadata;
pub mod models;
pub mod position_index;
pub mod prediction;

pub use api::{extract_features_json, ExtractRequest, ExtractResponse};
pub use assembler::{FeatureAssembler, FeatureRow, FeatureSet, FeatureValue};
pub use config::FeatureConfig;
pub use error::{FeatureError, Result};
pub use metadata::{goal_fraction, to_clock, train_test_split_even_count, MatchMetadata, SplitSummary};
pub use models::{Kick, KickType, Match, MatchParts, PositionSample, Stadium, StadiumCatalog, Team};
pub use position_index::PositionIndex;
pub use prediction::{
    attach_predictions, match_xg_summary, KickXg, LogisticModel, MatchXgSummary, TeamXg, XgModel,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
