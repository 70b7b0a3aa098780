//! Review configuration from a JSON file plus environment overrides

use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::classifier::Thresholds;
use crate::error::ReviewError;
use crate::players::PlayerSelection;

#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Path to the UCI engine binary
    pub path: String,
    pub threads: u32,
    pub hash_mb: u32,
    /// Search depth per position
    pub depth: u32,
}

#[derive(Clone, Debug)]
pub struct ReviewConfig {
    pub engine: EngineConfig,

    /// Centipawn lower bounds of the severity buckets
    pub thresholds: Thresholds,

    /// Losses below this are never annotated
    pub min_reported_loss: i32,

    /// Missed mates are only looked for up to this many moves
    pub mate_depth_trigger: i32,

    /// Finite centipawn value standing in for a forced mate
    pub mate_score: i32,

    /// Advantage (cp, mover POV) that should have been converted to a win
    pub decisive_advantage: i32,

    pub players: PlayerSelection,

    pub input_folder: PathBuf,
    pub output_folder: PathBuf,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawEngine {
    path: Option<String>,
    threads: Option<u32>,
    hash_mb: Option<u32>,
    depth: Option<u32>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawThresholds {
    inaccuracy: Option<i32>,
    mistake: Option<i32>,
    blunder: Option<i32>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawPlayers {
    min_games: Option<usize>,
    forced: Vec<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawConfig {
    engine: RawEngine,
    thresholds: RawThresholds,
    min_reported_loss: Option<i32>,
    mate_depth_trigger: Option<i32>,
    mate_score: Option<i32>,
    decisive_advantage: Option<i32>,
    players: RawPlayers,
    input_folder: Option<PathBuf>,
    output_folder: Option<PathBuf>,
}

impl ReviewConfig {
    /// Load configuration from a JSON file.
    /// `STOCKFISH_PATH` in the environment (or `.env`) overrides `engine.path`.
    pub fn load(path: &Path) -> Result<Self, ReviewError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ReviewError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let mut raw: RawConfig = serde_json::from_str(&text)?;

        if let Ok(engine_path) = env::var("STOCKFISH_PATH") {
            info!(engine_path = %engine_path, "Engine path taken from STOCKFISH_PATH");
            raw.engine.path = Some(engine_path);
        }

        Self::validate(raw)
    }

    /// Parse configuration from JSON text without consulting the environment.
    pub fn from_json_str(text: &str) -> Result<Self, ReviewError> {
        Self::validate(serde_json::from_str(text)?)
    }

    fn validate(raw: RawConfig) -> Result<Self, ReviewError> {
        let path = raw
            .engine
            .path
            .filter(|p| !p.trim().is_empty())
            .ok_or(ReviewError::MissingField("engine.path"))?;

        let thresholds = Thresholds {
            inaccuracy: raw
                .thresholds
                .inaccuracy
                .ok_or(ReviewError::MissingField("thresholds.inaccuracy"))?,
            mistake: raw
                .thresholds
                .mistake
                .ok_or(ReviewError::MissingField("thresholds.mistake"))?,
            blunder: raw
                .thresholds
                .blunder
                .ok_or(ReviewError::MissingField("thresholds.blunder"))?,
        };
        if thresholds.inaccuracy <= 0
            || thresholds.inaccuracy > thresholds.mistake
            || thresholds.mistake > thresholds.blunder
        {
            return Err(ReviewError::Config(format!(
                "thresholds must satisfy 0 < inaccuracy <= mistake <= blunder, got {}/{}/{}",
                thresholds.inaccuracy, thresholds.mistake, thresholds.blunder
            )));
        }

        let depth = raw.engine.depth.unwrap_or(14);
        if depth == 0 {
            return Err(ReviewError::Config("engine.depth must be positive".into()));
        }

        Ok(Self {
            engine: EngineConfig {
                path,
                threads: raw.engine.threads.unwrap_or(1),
                hash_mb: raw.engine.hash_mb.unwrap_or(16),
                depth,
            },
            min_reported_loss: raw.min_reported_loss.unwrap_or(thresholds.inaccuracy),
            thresholds,
            mate_depth_trigger: raw.mate_depth_trigger.unwrap_or(3),
            mate_score: raw.mate_score.unwrap_or(10_000),
            decisive_advantage: raw.decisive_advantage.unwrap_or(1_000),
            players: PlayerSelection {
                min_games: raw.players.min_games.unwrap_or(6),
                forced: raw.players.forced,
            },
            input_folder: raw.input_folder.unwrap_or_else(|| PathBuf::from("pgn")),
            output_folder: raw
                .output_folder
                .unwrap_or_else(|| PathBuf::from("pgn_analyzed")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let config = ReviewConfig::from_json_str(
            r#"{"engine": {"path": "/usr/bin/stockfish"},
                "thresholds": {"inaccuracy": 50, "mistake": 100, "blunder": 300}}"#,
        )
        .unwrap();
        assert_eq!(config.engine.depth, 14);
        assert_eq!(config.engine.threads, 1);
        assert_eq!(config.min_reported_loss, 50);
        assert_eq!(config.mate_depth_trigger, 3);
        assert_eq!(config.mate_score, 10_000);
        assert_eq!(config.decisive_advantage, 1_000);
        assert_eq!(config.players.min_games, 6);
        assert_eq!(config.input_folder, PathBuf::from("pgn"));
        assert_eq!(config.output_folder, PathBuf::from("pgn_analyzed"));
    }

    #[test]
    fn test_missing_threshold_is_named() {
        let err = ReviewConfig::from_json_str(
            r#"{"engine": {"path": "sf"}, "thresholds": {"inaccuracy": 50, "blunder": 300}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ReviewError::MissingField("thresholds.mistake")));
    }

    #[test]
    fn test_missing_engine_path() {
        let err = ReviewConfig::from_json_str(
            r#"{"thresholds": {"inaccuracy": 50, "mistake": 100, "blunder": 300}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ReviewError::MissingField("engine.path")));
    }

    #[test]
    fn test_unordered_thresholds_rejected() {
        let err = ReviewConfig::from_json_str(
            r#"{"engine": {"path": "sf"},
                "thresholds": {"inaccuracy": 200, "mistake": 100, "blunder": 300}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ReviewError::Config(_)));
    }
}
