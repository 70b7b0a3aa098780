//! Move-quality review of recorded chess games against a UCI engine:
//! error severity, tactical and strategic motifs, opening principles,
//! advantage conversion, annotated PGN output and per-player reports.

pub use chess;

pub mod board_utils;
pub mod classifier;
pub mod config;
pub mod context;
pub mod conversion;
pub mod error;
pub mod evaluator;
pub mod opening;
pub mod players;
pub mod position;
pub mod report;
pub mod runner;
pub mod score;
pub mod stats;
pub mod stockfish;
pub mod tactics;
pub mod walker;

pub use config::ReviewConfig;
pub use error::ReviewError;
pub use evaluator::{Analysis, EvalRequest, PositionEvaluator};
pub use walker::{analyze_game, GameReview, PlyRecord};
