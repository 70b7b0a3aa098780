//! Review error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing configuration field: {0}")]
    MissingField(&'static str),

    #[error("Evaluator unavailable: {0}")]
    EvaluatorUnavailable(String),

    #[error("Evaluator error: {0}")]
    Evaluator(String),

    #[error("Malformed game: {0}")]
    MalformedGame(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("PGN error: {0}")]
    Pgn(#[from] chess_core::PgnError),
}
