//! Stockfish engine wrapper using UCI protocol (async I/O)

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

use chess_core::{format_uci, parse_uci_move};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::ReviewError;
use crate::evaluator::{Analysis, EvalRequest, PositionEvaluator};
use crate::score::{PovScore, Score};

/// Stockfish engine instance
pub struct StockfishEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    multipv: u32,
}

impl StockfishEngine {
    /// Spawn a new Stockfish process and initialize UCI
    pub async fn new(config: &EngineConfig) -> Result<Self, ReviewError> {
        let mut process = Command::new(&config.path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ReviewError::EvaluatorUnavailable(format!("failed to spawn {}: {e}", config.path))
            })?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| ReviewError::EvaluatorUnavailable("engine stdin not piped".into()))?;
        let stdout = process
            .stdout
            .take()
            .map(BufReader::new)
            .ok_or_else(|| ReviewError::EvaluatorUnavailable("engine stdout not piped".into()))?;

        let mut engine = Self {
            process,
            stdin,
            stdout,
            multipv: 1,
        };

        engine.send("uci").await?;
        engine.wait_for("uciok").await?;

        engine
            .send(&format!("setoption name Threads value {}", config.threads))
            .await?;
        engine
            .send(&format!("setoption name Hash value {}", config.hash_mb))
            .await?;
        engine.send("isready").await?;
        engine.wait_for("readyok").await?;

        info!(path = %config.path, threads = config.threads, hash_mb = config.hash_mb, "Engine ready");
        Ok(engine)
    }

    /// Send a command to Stockfish
    async fn send(&mut self, cmd: &str) -> Result<(), ReviewError> {
        debug!(cmd, "SF <");
        self.stdin
            .write_all(format!("{cmd}\n").as_bytes())
            .await
            .map_err(|e| ReviewError::Evaluator(format!("Failed to write to Stockfish: {e}")))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| ReviewError::Evaluator(format!("Failed to flush stdin: {e}")))?;
        Ok(())
    }

    async fn read_line(&mut self, line: &mut String) -> Result<(), ReviewError> {
        line.clear();
        let read = self
            .stdout
            .read_line(line)
            .await
            .map_err(|e| ReviewError::Evaluator(format!("Failed to read from Stockfish: {e}")))?;
        if read == 0 {
            return Err(ReviewError::Evaluator("Stockfish closed its output".into()));
        }
        Ok(())
    }

    /// Wait for a specific response line
    async fn wait_for(&mut self, expected: &str) -> Result<(), ReviewError> {
        let mut line = String::new();
        loop {
            self.read_line(&mut line).await?;
            let trimmed = line.trim();
            debug!(line = trimmed, "SF >");
            if trimmed == expected {
                return Ok(());
            }
        }
    }

    /// Send quit command and wait for process to exit
    pub async fn quit(&mut self) {
        let _ = self.send("quit").await;
        let _ = self.process.wait().await;
    }
}

impl PositionEvaluator for StockfishEngine {
    async fn analyse(&mut self, request: &EvalRequest) -> Result<Analysis, ReviewError> {
        let multipv = request.multipv.max(1);
        if multipv != self.multipv {
            self.send(&format!("setoption name MultiPV value {multipv}")).await?;
            self.multipv = multipv;
        }

        self.send(&format!("position fen {}", request.position.fen())).await?;
        let mut go = format!("go depth {}", request.depth);
        if !request.root_moves.is_empty() {
            go.push_str(" searchmoves");
            for mv in &request.root_moves {
                go.push(' ');
                go.push_str(&format_uci(*mv));
            }
        }
        self.send(&go).await?;

        let mut score = None;
        let mut pv = Vec::new();
        let mut line = String::new();
        loop {
            self.read_line(&mut line).await?;
            let trimmed = line.trim();

            if trimmed.starts_with("info") && trimmed.contains(" pv ") {
                // Only the first line feeds the result
                if parse_multipv_index(trimmed).unwrap_or(1) != 1 {
                    continue;
                }
                if let Some(cp) = parse_cp(trimmed) {
                    score = Some(Score::Cp(cp));
                }
                if let Some(mate) = parse_mate(trimmed) {
                    score = Some(Score::Mate(mate));
                }
                pv = parse_pv(trimmed);
            } else if trimmed.starts_with("bestmove") {
                debug!(line = trimmed, "SF >");
                break;
            }
        }

        let score = score.ok_or_else(|| {
            ReviewError::Evaluator(format!("no score for {}", request.position.fen()))
        })?;
        let pv = pv.iter().map_while(|uci| parse_uci_move(uci)).collect();

        Ok(Analysis {
            pv,
            score: PovScore::new(score, request.position.turn()),
        })
    }

    async fn new_game(&mut self) -> Result<(), ReviewError> {
        self.send("ucinewgame").await?;
        self.send("isready").await?;
        self.wait_for("readyok").await
    }
}

/// Parse centipawn score from info line
fn parse_cp(line: &str) -> Option<i32> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    for (i, part) in parts.iter().enumerate() {
        if *part == "cp" && i + 1 < parts.len() {
            return parts[i + 1].parse().ok();
        }
    }
    None
}

/// Parse mate score from info line
fn parse_mate(line: &str) -> Option<i32> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    for (i, part) in parts.iter().enumerate() {
        if *part == "mate" && i + 1 < parts.len() {
            return parts[i + 1].parse().ok();
        }
    }
    None
}

/// Parse multipv index from info line
fn parse_multipv_index(line: &str) -> Option<u32> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    for (i, part) in parts.iter().enumerate() {
        if *part == "multipv" && i + 1 < parts.len() {
            return parts[i + 1].parse().ok();
        }
    }
    None
}

/// Parse PV moves from info line
fn parse_pv(line: &str) -> Vec<String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let mut in_pv = false;
    let mut moves = Vec::new();

    for part in parts {
        if part == "pv" {
            in_pv = true;
            continue;
        }
        if in_pv {
            // PV ends at next keyword or end of line
            if part.starts_with("bmc") || part == "string" {
                break;
            }
            moves.push(part.to_string());
        }
    }

    moves
}
