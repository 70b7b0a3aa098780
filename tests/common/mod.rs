#![allow(dead_code)]

use std::collections::HashMap;

use chess::{Color, MoveGen};
use chess_core::GameRecord;
use game_review::position::Position;
use game_review::score::{PovScore, Score};
use game_review::{Analysis, EvalRequest, PositionEvaluator, ReviewConfig, ReviewError};

pub const CONFIG: &str = r#"{
    "engine": {"path": "stockfish", "depth": 10},
    "thresholds": {"inaccuracy": 50, "mistake": 100, "blunder": 300},
    "players": {"min_games": 0, "forced": ["Anna"]}
}"#;

pub fn config() -> ReviewConfig {
    ReviewConfig::from_json_str(CONFIG).unwrap()
}

/// `n` full moves of knights going out and back, never touching a pawn.
pub fn knight_shuffle(n: u32) -> String {
    const CYCLE: [(&str, &str); 4] = [("Nf3", "Nf6"), ("Nc3", "Nc6"), ("Nb1", "Nb8"), ("Ng1", "Ng8")];
    (1..=n)
        .map(|i| {
            let (w, b) = CYCLE[((i - 1) % 4) as usize];
            format!("{i}. {w} {b}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn game_pgn(white: &str, black: &str, result: &str, movetext: &str) -> String {
    format!("[White \"{white}\"]\n[Black \"{black}\"]\n[Result \"{result}\"]\n\n{movetext} {result}\n")
}

/// Answers every position with the move actually played in the game, so no
/// ply is ever an error. Scores come from a closure over (fullmove, side to move).
pub struct Oracle {
    moves: HashMap<String, chess::ChessMove>,
    score: Box<dyn Fn(u32, Color) -> Score>,
}

impl Oracle {
    pub fn new(game: &GameRecord, score: impl Fn(u32, Color) -> Score + 'static) -> Self {
        let mut position = match &game.start_fen {
            Some(fen) => Position::from_fen(fen).unwrap(),
            None => Position::default(),
        };
        let mut moves = HashMap::new();
        for node in &game.moves {
            moves.insert(position.fen(), node.chess_move);
            position = position.play(node.chess_move);
        }
        Self {
            moves,
            score: Box::new(score),
        }
    }
}

impl PositionEvaluator for Oracle {
    async fn analyse(&mut self, request: &EvalRequest) -> Result<Analysis, ReviewError> {
        let position = request.position;
        let best = request
            .root_moves
            .first()
            .copied()
            .or_else(|| self.moves.get(&position.fen()).copied())
            .ok_or_else(|| ReviewError::Evaluator(format!("unknown position {}", position.fen())))?;
        let turn = position.turn();
        Ok(Analysis {
            pv: vec![best],
            score: PovScore::new((self.score)(position.fullmove, turn), turn),
        })
    }
}

/// Level evaluation everywhere: first legal move, 0.00.
pub struct Flat;

impl PositionEvaluator for Flat {
    async fn analyse(&mut self, request: &EvalRequest) -> Result<Analysis, ReviewError> {
        let position = request.position;
        let best = request
            .root_moves
            .first()
            .copied()
            .or_else(|| MoveGen::new_legal(&position.board).next());
        Ok(Analysis {
            pv: best.into_iter().collect(),
            score: PovScore::new(Score::Cp(0), position.turn()),
        })
    }
}
