//! Position evaluator seam between the walker and a UCI engine

use chess::ChessMove;

use crate::error::ReviewError;
use crate::position::Position;
use crate::score::PovScore;

/// One search request.
#[derive(Debug, Clone)]
pub struct EvalRequest {
    pub position: Position,
    pub depth: u32,
    /// Restrict the search to these moves (`searchmoves`); empty means all
    pub root_moves: Vec<ChessMove>,
    pub multipv: u32,
}

impl EvalRequest {
    pub fn new(position: Position, depth: u32) -> Self {
        Self {
            position,
            depth,
            root_moves: Vec::new(),
            multipv: 1,
        }
    }

    pub fn restricted_to(mut self, mv: ChessMove) -> Self {
        self.root_moves = vec![mv];
        self
    }
}

/// Result of a search: principal variation and score for the side to move.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub pv: Vec<ChessMove>,
    pub score: PovScore,
}

impl Analysis {
    pub fn best_move(&self) -> Option<ChessMove> {
        self.pv.first().copied()
    }
}

/// Anything that can score a position. One request in flight at a time.
#[allow(async_fn_in_trait)]
pub trait PositionEvaluator {
    async fn analyse(&mut self, request: &EvalRequest) -> Result<Analysis, ReviewError>;

    /// Called before each game so the evaluator can drop stale state
    async fn new_game(&mut self) -> Result<(), ReviewError> {
        Ok(())
    }
}
