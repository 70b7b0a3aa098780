//! Board snapshot with move counters

use std::str::FromStr;

use chess::{Board, ChessMove, Color, Piece};

use crate::error::ReviewError;

/// A `chess::Board` plus the counters it does not track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub board: Board,
    pub halfmove: u32,
    pub fullmove: u32,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            board: Board::default(),
            halfmove: 0,
            fullmove: 1,
        }
    }
}

impl Position {
    pub fn from_fen(fen: &str) -> Result<Self, ReviewError> {
        let board = Board::from_str(fen)
            .map_err(|e| ReviewError::MalformedGame(format!("bad FEN '{fen}': {e}")))?;
        let parts: Vec<&str> = fen.split_whitespace().collect();
        let halfmove = parts.get(4).and_then(|s| s.parse().ok()).unwrap_or(0);
        let fullmove = parts
            .get(5)
            .and_then(|s| s.parse().ok())
            .filter(|n: &u32| *n > 0)
            .unwrap_or(1);
        Ok(Self {
            board,
            halfmove,
            fullmove,
        })
    }

    pub fn turn(&self) -> Color {
        self.board.side_to_move()
    }

    /// New snapshot after `mv`; `self` is untouched.
    pub fn play(&self, mv: ChessMove) -> Position {
        let resets_clock = self.board.piece_on(mv.get_source()) == Some(Piece::Pawn)
            || self.board.piece_on(mv.get_dest()).is_some();
        Position {
            board: self.board.make_move_new(mv),
            halfmove: if resets_clock { 0 } else { self.halfmove + 1 },
            fullmove: if self.turn() == Color::Black {
                self.fullmove + 1
            } else {
                self.fullmove
            },
        }
    }

    /// FEN with the real counters.
    pub fn fen(&self) -> String {
        let board_fen = self.board.to_string();
        let fields: Vec<&str> = board_fen.split_whitespace().take(4).collect();
        format!("{} {} {}", fields.join(" "), self.halfmove, self.fullmove)
    }
}
