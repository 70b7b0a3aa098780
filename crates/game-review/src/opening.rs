//! Opening principles: center pawn, castling and minor piece development
//! over the first 15 moves.

use std::fmt;

use chess::{Board, ChessMove, Color, Piece, Square};

use crate::board_utils::is_castling_move;

/// Full-move number at which the opening is judged
pub const OPENING_CHECKPOINT: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DevelopingPiece {
    QueensideKnight,
    KingsideKnight,
    QueensideBishop,
    KingsideBishop,
}

impl DevelopingPiece {
    pub const ALL: [DevelopingPiece; 4] = [
        DevelopingPiece::QueensideKnight,
        DevelopingPiece::KingsideKnight,
        DevelopingPiece::QueensideBishop,
        DevelopingPiece::KingsideBishop,
    ];

    pub fn kind(self) -> Piece {
        match self {
            DevelopingPiece::QueensideKnight | DevelopingPiece::KingsideKnight => Piece::Knight,
            DevelopingPiece::QueensideBishop | DevelopingPiece::KingsideBishop => Piece::Bishop,
        }
    }

    pub fn home_square(self, color: Color) -> Square {
        match (self, color) {
            (DevelopingPiece::QueensideKnight, Color::White) => Square::B1,
            (DevelopingPiece::KingsideKnight, Color::White) => Square::G1,
            (DevelopingPiece::QueensideBishop, Color::White) => Square::C1,
            (DevelopingPiece::KingsideBishop, Color::White) => Square::F1,
            (DevelopingPiece::QueensideKnight, Color::Black) => Square::B8,
            (DevelopingPiece::KingsideKnight, Color::Black) => Square::G8,
            (DevelopingPiece::QueensideBishop, Color::Black) => Square::C8,
            (DevelopingPiece::KingsideBishop, Color::Black) => Square::F8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpeningViolation {
    NoCenterPawn,
    NotCastled,
    Undeveloped { piece: DevelopingPiece, home: Square },
}

impl OpeningViolation {
    /// Bucket used for season statistics
    pub fn category(&self) -> &'static str {
        match self {
            OpeningViolation::NoCenterPawn => "No center pawn",
            OpeningViolation::NotCastled => "Not castled",
            OpeningViolation::Undeveloped { .. } => "Undeveloped pieces",
        }
    }
}

impl fmt::Display for OpeningViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpeningViolation::NoCenterPawn => write!(f, "no center pawn"),
            OpeningViolation::NotCastled => write!(f, "not castled"),
            OpeningViolation::Undeveloped { piece, home } => {
                let name = match piece.kind() {
                    Piece::Knight => "knight",
                    _ => "bishop",
                };
                write!(f, "undeveloped {name} ({home})")
            }
        }
    }
}

/// Per-color opening bookkeeping for one game.
#[derive(Debug, Clone)]
pub struct OpeningTracker {
    pub color: Color,
    pub center_pawn: bool,
    pub castled: bool,
    vacated: Vec<DevelopingPiece>,
    resolved: bool,
}

impl OpeningTracker {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            center_pawn: false,
            castled: false,
            vacated: Vec::new(),
            resolved: false,
        }
    }

    fn center_targets(&self) -> [Square; 2] {
        match self.color {
            Color::White => [Square::E4, Square::D4],
            Color::Black => [Square::E5, Square::D5],
        }
    }

    /// Record a move made by this tracker's color from `board`.
    pub fn record_move(&mut self, board: &Board, mv: ChessMove) {
        if board.piece_on(mv.get_source()) == Some(Piece::Pawn)
            && self.center_targets().contains(&mv.get_dest())
        {
            self.center_pawn = true;
        }
        if is_castling_move(board, mv) {
            self.castled = true;
        }
        for piece in DevelopingPiece::ALL {
            if piece.home_square(self.color) == mv.get_source() && !self.vacated.contains(&piece) {
                self.vacated.push(piece);
            }
        }
    }

    pub fn is_developed(&self, piece: DevelopingPiece) -> bool {
        self.vacated.contains(&piece)
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Run the opening check once, on the checkpoint move. Later calls return `None`.
    pub fn resolve_if_due(&mut self, fullmove: u32) -> Option<Vec<OpeningViolation>> {
        if self.resolved || fullmove != OPENING_CHECKPOINT {
            return None;
        }
        self.resolved = true;
        check_opening_principles(self)
    }
}

/// `None` when every principle was met, else the list of violations.
pub fn check_opening_principles(tracker: &OpeningTracker) -> Option<Vec<OpeningViolation>> {
    let mut violations = Vec::new();

    if !tracker.center_pawn {
        violations.push(OpeningViolation::NoCenterPawn);
    }
    if !tracker.castled {
        violations.push(OpeningViolation::NotCastled);
    }
    for piece in DevelopingPiece::ALL {
        if !tracker.is_developed(piece) {
            violations.push(OpeningViolation::Undeveloped {
                piece,
                home: piece.home_square(tracker.color),
            });
        }
    }

    if violations.is_empty() {
        None
    } else {
        Some(violations)
    }
}

/// Comment text for a list of violations
pub fn opening_comment(violations: &[OpeningViolation]) -> String {
    let parts: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
    format!("Opening: {}", parts.join(", "))
}
