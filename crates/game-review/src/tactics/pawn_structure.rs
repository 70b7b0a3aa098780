/// Pawn structure and file detectors, comparing the position before and after

use chess::{Board, ChessMove, Color, Piece};

use crate::board_utils::{file_has_pawn, pawns_per_file};

/// A pawn move left two or more pawns on a file that had fewer.
pub fn doubled_pawn_created(before: &Board, after: &Board, mv: ChessMove) -> bool {
    if before.piece_on(mv.get_source()) != Some(Piece::Pawn) {
        return false;
    }
    let color = before.side_to_move();
    let was = pawns_per_file(before, color);
    let now = pawns_per_file(after, color);

    (0..8).any(|f| now[f] >= 2 && was[f] < 2)
}

fn isolated_count(board: &Board, color: Color) -> u32 {
    let counts = pawns_per_file(board, color);
    (0..8)
        .filter(|&f| counts[f] > 0)
        .filter(|&f| {
            let left = f > 0 && counts[f - 1] > 0;
            let right = f < 7 && counts[f + 1] > 0;
            !left && !right
        })
        .map(|f| counts[f] as u32)
        .sum()
}

/// The mover has more isolated pawns than before.
pub fn isolated_pawn_created(before: &Board, after: &Board) -> bool {
    let color = before.side_to_move();
    isolated_count(after, color) > isolated_count(before, color)
}

/// The best move took a rook or queen to (or along) an open file and the
/// played move went to another file.
pub fn missed_open_file(board: &Board, best: ChessMove, played: ChessMove) -> bool {
    if !matches!(board.piece_on(best.get_source()), Some(Piece::Rook | Piece::Queen)) {
        return false;
    }
    let best_file = best.get_dest().get_file();
    if played.get_dest().get_file() == best_file {
        return false;
    }
    !file_has_pawn(board, best_file)
}
