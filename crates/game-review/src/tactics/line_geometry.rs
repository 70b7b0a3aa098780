/// Line geometry detectors: skewer, double/discovered check, discovered attack

use chess::{BitBoard, Board, ChessMove, Piece, EMPTY};

use crate::board_utils::{attackers, attacks, attacks_with_occupancy, is_ray_piece, piece_map, piece_value};

/// Skewer: a slider hits a piece and, looking through it, a cheaper one
/// behind it on the same line (or the front piece is the king).
pub fn skewer(board: &Board, mv: ChessMove) -> bool {
    let after = board.make_move_new(mv);
    let dest = mv.get_dest();
    let Some(attacker) = after.piece_on(dest).filter(|p| is_ray_piece(*p)) else {
        return false;
    };
    let opponent = after.side_to_move();
    let enemies = *after.color_combined(opponent);
    let occupied = *after.combined();

    for front_sq in attacks(&after, dest) & enemies {
        let Some(front) = after.piece_on(front_sq) else {
            continue;
        };
        let without_front = occupied & !BitBoard::from_square(front_sq);
        let xray = attacks_with_occupancy(attacker, !opponent, dest, without_front);
        // Only what sits behind the front piece on the same ray
        let front_bb = BitBoard::from_square(front_sq);
        let revealed = xray & enemies & chess::line(dest, front_sq) & !front_bb;

        for back_sq in revealed {
            if chess::between(dest, back_sq) & front_bb == EMPTY {
                continue;
            }
            let Some(back) = after.piece_on(back_sq) else {
                continue;
            };
            if piece_value(front) > piece_value(back) || front == Piece::King {
                return true;
            }
        }
    }
    false
}

pub fn double_check(board: &Board, mv: ChessMove) -> bool {
    board.make_move_new(mv).checkers().popcnt() > 1
}

/// Check given by something other than the moved piece
pub fn discovered_check(board: &Board, mv: ChessMove) -> bool {
    let after = board.make_move_new(mv);
    let checkers = *after.checkers();
    if checkers == EMPTY {
        return false;
    }
    checkers & BitBoard::from_square(mv.get_dest()) == EMPTY || checkers.popcnt() > 1
}

/// Moving away opened a slider's line onto an enemy piece
pub fn discovered_attack(board: &Board, mv: ChessMove) -> bool {
    let after = board.make_move_new(mv);
    let mover = board.side_to_move();
    let from_bb = BitBoard::from_square(mv.get_source());

    for (sq, piece, color) in piece_map(&after) {
        if color == mover || matches!(piece, Piece::King | Piece::Pawn) {
            continue;
        }
        for atk_sq in attackers(&after, mover, sq) {
            if atk_sq == mv.get_dest() {
                continue;
            }
            if !after.piece_on(atk_sq).is_some_and(is_ray_piece) {
                continue;
            }
            if chess::between(atk_sq, sq) & from_bb != EMPTY {
                return true;
            }
        }
    }
    false
}
