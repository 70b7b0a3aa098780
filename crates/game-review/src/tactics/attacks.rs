/// Attack-based detectors: hanging pieces, forks, trapped pieces,
/// sacrifices, removing the defender

use chess::{Board, ChessMove, MoveGen, Piece, EMPTY};

use crate::board_utils::{attackers, attacks, is_attacked_by, is_capture, is_en_passant, piece_map, piece_value};

/// The move captures a piece nobody defends.
pub fn missed_hanging_piece(board: &Board, mv: ChessMove) -> bool {
    if !is_capture(board, mv) || is_en_passant(board, mv) {
        return false;
    }
    let victim_color = !board.side_to_move();
    !is_attacked_by(board, victim_color, mv.get_dest())
}

/// The moved piece lands on an attacked square the mover does not defend.
pub fn moved_into_danger(board: &Board, mv: ChessMove) -> bool {
    let mover = board.side_to_move();
    let after = board.make_move_new(mv);
    let dest = mv.get_dest();

    is_attacked_by(&after, !mover, dest) && !is_attacked_by(&after, mover, dest)
}

/// Fork: the moved piece hits two or more worthwhile targets
pub fn fork(board: &Board, mv: ChessMove) -> bool {
    let after = board.make_move_new(mv);
    let dest = mv.get_dest();
    let attacker = match after.piece_on(dest) {
        Some(Piece::King) | None => return false,
        Some(p) => p,
    };
    let opponent = after.side_to_move();

    let mut targets = 0;
    for sq in attacks(&after, dest) & *after.color_combined(opponent) {
        let Some(piece) = after.piece_on(sq) else {
            continue;
        };
        if piece == Piece::Pawn {
            continue;
        }
        let valuable = piece_value(piece) > piece_value(attacker);
        let hanging = !is_attacked_by(&after, opponent, sq);
        if valuable || hanging || piece == Piece::King {
            targets += 1;
        }
    }
    targets >= 2
}

/// Some attacked enemy piece has no safe square left
pub fn trapped_piece(board: &Board, mv: ChessMove) -> bool {
    let after = board.make_move_new(mv);
    let opponent = after.side_to_move();
    let mover = !opponent;

    for (sq, piece, color) in piece_map(&after) {
        if color != opponent || matches!(piece, Piece::Pawn | Piece::King) {
            continue;
        }
        if !is_attacked_by(&after, mover, sq) {
            continue;
        }

        let has_safe_escape = MoveGen::new_legal(&after)
            .filter(|m| m.get_source() == sq)
            .any(|m| {
                let escaped = after.make_move_new(m);
                !is_attacked_by(&escaped, mover, m.get_dest())
            });

        if !has_safe_escape {
            return true;
        }
    }
    false
}

/// Material is offered: the piece can be taken by something cheaper,
/// or a capture trades a bigger piece for a smaller one on a guarded square
pub fn sacrifice(board: &Board, mv: ChessMove) -> bool {
    let Some(piece) = board.piece_on(mv.get_source()) else {
        return false;
    };
    let mover = board.side_to_move();
    let my_value = piece_value(piece);
    let dest = mv.get_dest();

    let after = board.make_move_new(mv);
    let takers = attackers(&after, !mover, dest);
    if takers == EMPTY {
        return false;
    }

    let cheapest = takers
        .into_iter()
        .filter_map(|sq| after.piece_on(sq))
        .map(piece_value)
        .min()
        .unwrap_or(piece_value(Piece::King));

    if cheapest < my_value {
        return true;
    }
    if cheapest <= my_value && !is_attacked_by(&after, mover, dest) {
        return true;
    }

    if let Some(victim) = board.piece_on(dest) {
        if is_capture(board, mv) && my_value > piece_value(victim) {
            return true;
        }
    }
    false
}

/// Capturing a piece that was guarding something now left loose
pub fn removing_the_defender(board: &Board, mv: ChessMove) -> bool {
    if !is_capture(board, mv) {
        return false;
    }
    let victim_sq = mv.get_dest();
    let (Some(_), Some(victim_color)) = (board.piece_on(victim_sq), board.color_on(victim_sq)) else {
        return false;
    };

    let guarded = attacks(board, victim_sq) & *board.color_combined(victim_color);
    let after = board.make_move_new(mv);
    let mover = !victim_color;

    for sq in guarded {
        let Some(defended) = board.piece_on(sq) else {
            continue;
        };
        let attacked_now = is_attacked_by(&after, mover, sq);
        if !attacked_now {
            continue;
        }
        let defended_now = is_attacked_by(&after, victim_color, sq);
        if !defended_now || piece_value(defended) >= piece_value(Piece::Knight) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::Square;
    use std::str::FromStr;

    fn board(fen: &str) -> Board {
        Board::from_str(fen).unwrap()
    }

    #[test]
    fn test_fork_knight_on_rook_and_bishop() {
        let b = board("7k/2r5/5b2/8/1N6/8/8/7K w - - 0 1");
        assert!(fork(&b, ChessMove::new(Square::B4, Square::D5, None)));

        let single = board("7k/2r5/8/8/1N6/8/8/7K w - - 0 1");
        assert!(!fork(&single, ChessMove::new(Square::B4, Square::D5, None)));
    }

    #[test]
    fn test_missed_hanging_piece() {
        let loose = board("k7/8/8/4n3/8/8/8/4R1K1 w - - 0 1");
        assert!(missed_hanging_piece(&loose, ChessMove::new(Square::E1, Square::E5, None)));

        let guarded = board("k7/8/3p4/4n3/8/8/8/4R1K1 w - - 0 1");
        assert!(!missed_hanging_piece(&guarded, ChessMove::new(Square::E1, Square::E5, None)));
    }

    #[test]
    fn test_moved_into_danger() {
        let b = board("4k3/8/4p3/8/8/2N5/8/4K3 w - - 0 1");
        assert!(moved_into_danger(&b, ChessMove::new(Square::C3, Square::D5, None)));
        assert!(!moved_into_danger(&b, ChessMove::new(Square::C3, Square::E4, None)));
    }

    #[test]
    fn test_trapped_bishop() {
        let b = board("6k1/8/8/8/8/8/bPP5/R5K1 w - - 0 1");
        assert!(trapped_piece(&b, ChessMove::new(Square::B2, Square::B3, None)));
        assert!(!trapped_piece(&b, ChessMove::new(Square::G1, Square::H1, None)));
    }

    #[test]
    fn test_sacrifice() {
        let b = board("4k3/8/4p3/8/8/8/8/3QK3 w - - 0 1");
        assert!(sacrifice(&b, ChessMove::new(Square::D1, Square::D5, None)));
        assert!(!sacrifice(&b, ChessMove::new(Square::D1, Square::D2, None)));
    }

    #[test]
    fn test_removing_the_defender() {
        let b = board("7k/8/2n5/1B2b3/8/8/8/4R1K1 w - - 0 1");
        assert!(removing_the_defender(&b, ChessMove::new(Square::B5, Square::C6, None)));
        assert!(!removing_the_defender(&b, ChessMove::new(Square::B5, Square::A4, None)));
    }
}
