/// Board queries shared by the motif detectors
/// (attacks, attackers, pins, move flags on top of the `chess` crate)

use chess::{BitBoard, Board, ChessMove, Color, File, Piece, Rank, Square, EMPTY};

pub const PAWN_VALUE: i32 = 1;
pub const KNIGHT_VALUE: i32 = 3;
pub const BISHOP_VALUE: i32 = 3;
pub const ROOK_VALUE: i32 = 5;
pub const QUEEN_VALUE: i32 = 9;
/// The king outranks everything so it always counts as the more valuable target
pub const KING_VALUE: i32 = 100;

pub const BB_ALL: BitBoard = BitBoard(0xFFFF_FFFF_FFFF_FFFF);

pub fn piece_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => PAWN_VALUE,
        Piece::Knight => KNIGHT_VALUE,
        Piece::Bishop => BISHOP_VALUE,
        Piece::Rook => ROOK_VALUE,
        Piece::Queen => QUEEN_VALUE,
        Piece::King => KING_VALUE,
    }
}

/// Is this a ray (sliding) piece type?
pub fn is_ray_piece(piece: Piece) -> bool {
    matches!(piece, Piece::Queen | Piece::Rook | Piece::Bishop)
}

/// Squares a piece attacks given an explicit occupancy (for x-ray queries).
pub fn attacks_with_occupancy(piece: Piece, color: Color, square: Square, occupied: BitBoard) -> BitBoard {
    match piece {
        Piece::Pawn => pawn_attacks(square, color),
        Piece::Knight => chess::get_knight_moves(square),
        Piece::King => chess::get_king_moves(square),
        Piece::Bishop => chess::get_bishop_moves(square, occupied),
        Piece::Rook => chess::get_rook_moves(square, occupied),
        Piece::Queen => {
            chess::get_bishop_moves(square, occupied) | chess::get_rook_moves(square, occupied)
        }
    }
}

/// Squares attacked by the piece on `square`, empty if there is none.
pub fn attacks(board: &Board, square: Square) -> BitBoard {
    match (board.piece_on(square), board.color_on(square)) {
        (Some(piece), Some(color)) => attacks_with_occupancy(piece, color, square, *board.combined()),
        _ => EMPTY,
    }
}

/// Pawn attack squares (just the diagonal attacks, not pushes)
pub fn pawn_attacks(square: Square, color: Color) -> BitBoard {
    let file = square.get_file().to_index();
    let rank = square.get_rank().to_index();

    let target_rank = match color {
        Color::White if rank < 7 => rank + 1,
        Color::Black if rank > 0 => rank - 1,
        _ => return EMPTY,
    };

    let mut result = EMPTY;
    if file > 0 {
        result |= BitBoard::from_square(Square::make_square(
            Rank::from_index(target_rank),
            File::from_index(file - 1),
        ));
    }
    if file < 7 {
        result |= BitBoard::from_square(Square::make_square(
            Rank::from_index(target_rank),
            File::from_index(file + 1),
        ));
    }
    result
}

/// All pieces of `color` that attack `square`
pub fn attackers(board: &Board, color: Color, square: Square) -> BitBoard {
    let occupied = *board.combined();
    let color_pieces = *board.color_combined(color);

    let mut result = EMPTY;

    // Pawns: reverse lookup from the target with the opposite color
    result |= pawn_attacks(square, !color) & *board.pieces(Piece::Pawn) & color_pieces;
    result |= chess::get_knight_moves(square) & *board.pieces(Piece::Knight) & color_pieces;
    result |= chess::get_king_moves(square) & *board.pieces(Piece::King) & color_pieces;

    let diagonal = *board.pieces(Piece::Bishop) | *board.pieces(Piece::Queen);
    result |= chess::get_bishop_moves(square, occupied) & diagonal & color_pieces;

    let orthogonal = *board.pieces(Piece::Rook) | *board.pieces(Piece::Queen);
    result |= chess::get_rook_moves(square, occupied) & orthogonal & color_pieces;

    result
}

pub fn is_attacked_by(board: &Board, color: Color, square: Square) -> bool {
    attackers(board, color, square) != EMPTY
}

pub fn king_square(board: &Board, color: Color) -> Square {
    board.king_square(color)
}

/// Movement mask of a piece pinned to the `color` king, `BB_ALL` if it is free.
pub fn pin_mask(board: &Board, color: Color, square: Square) -> BitBoard {
    let king_sq = king_square(board, color);
    if king_sq == square {
        return BB_ALL;
    }
    let line = chess::line(king_sq, square);
    if line == EMPTY {
        return BB_ALL;
    }

    let dr = king_sq.get_rank().to_index() as i32 - square.get_rank().to_index() as i32;
    let df = king_sq.get_file().to_index() as i32 - square.get_file().to_index() as i32;
    let sliders = if dr.abs() == df.abs() {
        *board.pieces(Piece::Bishop) | *board.pieces(Piece::Queen)
    } else {
        *board.pieces(Piece::Rook) | *board.pieces(Piece::Queen)
    };
    let pinners = sliders & *board.color_combined(!color) & line;
    let occupied = *board.combined();
    let target = BitBoard::from_square(square);

    for pinner_sq in pinners {
        let blockers = chess::between(king_sq, pinner_sq) & occupied;
        if blockers == target {
            return line;
        }
    }

    BB_ALL
}

/// Does `mv` capture something (en passant included)?
pub fn is_capture(board: &Board, mv: ChessMove) -> bool {
    board.color_on(mv.get_dest()) == Some(!board.side_to_move()) || is_en_passant(board, mv)
}

pub fn is_en_passant(board: &Board, mv: ChessMove) -> bool {
    board.piece_on(mv.get_source()) == Some(Piece::Pawn)
        && mv.get_source().get_file() != mv.get_dest().get_file()
        && board.piece_on(mv.get_dest()).is_none()
}

pub fn is_castling_move(board: &Board, m: ChessMove) -> bool {
    if board.piece_on(m.get_source()) == Some(Piece::King) {
        let from_file = m.get_source().get_file().to_index() as i32;
        let to_file = m.get_dest().get_file().to_index() as i32;
        return (from_file - to_file).abs() > 1;
    }
    false
}

/// Piece map: all (square, piece, color) tuples
pub fn piece_map(board: &Board) -> Vec<(Square, Piece, Color)> {
    let mut result = Vec::new();
    for sq in *board.combined() {
        if let (Some(piece), Some(color)) = (board.piece_on(sq), board.color_on(sq)) {
            result.push((sq, piece, color));
        }
    }
    result
}

/// Number of `color` pawns on each file, a..h
pub fn pawns_per_file(board: &Board, color: Color) -> [u8; 8] {
    let mut counts = [0u8; 8];
    for sq in *board.pieces(Piece::Pawn) & *board.color_combined(color) {
        counts[sq.get_file().to_index()] += 1;
    }
    counts
}

pub fn file_has_pawn(board: &Board, file: File) -> bool {
    *board.pieces(Piece::Pawn) & chess::get_file(file) != EMPTY
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_pawn_attacks() {
        let white_atk = pawn_attacks(Square::E4, Color::White);
        assert!((white_atk & BitBoard::from_square(Square::D5)).popcnt() > 0);
        assert!((white_atk & BitBoard::from_square(Square::F5)).popcnt() > 0);
        assert_eq!(white_atk.popcnt(), 2);
        assert_eq!(pawn_attacks(Square::A2, Color::White).popcnt(), 1);
        assert_eq!(pawn_attacks(Square::H1, Color::Black), EMPTY);
    }

    #[test]
    fn test_attackers_reverse_lookup() {
        let board = Board::from_str("rnbqkbnr/pppppppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2").unwrap();
        let white_attackers = attackers(&board, Color::White, Square::E5);
        assert!((white_attackers & BitBoard::from_square(Square::F3)).popcnt() > 0);
        assert!(!is_attacked_by(&board, Color::Black, Square::E4));
    }

    #[test]
    fn test_pin_mask() {
        // Bishop b5 pins the d7 knight to the e8 king
        let board = Board::from_str("4k3/3n4/8/1B6/8/8/8/4K3 b - - 0 1").unwrap();
        let mask = pin_mask(&board, Color::Black, Square::D7);
        assert_ne!(mask, BB_ALL);
        assert!((mask & BitBoard::from_square(Square::C6)).popcnt() > 0);

        let free = Board::from_str("4k3/3n4/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        assert_eq!(pin_mask(&free, Color::Black, Square::D7), BB_ALL);
    }

    #[test]
    fn test_move_flags() {
        let board = Board::from_str("4k3/8/8/3pP3/8/8/8/4K2R w K d6 0 1").unwrap();
        let ep = ChessMove::new(Square::E5, Square::D6, None);
        assert!(is_en_passant(&board, ep));
        assert!(is_capture(&board, ep));

        let castle = ChessMove::new(Square::E1, Square::G1, None);
        assert!(is_castling_move(&board, castle));
        assert!(!is_capture(&board, castle));
    }

    #[test]
    fn test_pawns_per_file() {
        let counts = pawns_per_file(&Board::default(), Color::White);
        assert_eq!(counts, [1; 8]);
        assert!(file_has_pawn(&Board::default(), File::E));
    }
}
