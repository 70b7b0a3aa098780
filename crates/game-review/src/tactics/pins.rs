/// Pin detector

use chess::{BitBoard, Board, ChessMove, EMPTY};

use crate::board_utils::{attackers, attacks, pin_mask, BB_ALL};

/// Pin: the moved piece attacks a piece pinned to its king, or stands on a
/// square whose only would-be captors are pinned off it.
pub fn pin(board: &Board, mv: ChessMove) -> bool {
    let after = board.make_move_new(mv);
    let opponent = after.side_to_move();
    let dest = mv.get_dest();

    for sq in attacks(&after, dest) & *after.color_combined(opponent) {
        if pin_mask(&after, opponent, sq) != BB_ALL {
            return true;
        }
    }

    let dest_bb = BitBoard::from_square(dest);
    let captors = attackers(&after, opponent, dest);
    captors != EMPTY
        && captors.into_iter().all(|sq| {
            let mask = pin_mask(&after, opponent, sq);
            mask != BB_ALL && mask & dest_bb == EMPTY
        })
}
