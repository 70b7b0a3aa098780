/// Motif detectors for reviewed moves
/// Grouped by what they look at: attacks, pins, lines, pawn structure

pub mod attacks;
pub mod line_geometry;
pub mod pawn_structure;
pub mod pins;

use chess::{Board, ChessMove};

/// A named tactical or strategic pattern attached to a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Motif {
    MovedIntoDanger,
    Fork,
    Pin,
    Skewer,
    DoubleCheck,
    DiscoveredCheck,
    DiscoveredAttack,
    MissedHangingPiece,
    TrappedPiece,
    Sacrifice,
    RemovingTheDefender,
    DoubledPawnCreated,
    IsolatedPawnCreated,
    MissedOpenFile,
    /// Fallback when an error matches no pattern
    Other,
}

impl Motif {
    pub fn label(self) -> &'static str {
        match self {
            Motif::MovedIntoDanger => "Moved into danger",
            Motif::Fork => "Fork",
            Motif::Pin => "Pin",
            Motif::Skewer => "Skewer",
            Motif::DoubleCheck => "Double check",
            Motif::DiscoveredCheck => "Discovered check",
            Motif::DiscoveredAttack => "Discovered attack",
            Motif::MissedHangingPiece => "Missed hanging piece",
            Motif::TrappedPiece => "Trapped piece",
            Motif::Sacrifice => "Sacrifice",
            Motif::RemovingTheDefender => "Removing the defender",
            Motif::DoubledPawnCreated => "Doubled pawns",
            Motif::IsolatedPawnCreated => "Isolated pawn",
            Motif::MissedOpenFile => "Missed open file",
            Motif::Other => "Other",
        }
    }
}

/// Everything a detector may look at. Boards are copies, never the walk's own.
#[derive(Debug, Clone, Copy)]
pub struct MotifInput {
    pub before: Board,
    pub after_played: Board,
    pub played: ChessMove,
    pub best: ChessMove,
}

impl MotifInput {
    pub fn new(before: Board, played: ChessMove, best: ChessMove) -> Self {
        Self {
            before,
            after_played: before.make_move_new(played),
            played,
            best,
        }
    }
}

pub type MotifCheck = fn(&MotifInput) -> bool;

/// Checked on every analyzed move, error or not
pub const STRATEGIC_MOTIFS: &[(Motif, MotifCheck)] = &[
    (Motif::DoubledPawnCreated, |i| {
        pawn_structure::doubled_pawn_created(&i.before, &i.after_played, i.played)
    }),
    (Motif::IsolatedPawnCreated, |i| {
        pawn_structure::isolated_pawn_created(&i.before, &i.after_played)
    }),
    (Motif::MissedOpenFile, |i| {
        pawn_structure::missed_open_file(&i.before, i.best, i.played)
    }),
];

/// Checked only on errors: first the played move, then what the best move had
pub const TACTICAL_MOTIFS: &[(Motif, MotifCheck)] = &[
    (Motif::MovedIntoDanger, |i| attacks::moved_into_danger(&i.before, i.played)),
    (Motif::Fork, |i| attacks::fork(&i.before, i.best)),
    (Motif::Pin, |i| pins::pin(&i.before, i.best)),
    (Motif::Skewer, |i| line_geometry::skewer(&i.before, i.best)),
    (Motif::DoubleCheck, |i| line_geometry::double_check(&i.before, i.best)),
    (Motif::DiscoveredCheck, |i| line_geometry::discovered_check(&i.before, i.best)),
    (Motif::DiscoveredAttack, |i| line_geometry::discovered_attack(&i.before, i.best)),
    (Motif::MissedHangingPiece, |i| attacks::missed_hanging_piece(&i.before, i.best)),
    (Motif::TrappedPiece, |i| attacks::trapped_piece(&i.before, i.best)),
    (Motif::Sacrifice, |i| attacks::sacrifice(&i.before, i.best)),
    (Motif::RemovingTheDefender, |i| attacks::removing_the_defender(&i.before, i.best)),
];

fn run_table(table: &[(Motif, MotifCheck)], input: &MotifInput) -> Vec<Motif> {
    table
        .iter()
        .filter(|(_, check)| check(input))
        .map(|(motif, _)| *motif)
        .collect()
}

pub fn strategic_tags(input: &MotifInput) -> Vec<Motif> {
    run_table(STRATEGIC_MOTIFS, input)
}

pub fn tactical_tags(input: &MotifInput) -> Vec<Motif> {
    run_table(TACTICAL_MOTIFS, input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::Square;
    use std::str::FromStr;

    #[test]
    fn test_tactical_tags_for_missed_fork() {
        let board = Board::from_str("7k/2r5/5b2/8/1N6/8/8/7K w - - 0 1").unwrap();
        let best = ChessMove::new(Square::B4, Square::D5, None);
        let played = ChessMove::new(Square::H1, Square::G1, None);
        let tags = tactical_tags(&MotifInput::new(board, played, best));
        assert!(tags.contains(&Motif::Fork));
        assert!(!tags.contains(&Motif::MovedIntoDanger));
    }

    #[test]
    fn test_strategic_tags_for_open_file() {
        let board = Board::from_str("4k3/pp3ppp/8/8/8/8/PP3PPP/R3K3 w - - 0 1").unwrap();
        let best = ChessMove::new(Square::A1, Square::D1, None);
        let played = ChessMove::new(Square::H2, Square::H3, None);
        let tags = strategic_tags(&MotifInput::new(board, played, best));
        assert_eq!(tags, vec![Motif::MissedOpenFile]);
    }

    #[test]
    fn test_input_does_not_touch_source_board() {
        let board = Board::default();
        let e4 = ChessMove::new(Square::E2, Square::E4, None);
        let input = MotifInput::new(board, e4, e4);
        assert_eq!(input.before, Board::default());
        assert_ne!(input.after_played, Board::default());
    }
}
