/// Error severity from score loss, pure functions only

use chess::Color;
use chess_core::game_data::{NAG_BLUNDER, NAG_DUBIOUS_MOVE, NAG_MISTAKE};

use crate::score::PovScore;

/// Centipawn lower bounds of each severity bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub inaccuracy: i32,
    pub mistake: i32,
    pub blunder: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Inaccuracy,
    Mistake,
    Blunder,
}

impl Severity {
    pub fn nag(self) -> u8 {
        match self {
            Severity::Inaccuracy => NAG_DUBIOUS_MOVE,
            Severity::Mistake => NAG_MISTAKE,
            Severity::Blunder => NAG_BLUNDER,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Inaccuracy => "Inaccuracy",
            Severity::Mistake => "Mistake",
            Severity::Blunder => "Blunder",
        }
    }
}

/// Loss of `actual` relative to `best` from the mover's point of view, never negative.
pub fn loss(best: &PovScore, actual: &PovScore, mover: Color, mate_value: i32) -> i32 {
    let best_cp = best.pov(mover).to_cp(mate_value);
    let actual_cp = actual.pov(mover).to_cp(mate_value);
    (best_cp - actual_cp).max(0)
}

/// Highest bucket whose lower bound `loss` reaches.
pub fn severity(loss: i32, thresholds: &Thresholds) -> Option<Severity> {
    if loss >= thresholds.blunder {
        Some(Severity::Blunder)
    } else if loss >= thresholds.mistake {
        Some(Severity::Mistake)
    } else if loss >= thresholds.inaccuracy {
        Some(Severity::Inaccuracy)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::Score;

    const T: Thresholds = Thresholds {
        inaccuracy: 50,
        mistake: 100,
        blunder: 300,
    };

    #[test]
    fn test_severity_buckets() {
        assert_eq!(severity(0, &T), None);
        assert_eq!(severity(49, &T), None);
        assert_eq!(severity(50, &T), Some(Severity::Inaccuracy));
        assert_eq!(severity(150, &T), Some(Severity::Mistake));
        assert_eq!(severity(300, &T), Some(Severity::Blunder));
    }

    #[test]
    fn test_loss_is_never_negative() {
        let a = PovScore::new(Score::Cp(40), Color::White);
        assert_eq!(loss(&a, &a, Color::White, 10_000), 0);

        let better = PovScore::new(Score::Cp(90), Color::White);
        assert_eq!(loss(&a, &better, Color::White, 10_000), 0);
    }

    #[test]
    fn test_loss_from_black_pov() {
        // White-relative scores; Black moved and let White go from +20 to +220
        let best = PovScore::new(Score::Cp(20), Color::White);
        let actual = PovScore::new(Score::Cp(220), Color::White);
        assert_eq!(loss(&best, &actual, Color::Black, 10_000), 200);
    }

    #[test]
    fn test_missed_mate_loss_is_capped() {
        let best = PovScore::new(Score::Mate(2), Color::White);
        let actual = PovScore::new(Score::Cp(0), Color::White);
        assert_eq!(loss(&best, &actual, Color::White, 10_000), 9_998);
    }

    #[test]
    fn test_nags() {
        assert_eq!(Severity::Inaccuracy.nag(), 6);
        assert_eq!(Severity::Mistake.nag(), 2);
        assert_eq!(Severity::Blunder.nag(), 4);
    }
}
