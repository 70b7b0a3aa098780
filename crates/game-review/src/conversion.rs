//! Failure to convert a decisive advantage into a win

use chess::Color;
use chess_core::GameResult;

use crate::score::PovScore;

/// True when `mover` stands at least `threshold` better and still did not win.
/// Mates count as `mate_value` (less the distance to mate).
pub fn check_technical_conversion(
    score: &PovScore,
    threshold: i32,
    mate_value: i32,
    result: GameResult,
    mover: Color,
) -> bool {
    if result.is_win_for(mover) {
        return false;
    }
    score.pov(mover).to_cp(mate_value) >= threshold
}

/// Fires at most once per color per game.
#[derive(Debug, Default, Clone)]
pub struct ConversionLatch {
    white: bool,
    black: bool,
}

impl ConversionLatch {
    /// Returns true the first time it is called for `color`.
    pub fn fire(&mut self, color: Color) -> bool {
        let flag = match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        };
        !std::mem::replace(flag, true)
    }
}

pub fn conversion_comment(score: &PovScore, mover: Color, mate_value: i32) -> String {
    let cp = score.pov(mover).to_cp(mate_value);
    format!("[Decisive advantage not converted (+{:.1})]", cp as f64 / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::Score;

    #[test]
    fn test_won_game_is_not_flagged() {
        let s = PovScore::new(Score::Cp(1200), Color::White);
        assert!(!check_technical_conversion(&s, 1000, 10_000, GameResult::WhiteWins, Color::White));
        assert!(check_technical_conversion(&s, 1000, 10_000, GameResult::Draw, Color::White));
        assert!(check_technical_conversion(&s, 1000, 10_000, GameResult::BlackWins, Color::White));
    }

    #[test]
    fn test_below_threshold() {
        let s = PovScore::new(Score::Cp(-900), Color::White);
        assert!(!check_technical_conversion(&s, 1000, 10_000, GameResult::Draw, Color::Black));
    }

    #[test]
    fn test_mate_counts_as_decisive() {
        let s = PovScore::new(Score::Mate(-4), Color::White);
        assert!(check_technical_conversion(&s, 1000, 10_000, GameResult::Draw, Color::Black));
    }

    #[test]
    fn test_mate_uses_configured_cap() {
        let s = PovScore::new(Score::Mate(2), Color::White);
        assert!(!check_technical_conversion(&s, 1000, 500, GameResult::Draw, Color::White));
        assert_eq!(
            conversion_comment(&s, Color::White, 2_000),
            "[Decisive advantage not converted (+20.0)]"
        );
    }

    #[test]
    fn test_latch_fires_once_per_color() {
        let mut latch = ConversionLatch::default();
        assert!(latch.fire(Color::White));
        assert!(!latch.fire(Color::White));
        assert!(latch.fire(Color::Black));
        assert!(!latch.fire(Color::Black));
    }

    #[test]
    fn test_comment_format() {
        let s = PovScore::new(Score::Cp(1234), Color::White);
        assert_eq!(conversion_comment(&s, Color::White, 10_000), "[Decisive advantage not converted (+12.3)]");
    }
}
