//! Engine scores relative to a side, with mate capping for arithmetic

use chess::Color;

/// Score from the point of view of some side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    /// Centipawns
    Cp(i32),
    /// Mate in N moves; positive = this side mates, zero or negative = gets mated
    Mate(i32),
}

impl Score {
    /// Centipawn value with mates capped to `mate_value`, sign preserved.
    pub fn to_cp(self, mate_value: i32) -> i32 {
        match self {
            Score::Cp(cp) => cp,
            Score::Mate(n) if n > 0 => mate_value - n,
            Score::Mate(n) => -mate_value - n,
        }
    }

    pub fn mate(self) -> Option<i32> {
        match self {
            Score::Mate(n) => Some(n),
            Score::Cp(_) => None,
        }
    }

    fn flip(self) -> Self {
        match self {
            Score::Cp(cp) => Score::Cp(-cp),
            Score::Mate(n) => Score::Mate(-n),
        }
    }
}

/// A score tagged with the side it is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PovScore {
    pub score: Score,
    pub turn: Color,
}

impl PovScore {
    pub fn new(score: Score, turn: Color) -> Self {
        Self { score, turn }
    }

    /// The same score seen from `color`.
    pub fn pov(&self, color: Color) -> Score {
        if color == self.turn {
            self.score
        } else {
            self.score.flip()
        }
    }
}
