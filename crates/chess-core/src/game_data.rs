use chess::ChessMove;
use serde::{Deserialize, Serialize};

/// NAG codes written for move-quality marks.
pub const NAG_MISTAKE: u8 = 2;
pub const NAG_BLUNDER: u8 = 4;
pub const NAG_DUBIOUS_MOVE: u8 = 6;

/// Final result of a game as recorded in the `Result` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    Unknown,
}

impl GameResult {
    pub fn from_tag(value: &str) -> Self {
        match value.trim() {
            "1-0" => GameResult::WhiteWins,
            "0-1" => GameResult::BlackWins,
            "1/2-1/2" => GameResult::Draw,
            _ => GameResult::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
            GameResult::Unknown => "*",
        }
    }

    /// Did `color` win this game?
    pub fn is_win_for(&self, color: chess::Color) -> bool {
        matches!(
            (self, color),
            (GameResult::WhiteWins, chess::Color::White) | (GameResult::BlackWins, chess::Color::Black)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub white: String,
    pub black: String,
    pub result: GameResult,
    pub date: Option<String>,
    pub event: Option<String>,
    pub fen: Option<String>,
}

impl Default for GameMetadata {
    fn default() -> Self {
        Self {
            white: "?".to_string(),
            black: "?".to_string(),
            result: GameResult::Unknown,
            date: None,
            event: None,
            fen: None,
        }
    }
}

/// One move of a game record, mainline or side line.
///
/// `variations` holds alternatives to *this* move: each inner vector is a
/// line starting from the position before it.
#[derive(Debug, Clone)]
pub struct MoveNode {
    pub san: String,
    pub chess_move: ChessMove,
    pub nags: Vec<u8>,
    pub comment: Option<String>,
    /// Comment written before this move, only used on the first move of a variation
    pub starting_comment: Option<String>,
    pub variations: Vec<Vec<MoveNode>>,
}

impl MoveNode {
    pub fn new(san: String, chess_move: ChessMove) -> Self {
        Self {
            san,
            chess_move,
            nags: Vec::new(),
            comment: None,
            starting_comment: None,
            variations: Vec::new(),
        }
    }

    /// Append text to the comment, keeping whatever was there.
    pub fn append_comment(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match &mut self.comment {
            Some(existing) if !existing.trim().is_empty() => {
                existing.push_str("; ");
                existing.push_str(text);
            }
            _ => self.comment = Some(text.to_string()),
        }
    }

    pub fn add_nag(&mut self, nag: u8) {
        if !self.nags.contains(&nag) {
            self.nags.push(nag);
        }
    }
}

/// A parsed game: headers in file order plus the annotated mainline.
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub headers: Vec<(String, String)>,
    pub metadata: GameMetadata,
    /// Starting FEN, `None` for the standard position
    pub start_fen: Option<String>,
    pub initial_comment: Option<String>,
    pub moves: Vec<MoveNode>,
}

impl GameRecord {
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Full-move number and side to move of the starting position.
    pub fn start_counters(&self) -> (u32, bool) {
        let Some(fen) = &self.start_fen else {
            return (1, true);
        };
        let parts: Vec<&str> = fen.split_whitespace().collect();
        let white_to_move = parts.get(1).map_or(true, |s| *s != "b");
        let fullmove = parts
            .get(5)
            .and_then(|s| s.parse().ok())
            .filter(|n: &u32| *n > 0)
            .unwrap_or(1);
        (fullmove, white_to_move)
    }
}
