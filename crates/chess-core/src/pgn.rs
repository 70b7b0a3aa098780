//! PGN reading and writing on top of `pgn-reader` + shakmaty.
//!
//! Games are read into [`GameRecord`]s that keep headers, comments, NAGs and
//! nested variations, so the writer can re-emit everything that was read plus
//! whatever the reviewer appended.

use std::io::Read;
use std::ops::ControlFlow;

use chess::{ChessMove, File, Piece, Rank, Square};
use pgn_reader::{Nag, RawComment, RawTag, Reader, SanPlus, Skip, Visitor};
use shakmaty::{fen::Fen, san::San, uci::UciMove, CastlingMode, Chess, Move, Position};
use thiserror::Error;

use crate::game_data::{GameMetadata, GameRecord, GameResult, MoveNode};

const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Maximum line width of written movetext
const LINE_WIDTH: usize = 80;

#[derive(Error, Debug)]
pub enum PgnError {
    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    #[error("Illegal move {san} at ply {ply}")]
    IllegalMove { san: String, ply: usize },

    #[error("Unbalanced variations")]
    UnbalancedVariation,

    #[error("No game found")]
    Empty,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse a UCI move string ("e2e4", "e7e8q").
pub fn parse_uci_move(uci: &str) -> Option<ChessMove> {
    let bytes = uci.as_bytes();
    if bytes.len() < 4 {
        return None;
    }
    let square = |file: u8, rank: u8| -> Option<Square> {
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return None;
        }
        Some(Square::make_square(
            Rank::from_index((rank - b'1') as usize),
            File::from_index((file - b'a') as usize),
        ))
    };
    let from = square(bytes[0], bytes[1])?;
    let to = square(bytes[2], bytes[3])?;

    let promotion = match bytes.get(4) {
        Some(b'q' | b'Q') => Some(Piece::Queen),
        Some(b'r' | b'R') => Some(Piece::Rook),
        Some(b'b' | b'B') => Some(Piece::Bishop),
        Some(b'n' | b'N') => Some(Piece::Knight),
        _ => None,
    };

    Some(ChessMove::new(from, to, promotion))
}

/// Format a move in UCI notation.
pub fn format_uci(m: ChessMove) -> String {
    format!(
        "{}{}{}",
        m.get_source(),
        m.get_dest(),
        m.get_promotion()
            .map(|p| match p {
                Piece::Queen => "q",
                Piece::Rook => "r",
                Piece::Bishop => "b",
                Piece::Knight => "n",
                _ => "",
            })
            .unwrap_or("")
    )
}

fn start_position(fen: Option<&str>) -> Result<Chess, PgnError> {
    let Some(fen) = fen else {
        return Ok(Chess::default());
    };
    let parsed: Fen = fen
        .parse()
        .map_err(|_| PgnError::InvalidFen(fen.to_string()))?;
    parsed
        .into_position::<Chess>(CastlingMode::Standard)
        .map_err(|_| PgnError::InvalidFen(fen.to_string()))
}

/// SAN with check/mate suffix, plus the `chess` crate move, for `mv` in `pos`.
/// Leaves `pos` advanced by the move.
fn play_node(pos: &mut Chess, mv: Move) -> Option<MoveNode> {
    let san = San::from_move(&*pos, mv).to_string();
    let chess_move = parse_uci_move(&mv.to_uci(CastlingMode::Standard).to_string())?;
    pos.play_unchecked(mv);
    let suffix = if pos.is_checkmate() {
        "#"
    } else if pos.is_check() {
        "+"
    } else {
        ""
    };
    Some(MoveNode::new(format!("{san}{suffix}"), chess_move))
}

/// Build a side line from UCI moves played from `fen`.
///
/// Stops quietly at the first move that is not legal; errors only when not
/// even the first move can be played.
pub fn side_line(fen: &str, uci_moves: &[String]) -> Result<Vec<MoveNode>, PgnError> {
    let mut pos = start_position(Some(fen))?;
    let mut nodes = Vec::with_capacity(uci_moves.len());

    for (ply, uci) in uci_moves.iter().enumerate() {
        let legal = uci
            .parse::<UciMove>()
            .ok()
            .and_then(|u| u.to_move(&pos).ok());
        let Some(mv) = legal else {
            if ply == 0 {
                return Err(PgnError::IllegalMove {
                    san: uci.clone(),
                    ply,
                });
            }
            break;
        };
        match play_node(&mut pos, mv) {
            Some(node) => nodes.push(node),
            None => break,
        }
    }

    Ok(nodes)
}

/// One open line during movetext parsing (the mainline or a variation).
struct Frame {
    /// Position before the last move of this line
    before_last: Chess,
    pos: Chess,
    nodes: Vec<MoveNode>,
    /// Comment seen before the first move of a variation
    leading_comment: Option<String>,
}

struct GameState {
    headers: Vec<(String, String)>,
    metadata: GameMetadata,
    start_fen: Option<String>,
    initial_comment: Option<String>,
    stack: Vec<Frame>,
    ply: usize,
}

/// Visitor that builds a full [`GameRecord`].
struct RecordBuilder;

impl Visitor for RecordBuilder {
    type Tags = Vec<(String, String)>;
    type Movetext = GameState;
    type Output = Result<GameRecord, PgnError>;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(Vec::new())
    }

    fn tag(
        &mut self,
        tags: &mut Self::Tags,
        name: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        tags.push((
            String::from_utf8_lossy(name).into_owned(),
            value.decode_utf8_lossy().into_owned(),
        ));
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: Self::Tags) -> ControlFlow<Self::Output, Self::Movetext> {
        let mut metadata = GameMetadata::default();
        for (key, value) in &tags {
            match key.as_str() {
                "White" => metadata.white = value.clone(),
                "Black" => metadata.black = value.clone(),
                "Result" => metadata.result = GameResult::from_tag(value),
                "Date" => metadata.date = Some(value.clone()),
                "Event" => metadata.event = Some(value.clone()),
                "FEN" => metadata.fen = Some(value.clone()),
                _ => {}
            }
        }

        let start_fen = metadata
            .fen
            .clone()
            .filter(|fen| fen.trim() != STANDARD_START_FEN);

        let pos = match start_position(start_fen.as_deref()) {
            Ok(pos) => pos,
            Err(e) => return ControlFlow::Break(Err(e)),
        };

        ControlFlow::Continue(GameState {
            headers: tags,
            metadata,
            start_fen,
            initial_comment: None,
            stack: vec![Frame {
                before_last: pos.clone(),
                pos,
                nodes: Vec::new(),
                leading_comment: None,
            }],
            ply: 0,
        })
    }

    fn san(&mut self, state: &mut GameState, san_plus: SanPlus) -> ControlFlow<Self::Output> {
        let depth = state.stack.len();
        let Some(frame) = state.stack.last_mut() else {
            return ControlFlow::Break(Err(PgnError::UnbalancedVariation));
        };

        let illegal = || PgnError::IllegalMove {
            san: san_plus.to_string(),
            ply: state.ply,
        };

        let Ok(mv) = san_plus.san.to_move(&frame.pos) else {
            return ControlFlow::Break(Err(illegal()));
        };
        let before = frame.pos.clone();
        let Some(mut node) = play_node(&mut frame.pos, mv) else {
            return ControlFlow::Break(Err(illegal()));
        };
        node.starting_comment = frame.leading_comment.take();
        frame.before_last = before;
        frame.nodes.push(node);

        if depth == 1 {
            state.ply += 1;
        }
        ControlFlow::Continue(())
    }

    fn nag(&mut self, state: &mut GameState, nag: Nag) -> ControlFlow<Self::Output> {
        if let Some(node) = state.stack.last_mut().and_then(|f| f.nodes.last_mut()) {
            node.add_nag(nag.0);
        }
        ControlFlow::Continue(())
    }

    fn comment(&mut self, state: &mut GameState, comment: RawComment<'_>) -> ControlFlow<Self::Output> {
        let text = String::from_utf8_lossy(comment.as_bytes()).trim().to_string();
        if text.is_empty() {
            return ControlFlow::Continue(());
        }

        let depth = state.stack.len();
        let Some(frame) = state.stack.last_mut() else {
            return ControlFlow::Break(Err(PgnError::UnbalancedVariation));
        };
        let slot = match frame.nodes.last_mut() {
            Some(node) => &mut node.comment,
            None if depth == 1 => &mut state.initial_comment,
            None => &mut frame.leading_comment,
        };
        match slot.as_mut() {
            Some(existing) => {
                existing.push(' ');
                existing.push_str(&text);
            }
            None => *slot = Some(text),
        }
        ControlFlow::Continue(())
    }

    fn begin_variation(&mut self, state: &mut GameState) -> ControlFlow<Self::Output, Skip> {
        let Some(parent) = state.stack.last() else {
            return ControlFlow::Break(Err(PgnError::UnbalancedVariation));
        };
        // A variation is an alternative to the parent's last move
        let start = if parent.nodes.is_empty() {
            parent.pos.clone()
        } else {
            parent.before_last.clone()
        };
        state.stack.push(Frame {
            before_last: start.clone(),
            pos: start,
            nodes: Vec::new(),
            leading_comment: None,
        });
        ControlFlow::Continue(Skip(false))
    }

    fn end_variation(&mut self, state: &mut GameState) -> ControlFlow<Self::Output> {
        if state.stack.len() < 2 {
            return ControlFlow::Break(Err(PgnError::UnbalancedVariation));
        }
        let Some(frame) = state.stack.pop() else {
            return ControlFlow::Break(Err(PgnError::UnbalancedVariation));
        };
        if let Some(anchor) = state.stack.last_mut().and_then(|f| f.nodes.last_mut()) {
            if !frame.nodes.is_empty() {
                anchor.variations.push(frame.nodes);
            }
        }
        ControlFlow::Continue(())
    }

    fn end_game(&mut self, mut state: GameState) -> Self::Output {
        if state.stack.len() != 1 {
            return Err(PgnError::UnbalancedVariation);
        }
        let mainline = state.stack.pop().map(|f| f.nodes).unwrap_or_default();
        Ok(GameRecord {
            headers: state.headers,
            metadata: state.metadata,
            start_fen: state.start_fen,
            initial_comment: state.initial_comment,
            moves: mainline,
        })
    }
}

/// Streaming iterator over the games of a PGN source.
pub struct PgnGames<R> {
    reader: Reader<R>,
    done: bool,
}

impl<R: Read> PgnGames<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: Reader::new(source),
            done: false,
        }
    }
}

impl<R: Read> Iterator for PgnGames<R> {
    type Item = Result<GameRecord, PgnError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_game(&mut RecordBuilder) {
            Ok(Some(game)) => Some(game),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                // The reader cannot resync after an I/O failure
                self.done = true;
                Some(Err(PgnError::Io(e)))
            }
        }
    }
}

/// Parse the first game of a PGN string.
pub fn parse_pgn(pgn: &str) -> Result<GameRecord, PgnError> {
    PgnGames::new(pgn.as_bytes()).next().unwrap_or(Err(PgnError::Empty))
}

/// Visitor that only collects player names, skipping all movetext.
struct PlayerNames;

impl Visitor for PlayerNames {
    type Tags = (String, String);
    type Movetext = ();
    type Output = (String, String);

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(("?".to_string(), "?".to_string()))
    }

    fn tag(
        &mut self,
        tags: &mut Self::Tags,
        name: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        match name {
            b"White" => tags.0 = value.decode_utf8_lossy().into_owned(),
            b"Black" => tags.1 = value.decode_utf8_lossy().into_owned(),
            _ => {}
        }
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: Self::Tags) -> ControlFlow<Self::Output, Self::Movetext> {
        ControlFlow::Break(tags)
    }

    fn end_game(&mut self, _movetext: ()) -> Self::Output {
        ("?".to_string(), "?".to_string())
    }
}

/// Read the (White, Black) names of every game in a PGN source.
pub fn read_player_names<R: Read>(source: R) -> Result<Vec<(String, String)>, PgnError> {
    let mut reader = Reader::new(source);
    let mut names = Vec::new();
    while let Some(pair) = reader.read_game(&mut PlayerNames)? {
        names.push(pair);
    }
    Ok(names)
}

fn sanitize_comment(text: &str) -> String {
    text.replace('}', ")")
}

fn write_line(
    tokens: &mut Vec<String>,
    nodes: &[MoveNode],
    mut fullmove: u32,
    mut white_to_move: bool,
) {
    let mut need_number = true;

    for node in nodes {
        if let Some(comment) = node.starting_comment.as_deref().filter(|c| !c.is_empty()) {
            tokens.push(format!("{{{}}}", sanitize_comment(comment)));
            need_number = true;
        }
        if white_to_move {
            tokens.push(format!("{fullmove}."));
        } else if need_number {
            tokens.push(format!("{fullmove}..."));
        }
        tokens.push(node.san.clone());
        need_number = false;

        for nag in &node.nags {
            tokens.push(format!("${nag}"));
        }
        if let Some(comment) = node.comment.as_deref().filter(|c| !c.is_empty()) {
            tokens.push(format!("{{{}}}", sanitize_comment(comment)));
            need_number = true;
        }
        for line in &node.variations {
            tokens.push("(".to_string());
            write_line(tokens, line, fullmove, white_to_move);
            tokens.push(")".to_string());
            need_number = true;
        }

        if !white_to_move {
            fullmove += 1;
        }
        white_to_move = !white_to_move;
    }
}

/// Serialize a game record back to PGN text.
pub fn write_game(game: &GameRecord) -> String {
    let mut out = String::new();
    for (key, value) in &game.headers {
        out.push_str(&format!("[{} \"{}\"]\n", key, value.replace('"', "\\\"")));
    }
    out.push('\n');

    let mut tokens = Vec::new();
    if let Some(comment) = game.initial_comment.as_deref().filter(|c| !c.is_empty()) {
        tokens.push(format!("{{{}}}", sanitize_comment(comment)));
    }
    let (fullmove, white_to_move) = game.start_counters();
    write_line(&mut tokens, &game.moves, fullmove, white_to_move);
    tokens.push(game.metadata.result.as_str().to_string());

    let mut line_len = 0;
    for token in tokens {
        if line_len > 0 && line_len + 1 + token.len() > LINE_WIDTH {
            out.push('\n');
            line_len = 0;
        } else if line_len > 0 {
            out.push(' ');
            line_len += 1;
        }
        line_len += token.len();
        out.push_str(&token);
    }
    out.push_str("\n\n");
    out
}
