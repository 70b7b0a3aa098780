//! Drives one game ply by ply: engine queries, motif checks, opening and
//! conversion checks, annotations and per-player stat deltas.

use chess::{ChessMove, Color};
use chess_core::game_data::NAG_BLUNDER;
use chess_core::{format_uci, side_line, GameRecord, GameResult, MoveNode};
use tracing::{debug, info, warn};

use crate::classifier::{loss, severity, Severity};
use crate::config::ReviewConfig;
use crate::context::RunContext;
use crate::conversion::{check_technical_conversion, conversion_comment, ConversionLatch};
use crate::error::ReviewError;
use crate::evaluator::{EvalRequest, PositionEvaluator};
use crate::opening::{opening_comment, OpeningTracker};
use crate::position::Position;
use crate::score::{PovScore, Score};
use crate::stats::{normalize_name, PlayerSeason, SeasonStats};
use crate::tactics::{strategic_tags, tactical_tags, Motif, MotifInput};

/// Plies of the engine line attached to an ordinary error
const ERROR_LINE_PLIES: usize = 7;

/// What the review found for one analyzed ply.
#[derive(Debug, Clone)]
pub struct PlyRecord {
    /// Index into the mainline
    pub ply: usize,
    pub fullmove: u32,
    pub mover: Color,
    pub fen_before: String,
    pub played: ChessMove,
    pub best: ChessMove,
    pub pv: Vec<ChessMove>,
    pub best_score: PovScore,
    /// Score of the played move from the restricted search, when one ran
    pub played_score: Option<PovScore>,
    pub loss: i32,
    pub severity: Option<Severity>,
    pub tactical: Vec<Motif>,
    pub strategic: Vec<Motif>,
    pub missed_mate: Option<i32>,
    /// The mover stood decisively better in a game they did not win
    pub conversion_candidate: bool,
}

impl PlyRecord {
    /// Labels counted as tactical errors for this ply
    pub fn tactical_labels(&self) -> Vec<String> {
        if let Some(n) = self.missed_mate {
            return vec![format!("Missed mate in {n}")];
        }
        self.tactical.iter().map(|m| m.label().to_string()).collect()
    }

    fn strategic_comment(&self) -> Option<String> {
        if self.strategic.is_empty() {
            return None;
        }
        let labels: Vec<&str> = self.strategic.iter().map(|m| m.label()).collect();
        Some(labels.join(", "))
    }

    /// Engine line to attach as a side variation, with the comment on its first move
    fn side_variation(&self) -> Option<(Vec<String>, String)> {
        if let Some(n) = self.missed_mate {
            let line = self.pv.iter().map(|m| format_uci(*m)).collect();
            return Some((line, format!("Mate in {n}")));
        }
        self.severity?;
        let line = self
            .pv
            .iter()
            .take(ERROR_LINE_PLIES)
            .map(|m| format_uci(*m))
            .collect();
        let labels: Vec<&str> = self.tactical.iter().map(|m| m.label()).collect();
        Some((line, labels.join(", ")))
    }
}

/// Annotated game plus the stat deltas it produced.
#[derive(Debug)]
pub struct GameReview {
    pub game: GameRecord,
    pub deltas: SeasonStats,
    /// False when neither player was selected; the game is then untouched
    pub analyzed: bool,
    pub plies: Vec<PlyRecord>,
}

/// Evaluate one ply. Pure with respect to walk state: nothing is recorded
/// unless the whole ply succeeds.
async fn review_ply<E: PositionEvaluator>(
    ply: usize,
    position: &Position,
    played: ChessMove,
    evaluator: &mut E,
    config: &ReviewConfig,
    result: GameResult,
) -> Result<Option<PlyRecord>, ReviewError> {
    let mover = position.turn();
    let request = EvalRequest::new(*position, config.engine.depth);
    let analysis = evaluator.analyse(&request).await?;
    let Some(best) = analysis.best_move() else {
        debug!(ply, "No principal variation, skipping ply");
        return Ok(None);
    };

    let input = MotifInput::new(position.board, played, best);
    let mut record = PlyRecord {
        ply,
        fullmove: position.fullmove,
        mover,
        fen_before: position.fen(),
        played,
        best,
        pv: analysis.pv.clone(),
        best_score: analysis.score,
        played_score: None,
        loss: 0,
        severity: None,
        tactical: Vec::new(),
        strategic: strategic_tags(&input),
        missed_mate: None,
        conversion_candidate: check_technical_conversion(
            &analysis.score,
            config.decisive_advantage,
            config.mate_score,
            result,
            mover,
        ),
    };

    if played == best {
        return Ok(Some(record));
    }

    let restricted = request.clone().restricted_to(played);
    let mut replay = None;

    if let Score::Mate(n) = analysis.score.pov(mover) {
        if n > 0 && n <= config.mate_depth_trigger {
            let answer = evaluator.analyse(&restricted).await?;
            let still_mates = matches!(answer.score.pov(mover), Score::Mate(m) if m > 0 && m <= n);
            if !still_mates {
                record.played_score = Some(answer.score);
                record.loss = loss(&analysis.score, &answer.score, mover, config.mate_score);
                record.missed_mate = Some(n);
                return Ok(Some(record));
            }
            replay = Some(answer);
        }
    }

    let replay = match replay {
        Some(answer) => answer,
        None => evaluator.analyse(&restricted).await?,
    };
    record.played_score = Some(replay.score);
    record.loss = loss(&analysis.score, &replay.score, mover, config.mate_score);

    if let Some(level) = severity(record.loss, &config.thresholds) {
        if record.loss >= config.min_reported_loss {
            record.severity = Some(level);
            let mut tags = tactical_tags(&input);
            if tags.is_empty() {
                tags.push(Motif::Other);
            }
            record.tactical = tags;
        }
    }

    Ok(Some(record))
}

/// Write one ply's findings into the move node and the mover's season.
fn apply_record(
    node: &mut MoveNode,
    record: &PlyRecord,
    season: &mut PlayerSeason,
    latch: &mut ConversionLatch,
    mate_value: i32,
) {
    if record.conversion_candidate && latch.fire(record.mover) {
        season.conversion_failures += 1;
        node.append_comment(&conversion_comment(&record.best_score, record.mover, mate_value));
        info!(fullmove = record.fullmove, "Decisive advantage not converted");
    }

    for motif in &record.strategic {
        season.record_strategy(*motif);
    }
    if let Some(comment) = record.strategic_comment() {
        node.append_comment(&comment);
    }

    if record.missed_mate.is_some() {
        node.add_nag(NAG_BLUNDER);
        season.record_severity(Severity::Blunder);
    } else if let Some(level) = record.severity {
        node.add_nag(level.nag());
        season.record_severity(level);
    } else {
        return;
    }

    let labels = record.tactical_labels();
    for label in &labels {
        season.record_tactic(label);
    }
    info!(
        fullmove = record.fullmove,
        loss = record.loss,
        motifs = %labels.join(", "),
        "Error found"
    );

    if let Some((line, comment)) = record.side_variation() {
        match side_line(&record.fen_before, &line) {
            Ok(mut nodes) if !nodes.is_empty() => {
                nodes[0].append_comment(&comment);
                node.variations.push(nodes);
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, fullmove = record.fullmove, "Engine line not playable"),
        }
    }
}

/// Review one game for the players selected in `ctx`.
pub async fn analyze_game<E: PositionEvaluator>(
    mut game: GameRecord,
    evaluator: &mut E,
    config: &ReviewConfig,
    ctx: &mut RunContext,
) -> Result<GameReview, ReviewError> {
    let white = game.metadata.white.clone();
    let black = game.metadata.black.clone();
    let white_id = normalize_name(&white);
    let black_id = normalize_name(&black);
    let analyze_white = ctx.is_selected(&white_id);
    let analyze_black = ctx.is_selected(&black_id);

    if !analyze_white && !analyze_black {
        return Ok(GameReview {
            game,
            deltas: SeasonStats::new(),
            analyzed: false,
            plies: Vec::new(),
        });
    }

    let mut position = match &game.start_fen {
        Some(fen) => Position::from_fen(fen)?,
        None => Position::default(),
    };

    let mut active = Vec::new();
    if analyze_white {
        active.push((white.clone(), white_id));
    }
    if analyze_black {
        active.push((black.clone(), black_id));
    }
    ctx.begin_game(&active);

    if let Err(e) = evaluator.new_game().await {
        warn!(error = %e, "Evaluator did not reset between games");
    }

    let mut deltas = SeasonStats::new();
    let mut white_tracker = analyze_white.then(|| OpeningTracker::new(Color::White));
    let mut black_tracker = analyze_black.then(|| OpeningTracker::new(Color::Black));
    if analyze_white {
        deltas.player_mut(&white).games += 1;
    }
    if analyze_black {
        deltas.player_mut(&black).games += 1;
    }

    let mut latch = ConversionLatch::default();
    let result = game.metadata.result;
    let mut plies = Vec::new();

    for ply in 0..game.moves.len() {
        let played = game.moves[ply].chess_move;
        if !position.board.legal(played) {
            return Err(ReviewError::MalformedGame(format!(
                "illegal move {} at ply {ply}",
                game.moves[ply].san
            )));
        }

        let mover = position.turn();
        let (name, tracker, analyzed) = match mover {
            Color::White => (&white, white_tracker.as_mut(), analyze_white),
            Color::Black => (&black, black_tracker.as_mut(), analyze_black),
        };

        if let Some(tracker) = tracker {
            tracker.record_move(&position.board, played);
        }

        if analyzed {
            match review_ply(ply, &position, played, evaluator, config, result).await {
                Ok(Some(record)) => {
                    apply_record(
                        &mut game.moves[ply],
                        &record,
                        deltas.player_mut(name),
                        &mut latch,
                        config.mate_score,
                    );
                    plies.push(record);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, ply, fullmove = position.fullmove, "Ply analysis failed, skipping");
                    ctx.ply_skipped();
                }
            }
        }

        let tracker = match mover {
            Color::White => white_tracker.as_mut(),
            Color::Black => black_tracker.as_mut(),
        };
        if let Some(violations) = tracker.and_then(|t| t.resolve_if_due(position.fullmove)) {
            game.moves[ply].append_comment(&opening_comment(&violations));
            deltas.player_mut(name).record_opening(&violations);
        }

        position = position.play(played);
    }

    ctx.game_finished();
    Ok(GameReview {
        game,
        deltas,
        analyzed: true,
        plies,
    })
}
