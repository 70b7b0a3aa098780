//! Batch run over a folder of PGN files: player selection, per-game review,
//! annotated output and season reports.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chess_core::{read_player_names, write_game, PgnGames};
use tracing::{error, info, warn};

use crate::config::ReviewConfig;
use crate::context::{RunContext, RunSummary};
use crate::error::ReviewError;
use crate::evaluator::PositionEvaluator;
use crate::players::{count_games, select_players};
use crate::report::{render_report, report_file_name};
use crate::stats::SeasonStats;
use crate::stockfish::StockfishEngine;
use crate::walker::analyze_game;

/// All `*.pgn` files directly inside `folder`, sorted by path.
pub fn discover_pgn_files(folder: &Path) -> Result<Vec<PathBuf>, ReviewError> {
    let pattern = folder.join("*.pgn");
    let pattern = pattern.to_string_lossy();
    let entries = glob::glob(&pattern)
        .map_err(|e| ReviewError::Config(format!("bad input folder {}: {e}", folder.display())))?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => files.push(path),
            Err(e) => warn!(error = %e, "Unreadable entry in input folder"),
        }
    }
    files.sort();
    Ok(files)
}

/// Headers pass over every file: identity -> games for the selected players.
pub fn selected_players(
    files: &[PathBuf],
    config: &ReviewConfig,
) -> BTreeMap<String, usize> {
    let mut pairings = Vec::new();
    for path in files {
        match File::open(path)
            .map_err(ReviewError::from)
            .and_then(|f| Ok(read_player_names(BufReader::new(f))?))
        {
            Ok(names) => pairings.extend(names),
            Err(e) => warn!(file = %path.display(), error = %e, "Could not read player names"),
        }
    }
    let counts = count_games(&pairings);
    let selected = select_players(&counts, &config.players);
    info!(
        players_seen = counts.len(),
        players_selected = selected.len(),
        "Player selection done"
    );
    selected
}

fn output_path(input: &Path, output_folder: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "games".to_string());
    output_folder.join(format!("{stem}_analyze.pgn"))
}

/// Review every game of one file, writing the analyzed ones to
/// `<stem>_analyze.pgn` and merging their deltas into `season`.
pub async fn review_file<E: PositionEvaluator>(
    path: &Path,
    evaluator: &mut E,
    config: &ReviewConfig,
    ctx: &mut RunContext,
    season: &mut SeasonStats,
) -> Result<(), ReviewError> {
    info!(file = %path.display(), "=== File ===");
    let input = File::open(path)?;
    let mut out = BufWriter::new(File::create(output_path(path, &config.output_folder))?);

    for (index, game) in PgnGames::new(BufReader::new(input)).enumerate() {
        let game = match game {
            Ok(game) => game,
            Err(e) => {
                warn!(file = %path.display(), game = index + 1, error = %e, "Unreadable game, skipping");
                ctx.game_skipped();
                continue;
            }
        };
        ctx.game_seen();

        match analyze_game(game, evaluator, config, ctx).await {
            Ok(review) if review.analyzed => {
                out.write_all(write_game(&review.game).as_bytes())?;
                season.merge(review.deltas);
            }
            Ok(_) => {}
            Err(e) => {
                warn!(file = %path.display(), game = index + 1, error = %e, "Game not reviewed");
                ctx.game_skipped();
            }
        }
    }

    out.flush()?;
    Ok(())
}

/// One `Report_<name>.txt` per player in the season.
pub fn write_reports(season: &SeasonStats, output_folder: &Path) -> Result<(), ReviewError> {
    for player in season.players() {
        let path = output_folder.join(report_file_name(&player.display_name));
        fs::write(&path, render_report(player))?;
    }
    info!(reports = season.len(), folder = %output_folder.display(), "Reports written");
    Ok(())
}

/// Review every PGN file with the given evaluator.
pub async fn review_corpus<E: PositionEvaluator>(
    files: &[PathBuf],
    evaluator: &mut E,
    config: &ReviewConfig,
    ctx: &mut RunContext,
) -> Result<SeasonStats, ReviewError> {
    fs::create_dir_all(&config.output_folder)?;
    let mut season = SeasonStats::new();

    for path in files {
        if let Err(e) = review_file(path, evaluator, config, ctx, &mut season).await {
            error!(file = %path.display(), error = %e, "File failed");
            ctx.file_failed();
        }
    }

    write_reports(&season, &config.output_folder)?;
    Ok(season)
}

/// Full run against a spawned Stockfish process.
pub async fn run(config: &ReviewConfig) -> Result<RunSummary, ReviewError> {
    fs::create_dir_all(&config.output_folder)?;

    let files = discover_pgn_files(&config.input_folder)?;
    if files.is_empty() {
        warn!(folder = %config.input_folder.display(), "No PGN files found");
    }
    info!(files = files.len(), "Input discovered");

    let selected = selected_players(&files, config);
    let mut ctx = RunContext::new(&selected);

    let mut engine = StockfishEngine::new(&config.engine).await?;
    let result = review_corpus(&files, &mut engine, config, &mut ctx).await;
    engine.quit().await;
    result?;

    ctx.log_summary();
    info!(folder = %config.output_folder.display(), "All done");
    Ok(ctx.summary())
}
