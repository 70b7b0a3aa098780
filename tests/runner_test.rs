//! Folder-level run: annotated files and reports land in the output folder.

mod common;

use std::fs;
use std::path::PathBuf;

use game_review::context::RunContext;
use game_review::runner::{discover_pgn_files, review_corpus, selected_players};

use common::{config, game_pgn, knight_shuffle, Flat};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("game-review-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[tokio::test]
async fn test_corpus_writes_annotated_games_and_reports() {
    let root = scratch_dir("corpus");
    let input = root.join("pgn");
    let output = root.join("out");
    fs::create_dir_all(&input).unwrap();

    let club = [
        game_pgn("Anna", "Boris", "1-0", &knight_shuffle(4)),
        game_pgn("Carl", "Dora", "0-1", "1. e4 e5"),
        game_pgn("Boris", "anna", "1/2-1/2", "1. d4 d5 2. c4"),
    ]
    .concat();
    fs::write(input.join("club.pgn"), club).unwrap();
    fs::write(input.join("notes.txt"), "not a pgn").unwrap();

    let mut config = config();
    config.input_folder = input.clone();
    config.output_folder = output.clone();

    let files = discover_pgn_files(&input).unwrap();
    assert_eq!(files, vec![input.join("club.pgn")]);

    let selected = selected_players(&files, &config);
    assert_eq!(selected.get("anna"), Some(&2));
    assert_eq!(selected.len(), 1);

    let mut ctx = RunContext::new(&selected);
    let season = review_corpus(&files, &mut Flat, &config, &mut ctx).await.unwrap();

    let anna = season.get("anna").unwrap();
    assert_eq!(anna.display_name, "Anna");
    assert_eq!(anna.games, 2);

    let summary = ctx.summary();
    assert_eq!(summary.games_seen, 3);
    assert_eq!(summary.games_analyzed, 2);
    assert_eq!(summary.files_failed, 0);

    let annotated = fs::read_to_string(output.join("club_analyze.pgn")).unwrap();
    assert_eq!(annotated.matches("[White ").count(), 2);
    assert!(!annotated.contains("Carl"));

    let report = fs::read_to_string(output.join("Report_Anna.txt")).unwrap();
    assert!(report.starts_with("REPORT: Anna"));
    assert!(report.contains("1. OPENING (games: 2):"));

    let _ = fs::remove_dir_all(&root);
}
