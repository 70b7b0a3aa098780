pub mod game_data;
pub mod pgn;

pub use game_data::{GameMetadata, GameRecord, GameResult, MoveNode};
pub use pgn::{format_uci, parse_pgn, parse_uci_move, read_player_names, side_line, write_game, PgnError, PgnGames};
