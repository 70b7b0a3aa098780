//! Run-wide counters and progress passed explicitly through the review

use std::collections::BTreeMap;

use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub games_seen: usize,
    pub games_analyzed: usize,
    pub games_skipped: usize,
    pub plies_skipped: usize,
    pub files_failed: usize,
}

#[derive(Debug, Default)]
pub struct RunContext {
    /// Identity -> games expected in the corpus
    expected: BTreeMap<String, usize>,
    /// Identity -> 1-based position in sorted order
    indices: BTreeMap<String, usize>,
    progress: BTreeMap<String, usize>,
    started: usize,
    summary: RunSummary,
}

impl RunContext {
    pub fn new(selected: &BTreeMap<String, usize>) -> Self {
        let indices = selected
            .keys()
            .enumerate()
            .map(|(i, name)| (name.clone(), i + 1))
            .collect();
        Self {
            expected: selected.clone(),
            indices,
            ..Default::default()
        }
    }

    pub fn is_selected(&self, identity: &str) -> bool {
        self.expected.contains_key(identity)
    }

    pub fn game_seen(&mut self) {
        self.summary.games_seen += 1;
    }

    /// Log which selected players this game advances.
    /// `players` holds (display name, identity) pairs.
    pub fn begin_game(&mut self, players: &[(String, String)]) {
        self.started += 1;
        let game = self.started;
        let total = self.expected.len();

        let mut parts = Vec::with_capacity(players.len());
        for (display, identity) in players {
            let done = self.progress.entry(identity.clone()).or_insert(0);
            *done += 1;
            let index = self.indices.get(identity).copied().unwrap_or(0);
            let expected = self.expected.get(identity).copied().unwrap_or(0);
            parts.push(format!("[player {index}/{total}] {display} ({done}/{expected})"));
        }
        info!(game, "Game {game}. {}", parts.join(" | "));
    }

    /// The walk over a begun game completed.
    pub fn game_finished(&mut self) {
        self.summary.games_analyzed += 1;
    }

    pub fn ply_skipped(&mut self) {
        self.summary.plies_skipped += 1;
    }

    pub fn game_skipped(&mut self) {
        self.summary.games_skipped += 1;
    }

    pub fn file_failed(&mut self) {
        self.summary.files_failed += 1;
    }

    pub fn summary(&self) -> RunSummary {
        self.summary.clone()
    }

    pub fn log_summary(&self) {
        let s = &self.summary;
        info!(
            games_seen = s.games_seen,
            games_analyzed = s.games_analyzed,
            games_skipped = s.games_skipped,
            plies_skipped = s.plies_skipped,
            files_failed = s.files_failed,
            "Run complete"
        );
        if s.plies_skipped > 0 || s.games_skipped > 0 || s.files_failed > 0 {
            warn!("Some input was skipped; see warnings above");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut selected = BTreeMap::new();
        selected.insert("anna".to_string(), 3);
        let mut ctx = RunContext::new(&selected);
        assert!(ctx.is_selected("anna"));
        assert!(!ctx.is_selected("boris"));

        ctx.game_seen();
        ctx.game_seen();
        ctx.begin_game(&[("Anna".to_string(), "anna".to_string())]);
        ctx.ply_skipped();
        ctx.game_finished();
        // Begun but abandoned: skipped, not analyzed
        ctx.begin_game(&[("Anna".to_string(), "anna".to_string())]);
        ctx.game_skipped();

        let s = ctx.summary();
        assert_eq!(s.games_seen, 2);
        assert_eq!(s.games_analyzed, 1);
        assert_eq!(s.plies_skipped, 1);
        assert_eq!(s.games_skipped, 1);
    }
}
