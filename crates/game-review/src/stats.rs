//! Per-player season statistics and their merge

use std::collections::BTreeMap;

use crate::classifier::Severity;
use crate::opening::OpeningViolation;
use crate::tactics::Motif;

/// Case- and space-insensitive player identity
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<String>().to_lowercase()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerSeason {
    /// Spelling as first seen in a game header
    pub display_name: String,
    pub games: u32,
    pub opening: BTreeMap<String, u32>,
    pub tactics: BTreeMap<String, u32>,
    pub strategy: BTreeMap<String, u32>,
    pub conversion_failures: u32,
    pub inaccuracies: u32,
    pub mistakes: u32,
    pub blunders: u32,
}

impl PlayerSeason {
    pub fn new(display_name: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            ..Default::default()
        }
    }

    pub fn record_opening(&mut self, violations: &[OpeningViolation]) {
        // One count per category per game
        let mut seen: Vec<&'static str> = Vec::new();
        for v in violations {
            let category = v.category();
            if !seen.contains(&category) {
                seen.push(category);
                *self.opening.entry(category.to_string()).or_insert(0) += 1;
            }
        }
    }

    pub fn record_tactic(&mut self, label: &str) {
        *self.tactics.entry(label.to_string()).or_insert(0) += 1;
    }

    pub fn record_strategy(&mut self, motif: Motif) {
        *self.strategy.entry(motif.label().to_string()).or_insert(0) += 1;
    }

    pub fn record_severity(&mut self, severity: Severity) {
        match severity {
            Severity::Inaccuracy => self.inaccuracies += 1,
            Severity::Mistake => self.mistakes += 1,
            Severity::Blunder => self.blunders += 1,
        }
    }

    pub fn total_tactical_errors(&self) -> u32 {
        self.tactics.values().sum()
    }

    /// Add another season's counts into this one. The display name is kept.
    pub fn merge(&mut self, other: &PlayerSeason) {
        self.games += other.games;
        self.conversion_failures += other.conversion_failures;
        self.inaccuracies += other.inaccuracies;
        self.mistakes += other.mistakes;
        self.blunders += other.blunders;
        for (target, source) in [
            (&mut self.opening, &other.opening),
            (&mut self.tactics, &other.tactics),
            (&mut self.strategy, &other.strategy),
        ] {
            for (k, v) in source {
                *target.entry(k.clone()).or_insert(0) += v;
            }
        }
    }
}

/// Seasons keyed by normalized identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeasonStats {
    players: BTreeMap<String, PlayerSeason>,
}

impl SeasonStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Season for `display_name`, created on first appearance
    pub fn player_mut(&mut self, display_name: &str) -> &mut PlayerSeason {
        self.players
            .entry(normalize_name(display_name))
            .or_insert_with(|| PlayerSeason::new(display_name))
    }

    pub fn get(&self, name: &str) -> Option<&PlayerSeason> {
        self.players.get(&normalize_name(name))
    }

    pub fn merge(&mut self, delta: SeasonStats) {
        for (key, season) in delta.players {
            match self.players.get_mut(&key) {
                Some(existing) => existing.merge(&season),
                None => {
                    self.players.insert(key, season);
                }
            }
        }
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerSeason> {
        self.players.values()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta(name: &str, fork: u32, games: u32) -> SeasonStats {
        let mut stats = SeasonStats::new();
        let p = stats.player_mut(name);
        p.games = games;
        for _ in 0..fork {
            p.record_tactic("Fork");
        }
        stats
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Anna  Petrova "), "annapetrova");
        assert_eq!(normalize_name("ANNA PETROVA"), normalize_name("anna petrova"));
    }

    #[test]
    fn test_merge_is_additive_and_keeps_first_spelling() {
        let mut total = SeasonStats::new();
        total.merge(delta("Anna Petrova", 1, 1));
        total.merge(delta("anna  petrova", 2, 1));

        assert_eq!(total.len(), 1);
        let p = total.get("ANNA PETROVA").unwrap();
        assert_eq!(p.display_name, "Anna Petrova");
        assert_eq!(p.games, 2);
        assert_eq!(p.tactics["Fork"], 3);
    }

    #[test]
    fn test_merge_is_commutative() {
        let mut a = SeasonStats::new();
        a.merge(delta("Boris", 1, 1));
        a.merge(delta("Clara", 2, 3));

        let mut b = SeasonStats::new();
        b.merge(delta("Clara", 2, 3));
        b.merge(delta("Boris", 1, 1));

        assert_eq!(a, b);
    }

    #[test]
    fn test_opening_counts_once_per_category() {
        let mut p = PlayerSeason::new("x");
        p.record_opening(&[
            OpeningViolation::NotCastled,
            OpeningViolation::Undeveloped {
                piece: crate::opening::DevelopingPiece::QueensideBishop,
                home: chess::Square::C1,
            },
            OpeningViolation::Undeveloped {
                piece: crate::opening::DevelopingPiece::KingsideBishop,
                home: chess::Square::F1,
            },
        ]);
        assert_eq!(p.opening["Not castled"], 1);
        assert_eq!(p.opening["Undeveloped pieces"], 1);
    }
}
