//! Choosing which players to review from the corpus headers

use std::collections::BTreeMap;

use crate::stats::normalize_name;

#[derive(Clone, Debug)]
pub struct PlayerSelection {
    /// Players with strictly more games than this are selected; 0 = forced only
    pub min_games: usize,
    /// Always selected when they appear in the corpus
    pub forced: Vec<String>,
}

impl Default for PlayerSelection {
    fn default() -> Self {
        Self {
            min_games: 6,
            forced: Vec::new(),
        }
    }
}

/// Games per normalized identity. Unknown names ("?" or empty) are skipped.
pub fn count_games<'a, I>(pairings: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a (String, String)>,
{
    let mut counts = BTreeMap::new();
    for (white, black) in pairings {
        for name in [white, black] {
            let key = normalize_name(name);
            if key.is_empty() || key == "?" {
                continue;
            }
            *counts.entry(key).or_insert(0) += 1;
        }
    }
    counts
}

/// Selected identities mapped to their game counts.
pub fn select_players(
    counts: &BTreeMap<String, usize>,
    selection: &PlayerSelection,
) -> BTreeMap<String, usize> {
    let forced: Vec<String> = selection.forced.iter().map(|n| normalize_name(n)).collect();

    counts
        .iter()
        .filter(|(name, &count)| {
            let is_forced = forced.contains(name);
            if selection.min_games == 0 {
                is_forced
            } else {
                count > selection.min_games || is_forced
            }
        })
        .map(|(name, &count)| (name.clone(), count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairings() -> Vec<(String, String)> {
        let mut games = Vec::new();
        for _ in 0..7 {
            games.push(("Anna Petrova".to_string(), "Boris".to_string()));
        }
        games.push(("anna petrova".to_string(), "Clara".to_string()));
        games.push(("?".to_string(), "".to_string()));
        games
    }

    #[test]
    fn test_count_games_normalizes_and_skips_unknown() {
        let counts = count_games(&pairings());
        assert_eq!(counts["annapetrova"], 8);
        assert_eq!(counts["boris"], 7);
        assert_eq!(counts["clara"], 1);
        assert!(!counts.contains_key("?"));
        assert!(!counts.contains_key(""));
    }

    #[test]
    fn test_threshold_is_strict() {
        let counts = count_games(&pairings());
        let selection = PlayerSelection {
            min_games: 7,
            forced: vec!["CLARA".to_string()],
        };
        let selected = select_players(&counts, &selection);
        assert_eq!(selected.keys().collect::<Vec<_>>(), vec!["annapetrova", "clara"]);
    }

    #[test]
    fn test_zero_threshold_means_forced_only() {
        let counts = count_games(&pairings());
        let selection = PlayerSelection {
            min_games: 0,
            forced: vec!["Boris".to_string(), "Nobody".to_string()],
        };
        let selected = select_players(&counts, &selection);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected["boris"], 7);
    }
}
