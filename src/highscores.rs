//! High score leaderboard
//!
//! Persisted as JSON, consulted by the driver at game over; the sim itself
//! never touches it. Tracks the top 10 scores.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's score
    pub score: u64,
    /// Level reached when the run ended
    pub level: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: u64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: u64, level: u32, timestamp: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            level,
            timestamp,
        };

        // Find insertion point (sorted descending by score)
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores from disk; any failure yields an empty board
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<HighScores>(&json) {
                Ok(scores) => {
                    log::info!("loaded {} high scores", scores.entries.len());
                    scores
                }
                Err(e) => {
                    log::warn!("malformed high score file {}: {e}", path.display());
                    Self::new()
                }
            },
            Err(_) => {
                log::info!("no high scores found, starting fresh");
                Self::new()
            }
        }
    }

    /// Save high scores to disk; failures are logged
    pub fn save(&self, path: &Path) {
        match serde_json::to_string(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    log::warn!("failed to save high scores: {e}");
                } else {
                    log::info!("high scores saved ({} entries)", self.entries.len());
                }
            }
            Err(e) => log::warn!("failed to serialize high scores: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert!(scores.qualifies(1));
    }

    #[test]
    fn test_rank_insertion_order() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(100, 2, 0), Some(1));
        assert_eq!(scores.add_score(300, 4, 1), Some(1));
        assert_eq!(scores.add_score(200, 3, 2), Some(2));

        let values: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(values, vec![300, 200, 100]);
        assert_eq!(scores.top_score(), Some(300));
    }

    #[test]
    fn test_board_truncates_to_max() {
        let mut scores = HighScores::new();
        for i in 1..=15u64 {
            scores.add_score(i * 10, 1, i);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        // Lowest surviving entry is 60: 150 down to 60 fills ten slots
        assert_eq!(scores.entries.last().map(|e| e.score), Some(60));

        // A score below the floor no longer qualifies
        assert!(!scores.qualifies(50));
        assert_eq!(scores.add_score(50, 1, 99), None);
    }

    #[test]
    fn test_potential_rank_matches_insertion() {
        let mut scores = HighScores::new();
        scores.add_score(300, 1, 0);
        scores.add_score(100, 1, 1);
        assert_eq!(scores.potential_rank(200), Some(2));
        assert_eq!(scores.potential_rank(400), Some(1));
        assert_eq!(scores.potential_rank(0), None);
    }
}
