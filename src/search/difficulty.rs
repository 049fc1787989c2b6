//! Difficulty tiers and root move selection.
//!
//! Difficulty never changes how deep or how well the search scores moves; it
//! only decides which of the top scored root moves is played.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::search::evaluation_cache::ScoredMove;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

pub const ALL_DIFFICULTIES: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

/// Rank weights for sampling among near-best candidates (best first).
const CANDIDATE_WEIGHTS: [u32; 4] = [8, 4, 2, 1];

impl Difficulty {
    pub const fn default_depth(self) -> u8 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 3,
            Difficulty::Hard => 4,
        }
    }

    pub const fn default_move_time_ms(self) -> u64 {
        match self {
            Difficulty::Easy => 500,
            Difficulty::Medium => 1500,
            Difficulty::Hard => 4000,
        }
    }

    /// How many of the top moves may be played.
    pub const fn candidate_count(self) -> usize {
        match self {
            Difficulty::Easy => 4,
            Difficulty::Medium => 2,
            Difficulty::Hard => 1,
        }
    }

    /// Largest score gap to the best move a playable candidate may have.
    pub const fn score_window(self) -> i32 {
        match self {
            Difficulty::Easy => 250,
            Difficulty::Medium => 60,
            Difficulty::Hard => 0,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// Pick the move to play from `ranked`, which must be sorted best first.
pub fn select_candidate<R: Rng + ?Sized>(
    ranked: &[ScoredMove],
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<ScoredMove> {
    let best = *ranked.first()?;
    let eligible: Vec<ScoredMove> = ranked
        .iter()
        .take(difficulty.candidate_count())
        .take_while(|candidate| best.score - candidate.score <= difficulty.score_window())
        .copied()
        .collect();

    if eligible.len() <= 1 {
        return Some(best);
    }

    let weights = &CANDIDATE_WEIGHTS[..eligible.len()];
    let total: u32 = weights.iter().sum();
    let mut roll = rng.random_range(0..total);
    for (candidate, weight) in eligible.iter().zip(weights) {
        if roll < *weight {
            return Some(*candidate);
        }
        roll -= weight;
    }

    Some(best)
}
