#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UtilitySelectorConfig {
    /// Score a candidate must strictly exceed to be selected.
    ///
    /// If every candidate is at or below this threshold, nothing is selected.
    pub min_score: f32,
}

impl Default for UtilitySelectorConfig {
    fn default() -> Self {
        Self { min_score: 0.0 }
    }
}

/// Strict-argmax selection with a sticky incumbent.
///
/// A candidate replaces the current best only when its score is strictly greater, so among equal
/// scores the incumbent wins, and without an incumbent the first candidate in order wins.
#[derive(Debug, Clone)]
pub struct UtilitySelector {
    config: UtilitySelectorConfig,
    last_choice: Option<usize>,
    last_best_score: f32,
}

impl UtilitySelector {
    pub fn new(config: UtilitySelectorConfig) -> Self {
        Self {
            config,
            last_choice: None,
            last_best_score: f32::NEG_INFINITY,
        }
    }

    pub fn config(&self) -> &UtilitySelectorConfig {
        &self.config
    }

    pub fn last_choice(&self) -> Option<usize> {
        self.last_choice
    }

    pub fn last_best_score(&self) -> f32 {
        self.last_best_score
    }

    pub fn select(&mut self, scores: &[f32], incumbent: Option<usize>) -> Option<usize> {
        let mut best_idx: Option<usize> = None;
        let mut best_score = self.config.min_score;

        if let Some(i) = incumbent {
            if let Some(score) = scores.get(i).copied().map(sanitize) {
                if score > best_score {
                    best_idx = Some(i);
                    best_score = score;
                }
            }
        }

        for (i, score) in scores.iter().copied().map(sanitize).enumerate() {
            if score > best_score {
                best_score = score;
                best_idx = Some(i);
            }
        }

        self.last_choice = best_idx;
        self.last_best_score = if best_idx.is_some() {
            best_score
        } else {
            f32::NEG_INFINITY
        };
        best_idx
    }
}

impl Default for UtilitySelector {
    fn default() -> Self {
        Self::new(UtilitySelectorConfig::default())
    }
}

fn sanitize(score: f32) -> f32 {
    if score.is_nan() {
        f32::NEG_INFINITY
    } else {
        score
    }
}
