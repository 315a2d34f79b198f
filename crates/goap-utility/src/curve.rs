#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maps a raw consideration score to a utility.
///
/// Every variant is monotonic non-decreasing for the documented parameter ranges, so the curve
/// reshapes how strongly a goal reacts without reordering the inputs it sees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum UtilityCurve {
    #[default]
    Identity,
    /// `slope * x + intercept`, `slope >= 0`.
    Linear { slope: f32, intercept: f32 },
    /// `x^exponent` for `x >= 0` (negative inputs clamp to 0), `exponent > 0`.
    Power { exponent: f32 },
    /// `1 / (1 + e^(-steepness * (x - midpoint)))`, `steepness >= 0`.
    Logistic { midpoint: f32, steepness: f32 },
    /// `low` below `threshold`, `high` at or above it, `low <= high`.
    Step { threshold: f32, low: f32, high: f32 },
}

impl UtilityCurve {
    pub fn evaluate(&self, x: f32) -> f32 {
        match *self {
            UtilityCurve::Identity => x,
            UtilityCurve::Linear { slope, intercept } => slope * x + intercept,
            UtilityCurve::Power { exponent } => x.max(0.0).powf(exponent),
            UtilityCurve::Logistic {
                midpoint,
                steepness,
            } => 1.0 / (1.0 + (-steepness * (x - midpoint)).exp()),
            UtilityCurve::Step {
                threshold,
                low,
                high,
            } => {
                if x >= threshold {
                    high
                } else {
                    low
                }
            }
        }
    }
}
