use serde::{Deserialize, Serialize};

use crate::core::types::Grade;
use crate::matching::sequence::char_ratio;

/// Similarity ratio and the grade it falls into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradedScore {
    /// `2 * matched / (len(ref) + len(hyp))` over code points, in `[0, 1]`
    pub ratio: f64,
    pub grade: Grade,
}

impl GradedScore {
    #[must_use]
    pub fn from_ratio(ratio: f64) -> Self {
        Self {
            ratio,
            grade: Grade::from_ratio(ratio),
        }
    }

    /// Ratio as a percentage rounded to two decimals
    #[must_use]
    pub fn percent(&self) -> f64 {
        round_to(self.ratio * 100.0, 2)
    }
}

/// Grade two already-normalized texts, compared as whole strings
#[must_use]
pub fn grade(normalized_ref: &str, normalized_hyp: &str) -> GradedScore {
    GradedScore::from_ratio(char_ratio(normalized_ref, normalized_hyp))
}

/// Round to `places` decimal places
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
