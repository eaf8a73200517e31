//! Recitation alignment and scoring algorithms.
//!
//! The comparison runs in two levels:
//!
//! - [`sequence`]: longest-matching-block alignment over any token type,
//!   used for word streams and for the code points of single words
//! - [`word_pair`]: character diff of one reference/hypothesis word pair,
//!   with error ranges merged by [`ranges`]
//! - [`boundaries`]: projection of verse boundaries from the reference
//!   word stream onto the hypothesis word stream
//! - [`scoring`]: character-level similarity ratio and its grade
//! - [`engine`]: the [`ComparisonEngine`] entry points tying it together
//!
//! ## Example
//!
//! ```rust
//! use recital_check::matching::engine::ComparisonEngine;
//! use recital_check::normalize::Normalizer;
//! use recital_check::Status;
//!
//! let normalizer = Normalizer::fallback();
//! let engine = ComparisonEngine::new(&normalizer);
//!
//! let report = engine.compare("الْحَمْدُ لِلَّهِ رَبِّ الْعَالَمِينَ", "الحمد لله رب العالمين");
//! assert_eq!(report.status, Status::Correct);
//! ```

pub mod boundaries;
pub mod engine;
pub mod ranges;
pub mod scoring;
pub mod sequence;
pub mod word_pair;

pub use engine::{CheckError, ComparisonConfig, ComparisonEngine};
pub use scoring::GradedScore;
pub use sequence::Operation;
pub use word_pair::{WordPairAligner, WordVerdict};

/// Convert a count to f64 for ratio calculations
#[inline]
pub(crate) fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}
