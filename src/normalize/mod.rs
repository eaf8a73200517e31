//! Arabic text canonicalization for comparison.
//!
//! Two strategies are available and one is chosen once, at startup:
//!
//! - **Preferred** ([`PreferredSettings`]): Unicode NFKC, then hamza, alef
//!   maksoora and taa marboota folding, then removal of small alef and all
//!   tashkeel. Requires the `preferred-normalizer` feature (on by default).
//! - **Fallback**: strips harakat and Quranic annotation marks, folds alef
//!   variants into bare alef and removes tatweel.
//!
//! Both collapse runs of whitespace into single spaces and trim, and both
//! are idempotent. The two strategies do not produce the same output for
//! the same input (e.g. `أحد` becomes `ءحد` vs `احد`), so reference and
//! hypothesis must always go through the same [`Normalizer`].
//!
//! ## Example
//!
//! ```rust
//! use recital_check::normalize::Normalizer;
//!
//! let normalizer = Normalizer::fallback();
//! assert_eq!(normalizer.normalize("بِسْمِ اللَّهِ"), "بسم الله");
//! ```

pub mod fallback;
pub mod preferred;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use preferred::PreferredSettings;

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Preferred normalizer unavailable: built without the `preferred-normalizer` feature")]
    Unavailable,
}

/// Which strategy produced a normalized text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizerKind {
    Preferred,
    Fallback,
}

/// Normalization description attached to reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationInfo {
    pub strategy: NormalizerKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<PreferredSettings>,
}

/// Text canonicalization strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalizer {
    Preferred(PreferredSettings),
    Fallback,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::detect()
    }
}

impl Normalizer {
    /// Preferred strategy with default settings when compiled in, otherwise
    /// the fallback.
    #[must_use]
    pub fn detect() -> Self {
        match Self::preferred(PreferredSettings::default()) {
            Ok(normalizer) => normalizer,
            Err(e) => {
                debug!(error = %e, "Using fallback normalizer");
                Self::Fallback
            }
        }
    }

    /// # Errors
    ///
    /// Returns `NormalizeError::Unavailable` if the crate was built without
    /// the `preferred-normalizer` feature.
    pub fn preferred(settings: PreferredSettings) -> Result<Self, NormalizeError> {
        if cfg!(feature = "preferred-normalizer") {
            Ok(Self::Preferred(settings))
        } else {
            Err(NormalizeError::Unavailable)
        }
    }

    #[must_use]
    pub fn fallback() -> Self {
        Self::Fallback
    }

    #[must_use]
    pub fn kind(&self) -> NormalizerKind {
        match self {
            Self::Preferred(_) => NormalizerKind::Preferred,
            Self::Fallback => NormalizerKind::Fallback,
        }
    }

    #[must_use]
    pub fn info(&self) -> NormalizationInfo {
        match self {
            Self::Preferred(settings) => NormalizationInfo {
                strategy: NormalizerKind::Preferred,
                settings: Some(*settings),
            },
            Self::Fallback => NormalizationInfo {
                strategy: NormalizerKind::Fallback,
                settings: None,
            },
        }
    }

    /// Canonicalize `text`. Total and idempotent.
    #[must_use]
    pub fn normalize(&self, text: &str) -> String {
        match self {
            Self::Preferred(settings) => preferred::normalize(text, settings),
            Self::Fallback => fallback::normalize(text),
        }
    }

    /// Normalize and split into words
    #[must_use]
    pub fn words(&self, text: &str) -> Vec<String> {
        self.normalize(text)
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ",
        "صِرَاطَ الَّذِينَ أَنْعَمْتَ عَلَيْهِمْ",
        "إِنَّ شَانِئَكَ هُوَ الْأَبْتَرُ",
        "  ۞ الـلـه   ",
        "",
    ];

    #[test]
    fn test_idempotent_both_strategies() {
        for normalizer in [Normalizer::detect(), Normalizer::fallback()] {
            for sample in SAMPLES {
                let once = normalizer.normalize(sample);
                assert_eq!(normalizer.normalize(&once), once, "{normalizer:?} on {sample}");
            }
        }
    }

    #[test]
    fn test_info_matches_strategy() {
        let info = Normalizer::fallback().info();
        assert_eq!(info.strategy, NormalizerKind::Fallback);
        assert!(info.settings.is_none());
    }

    #[cfg(feature = "preferred-normalizer")]
    #[test]
    fn test_detect_prefers_preferred() {
        assert_eq!(Normalizer::detect().kind(), NormalizerKind::Preferred);
        let info = Normalizer::detect().info();
        assert_eq!(info.settings, Some(PreferredSettings::default()));
    }

    #[cfg(not(feature = "preferred-normalizer"))]
    #[test]
    fn test_detect_falls_back() {
        assert!(Normalizer::preferred(PreferredSettings::default()).is_err());
        assert_eq!(Normalizer::detect(), Normalizer::Fallback);
    }

    #[test]
    fn test_words() {
        let words = Normalizer::fallback().words("قُلْ هُوَ  اللَّهُ");
        assert_eq!(words, vec!["قل", "هو", "الله"]);
    }
}
