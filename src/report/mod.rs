//! Comparison reports returned to callers.
//!
//! A [`ComparisonReport`] always carries the overall result. When the
//! reference is a list of verses it also carries a [`VerseBreakdown`] with
//! one [`VerseReport`] per verse.

pub mod builder;

use serde::{Deserialize, Serialize};

use crate::core::types::{Grade, OpKind, Span, Status};
use crate::matching::sequence::Operation;
use crate::matching::word_pair::WordVerdict;
use crate::normalize::NormalizationInfo;

pub use builder::ReportBuilder;

/// A non-equal word-level operation with the words it covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordDiff {
    pub kind: OpKind,
    pub ref_span: Span,
    pub hyp_span: Span,

    /// Reference words of the operation, space separated
    pub reference: String,

    /// Hypothesis words of the operation, space separated
    pub hypothesis: String,
}

/// Result for one verse of a multi-verse comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerseReport {
    pub number: u32,

    /// Verse text as found in the corpus
    pub text: String,
    pub normalized_text: String,

    /// Hypothesis words attributed to this verse, space separated
    pub hypothesis_slice: String,

    /// Range of the attributed words in the hypothesis word stream
    pub hypothesis_span: Span,

    pub ratio: f64,
    pub grade: Grade,

    pub word_operations: Vec<Operation>,
    pub words: Vec<WordVerdict>,

    /// Merged code-point ranges of `hypothesis_slice` that are wrong
    pub char_error_ranges: Vec<Span>,
}

/// Per-verse results plus aggregate counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerseBreakdown {
    pub verses: Vec<VerseReport>,
    pub correct_verses: usize,
    pub total_verses: usize,
    pub all_correct: bool,
}

impl VerseBreakdown {
    #[must_use]
    pub fn new(verses: Vec<VerseReport>) -> Self {
        let correct_verses = verses.iter().filter(|v| v.grade == Grade::Correct).count();
        let total_verses = verses.len();
        Self {
            verses,
            correct_verses,
            total_verses,
            all_correct: correct_verses == total_verses,
        }
    }
}

/// Full result of one comparison call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub status: Status,
    pub ratio: f64,
    pub score_percent: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verse: Option<u32>,

    /// Transcription exactly as received
    pub transcription: String,
    pub normalized_reference: String,
    pub normalized_hypothesis: String,

    pub word_operations: Vec<Operation>,

    /// The first non-equal word operations, capped by `max_word_diffs`
    pub word_diffs: Vec<WordDiff>,

    pub advice: String,
    pub normalization: NormalizationInfo,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<VerseBreakdown>,
}

impl ComparisonReport {
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }

    /// Count of word-level operations that are not `Equal`
    #[must_use]
    pub fn mistake_count(&self) -> usize {
        self.word_operations
            .iter()
            .filter(|op| op.kind != OpKind::Equal)
            .count()
    }

    #[must_use]
    pub fn with_location(mut self, chapter: u32, verse: Option<u32>) -> Self {
        self.chapter = Some(chapter);
        self.verse = verse;
        self
    }
}
