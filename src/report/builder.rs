use tracing::debug;

use crate::core::types::{OpKind, Span, Status};
use crate::core::verse::Verse;
use crate::matching::boundaries::{boundaries_from_word_counts, project_boundaries};
use crate::matching::ranges::merge;
use crate::matching::scoring::grade;
use crate::matching::sequence::{align, Operation};
use crate::matching::word_pair::{WordPairAligner, WordVerdict};
use crate::normalize::Normalizer;
use crate::report::{ComparisonReport, VerseBreakdown, VerseReport, WordDiff};

/// Assembles comparison reports from normalized texts and alignments
pub struct ReportBuilder<'a> {
    normalizer: &'a Normalizer,
    max_word_diffs: usize,
}

/// One verse after normalization, with its words
struct NormalizedVerse<'v> {
    verse: &'v Verse,
    words: Vec<String>,
}

impl<'a> ReportBuilder<'a> {
    #[must_use]
    pub fn new(normalizer: &'a Normalizer, max_word_diffs: usize) -> Self {
        Self {
            normalizer,
            max_word_diffs,
        }
    }

    /// Report for a transcription the transcriber marked as failed.
    ///
    /// Nothing is aligned; `message` becomes both the transcription and the
    /// error.
    #[must_use]
    pub fn failure(&self, message: &str) -> ComparisonReport {
        ComparisonReport {
            status: Status::Error,
            ratio: 0.0,
            score_percent: 0.0,
            chapter: None,
            verse: None,
            transcription: message.to_string(),
            normalized_reference: String::new(),
            normalized_hypothesis: String::new(),
            word_operations: Vec::new(),
            word_diffs: Vec::new(),
            advice: Status::Error.advice().to_string(),
            normalization: self.normalizer.info(),
            error: Some(message.to_string()),
            breakdown: None,
        }
    }

    /// Overall report of `transcription` against a single reference text
    #[must_use]
    pub fn overall(&self, reference: &str, transcription: &str) -> ComparisonReport {
        let ref_words = self.normalizer.words(reference);
        let (report, _) = self.overall_from_words(&ref_words, transcription);
        report
    }

    /// Overall report plus a per-verse breakdown
    #[must_use]
    pub fn with_verses(&self, verses: &[Verse], transcription: &str) -> ComparisonReport {
        let normalized: Vec<NormalizedVerse<'_>> = verses
            .iter()
            .map(|verse| NormalizedVerse {
                verse,
                words: self.normalizer.words(&verse.text),
            })
            .collect();

        // The reference stream is the concatenation of the normalized verses,
        // so boundaries from their word counts index it directly.
        let ref_words: Vec<String> = normalized
            .iter()
            .flat_map(|v| v.words.iter().cloned())
            .collect();
        let boundaries = boundaries_from_word_counts(normalized.iter().map(|v| v.words.len()));

        let (mut report, hyp_words) = self.overall_from_words(&ref_words, transcription);
        let hyp_spans = project_boundaries(
            &report.word_operations,
            ref_words.len(),
            hyp_words.len(),
            &boundaries,
        );

        let verse_reports = normalized
            .iter()
            .zip(hyp_spans)
            .map(|(verse, span)| self.verse_report(verse, &hyp_words, span))
            .collect();

        report.breakdown = Some(VerseBreakdown::new(verse_reports));
        report
    }

    fn overall_from_words(
        &self,
        ref_words: &[String],
        transcription: &str,
    ) -> (ComparisonReport, Vec<String>) {
        let hyp_words = self.normalizer.words(transcription);
        let normalized_reference = ref_words.join(" ");
        let normalized_hypothesis = hyp_words.join(" ");

        let score = grade(&normalized_reference, &normalized_hypothesis);
        let word_operations = align(ref_words, &hyp_words);
        let word_diffs = word_operations
            .iter()
            .filter(|op| op.kind != OpKind::Equal)
            .take(self.max_word_diffs)
            .map(|op| word_diff(op, ref_words, &hyp_words))
            .collect();

        debug!(
            ref_words = ref_words.len(),
            hyp_words = hyp_words.len(),
            ratio = score.ratio,
            "Aligned recitation"
        );

        let status = Status::from(score.grade);
        let report = ComparisonReport {
            status,
            ratio: score.ratio,
            score_percent: score.percent(),
            chapter: None,
            verse: None,
            transcription: transcription.to_string(),
            normalized_reference,
            normalized_hypothesis,
            word_operations,
            word_diffs,
            advice: status.advice().to_string(),
            normalization: self.normalizer.info(),
            error: None,
            breakdown: None,
        };

        (report, hyp_words)
    }

    fn verse_report(
        &self,
        verse: &NormalizedVerse<'_>,
        hyp_words: &[String],
        span: Span,
    ) -> VerseReport {
        let slice_words: &[String] = hyp_words.get(span.start..span.end).unwrap_or_default();
        let normalized_text = verse.words.join(" ");
        let hypothesis_slice = slice_words.join(" ");

        let score = grade(&normalized_text, &hypothesis_slice);

        let aligner = WordPairAligner::new(self.normalizer);
        let (word_operations, words) = aligner.align_words(&verse.words, slice_words);
        let char_error_ranges = slice_error_ranges(&words, slice_words);

        VerseReport {
            number: verse.verse.number,
            text: verse.verse.text.clone(),
            normalized_text,
            hypothesis_slice,
            hypothesis_span: span,
            ratio: score.ratio,
            grade: score.grade,
            word_operations,
            words,
            char_error_ranges,
        }
    }
}

fn word_diff(op: &Operation, ref_words: &[String], hyp_words: &[String]) -> WordDiff {
    WordDiff {
        kind: op.kind,
        ref_span: op.ref_span,
        hyp_span: op.hyp_span,
        reference: op.ref_slice(ref_words).join(" "),
        hypothesis: op.hyp_slice(hyp_words).join(" "),
    }
}

/// Shift per-word error ranges to code-point offsets within the words joined
/// by single spaces, then merge.
fn slice_error_ranges(words: &[WordVerdict], slice_words: &[String]) -> Vec<Span> {
    let mut offsets = Vec::with_capacity(slice_words.len());
    let mut offset = 0;
    for word in slice_words {
        offsets.push(offset);
        offset += word.chars().count() + 1;
    }

    let ranges = words
        .iter()
        .filter_map(|verdict| {
            let start = offsets.get(verdict.hyp_index?)?;
            Some(verdict.hyp_error_ranges.iter().map(move |r| r.shifted(*start)))
        })
        .flatten()
        .collect();

    merge(ranges)
}
