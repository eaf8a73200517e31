use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::cache::CorpusCache;
use crate::catalog::store::CorpusError;
use crate::core::verse::Verse;
use crate::normalize::Normalizer;
use crate::report::{ComparisonReport, ReportBuilder};
use crate::transcribe::{failure_message, is_failure};

/// The opening formula; verse 1 of most chapters in numbered corpora
pub const BASMALAH: &str = "بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ";

/// Default cap on `word_diffs` entries in a report
pub const DEFAULT_MAX_WORD_DIFFS: usize = 5;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error("Verse {verse} not found in chapter {chapter}")]
    VerseNotFound { chapter: u32, verse: u32 },
}

/// Configuration for the comparison engine
#[derive(Debug, Clone)]
pub struct ComparisonConfig {
    /// Maximum number of non-equal word operations listed in `word_diffs`
    pub max_word_diffs: usize,

    /// Leave out a leading basmalah verse when checking a whole chapter
    pub exclude_basmalah: bool,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            max_word_diffs: DEFAULT_MAX_WORD_DIFFS,
            exclude_basmalah: true,
        }
    }
}

/// Entry points comparing a transcription against reference text
pub struct ComparisonEngine<'a> {
    normalizer: &'a Normalizer,
    config: ComparisonConfig,
}

impl<'a> ComparisonEngine<'a> {
    /// Create an engine with default configuration
    #[must_use]
    pub fn new(normalizer: &'a Normalizer) -> Self {
        Self {
            normalizer,
            config: ComparisonConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(normalizer: &'a Normalizer, config: ComparisonConfig) -> Self {
        Self { normalizer, config }
    }

    #[must_use]
    pub fn config(&self) -> &ComparisonConfig {
        &self.config
    }

    /// Overall comparison of `transcription` against one reference text.
    ///
    /// Either side may be empty: two empty texts compare as identical, and
    /// an empty side against a non-empty one scores zero.
    #[must_use]
    pub fn compare(&self, reference: &str, transcription: &str) -> ComparisonReport {
        let builder = self.builder();
        if is_failure(transcription) {
            return self.failed(&builder, transcription);
        }
        builder.overall(reference, transcription)
    }

    /// Overall comparison plus a per-verse breakdown
    #[must_use]
    pub fn compare_verses(&self, verses: &[Verse], transcription: &str) -> ComparisonReport {
        let builder = self.builder();
        if is_failure(transcription) {
            return self.failed(&builder, transcription);
        }
        builder.with_verses(verses, transcription)
    }

    /// Check a recitation of a single verse
    ///
    /// # Errors
    ///
    /// Returns an error if the chapter cannot be loaded or has no such verse.
    pub fn check_verse(
        &self,
        cache: &CorpusCache,
        chapter: u32,
        verse: u32,
        transcription: &str,
    ) -> Result<ComparisonReport, CheckError> {
        let loaded = cache.chapter(chapter)?;
        let found = loaded
            .verse(verse)
            .ok_or(CheckError::VerseNotFound { chapter, verse })?;

        debug!(chapter, verse, "Checking verse");
        Ok(self
            .compare(&found.text, transcription)
            .with_location(chapter, Some(verse)))
    }

    /// Check a recitation of a whole chapter, with a per-verse breakdown
    ///
    /// # Errors
    ///
    /// Returns an error if the chapter cannot be loaded.
    pub fn check_chapter(
        &self,
        cache: &CorpusCache,
        chapter: u32,
        transcription: &str,
    ) -> Result<ComparisonReport, CheckError> {
        let loaded = cache.chapter(chapter)?;

        let skip_first = self.config.exclude_basmalah
            && loaded.len() > 1
            && loaded
                .verses
                .first()
                .is_some_and(|first| self.is_basmalah(&first.text));
        let verses = if skip_first {
            &loaded.verses[1..]
        } else {
            &loaded.verses[..]
        };

        debug!(
            chapter,
            verses = verses.len(),
            basmalah_excluded = skip_first,
            "Checking chapter"
        );
        Ok(self
            .compare_verses(verses, transcription)
            .with_location(chapter, None))
    }

    /// True if `text` normalizes to the basmalah formula
    #[must_use]
    pub fn is_basmalah(&self, text: &str) -> bool {
        self.normalizer.normalize(text) == self.normalizer.normalize(BASMALAH)
    }

    fn builder(&self) -> ReportBuilder<'a> {
        ReportBuilder::new(self.normalizer, self.config.max_word_diffs)
    }

    fn failed(&self, builder: &ReportBuilder<'_>, transcription: &str) -> ComparisonReport {
        let message = failure_message(transcription);
        warn!(message = %message, "Transcriber reported a failure");
        builder.failure(&message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::store::VerseCorpus;
    use crate::core::types::{OpKind, Status};

    fn make_test_cache() -> CorpusCache {
        CorpusCache::new(VerseCorpus::load_embedded().unwrap())
    }

    #[test]
    fn test_compare_identical() {
        let normalizer = Normalizer::fallback();
        let engine = ComparisonEngine::new(&normalizer);

        let report = engine.compare("الحمد لله رب العالمين", "الحمد لله رب العالمين");
        assert_eq!(report.status, Status::Correct);
        assert!((report.ratio - 1.0).abs() < f64::EPSILON);
        assert!(report
            .word_operations
            .iter()
            .all(|op| op.kind == OpKind::Equal));
    }

    #[test]
    fn test_compare_empty_inputs() {
        let normalizer = Normalizer::fallback();
        let engine = ComparisonEngine::new(&normalizer);

        // Diacritics only: both sides normalize to nothing
        let report = engine.compare("  َ ", "");
        assert_eq!(report.status, Status::Correct);
        assert!((report.ratio - 1.0).abs() < f64::EPSILON);
        assert!(report.word_operations.is_empty());

        let report = engine.compare("", "قل");
        assert_eq!(report.status, Status::Incorrect);
        assert!(report.ratio.abs() < f64::EPSILON);
        assert_eq!(report.word_operations.len(), 1);
        assert_eq!(report.word_operations[0].kind, OpKind::Insert);

        let report = engine.compare("قل هو", "");
        assert_eq!(report.status, Status::Incorrect);
        assert_eq!(report.word_diffs[0].kind, OpKind::Delete);
    }

    #[test]
    fn test_compare_verses_with_empty_transcription() {
        let normalizer = Normalizer::fallback();
        let engine = ComparisonEngine::new(&normalizer);
        let verses = vec![Verse::new(1, "قل هو الله احد"), Verse::new(2, "الله الصمد")];

        let report = engine.compare_verses(&verses, "");
        assert_eq!(report.status, Status::Incorrect);
        let breakdown = report.breakdown.expect("breakdown");
        assert_eq!(breakdown.total_verses, 2);
        assert_eq!(breakdown.correct_verses, 0);
        assert!(breakdown.verses.iter().all(|v| v.hypothesis_slice.is_empty()));
    }

    #[test]
    fn test_transcription_failure_is_a_status() {
        let normalizer = Normalizer::fallback();
        let engine = ComparisonEngine::new(&normalizer);

        let report = engine.compare("قل هو الله احد", "❌ model offline");
        assert_eq!(report.status, Status::Error);
        assert!(report.ratio.abs() < f64::EPSILON);
        assert_eq!(report.error.as_deref(), Some("[ERROR] model offline"));
        assert_eq!(report.transcription, "[ERROR] model offline");
    }

    #[test]
    fn test_check_verse() {
        let normalizer = Normalizer::fallback();
        let engine = ComparisonEngine::new(&normalizer);
        let cache = make_test_cache();

        let report = engine
            .check_verse(&cache, 112, 2, "الله الصمد")
            .unwrap();
        assert_eq!(report.status, Status::Correct);
        assert_eq!(report.chapter, Some(112));
        assert_eq!(report.verse, Some(2));
        assert!(report.breakdown.is_none());
    }

    #[test]
    fn test_check_verse_not_found() {
        let normalizer = Normalizer::fallback();
        let engine = ComparisonEngine::new(&normalizer);
        let cache = make_test_cache();

        let result = engine.check_verse(&cache, 112, 9, "الله الصمد");
        assert!(matches!(
            result,
            Err(CheckError::VerseNotFound {
                chapter: 112,
                verse: 9
            })
        ));

        let result = engine.check_verse(&cache, 2, 1, "الم");
        assert!(matches!(
            result,
            Err(CheckError::Corpus(CorpusError::ChapterNotFound(2)))
        ));
    }

    #[test]
    fn test_check_chapter_excludes_basmalah() {
        let normalizer = Normalizer::fallback();
        let engine = ComparisonEngine::new(&normalizer);
        let cache = make_test_cache();

        let report = engine
            .check_chapter(
                &cache,
                1,
                "الحمد لله رب العالمين الرحمن الرحيم مالك يوم الدين \
                 اياك نعبد واياك نستعين اهدنا الصراط المستقيم \
                 صراط الذين انعمت عليهم غير المغضوب عليهم ولا الضالين",
            )
            .unwrap();

        assert_eq!(report.status, Status::Correct);
        let breakdown = report.breakdown.expect("breakdown");
        assert_eq!(breakdown.total_verses, 6);
        assert_eq!(breakdown.verses[0].number, 2);
    }

    #[test]
    fn test_check_chapter_keeps_basmalah_when_configured() {
        let normalizer = Normalizer::fallback();
        let config = ComparisonConfig {
            exclude_basmalah: false,
            ..ComparisonConfig::default()
        };
        let engine = ComparisonEngine::with_config(&normalizer, config);
        let cache = make_test_cache();

        let report = engine.check_chapter(&cache, 1, "بسم الله الرحمن الرحيم").unwrap();
        let breakdown = report.breakdown.expect("breakdown");
        assert_eq!(breakdown.total_verses, 7);
        assert_eq!(breakdown.verses[0].number, 1);
        assert_eq!(breakdown.correct_verses, 1);
    }

    #[test]
    fn test_check_chapter_without_basmalah_verse() {
        let normalizer = Normalizer::fallback();
        let engine = ComparisonEngine::new(&normalizer);
        let cache = make_test_cache();

        let report = engine
            .check_chapter(&cache, 112, "قل هو الله احد الله الصمد لم يلد ولم يولد ولم يكن له كفوا احد")
            .unwrap();
        assert_eq!(report.status, Status::Correct);
        let breakdown = report.breakdown.expect("breakdown");
        assert_eq!(breakdown.total_verses, 4);
        assert_eq!(breakdown.verses[0].number, 1);
    }

    #[test]
    fn test_is_basmalah() {
        let normalizer = Normalizer::detect();
        let engine = ComparisonEngine::new(&normalizer);
        assert!(engine.is_basmalah("بسم الله الرحمن الرحيم"));
        assert!(!engine.is_basmalah("قل هو الله احد"));
    }
}
