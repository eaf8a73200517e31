use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::catalog::store::{CorpusError, VerseSource};
use crate::core::verse::Chapter;

/// Lazily populated chapter cache over a [`VerseSource`].
///
/// A chapter is loaded from the source on first access and kept for the
/// lifetime of the cache. Two threads racing on the same chapter may both
/// load it; the first insert wins and both get identical verses.
pub struct CorpusCache {
    source: Box<dyn VerseSource>,
    chapters: RwLock<HashMap<u32, Arc<Chapter>>>,
}

impl CorpusCache {
    pub fn new(source: impl VerseSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            chapters: RwLock::new(HashMap::new()),
        }
    }

    /// The verses of `number`, loading them on first access
    ///
    /// # Errors
    ///
    /// Returns the source's error if the chapter is not cached and cannot be
    /// loaded. Failed loads are not cached.
    pub fn chapter(&self, number: u32) -> Result<Arc<Chapter>, CorpusError> {
        if let Some(chapter) = self.cached(number) {
            return Ok(chapter);
        }

        // Load outside the lock; the source may be slow
        let texts = self.source.verse_texts(number)?;
        let mut chapter = Chapter::from_texts(number, texts);
        if let Some(name) = self.source.chapter_name(number) {
            chapter = chapter.with_name(name);
        }
        info!(chapter = number, verses = chapter.len(), "Loaded chapter");

        let mut chapters = self
            .chapters
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(
            chapters.entry(number).or_insert_with(|| Arc::new(chapter)),
        ))
    }

    /// The underlying verse source
    #[must_use]
    pub fn source(&self) -> &dyn VerseSource {
        self.source.as_ref()
    }

    /// Number of chapters loaded so far
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.chapters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn cached(&self, number: u32) -> Option<Arc<Chapter>> {
        self.chapters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&number)
            .cloned()
    }
}
