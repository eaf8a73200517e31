use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Chapter {0} not found in corpus")]
    ChapterNotFound(u32),

    #[error("Failed to read corpus: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse corpus: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid corpus: {0}")]
    Invalid(String),
}

/// Corpus version for compatibility checking
pub const CORPUS_VERSION: &str = "1.0.0";

/// Supplier of canonical verse texts, keyed by 1-based verse number
pub trait VerseSource: Send + Sync {
    /// # Errors
    ///
    /// Returns `CorpusError::ChapterNotFound` if the source has no such
    /// chapter, or another `CorpusError` if the source itself failed.
    fn verse_texts(&self, chapter: u32) -> Result<BTreeMap<u32, String>, CorpusError>;

    /// Display name of a chapter, if the source knows one
    fn chapter_name(&self, _chapter: u32) -> Option<String> {
        None
    }
}

/// One chapter as stored in the corpus file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterEntry {
    pub number: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Verse texts in order; verse `n` is at index `n - 1`
    pub verses: Vec<String>,
}

/// Serializable corpus format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusData {
    pub version: String,

    /// Orthography of the verse texts, e.g. "imlaei"
    pub script: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<String>,

    pub chapters: Vec<ChapterEntry>,
}

/// Verse texts by chapter, backed by a JSON document
#[derive(Debug)]
pub struct VerseCorpus {
    script: String,
    chapters: Vec<ChapterEntry>,

    /// Index: chapter number -> index in chapters vec
    number_to_index: HashMap<u32, usize>,
}

impl VerseCorpus {
    /// Load the embedded default corpus
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded document fails to parse.
    pub fn load_embedded() -> Result<Self, CorpusError> {
        // Embedded at compile time, validated by build.rs
        const EMBEDDED_CORPUS: &str = include_str!("../../corpus/quran_verses.json");
        Self::from_json(EMBEDDED_CORPUS)
    }

    /// Load a corpus from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid corpus.
    pub fn load_from_file(path: &Path) -> Result<Self, CorpusError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a corpus from a JSON string
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::Parse` for malformed JSON and
    /// `CorpusError::Invalid` for duplicate or out-of-range chapter numbers.
    pub fn from_json(json: &str) -> Result<Self, CorpusError> {
        let data: CorpusData = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != CORPUS_VERSION {
            warn!(
                expected = CORPUS_VERSION,
                found = %data.version,
                "Corpus version mismatch"
            );
        }

        let mut number_to_index = HashMap::with_capacity(data.chapters.len());
        for (index, chapter) in data.chapters.iter().enumerate() {
            if chapter.number == 0 {
                return Err(CorpusError::Invalid("chapter number 0".to_string()));
            }
            if number_to_index.insert(chapter.number, index).is_some() {
                return Err(CorpusError::Invalid(format!(
                    "duplicate chapter {}",
                    chapter.number
                )));
            }
        }

        Ok(Self {
            script: data.script,
            chapters: data.chapters,
            number_to_index,
        })
    }

    /// Export the corpus to JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, CorpusError> {
        let data = CorpusData {
            version: CORPUS_VERSION.to_string(),
            script: self.script.clone(),
            exported_at: Some(chrono::Utc::now().to_rfc3339()),
            chapters: self.chapters.clone(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Get a chapter entry by number
    #[must_use]
    pub fn get(&self, number: u32) -> Option<&ChapterEntry> {
        self.number_to_index
            .get(&number)
            .map(|&idx| &self.chapters[idx])
    }

    /// All chapters, in file order
    #[must_use]
    pub fn chapters(&self) -> &[ChapterEntry] {
        &self.chapters
    }

    #[must_use]
    pub fn script(&self) -> &str {
        &self.script
    }

    /// Number of chapters in the corpus
    #[must_use]
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }
}

impl VerseSource for VerseCorpus {
    fn verse_texts(&self, chapter: u32) -> Result<BTreeMap<u32, String>, CorpusError> {
        let entry = self
            .get(chapter)
            .ok_or(CorpusError::ChapterNotFound(chapter))?;

        Ok((1u32..).zip(entry.verses.iter().cloned()).collect())
    }

    fn chapter_name(&self, chapter: u32) -> Option<String> {
        self.get(chapter).and_then(|entry| entry.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_embedded_corpus() {
        let corpus = VerseCorpus::load_embedded().unwrap();
        assert!(!corpus.is_empty());
        assert_eq!(corpus.script(), "imlaei");

        let fatiha = corpus.get(1).unwrap();
        assert_eq!(fatiha.verses.len(), 7);
        assert_eq!(fatiha.name.as_deref(), Some("Al-Fatiha"));
    }

    #[test]
    fn test_verse_texts_are_numbered_from_one() {
        let corpus = VerseCorpus::load_embedded().unwrap();
        let texts = corpus.verse_texts(112).unwrap();

        assert_eq!(texts.len(), 4);
        assert_eq!(texts.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_unknown_chapter() {
        let corpus = VerseCorpus::load_embedded().unwrap();
        let result = corpus.verse_texts(200);
        assert!(matches!(result, Err(CorpusError::ChapterNotFound(200))));
        assert!(corpus.chapter_name(200).is_none());
    }

    #[test]
    fn test_duplicate_chapter_rejected() {
        let json = r#"{"version":"1.0.0","script":"imlaei","chapters":[
            {"number":1,"verses":["a"]},
            {"number":1,"verses":["b"]}
        ]}"#;
        let result = VerseCorpus::from_json(json);
        assert!(matches!(result, Err(CorpusError::Invalid(_))));
    }

    #[test]
    fn test_malformed_json() {
        let result = VerseCorpus::from_json("{not json");
        assert!(matches!(result, Err(CorpusError::Parse(_))));
    }

    #[test]
    fn test_corpus_to_json_round_trips() {
        let corpus = VerseCorpus::load_embedded().unwrap();
        let json = corpus.to_json().unwrap();

        assert!(json.contains("\"version\""));
        assert!(json.contains("\"exported_at\""));

        let reloaded = VerseCorpus::from_json(&json).unwrap();
        assert_eq!(reloaded.len(), corpus.len());
    }
}
