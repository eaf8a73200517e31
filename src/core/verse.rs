use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One numbered verse (ayah) of a chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    /// 1-based verse number within its chapter
    pub number: u32,
    pub text: String,
}

impl Verse {
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// An ordered list of verses belonging to one chapter (surah)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub number: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub verses: Vec<Verse>,
}

impl Chapter {
    /// Build a chapter from a verse-number -> text mapping.
    /// Iteration order of the map is the verse order.
    #[must_use]
    pub fn from_texts(number: u32, texts: BTreeMap<u32, String>) -> Self {
        let verses = texts
            .into_iter()
            .map(|(n, text)| Verse::new(n, text))
            .collect();
        Self {
            number,
            name: None,
            verses,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn verse(&self, number: u32) -> Option<&Verse> {
        self.verses.iter().find(|v| v.number == number)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.verses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    /// All verse texts joined with single spaces
    #[must_use]
    pub fn full_text(&self) -> String {
        self.verses
            .iter()
            .map(|v| v.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
