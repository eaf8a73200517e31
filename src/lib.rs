//! # recital-check
//!
//! A library for grading Quran recitation transcripts against the canonical
//! verse text.
//!
//! An automatic transcription of a recitation rarely matches the written
//! text character for character: diacritics are missing, hamza forms vary,
//! and a reciter may skip or repeat words. `recital-check` normalizes both
//! texts, aligns them word by word and letter by letter, and reports how
//! close the recitation was and where it went wrong.
//!
//! ## Features
//!
//! - **Normalization**: Folds diacritics, alef and hamza variants so that
//!   only meaningful differences remain
//! - **Word alignment**: Lists the replaced, missing and extra words
//! - **Letter alignment**: Marks the wrong letters inside each word
//! - **Verse breakdown**: Splits a whole-chapter recitation into verses and
//!   grades each one
//! - **Grading**: `correct` from 92% similarity, `partial` from 70%
//!
//! ## Example
//!
//! ```rust
//! use recital_check::{ComparisonEngine, CorpusCache, Normalizer, Status, VerseCorpus};
//!
//! // Load the embedded corpus behind a cache
//! let cache = CorpusCache::new(VerseCorpus::load_embedded().unwrap());
//! let normalizer = Normalizer::detect();
//!
//! // Check a recitation of chapter 112, verse 1
//! let engine = ComparisonEngine::new(&normalizer);
//! let report = engine
//!     .check_verse(&cache, 112, 1, "قل هو الله أحد")
//!     .unwrap();
//!
//! assert_eq!(report.status, Status::Correct);
//! println!("{:.2}%: {}", report.score_percent, report.advice);
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Verse corpus storage and caching
//! - [`core`]: Core data types for spans, grades and verses
//! - [`normalize`]: Arabic text canonicalization
//! - [`matching`]: Alignment, scoring and the comparison engine
//! - [`report`]: Comparison reports
//! - [`transcribe`]: Client for the speech-to-text endpoint
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: HTTP API

pub mod catalog;
pub mod cli;
pub mod core;
pub mod matching;
pub mod normalize;
pub mod report;
pub mod transcribe;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use catalog::{CorpusCache, VerseCorpus, VerseSource};
pub use core::types::*;
pub use core::verse::{Chapter, Verse};
pub use matching::engine::{CheckError, ComparisonConfig, ComparisonEngine};
pub use normalize::Normalizer;
pub use report::ComparisonReport;
