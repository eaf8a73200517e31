//! Verse corpus storage and caching.
//!
//! The corpus maps chapter numbers to ordered verse texts. An embedded
//! corpus is compiled into the binary, but custom corpora can also be
//! loaded from JSON files with the same layout:
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "script": "imlaei",
//!   "chapters": [
//!     { "number": 112, "name": "Al-Ikhlas", "verses": ["...", "..."] }
//!   ]
//! }
//! ```
//!
//! Engine entry points never read the corpus directly; they go through a
//! [`CorpusCache`] owned by the caller.
//!
//! ## Example
//!
//! ```rust
//! use recital_check::catalog::{CorpusCache, VerseCorpus};
//!
//! let corpus = VerseCorpus::load_embedded().unwrap();
//! let cache = CorpusCache::new(corpus);
//!
//! let ikhlas = cache.chapter(112).unwrap();
//! assert_eq!(ikhlas.len(), 4);
//! ```

pub mod cache;
pub mod store;

pub use cache::CorpusCache;
pub use store::{CorpusError, VerseCorpus, VerseSource};
