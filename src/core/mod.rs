//! Core data types shared by the normalizer, aligner and report builder.
//!
//! - [`Span`](types::Span): half-open index range used for operation spans, verse
//!   boundaries and character error intervals
//! - [`OpKind`](types::OpKind): `equal` / `replace` / `delete` / `insert`
//! - [`Grade`](types::Grade), [`Status`](types::Status): result classification
//! - [`Verse`](verse::Verse), [`Chapter`](verse::Chapter): reference text as served by the verse corpus
//!
//! Spans always index *normalized* token streams. Character spans count
//! Unicode scalar values, not bytes.

pub mod types;
pub mod verse;
