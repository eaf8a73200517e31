//! Projection of reference verse boundaries onto the hypothesis word stream.
//!
//! Word-level `Equal` and `Replace` operations over the full streams are the
//! evidence. A verse maps to the hypothesis range from the start of the first
//! evidence operation touching it to the end of the last one. Operations are
//! taken whole, so one long `Equal` block spanning several verses gives each
//! of them the block's full hypothesis range.
//!
//! Verses touched by no evidence (wholly deleted, or sitting in a gap) get a
//! proportional projection instead. That range is best-effort and may
//! overlap or run backwards relative to its neighbours.

use std::hash::Hash;

use crate::core::types::{OpKind, Span};
use crate::matching::sequence::{align, Operation};

/// Consecutive word ranges for verses of the given word counts
#[must_use]
pub fn boundaries_from_word_counts<I>(counts: I) -> Vec<Span>
where
    I: IntoIterator<Item = usize>,
{
    let mut start = 0;
    counts
        .into_iter()
        .map(|count| {
            let span = Span::new(start, start + count);
            start += count;
            span
        })
        .collect()
}

/// Map each verse boundary over `ref_words` to a range over `hyp_words`.
///
/// One output range per input boundary, in the same order.
#[must_use]
pub fn map_boundaries<T: Eq + Hash>(
    ref_words: &[T],
    hyp_words: &[T],
    verse_boundaries: &[Span],
) -> Vec<Span> {
    let operations = align(ref_words, hyp_words);
    project_boundaries(
        &operations,
        ref_words.len(),
        hyp_words.len(),
        verse_boundaries,
    )
}

/// Same as [`map_boundaries`], reusing an existing word-level alignment
#[must_use]
pub fn project_boundaries(
    operations: &[Operation],
    ref_len: usize,
    hyp_len: usize,
    verse_boundaries: &[Span],
) -> Vec<Span> {
    let evidence: Vec<&Operation> = operations
        .iter()
        .filter(|op| matches!(op.kind, OpKind::Equal | OpKind::Replace))
        .collect();

    verse_boundaries
        .iter()
        .map(|verse| {
            let mut touching = evidence.iter().filter(|op| op.ref_span.intersects(verse));

            match touching.next() {
                Some(first) => {
                    let last = touching.last().unwrap_or(first);
                    Span::new(first.hyp_span.start, last.hyp_span.end)
                }
                None => proportional(*verse, ref_len, hyp_len),
            }
        })
        .collect()
}

fn proportional(verse: Span, ref_len: usize, hyp_len: usize) -> Span {
    if ref_len == 0 {
        return Span::new(0, 0);
    }
    Span::new(verse.start * hyp_len / ref_len, verse.end * hyp_len / ref_len)
}
