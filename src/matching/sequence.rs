//! Longest-matching-block sequence alignment (Ratcliff/Obershelp).
//!
//! The aligner finds the longest common contiguous block of the two
//! sequences, then repeats on the regions before and after it. Gaps between
//! matched blocks become a single `replace`, `delete` or `insert` operation.
//! It works on any `Eq + Hash` token, so the same code aligns word streams
//! and the code points of a single word.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

use crate::core::types::{OpKind, Span};
use crate::matching::count_to_f64;

/// One typed correspondence between a reference range and a hypothesis range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub kind: OpKind,
    pub ref_span: Span,
    pub hyp_span: Span,
}

impl Operation {
    #[must_use]
    pub const fn new(kind: OpKind, ref_span: Span, hyp_span: Span) -> Self {
        Self {
            kind,
            ref_span,
            hyp_span,
        }
    }

    /// The reference tokens covered by this operation
    #[must_use]
    pub fn ref_slice<'a, T>(&self, reference: &'a [T]) -> &'a [T] {
        &reference[self.ref_span.start..self.ref_span.end]
    }

    /// The hypothesis tokens covered by this operation
    #[must_use]
    pub fn hyp_slice<'a, T>(&self, hypothesis: &'a [T]) -> &'a [T] {
        &hypothesis[self.hyp_span.start..self.hyp_span.end]
    }
}

/// `reference[ref_start..ref_start + len] == hypothesis[hyp_start..hyp_start + len]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchingBlock {
    pub ref_start: usize,
    pub hyp_start: usize,
    pub len: usize,
}

/// Positions of every token in the hypothesis, ascending
struct HypothesisIndex<'a, T> {
    positions: HashMap<&'a T, Vec<usize>>,
}

impl<'a, T: Eq + Hash> HypothesisIndex<'a, T> {
    fn new(hypothesis: &'a [T]) -> Self {
        let mut positions: HashMap<&'a T, Vec<usize>> = HashMap::new();
        for (j, token) in hypothesis.iter().enumerate() {
            positions.entry(token).or_default().push(j);
        }
        Self { positions }
    }

    /// Longest block inside `reference[r_lo..r_hi]` x `hypothesis[h_lo..h_hi]`.
    ///
    /// Ties go to the block starting earliest in the reference, then earliest
    /// in the hypothesis.
    fn longest_match(
        &self,
        reference: &[T],
        r_lo: usize,
        r_hi: usize,
        h_lo: usize,
        h_hi: usize,
    ) -> Option<MatchingBlock> {
        let mut best = MatchingBlock {
            ref_start: r_lo,
            hyp_start: h_lo,
            len: 0,
        };

        // run_len[j]: length of the common run ending at reference[i - 1] and hypothesis[j]
        let mut run_len: HashMap<usize, usize> = HashMap::new();

        for (i, token) in reference.iter().enumerate().take(r_hi).skip(r_lo) {
            let mut next_run_len: HashMap<usize, usize> = HashMap::new();

            if let Some(positions) = self.positions.get(token) {
                for &j in positions {
                    if j < h_lo {
                        continue;
                    }
                    if j >= h_hi {
                        break;
                    }

                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| run_len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_run_len.insert(j, k);

                    if k > best.len {
                        best = MatchingBlock {
                            ref_start: i + 1 - k,
                            hyp_start: j + 1 - k,
                            len: k,
                        };
                    }
                }
            }

            run_len = next_run_len;
        }

        (best.len > 0).then_some(best)
    }
}

/// The matching blocks of two sequences, from which operations and the
/// similarity ratio are derived.
#[derive(Debug, Clone)]
pub struct SequenceAlignment {
    ref_len: usize,
    hyp_len: usize,
    blocks: Vec<MatchingBlock>,
}

impl SequenceAlignment {
    #[must_use]
    pub fn compute<T: Eq + Hash>(reference: &[T], hypothesis: &[T]) -> Self {
        let index = HypothesisIndex::new(hypothesis);
        let mut blocks = Vec::new();

        // Work stack of (r_lo, r_hi, h_lo, h_hi) windows still to search.
        // A stack instead of recursion keeps long chapters off the call stack.
        let mut pending = vec![(0, reference.len(), 0, hypothesis.len())];

        while let Some((r_lo, r_hi, h_lo, h_hi)) = pending.pop() {
            let Some(block) = index.longest_match(reference, r_lo, r_hi, h_lo, h_hi) else {
                continue;
            };

            if r_lo < block.ref_start && h_lo < block.hyp_start {
                pending.push((r_lo, block.ref_start, h_lo, block.hyp_start));
            }

            let r_end = block.ref_start + block.len;
            let h_end = block.hyp_start + block.len;
            if r_end < r_hi && h_end < h_hi {
                pending.push((r_end, r_hi, h_end, h_hi));
            }

            blocks.push(block);
        }

        blocks.sort_unstable();

        Self {
            ref_len: reference.len(),
            hyp_len: hypothesis.len(),
            blocks: coalesce(blocks),
        }
    }

    /// Matched blocks in increasing order; adjacent blocks are already joined
    #[must_use]
    pub fn blocks(&self) -> &[MatchingBlock] {
        &self.blocks
    }

    /// Total number of tokens inside matched blocks
    #[must_use]
    pub fn matched_len(&self) -> usize {
        self.blocks.iter().map(|b| b.len).sum()
    }

    /// `2 * M / (len(ref) + len(hyp))`, or 1.0 when both are empty
    #[must_use]
    pub fn ratio(&self) -> f64 {
        let total = self.ref_len + self.hyp_len;
        if total == 0 {
            return 1.0;
        }
        2.0 * count_to_f64(self.matched_len()) / count_to_f64(total)
    }

    /// Ordered operations covering both sequences exactly once
    #[must_use]
    pub fn operations(&self) -> Vec<Operation> {
        let mut ops = Vec::with_capacity(self.blocks.len() * 2 + 1);
        let (mut i, mut j) = (0, 0);

        let end = MatchingBlock {
            ref_start: self.ref_len,
            hyp_start: self.hyp_len,
            len: 0,
        };

        for block in self.blocks.iter().chain(std::iter::once(&end)) {
            let gap_kind = match (i < block.ref_start, j < block.hyp_start) {
                (true, true) => Some(OpKind::Replace),
                (true, false) => Some(OpKind::Delete),
                (false, true) => Some(OpKind::Insert),
                (false, false) => None,
            };

            if let Some(kind) = gap_kind {
                ops.push(Operation::new(
                    kind,
                    Span::new(i, block.ref_start),
                    Span::new(j, block.hyp_start),
                ));
            }

            i = block.ref_start + block.len;
            j = block.hyp_start + block.len;

            if block.len > 0 {
                ops.push(Operation::new(
                    OpKind::Equal,
                    Span::new(block.ref_start, i),
                    Span::new(block.hyp_start, j),
                ));
            }
        }

        ops
    }
}

fn coalesce(blocks: Vec<MatchingBlock>) -> Vec<MatchingBlock> {
    let mut merged: Vec<MatchingBlock> = Vec::with_capacity(blocks.len());
    for block in blocks {
        if let Some(last) = merged.last_mut() {
            if last.ref_start + last.len == block.ref_start
                && last.hyp_start + last.len == block.hyp_start
            {
                last.len += block.len;
                continue;
            }
        }
        merged.push(block);
    }
    merged
}

/// Align two token sequences
#[must_use]
pub fn align<T: Eq + Hash>(reference: &[T], hypothesis: &[T]) -> Vec<Operation> {
    SequenceAlignment::compute(reference, hypothesis).operations()
}

/// Similarity ratio of two token sequences
#[must_use]
pub fn ratio<T: Eq + Hash>(reference: &[T], hypothesis: &[T]) -> f64 {
    SequenceAlignment::compute(reference, hypothesis).ratio()
}

/// Character-level similarity ratio of two strings (code points, spaces included)
#[must_use]
pub fn char_ratio(reference: &str, hypothesis: &str) -> f64 {
    let r: Vec<char> = reference.chars().collect();
    let h: Vec<char> = hypothesis.chars().collect();
    ratio(&r, &h)
}
