use serde::{Deserialize, Serialize};

use crate::core::types::{OpKind, Span};
use crate::matching::ranges::merge;
use crate::matching::sequence::{align, Operation};
use crate::normalize::Normalizer;

/// A character-level operation inside one word pair, with the covered text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharOperation {
    #[serde(flatten)]
    pub operation: Operation,
    pub ref_text: String,
    pub hyp_text: String,
}

/// Verdict for one reference/hypothesis word pair (or a one-sided word)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordVerdict {
    pub kind: OpKind,

    /// Index into the reference word stream, `None` for an inserted word
    pub ref_index: Option<usize>,

    /// Index into the hypothesis word stream, `None` for a missing word
    pub hyp_index: Option<usize>,

    pub ref_word: String,
    pub hyp_word: String,
    pub ref_normalized: String,
    pub hyp_normalized: String,

    pub char_operations: Vec<CharOperation>,

    /// Merged code-point ranges of the normalized hypothesis word that are wrong
    pub hyp_error_ranges: Vec<Span>,

    /// True when letters of the reference word are absent from the hypothesis
    pub has_missing: bool,
}

/// Character-level diff of word pairs
pub struct WordPairAligner<'a> {
    normalizer: &'a Normalizer,
}

impl<'a> WordPairAligner<'a> {
    #[must_use]
    pub fn new(normalizer: &'a Normalizer) -> Self {
        Self { normalizer }
    }

    /// Compare one reference word with one hypothesis word.
    ///
    /// An empty `hyp_word` means the word was not said at all: the verdict is
    /// `Delete` with `has_missing` set and no character diff.
    #[must_use]
    pub fn align_pair(
        &self,
        ref_word: &str,
        hyp_word: &str,
        ref_index: Option<usize>,
        hyp_index: Option<usize>,
    ) -> WordVerdict {
        let ref_normalized = self.normalizer.normalize(ref_word);

        if hyp_word.is_empty() {
            return WordVerdict {
                kind: OpKind::Delete,
                ref_index,
                hyp_index,
                ref_word: ref_word.to_string(),
                hyp_word: String::new(),
                ref_normalized,
                hyp_normalized: String::new(),
                char_operations: Vec::new(),
                hyp_error_ranges: Vec::new(),
                has_missing: true,
            };
        }

        let hyp_normalized = self.normalizer.normalize(hyp_word);
        let ref_chars: Vec<char> = ref_normalized.chars().collect();
        let hyp_chars: Vec<char> = hyp_normalized.chars().collect();

        let mut char_operations = Vec::new();
        let mut error_ranges = Vec::new();
        let mut has_missing = false;

        for operation in align(&ref_chars, &hyp_chars) {
            match operation.kind {
                OpKind::Replace | OpKind::Insert if !operation.hyp_span.is_empty() => {
                    error_ranges.push(operation.hyp_span);
                }
                OpKind::Delete => has_missing = true,
                _ => {}
            }

            char_operations.push(CharOperation {
                operation,
                ref_text: operation.ref_slice(&ref_chars).iter().collect(),
                hyp_text: operation.hyp_slice(&hyp_chars).iter().collect(),
            });
        }

        let hyp_error_ranges = merge(error_ranges);
        let kind = if hyp_error_ranges.is_empty() && !has_missing {
            OpKind::Equal
        } else {
            OpKind::Replace
        };

        WordVerdict {
            kind,
            ref_index,
            hyp_index,
            ref_word: ref_word.to_string(),
            hyp_word: hyp_word.to_string(),
            ref_normalized,
            hyp_normalized,
            char_operations,
            hyp_error_ranges,
            has_missing,
        }
    }

    /// Expand one word-level operation into per-word verdicts.
    ///
    /// Words are paired offset by offset; where one side runs out its partner
    /// is the empty word. Verdicts from an `Insert` or `Delete` operation keep
    /// that kind whatever the character diff says.
    #[must_use]
    pub fn align_operation<S: AsRef<str>>(
        &self,
        operation: &Operation,
        ref_words: &[S],
        hyp_words: &[S],
    ) -> Vec<WordVerdict> {
        let ref_slice = operation.ref_slice(ref_words);
        let hyp_slice = operation.hyp_slice(hyp_words);
        let pairs = ref_slice.len().max(hyp_slice.len());

        (0..pairs)
            .map(|offset| {
                let ref_word = ref_slice.get(offset).map_or("", |w| w.as_ref());
                let hyp_word = hyp_slice.get(offset).map_or("", |w| w.as_ref());
                let ref_index = (!ref_word.is_empty()).then(|| operation.ref_span.start + offset);
                let hyp_index = (!hyp_word.is_empty()).then(|| operation.hyp_span.start + offset);

                let mut verdict = self.align_pair(ref_word, hyp_word, ref_index, hyp_index);
                if matches!(operation.kind, OpKind::Insert | OpKind::Delete) {
                    verdict.kind = operation.kind;
                }
                verdict
            })
            .collect()
    }

    /// Align two word streams and expand every operation into verdicts
    #[must_use]
    pub fn align_words<S: AsRef<str>>(
        &self,
        ref_words: &[S],
        hyp_words: &[S],
    ) -> (Vec<Operation>, Vec<WordVerdict>) {
        let ref_keys: Vec<&str> = ref_words.iter().map(|w| w.as_ref()).collect();
        let hyp_keys: Vec<&str> = hyp_words.iter().map(|w| w.as_ref()).collect();
        let operations = align(&ref_keys, &hyp_keys);

        let verdicts = operations
            .iter()
            .flat_map(|op| self.align_operation(op, ref_words, hyp_words))
            .collect();

        (operations, verdicts)
    }
}
