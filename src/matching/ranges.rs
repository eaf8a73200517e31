use crate::core::types::Span;

/// Merge overlapping or touching half-open intervals.
///
/// The result is sorted by start and no two intervals satisfy
/// `a.end >= b.start`.
#[must_use]
pub fn merge(mut intervals: Vec<Span>) -> Vec<Span> {
    intervals.sort_by_key(|span| span.start);

    let mut merged: Vec<Span> = Vec::with_capacity(intervals.len());
    for span in intervals {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => {
                last.end = last.end.max(span.end);
            }
            _ => merged.push(span),
        }
    }
    merged
}
