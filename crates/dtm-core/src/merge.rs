//! Merge arbitration between detector outputs.
//!
//! Detector outputs are folded one at a time into an accumulated sequence.
//! A candidate that fully contains existing spans replaces them; one that
//! partially overlaps an existing span is dropped.

use regex::Regex;

use crate::span::Span;

/// Outcome of comparing one candidate against the accumulated sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Placement {
    /// Nothing overlaps; the candidate goes to the end.
    Append,
    /// The candidate covers the entries at these indexes (ascending).
    Replace(Vec<usize>),
    /// The candidate partially overlaps an entry.
    Discard,
}

/// Folds `incoming` into `accumulated`, returning the new sequence.
///
/// When `skip_from_to` is given, candidates whose text matches it are skipped
/// before arbitration.
pub fn merge(
    accumulated: Vec<Span>,
    incoming: impl IntoIterator<Item = Span>,
    skip_from_to: Option<&Regex>,
) -> Vec<Span> {
    incoming.into_iter().fold(accumulated, |acc, candidate| {
        if skip_from_to.is_some_and(|re| re.is_match(&candidate.text)) {
            tracing::trace!(text = %candidate.text, "skipping from/to marker");
            return acc;
        }
        arbitrate(acc, candidate)
    })
}

/// Places a single candidate into the sequence.
fn arbitrate(mut acc: Vec<Span>, candidate: Span) -> Vec<Span> {
    match place(&acc, &candidate) {
        Placement::Append => {
            tracing::trace!(start = candidate.start, text = %candidate.text, "appending");
            acc.push(candidate);
            acc
        }
        Placement::Replace(covered) => {
            tracing::trace!(
                start = candidate.start,
                text = %candidate.text,
                replaced = covered.len(),
                "replacing covered spans"
            );
            let first = covered[0];
            let mut kept: Vec<Span> = acc
                .into_iter()
                .enumerate()
                .filter(|(i, _)| covered.binary_search(i).is_err())
                .map(|(_, span)| span)
                .collect();
            // Entries before `first` are untouched, so `first` is still the slot.
            kept.insert(first, candidate);
            kept
        }
        Placement::Discard => {
            tracing::trace!(start = candidate.start, text = %candidate.text, "dropping partial overlap");
            acc
        }
    }
}

fn place(acc: &[Span], candidate: &Span) -> Placement {
    let mut covered = Vec::new();
    for (i, existing) in acc.iter().enumerate() {
        if !existing.overlaps(candidate) {
            continue;
        }
        if candidate.covers(existing) {
            covered.push(i);
        } else {
            // A partial overlap blocks the candidate outright, even when
            // covered entries were already collected.
            return Placement::Discard;
        }
    }

    if covered.is_empty() {
        Placement::Append
    } else {
        Placement::Replace(covered)
    }
}
