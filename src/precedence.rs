//! LIR-over-RIR resolution by explicit range splitting.
//!
//! Spans are "painted" onto a map of disjoint pieces: a new span carves its
//! exact `first..=last` out of whatever it overlaps and takes its place.
//! Inside the LIR layer an object never paints over objects nested within
//! it, so the most specific object owns its addresses whatever the load
//! order; objects with identical bounds or partial overlaps are settled in
//! favour of the one loaded last. The resolved LIR layer is then painted
//! over the RIR layer.

use std::collections::BTreeMap;
use std::fmt;

use crate::index::Span;
use crate::record::Family;


/// Two LIR objects claiming the same addresses without one being nested in
/// the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapConflict {
    pub family: Family,
    /// The later object, which now owns the overlap.
    pub kept: Span,
    /// The part of the earlier object that was given up.
    pub replaced: Span,
}

impl fmt::Display for OverlapConflict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} overlap: {} ({}) replaces {} ({})",
            self.family,
            self.kept.display_bounds(self.family),
            self.kept.country,
            self.replaced.display_bounds(self.family),
            self.replaced.country)
    }
}


/// A painted piece and the bounds of the object it was cut from.
#[derive(Debug, Copy, Clone)]
struct Piece {
    span: Span,
    origin: (u128, u128),
}

fn bounds(span: &Span) -> (u128, u128) {
    (span.first, span.last)
}

/// `inner` lies within `outer` and is strictly narrower.
fn nested_in(inner: (u128, u128), outer: (u128, u128)) -> bool {
    inner != outer && outer.0 <= inner.0 && inner.1 <= outer.1
}


/// Disjoint spans keyed by their first address.
#[derive(Debug, Clone, Default)]
pub struct SpanMap {
    pieces: BTreeMap<u128, Piece>,
}

impl SpanMap {
    pub fn new() -> Self {
        SpanMap::default()
    }

    /// Writes `span` over the map and returns the displaced pieces.
    pub fn paint(&mut self, span: Span) -> Vec<Span> {
        self.paint_piece(span, bounds(&span))
            .into_iter()
            .map(|piece| piece.span)
            .collect()
    }

    /// Like [`SpanMap::paint`], but pieces of objects strictly nested inside
    /// `span` are left in place.
    pub fn paint_around_nested(&mut self, span: Span) -> Vec<Span> {
        self.layer(span)
            .into_iter()
            .map(|piece| piece.span)
            .collect()
    }

    /// First addresses of the pieces overlapping `span`, ascending.
    fn overlapping(&self, span: &Span) -> Vec<u128> {
        let mut firsts: Vec<u128> = self.pieces
            .range(..=span.last)
            .rev()
            .take_while(|&(_, piece)| piece.span.last >= span.first)
            .map(|(&first, _)| first)
            .collect();
        firsts.reverse();
        firsts
    }

    fn paint_piece(&mut self, span: Span, origin: (u128, u128)) -> Vec<Piece> {
        let overlapping = self.overlapping(&span);

        let mut displaced = Vec::with_capacity(overlapping.len());
        for first in overlapping {
            let old = match self.pieces.remove(&first) {
                Some(old) => old,
                None => continue,
            };

            if old.span.first < span.first {
                let head = Span { last: span.first - 1, ..old.span };
                self.pieces.insert(head.first, Piece { span: head, ..old });
            }
            if old.span.last > span.last {
                let tail = Span { first: span.last + 1, ..old.span };
                self.pieces.insert(tail.first, Piece { span: tail, ..old });
            }
            displaced.push(Piece {
                span: Span {
                    first: if old.span.first > span.first { old.span.first } else { span.first },
                    last: if old.span.last < span.last { old.span.last } else { span.last },
                    ..old.span
                },
                ..old
            });
        }

        self.pieces.insert(span.first, Piece { span, origin });
        displaced
    }

    /// Paints the parts of `span` not owned by objects nested inside it.
    fn layer(&mut self, span: Span) -> Vec<Piece> {
        let origin = bounds(&span);
        let nested: Vec<(u128, u128)> = self.overlapping(&span)
            .into_iter()
            .filter_map(|first| self.pieces.get(&first))
            .filter(|piece| nested_in(piece.origin, origin))
            .map(|piece| bounds(&piece.span))
            .collect();

        let mut displaced = Vec::new();
        let mut cursor = Some(span.first);
        for (first, last) in nested {
            if let Some(at) = cursor {
                if at < first {
                    displaced.extend(self.paint_piece(Span { first: at, last: first - 1, ..span }, origin));
                }
            }
            cursor = last.checked_add(1);
        }
        if let Some(at) = cursor {
            if at <= span.last {
                displaced.extend(self.paint_piece(Span { first: at, ..span }, origin));
            }
        }

        displaced
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn into_vec(self) -> Vec<Span> {
        self.pieces.into_iter().map(|(_, piece)| piece.span).collect()
    }
}


/// Merges one family's RIR and LIR spans into a disjoint, ordered list.
///
/// `rir` is painted in the order given (callers sort it so wider spans come
/// before the spans nested in them); `lir` must be in load order.
pub fn resolve(family: Family, rir: Vec<Span>, lir: Vec<Span>) -> (Vec<Span>, Vec<OverlapConflict>) {
    let mut conflicts = Vec::new();

    let mut lir_layer = SpanMap::new();
    for span in lir {
        let origin = bounds(&span);
        for replaced in lir_layer.layer(span) {
            if nested_in(origin, replaced.origin) {
                continue;
            }
            if replaced.origin == origin && replaced.span.country == span.country {
                trace!("Duplicate {} LIR object {}", family, span.display_bounds(family));
                continue;
            }
            let conflict = OverlapConflict { family, kept: span, replaced: replaced.span };
            warn!("{}", conflict);
            conflicts.push(conflict);
        }
    }

    let mut merged = SpanMap::new();
    let mut rir_overlaps = 0usize;
    for span in rir {
        rir_overlaps += merged.paint(span).len();
    }
    if rir_overlaps > 0 {
        debug!("{} {} RIR pieces replaced by more specific or later records", rir_overlaps, family);
    }

    let mut carved = 0usize;
    for span in lir_layer.into_vec() {
        carved += merged.paint(span).len();
    }
    debug!("{} {} RIR pieces carved out by LIR objects", carved, family);

    (merged.into_vec(), conflicts)
}
