//! Merge-join set algebra over sorted postings
//!
//! Every function expects its inputs sorted ascending by document id and
//! runs in time linear in the input sizes (plus output size for the
//! positional merges).

use std::collections::VecDeque;

use super::types::{DocId, Position, PositionalPosting};

/// Document ids present in both lists
pub fn intersect(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut result = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Equal => {
                result.push(a[i]);
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
        }
    }

    result
}

/// Document ids present in either list, without duplicates
pub fn union(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut result = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Equal => {
                result.push(a[i]);
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Less => {
                result.push(a[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                result.push(b[j]);
                j += 1;
            }
        }
    }

    result.extend_from_slice(&a[i..]);
    result.extend_from_slice(&b[j..]);
    result
}

/// Document ids in `universe` that are absent from `excluded`
pub fn difference(universe: &[DocId], excluded: &[DocId]) -> Vec<DocId> {
    let mut result = Vec::with_capacity(universe.len());
    let (mut i, mut j) = (0, 0);

    while i < universe.len() && j < excluded.len() {
        match universe[i].cmp(&excluded[j]) {
            std::cmp::Ordering::Equal => {
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Less => {
                result.push(universe[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => j += 1,
        }
    }

    result.extend_from_slice(&universe[i..]);
    result
}

/// Union of any number of sorted lists
pub fn union_all<'a, I>(lists: I) -> Vec<DocId>
where
    I: IntoIterator<Item = &'a [DocId]>,
{
    lists
        .into_iter()
        .fold(Vec::new(), |acc, list| union(&acc, list))
}

/// Document ids of a postings slice
pub fn doc_ids(postings: &[PositionalPosting]) -> Vec<DocId> {
    postings.iter().map(|p| p.doc_id).collect()
}

/// How the right-hand position may relate to the left-hand one
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowMode {
    /// `0 < right - left <= k` (phrase adjacency when `k == 1`)
    Following,
    /// `|left - right| <= k` in either direction
    Either,
}

impl WindowMode {
    fn accepts(self, left: Position, right: Position) -> bool {
        match self {
            WindowMode::Following => right > left,
            WindowMode::Either => true,
        }
    }
}

/// A single pair of positions satisfying a window constraint
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PositionMatch {
    pub doc_id: DocId,
    pub left: Position,
    pub right: Position,
}

/// Every `(left, right)` position pair within `k` of each other, per common document
pub fn positional_matches(
    left: &[PositionalPosting],
    right: &[PositionalPosting],
    k: u32,
    mode: WindowMode,
) -> Vec<PositionMatch> {
    let mut matches = Vec::new();
    for_each_common_doc(left, right, |l, r| {
        window_merge(&l.positions, &r.positions, k, mode, |a, b| {
            matches.push(PositionMatch {
                doc_id: l.doc_id,
                left: a,
                right: b,
            });
        });
    });
    matches
}

/// Positional intersection with window `k`
///
/// Returns one synthetic posting per document holding at least one matching
/// pair. Its positions are the distinct left-hand positions that matched, so
/// the result can be fed back in as the left operand when folding a phrase
/// from its last term towards its first.
pub fn positional_intersect(
    left: &[PositionalPosting],
    right: &[PositionalPosting],
    k: u32,
    mode: WindowMode,
) -> Vec<PositionalPosting> {
    let mut result = Vec::new();
    for_each_common_doc(left, right, |l, r| {
        let mut positions: Vec<Position> = Vec::new();
        window_merge(&l.positions, &r.positions, k, mode, |a, _| {
            // `a` is non-decreasing across callbacks
            if positions.last() != Some(&a) {
                positions.push(a);
            }
        });
        if !positions.is_empty() {
            result.push(PositionalPosting::new(l.doc_id, positions));
        }
    });
    result
}

fn for_each_common_doc<'a, F>(
    left: &'a [PositionalPosting],
    right: &'a [PositionalPosting],
    mut f: F,
)
where
    F: FnMut(&'a PositionalPosting, &'a PositionalPosting),
{
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        match left[i].doc_id.cmp(&right[j].doc_id) {
            std::cmp::Ordering::Equal => {
                f(&left[i], &right[j]);
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
        }
    }
}

/// Sliding-window merge of two sorted position lists
///
/// The window holds the right-hand positions `b` with `|a - b| <= k` for the
/// current left-hand position `a`. Entries are appended as `a + k` moves past
/// them and evicted once they fall below `a - k`.
fn window_merge<F>(left: &[Position], right: &[Position], k: u32, mode: WindowMode, mut emit: F)
where
    F: FnMut(Position, Position),
{
    let mut window: VecDeque<Position> = VecDeque::new();
    let mut j = 0;

    for &a in left {
        let upper = a.saturating_add(k);
        while j < right.len() && right[j] <= upper {
            window.push_back(right[j]);
            j += 1;
        }

        while window.front().is_some_and(|&b| b.saturating_add(k) < a) {
            window.pop_front();
        }

        for &b in &window {
            if mode.accepts(a, b) {
                emit(a, b);
            }
        }
    }
}
