use std::cmp::Ordering;
use std::fmt;

use itertools::Itertools;
use serde::Serialize;

use crate::frequency::FrequencyTable;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RankedEntry {
    pub token: String,
    pub count: u64,
}

impl RankedEntry {
    pub fn new(token: impl Into<String>, count: u64) -> Self {
        Self {
            token: token.into(),
            count,
        }
    }
}

impl fmt::Display for RankedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.token, self.count)
    }
}

/// The canonical order: descending count, ties by ascending token bytes.
pub fn canonical_order(e1: &RankedEntry, e2: &RankedEntry) -> Ordering {
    e2.count
        .cmp(&e1.count)
        .then_with(|| e1.token.as_bytes().cmp(e2.token.as_bytes()))
}

/// Ranks `table` in canonical order. Distinct tokens make the order total,
/// so the output never depends on the table's iteration order.
pub fn rank(table: &FrequencyTable) -> RankedList {
    table
        .iter()
        .map(|(tok, count)| RankedEntry::new(tok, count))
        .sorted_by(canonical_order)
        .collect()
}

/// Ordered sequence of `(token, count)` entries, either ranked from a
/// frequency table or recovered from a result file in file order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RankedList {
    entries: Vec<RankedEntry>,
}

impl RankedList {
    pub fn new(entries: Vec<RankedEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|entry| entry.count).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RankedEntry> {
        self.entries.iter()
    }

    /// Index of the first entry that is not strictly after its predecessor
    /// in canonical order.
    pub fn first_order_violation(&self) -> Option<usize> {
        self.entries
            .iter()
            .tuple_windows()
            .position(|(e1, e2)| canonical_order(e1, e2) != Ordering::Less)
            .map(|idx| idx + 1)
    }

    pub fn is_canonical(&self) -> bool {
        self.first_order_violation().is_none()
    }
}

impl FromIterator<RankedEntry> for RankedList {
    fn from_iter<T: IntoIterator<Item = RankedEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RankedList {
    type Item = &'a RankedEntry;
    type IntoIter = std::slice::Iter<'a, RankedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
