use std::fmt;

use hashbrown::HashMap;
use itertools::{Either, Itertools};
use serde::Serialize;

use crate::ranking::{RankedEntry, RankedList};
use crate::report::{Comparison, Outcome};

/// One classified divergence between an expected and an actual ranked list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Discrepancy {
    SizeMismatch {
        expected: usize,
        actual: usize,
    },
    MissingToken {
        token: String,
        expected_count: u64,
    },
    ExtraToken {
        token: String,
        actual_count: u64,
        index: usize,
    },
    /// A token listed again after its first occurrence
    DuplicateToken {
        token: String,
        count: u64,
        index: usize,
    },
    CountMismatch {
        token: String,
        expected: u64,
        actual: u64,
    },
    OrderMismatch {
        index: usize,
        expected: RankedEntry,
        actual: RankedEntry,
    },
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discrepancy::SizeMismatch { expected, actual } => {
                write!(f, "size mismatch: expected {expected} tokens, found {actual}")
            }
            Discrepancy::MissingToken {
                token,
                expected_count,
            } => write!(f, "missing token `{token}` (expected count {expected_count})"),
            Discrepancy::ExtraToken {
                token,
                actual_count,
                index,
            } => write!(
                f,
                "extra token `{token}` at position {index} (count {actual_count})"
            ),
            Discrepancy::DuplicateToken {
                token,
                count,
                index,
            } => write!(
                f,
                "duplicate token `{token}` at position {index} (count {count})"
            ),
            Discrepancy::CountMismatch {
                token,
                expected,
                actual,
            } => write!(
                f,
                "count mismatch for `{token}`: expected {expected}, found {actual}"
            ),
            Discrepancy::OrderMismatch {
                index,
                expected,
                actual,
            } => write!(
                f,
                "order mismatch at position {index}: expected `{expected}`, found `{actual}`"
            ),
        }
    }
}

/// How many order divergences a comparison reports.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderPolicy {
    /// Stop at the earliest divergence
    #[default]
    FirstOnly,
    /// Report every divergent position
    All,
}

/// Which positions the order check pairs up.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderAlignment {
    /// Zip both lists by position up to the shorter length
    #[default]
    Positional,
    /// Zip only the entries both lists agree on, so a missing or inserted
    /// token does not shift every later position
    Agreed,
}

/// A ranked list to verify, or the reason it could not be produced.
#[derive(Debug, Clone, Copy)]
pub struct Subject<'a> {
    pub label: &'a str,
    pub list: Result<&'a RankedList, &'a str>,
}

impl<'a> Subject<'a> {
    pub fn ready(label: &'a str, list: &'a RankedList) -> Self {
        Self {
            label,
            list: Ok(list),
        }
    }

    pub fn unavailable(label: &'a str, reason: &'a str) -> Self {
        Self {
            label,
            list: Err(reason),
        }
    }
}

/// Compares ranked lists against an authority and against each other.
/// ```
/// use freqcheck_rs::{Checker, RankedEntry, RankedList};
///
/// let truth = RankedList::new(vec![RankedEntry::new("the", 3), RankedEntry::new("cat", 2)]);
/// let found = RankedList::new(vec![RankedEntry::new("cat", 2), RankedEntry::new("the", 3)]);
///
/// let comparison = Checker::default()
///     .with_max_reported(5)
///     .compare(&truth, &found, "ground truth", "serial");
/// assert!(!comparison.passed());
/// assert_eq!(comparison.total, 1);
/// ```
#[derive(Debug, Clone)]
pub struct Checker {
    max_reported: usize,
    order_policy: OrderPolicy,
    order_alignment: OrderAlignment,
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

impl Checker {
    /// Initiates a checker that keeps 10 discrepancies per comparison and
    /// reports only the first order divergence
    pub fn new() -> Self {
        Checker {
            max_reported: 10,
            order_policy: OrderPolicy::FirstOnly,
            order_alignment: OrderAlignment::Positional,
        }
    }

    /// Sets the number of discrepancies retained per comparison. The total is
    /// always counted in full.
    #[must_use]
    pub fn with_max_reported(mut self, value: usize) -> Self {
        self.max_reported = value;
        self
    }

    #[must_use]
    pub fn with_order_policy(mut self, value: OrderPolicy) -> Self {
        self.order_policy = value;
        self
    }

    #[must_use]
    pub fn with_order_alignment(mut self, value: OrderAlignment) -> Self {
        self.order_alignment = value;
        self
    }

    pub fn max_reported(&self) -> usize {
        self.max_reported
    }

    /// Checks `actual` against `expected`: size, token sets, counts, then
    /// order. A position only counts as misordered when both entries there
    /// are individually correct.
    pub fn compare(
        &self,
        expected: &RankedList,
        actual: &RankedList,
        expected_label: impl Into<String>,
        actual_label: impl Into<String>,
    ) -> Comparison {
        let mut sink = Sink::with_limit(self.max_reported);
        let expected_idx = first_occurrences(expected);
        let actual_idx = first_occurrences(actual);

        if expected.len() != actual.len() {
            sink.push(Discrepancy::SizeMismatch {
                expected: expected.len(),
                actual: actual.len(),
            });
        }

        let expected_firsts = expected
            .iter()
            .enumerate()
            .filter(|(pos, e)| is_first(&expected_idx, *pos, &e.token))
            .map(|(_, e)| e)
            .collect_vec();
        let actual_firsts = actual
            .iter()
            .enumerate()
            .filter(|(pos, a)| is_first(&actual_idx, *pos, &a.token))
            .collect_vec();

        for e in &expected_firsts {
            if !actual_idx.contains_key(e.token.as_str()) {
                sink.push(Discrepancy::MissingToken {
                    token: e.token.clone(),
                    expected_count: e.count,
                });
            }
        }
        for (pos, a) in &actual_firsts {
            if !expected_idx.contains_key(a.token.as_str()) {
                sink.push(Discrepancy::ExtraToken {
                    token: a.token.clone(),
                    actual_count: a.count,
                    index: *pos,
                });
            }
        }
        for (pos, a) in actual.iter().enumerate() {
            if !is_first(&actual_idx, pos, &a.token) {
                sink.push(Discrepancy::DuplicateToken {
                    token: a.token.clone(),
                    count: a.count,
                    index: pos,
                });
            }
        }

        for e in &expected_firsts {
            if let Some(&pos) = actual_idx.get(e.token.as_str()) {
                let found = actual.entries()[pos].count;
                if found != e.count {
                    sink.push(Discrepancy::CountMismatch {
                        token: e.token.clone(),
                        expected: e.count,
                        actual: found,
                    });
                }
            }
        }

        let divergent = match self.order_alignment {
            OrderAlignment::Positional => Either::Left(
                expected
                    .iter()
                    .zip(actual.iter())
                    .enumerate()
                    .filter(|(pos, (e, a))| {
                        e.token != a.token
                            && is_first(&expected_idx, *pos, &e.token)
                            && is_first(&actual_idx, *pos, &a.token)
                            && agrees(&e.token, e.count, actual, &actual_idx)
                            && agrees(&a.token, a.count, expected, &expected_idx)
                    })
                    .map(|(pos, (e, a))| (pos, e, a)),
            ),
            OrderAlignment::Agreed => {
                let agreed_expected = expected_firsts
                    .iter()
                    .copied()
                    .filter(|e| agrees(&e.token, e.count, actual, &actual_idx));
                let agreed_actual = actual_firsts
                    .iter()
                    .copied()
                    .filter(|(_, a)| agrees(&a.token, a.count, expected, &expected_idx));
                Either::Right(
                    agreed_expected
                        .zip(agreed_actual)
                        .filter(|(e, (_, a))| e.token != a.token)
                        .map(|(e, (pos, a))| (pos, e, a)),
                )
            }
        };
        let limit = match self.order_policy {
            OrderPolicy::FirstOnly => 1,
            OrderPolicy::All => usize::MAX,
        };
        for (index, e, a) in divergent.take(limit) {
            sink.push(Discrepancy::OrderMismatch {
                index,
                expected: e.clone(),
                actual: a.clone(),
            });
        }

        let comparison = sink.finish(expected_label.into(), actual_label.into());
        log::debug!(
            "{} vs {}: {} discrepancies",
            comparison.expected_label,
            comparison.actual_label,
            comparison.total
        );
        comparison
    }

    /// Compares `ground_truth` with every candidate, then every pair of
    /// candidates in the order given. A comparison involving an unavailable
    /// subject is reported as such instead of being run.
    pub fn verify(&self, ground_truth: Subject<'_>, candidates: &[Subject<'_>]) -> Vec<Outcome> {
        let against_truth = candidates
            .iter()
            .map(|candidate| self.outcome(&ground_truth, candidate));
        let cross = candidates
            .iter()
            .tuple_combinations()
            .map(|(c1, c2)| self.outcome(c1, c2));
        against_truth.chain(cross).collect()
    }

    fn outcome(&self, expected: &Subject<'_>, actual: &Subject<'_>) -> Outcome {
        match (expected.list, actual.list) {
            (Ok(e), Ok(a)) => Outcome::Compared(self.compare(e, a, expected.label, actual.label)),
            (Err(reason), _) | (_, Err(reason)) => {
                log::warn!(
                    "skipping {} vs {}: {}",
                    expected.label,
                    actual.label,
                    reason
                );
                Outcome::Unavailable {
                    expected_label: expected.label.to_owned(),
                    actual_label: actual.label.to_owned(),
                    reason: reason.to_owned(),
                }
            }
        }
    }
}

fn is_first(idx: &HashMap<&str, usize>, pos: usize, tok: &str) -> bool {
    idx.get(tok) == Some(&pos)
}

fn agrees(tok: &str, count: u64, other: &RankedList, idx: &HashMap<&str, usize>) -> bool {
    idx.get(tok)
        .is_some_and(|&pos| other.entries()[pos].count == count)
}

fn first_occurrences(list: &RankedList) -> HashMap<&str, usize> {
    let mut idx = HashMap::with_capacity(list.len());
    for (pos, entry) in list.iter().enumerate() {
        idx.entry(entry.token.as_str()).or_insert(pos);
    }
    idx
}

struct Sink {
    kept: Vec<Discrepancy>,
    total: usize,
    limit: usize,
}

impl Sink {
    fn with_limit(limit: usize) -> Self {
        Self {
            kept: Vec::with_capacity(limit.min(64)),
            total: 0,
            limit,
        }
    }

    fn push(&mut self, discrepancy: Discrepancy) {
        self.total += 1;
        if self.kept.len() < self.limit {
            self.kept.push(discrepancy);
        }
    }

    fn finish(self, expected_label: String, actual_label: String) -> Comparison {
        Comparison {
            expected_label,
            actual_label,
            total: self.total,
            discrepancies: self.kept,
        }
    }
}
