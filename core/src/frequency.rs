use hashbrown::HashMap;
use rayon::prelude::*;

use crate::traits::Tokenize;

/// Occurrence count of every distinct token seen in a corpus.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<String, u64>,
}

impl FrequencyTable {
    /// Counts a token stream; every token adds one to its entry.
    pub fn from_tokens<Iter>(tokens: Iter) -> Self
    where
        Iter: IntoIterator,
        Iter::Item: Into<String>,
    {
        let mut counts = HashMap::new();
        for tok in tokens {
            counts
                .entry(tok.into())
                .and_modify(|count| *count += 1)
                .or_insert(1);
        }
        Self { counts }
    }

    /// Tokenizes and counts `lines` in parallel. Partial tables are merged
    /// smaller-into-larger, so the result equals counting the concatenated
    /// token stream with [`FrequencyTable::from_tokens`].
    pub fn from_lines<Line, Tokenizer>(lines: &[Line], tokenizer: &Tokenizer) -> Self
    where
        Line: AsRef<str> + Sync,
        Tokenizer: Tokenize + Sync,
    {
        let counts = lines
            .par_iter()
            .fold(HashMap::new, |mut counts: HashMap<String, u64>, line| {
                for tok in tokenizer.tokenize(line.as_ref()) {
                    counts.entry(tok).and_modify(|count| *count += 1).or_insert(1);
                }
                counts
            })
            .reduce(HashMap::new, merge);
        Self { counts }
    }

    pub fn get(&self, tok: impl AsRef<str>) -> Option<u64> {
        self.counts.get(tok.as_ref()).copied()
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of tokens counted, duplicates included.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(tok, count)| (tok.as_str(), *count))
    }
}

fn merge(mut m1: HashMap<String, u64>, mut m2: HashMap<String, u64>) -> HashMap<String, u64> {
    if m1.len() > m2.len() {
        m1.reserve(m2.len());
        for (tok, count) in m2 {
            m1.entry(tok)
                .and_modify(|count1| *count1 += count)
                .or_insert(count);
        }
        m1
    } else {
        m2.reserve(m1.len());
        for (tok, count) in m1 {
            m2.entry(tok)
                .and_modify(|count2| *count2 += count)
                .or_insert(count);
        }
        m2
    }
}
