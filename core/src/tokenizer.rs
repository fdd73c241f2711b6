use itertools::Either;
use serde::Serialize;

use crate::traits::Tokenize;

/// How characters that are not ASCII letters are treated inside a
/// whitespace-delimited fragment.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningRule {
    /// Remove them in place: `"Hello,_World!123"` becomes `"helloworld"`.
    #[default]
    Strip,
    /// Split on them: `"Hello,_World!123"` becomes `"hello"`, `"world"`.
    Split,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Tokenizer {
    rule: CleaningRule,
}

impl Tokenize for Tokenizer {
    fn tokenize<'a>(&'a self, text: &'a str) -> impl Iterator<Item = String> + Clone + 'a {
        let rule = self.rule;
        text.split_whitespace()
            .flat_map(move |fragment| match rule {
                CleaningRule::Strip => Either::Left(clean_fragment(fragment).into_iter()),
                CleaningRule::Split => Either::Right(
                    fragment
                        .split(|c: char| !c.is_ascii_alphabetic())
                        .filter(|piece| !piece.is_empty())
                        .map(str::to_ascii_lowercase),
                ),
            })
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Tokenizer {
            rule: CleaningRule::Strip,
        }
    }

    /// Sets the treatment of non-letter characters inside a fragment.
    #[must_use]
    pub fn with_rule(mut self, rule: CleaningRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn rule(&self) -> CleaningRule {
        self.rule
    }
}

/// Drops every character of `fragment` that is not an ASCII letter and
/// lowercases the rest. Returns `None` when nothing is left.
pub fn clean_fragment(fragment: &str) -> Option<String> {
    let cleaned = fragment
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect::<String>();
    (!cleaned.is_empty()).then_some(cleaned)
}
