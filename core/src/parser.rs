use std::fmt;
use std::path::Path;

use fancy_regex::Regex;
use serde::Serialize;

use crate::{
    error::Result,
    misc::{compile_into_regex, read_lossy},
    ranking::{RankedEntry, RankedList},
    traits::ClassifyLine,
};

/// Banner prefixes printed by the serial and MapReduce word counters around
/// their `<token> <count>` output.
pub const DEFAULT_IGNORABLE_PREFIXES: [&str; 4] = ["Starting", "---", "Total", "Time"];

/// Decision taken for one line of a result file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Data { token: String, count: u64 },
    Ignorable,
    Malformed { reason: MalformedReason },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MalformedReason {
    /// Only one field on the line
    MissingCount,
    /// Second field is not a non-negative integer
    InvalidCount { field: String },
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::MissingCount => write!(f, "missing count"),
            MalformedReason::InvalidCount { field } => {
                write!(f, "count `{field}` is not a non-negative integer")
            }
        }
    }
}

/// A malformed line that was skipped while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseWarning {
    /// 1-based
    pub line_number: usize,
    pub content: String,
    pub reason: MalformedReason,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: {}: `{}`",
            self.line_number, self.reason, self.content
        )
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedResult {
    /// Data lines in file order
    pub entries: RankedList,
    pub warnings: Vec<ParseWarning>,
    /// Blank and banner lines skipped
    pub ignored: usize,
}

/// Recovers a ranked list from a word counter's output.
/// ```
/// let parsed = freqcheck_rs::ResultParser::default()
///     .with_ignorable_patterns([r"\[\w+\]"])
///     .unwrap()
///     .parse_str("Starting word count...\n[reducer 2] merged\nthe 3\ncat 2\ndog x\nTime: 0.02s\n");
///
/// assert_eq!(parsed.entries.len(), 2);
/// assert_eq!(parsed.warnings.len(), 1);
/// assert_eq!(parsed.warnings[0].line_number, 5);
/// ```
#[derive(Debug, Clone)]
pub struct ResultParser {
    ignorable_prefixes: Vec<String>,
    ignorable_patterns: Option<Regex>,
}

impl Default for ResultParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassifyLine for ResultParser {
    fn classify(&self, line: &str) -> LineKind {
        let line = line.trim();
        if line.is_empty() || self.is_banner(line) {
            return LineKind::Ignorable;
        }
        let (token, second) = match line.split_once(char::is_whitespace) {
            Some((token, rest)) => (token, rest.split_whitespace().next()),
            None => (line, None),
        };
        match second.map(|field| (field, field.parse::<u64>())) {
            Some((_, Ok(count))) => LineKind::Data {
                token: token.to_owned(),
                count,
            },
            Some((field, Err(_))) => LineKind::Malformed {
                reason: MalformedReason::InvalidCount {
                    field: field.to_owned(),
                },
            },
            None => LineKind::Malformed {
                reason: MalformedReason::MissingCount,
            },
        }
    }
}

impl ResultParser {
    /// Initiates a parser that skips the default banner prefixes
    pub fn new() -> Self {
        ResultParser {
            ignorable_prefixes: DEFAULT_IGNORABLE_PREFIXES
                .into_iter()
                .map(ToOwned::to_owned)
                .collect(),
            ignorable_patterns: None,
        }
    }

    /// Replaces the literal prefixes that mark a line as ignorable.
    #[must_use]
    pub fn with_ignorable_prefixes<Item, Iter>(mut self, value: Iter) -> Self
    where
        Item: Into<String>,
        Iter: IntoIterator<Item = Item>,
    {
        self.ignorable_prefixes = value.into_iter().map(Into::into).collect();
        self
    }

    /// Sets regexes that mark a line as ignorable when they match at its start.
    /// An empty set clears them.
    pub fn with_ignorable_patterns<Item, Iter>(mut self, value: Iter) -> Result<Self>
    where
        Item: AsRef<str>,
        Iter: IntoIterator<Item = Item>,
    {
        let patterns = value.into_iter().collect::<Vec<_>>();
        self.ignorable_patterns = if patterns.is_empty() {
            None
        } else {
            Some(compile_into_regex(patterns)?)
        };
        Ok(self)
    }

    pub fn parse_lines<Line, Iter>(&self, lines: Iter) -> ParsedResult
    where
        Line: AsRef<str>,
        Iter: IntoIterator<Item = Line>,
    {
        let mut entries = Vec::new();
        let mut warnings = Vec::new();
        let mut ignored = 0;
        for (idx, line) in lines.into_iter().enumerate() {
            match self.classify(line.as_ref()) {
                LineKind::Data { token, count } => entries.push(RankedEntry { token, count }),
                LineKind::Ignorable => ignored += 1,
                LineKind::Malformed { reason } => warnings.push(ParseWarning {
                    line_number: idx + 1,
                    content: line.as_ref().to_owned(),
                    reason,
                }),
            }
        }
        log::debug!(
            "parsed {} entries, {} ignored lines, {} malformed lines",
            entries.len(),
            ignored,
            warnings.len()
        );
        ParsedResult {
            entries: RankedList::new(entries),
            warnings,
            ignored,
        }
    }

    pub fn parse_str(&self, text: &str) -> ParsedResult {
        self.parse_lines(text.lines())
    }

    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<ParsedResult> {
        Ok(self.parse_str(&read_lossy(path)?))
    }

    fn is_banner(&self, line: &str) -> bool {
        self.ignorable_prefixes
            .iter()
            .any(|prefix| line.starts_with(prefix.as_str()))
            || self
                .ignorable_patterns
                .as_ref()
                .is_some_and(|regex| match regex.is_match(line) {
                    Ok(matched) => matched,
                    Err(err) => {
                        log::warn!("ignorable patterns gave up on {line:?}: {err}");
                        false
                    }
                })
    }
}
