use std::path::{Path, PathBuf};

use crate::{
    checker::{Checker, Subject},
    error::Result,
    frequency::FrequencyTable,
    misc::read_lossy,
    parser::{ParseWarning, ResultParser},
    ranking::{rank, RankedList},
    report::{InputSummary, VerificationReport},
    tokenizer::Tokenizer,
    traits::Tokenize,
};

/// Where the authoritative ranking comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TruthSource {
    /// Raw text, tokenized, counted and ranked
    Corpus(PathBuf),
    /// A previously produced `<token> <count>` file trusted as-is, with a
    /// corpus to count instead when that file cannot be read
    Expected {
        path: PathBuf,
        fallback: Option<PathBuf>,
    },
}

impl TruthSource {
    pub fn expected(path: impl Into<PathBuf>) -> Self {
        TruthSource::Expected {
            path: path.into(),
            fallback: None,
        }
    }

    fn path(&self) -> &Path {
        match self {
            TruthSource::Corpus(path) | TruthSource::Expected { path, .. } => path,
        }
    }
}

/// A labelled result file produced by one implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultInput {
    pub label: String,
    pub path: PathBuf,
}

impl ResultInput {
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Inputs {
    pub truth: TruthSource,
    pub results: Vec<ResultInput>,
}

/// Tokenizes, counts and ranks `text` into the canonical list.
pub fn ground_truth<T: Tokenize + Sync>(text: &str, tokenizer: &T) -> RankedList {
    let lines = text.lines().collect::<Vec<_>>();
    rank(&FrequencyTable::from_lines(&lines, tokenizer))
}

/// One validation run over a ground truth and its result files.
/// ```no_run
/// use freqcheck_rs::{Inputs, Oracle, ResultInput, TruthSource};
///
/// let report = Oracle::default().run(&Inputs {
///     truth: TruthSource::Corpus("tests/data/medium_test.txt".into()),
///     results: vec![
///         ResultInput::new("serial", "tests/results/serial/medium_result.txt"),
///         ResultInput::new("parallel", "tests/results/parallel/medium_result.txt"),
///     ],
/// });
/// println!("{report}");
/// std::process::exit(report.verdict.exit_code());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Oracle {
    tokenizer: Tokenizer,
    parser: ResultParser,
    checker: Checker,
    strict: bool,
}

struct Loaded {
    label: String,
    list: std::result::Result<RankedList, String>,
    warnings: Vec<ParseWarning>,
}

impl Loaded {
    fn subject(&self) -> Subject<'_> {
        Subject {
            label: &self.label,
            list: self.list.as_ref().map_err(String::as_str),
        }
    }
}

impl Oracle {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tokenizer(mut self, value: Tokenizer) -> Self {
        self.tokenizer = value;
        self
    }

    #[must_use]
    pub fn with_parser(mut self, value: ResultParser) -> Self {
        self.parser = value;
        self
    }

    #[must_use]
    pub fn with_checker(mut self, value: Checker) -> Self {
        self.checker = value;
        self
    }

    /// Any parse warning makes an otherwise passing run indeterminate.
    #[must_use]
    pub fn with_strict(mut self, value: bool) -> Self {
        self.strict = value;
        self
    }

    /// Loads the ground truth from `source`, with any parse warnings when it
    /// comes from an expected result file.
    pub fn load_truth(&self, source: &TruthSource) -> Result<(RankedList, Vec<ParseWarning>)> {
        match source {
            TruthSource::Corpus(path) => self.count_corpus(path),
            TruthSource::Expected { path, fallback } => {
                match (self.read_expected(path), fallback) {
                    (Err(err), Some(corpus)) => {
                        log::warn!("{err}; counting {} instead", corpus.display());
                        self.count_corpus(corpus)
                    }
                    (loaded, _) => loaded,
                }
            }
        }
    }

    fn count_corpus(&self, path: &Path) -> Result<(RankedList, Vec<ParseWarning>)> {
        let text = read_lossy(path)?;
        let truth = ground_truth(&text, &self.tokenizer);
        log::info!(
            "ground truth from {}: {} distinct tokens, {} total",
            path.display(),
            truth.len(),
            truth.total()
        );
        Ok((truth, Vec::new()))
    }

    fn read_expected(&self, path: &Path) -> Result<(RankedList, Vec<ParseWarning>)> {
        let parsed = self.parser.parse_file(path)?;
        if let Some(idx) = parsed.entries.first_order_violation() {
            log::warn!(
                "expected file {} is not in canonical order at entry {}",
                path.display(),
                idx
            );
        }
        Ok((parsed.entries, parsed.warnings))
    }

    pub fn run(&self, inputs: &Inputs) -> VerificationReport {
        let truth = self.loaded(
            "ground truth".to_owned(),
            inputs.truth.path(),
            self.load_truth(&inputs.truth),
        );
        let results = inputs
            .results
            .iter()
            .map(|input| {
                let parsed = self
                    .parser
                    .parse_file(&input.path)
                    .map(|parsed| (parsed.entries, parsed.warnings));
                self.loaded(input.label.clone(), &input.path, parsed)
            })
            .collect::<Vec<_>>();

        let candidates = results.iter().map(Loaded::subject).collect::<Vec<_>>();
        let outcomes = self.checker.verify(truth.subject(), &candidates);

        let inputs = std::iter::once(truth)
            .chain(results)
            .map(|loaded| InputSummary {
                entries: loaded.list.as_ref().ok().map(RankedList::len),
                error: loaded.list.err(),
                label: loaded.label,
                warnings: loaded.warnings,
            })
            .collect();
        let report = VerificationReport::new(inputs, outcomes, self.strict);
        log::info!(
            "verdict {} with {} discrepancies",
            report.verdict,
            report.total_discrepancies()
        );
        report
    }

    fn loaded(
        &self,
        label: String,
        path: &Path,
        result: Result<(RankedList, Vec<ParseWarning>)>,
    ) -> Loaded {
        match result {
            Ok((list, warnings)) => {
                for warning in &warnings {
                    log::warn!("{} ({}): {}", label, path.display(), warning);
                }
                Loaded {
                    label,
                    list: Ok(list),
                    warnings,
                }
            }
            Err(err) => {
                log::error!("{label}: {err}");
                Loaded {
                    label,
                    list: Err(err.to_string()),
                    warnings: Vec::new(),
                }
            }
        }
    }
}
