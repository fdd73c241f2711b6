use std::path::PathBuf;

use clap::Parser;
use freqcheck_rs::{
    Checker, CleaningRule, Inputs, Oracle, OrderAlignment, OrderPolicy, ResultInput,
    ResultParser, Tokenizer, TruthSource, DEFAULT_IGNORABLE_PREFIXES,
};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(
    name = "freqcheck",
    version,
    about = "Checks word-frequency results against a canonical ground truth and each other."
)]
pub struct Args {
    /// Raw text corpus the ground truth is computed from. With `--expected`,
    /// only counted when the expected file cannot be read.
    #[arg(short, long, value_name = "FILE", required_unless_present = "expected")]
    pub corpus: Option<PathBuf>,

    /// Trusted `<token> <count>` file used as ground truth instead of a corpus.
    #[arg(short, long, value_name = "FILE")]
    pub expected: Option<PathBuf>,

    /// Result file of the first implementation.
    #[arg(short = 'a', long, value_name = "FILE")]
    pub result_a: PathBuf,

    /// Result file of the second implementation, cross-checked against the first.
    #[arg(short = 'b', long, value_name = "FILE")]
    pub result_b: Option<PathBuf>,

    #[arg(long, default_value = "A")]
    pub label_a: String,

    #[arg(long, default_value = "B")]
    pub label_b: String,

    /// Discrepancies listed per comparison; the total is always reported.
    #[arg(short = 'k', long, default_value_t = 10)]
    pub max_reported: usize,

    /// Report every misordered position instead of only the first.
    #[arg(long)]
    pub all_order_mismatches: bool,

    /// Check order only across entries both lists agree on, so a missing or
    /// extra token does not shift the positions after it.
    #[arg(long)]
    pub align_agreed: bool,

    /// Extra line prefix to skip in result files, on top of the defaults.
    #[arg(long = "ignore-prefix", value_name = "PREFIX")]
    pub ignore_prefixes: Vec<String>,

    /// Regex matched at line start to skip in result files.
    #[arg(long = "ignore-pattern", value_name = "REGEX")]
    pub ignore_patterns: Vec<String>,

    /// Treat non-letters as separators rather than dropping them.
    #[arg(long)]
    pub split_non_letters: bool,

    /// Any malformed result line makes the run indeterminate.
    #[arg(long)]
    pub strict: bool,

    /// Also write the report as JSON.
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,
}

impl Args {
    pub fn inputs(&self) -> Inputs {
        let truth = match (&self.expected, &self.corpus) {
            (Some(expected), corpus) => TruthSource::Expected {
                path: expected.clone(),
                fallback: corpus.clone(),
            },
            (None, Some(corpus)) => TruthSource::Corpus(corpus.clone()),
            (None, None) => unreachable!("clap requires a corpus or an expected file"),
        };
        let results = std::iter::once(ResultInput::new(&self.label_a, &self.result_a))
            .chain(
                self.result_b
                    .as_ref()
                    .map(|path| ResultInput::new(&self.label_b, path)),
            )
            .collect();
        Inputs { truth, results }
    }

    pub fn oracle(&self) -> freqcheck_rs::Result<Oracle> {
        let rule = if self.split_non_letters {
            CleaningRule::Split
        } else {
            CleaningRule::Strip
        };
        let order_policy = if self.all_order_mismatches {
            OrderPolicy::All
        } else {
            OrderPolicy::FirstOnly
        };
        let order_alignment = if self.align_agreed {
            OrderAlignment::Agreed
        } else {
            OrderAlignment::Positional
        };
        let parser = ResultParser::new()
            .with_ignorable_prefixes(
                DEFAULT_IGNORABLE_PREFIXES
                    .into_iter()
                    .map(ToOwned::to_owned)
                    .chain(self.ignore_prefixes.iter().cloned()),
            )
            .with_ignorable_patterns(&self.ignore_patterns)?;
        Ok(Oracle::new()
            .with_tokenizer(Tokenizer::new().with_rule(rule))
            .with_parser(parser)
            .with_checker(
                Checker::new()
                    .with_max_reported(self.max_reported)
                    .with_order_policy(order_policy)
                    .with_order_alignment(order_alignment),
            )
            .with_strict(self.strict))
    }
}
