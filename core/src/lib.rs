mod checker;
mod error;
mod frequency;
mod misc;
mod oracle;
mod parser;
mod ranking;
mod report;
mod tokenizer;
mod traits;
pub use checker::{Checker, Discrepancy, OrderAlignment, OrderPolicy, Subject};
pub use error::{Error, Result};
pub use frequency::FrequencyTable;
pub use misc::{compile_into_regex, read_lossy};
pub use oracle::{ground_truth, Inputs, Oracle, ResultInput, TruthSource};
pub use parser::{
    LineKind, MalformedReason, ParseWarning, ParsedResult, ResultParser,
    DEFAULT_IGNORABLE_PREFIXES,
};
pub use ranking::{canonical_order, rank, RankedEntry, RankedList};
pub use report::{Comparison, InputSummary, Outcome, Verdict, VerificationReport};
pub use tokenizer::{clean_fragment, CleaningRule, Tokenizer};
pub use traits::{ClassifyLine, Tokenize};
