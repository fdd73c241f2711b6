use std::fmt;

use serde::Serialize;

use crate::checker::Discrepancy;
use crate::parser::ParseWarning;

/// Result of checking one ranked list against another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub expected_label: String,
    pub actual_label: String,
    /// Every discrepancy found, including those not retained
    pub total: usize,
    /// The first discrepancies found, in check order
    pub discrepancies: Vec<Discrepancy>,
}

impl Comparison {
    pub fn passed(&self) -> bool {
        self.total == 0
    }

    /// Discrepancies counted but not retained.
    pub fn omitted(&self) -> usize {
        self.total - self.discrepancies.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Compared(Comparison),
    /// One side could not be read
    Unavailable {
        expected_label: String,
        actual_label: String,
        reason: String,
    },
}

impl Outcome {
    pub fn expected_label(&self) -> &str {
        match self {
            Outcome::Compared(c) => &c.expected_label,
            Outcome::Unavailable { expected_label, .. } => expected_label,
        }
    }

    pub fn actual_label(&self) -> &str {
        match self {
            Outcome::Compared(c) => &c.actual_label,
            Outcome::Unavailable { actual_label, .. } => actual_label,
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self, Outcome::Compared(c) if c.passed())
    }

    pub fn failed(&self) -> bool {
        matches!(self, Outcome::Compared(c) if !c.passed())
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Outcome::Unavailable { .. })
    }
}

/// What was recovered from one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputSummary {
    pub label: String,
    /// Entries recovered, `None` when the input could not be read
    pub entries: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ParseWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    /// At least one comparison that ran found a discrepancy
    Fail,
    /// Nothing failed, but some input could not be verified
    Indeterminate,
}

impl Verdict {
    /// Process exit status: 0 pass, 1 validation failure, 2 input error.
    pub fn exit_code(self) -> i32 {
        match self {
            Verdict::Pass => 0,
            Verdict::Fail => 1,
            Verdict::Indeterminate => 2,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Fail => write!(f, "FAIL"),
            Verdict::Indeterminate => write!(f, "INDETERMINATE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    pub verdict: Verdict,
    pub inputs: Vec<InputSummary>,
    pub outcomes: Vec<Outcome>,
}

impl VerificationReport {
    /// Derives the verdict from `outcomes`. With `strict`, a parse warning on
    /// any input makes an otherwise passing run indeterminate.
    pub fn new(inputs: Vec<InputSummary>, outcomes: Vec<Outcome>, strict: bool) -> Self {
        let warned = inputs.iter().any(|input| !input.warnings.is_empty());
        let verdict = if outcomes.iter().any(Outcome::failed) {
            Verdict::Fail
        } else if outcomes.iter().any(Outcome::is_unavailable) || (strict && warned) {
            Verdict::Indeterminate
        } else {
            Verdict::Pass
        };
        Self {
            verdict,
            inputs,
            outcomes,
        }
    }

    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }

    pub fn total_discrepancies(&self) -> usize {
        self.outcomes
            .iter()
            .map(|outcome| match outcome {
                Outcome::Compared(c) => c.total,
                Outcome::Unavailable { .. } => 0,
            })
            .sum()
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed() { "PASS" } else { "FAIL" };
        writeln!(
            f,
            "=== {} vs {}: {} ({} discrepancies)",
            self.expected_label, self.actual_label, status, self.total
        )?;
        for d in &self.discrepancies {
            writeln!(f, "  - {d}")?;
        }
        if self.omitted() > 0 {
            writeln!(f, "  ... and {} more", self.omitted())?;
        }
        Ok(())
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Compared(c) => write!(f, "{c}"),
            Outcome::Unavailable {
                expected_label,
                actual_label,
                reason,
            } => writeln!(f, "=== {expected_label} vs {actual_label}: SKIPPED ({reason})"),
        }
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for input in &self.inputs {
            match (&input.error, input.entries) {
                (Some(error), _) => writeln!(f, "{}: {error}", input.label)?,
                (None, Some(entries)) => writeln!(f, "{}: {entries} entries", input.label)?,
                (None, None) => writeln!(f, "{}: not loaded", input.label)?,
            }
            for warning in &input.warnings {
                writeln!(f, "  warning: {warning}")?;
            }
        }
        for outcome in &self.outcomes {
            write!(f, "{outcome}")?;
        }
        write!(f, "Verdict: {}", self.verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::MalformedReason;
    use crate::ranking::RankedEntry;

    fn compared(total: usize, discrepancies: Vec<Discrepancy>) -> Outcome {
        Outcome::Compared(Comparison {
            expected_label: "ground truth".to_owned(),
            actual_label: "serial".to_owned(),
            total,
            discrepancies,
        })
    }

    fn input(label: &str, warnings: Vec<ParseWarning>) -> InputSummary {
        InputSummary {
            label: label.to_owned(),
            entries: Some(3),
            warnings,
            error: None,
        }
    }

    fn unavailable() -> Outcome {
        Outcome::Unavailable {
            expected_label: "ground truth".to_owned(),
            actual_label: "parallel".to_owned(),
            reason: "unable to read parallel.txt".to_owned(),
        }
    }

    #[test]
    fn verdict_precedence() {
        let failing = compared(
            1,
            vec![Discrepancy::SizeMismatch {
                expected: 3,
                actual: 2,
            }],
        );
        let report = VerificationReport::new(vec![], vec![failing, unavailable()], false);
        assert_eq!(report.verdict, Verdict::Fail);

        let report = VerificationReport::new(vec![], vec![compared(0, vec![]), unavailable()], false);
        assert_eq!(report.verdict, Verdict::Indeterminate);

        let report = VerificationReport::new(vec![], vec![compared(0, vec![])], false);
        assert_eq!(report.verdict, Verdict::Pass);
        assert_eq!(report.verdict.exit_code(), 0);
    }

    #[test]
    fn strict_mode_turns_warnings_indeterminate() {
        let warning = ParseWarning {
            line_number: 4,
            content: "the three".to_owned(),
            reason: MalformedReason::InvalidCount {
                field: "three".to_owned(),
            },
        };
        let inputs = vec![input("serial", vec![warning])];
        let lenient = VerificationReport::new(inputs.clone(), vec![compared(0, vec![])], false);
        let strict = VerificationReport::new(inputs, vec![compared(0, vec![])], true);
        assert_eq!(lenient.verdict, Verdict::Pass);
        assert_eq!(strict.verdict, Verdict::Indeterminate);
        assert_eq!(strict.verdict.exit_code(), 2);
    }

    #[test]
    fn rendering_lists_discrepancies_and_omissions() {
        let outcome = compared(
            4,
            vec![
                Discrepancy::CountMismatch {
                    token: "cat".to_owned(),
                    expected: 2,
                    actual: 1,
                },
                Discrepancy::OrderMismatch {
                    index: 0,
                    expected: RankedEntry::new("the", 3),
                    actual: RankedEntry::new("dog", 1),
                },
            ],
        );
        let report = VerificationReport::new(vec![input("serial", vec![])], vec![outcome], false);
        let text = report.to_string();
        assert!(text.contains("serial: 3 entries"));
        assert!(text.contains("=== ground truth vs serial: FAIL (4 discrepancies)"));
        assert!(text.contains("count mismatch for `cat`: expected 2, found 1"));
        assert!(text.contains("order mismatch at position 0: expected `the 3`, found `dog 1`"));
        assert!(text.contains("... and 2 more"));
        assert!(text.ends_with("Verdict: FAIL"));
    }

    #[test]
    fn rendering_marks_skipped_comparisons() {
        let report = VerificationReport::new(vec![], vec![unavailable()], false);
        assert!(report
            .to_string()
            .contains("ground truth vs parallel: SKIPPED (unable to read parallel.txt)"));
    }
}
