//! Evaluation listeners: the fine-grained per-tag report and the
//! per-mismatch printer.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::io::{self, Write};

use crate::eval::EvaluationMonitor;
use crate::Result;

/// Per-tag counts collected during an evaluation pass.
#[derive(Debug, Default)]
struct TagMeasure {
    /// Predictions matching the reference.
    correct: usize,
    /// Occurrences of the tag in the reference data.
    observed: usize,
    /// Occurrences of the tag in the tagger output.
    predicted: usize,
}

impl TagMeasure {
    fn precision(&self) -> f64 {
        if self.predicted > 0 {
            self.correct as f64 / self.predicted as f64
        } else {
            0.0
        }
    }

    fn recall(&self) -> f64 {
        if self.observed > 0 {
            self.correct as f64 / self.observed as f64
        } else {
            0.0
        }
    }

    fn fmeasure(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r > 0.0 {
            2.0 * p * r / (p + r)
        } else {
            0.0
        }
    }
}

/// Accuracy breakdown grouped by tag, accumulated over one evaluation
/// pass and written to a report sink afterwards.
#[derive(Debug, Default)]
pub struct FineGrainedReport {
    tags: BTreeMap<String, TagMeasure>,
    words_correct: usize,
    words_total: usize,
    sentences_correct: usize,
    sentences_total: usize,
}

impl FineGrainedReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accumulate(&mut self, reference: &[String], prediction: &[String]) {
        let mut matched = 0;
        for (r, p) in reference.iter().zip(prediction) {
            self.tags.entry(r.clone()).or_default().observed += 1;
            self.tags.entry(p.clone()).or_default().predicted += 1;
            if r == p {
                self.tags.entry(r.clone()).or_default().correct += 1;
                matched += 1;
            }
            self.words_total += 1;
        }
        if matched == reference.len() {
            self.sentences_correct += 1;
        }
        self.sentences_total += 1;
        self.words_correct += matched;
    }

    pub fn word_accuracy(&self) -> f64 {
        if self.words_total > 0 {
            self.words_correct as f64 / self.words_total as f64
        } else {
            0.0
        }
    }

    pub fn sentence_accuracy(&self) -> f64 {
        if self.sentences_total > 0 {
            self.sentences_correct as f64 / self.sentences_total as f64
        } else {
            0.0
        }
    }

    fn macro_averages(&self) -> (f64, f64, f64) {
        let observed: Vec<_> = self.tags.values().filter(|m| m.observed > 0).collect();
        if observed.is_empty() {
            return (0.0, 0.0, 0.0);
        }
        let n = observed.len() as f64;
        let (mut p, mut r, mut f) = (0.0, 0.0, 0.0);
        for m in observed {
            p += m.precision();
            r += m.recall();
            f += m.fmeasure();
        }
        (p / n, r / n, f / n)
    }

    /// Write the structured report to `sink`.
    pub fn write_to<W: Write>(&self, mut sink: W) -> io::Result<()> {
        write!(sink, "{self}")
    }
}

impl Display for FineGrainedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Performance by tag (#match, #model, #ref) (precision, recall, F1):"
        )?;
        for (tag, m) in &self.tags {
            if m.observed == 0 {
                writeln!(
                    f,
                    "\t{}: ({}, {}, {}) (******, ******, ******)",
                    tag, m.correct, m.predicted, m.observed
                )?;
            } else {
                writeln!(
                    f,
                    "\t{}: ({}, {}, {}) ({:.4}, {:.4}, {:.4})",
                    tag,
                    m.correct,
                    m.predicted,
                    m.observed,
                    m.precision(),
                    m.recall(),
                    m.fmeasure()
                )?;
            }
        }
        let (p, r, f1) = self.macro_averages();
        writeln!(f, "Macro-average precision, recall, F1: ({p}, {r}, {f1})")?;
        writeln!(
            f,
            "Word accuracy: {}/{} => {}",
            self.words_correct,
            self.words_total,
            self.word_accuracy()
        )?;
        writeln!(
            f,
            "Sentence accuracy: {}/{} => {}",
            self.sentences_correct,
            self.sentences_total,
            self.sentence_accuracy()
        )
    }
}

impl EvaluationMonitor for FineGrainedReport {
    fn sample_evaluated(
        &mut self,
        _words: &[String],
        reference: &[String],
        prediction: &[String],
    ) -> Result<()> {
        self.accumulate(reference, prediction);
        Ok(())
    }
}

/// Prints one line per mismatched token as the pass runs.
#[derive(Debug)]
pub struct MismatchPrinter<W> {
    sink: W,
}

impl MismatchPrinter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> MismatchPrinter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write> EvaluationMonitor for MismatchPrinter<W> {
    fn sample_evaluated(
        &mut self,
        words: &[String],
        reference: &[String],
        prediction: &[String],
    ) -> Result<()> {
        for (t, (r, p)) in reference.iter().zip(prediction).enumerate() {
            if r != p {
                writeln!(self.sink, "{}: expected {} but was {}", words[t], r, p)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &[&str]) -> Vec<String> {
        v.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn word_and_sentence_accuracy() {
        let mut report = FineGrainedReport::new();
        report.accumulate(&s(&["NOUN", "VERB"]), &s(&["NOUN", "NOUN"]));
        report.accumulate(&s(&["DET", "NOUN"]), &s(&["DET", "NOUN"]));
        assert_eq!(report.word_accuracy(), 0.75);
        assert_eq!(report.sentence_accuracy(), 0.5);
    }

    #[test]
    fn per_tag_measures() {
        let mut report = FineGrainedReport::new();
        // NOUN: observed twice, predicted three times, correct twice.
        report.accumulate(
            &s(&["NOUN", "VERB", "NOUN"]),
            &s(&["NOUN", "NOUN", "NOUN"]),
        );
        let noun = &report.tags["NOUN"];
        assert_eq!(noun.correct, 2);
        assert_eq!(noun.observed, 2);
        assert_eq!(noun.predicted, 3);
        assert!((noun.precision() - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(noun.recall(), 1.0);
        let verb = &report.tags["VERB"];
        assert_eq!(verb.fmeasure(), 0.0);
    }

    #[test]
    fn empty_report_is_all_zero() {
        let report = FineGrainedReport::new();
        assert_eq!(report.word_accuracy(), 0.0);
        assert_eq!(report.macro_averages(), (0.0, 0.0, 0.0));
    }

    #[test]
    fn display_lists_every_tag() {
        let mut report = FineGrainedReport::new();
        report.accumulate(&s(&["NOUN", "VERB"]), &s(&["NOUN", "NOUN"]));
        let text = report.to_string();
        assert!(text.contains("\tNOUN:"));
        assert!(text.contains("\tVERB:"));
        assert!(text.contains("Word accuracy: 1/2"));
    }

    #[test]
    fn mismatch_printer_writes_one_line_per_error() {
        let mut printer = MismatchPrinter::new(Vec::new());
        printer
            .sample_evaluated(
                &s(&["dog", "run"]),
                &s(&["NOUN", "VERB"]),
                &s(&["NOUN", "NOUN"]),
            )
            .unwrap();
        let out = String::from_utf8(printer.into_inner()).unwrap();
        assert_eq!(out.lines().count(), 1);
        assert_eq!(out.trim_end(), "run: expected VERB but was NOUN");
    }
}
