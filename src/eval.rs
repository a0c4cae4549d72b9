//! Model evaluation against a word/tag reference corpus.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::rc::Rc;

use crfsuite::Model;

use crate::corpus::WordTagSampleStream;
use crate::features::{DefaultFeatureSet, FeatureSet};
use crate::model::ModelCache;
use crate::report::{FineGrainedReport, MismatchPrinter};
use crate::Result;

/// Tags one tokenized sentence.
///
/// Implemented by [`CrfTagger`] over the backend; the seam keeps the pass
/// driver independent of a trained model.
pub trait Tag {
    fn tag(&mut self, words: &[String]) -> Result<Vec<String>>;
}

/// Observer attached to an evaluation pass. Called once per sample with
/// the words, the reference tags, and the predicted tags. An error from a
/// monitor aborts the pass.
pub trait EvaluationMonitor {
    fn sample_evaluated(
        &mut self,
        words: &[String],
        reference: &[String],
        prediction: &[String],
    ) -> Result<()>;
}

/// Backend-decoding tagger: encodes words into attribute items with a
/// [`FeatureSet`] and hands them to the model's tagger.
pub struct CrfTagger<'m, F = DefaultFeatureSet> {
    tagger: crfsuite::Tagger<'m>,
    features: F,
}

impl<'m> CrfTagger<'m> {
    /// Build a tagger over a loaded model with the stock feature set.
    ///
    /// A beam width of 0 leaves the backend's exact search untouched;
    /// larger widths are recorded but the backend decodes exactly.
    pub fn new(model: &'m Model, beam: usize) -> Result<Self> {
        Self::with_features(model, beam, DefaultFeatureSet)
    }
}

impl<'m, F: FeatureSet> CrfTagger<'m, F> {
    pub fn with_features(model: &'m Model, beam: usize, features: F) -> Result<Self> {
        if beam > 0 {
            log::debug!("beam width {beam} requested; backend decodes with exact search");
        }
        Ok(Self {
            tagger: model.tagger()?,
            features,
        })
    }
}

impl<F: FeatureSet> Tag for CrfTagger<'_, F> {
    fn tag(&mut self, words: &[String]) -> Result<Vec<String>> {
        let items = self.features.encode(words);
        Ok(self.tagger.tag(&items)?)
    }
}

/// Drive one evaluation pass: tag every sample, feed the monitors, and
/// return the word accuracy (0.0 for an empty corpus).
pub fn run_pass<R, T>(
    samples: WordTagSampleStream<R>,
    tagger: &mut T,
    monitors: &mut [&mut dyn EvaluationMonitor],
) -> Result<f64>
where
    R: std::io::Read,
    T: Tag + ?Sized,
{
    let mut correct = 0usize;
    let mut total = 0usize;
    for sample in samples {
        let sample = sample?;
        if sample.is_empty() {
            continue;
        }
        let prediction = tagger.tag(sample.words())?;
        for (r, p) in sample.tags().iter().zip(prediction.iter()) {
            if r == p {
                correct += 1;
            }
            total += 1;
        }
        for monitor in monitors.iter_mut() {
            monitor.sample_evaluated(sample.words(), sample.tags(), &prediction)?;
        }
    }
    if total > 0 {
        Ok(correct as f64 / total as f64)
    } else {
        log::warn!("no samples evaluated");
        Ok(0.0)
    }
}

/// Runs a cached model against a reference corpus.
///
/// The corpus stream is consumed by the pass, so each evaluator value
/// supports exactly one evaluation call; the operations take `self`.
#[derive(Debug)]
pub struct Evaluator {
    samples: WordTagSampleStream<File>,
    model: Rc<Model>,
    beam: usize,
}

impl Evaluator {
    /// Open the reference corpus and load the model through the cache.
    /// Both failures are hard construction errors; an evaluator is never
    /// built around a missing or unreadable model.
    pub fn new<P: AsRef<Path>>(
        test_data: P,
        model_path: &str,
        beam: usize,
        cache: &ModelCache,
    ) -> Result<Self> {
        let samples = WordTagSampleStream::open(&test_data)?;
        let model = cache.load(model_path)?;
        log::info!(
            "evaluating `{model_path}` against `{}` (beam width {beam})",
            test_data.as_ref().display()
        );
        Ok(Self {
            samples,
            model,
            beam,
        })
    }

    pub fn beam(&self) -> usize {
        self.beam
    }

    /// Run the pass and return the word accuracy without printing.
    pub fn accuracy(self) -> Result<f64> {
        self.run(&mut [])
    }

    /// Evaluate and print the word accuracy.
    pub fn evaluate(self) -> Result<f64> {
        let accuracy = self.accuracy()?;
        println!("{accuracy}");
        Ok(accuracy)
    }

    /// Same pass, with the fine-grained per-tag report written to
    /// `output`. The report file is created before the pass runs, so an
    /// unwritable path fails early, and it is flushed and closed before
    /// this returns.
    pub fn detail_evaluate<P: AsRef<Path>>(self, output: P) -> Result<f64> {
        let file = File::create(&output)?;
        let mut report = FineGrainedReport::new();
        let accuracy = self.run(&mut [&mut report])?;
        let mut sink = BufWriter::new(file);
        report.write_to(&mut sink)?;
        sink.flush()?;
        log::info!("wrote evaluation report to `{}`", output.as_ref().display());
        Ok(accuracy)
    }

    /// Same pass, printing every mismatched token as it is found, then
    /// the word accuracy.
    pub fn eval_error(self) -> Result<f64> {
        let mut printer = MismatchPrinter::stdout();
        let accuracy = self.run(&mut [&mut printer])?;
        println!("{accuracy}");
        Ok(accuracy)
    }

    fn run(self, monitors: &mut [&mut dyn EvaluationMonitor]) -> Result<f64> {
        let Self {
            samples,
            model,
            beam,
        } = self;
        let mut tagger = CrfTagger::new(&model, beam)?;
        run_pass(samples, &mut tagger, monitors)
    }
}
